//! Configuration surfaces for [`crate::StreamingParser`] and [`crate::Writer`].

/// Configuration options for the JSON streaming parser.
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct ParserOptions {
    /// Whether to allow any Unicode whitespace between JSON values.
    ///
    /// By default, the parser only recognizes the four whitespace characters
    /// defined by RFC 8259: space (U+0020), line feed (U+000A), carriage
    /// return (U+000D), and horizontal tab (U+0009). Form feed (U+000C) is
    /// never accepted, matching RFC 8259 rather than the wider whitespace set
    /// some lenient parsers allow.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    /// Whether to parse multiple JSON values in a single input stream.
    ///
    /// When `true`, completing a value does not leave the parser in a
    /// terminal state; whitespace-separated values continue to be accepted.
    /// This supports formats such as JSON Lines (JSONL) and newline-delimited
    /// JSON (ND-JSON), and arbitrary whitespace-separated concatenation of
    /// JSON values.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_json_values: bool,
}

/// The character used to indent a [`crate::Writer`]'s pretty-printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentChar {
    /// Indent with ASCII space (U+0020).
    Space,
    /// Indent with a horizontal tab (U+0009).
    Tab,
}

/// How a [`crate::Writer`] lays out whitespace between tokens.
///
/// # Default
///
/// [`Indent::None`] — no optional whitespace is emitted; the writer produces
/// the most compact valid encoding of each event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// No indentation or inter-token whitespace.
    #[default]
    None,
    /// Pretty-print with `count` copies of `char` per nesting level, a
    /// newline before each child, and a single space after each key's colon.
    Pretty {
        /// The character to repeat.
        char: IndentChar,
        /// How many times to repeat `char` per nesting level. Must be
        /// positive; `0` behaves like [`Indent::None`].
        count: u16,
    },
}

/// Configuration options for [`crate::Writer`].
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct WriterOptions {
    /// Inter-token whitespace/indentation style.
    pub indent: Indent,
}
