//! The single error kind the whole crate reports through.
//!
//! Every fallible operation in this crate — decoding, tokenizing, structural
//! validation, and handler callbacks — reports through [`ParserError`]. There
//! is no recovery: once an error is produced the parser that produced it is
//! left in a failed state (see [`crate::StreamingParser::receive`]).

use alloc::string::String;

use thiserror::Error;

/// A single JSON error, carrying a human-readable message and the 1-based
/// line/column of the token or byte that triggered it, when known.
///
/// This mirrors the taxonomy in the specification: encoding errors, structural
/// errors, lexical errors, and lifecycle errors are all reported as one kind,
/// distinguished only by message content (see [`SyntaxError`]'s variants).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{source} at {line}:{column}")]
pub struct ParserError {
    pub(crate) source: ErrorSource,
    /// 1-based line of the error, or the most recent line seen if the error
    /// is not associated with a specific token.
    pub line: usize,
    /// 1-based column of the error.
    pub column: usize,
}

impl ParserError {
    pub(crate) fn new(source: impl Into<ErrorSource>, line: usize, column: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }

    /// The underlying syntax error, if this error did not originate from a
    /// handler callback.
    #[must_use]
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match &self.source {
            ErrorSource::Syntax(e) => Some(e),
            ErrorSource::Handler(_) => None,
        }
    }
}

/// Where a [`ParserError`] originated.
#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum ErrorSource {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    #[error("handler error: {0}")]
    Handler(String),
}

/// The lexical, structural, encoding, and lifecycle errors a streaming parse
/// can report. See spec §7 for the taxonomy this enumerates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    // -- encoding --
    /// A UTF-16 byte-order mark was detected at the start of input.
    #[error("UTF-16 {0} byte order mark is not supported")]
    Utf16NotSupported(&'static str),
    /// A UTF-32 byte-order mark was detected at the start of input.
    #[error("UTF-32 {0} byte order mark is not supported")]
    Utf32NotSupported(&'static str),
    /// The input contained a byte sequence that is not valid UTF-8.
    #[error("character decoding error at byte offset {0}")]
    InvalidUtf8(usize),

    // -- structural --
    /// A structurally-invalid punctuator was seen for the current state.
    #[error("unexpected '{0}'")]
    UnexpectedPunctuator(char),
    /// A comma was seen where no value or container can follow.
    #[error("unexpected ','")]
    UnexpectedComma,
    /// `}` was seen immediately after a comma.
    #[error("trailing comma before '}}'")]
    TrailingCommaBeforeObjectEnd,
    /// `]` was seen immediately after a comma.
    #[error("trailing comma before ']'")]
    TrailingCommaBeforeArrayEnd,
    /// `close()` was called with an open object on the container stack.
    #[error("unclosed object")]
    UnclosedObject,
    /// `close()` was called with an open array on the container stack.
    #[error("unclosed array")]
    UnclosedArray,
    /// `close()` was called without having seen a single token.
    #[error("no data")]
    NoData,
    /// A complete value was parsed but further non-whitespace input followed
    /// it and `allow_multiple_json_values` is not set.
    #[error("trailing content after document")]
    TrailingContent,
    /// An object key position saw something other than a string.
    #[error("expected string property name")]
    ExpectedPropertyName,
    /// A key was parsed but the next token was not `:`.
    #[error("expected ':'")]
    ExpectedColon,
    /// A value just completed but the next token was neither `,` nor the
    /// enclosing container's closing bracket.
    #[error("expected ',' or closing bracket")]
    ExpectedCommaOrContainerEnd,

    // -- lexical --
    /// An input character cannot begin any token.
    #[error("unexpected character: {0}")]
    UnexpectedCharacter(char),
    /// `close()` (or end of input) occurred inside an open string literal.
    #[error("unclosed string")]
    UnclosedString,
    /// A raw control character (< U+0020) appeared unescaped in a string.
    #[error("unescaped control character in string")]
    UnescapedControlCharacter,
    /// `\` was followed by a character that is not a recognized escape.
    #[error("invalid escape sequence")]
    InvalidEscapeSequence,
    /// A `\u` escape contained a non-hexadecimal digit.
    #[error("invalid hex digit: '{0}'")]
    InvalidHexDigit(char),
    /// A `\u` escape ended (input closed) before four digits were seen.
    #[error("incomplete unicode escape")]
    IncompleteUnicodeEscape,
    /// A `\u` escape decoded to a lone low surrogate with no preceding high
    /// surrogate, or a high surrogate not followed by `\u` + a low surrogate.
    #[error("unpaired surrogate in unicode escape")]
    UnpairedSurrogate,
    /// `01`, `00`, etc: a non-zero leading digit is required unless the
    /// integer part is exactly `0`.
    #[error("numbers cannot have leading zeros")]
    LeadingZero,
    /// `-` not followed by a digit.
    #[error("a minus sign must be followed by a digit")]
    MissingIntegerDigit,
    /// `1.` with no digit after the decimal point.
    #[error("decimal point must be followed by digit")]
    MissingFractionDigit,
    /// `1e`/`1e+` with no digit after the exponent marker/sign.
    #[error("exponent must have digit")]
    MissingExponentDigit,
    /// `t`/`f`/`n` followed by characters that do not spell `true`/`false`/`null`.
    #[error("invalid literal")]
    InvalidLiteral,
    /// Numeric text could not be converted to the requested numeric type.
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    /// An otherwise-complete token was abandoned at end of input.
    #[error("incomplete token at end of input")]
    IncompleteToken,

    // -- lifecycle --
    /// `receive` was called after `close()`.
    #[error("cannot receive data after close()")]
    ReceiveAfterClose,
    /// `receive` or `close` was called after a previous call on this parser
    /// already failed; the parser stays failed until `reset()`.
    #[error("parser is in a failed state after a previous error; call reset() to continue")]
    ReceiveAfterFailure,
}
