//! The semantic event model (spec §3 "Event") and the read-only position the
//! parser exposes alongside each event/error (spec §6 "Locator").

use alloc::string::String;

use crate::number::Number;

/// A single SAX-style parse event.
///
/// Structural events ([`Event::StartObject`]/[`Event::EndObject`]/
/// [`Event::StartArray`]/[`Event::EndArray`]) and scalar events carry no
/// positional information themselves; query [`crate::StreamingParser::line`]
/// and [`crate::StreamingParser::column`] from within the handler callback
/// that receives the event if you need it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// `{` — a new object was opened.
    StartObject,
    /// `}` — the innermost object was closed.
    EndObject,
    /// `[` — a new array was opened.
    StartArray,
    /// `]` — the innermost array was closed.
    EndArray,
    /// An object key.
    Key(String),
    /// A complete string value (a bare string, an array element, or an
    /// object value — never a key; keys are always [`Event::Key`]).
    String(String),
    /// A complete, classified number (spec §3 "Number", §4.3.3, §8).
    Number(Number),
    /// `true` or `false`.
    Boolean(bool),
    /// `null`.
    Null,
    /// A coalesced run of whitespace between tokens. Only produced when
    /// [`crate::Handler::needs_whitespace`] returns `true`.
    Whitespace(String),
}

/// A read-only view of the most recent 1-based line and column the parser has
/// reached, for error reporting and diagnostics.
pub trait Locator {
    /// The 1-based line of the most recently processed character.
    fn line(&self) -> usize;
    /// The 1-based column of the most recently processed character.
    fn column(&self) -> usize;
}
