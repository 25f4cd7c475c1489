//! The event sink a caller implements to receive semantic events (spec §9
//! "Handler as capability set").
//!
//! A handler is a plain trait with one method per [`crate::Event`] variant,
//! all defaulted to no-ops, so a caller only overrides the events it cares
//! about. This mirrors how the teacher crate's `EventBuilder` trait provides
//! defaulted methods rather than requiring every adapter to implement every
//! atom constructor.

use alloc::string::String;

use crate::{event::Locator, number::Number};

/// Receives semantic parse events as they are recognized.
///
/// Every method defaults to doing nothing and returning `Ok(())`; implement
/// only the events relevant to your use case. A method may return `Err` to
/// abort the parse — the error is wrapped in a [`crate::ParserError`] and
/// propagated out of [`crate::StreamingParser::receive`], leaving the parser
/// in a failed state (spec §7: "Handler exceptions pass through unchanged").
pub trait Handler {
    /// The error type a handler's callbacks may fail with.
    type Error: core::fmt::Display;

    /// `{` was recognized.
    fn start_object(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `}` was recognized.
    fn end_object(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `[` was recognized.
    fn start_array(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `]` was recognized.
    fn end_array(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A complete object key was recognized.
    fn key(&mut self, key: String) -> Result<(), Self::Error> {
        let _ = key;
        Ok(())
    }

    /// A complete string value (not a key) was recognized.
    fn string_value(&mut self, value: String) -> Result<(), Self::Error> {
        let _ = value;
        Ok(())
    }

    /// A complete, classified number was recognized.
    fn number_value(&mut self, value: Number) -> Result<(), Self::Error> {
        let _ = value;
        Ok(())
    }

    /// `true` or `false` was recognized.
    fn boolean_value(&mut self, value: bool) -> Result<(), Self::Error> {
        let _ = value;
        Ok(())
    }

    /// `null` was recognized.
    fn null_value(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A coalesced run of whitespace was recognized. Only invoked when
    /// [`Handler::needs_whitespace`] returns `true`.
    fn whitespace(&mut self, value: String) -> Result<(), Self::Error> {
        let _ = value;
        Ok(())
    }

    /// Whether the parser should bother coalescing and reporting whitespace
    /// runs at all. Defaults to `false`: whitespace is consumed and discarded
    /// without ever being materialized into a string.
    fn needs_whitespace(&self) -> bool {
        false
    }

    /// Called once per `receive`/`close` with the parser's current position,
    /// before any events from that call are delivered. Implement this if your
    /// handler wants to tag events with a source location without querying
    /// [`crate::StreamingParser::line`]/[`crate::StreamingParser::column`]
    /// directly.
    fn set_locator(&mut self, locator: &dyn Locator) {
        let _ = locator;
    }
}

/// A [`Handler`] that discards every event. Useful for validating input
/// without caring about its content.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHandler;

impl Handler for NullHandler {
    type Error = core::convert::Infallible;
}
