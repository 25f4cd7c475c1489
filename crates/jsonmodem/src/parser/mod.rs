//! The public streaming parser (spec §6 "Parser surface"): wires the BOM
//! detector, the UTF-8 decoder, the tokenizer, and the structural state
//! machine together and drives a caller-supplied [`Handler`].

use alloc::string::String;
use alloc::vec::Vec;

use crate::bom::{self, BomOutcome};
use crate::byte_ring::ByteRing;
use crate::error::{ErrorSource, ParserError, SyntaxError};
use crate::event::Locator;
use crate::handler::Handler;
use crate::literal::LiteralValue;
use crate::options::ParserOptions;
use crate::structural::{Structural, StringRole};
use crate::tokenizer::{self, Position, TokenKind};

/// The current 1-based line/column, snapshotted so it can be handed to a
/// handler's [`Handler::set_locator`] without re-borrowing the parser.
struct CurrentPosition {
    line: usize,
    column: usize,
}

impl Locator for CurrentPosition {
    fn line(&self) -> usize {
        self.line
    }

    fn column(&self) -> usize {
        self.column
    }
}

/// An incremental, push-driven JSON parser.
///
/// Bytes are pushed through [`StreamingParser::receive`]; semantic events
/// are delivered synchronously to the attached [`Handler`] as tokens
/// complete. The parser holds no buffer proportional to document size: only
/// the tail of whatever token is currently incomplete, plus container
/// nesting depth (spec §3 "Invariants").
pub struct StreamingParser<H: Handler> {
    options: ParserOptions,
    handler: H,
    bom_checked: bool,
    bom_pending: Vec<u8>,
    byte_ring: ByteRing,
    /// Decoded characters left over from an incomplete token at the end of
    /// the previous `receive` call.
    pending: String,
    structural: Structural,
    line: usize,
    column: usize,
    seen_token: bool,
    closed: bool,
    /// Set once any `receive`/`close` call returns an error (spec §5, §7:
    /// "the parser is left in a failed state"). Cleared only by `reset`.
    failed: bool,
}

impl<H: Handler> StreamingParser<H> {
    /// Creates a new parser with the given handler and options.
    pub fn new(handler: H, options: ParserOptions) -> Self {
        Self {
            options,
            handler,
            bom_checked: false,
            bom_pending: Vec::new(),
            byte_ring: ByteRing::new(),
            pending: String::new(),
            structural: Structural::new(),
            line: 1,
            column: 0,
            seen_token: false,
            closed: false,
            failed: false,
        }
    }

    /// Replaces the attached handler, for instance between calls to
    /// [`StreamingParser::reset`].
    pub fn set_handler(&mut self, handler: H) {
        self.handler = handler;
    }

    /// Borrows the attached handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrows the attached handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consumes the parser, returning its handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Pushes a chunk of bytes. Returns once every consumable byte has been
    /// processed and all resulting events have been delivered to the
    /// handler (spec §5 "Ordering guarantees").
    ///
    /// # Errors
    ///
    /// Returns an error on malformed encoding, a lexical or structural
    /// violation, or a handler callback failure. Once an error is returned
    /// the parser is left in a failed state and every subsequent
    /// `receive`/`close` call fails without reprocessing any input; call
    /// [`StreamingParser::reset`] to use it again.
    pub fn receive(&mut self, input: &[u8]) -> Result<(), ParserError> {
        self.check_usable()?;
        let result = self.receive_inner(input);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn receive_inner(&mut self, input: &[u8]) -> Result<(), ParserError> {
        let locator = self.position();
        self.handler.set_locator(&locator);

        if self.bom_checked {
            return self.ingest(input);
        }

        let mut probe = core::mem::take(&mut self.bom_pending);
        probe.extend_from_slice(input);
        match bom::detect(&probe) {
            Ok(BomOutcome::NeedMoreInput) => {
                self.bom_pending = probe;
                Ok(())
            }
            Ok(BomOutcome::NoBom) => {
                self.bom_checked = true;
                self.ingest(&probe)
            }
            Ok(BomOutcome::ConsumeUtf8Bom { len }) => {
                self.bom_checked = true;
                self.ingest(&probe[len..])
            }
            Err(e) => Err(self.syntax_err(e, self.position())),
        }
    }

    /// Finalizes the document. Fails if no token was ever seen, if a
    /// container is still open, or if a token was left incomplete. `close`
    /// is idempotent: calling it again after success is a no-op. Calling it
    /// after any `receive`/`close` call has failed fails again, the same as
    /// `receive` would (spec §5, §7).
    ///
    /// # Errors
    ///
    /// See the conditions above, and spec §4.4 "Close".
    pub fn close(&mut self) -> Result<(), ParserError> {
        if self.closed {
            return Ok(());
        }
        self.check_usable()?;

        let result = self.close_inner();
        if result.is_ok() {
            self.closed = true;
        } else {
            self.failed = true;
        }
        result
    }

    fn close_inner(&mut self) -> Result<(), ParserError> {
        let locator = self.position();
        self.handler.set_locator(&locator);

        self.byte_ring
            .finish()
            .map_err(|e| self.syntax_err(e, self.position()))?;

        let remaining = core::mem::take(&mut self.pending);
        let result = self.run(&remaining, true);
        self.pending = String::new();

        result?;

        if !self.seen_token {
            return Err(self.syntax_err(SyntaxError::NoData, self.position()));
        }

        self.structural
            .finish()
            .map_err(|e| self.syntax_err(e, self.position()))
    }

    /// Rejects `receive`/`close` calls once the parser has been closed or has
    /// failed (spec §5, §7): neither state recovers without `reset`.
    fn check_usable(&self) -> Result<(), ParserError> {
        if self.closed {
            Err(self.syntax_err(SyntaxError::ReceiveAfterClose, self.position()))
        } else if self.failed {
            Err(self.syntax_err(SyntaxError::ReceiveAfterFailure, self.position()))
        } else {
            Ok(())
        }
    }

    /// Restores the parser to its initial, idle state for reuse on a new
    /// document. The handler is left unchanged; call
    /// [`StreamingParser::set_handler`] first if a fresh handler is wanted.
    pub fn reset(&mut self) {
        self.bom_checked = false;
        self.bom_pending.clear();
        self.byte_ring = ByteRing::new();
        self.pending.clear();
        self.structural = Structural::new();
        self.line = 1;
        self.column = 0;
        self.seen_token = false;
        self.closed = false;
        self.failed = false;
    }

    fn position(&self) -> CurrentPosition {
        CurrentPosition {
            line: self.line,
            column: self.column,
        }
    }

    fn syntax_err(&self, e: SyntaxError, at: CurrentPosition) -> ParserError {
        ParserError::new(e, at.line, at.column)
    }

    fn handler_err(&self, message: String, at: CurrentPosition) -> ParserError {
        ParserError::new(ErrorSource::Handler(message), at.line, at.column)
    }

    fn ingest(&mut self, bytes: &[u8]) -> Result<(), ParserError> {
        let mut decoded = core::mem::take(&mut self.pending);
        self.byte_ring
            .decode_into(bytes, &mut decoded)
            .map_err(|e| self.syntax_err(e, self.position()))?;
        let result = self.run(&decoded, false);
        let consumed = match &result {
            Ok(n) => *n,
            Err(_) => decoded.len(),
        };
        decoded.drain(..consumed);
        self.pending = decoded;
        result.map(|_| ())
    }

    /// Scans and dispatches as many tokens as possible from `s`, returning
    /// the byte offset of the first unconsumed character (== `s.len()` when
    /// `closed` and everything was consumed).
    fn run(&mut self, s: &str, closed: bool) -> Result<usize, ParserError> {
        let mut pos = Position {
            byte_offset: 0,
            line: self.line,
            column: self.column,
        };

        loop {
            match tokenizer::scan_token(s, pos, closed, self.options.allow_unicode_whitespace) {
                Ok(Some((TokenKind::Whitespace, end_pos))) => {
                    if self.handler.needs_whitespace() {
                        let text = s[pos.byte_offset..end_pos.byte_offset].into();
                        self.handler.whitespace(text).map_err(|e| {
                            self.handler_err(
                                alloc::format!("{e}"),
                                CurrentPosition {
                                    line: end_pos.line,
                                    column: end_pos.column,
                                },
                            )
                        })?;
                    }
                    pos = end_pos;
                }
                Ok(Some((kind, end_pos))) => {
                    self.before_token(pos)?;
                    self.dispatch(kind, pos)?;
                    pos = end_pos;
                }
                Ok(None) => {
                    self.line = pos.line;
                    self.column = pos.column;
                    return Ok(pos.byte_offset);
                }
                Err(e) => return Err(self.syntax_err(e, self.position_at(pos))),
            }
        }
    }

    fn position_at(&self, pos: Position) -> CurrentPosition {
        CurrentPosition {
            line: pos.line,
            column: pos.column,
        }
    }

    /// Handles document-boundary bookkeeping before a non-whitespace token
    /// is dispatched: detects trailing content after a completed document,
    /// and restarts the structural state machine when
    /// `allow_multiple_json_values` permits another value.
    fn before_token(&mut self, pos: Position) -> Result<(), ParserError> {
        if self.seen_token && self.structural.is_document_complete() {
            if self.options.allow_multiple_json_values {
                self.structural.start_next_value();
            } else {
                return Err(self.syntax_err(SyntaxError::TrailingContent, self.position_at(pos)));
            }
        }
        self.seen_token = true;
        Ok(())
    }

    fn dispatch(&mut self, kind: TokenKind, pos: Position) -> Result<(), ParserError> {
        let at = self.position_at(pos);
        match kind {
            TokenKind::StartObject => {
                self.structural
                    .begin_object()
                    .map_err(|e| self.syntax_err(e, self.position_at(pos)))?;
                self.handler
                    .start_object()
                    .map_err(|e| self.handler_err(alloc::format!("{e}"), at))
            }
            TokenKind::EndObject => {
                self.structural
                    .end_object()
                    .map_err(|e| self.syntax_err(e, self.position_at(pos)))?;
                self.handler
                    .end_object()
                    .map_err(|e| self.handler_err(alloc::format!("{e}"), at))
            }
            TokenKind::StartArray => {
                self.structural
                    .begin_array()
                    .map_err(|e| self.syntax_err(e, self.position_at(pos)))?;
                self.handler
                    .start_array()
                    .map_err(|e| self.handler_err(alloc::format!("{e}"), at))
            }
            TokenKind::EndArray => {
                self.structural
                    .end_array()
                    .map_err(|e| self.syntax_err(e, self.position_at(pos)))?;
                self.handler
                    .end_array()
                    .map_err(|e| self.handler_err(alloc::format!("{e}"), at))
            }
            TokenKind::Comma => self
                .structural
                .comma()
                .map_err(|e| self.syntax_err(e, self.position_at(pos))),
            TokenKind::Colon => self
                .structural
                .colon()
                .map_err(|e| self.syntax_err(e, self.position_at(pos))),
            TokenKind::Str(text) => {
                match self
                    .structural
                    .accept_string()
                    .map_err(|e| self.syntax_err(e, self.position_at(pos)))?
                {
                    StringRole::Key => self
                        .handler
                        .key(text)
                        .map_err(|e| self.handler_err(alloc::format!("{e}"), at)),
                    StringRole::Value => self
                        .handler
                        .string_value(text)
                        .map_err(|e| self.handler_err(alloc::format!("{e}"), at)),
                }
            }
            TokenKind::Num(number) => {
                self.structural
                    .accept_scalar()
                    .map_err(|e| self.syntax_err(e, self.position_at(pos)))?;
                self.handler
                    .number_value(number)
                    .map_err(|e| self.handler_err(alloc::format!("{e}"), at))
            }
            TokenKind::Lit(value) => {
                self.structural
                    .accept_scalar()
                    .map_err(|e| self.syntax_err(e, self.position_at(pos)))?;
                match value {
                    LiteralValue::Null => self
                        .handler
                        .null_value()
                        .map_err(|e| self.handler_err(alloc::format!("{e}"), at)),
                    LiteralValue::True => self
                        .handler
                        .boolean_value(true)
                        .map_err(|e| self.handler_err(alloc::format!("{e}"), at)),
                    LiteralValue::False => self
                        .handler
                        .boolean_value(false)
                        .map_err(|e| self.handler_err(alloc::format!("{e}"), at)),
                }
            }
            TokenKind::Whitespace => unreachable!("handled in run() before dispatch"),
        }
    }
}

impl<H: Handler> Locator for StreamingParser<H> {
    fn line(&self) -> usize {
        self.line
    }

    fn column(&self) -> usize {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::number::Number;

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        want_whitespace: bool,
    }

    impl Handler for Recorder {
        type Error = core::convert::Infallible;

        fn start_object(&mut self) -> Result<(), Self::Error> {
            self.events.push(Event::StartObject);
            Ok(())
        }
        fn end_object(&mut self) -> Result<(), Self::Error> {
            self.events.push(Event::EndObject);
            Ok(())
        }
        fn start_array(&mut self) -> Result<(), Self::Error> {
            self.events.push(Event::StartArray);
            Ok(())
        }
        fn end_array(&mut self) -> Result<(), Self::Error> {
            self.events.push(Event::EndArray);
            Ok(())
        }
        fn key(&mut self, key: String) -> Result<(), Self::Error> {
            self.events.push(Event::Key(key));
            Ok(())
        }
        fn string_value(&mut self, value: String) -> Result<(), Self::Error> {
            self.events.push(Event::String(value));
            Ok(())
        }
        fn number_value(&mut self, value: Number) -> Result<(), Self::Error> {
            self.events.push(Event::Number(value));
            Ok(())
        }
        fn boolean_value(&mut self, value: bool) -> Result<(), Self::Error> {
            self.events.push(Event::Boolean(value));
            Ok(())
        }
        fn null_value(&mut self) -> Result<(), Self::Error> {
            self.events.push(Event::Null);
            Ok(())
        }
        fn whitespace(&mut self, value: String) -> Result<(), Self::Error> {
            self.events.push(Event::Whitespace(value));
            Ok(())
        }
        fn needs_whitespace(&self) -> bool {
            self.want_whitespace
        }
    }

    fn parse_whole(input: &str) -> Vec<Event> {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(input.as_bytes()).unwrap();
        parser.close().unwrap();
        parser.into_handler().events
    }

    fn parse_fragmented(input: &str, chunk: usize) -> Vec<Event> {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        for window in input.as_bytes().chunks(chunk.max(1)) {
            parser.receive(window).unwrap();
        }
        parser.close().unwrap();
        parser.into_handler().events
    }

    #[test]
    fn simple_object() {
        let events = parse_whole(r#"{"name":"Alice","age":30}"#);
        assert_eq!(
            events,
            vec![
                Event::StartObject,
                Event::Key("name".into()),
                Event::String("Alice".into()),
                Event::Key("age".into()),
                Event::Number(Number::Int32(30)),
                Event::EndObject,
            ]
        );
    }

    #[test]
    fn mixed_array() {
        let events = parse_whole("[true, false, null, 1.5e2]");
        assert_eq!(
            events,
            vec![
                Event::StartArray,
                Event::Boolean(true),
                Event::Boolean(false),
                Event::Null,
                Event::Number(Number::Double(150.0)),
                Event::EndArray,
            ]
        );
    }

    #[test]
    fn byte_at_a_time_fragmentation_matches_whole_input() {
        let input = r#"{"nested":{"a":[1,2,3]}}"#;
        assert_eq!(parse_whole(input), parse_fragmented(input, 1));
    }

    #[test]
    fn utf8_bom_is_skipped() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(&[0xEF]).unwrap();
        parser.receive(&[0xBB]).unwrap();
        parser.receive(&[0xBF]).unwrap();
        parser.receive(b"true").unwrap();
        parser.close().unwrap();
        assert_eq!(parser.into_handler().events, vec![Event::Boolean(true)]);
    }

    #[test]
    fn utf32_bom_rejected() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        let err = parser.receive(&[0xFF, 0xFE, 0x00, 0x00]).unwrap_err();
        assert_eq!(
            err.syntax_error(),
            Some(&SyntaxError::Utf32NotSupported("LE"))
        );
    }

    #[test]
    fn trailing_comma_reports_after_start_array_and_number() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        let err = parser.receive(b"[1,]");
        assert!(err.is_err());
        let events = parser.into_handler().events;
        assert_eq!(events, vec![Event::StartArray, Event::Number(Number::Int32(1))]);
    }

    #[test]
    fn receive_after_a_failed_receive_is_rejected_without_reprocessing() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(b"[1,]").unwrap_err();
        let err = parser.receive(b"5").unwrap_err();
        assert_eq!(err.syntax_error(), Some(&SyntaxError::ReceiveAfterFailure));
        assert_eq!(
            parser.into_handler().events,
            vec![Event::StartArray, Event::Number(Number::Int32(1))]
        );
    }

    #[test]
    fn close_after_a_failed_receive_is_rejected() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(b"[1,]").unwrap_err();
        assert_eq!(
            parser.close().unwrap_err().syntax_error(),
            Some(&SyntaxError::ReceiveAfterFailure)
        );
    }

    #[test]
    fn reset_clears_the_failed_state() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(b"[1,]").unwrap_err();
        parser.reset();
        parser.receive(b"5").unwrap();
        parser.close().unwrap();
        assert_eq!(
            parser.into_handler().events,
            vec![Event::Number(Number::Int32(5))]
        );
    }

    #[test]
    fn receive_after_a_failed_close_is_rejected() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(b"{").unwrap();
        parser.close().unwrap_err();
        let err = parser.receive(b"}").unwrap_err();
        assert_eq!(err.syntax_error(), Some(&SyntaxError::ReceiveAfterFailure));
    }

    #[test]
    fn close_on_unclosed_object_fails() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(b"{").unwrap();
        assert_eq!(
            parser.close().unwrap_err().syntax_error(),
            Some(&SyntaxError::UnclosedObject)
        );
    }

    #[test]
    fn close_on_empty_input_fails_with_no_data() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        assert_eq!(
            parser.close().unwrap_err().syntax_error(),
            Some(&SyntaxError::NoData)
        );
    }

    #[test]
    fn empty_containers_close_cleanly() {
        assert_eq!(
            parse_whole("{}"),
            vec![Event::StartObject, Event::EndObject]
        );
        assert_eq!(parse_whole("[]"), vec![Event::StartArray, Event::EndArray]);
    }

    #[test]
    fn multiple_values_rejected_by_default() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(b"1 2").unwrap_err();
    }

    #[test]
    fn multiple_values_allowed_when_opted_in() {
        let mut parser = StreamingParser::new(
            Recorder::default(),
            ParserOptions {
                allow_multiple_json_values: true,
                ..ParserOptions::default()
            },
        );
        parser.receive(b"1 2 3").unwrap();
        parser.close().unwrap();
        assert_eq!(
            parser.into_handler().events,
            vec![
                Event::Number(Number::Int32(1)),
                Event::Number(Number::Int32(2)),
                Event::Number(Number::Int32(3)),
            ]
        );
    }

    #[test]
    fn whitespace_reported_only_when_requested() {
        let mut parser = StreamingParser::new(
            Recorder {
                want_whitespace: true,
                ..Recorder::default()
            },
            ParserOptions::default(),
        );
        parser.receive(b" [ ] ").unwrap();
        parser.close().unwrap();
        let events = parser.into_handler().events;
        assert!(matches!(events.first(), Some(Event::Whitespace(_))));
        assert!(matches!(events.last(), Some(Event::Whitespace(_))));
    }

    #[test]
    fn whitespace_run_split_across_receive_calls_coalesces_into_one_event() {
        let mut parser = StreamingParser::new(
            Recorder {
                want_whitespace: true,
                ..Recorder::default()
            },
            ParserOptions::default(),
        );
        // The leading whitespace run is split across three `receive` calls;
        // it must still surface as a single `Whitespace` event rather than
        // three, matching the single-chunk event sequence (spec §8
        // "Fragmentation invariance").
        parser.receive(b"  ").unwrap();
        parser.receive(b" ").unwrap();
        parser.receive(b" true").unwrap();
        parser.close().unwrap();
        assert_eq!(
            parser.into_handler().events,
            vec![Event::Whitespace("    ".into()), Event::Boolean(true)]
        );
    }

    #[test]
    fn receive_after_close_fails() {
        let mut parser = StreamingParser::new(Recorder::default(), ParserOptions::default());
        parser.receive(b"1").unwrap();
        parser.close().unwrap();
        assert_eq!(
            parser.receive(b"2").unwrap_err().syntax_error(),
            Some(&SyntaxError::ReceiveAfterClose)
        );
    }

    #[test]
    fn snapshot_complex_document() {
        let json = r#"{"users":[{"id":1,"name":"Ada"},{"id":2,"name":"Grace"}],"meta":{"count":2,"tags":null}}"#;
        let events = parse_whole(json);
        let rendered: String = events.iter().map(|e| alloc::format!("{e:?}\n")).collect();
        insta::assert_snapshot!(rendered, @r#"
        StartObject
        Key("users")
        StartArray
        StartObject
        Key("id")
        Number(Int32(1))
        Key("name")
        String("Ada")
        EndObject
        StartObject
        Key("id")
        Number(Int32(2))
        Key("name")
        String("Grace")
        EndObject
        EndArray
        Key("meta")
        StartObject
        Key("count")
        Number(Int32(2))
        Key("tags")
        Null
        EndObject
        EndObject
        "#);
    }
}
