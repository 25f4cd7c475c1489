//! Recognizes one token per call from a decoded character buffer (spec
//! §4.3). Every sub-scanner either completes a token or signals underflow
//! before touching anything outside its own local state; on underflow the
//! caller discards the whole scan and keeps the original `start` position,
//! which is this module's entire rewind strategy (spec §9 "Rewind-on-
//! underflow discipline"). Whitespace runs follow the same discipline: a run
//! that reaches the end of the available buffer without being closed
//! underflows rather than completing early, so a run split across two
//! `receive` calls still surfaces as exactly one coalesced
//! [`Event::Whitespace`](crate::event::Event::Whitespace) event.

use alloc::string::{String, ToString};

use crate::error::SyntaxError;
use crate::escape::{combine_surrogate_pair, UnicodeEscapeBuffer};
use crate::literal::{ExpectedLiteralBuffer, LiteralValue, Step};
use crate::number::Number;

/// A position within a decoded character buffer: a byte offset plus the
/// 1-based line/column it corresponds to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Position {
    pub(crate) byte_offset: usize,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

/// One recognized token, already converted to its final semantic payload
/// (strings are fully unescaped, numbers and literals fully classified).
pub(crate) enum TokenKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Comma,
    Colon,
    Str(String),
    Num(Number),
    Lit(LiteralValue),
    Whitespace,
}

struct Cursor<'a> {
    s: &'a str,
    pos: Position,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.s[self.pos.byte_offset..].chars().next()
    }

    /// Consumes and returns the next character, advancing line/column.
    /// CR, LF, and CRLF each count as exactly one line boundary (spec §3).
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos.byte_offset += c.len_utf8();
        match c {
            '\n' => {
                self.pos.line += 1;
                self.pos.column = 0;
            }
            '\r' => {
                self.pos.line += 1;
                self.pos.column = 0;
                if self.peek() == Some('\n') {
                    self.pos.byte_offset += 1;
                }
            }
            _ => self.pos.column += 1,
        }
        Some(c)
    }
}

fn is_whitespace_char(c: char, allow_unicode_whitespace: bool) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
        || (allow_unicode_whitespace && c != '\u{0C}' && c.is_whitespace())
}

/// Attempts to recognize one token starting at `start`. Returns `Ok(None)`
/// on underflow (not enough input, and the stream is not closed), `Ok(Some)`
/// with the token and the position just past it, or `Err` on a lexical
/// error.
pub(crate) fn scan_token(
    s: &str,
    start: Position,
    closed: bool,
    allow_unicode_whitespace: bool,
) -> Result<Option<(TokenKind, Position)>, SyntaxError> {
    let mut cur = Cursor { s, pos: start };
    let Some(first) = cur.bump() else {
        return Ok(None);
    };

    match first {
        '{' => Ok(Some((TokenKind::StartObject, cur.pos))),
        '}' => Ok(Some((TokenKind::EndObject, cur.pos))),
        '[' => Ok(Some((TokenKind::StartArray, cur.pos))),
        ']' => Ok(Some((TokenKind::EndArray, cur.pos))),
        ',' => Ok(Some((TokenKind::Comma, cur.pos))),
        ':' => Ok(Some((TokenKind::Colon, cur.pos))),
        '"' => scan_string(&mut cur, start, closed),
        '-' | '0'..='9' => scan_number(&mut cur, start, first, closed),
        't' | 'f' | 'n' => scan_literal(&mut cur, first, closed),
        c if is_whitespace_char(c, allow_unicode_whitespace) => loop {
            match cur.peek() {
                Some(c) if is_whitespace_char(c, allow_unicode_whitespace) => {
                    cur.bump();
                }
                Some(_) => break Ok(Some((TokenKind::Whitespace, cur.pos))),
                None => {
                    break if closed {
                        Ok(Some((TokenKind::Whitespace, cur.pos)))
                    } else {
                        Ok(None)
                    };
                }
            }
        },
        c => Err(SyntaxError::UnexpectedCharacter(c)),
    }
}

/// Scans a string literal (spec §4.3.2). Slices the unescaped run directly
/// from `s` when no escape is present; switches to an owned buffer on the
/// first `\`.
fn scan_string(
    cur: &mut Cursor,
    start: Position,
    closed: bool,
) -> Result<Option<(TokenKind, Position)>, SyntaxError> {
    let body_start = cur.pos.byte_offset;
    let mut buf: Option<String> = None;
    let mut pending_high_surrogate: Option<u16> = None;

    loop {
        let before_char = cur.pos.byte_offset;
        let Some(c) = cur.peek() else {
            return if closed {
                Err(SyntaxError::UnclosedString)
            } else {
                Ok(None)
            };
        };

        if pending_high_surrogate.is_some() && c != '\\' {
            return Err(SyntaxError::UnpairedSurrogate);
        }

        match c {
            '"' => {
                cur.bump();
                let text = match buf.take() {
                    Some(s) => s,
                    None => cur.s[body_start..before_char].to_string(),
                };
                return Ok(Some((TokenKind::Str(text), cur.pos)));
            }
            '\\' => {
                let buf = buf.get_or_insert_with(|| cur.s[body_start..before_char].to_string());
                cur.bump();
                let Some(escape_char) = cur.peek() else {
                    return if closed {
                        Err(SyntaxError::UnclosedString)
                    } else {
                        Ok(None)
                    };
                };
                if pending_high_surrogate.is_some() && escape_char != 'u' {
                    return Err(SyntaxError::UnpairedSurrogate);
                }
                match escape_char {
                    '"' => {
                        buf.push('"');
                        cur.bump();
                    }
                    '\\' => {
                        buf.push('\\');
                        cur.bump();
                    }
                    '/' => {
                        buf.push('/');
                        cur.bump();
                    }
                    'b' => {
                        buf.push('\u{8}');
                        cur.bump();
                    }
                    'f' => {
                        buf.push('\u{C}');
                        cur.bump();
                    }
                    'n' => {
                        buf.push('\n');
                        cur.bump();
                    }
                    'r' => {
                        buf.push('\r');
                        cur.bump();
                    }
                    't' => {
                        buf.push('\t');
                        cur.bump();
                    }
                    'u' => {
                        cur.bump();
                        let mut escape_buf = UnicodeEscapeBuffer::new();
                        let unit = loop {
                            let Some(h) = cur.peek() else {
                                return if closed {
                                    Err(SyntaxError::IncompleteUnicodeEscape)
                                } else {
                                    Ok(None)
                                };
                            };
                            match escape_buf.feed(h) {
                                Ok(Some(unit)) => {
                                    cur.bump();
                                    break unit;
                                }
                                Ok(None) => {
                                    cur.bump();
                                }
                                Err(e) => return Err(e),
                            }
                        };
                        if let Some(high) = pending_high_surrogate.take() {
                            match combine_surrogate_pair(high, unit) {
                                Some(ch) => buf.push(ch),
                                None => return Err(SyntaxError::UnpairedSurrogate),
                            }
                        } else if (0xD800..=0xDBFF).contains(&unit) {
                            pending_high_surrogate = Some(unit);
                        } else if (0xDC00..=0xDFFF).contains(&unit) {
                            return Err(SyntaxError::UnpairedSurrogate);
                        } else {
                            match char::from_u32(u32::from(unit)) {
                                Some(ch) => buf.push(ch),
                                None => return Err(SyntaxError::UnpairedSurrogate),
                            }
                        }
                    }
                    _ => return Err(SyntaxError::InvalidEscapeSequence),
                }
            }
            c if (c as u32) < 0x20 => return Err(SyntaxError::UnescapedControlCharacter),
            c => {
                cur.bump();
                if let Some(buf) = buf.as_mut() {
                    buf.push(c);
                }
            }
        }
    }
}

/// Consumes a run of ASCII digits. Returns `true` if the run ended at a
/// definite non-digit character (or end-of-input while `closed`), `false` if
/// it ran out of buffer and more digits might still follow.
fn consume_digits(cur: &mut Cursor, closed: bool) -> bool {
    loop {
        match cur.peek() {
            Some(d) if d.is_ascii_digit() => {
                cur.bump();
            }
            Some(_) => return true,
            None => return closed,
        }
    }
}

/// Scans a number (spec §4.3.3). `first` is the character dispatch already
/// consumed (`-` or a digit).
fn scan_number(
    cur: &mut Cursor,
    start: Position,
    first: char,
    closed: bool,
) -> Result<Option<(TokenKind, Position)>, SyntaxError> {
    let mut is_float = false;

    let first_digit = if first == '-' {
        let Some(d) = cur.peek() else {
            return if closed {
                Err(SyntaxError::MissingIntegerDigit)
            } else {
                Ok(None)
            };
        };
        if !d.is_ascii_digit() {
            return Err(SyntaxError::MissingIntegerDigit);
        }
        cur.bump();
        d
    } else {
        first
    };

    if first_digit == '0' {
        match cur.peek() {
            Some(d) if d.is_ascii_digit() => return Err(SyntaxError::LeadingZero),
            Some(_) => {}
            None => {
                if !closed {
                    return Ok(None);
                }
            }
        }
    } else if !consume_digits(cur, closed) {
        return Ok(None);
    }

    if cur.peek() == Some('.') {
        cur.bump();
        match cur.peek() {
            Some(d) if d.is_ascii_digit() => {}
            Some(_) => return Err(SyntaxError::MissingFractionDigit),
            None => {
                return if closed {
                    Err(SyntaxError::MissingFractionDigit)
                } else {
                    Ok(None)
                };
            }
        }
        is_float = true;
        if !consume_digits(cur, closed) {
            return Ok(None);
        }
    }

    if matches!(cur.peek(), Some('e' | 'E')) {
        cur.bump();
        is_float = true;
        if matches!(cur.peek(), Some('+' | '-')) {
            cur.bump();
        }
        match cur.peek() {
            Some(d) if d.is_ascii_digit() => {}
            Some(_) => return Err(SyntaxError::MissingExponentDigit),
            None => {
                return if closed {
                    Err(SyntaxError::MissingExponentDigit)
                } else {
                    Ok(None)
                };
            }
        }
        if !consume_digits(cur, closed) {
            return Ok(None);
        }
    }

    let lexeme = &cur.s[start.byte_offset..cur.pos.byte_offset];
    let number = Number::parse(lexeme, is_float)?;
    Ok(Some((TokenKind::Num(number), cur.pos)))
}

/// Scans `true`, `false`, or `null` (spec §4.3.4). `first` is the character
/// dispatch already consumed (`t`, `f`, or `n`).
fn scan_literal(
    cur: &mut Cursor,
    first: char,
    closed: bool,
) -> Result<Option<(TokenKind, Position)>, SyntaxError> {
    let mut buf = ExpectedLiteralBuffer::new(first);
    loop {
        let Some(c) = cur.peek() else {
            return if closed {
                Err(SyntaxError::IncompleteToken)
            } else {
                Ok(None)
            };
        };
        match buf.step(c) {
            Step::NeedMore => {
                cur.bump();
            }
            Step::Done(value) => {
                cur.bump();
                return Ok(Some((TokenKind::Lit(value), cur.pos)));
            }
            Step::Reject => return Err(SyntaxError::InvalidLiteral),
        }
    }
}
