//! Incremental UTF-8 decoding (spec §4.2).
//!
//! `ByteRing` holds only the 0–3 trailing bytes of a multi-byte code point
//! that a `receive` call ended in the middle of; it never holds
//! document-sized state (spec §3 invariants).

use alloc::{string::String, vec::Vec};

use crate::error::SyntaxError;

/// Carries the possibly-incomplete tail of a UTF-8 sequence across
/// `receive` calls.
#[derive(Debug, Default)]
pub(crate) struct ByteRing {
    pending: Vec<u8>,
}

impl ByteRing {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether a partial multi-byte sequence is being carried over.
    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Decodes as many complete characters as possible from
    /// `self.pending ++ input`, appending them to `out`. Any undecodable
    /// trailing bytes (an incomplete, but so-far-valid, multi-byte sequence)
    /// are retained in `self.pending` for the next call.
    pub(crate) fn decode_into(&mut self, input: &[u8], out: &mut String) -> Result<(), SyntaxError> {
        let mut stitched;
        let bytes: &[u8] = if self.pending.is_empty() {
            input
        } else {
            stitched = core::mem::take(&mut self.pending);
            stitched.extend_from_slice(input);
            &stitched
        };

        let mut i = 0;
        while i < bytes.len() {
            let b0 = bytes[i];
            if b0 < 0x80 {
                let start = i;
                while i < bytes.len() && bytes[i] < 0x80 {
                    i += 1;
                }
                // SAFETY: every byte in `start..i` was checked `< 0x80`, i.e.
                // is a valid one-byte UTF-8 scalar on its own.
                out.push_str(unsafe { core::str::from_utf8_unchecked(&bytes[start..i]) });
                continue;
            }

            let Some(len) = utf8_seq_len(b0) else {
                return Err(SyntaxError::InvalidUtf8(i));
            };

            if i + usize::from(len) > bytes.len() {
                validate_prefix(&bytes[i..]).map_err(|()| SyntaxError::InvalidUtf8(i))?;
                self.pending.extend_from_slice(&bytes[i..]);
                return Ok(());
            }

            let s = core::str::from_utf8(&bytes[i..i + usize::from(len)])
                .map_err(|_| SyntaxError::InvalidUtf8(i))?;
            out.push_str(s);
            i += usize::from(len);
        }
        Ok(())
    }

    /// Called from `close()`: any still-pending bytes mean the stream ended
    /// mid-codepoint, which is always an error.
    pub(crate) fn finish(&self) -> Result<(), SyntaxError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(SyntaxError::InvalidUtf8(0))
        }
    }
}

/// Expected total length of the UTF-8 sequence starting with leading byte
/// `b0`, or `None` if `b0` cannot start a sequence (a continuation byte, or
/// one of the bytes 0xC0/0xC1/0xF5..=0xFF that can only appear in overlong or
/// out-of-range encodings).
fn utf8_seq_len(b0: u8) -> Option<u8> {
    match b0 {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Validates the 1–3 bytes of an as-yet-incomplete sequence against the
/// second/third-byte range restrictions that rule out overlong encodings,
/// surrogate code points, and code points beyond U+10FFFF — the same table
/// `core::str::from_utf8` applies once the full sequence is available, but
/// checked eagerly so a malformed prefix fails immediately rather than only
/// once (more) bytes arrive.
fn validate_prefix(bytes: &[u8]) -> Result<(), ()> {
    let b0 = bytes[0];
    if let Some(&b1) = bytes.get(1) {
        let ok = match b0 {
            0xE0 => (0xA0..=0xBF).contains(&b1),
            0xED => (0x80..=0x9F).contains(&b1),
            0xF0 => (0x90..=0xBF).contains(&b1),
            0xF4 => (0x80..=0x8F).contains(&b1),
            _ => (0x80..=0xBF).contains(&b1),
        };
        if !ok {
            return Err(());
        }
    }
    if let Some(&b2) = bytes.get(2) {
        if !(0x80..=0xBF).contains(&b2) {
            return Err(());
        }
    }
    Ok(())
}
