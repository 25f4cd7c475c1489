//! Byte-order-mark sniffing (spec §4.1).
//!
//! Runs once, before any byte reaches the UTF-8 decoder. Consumes the UTF-8
//! BOM if present; rejects UTF-16/UTF-32 BOMs outright, since this crate only
//! speaks UTF-8 (spec §1 Non-goals).

use crate::error::SyntaxError;

/// Outcome of inspecting the leading bytes of a stream for a byte-order mark.
pub(crate) enum BomOutcome {
    /// A UTF-8 BOM was found; the caller should skip `len` bytes.
    ConsumeUtf8Bom { len: usize },
    /// No BOM is present (or none is possible for this prefix); proceed as
    /// UTF-8 without consuming anything.
    NoBom,
    /// Not enough bytes were available to decide; consume nothing and retry
    /// once more bytes arrive.
    NeedMoreInput,
}

/// Inspects up to the first four bytes of `input` and classifies them per the
/// table in spec §4.1. Never consumes more than the 3-byte UTF-8 BOM itself.
pub(crate) fn detect(input: &[u8]) -> Result<BomOutcome, SyntaxError> {
    match input {
        [0xEF, 0xBB, 0xBF, ..] => Ok(BomOutcome::ConsumeUtf8Bom { len: 3 }),
        [0xEF, 0xBB] | [0xEF] => Ok(BomOutcome::NeedMoreInput),

        [0xFE, 0xFF, ..] => Err(SyntaxError::Utf16NotSupported("BE")),
        [0xFE] => Ok(BomOutcome::NeedMoreInput),

        [0xFF, 0xFE, 0x00, 0x00, ..] => Err(SyntaxError::Utf32NotSupported("LE")),
        [0xFF, 0xFE] | [0xFF, 0xFE, 0x00] => Ok(BomOutcome::NeedMoreInput),
        [0xFF, 0xFE, ..] => Err(SyntaxError::Utf16NotSupported("LE")),
        [0xFF] => Ok(BomOutcome::NeedMoreInput),

        [0x00, 0x00, 0xFE, 0xFF, ..] => Err(SyntaxError::Utf32NotSupported("BE")),
        [0x00, 0x00, 0xFE] | [0x00, 0x00] | [0x00] => Ok(BomOutcome::NeedMoreInput),

        _ => Ok(BomOutcome::NoBom),
    }
}
