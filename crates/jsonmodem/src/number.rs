//! The tagged numeric value produced by the parser (spec §3 "Number"), and the
//! lexeme classification rules that choose a variant (spec §4.3.3).

use alloc::{
    format,
    string::{String, ToString},
};

use num_bigint::BigInt;

use crate::error::SyntaxError;

/// A parsed JSON number, widened to the smallest of four representations that
/// losslessly holds it (spec §3, §8 "Number classification").
///
/// Numbers with no fractional part or exponent are integers and are returned
/// as [`Number::Int32`], [`Number::Int64`], or [`Number::BigInt`] — whichever
/// is the narrowest of those three that fits. Numbers with a `.`, `e`, or `E`
/// are always returned as [`Number::Double`], per RFC 8259's observation that
/// JSON numbers are not required to round-trip losslessly through an IEEE-754
/// double.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    /// An integer lexeme whose value fits in a signed 32-bit integer.
    Int32(i32),
    /// An integer lexeme whose value fits in a signed 64-bit integer but not a
    /// 32-bit one.
    Int64(i64),
    /// An integer lexeme whose magnitude exceeds 64 bits.
    BigInt(BigInt),
    /// A lexeme containing `.`, `e`, or `E`, parsed as `f64`.
    Double(f64),
}

impl Number {
    /// Classify and parse a validated number lexeme (as produced by the
    /// tokenizer's number sub-parser; the grammar in spec §4.3.3 is assumed to
    /// already hold).
    pub(crate) fn parse(lexeme: &str, is_float: bool) -> Result<Self, SyntaxError> {
        if is_float {
            return lexeme
                .parse::<f64>()
                .map(Number::Double)
                .map_err(|e| SyntaxError::InvalidNumber(e.to_string()));
        }

        if let Ok(v) = lexeme.parse::<i32>() {
            return Ok(Number::Int32(v));
        }
        if let Ok(v) = lexeme.parse::<i64>() {
            return Ok(Number::Int64(v));
        }
        lexeme
            .parse::<BigInt>()
            .map(Number::BigInt)
            .map_err(|e| SyntaxError::InvalidNumber(e.to_string()))
    }

    /// Returns this number as an `f64`, widening integer variants (lossily for
    /// [`Number::BigInt`] beyond 2^53, as IEEE-754 allows).
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int32(v) => f64::from(*v),
            #[allow(clippy::cast_precision_loss)]
            Number::Int64(v) => *v as f64,
            Number::BigInt(v) => bigint_to_f64(v),
            Number::Double(v) => *v,
        }
    }

    /// Renders this number back into its canonical JSON textual form.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        match self {
            Number::Int32(v) => v.to_string(),
            Number::Int64(v) => v.to_string(),
            Number::BigInt(v) => v.to_string(),
            Number::Double(v) => format_double(*v),
        }
    }
}

fn bigint_to_f64(v: &BigInt) -> f64 {
    use num_traits::ToPrimitive;
    v.to_f64().unwrap_or(if v.sign() == num_bigint::Sign::Minus {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    })
}

/// Formats a finite `f64` the way JSON expects: always containing a `.` or an
/// exponent, matching `Number::to_json_string`'s promise that round-tripping
/// a double through the writer never turns it into an integer lexeme.
fn format_double(v: f64) -> String {
    if v.is_nan() || v.is_infinite() {
        // Not valid JSON; callers constructing events directly (rather than
        // via the parser) are responsible for not doing this. We still need a
        // total function, so fall back to `null`'s textual cousin.
        return "0".to_string();
    }
    let mut s = format!("{v}");
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    s
}
