//! A streaming, push-driven JSON parser and writer.
//!
//! The parser holds no buffer proportional to document size: it consumes
//! bytes from caller-owned storage and calls back into a [`Handler`] the
//! moment each token completes. See [`StreamingParser`] for the entry
//! point and [`Writer`] for its serializing counterpart.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod bom;
mod byte_ring;
mod error;
mod escape;
mod event;
mod handler;
mod literal;
mod number;
mod options;
mod parser;
mod structural;
mod tokenizer;
mod writer;

pub use error::{ParserError, SyntaxError};
pub use event::{Event, Locator};
pub use handler::{Handler, NullHandler};
pub use number::Number;
pub use options::{Indent, IndentChar, ParserOptions, WriterOptions};
pub use parser::StreamingParser;
pub use writer::Writer;
