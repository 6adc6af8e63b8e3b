//! Quaver Metadata
//!
//! Tag extraction for the Quaver music library engine, implemented with
//! `lofty`. The concrete parser is exposed through the
//! [`quaver_core::TagReader`] trait so the scanner never depends on it
//! directly.

#![forbid(unsafe_code)]

mod error;
mod reader;

pub use error::MetadataError;
pub use reader::LoftyTagReader;
