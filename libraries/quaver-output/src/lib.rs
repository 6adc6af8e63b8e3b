//! Quaver Output
//!
//! The audio output capability of the Quaver playback engine. An [`Output`]
//! is a PCM sink: it is configured with a negotiated [`FormatInfo`], accepts
//! interleaved byte frames from the playback worker, and supports pause,
//! resume, and stop from other threads while a write is in flight.
//!
//! One concrete backend is provided, built on cpal.
//!
//! [`FormatInfo`]: quaver_core::FormatInfo

#![forbid(unsafe_code)]

mod error;
mod output;
pub mod outputs;

pub use error::{OutputError, Result};
pub use output::{Output, FALLBACK_DEVICE};
pub use outputs::CpalOutput;
