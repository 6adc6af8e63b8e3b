//! Quaver Audio
//!
//! The decoder capability of the Quaver playback engine. A [`Decoder`]
//! produces a lazy, finite, byte-granular stream of interleaved PCM from an
//! opened audio file, and supports absolute and relative seeking within the
//! decoded stream. One concrete backend is provided, built on Symphonia.

#![forbid(unsafe_code)]

mod decoder;
mod error;
pub mod decoders;

pub use decoder::{Decoder, DecoderFactory, ENCODING_PCM_S16LE};
pub use decoders::SymphoniaDecoder;
pub use error::{AudioError, Result};
