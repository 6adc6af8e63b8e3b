//! Quaver Playback
//!
//! The playback layer of the Quaver music engine: an ordered [`PlayQueue`]
//! of files resolved from the metadata store, and a [`Player`] that drives a
//! decoder → output pipeline on a background worker thread with transport
//! controls (load, play, pause, resume, stop, seek).

#![forbid(unsafe_code)]

mod config;
mod error;
mod player;
mod queue;

pub use config::PlayerConfig;
pub use error::{PlaybackError, Result};
pub use player::{DecoderFactoryFn, Player};
pub use queue::PlayQueue;
