//! Concrete output backends

mod cpal_backend;

pub use cpal_backend::CpalOutput;
