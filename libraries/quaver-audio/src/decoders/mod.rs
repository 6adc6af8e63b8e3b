//! Concrete decoder backends

mod symphonia_backend;

pub use symphonia_backend::SymphoniaDecoder;
