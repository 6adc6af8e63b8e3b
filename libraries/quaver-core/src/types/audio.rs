/// PCM format description and audio backend tags
use serde::{Deserialize, Serialize};

/// Description of a negotiated PCM stream.
///
/// `frame_size` is `channels * bits / 8` bytes of interleaved samples;
/// `bitrate` is the decoded stream rate in kbps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatInfo {
    pub rate: u32,
    pub channels: u16,
    pub encoding: u32,
    pub bits: u16,
    pub is_signed: bool,
    pub is_bigendian: bool,
    pub frame_size: u16,
    pub bitrate: i64,
}

impl FormatInfo {
    /// Bytes of decoded PCM per second of audio.
    pub fn byte_rate(&self) -> i64 {
        self.bitrate * 1000 / 8
    }
}

/// Tag identifying a concrete decoder backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    Symphonia,
}

/// Output device selection, as exposed in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputDevice {
    #[default]
    Default,
    Pulse,
}

impl OutputDevice {
    /// Backend device name for this selection.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputDevice::Default => "default",
            OutputDevice::Pulse => "pulse",
        }
    }

    /// Parse a configured device name; unknown names are `None`.
    pub fn from_str(name: &str) -> Option<Self> {
        match name {
            "default" => Some(OutputDevice::Default),
            "pulse" => Some(OutputDevice::Pulse),
            _ => None,
        }
    }
}
