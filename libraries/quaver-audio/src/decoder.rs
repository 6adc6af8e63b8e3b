//! Decoder capability and backend factory

use crate::decoders::SymphoniaDecoder;
use crate::error::Result;
use quaver_core::{DecoderKind, FileType, FormatInfo};
use std::path::Path;

/// Encoding tag for interleaved signed 16-bit little-endian PCM, the output
/// format every backend negotiates.
pub const ENCODING_PCM_S16LE: u32 = 1;

/// A streaming PCM decoder over one audio file.
///
/// After [`open`](Self::open), [`read`](Self::read) yields decoded bytes
/// starting at byte 0; seeks are byte-granular within the decoded stream.
pub trait Decoder: Send {
    /// Open a file for decoding. Subsequent reads begin at byte 0.
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Release the file resource. Idempotent.
    fn close(&mut self) -> Result<()>;

    /// Fill `buf` with decoded PCM bytes, interleaved channels.
    ///
    /// Returns the number of bytes filled; 0 signals end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// The negotiated PCM format. Valid after `open`.
    fn get_format(&self) -> Result<FormatInfo>;

    /// Restrict the decoder's output to the exact given format.
    fn set_format(&mut self, afi: &FormatInfo) -> Result<()>;

    /// Seek to an absolute decoded byte offset.
    fn seek_set(&mut self, offset: i64) -> Result<()>;

    /// Seek relative to the current decoded byte offset.
    fn seek_cur(&mut self, offset: i64) -> Result<()>;

    /// Seek relative to the end of the decoded stream.
    fn seek_end(&mut self, offset: i64) -> Result<()>;

    /// Current decoded byte offset, or -1 if no file is open.
    fn tell(&self) -> i64;

    /// Tag identifying the concrete backend.
    fn decoder_type(&self) -> DecoderKind;
}

/// Maps a file type to a decoder backend
pub struct DecoderFactory;

impl DecoderFactory {
    /// Create a decoder for the given file type; `Unknown` has none.
    pub fn create(filetype: FileType) -> Option<Box<dyn Decoder>> {
        match filetype {
            FileType::Mp3 | FileType::Flac | FileType::Ogg => {
                Some(Box::new(SymphoniaDecoder::new()))
            }
            FileType::Unknown => None,
        }
    }
}
