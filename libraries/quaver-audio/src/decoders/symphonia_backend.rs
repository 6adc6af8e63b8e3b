//! Streaming decoder backend built on Symphonia
//!
//! Probes the container once on `open`, then decodes packets on demand into
//! an internal byte queue of interleaved signed 16-bit little-endian PCM.
//! Byte-granular seeks are translated to time positions via the decoded
//! stream's byte rate and delegated to the format reader.

use crate::decoder::{Decoder, ENCODING_PCM_S16LE};
use crate::error::{AudioError, Result};
use quaver_core::{DecoderKind, FormatInfo};
use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::{Time, TimeBase};

const OUTPUT_BITS: u16 = 16;

struct OpenState {
    format_reader: Box<dyn FormatReader>,
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
    track_id: u32,
    time_base: TimeBase,
    format: FormatInfo,
    /// Decoded bytes not yet handed to the caller
    pending: VecDeque<u8>,
    sample_buf: Option<SampleBuffer<i16>>,
    /// Byte offset of the next byte the caller will read
    position: i64,
    /// Total decoded stream length, when the container reports it
    total_bytes: Option<i64>,
    is_eof: bool,
}

/// Streaming Symphonia decoder producing interleaved s16le PCM
pub struct SymphoniaDecoder {
    state: Option<OpenState>,
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self { state: None }
    }

    fn state(&self) -> Result<&OpenState> {
        self.state.as_ref().ok_or(AudioError::NoFileOpen)
    }

    fn state_mut(&mut self) -> Result<&mut OpenState> {
        self.state.as_mut().ok_or(AudioError::NoFileOpen)
    }
}

impl Default for SymphoniaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenState {
    /// Decode the next packet into `pending`. Returns false at end of stream.
    fn decode_next_packet(&mut self) -> Result<bool> {
        if self.is_eof {
            return Ok(false);
        }

        loop {
            let packet = match self.format_reader.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.is_eof = true;
                    return Ok(false);
                }
                Err(e) => {
                    return Err(AudioError::Decode(format!("Error reading packet: {e}")));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = self
                .decoder
                .decode(&packet)
                .map_err(|e| AudioError::Decode(e.to_string()))?;

            let sample_buf = self.sample_buf.get_or_insert_with(|| {
                SampleBuffer::<i16>::new(decoded.capacity() as u64, *decoded.spec())
            });
            sample_buf.copy_interleaved_ref(decoded);

            for sample in sample_buf.samples() {
                self.pending.extend(sample.to_le_bytes());
            }

            return Ok(true);
        }
    }
}

impl Decoder for SymphoniaDecoder {
    fn open(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|e| AudioError::Open(e.to_string()))?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Open(format!("Failed to probe file: {e}")))?;

        let format_reader = probed.format;

        let track = format_reader
            .default_track()
            .ok_or_else(|| AudioError::Open("No audio tracks found".to_string()))?;

        let rate = track.codec_params.sample_rate.unwrap_or(44100);
        let channels = track
            .codec_params
            .channels
            .map(|c| c.count())
            .unwrap_or(2) as u16;
        let track_id = track.id;
        let time_base = track
            .codec_params
            .time_base
            .unwrap_or_else(|| TimeBase::new(1, rate));

        let frame_size = channels * (OUTPUT_BITS / 8);
        let format = FormatInfo {
            rate,
            channels,
            encoding: ENCODING_PCM_S16LE,
            bits: OUTPUT_BITS,
            is_signed: true,
            is_bigendian: false,
            frame_size,
            // Decoded PCM rate; keeps byte <-> second conversions exact
            bitrate: rate as i64 * channels as i64 * OUTPUT_BITS as i64 / 1000,
        };

        let total_bytes = track
            .codec_params
            .n_frames
            .map(|frames| frames as i64 * frame_size as i64);

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Open(format!("Failed to create decoder: {e}")))?;

        tracing::debug!(
            "Opened {}: {} Hz, {} ch, {} decoded bytes",
            path.display(),
            rate,
            channels,
            total_bytes.unwrap_or(-1)
        );

        self.state = Some(OpenState {
            format_reader,
            decoder,
            track_id,
            time_base,
            format,
            pending: VecDeque::new(),
            sample_buf: None,
            position: 0,
            total_bytes,
            is_eof: false,
        });

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state = None;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let state = self.state_mut()?;

        while state.pending.len() < buf.len() {
            if !state.decode_next_packet()? {
                break;
            }
        }

        let count = buf.len().min(state.pending.len());
        for slot in buf.iter_mut().take(count) {
            *slot = state.pending.pop_front().unwrap_or(0);
        }

        state.position += count as i64;
        Ok(count)
    }

    fn get_format(&self) -> Result<FormatInfo> {
        Ok(self.state()?.format)
    }

    fn set_format(&mut self, afi: &FormatInfo) -> Result<()> {
        let state = self.state()?;

        // The backend always emits its negotiated format; anything else is a
        // failed negotiation.
        if *afi != state.format {
            return Err(AudioError::Format(format!(
                "Requested format {} Hz / {} ch / {} bits not available",
                afi.rate, afi.channels, afi.bits
            )));
        }

        Ok(())
    }

    fn seek_set(&mut self, offset: i64) -> Result<()> {
        let state = self.state_mut()?;

        if offset < 0 {
            return Err(AudioError::Seek(format!(
                "Negative target offset: {offset}"
            )));
        }

        let byte_rate = state.format.byte_rate();
        let seconds = offset as f64 / byte_rate as f64;
        let time = Time::new(seconds.trunc() as u64, seconds.fract());

        let seeked = state
            .format_reader
            .seek(
                SeekMode::Coarse,
                SeekTo::Time {
                    time,
                    track_id: Some(state.track_id),
                },
            )
            .map_err(|e| AudioError::Seek(e.to_string()))?;

        state.decoder.reset();
        state.pending.clear();
        state.is_eof = false;

        let actual = state.time_base.calc_time(seeked.actual_ts);
        state.position =
            ((actual.seconds as f64 + actual.frac) * byte_rate as f64) as i64;

        Ok(())
    }

    fn seek_cur(&mut self, offset: i64) -> Result<()> {
        let position = self.state()?.position;
        self.seek_set(position + offset)
    }

    fn seek_end(&mut self, offset: i64) -> Result<()> {
        let total = self
            .state()?
            .total_bytes
            .ok_or_else(|| AudioError::Seek("Stream length unknown".to_string()))?;

        self.seek_set(total + offset)
    }

    fn tell(&self) -> i64 {
        match &self.state {
            Some(state) => state.position,
            None => -1,
        }
    }

    fn decoder_type(&self) -> DecoderKind {
        DecoderKind::Symphonia
    }
}
