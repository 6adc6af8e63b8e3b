//! cpal-based PCM sink
//!
//! A dedicated audio thread owns the cpal `Stream` (it is not `Send`); the
//! public methods talk to it over a command channel and wait for a reply.
//! Decoded samples flow through a shared queue that the stream callback
//! drains; `write` blocks on a condition variable while the queue is full,
//! so pausing the stream also blocks the producer without dropping frames.

use crate::error::{OutputError, Result};
use crate::output::{Output, FALLBACK_DEVICE};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use quaver_core::FormatInfo;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Queue high-water mark, in seconds of audio
const QUEUE_SECONDS: usize = 1;

/// Upper bound on the drain wait during close
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Commands sent to the audio thread
enum SinkCommand {
    Open {
        format: FormatInfo,
        reply: Sender<Result<()>>,
    },
    Close {
        reply: Sender<Result<()>>,
    },
    Stop {
        reply: Sender<Result<()>>,
    },
    Pause {
        reply: Sender<Result<()>>,
    },
    Unpause {
        reply: Sender<Result<()>>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkState {
    /// No stream; `open` required
    Closed,
    /// Stream active, accepting frames
    Running,
    /// Stream halted, queued frames retained
    Paused,
}

struct SinkInner {
    queue: VecDeque<i16>,
    /// Queue high-water mark in samples; writers block above it
    capacity: usize,
    state: SinkState,
    device_name: String,
}

struct SinkShared {
    inner: Mutex<SinkInner>,
    space: Condvar,
}

struct Worker {
    command_tx: Sender<SinkCommand>,
    thread: JoinHandle<()>,
}

/// cpal audio output
pub struct CpalOutput {
    worker: Mutex<Option<Worker>>,
    shared: Arc<SinkShared>,
}

impl CpalOutput {
    pub fn new() -> Self {
        Self {
            worker: Mutex::new(None),
            shared: Arc::new(SinkShared {
                inner: Mutex::new(SinkInner {
                    queue: VecDeque::new(),
                    capacity: 0,
                    state: SinkState::Closed,
                    device_name: FALLBACK_DEVICE.to_string(),
                }),
                space: Condvar::new(),
            }),
        }
    }

    /// Send a command to the audio thread and wait for its reply.
    fn command(&self, make: impl FnOnce(Sender<Result<()>>) -> SinkCommand) -> Result<()> {
        let command_tx = {
            let worker = self.worker.lock().unwrap();
            worker
                .as_ref()
                .ok_or(OutputError::NotInitialized)?
                .command_tx
                .clone()
        };

        let (reply_tx, reply_rx) = bounded(1);
        command_tx
            .send(make(reply_tx))
            .map_err(|_| OutputError::BackendGone)?;

        reply_rx.recv().map_err(|_| OutputError::BackendGone)?
    }

    /// Audio thread main loop. Owns the cpal `Stream`.
    fn audio_thread_run(shared: Arc<SinkShared>, command_rx: Receiver<SinkCommand>) {
        let mut stream: Option<Stream> = None;

        while let Ok(cmd) = command_rx.recv() {
            match cmd {
                SinkCommand::Open { format, reply } => {
                    // Replacing an open stream discards it along with its queue
                    stream = None;
                    let result = Self::open_stream(&shared, &format).map(|s| {
                        stream = Some(s);
                    });
                    let _ = reply.send(result);
                }
                SinkCommand::Close { reply } => {
                    Self::drain(&shared);
                    stream = None;
                    let mut inner = shared.inner.lock().unwrap();
                    inner.queue.clear();
                    inner.state = SinkState::Closed;
                    drop(inner);
                    shared.space.notify_all();
                    let _ = reply.send(Ok(()));
                }
                SinkCommand::Stop { reply } => {
                    let result = Self::handle_stop(&shared, stream.as_ref());
                    let _ = reply.send(result);
                }
                SinkCommand::Pause { reply } => {
                    let result = Self::handle_pause(&shared, stream.as_ref());
                    let _ = reply.send(result);
                }
                SinkCommand::Unpause { reply } => {
                    let result = Self::handle_unpause(&shared, stream.as_ref());
                    let _ = reply.send(result);
                }
                SinkCommand::Shutdown => {
                    stream = None;
                    let mut inner = shared.inner.lock().unwrap();
                    inner.queue.clear();
                    inner.state = SinkState::Closed;
                    drop(inner);
                    shared.space.notify_all();
                    break;
                }
            }
        }
    }

    fn open_stream(shared: &Arc<SinkShared>, format: &FormatInfo) -> Result<Stream> {
        if format.bits != 16 || !format.is_signed || format.is_bigendian {
            return Err(OutputError::UnsupportedFormat(format!(
                "{} bits, signed: {}, big-endian: {}",
                format.bits, format.is_signed, format.is_bigendian
            )));
        }

        let device_name = shared.inner.lock().unwrap().device_name.clone();
        let device = Self::resolve_device(&device_name)?;

        let config = StreamConfig {
            channels: format.channels,
            sample_rate: cpal::SampleRate(format.rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let shared_cb = Arc::clone(shared);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    Self::fill_callback(data, &shared_cb);
                },
                |err| tracing::warn!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| OutputError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| OutputError::Stream(e.to_string()))?;

        let mut inner = shared.inner.lock().unwrap();
        inner.queue.clear();
        inner.capacity = QUEUE_SECONDS * format.rate as usize * format.channels as usize;
        inner.state = SinkState::Running;
        drop(inner);
        shared.space.notify_all();

        Ok(stream)
    }

    /// Resolve a device by name, falling back to the host default when the
    /// name is `default` or cannot be found.
    fn resolve_device(name: &str) -> Result<cpal::Device> {
        let host = cpal::default_host();

        if name != FALLBACK_DEVICE {
            if let Ok(mut devices) = host.output_devices() {
                if let Some(device) =
                    devices.find(|d| d.name().map(|n| n == name).unwrap_or(false))
                {
                    return Ok(device);
                }
            }
            tracing::warn!("Output device '{}' not found, using default", name);
        }

        host.default_output_device()
            .ok_or_else(|| OutputError::DeviceNotFound(name.to_string()))
    }

    /// Stream callback: drain queued samples, pad with silence.
    fn fill_callback(data: &mut [i16], shared: &SinkShared) {
        let mut inner = shared.inner.lock().unwrap();
        for slot in data.iter_mut() {
            *slot = inner.queue.pop_front().unwrap_or(0);
        }
        drop(inner);
        shared.space.notify_all();
    }

    fn handle_stop(shared: &SinkShared, stream: Option<&Stream>) -> Result<()> {
        let stream = stream.ok_or(OutputError::NotOpen)?;

        let mut inner = shared.inner.lock().unwrap();
        match inner.state {
            SinkState::Closed => return Err(OutputError::NotOpen),
            SinkState::Paused => {
                // Back to the prepared state: empty queue, clock running
                stream
                    .play()
                    .map_err(|e| OutputError::Stream(e.to_string()))?;
            }
            SinkState::Running => {}
        }
        inner.queue.clear();
        inner.state = SinkState::Running;
        drop(inner);
        shared.space.notify_all();

        Ok(())
    }

    fn handle_pause(shared: &SinkShared, stream: Option<&Stream>) -> Result<()> {
        let stream = stream.ok_or(OutputError::NotOpen)?;

        let mut inner = shared.inner.lock().unwrap();
        if inner.state != SinkState::Running {
            return Err(OutputError::InvalidState("pause requires a running sink"));
        }

        stream
            .pause()
            .map_err(|e| OutputError::Stream(e.to_string()))?;
        inner.state = SinkState::Paused;

        Ok(())
    }

    fn handle_unpause(shared: &SinkShared, stream: Option<&Stream>) -> Result<()> {
        let stream = stream.ok_or(OutputError::NotOpen)?;

        let mut inner = shared.inner.lock().unwrap();
        if inner.state != SinkState::Paused {
            return Err(OutputError::InvalidState("unpause requires a paused sink"));
        }

        stream
            .play()
            .map_err(|e| OutputError::Stream(e.to_string()))?;
        inner.state = SinkState::Running;
        drop(inner);
        shared.space.notify_all();

        Ok(())
    }

    /// Block until the queue has played out, bounded by [`DRAIN_TIMEOUT`].
    fn drain(shared: &SinkShared) {
        let deadline = std::time::Instant::now() + DRAIN_TIMEOUT;

        let mut inner = shared.inner.lock().unwrap();
        while inner.state == SinkState::Running
            && !inner.queue.is_empty()
            && std::time::Instant::now() < deadline
        {
            let (guard, _) = shared
                .space
                .wait_timeout(inner, Duration::from_millis(50))
                .unwrap();
            inner = guard;
        }
    }
}

impl Default for CpalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Output for CpalOutput {
    fn init(&self, device_name: &str) -> Result<()> {
        let mut worker = self.worker.lock().unwrap();
        if worker.is_some() {
            return Err(OutputError::InvalidState("already initialized"));
        }

        self.shared.inner.lock().unwrap().device_name = device_name.to_string();

        let (command_tx, command_rx) = bounded::<SinkCommand>(8);
        let shared = Arc::clone(&self.shared);
        let thread = thread::Builder::new()
            .name("quaver-audio-sink".to_string())
            .spawn(move || {
                Self::audio_thread_run(shared, command_rx);
            })
            .map_err(|e| OutputError::StreamBuild(e.to_string()))?;

        *worker = Some(Worker { command_tx, thread });

        Ok(())
    }

    fn exit(&self) -> Result<()> {
        let worker = self.worker.lock().unwrap().take();

        if let Some(worker) = worker {
            let _ = worker.command_tx.send(SinkCommand::Shutdown);
            let _ = worker.thread.join();
        }

        Ok(())
    }

    fn open(&self, afi: &FormatInfo) -> Result<()> {
        let format = *afi;
        self.command(move |reply| SinkCommand::Open { format, reply })
    }

    fn close(&self) -> Result<()> {
        self.command(|reply| SinkCommand::Close { reply })
    }

    fn write(&self, buf: &[u8]) -> Result<()> {
        let samples: Vec<i16> = buf
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();

        let mut inner = self.shared.inner.lock().unwrap();
        if inner.state == SinkState::Closed {
            return Err(OutputError::NotOpen);
        }

        let mut offset = 0;
        while offset < samples.len() {
            // Stop or close while blocked discards the rest of this chunk
            if inner.state == SinkState::Closed {
                break;
            }

            let space = inner.capacity.saturating_sub(inner.queue.len());
            if space == 0 {
                let (guard, _) = self
                    .shared
                    .space
                    .wait_timeout(inner, Duration::from_millis(100))
                    .unwrap();
                inner = guard;
                continue;
            }

            let take = space.min(samples.len() - offset);
            inner
                .queue
                .extend(samples[offset..offset + take].iter().copied());
            offset += take;
        }

        Ok(())
    }

    fn stop(&self) -> Result<()> {
        self.command(|reply| SinkCommand::Stop { reply })
    }

    fn pause(&self) -> Result<()> {
        self.command(|reply| SinkCommand::Pause { reply })
    }

    fn unpause(&self) -> Result<()> {
        self.command(|reply| SinkCommand::Unpause { reply })
    }

    fn change_device(&self, device_name: &str) -> Result<()> {
        self.shared.inner.lock().unwrap().device_name = device_name.to_string();
        Ok(())
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s16_format() -> FormatInfo {
        FormatInfo {
            rate: 44100,
            channels: 2,
            encoding: 1,
            bits: 16,
            is_signed: true,
            is_bigendian: false,
            frame_size: 4,
            bitrate: 44100 * 2 * 16 / 1000,
        }
    }

    #[test]
    fn open_requires_init() {
        let output = CpalOutput::new();
        assert!(matches!(
            output.open(&s16_format()),
            Err(OutputError::NotInitialized)
        ));
    }

    #[test]
    fn exit_is_idempotent() {
        let output = CpalOutput::new();
        output.exit().unwrap();
        output.exit().unwrap();
    }

    #[test]
    fn unsupported_formats_are_rejected() {
        let output = CpalOutput::new();
        output.init(FALLBACK_DEVICE).unwrap();

        let mut format = s16_format();
        format.bits = 24;
        // Format validation runs before any device is touched
        assert!(matches!(
            output.open(&format),
            Err(OutputError::UnsupportedFormat(_))
        ));

        output.exit().unwrap();
    }

    #[test]
    fn playback_lifecycle() {
        // Needs a real audio device; skip in headless environments
        let output = CpalOutput::new();
        output.init(FALLBACK_DEVICE).unwrap();

        match output.open(&s16_format()) {
            Ok(()) => {}
            Err(OutputError::DeviceNotFound(_)) | Err(OutputError::StreamBuild(_)) => {
                output.exit().unwrap();
                return;
            }
            Err(e) => panic!("Unexpected error: {e}"),
        }

        // A short burst of silence
        let silence = vec![0u8; 4410 * 4];
        output.write(&silence).unwrap();

        output.pause().unwrap();
        assert!(matches!(
            output.pause(),
            Err(OutputError::InvalidState(_))
        ));
        output.unpause().unwrap();
        assert!(matches!(
            output.unpause(),
            Err(OutputError::InvalidState(_))
        ));

        output.stop().unwrap();
        output.write(&silence).unwrap();

        output.close().unwrap();
        assert!(matches!(output.write(&silence), Err(OutputError::NotOpen)));

        output.exit().unwrap();
    }
}
