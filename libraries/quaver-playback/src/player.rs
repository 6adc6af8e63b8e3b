//! Transport engine
//!
//! Orchestrates a decoder and an output sink on a background worker thread.
//! One mutex guards the decoder handle and loaded-file state; three atomic
//! flags (`active`, `paused`, `stopping`) let the worker observe transport
//! intent cheaply, with the authoritative check made under the mutex at the
//! top of every loop iteration. A condition variable wakes the worker out of
//! a pause. The output sink is internally synchronized, so the worker writes
//! to it outside the state mutex and `pause`/`stop` never wait behind a
//! blocking write.

use crate::config::PlayerConfig;
use crate::error::{PlaybackError, Result};
use quaver_audio::{Decoder, DecoderFactory};
use quaver_core::{File, FileType, FormatInfo};
use quaver_output::{CpalOutput, Output};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Bytes per decoder read in the playback loop
const BUFSIZE: usize = 8192;

/// Debounce window between pause/resume toggles
const TOGGLE_COOLDOWN: Duration = Duration::from_millis(200);

/// Creates a decoder for a file type; `None` means unsupported
pub type DecoderFactoryFn = Box<dyn Fn(FileType) -> Option<Box<dyn Decoder>> + Send + Sync>;

struct PlayerState {
    decoder: Option<Box<dyn Decoder>>,
    current_file: Option<File>,
    format: Option<FormatInfo>,
    last_toggle: Option<Instant>,
}

struct PlayerShared {
    state: Mutex<PlayerState>,
    unpaused: Condvar,
    active: AtomicBool,
    paused: AtomicBool,
    stopping: AtomicBool,
}

/// The playback engine.
///
/// States: `Idle` → (`load`) → `Ready` → (`play`) → `Playing` ↔
/// (`pause`/`resume`) `Paused`; `stop` returns to `Idle`. When the worker
/// drains the decoder it clears `active` on its own and the loaded file
/// remains ready for another `play`.
pub struct Player {
    config: PlayerConfig,
    shared: Arc<PlayerShared>,
    output: Arc<dyn Output>,
    factory: DecoderFactoryFn,
    worker: Option<JoinHandle<()>>,
}

impl Player {
    /// Create a player with the cpal sink and the standard decoder factory.
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(CpalOutput::new()),
            Box::new(DecoderFactory::create),
        )
    }

    /// Create a player from explicit collaborators.
    pub fn with_parts(
        config: PlayerConfig,
        output: Arc<dyn Output>,
        factory: DecoderFactoryFn,
    ) -> Self {
        Self {
            config,
            shared: Arc::new(PlayerShared {
                state: Mutex::new(PlayerState {
                    decoder: None,
                    current_file: None,
                    format: None,
                    last_toggle: None,
                }),
                unpaused: Condvar::new(),
                active: AtomicBool::new(false),
                paused: AtomicBool::new(false),
                stopping: AtomicBool::new(false),
            }),
            output,
            factory,
            worker: None,
        }
    }

    /// Initialize the output backend with the configured device.
    pub fn init(&self) -> Result<()> {
        self.output.init(self.config.device.as_str())?;
        Ok(())
    }

    /// Load a file: select a decoder for its type, open it, re-apply the
    /// negotiated format, and open the output sink with it.
    ///
    /// Exclusive with an active playback; `stop` first.
    pub fn load(&mut self, file: &File) -> Result<()> {
        if self.shared.active.load(Ordering::Acquire) {
            return Err(PlaybackError::AlreadyActive);
        }

        let mut state = self.shared.state.lock().unwrap();

        let candidate = (self.factory)(file.filetype)
            .ok_or(PlaybackError::DecoderNotFound(file.filetype))?;

        // Reuse the existing decoder when its backend matches
        let reuse = state
            .decoder
            .as_ref()
            .map(|d| d.decoder_type() == candidate.decoder_type())
            .unwrap_or(false);
        if !reuse {
            state.decoder = Some(candidate);
        }

        let decoder = state.decoder.as_mut().expect("decoder was just selected");

        let _ = decoder.close();
        decoder
            .open(&file.fullpath())
            .map_err(|e| PlaybackError::FailedToInitDecoder(e.to_string()))?;

        let afi = decoder
            .get_format()
            .map_err(|e| PlaybackError::FailedToInitDecoder(e.to_string()))?;
        decoder
            .set_format(&afi)
            .map_err(|e| PlaybackError::FailedToInitDecoder(e.to_string()))?;

        self.output.open(&afi)?;

        state.current_file = Some(file.clone());
        state.format = Some(afi);

        tracing::debug!(
            "Loaded {} ({} Hz, {} ch)",
            file.fullpath().display(),
            afi.rate,
            afi.channels
        );

        Ok(())
    }

    /// Start the playback worker.
    pub fn play(&mut self) -> Result<()> {
        if self.shared.active.load(Ordering::Acquire) {
            return Err(PlaybackError::AlreadyActive);
        }

        {
            let state = self.shared.state.lock().unwrap();
            if state.current_file.is_none() || state.decoder.is_none() {
                return Err(PlaybackError::NoFileLoaded);
            }
        }

        // Reap a worker that drained on its own
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        self.shared.stopping.store(false, Ordering::Release);
        self.shared.paused.store(false, Ordering::Release);
        self.shared.active.store(true, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let output = Arc::clone(&self.output);
        let handle = thread::Builder::new()
            .name("quaver-playback".to_string())
            .spawn(move || {
                playback_loop(&shared, output.as_ref());
            })
            .expect("Failed to spawn playback worker thread");

        self.worker = Some(handle);

        Ok(())
    }

    /// Suspend playback. Debounced against [`resume`](Self::resume) by a
    /// 200 ms cooldown.
    pub fn pause(&self) -> Result<()> {
        if !self.shared.active.load(Ordering::Acquire) {
            return Err(PlaybackError::NotActive);
        }
        if self.shared.paused.load(Ordering::Acquire) {
            return Err(PlaybackError::AlreadyPaused);
        }

        let mut state = self.shared.state.lock().unwrap();
        if in_cooldown(state.last_toggle) {
            return Err(PlaybackError::Cooldown);
        }

        self.output.pause()?;
        self.shared.paused.store(true, Ordering::Release);
        state.last_toggle = Some(Instant::now());

        Ok(())
    }

    /// Resume a paused playback. Debounced like [`pause`](Self::pause).
    pub fn resume(&self) -> Result<()> {
        if !self.shared.active.load(Ordering::Acquire) {
            return Err(PlaybackError::NotActive);
        }
        if !self.shared.paused.load(Ordering::Acquire) {
            return Err(PlaybackError::NotPaused);
        }

        let mut state = self.shared.state.lock().unwrap();
        if in_cooldown(state.last_toggle) {
            return Err(PlaybackError::Cooldown);
        }

        self.output.unpause()?;
        self.shared.paused.store(false, Ordering::Release);
        state.last_toggle = Some(Instant::now());
        drop(state);

        self.shared.unpaused.notify_all();

        Ok(())
    }

    /// Stop playback and join the worker. No frames reach the output after
    /// this returns.
    pub fn stop(&mut self) -> Result<()> {
        if !self.shared.active.load(Ordering::Acquire) {
            return Err(PlaybackError::NotActive);
        }

        self.shared.stopping.store(true, Ordering::Release);
        self.shared.paused.store(false, Ordering::Release);
        self.shared.active.store(false, Ordering::Release);

        self.output.stop()?;
        self.shared.unpaused.notify_all();

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        self.shared.stopping.store(false, Ordering::Release);

        Ok(())
    }

    /// Seek relative to the current position, in seconds.
    ///
    /// The target second is bounds-checked against the loaded file's length
    /// before the decoder moves.
    pub fn seek(&self, offset_seconds: i64) -> Result<()> {
        self.seek_impl(|current, _length| current + offset_seconds)
    }

    /// Seek to an absolute second, bounds-checked the same way.
    pub fn seek_to(&self, target_seconds: i64) -> Result<()> {
        self.seek_impl(|_current, _length| target_seconds)
    }

    fn seek_impl(&self, target: impl FnOnce(i64, i64) -> i64) -> Result<()> {
        if !self.shared.active.load(Ordering::Acquire) {
            return Err(PlaybackError::NotActive);
        }

        let mut state = self.shared.state.lock().unwrap();

        let format = state.format.ok_or(PlaybackError::NoFileLoaded)?;
        let length = state
            .current_file
            .as_ref()
            .map(|f| f.length)
            .ok_or(PlaybackError::NoFileLoaded)?;
        let byte_rate = format.byte_rate();

        let decoder = state.decoder.as_mut().ok_or(PlaybackError::NoFileLoaded)?;
        let current_second = decoder.tell() / byte_rate;
        let target_second = target(current_second, length);

        if target_second < 0 || target_second > length {
            return Err(PlaybackError::OffsetOutOfRange(target_second));
        }

        let byte_offset = (target_second - current_second) * byte_rate;
        decoder.seek_cur(byte_offset)?;

        Ok(())
    }

    /// Current playback position in whole seconds; 0 when inactive.
    pub fn current_tell_sec(&self) -> i64 {
        if !self.shared.active.load(Ordering::Acquire) {
            return 0;
        }

        let mut state = self.shared.state.lock().unwrap();

        let byte_rate = match state.format {
            Some(format) => format.byte_rate(),
            None => return 0,
        };

        match state.decoder.as_mut() {
            Some(decoder) => decoder.tell().max(0) / byte_rate,
            None => 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.shared.active.load(Ordering::Acquire) && !self.shared.paused.load(Ordering::Acquire)
    }

    pub fn is_paused(&self) -> bool {
        self.shared.active.load(Ordering::Acquire) && self.shared.paused.load(Ordering::Acquire)
    }

    /// The file loaded by the last successful [`load`](Self::load).
    pub fn current_file(&self) -> Option<File> {
        self.shared.state.lock().unwrap().current_file.clone()
    }

    /// Stop if active, release the decoder, and shut the output down.
    pub fn exit(&mut self) -> Result<()> {
        if self.shared.active.load(Ordering::Acquire) {
            let _ = self.stop();
        }

        {
            let mut state = self.shared.state.lock().unwrap();
            if let Some(decoder) = state.decoder.as_mut() {
                let _ = decoder.close();
            }
            state.decoder = None;
            state.current_file = None;
            state.format = None;
        }

        self.output.exit()?;
        Ok(())
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

fn in_cooldown(last_toggle: Option<Instant>) -> bool {
    last_toggle
        .map(|t| t.elapsed() < TOGGLE_COOLDOWN)
        .unwrap_or(false)
}

/// Worker loop: read a chunk under the state lock, write it outside.
///
/// `stop` is the only cancellation point; a pending `output.write` is not
/// preempted, the sink's own `stop` discards its frames instead.
fn playback_loop(shared: &PlayerShared, output: &dyn Output) {
    let mut buf = vec![0u8; BUFSIZE];

    loop {
        let mut state = shared.state.lock().unwrap();

        if shared.stopping.load(Ordering::Acquire) {
            break;
        }

        while shared.paused.load(Ordering::Acquire) && !shared.stopping.load(Ordering::Acquire) {
            state = shared.unpaused.wait(state).unwrap();
        }
        if shared.stopping.load(Ordering::Acquire) {
            break;
        }

        let Some(decoder) = state.decoder.as_mut() else {
            break;
        };

        let count = match decoder.read(&mut buf) {
            Ok(0) => break,
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Decoder read failed, ending playback: {}", e);
                break;
            }
        };
        drop(state);

        if let Err(e) = output.write(&buf[..count]) {
            tracing::warn!("Output write failed, ending playback: {}", e);
            break;
        }
    }

    shared.active.store(false, Ordering::Release);
}
