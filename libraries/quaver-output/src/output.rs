//! Output capability

use crate::error::Result;
use quaver_core::FormatInfo;

/// Device name every backend must be able to resolve when the configured
/// device fails to open.
pub const FALLBACK_DEVICE: &str = "default";

/// A PCM sink.
///
/// All methods take `&self`: implementations are internally synchronized so
/// `pause`, `unpause`, and `stop` may be called while another thread is
/// blocked in [`write`](Self::write).
pub trait Output: Send + Sync {
    /// Allocate backend resources. Must precede [`open`](Self::open).
    fn init(&self, device_name: &str) -> Result<()>;

    /// Release backend resources. Idempotent.
    fn exit(&self) -> Result<()>;

    /// Configure the sink for the given PCM format and transition to the
    /// prepared state. Falls back to [`FALLBACK_DEVICE`] when the configured
    /// device cannot be opened.
    fn open(&self, afi: &FormatInfo) -> Result<()>;

    /// Drain pending frames, then release the sink.
    fn close(&self) -> Result<()>;

    /// Write `buf.len() / frame_size` frames, blocking until the sink has
    /// accepted them. Frames queued when [`stop`](Self::stop) arrives are
    /// discarded rather than played.
    fn write(&self, buf: &[u8]) -> Result<()>;

    /// Discard pending frames and transition back to prepared.
    fn stop(&self) -> Result<()>;

    /// Suspend playback, keeping queued frames. Illegal unless running.
    fn pause(&self) -> Result<()>;

    /// Resume after [`pause`](Self::pause). Illegal unless paused.
    fn unpause(&self) -> Result<()>;

    /// Select the device used by the next [`open`](Self::open).
    fn change_device(&self, device_name: &str) -> Result<()>;
}
