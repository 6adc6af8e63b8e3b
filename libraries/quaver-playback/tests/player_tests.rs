//! Player transport tests with stub decoder and output
//!
//! The stubs pace the pipeline the way a real blocking sink would, so the
//! worker stays alive long enough for transport commands to land.

use quaver_audio::{AudioError, Decoder};
use quaver_core::{DecoderKind, File, FileType, FormatInfo};
use quaver_output::Output;
use quaver_playback::{Player, PlaybackError, PlayerConfig};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// 800 kbps -> exactly 100_000 decoded bytes per second, keeping seek math
/// obvious and one 8192-byte chunk well under a second of audio
fn stub_format() -> FormatInfo {
    FormatInfo {
        rate: 25000,
        channels: 2,
        encoding: 1,
        bits: 16,
        is_signed: true,
        is_bigendian: false,
        frame_size: 4,
        bitrate: 800,
    }
}

/// Decoder yielding `total` zero bytes, recording byte-offset seeks
struct StubDecoder {
    total: i64,
    position: i64,
    open: bool,
    seeks: Arc<Mutex<Vec<i64>>>,
}

impl Decoder for StubDecoder {
    fn open(&mut self, _path: &Path) -> quaver_audio::Result<()> {
        self.open = true;
        self.position = 0;
        Ok(())
    }

    fn close(&mut self) -> quaver_audio::Result<()> {
        self.open = false;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> quaver_audio::Result<usize> {
        if !self.open {
            return Err(AudioError::NoFileOpen);
        }
        let remaining = (self.total - self.position).max(0) as usize;
        let count = buf.len().min(remaining);
        buf[..count].fill(0);
        self.position += count as i64;
        Ok(count)
    }

    fn get_format(&self) -> quaver_audio::Result<FormatInfo> {
        Ok(stub_format())
    }

    fn set_format(&mut self, _afi: &FormatInfo) -> quaver_audio::Result<()> {
        Ok(())
    }

    fn seek_set(&mut self, offset: i64) -> quaver_audio::Result<()> {
        self.position = offset.clamp(0, self.total);
        Ok(())
    }

    fn seek_cur(&mut self, offset: i64) -> quaver_audio::Result<()> {
        self.seeks.lock().unwrap().push(offset);
        self.position = (self.position + offset).clamp(0, self.total);
        Ok(())
    }

    fn seek_end(&mut self, offset: i64) -> quaver_audio::Result<()> {
        self.position = (self.total + offset).clamp(0, self.total);
        Ok(())
    }

    fn tell(&self) -> i64 {
        if self.open {
            self.position
        } else {
            -1
        }
    }

    fn decoder_type(&self) -> DecoderKind {
        DecoderKind::Symphonia
    }
}

/// Sink counting accepted bytes; each write blocks briefly like a real one
#[derive(Default)]
struct StubOutput {
    bytes_written: AtomicUsize,
    write_delay: Duration,
    paused: AtomicUsize,
    stopped: AtomicUsize,
}

impl Output for StubOutput {
    fn init(&self, _device_name: &str) -> quaver_output::Result<()> {
        Ok(())
    }

    fn exit(&self) -> quaver_output::Result<()> {
        Ok(())
    }

    fn open(&self, _afi: &FormatInfo) -> quaver_output::Result<()> {
        Ok(())
    }

    fn close(&self) -> quaver_output::Result<()> {
        Ok(())
    }

    fn write(&self, buf: &[u8]) -> quaver_output::Result<()> {
        if !self.write_delay.is_zero() {
            std::thread::sleep(self.write_delay);
        }
        self.bytes_written.fetch_add(buf.len(), Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> quaver_output::Result<()> {
        self.stopped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) -> quaver_output::Result<()> {
        self.paused.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn unpause(&self) -> quaver_output::Result<()> {
        Ok(())
    }

    fn change_device(&self, _device_name: &str) -> quaver_output::Result<()> {
        Ok(())
    }
}

fn test_file(length_seconds: i64) -> File {
    File {
        id: 1,
        dir_id: 1,
        filename: PathBuf::from("x.mp3"),
        fulldir_path: PathBuf::from("/music"),
        created_time: 0,
        modified_time: 0,
        title: "X".to_string(),
        album: String::new(),
        artist: String::new(),
        albumartist: String::new(),
        track_number: 1,
        disc_number: 1,
        year: 2020,
        genre: String::new(),
        length: length_seconds,
        bitrate: 800,
        filesize: 100_000 * length_seconds,
        filetype: FileType::Mp3,
    }
}

struct Rig {
    player: Player,
    output: Arc<StubOutput>,
    seeks: Arc<Mutex<Vec<i64>>>,
}

/// Player wired to stubs: `total` decoded bytes, per-write sink delay
fn rig(total: i64, write_delay: Duration) -> Rig {
    let output = Arc::new(StubOutput {
        write_delay,
        ..StubOutput::default()
    });
    let seeks: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));

    let seeks_for_factory = Arc::clone(&seeks);
    let player = Player::with_parts(
        PlayerConfig::default(),
        output.clone(),
        Box::new(move |filetype| {
            if filetype == FileType::Unknown {
                return None;
            }
            Some(Box::new(StubDecoder {
                total,
                position: 0,
                open: false,
                seeks: Arc::clone(&seeks_for_factory),
            }))
        }),
    );

    Rig {
        player,
        output,
        seeks,
    }
}

fn wait_until(timeout: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    predicate()
}

#[test]
fn play_requires_a_loaded_file() {
    let mut rig = rig(1000, Duration::ZERO);
    assert!(matches!(
        rig.player.play(),
        Err(PlaybackError::NoFileLoaded)
    ));
}

#[test]
fn load_rejects_unsupported_filetypes() {
    let mut rig = rig(1000, Duration::ZERO);

    let mut file = test_file(10);
    file.filetype = FileType::Unknown;
    assert!(matches!(
        rig.player.load(&file),
        Err(PlaybackError::DecoderNotFound(FileType::Unknown))
    ));
}

#[test]
fn worker_drains_the_decoder_into_the_output() {
    let total = 50_000;
    let mut rig = rig(total, Duration::ZERO);

    rig.player.init().unwrap();
    rig.player.load(&test_file(50)).unwrap();
    rig.player.play().unwrap();

    assert!(wait_until(Duration::from_secs(2), || !rig.player.is_playing()));
    assert_eq!(
        rig.output.bytes_written.load(Ordering::SeqCst),
        total as usize
    );

    // Drained worker cleared `active` on its own; stop is now invalid
    assert!(matches!(rig.player.stop(), Err(PlaybackError::NotActive)));
}

#[test]
fn transport_requires_active_playback() {
    let mut rig = rig(10_000_000, Duration::from_millis(5));

    assert!(matches!(rig.player.pause(), Err(PlaybackError::NotActive)));
    assert!(matches!(rig.player.stop(), Err(PlaybackError::NotActive)));
    assert!(matches!(rig.player.seek(1), Err(PlaybackError::NotActive)));
    assert_eq!(rig.player.current_tell_sec(), 0);
}

#[test]
fn pause_resume_debounce() {
    let mut rig = rig(10_000_000, Duration::from_millis(5));

    rig.player.load(&test_file(10_000)).unwrap();
    rig.player.play().unwrap();
    assert!(rig.player.is_playing());

    // First pause always lands
    rig.player.pause().unwrap();
    assert!(rig.player.is_paused());
    assert_eq!(rig.output.paused.load(Ordering::SeqCst), 1);

    // A resume inside the 200 ms window bounces
    assert!(matches!(rig.player.resume(), Err(PlaybackError::Cooldown)));
    assert!(rig.player.is_paused());

    std::thread::sleep(Duration::from_millis(220));
    rig.player.resume().unwrap();
    assert!(rig.player.is_playing());

    assert!(matches!(rig.player.resume(), Err(PlaybackError::NotPaused)));

    rig.player.stop().unwrap();
}

#[test]
fn paused_worker_writes_nothing() {
    let mut rig = rig(10_000_000, Duration::from_millis(2));

    rig.player.load(&test_file(10_000)).unwrap();
    rig.player.play().unwrap();
    rig.player.pause().unwrap();

    // Let any in-flight chunk finish, then watch for silence
    std::thread::sleep(Duration::from_millis(50));
    let frozen = rig.output.bytes_written.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(rig.output.bytes_written.load(Ordering::SeqCst), frozen);

    std::thread::sleep(Duration::from_millis(100));
    rig.player.resume().unwrap();
    assert!(wait_until(Duration::from_secs(1), || {
        rig.output.bytes_written.load(Ordering::SeqCst) > frozen
    }));

    rig.player.stop().unwrap();
}

#[test]
fn stop_joins_the_worker_and_halts_writes() {
    let mut rig = rig(10_000_000, Duration::from_millis(5));

    rig.player.load(&test_file(10_000)).unwrap();
    rig.player.play().unwrap();
    std::thread::sleep(Duration::from_millis(50));

    rig.player.stop().unwrap();
    assert!(!rig.player.is_playing());
    assert_eq!(rig.output.stopped.load(Ordering::SeqCst), 1);

    // No frames are written after stop returns
    let after = rig.output.bytes_written.load(Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(rig.output.bytes_written.load(Ordering::SeqCst), after);
}

#[test]
fn stopping_while_paused_wakes_the_worker() {
    let mut rig = rig(10_000_000, Duration::from_millis(2));

    rig.player.load(&test_file(10_000)).unwrap();
    rig.player.play().unwrap();
    rig.player.pause().unwrap();

    // Joins the worker out of its condvar wait
    rig.player.stop().unwrap();
    assert!(!rig.player.is_playing());
    assert!(!rig.player.is_paused());
}

#[test]
fn load_is_exclusive_with_active_playback() {
    let mut rig = rig(10_000_000, Duration::from_millis(5));

    let file = test_file(10_000);
    rig.player.load(&file).unwrap();
    rig.player.play().unwrap();

    assert!(matches!(
        rig.player.load(&file),
        Err(PlaybackError::AlreadyActive)
    ));
    assert!(matches!(rig.player.play(), Err(PlaybackError::AlreadyActive)));

    rig.player.stop().unwrap();
}

#[test]
fn seek_is_bounds_checked_and_byte_exact() {
    let mut rig = rig(10_000_000, Duration::from_millis(5));

    // 10-second track at 100_000 decoded bytes per second
    rig.player.load(&test_file(10)).unwrap();
    rig.player.play().unwrap();
    rig.player.pause().unwrap();

    // Past the end: rejected without touching the decoder
    assert!(matches!(
        rig.player.seek(1000),
        Err(PlaybackError::OffsetOutOfRange(_))
    ));
    assert!(rig.seeks.lock().unwrap().is_empty());

    // Before the start: same
    assert!(matches!(
        rig.player.seek(-5),
        Err(PlaybackError::OffsetOutOfRange(_))
    ));

    // +2 s from wherever the worker got to = exactly 200_000 bytes forward
    rig.player.seek(2).unwrap();
    assert_eq!(rig.seeks.lock().unwrap().as_slice(), &[200_000]);

    assert!(matches!(
        rig.player.seek_to(-1),
        Err(PlaybackError::OffsetOutOfRange(-1))
    ));
    assert!(matches!(
        rig.player.seek_to(11),
        Err(PlaybackError::OffsetOutOfRange(11))
    ));

    rig.player.seek_to(0).unwrap();
    assert_eq!(rig.player.current_tell_sec(), 0);

    rig.player.stop().unwrap();
}

#[test]
fn exit_stops_and_releases_everything() {
    let mut rig = rig(10_000_000, Duration::from_millis(5));

    rig.player.load(&test_file(10_000)).unwrap();
    rig.player.play().unwrap();

    rig.player.exit().unwrap();
    assert!(!rig.player.is_playing());
    assert!(rig.player.current_file().is_none());
}
