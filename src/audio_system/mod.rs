/// Audio system module
///
/// Everything between a cue decision and the speakers:
/// - The [`AudioBackend`] capability trait (sources, play/stop, position, gain)
/// - A headless [`RecordingBackend`] for dry runs and tests
/// - A rodio-backed [`RodioBackend`] (feature `playback`)
/// - The [`ChannelDispatcher`] binding logical channels to backend sources
///
/// ## Architecture
///
/// ```text
/// ChannelDispatcher (one per side)
///   ├── Action         ─┐
///   ├── Locomotion     ─┤
///   ├── Impact         ─┤ one source per channel,
///   ├── EnergySurge    ─┤ created on first use
///   ├── Border*        ─┤
///   ├── Vitality(slot) ─┤
///   ├── EnemySide / TimerWarning / RoundStart ─┘
///   └── Projectile(id) ── created on start, released on stop
///
///                 │
///                 ▼
///         Rc<dyn AudioBackend>  (shared by both sides)
/// ```
///
/// ## Usage
///
/// ```rust,ignore
/// let backend: Rc<dyn AudioBackend> = Rc::new(RecordingBackend::new());
/// let mut dispatcher = ChannelDispatcher::new(Side::P1, backend, None);
///
/// dispatcher.apply(machine.update(&observation), observation.frame_index);
/// ```
pub mod backend;
pub mod dispatcher;
pub mod recording;
#[cfg(feature = "playback")]
pub mod rodio_backend;

// Re-export commonly used types
pub use backend::{AudioBackend, SoundBuffer, SourceHandle};
pub use dispatcher::ChannelDispatcher;
pub use recording::{BackendCall, RecordingBackend, SourceState};
#[cfg(feature = "playback")]
pub use rodio_backend::RodioBackend;
