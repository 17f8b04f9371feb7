/// Per-frame audio cue dispatcher for two-player fighting games
///
/// Each engine tick is turned into a small set of cue decisions per player
/// side (start, keep, stop) and applied to an audio backend, without
/// re-triggering sounds that are already playing.
///
/// ## Architecture
///
/// ```text
/// FrameData ──> FrameObservation ──> CueStateMachine ──> ChannelDispatcher ──> AudioBackend
///   (game)        (observer)            (cues)            (audio_system)
///
/// MatchAudio
///   ├── CueHandler (P1) ─┐ hit_attack / run_action
///   └── CueHandler (P2) ─┘ cross-side calls
/// ```
pub mod audio_system;
pub mod config;
pub mod cues;
pub mod error;
pub mod game;
pub mod handler;
pub mod logging;
pub mod messaging;
pub mod observer;
pub mod replay;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use handler::CueHandler;
pub use session::MatchAudio;
