/// Cue decision logic
///
/// Pure, backend-free side of the system: one [`CueStateMachine`] per side
/// turns frame observations into [`Cue`] decisions on logical [`Channel`]s.
/// Nothing here touches audio; the dispatcher in `audio_system` applies the
/// decisions.
///
/// ## Architecture
///
/// ```text
/// FrameObservation ──> CueStateMachine ──> Vec<Cue> ──> ChannelDispatcher
///                        ├── MotionLatches (attack / crouch / locomotion)
///                        ├── VitalityTracker (health bands)
///                        └── ProjectileSourceRegistry
/// ```
pub mod channel;
pub mod machine;
pub mod projectiles;
pub mod vitality;

// Re-export commonly used types
pub use channel::{Channel, Cue, CueCommand, SoundId};
pub use machine::{CueStateMachine, Direction, HitResponse, MotionLatches};
pub use projectiles::{ProjectileSourceRegistry, ProjectileSync};
pub use vitality::{
    Playback, VitalityBand, VitalityCue, VitalityPolicy, VitalitySlot, VitalityTracker,
};
