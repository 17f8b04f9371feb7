/// Audio backend interface
///
/// The narrow set of capabilities the dispatcher needs from whatever actually
/// produces sound. Implementations use interior mutability so a single
/// backend can be shared by both player sides.
use std::fmt;
use std::sync::Arc;

use crate::error::AudioError;
use crate::observer::Position;

/// Opaque handle to one backend audio source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceHandle(pub u64);

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// Resolved, encoded sound data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundBuffer {
    pub name: String,
    pub data: Arc<Vec<u8>>,
}

impl SoundBuffer {
    pub fn new(name: impl Into<String>, data: Arc<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

pub trait AudioBackend {
    /// Allocate a new, silent source
    fn create_source(&self) -> Result<SourceHandle, AudioError>;

    /// Stop and release a source; unknown handles are ignored
    fn remove_source(&self, source: SourceHandle);

    /// Replace whatever the source is playing with `buffer`
    fn play(
        &self,
        source: SourceHandle,
        buffer: &SoundBuffer,
        position: Position,
        looping: bool,
    ) -> Result<(), AudioError>;

    fn stop(&self, source: SourceHandle);

    fn is_playing(&self, source: SourceHandle) -> bool;

    fn set_position(&self, source: SourceHandle, position: Position);

    fn set_gain(&self, source: SourceHandle, gain: f32);

    /// Look up a sound by name (e.g. `STAND_A.wav`)
    fn resolve_sound_buffer(&self, name: &str) -> Result<SoundBuffer, AudioError>;

    /// Called once per engine tick, before that tick's cues are applied
    fn begin_frame(&self) {}
}
