/// Headless audio backend
///
/// Keeps per-source playback state in memory, so a match can be replayed
/// without audio hardware. [`RecordingBackend::new`] logs every call and keeps
/// one-shots playing until [`RecordingBackend::finish`] (tests).
/// [`RecordingBackend::headless`] logs nothing and ends one-shots after a
/// fixed number of frames (CLI dry runs).
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use super::backend::{AudioBackend, SoundBuffer, SourceHandle};
use crate::error::AudioError;
use crate::observer::Position;

/// One call made against the backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateSource(SourceHandle),
    RemoveSource(SourceHandle),
    Play {
        source: SourceHandle,
        sound: String,
        position: Position,
        looping: bool,
    },
    Stop(SourceHandle),
    SetPosition {
        source: SourceHandle,
        position: Position,
    },
    SetGain {
        source: SourceHandle,
        gain: f32,
    },
}

/// Snapshot of one source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceState {
    pub sound: Option<String>,
    pub looping: bool,
    pub position: Position,
    pub gain: f32,
    pub playing: bool,
}

impl Default for SourceState {
    fn default() -> Self {
        Self {
            sound: None,
            looping: false,
            position: Position::default(),
            gain: 1.0,
            playing: false,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    sources: BTreeMap<SourceHandle, SourceState>,
    calls: Vec<BackendCall>,
    missing: HashSet<String>,
    /// Frames left for one-shots that end on their own
    remaining: HashMap<SourceHandle, u32>,
}

#[derive(Debug)]
pub struct RecordingBackend {
    inner: Mutex<Inner>,
    log_calls: bool,
    one_shot_frames: Option<u32>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            log_calls: true,
            one_shot_frames: None,
        }
    }

    /// Backend without a call log whose one-shots stop playing after
    /// `one_shot_frames` ticks (at least one)
    pub fn headless(one_shot_frames: u32) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            log_calls: false,
            one_shot_frames: Some(one_shot_frames.max(1)),
        }
    }

    fn log(&self, inner: &mut Inner, call: BackendCall) {
        if self.log_calls {
            inner.calls.push(call);
        }
    }

    /// Backend for which the given sounds fail to resolve
    pub fn with_missing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = Self::new();
        for name in names {
            backend.mark_missing(name);
        }
        backend
    }

    pub fn mark_missing(&self, name: impl Into<String>) {
        self.inner.lock().missing.insert(name.into());
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Sounds passed to `play`, in order
    pub fn played_sounds(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Play { sound, .. } => Some(sound.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of `play` calls for `sound`
    pub fn play_count(&self, sound: &str) -> usize {
        self.played_sounds()
            .iter()
            .filter(|played| played.as_str() == sound)
            .count()
    }

    pub fn source(&self, source: SourceHandle) -> Option<SourceState> {
        self.inner.lock().sources.get(&source).cloned()
    }

    /// Sources currently allocated
    pub fn source_count(&self) -> usize {
        self.inner.lock().sources.len()
    }

    /// Sounds on sources that are still playing
    pub fn playing_sounds(&self) -> Vec<String> {
        self.inner
            .lock()
            .sources
            .values()
            .filter(|state| state.playing)
            .filter_map(|state| state.sound.clone())
            .collect()
    }

    /// Let a one-shot run to its end; loops keep playing
    pub fn finish(&self, source: SourceHandle) {
        if let Some(state) = self.inner.lock().sources.get_mut(&source) {
            if !state.looping {
                state.playing = false;
            }
        }
    }

    /// Let every playing one-shot run to its end
    pub fn finish_all(&self) {
        for state in self.inner.lock().sources.values_mut() {
            if !state.looping {
                state.playing = false;
            }
        }
    }
}

impl AudioBackend for RecordingBackend {
    fn create_source(&self) -> Result<SourceHandle, AudioError> {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let handle = SourceHandle(inner.next_id);
        inner.sources.insert(handle, SourceState::default());
        self.log(&mut inner, BackendCall::CreateSource(handle));
        Ok(handle)
    }

    fn remove_source(&self, source: SourceHandle) {
        let mut inner = self.inner.lock();
        inner.remaining.remove(&source);
        if inner.sources.remove(&source).is_some() {
            self.log(&mut inner, BackendCall::RemoveSource(source));
        }
    }

    fn play(
        &self,
        source: SourceHandle,
        buffer: &SoundBuffer,
        position: Position,
        looping: bool,
    ) -> Result<(), AudioError> {
        let mut inner = self.inner.lock();
        let state = inner
            .sources
            .get_mut(&source)
            .ok_or(AudioError::UnknownSource(source.0))?;
        state.sound = Some(buffer.name.clone());
        state.looping = looping;
        state.position = position;
        state.playing = true;

        match self.one_shot_frames {
            Some(frames) if !looping => inner.remaining.insert(source, frames),
            _ => inner.remaining.remove(&source),
        };
        self.log(
            &mut inner,
            BackendCall::Play {
                source,
                sound: buffer.name.clone(),
                position,
                looping,
            },
        );
        Ok(())
    }

    fn stop(&self, source: SourceHandle) {
        let mut inner = self.inner.lock();
        inner.remaining.remove(&source);
        if let Some(state) = inner.sources.get_mut(&source) {
            state.playing = false;
            self.log(&mut inner, BackendCall::Stop(source));
        }
    }

    fn is_playing(&self, source: SourceHandle) -> bool {
        self.inner
            .lock()
            .sources
            .get(&source)
            .map_or(false, |state| state.playing)
    }

    fn set_position(&self, source: SourceHandle, position: Position) {
        let mut inner = self.inner.lock();
        if let Some(state) = inner.sources.get_mut(&source) {
            state.position = position;
            self.log(&mut inner, BackendCall::SetPosition { source, position });
        }
    }

    fn set_gain(&self, source: SourceHandle, gain: f32) {
        let mut inner = self.inner.lock();
        if let Some(state) = inner.sources.get_mut(&source) {
            state.gain = gain;
            self.log(&mut inner, BackendCall::SetGain { source, gain });
        }
    }

    fn resolve_sound_buffer(&self, name: &str) -> Result<SoundBuffer, AudioError> {
        if self.inner.lock().missing.contains(name) {
            return Err(AudioError::SoundNotFound(name.to_string()));
        }
        Ok(SoundBuffer::new(name, Arc::new(Vec::new())))
    }

    fn begin_frame(&self) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.remaining.retain(|source, frames| {
            *frames = frames.saturating_sub(1);
            if *frames > 0 {
                return true;
            }
            if let Some(state) = inner.sources.get_mut(source) {
                state.playing = false;
            }
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(name: &str) -> SoundBuffer {
        SoundBuffer::new(name, Arc::new(Vec::new()))
    }

    #[test]
    fn test_play_and_finish() {
        let backend = RecordingBackend::new();
        let source = backend.create_source().unwrap();

        backend
            .play(source, &buffer("HitA.wav"), Position::new(10, 20), false)
            .unwrap();
        assert!(backend.is_playing(source));
        assert_eq!(backend.playing_sounds(), vec!["HitA.wav".to_string()]);

        backend.finish(source);
        assert!(!backend.is_playing(source));
    }

    #[test]
    fn test_loops_survive_finish() {
        let backend = RecordingBackend::new();
        let source = backend.create_source().unwrap();
        backend
            .play(source, &buffer("DASH.wav"), Position::default(), true)
            .unwrap();

        backend.finish_all();
        assert!(backend.is_playing(source));

        backend.stop(source);
        assert!(!backend.is_playing(source));
    }

    #[test]
    fn test_missing_sounds() {
        let backend = RecordingBackend::with_missing(["ROUNDSTART.wav"]);
        assert!(matches!(
            backend.resolve_sound_buffer("ROUNDSTART.wav"),
            Err(AudioError::SoundNotFound(_))
        ));
        assert!(backend.resolve_sound_buffer("LEFT.wav").is_ok());
    }

    #[test]
    fn test_play_on_removed_source_fails() {
        let backend = RecordingBackend::new();
        let source = backend.create_source().unwrap();
        backend.remove_source(source);

        let result = backend.play(source, &buffer("X.wav"), Position::default(), false);
        assert!(matches!(result, Err(AudioError::UnknownSource(_))));
        assert_eq!(backend.source_count(), 0);
    }

    #[test]
    fn test_headless_one_shot_ends_after_its_frames() {
        let backend = RecordingBackend::headless(2);
        let shot = backend.create_source().unwrap();
        let looped = backend.create_source().unwrap();
        backend
            .play(shot, &buffer("Border_Alert.wav"), Position::default(), false)
            .unwrap();
        backend
            .play(looped, &buffer("Heartbeat.wav"), Position::default(), true)
            .unwrap();

        backend.begin_frame();
        assert!(backend.is_playing(shot));
        backend.begin_frame();
        assert!(!backend.is_playing(shot));
        assert!(backend.is_playing(looped));

        // Replaying restarts the countdown
        backend
            .play(shot, &buffer("Border_Alert.wav"), Position::default(), false)
            .unwrap();
        backend.begin_frame();
        assert!(backend.is_playing(shot));
    }

    #[test]
    fn test_headless_keeps_no_call_log() {
        let backend = RecordingBackend::headless(1);
        let source = backend.create_source().unwrap();
        for x in 0..100 {
            backend.set_position(source, Position::new(x, 0));
        }
        backend
            .play(source, &buffer("DASH.wav"), Position::default(), true)
            .unwrap();

        assert!(backend.calls().is_empty());
        assert_eq!(backend.source(source).map(|s| s.position.x), Some(0));
        assert!(backend.is_playing(source));
    }

    #[test]
    fn test_begin_frame_leaves_recording_one_shots_alone() {
        let backend = RecordingBackend::new();
        let source = backend.create_source().unwrap();
        backend
            .play(source, &buffer("HitA.wav"), Position::default(), false)
            .unwrap();

        backend.begin_frame();
        assert!(backend.is_playing(source));
    }

    #[test]
    fn test_calls_are_recorded() {
        let backend = RecordingBackend::new();
        let source = backend.create_source().unwrap();
        backend.set_gain(source, 0.5);
        backend.set_position(source, Position::new(1, 2));
        backend.remove_source(source);

        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::CreateSource(source),
                BackendCall::SetGain { source, gain: 0.5 },
                BackendCall::SetPosition {
                    source,
                    position: Position::new(1, 2)
                },
                BackendCall::RemoveSource(source),
            ]
        );
    }
}
