/// Real audio output through rodio
///
/// Each source is a `SpatialSink`; the stage x axis is mapped onto the
/// listener's ear axis so cues pan with the character that produced them.
use std::collections::HashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Source, SpatialSink};

use super::backend::{AudioBackend, SoundBuffer, SourceHandle};
use crate::error::AudioError;
use crate::observer::Position;

const LEFT_EAR: [f32; 3] = [-1.0, 0.0, 0.0];
const RIGHT_EAR: [f32; 3] = [1.0, 0.0, 0.0];

struct Voice {
    sink: SpatialSink,
    gain: f32,
    position: Position,
}

pub struct RodioBackend {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sound_dir: PathBuf,
    stage_width: i32,
    voices: Mutex<HashMap<SourceHandle, Voice>>,
    buffers: Mutex<HashMap<String, SoundBuffer>>,
    next_id: Mutex<u64>,
}

impl RodioBackend {
    /// Open the default output device
    pub fn new(sound_dir: impl Into<PathBuf>, stage_width: i32) -> Result<Self, AudioError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| AudioError::StreamInitFailed(Box::new(e)))?;
        let sound_dir = sound_dir.into();

        tracing::info!(
            "Audio output ready, loading sounds from {}",
            sound_dir.display()
        );

        Ok(Self {
            _stream: stream,
            stream_handle,
            sound_dir,
            stage_width: stage_width.max(1),
            voices: Mutex::new(HashMap::new()),
            buffers: Mutex::new(HashMap::new()),
            next_id: Mutex::new(0),
        })
    }

    /// Stage coordinates to emitter coordinates; x in [0, width] spans the
    /// ear axis, the emitter sits one unit in front of the listener
    fn emitter(&self, position: Position) -> [f32; 3] {
        let x = position.x.clamp(0, self.stage_width) as f32 / self.stage_width as f32;
        [x * 2.0 - 1.0, 0.0, 1.0]
    }

    fn new_sink(&self, position: Position) -> Result<SpatialSink, AudioError> {
        SpatialSink::try_new(&self.stream_handle, self.emitter(position), LEFT_EAR, RIGHT_EAR)
            .map_err(|e| AudioError::PlaybackFailed(Box::new(e)))
    }
}

impl AudioBackend for RodioBackend {
    fn create_source(&self) -> Result<SourceHandle, AudioError> {
        let position = Position::default();
        let sink = self.new_sink(position)?;

        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let handle = SourceHandle(*next_id);
        drop(next_id);

        self.voices.lock().insert(
            handle,
            Voice {
                sink,
                gain: 1.0,
                position,
            },
        );
        tracing::debug!("Created {}", handle);
        Ok(handle)
    }

    fn remove_source(&self, source: SourceHandle) {
        if let Some(voice) = self.voices.lock().remove(&source) {
            voice.sink.stop();
            tracing::debug!("Removed {}", source);
        }
    }

    fn play(
        &self,
        source: SourceHandle,
        buffer: &SoundBuffer,
        position: Position,
        looping: bool,
    ) -> Result<(), AudioError> {
        let decoder = Decoder::new(Cursor::new((*buffer.data).clone())).map_err(|e| {
            AudioError::DecodeFailed {
                name: buffer.name.clone(),
                source: Box::new(e),
            }
        })?;

        let decoded: Box<dyn Source<Item = i16> + Send> = if looping {
            Box::new(decoder.repeat_infinite())
        } else {
            Box::new(decoder)
        };

        // A stopped sink does not accept new sounds, so every play gets a fresh one
        let sink = self.new_sink(position)?;

        let mut voices = self.voices.lock();
        let voice = voices
            .get_mut(&source)
            .ok_or(AudioError::UnknownSource(source.0))?;
        voice.sink.stop();
        sink.set_volume(voice.gain);
        sink.append(decoded);
        sink.play();
        voice.sink = sink;
        voice.position = position;

        Ok(())
    }

    fn stop(&self, source: SourceHandle) {
        if let Some(voice) = self.voices.lock().get(&source) {
            voice.sink.stop();
        }
    }

    fn is_playing(&self, source: SourceHandle) -> bool {
        self.voices
            .lock()
            .get(&source)
            .map_or(false, |voice| !voice.sink.empty())
    }

    fn set_position(&self, source: SourceHandle, position: Position) {
        if let Some(voice) = self.voices.lock().get_mut(&source) {
            voice.sink.set_emitter_position(self.emitter(position));
            voice.position = position;
        }
    }

    fn set_gain(&self, source: SourceHandle, gain: f32) {
        if let Some(voice) = self.voices.lock().get_mut(&source) {
            voice.sink.set_volume(gain.max(0.0));
            voice.gain = gain.max(0.0);
        }
    }

    fn resolve_sound_buffer(&self, name: &str) -> Result<SoundBuffer, AudioError> {
        if let Some(buffer) = self.buffers.lock().get(name) {
            return Ok(buffer.clone());
        }

        let path = self.sound_dir.join(name);
        if !path.exists() {
            return Err(AudioError::SoundNotFound(name.to_string()));
        }
        let data = std::fs::read(&path).map_err(|e| AudioError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        tracing::info!("Loaded sound {} ({} bytes)", name, data.len());

        let buffer = SoundBuffer::new(name, Arc::new(data));
        self.buffers
            .lock()
            .insert(name.to_string(), buffer.clone());
        Ok(buffer)
    }
}
