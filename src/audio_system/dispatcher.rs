/// Channel dispatcher
///
/// Applies cue decisions to an [`AudioBackend`]. Each logical channel is bound
/// to at most one backend source: fixed channels get theirs on first use and
/// keep it for the match, projectile channels release theirs on stop.
use std::collections::HashMap;
use std::rc::Rc;

use super::backend::{AudioBackend, SourceHandle};
use crate::cues::{Channel, Cue, CueCommand};
use crate::error::AudioError;
use crate::game::Side;
use crate::messaging::{Event, EventBus};
use crate::observer::Position;

pub struct ChannelDispatcher {
    side: Side,
    backend: Rc<dyn AudioBackend>,
    sources: HashMap<Channel, SourceHandle>,
    event_bus: Option<EventBus>,
}

impl ChannelDispatcher {
    pub fn new(side: Side, backend: Rc<dyn AudioBackend>, event_bus: Option<EventBus>) -> Self {
        Self {
            side,
            backend,
            sources: HashMap::new(),
            event_bus,
        }
    }

    /// Source currently bound to `channel`
    pub fn source_of(&self, channel: &Channel) -> Option<SourceHandle> {
        self.sources.get(channel).copied()
    }

    pub fn is_playing(&self, channel: &Channel) -> bool {
        self.source_of(channel)
            .map_or(false, |source| self.backend.is_playing(source))
    }

    /// Number of live projectile sources
    pub fn projectile_source_count(&self) -> usize {
        self.sources.keys().filter(|c| c.is_projectile()).count()
    }

    /// Apply one tick's cues in order. Failures are logged and the affected
    /// cue dropped; nothing is retried.
    pub fn apply(&mut self, cues: Vec<Cue>, frame: u32) {
        for cue in cues {
            let Cue { channel, command } = cue;
            match command {
                CueCommand::Start {
                    sound,
                    position,
                    looping,
                    gain,
                    only_if_idle,
                } => {
                    if only_if_idle && self.is_playing(&channel) {
                        tracing::debug!("[{}] {} still playing, skipping {}", self.side, channel, sound);
                        continue;
                    }
                    if let Err(e) =
                        self.start(&channel, &sound, position, looping, gain, frame)
                    {
                        self.report_failure(&channel, &sound, e);
                    }
                }
                CueCommand::Stop => self.stop(channel, frame),
                CueCommand::Move { position } => {
                    if let Some(source) = self.source_of(&channel) {
                        self.backend.set_position(source, position);
                        tracing::trace!(
                            "[{}] {} moved to ({}, {})",
                            self.side,
                            channel,
                            position.x,
                            position.y
                        );
                    }
                }
            }
        }
    }

    fn start(
        &mut self,
        channel: &Channel,
        sound: &str,
        position: Position,
        looping: bool,
        gain: Option<f32>,
        frame: u32,
    ) -> Result<(), AudioError> {
        let buffer = self.backend.resolve_sound_buffer(sound)?;

        let source = match self.sources.get(channel) {
            Some(source) => *source,
            None => {
                let source = self.backend.create_source()?;
                self.sources.insert(channel.clone(), source);
                source
            }
        };

        if let Some(level) = gain {
            self.backend.set_gain(source, level);
        }
        self.backend.play(source, &buffer, position, looping)?;

        tracing::info!(
            "[{}] frame {}: {} {} on {} at ({}, {})",
            self.side,
            frame,
            if looping { "looping" } else { "playing" },
            sound,
            channel,
            position.x,
            position.y
        );
        self.publish(Event::CuePlayed {
            side: self.side,
            channel: channel.clone(),
            sound: sound.to_string(),
            frame,
        });
        Ok(())
    }

    fn stop(&mut self, channel: Channel, frame: u32) {
        if channel.is_projectile() {
            if let Some(source) = self.sources.remove(&channel) {
                self.backend.stop(source);
                self.backend.remove_source(source);
                tracing::info!("[{}] frame {}: released {}", self.side, frame, channel);
                self.publish(Event::CueStopped {
                    side: self.side,
                    channel,
                    frame,
                });
            }
            return;
        }

        // Idle ticks repeat the locomotion stop; only act on a playing source
        let Some(source) = self.source_of(&channel) else {
            return;
        };
        if !self.backend.is_playing(source) {
            return;
        }
        self.backend.stop(source);
        tracing::info!("[{}] frame {}: stopped {}", self.side, frame, channel);
        self.publish(Event::CueStopped {
            side: self.side,
            channel,
            frame,
        });
    }

    /// Stop and release every source this dispatcher holds
    pub fn release_all(&mut self) {
        for (channel, source) in self.sources.drain() {
            self.backend.stop(source);
            self.backend.remove_source(source);
            tracing::debug!("[{}] released {}", self.side, channel);
        }
    }

    fn report_failure(&self, channel: &Channel, sound: &str, error: AudioError) {
        match error {
            AudioError::SoundNotFound(_) => {
                tracing::warn!("[{}] sound {} not found, dropping cue on {}", self.side, sound, channel);
                self.publish(Event::SoundMissing {
                    side: self.side,
                    sound: sound.to_string(),
                });
            }
            other => {
                tracing::warn!("[{}] failed to play {} on {}: {}", self.side, sound, channel, other);
            }
        }
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}

impl Drop for ChannelDispatcher {
    fn drop(&mut self) {
        self.release_all();
    }
}
