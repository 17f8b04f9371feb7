/// Match audio session
///
/// Owns both side handlers and routes the engine's three notifications to
/// them: frames, landed attacks and round ends.
use std::rc::Rc;
use std::sync::Arc;

use crate::audio_system::AudioBackend;
use crate::config::Config;
use crate::game::{FrameData, HitEvent, Side};
use crate::handler::CueHandler;
use crate::messaging::EventBus;
use crate::replay::ReplayRecord;

pub struct MatchAudio {
    config: Arc<Config>,
    backend: Rc<dyn AudioBackend>,
    handlers: [CueHandler; 2],
    rounds: u32,
}

impl MatchAudio {
    pub fn new(config: Config, backend: Rc<dyn AudioBackend>, event_bus: Option<EventBus>) -> Self {
        let config = Arc::new(config);
        let handler = |side| {
            CueHandler::new(side, Arc::clone(&config), Rc::clone(&backend), event_bus.clone())
        };
        let handlers = [handler(Side::P1), handler(Side::P2)];

        tracing::info!("Match audio ready (listener {})", config.listener);
        Self {
            config,
            backend,
            handlers,
            rounds: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handler(&self, side: Side) -> &CueHandler {
        &self.handlers[side.index()]
    }

    /// Completed rounds
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// One engine tick: P1 first, then P2
    pub fn on_frame(&mut self, frame: &FrameData) {
        self.backend.begin_frame();
        for handler in &mut self.handlers {
            handler.update(frame);
        }
    }

    /// An attack landed; the defender is the side opposite the attacker
    pub fn on_hit(&mut self, hit: &HitEvent) {
        let [p1, p2] = &mut self.handlers;
        let (defender, attacker) = match hit.attacker {
            Side::P1 => (p2, p1),
            Side::P2 => (p1, p2),
        };
        defender.hit_attack(&hit.attack, attacker);
    }

    pub fn on_round_end(&mut self) {
        for handler in &mut self.handlers {
            handler.reset();
        }
        self.rounds += 1;
        tracing::info!("Round {} finished", self.rounds);
    }

    /// Feed one recorded engine notification
    pub fn apply(&mut self, record: &ReplayRecord) {
        match record {
            ReplayRecord::Frame(frame) => self.on_frame(frame),
            ReplayRecord::Hit(hit) => self.on_hit(hit),
            ReplayRecord::RoundEnd => self.on_round_end(),
        }
    }
}
