/// Per-side cue handler
///
/// Glues the observer, the cue state machine and the channel dispatcher for
/// one player side. This is the surface the engine drives: `update` once per
/// tick, `reset` at round boundaries, `hit_attack` on hit resolution.
use std::rc::Rc;
use std::sync::Arc;

use crate::audio_system::{AudioBackend, ChannelDispatcher};
use crate::config::Config;
use crate::cues::CueStateMachine;
use crate::game::{Action, AttackData, FrameData, Side};
use crate::messaging::{Event, EventBus};
use crate::observer::FrameObservation;

pub struct CueHandler {
    side: Side,
    machine: CueStateMachine,
    dispatcher: ChannelDispatcher,
    last_observation: Option<FrameObservation>,
    event_bus: Option<EventBus>,
}

impl CueHandler {
    pub fn new(
        side: Side,
        config: Arc<Config>,
        backend: Rc<dyn AudioBackend>,
        event_bus: Option<EventBus>,
    ) -> Self {
        Self {
            side,
            machine: CueStateMachine::new(side, config),
            dispatcher: ChannelDispatcher::new(side, backend, event_bus.clone()),
            last_observation: None,
            event_bus,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn machine(&self) -> &CueStateMachine {
        &self.machine
    }

    pub fn dispatcher(&self) -> &ChannelDispatcher {
        &self.dispatcher
    }

    /// Observation from the most recent `update` this round
    pub fn last_observation(&self) -> Option<&FrameObservation> {
        self.last_observation.as_ref()
    }

    /// Process one engine tick
    pub fn update(&mut self, frame: &FrameData) {
        let Some(observation) = FrameObservation::observe(frame, self.side) else {
            tracing::debug!(
                "Frame {} has no character data for {}, skipping",
                frame.current_frame_number,
                self.side
            );
            return;
        };

        let cues = self.machine.update(&observation);
        self.dispatcher.apply(cues, observation.frame_index);
        self.last_observation = Some(observation);
    }

    /// Round boundary: stop what is still running and return every latch to
    /// its initial value
    pub fn reset(&mut self) {
        let frame = self
            .last_observation
            .as_ref()
            .map_or(0, |obs| obs.frame_index);
        let cues = self.machine.reset();
        self.dispatcher.apply(cues, frame);
        self.last_observation = None;

        if let Some(bus) = &self.event_bus {
            bus.publish(Event::RoundReset { side: self.side });
        }
    }

    /// React to an attack that landed on this side
    ///
    /// Grabs also forward a throw-hit cue to `opponent` (the attacker). That
    /// call runs the opponent's motion cue only, never its per-frame checks.
    pub fn hit_attack(&mut self, attack: &AttackData, opponent: &mut CueHandler) {
        let Some(observation) = &self.last_observation else {
            tracing::debug!("{} hit before its first frame, ignoring", self.side);
            return;
        };

        let response = self.machine.hit_attack(attack, observation);
        self.dispatcher.apply(response.cues, observation.frame_index);

        if let Some(action) = response.opponent_action {
            tracing::debug!("{} grabbed, forwarding {} to {}", self.side, action, opponent.side);
            opponent.run_action(action);
        }
    }

    /// Motion cue for `action` at this side's last known position
    pub fn run_action(&mut self, action: Action) {
        let Some(observation) = &self.last_observation else {
            return;
        };
        let cues = self.machine.run_action(action, observation);
        self.dispatcher.apply(cues, observation.frame_index);
    }
}
