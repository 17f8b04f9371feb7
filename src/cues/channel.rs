/// Logical audio channels and the cue decisions issued on them
use std::fmt;

use super::vitality::VitalitySlot;
use crate::observer::Position;

/// Opaque sound key resolved by the backend (e.g. `STAND_A.wav`)
pub type SoundId = String;

/// Logical audio slot; at most one sound is bound to a channel at a time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Stance, attack and crouch one-shots
    Action,
    /// Walk / dash / back-step loop
    Locomotion,
    /// Landing thuds and hit/guard reactions
    Impact,
    EnergySurge,
    BorderLeft,
    BorderRight,
    Vitality(VitalitySlot),
    EnemySide,
    TimerWarning,
    RoundStart,
    /// Per-projectile loop, keyed by projectile identifier
    Projectile(String),
}

impl Channel {
    pub fn is_projectile(&self) -> bool {
        matches!(self, Channel::Projectile(_))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Action => write!(f, "action"),
            Channel::Locomotion => write!(f, "locomotion"),
            Channel::Impact => write!(f, "impact"),
            Channel::EnergySurge => write!(f, "energy-surge"),
            Channel::BorderLeft => write!(f, "border-left"),
            Channel::BorderRight => write!(f, "border-right"),
            Channel::Vitality(slot) => write!(f, "vitality-{}", slot),
            Channel::EnemySide => write!(f, "enemy-side"),
            Channel::TimerWarning => write!(f, "timer-warning"),
            Channel::RoundStart => write!(f, "round-start"),
            Channel::Projectile(id) => write!(f, "projectile[{}]", id),
        }
    }
}

/// What to do with a channel this tick
#[derive(Debug, Clone, PartialEq)]
pub enum CueCommand {
    /// Bind `sound` to the channel and play it
    Start {
        sound: SoundId,
        position: Position,
        looping: bool,
        gain: Option<f32>,
        /// Skip when the backend still reports the channel playing
        only_if_idle: bool,
    },
    /// Stop the channel; projectile channels are also released
    Stop,
    /// Re-center a (possibly playing) channel without replaying it
    Move { position: Position },
}

/// A single (channel, decision) pair produced by the state machine
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub channel: Channel,
    pub command: CueCommand,
}

impl Cue {
    pub fn one_shot(channel: Channel, sound: impl Into<SoundId>, position: Position) -> Self {
        Self::start(channel, sound.into(), position, false)
    }

    pub fn looped(channel: Channel, sound: impl Into<SoundId>, position: Position) -> Self {
        Self::start(channel, sound.into(), position, true)
    }

    fn start(channel: Channel, sound: SoundId, position: Position, looping: bool) -> Self {
        Self {
            channel,
            command: CueCommand::Start {
                sound,
                position,
                looping,
                gain: None,
                only_if_idle: false,
            },
        }
    }

    pub fn stop(channel: Channel) -> Self {
        Self {
            channel,
            command: CueCommand::Stop,
        }
    }

    pub fn move_to(channel: Channel, position: Position) -> Self {
        Self {
            channel,
            command: CueCommand::Move { position },
        }
    }

    /// Set the source gain before playing (no-op on stop/move)
    pub fn with_gain(mut self, level: f32) -> Self {
        if let CueCommand::Start { gain, .. } = &mut self.command {
            *gain = Some(level);
        }
        self
    }

    /// Only start when the channel is not already playing
    pub fn if_idle(mut self) -> Self {
        if let CueCommand::Start { only_if_idle, .. } = &mut self.command {
            *only_if_idle = true;
        }
        self
    }

    pub fn is_start(&self) -> bool {
        matches!(self.command, CueCommand::Start { .. })
    }

    pub fn is_stop(&self) -> bool {
        matches!(self.command, CueCommand::Stop)
    }

    /// Sound of a start cue
    pub fn sound(&self) -> Option<&str> {
        match &self.command {
            CueCommand::Start { sound, .. } => Some(sound.as_str()),
            _ => None,
        }
    }
}
