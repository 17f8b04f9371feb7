/// Event types for the application
///
/// Events represent things that have happened (past tense).
/// They are broadcast to all subscribers.
use crate::cues::Channel;
use crate::game::Side;

/// Cue lifecycle events
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A sound was started on a channel
    CuePlayed {
        side: Side,
        channel: Channel,
        sound: String,
        frame: u32,
    },

    /// A playing channel was stopped
    CueStopped {
        side: Side,
        channel: Channel,
        frame: u32,
    },

    /// A cue was dropped because its sound could not be resolved
    SoundMissing { side: Side, sound: String },

    /// A side's cue state went back to its round-start values
    RoundReset { side: Side },
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::CuePlayed {
                side,
                channel,
                sound,
                frame,
            } => format!("[{}] frame {}: {} on {}", side, frame, sound, channel),
            Event::CueStopped {
                side,
                channel,
                frame,
            } => format!("[{}] frame {}: stopped {}", side, frame, channel),
            Event::SoundMissing { side, sound } => {
                format!("[{}] missing sound {}", side, sound)
            }
            Event::RoundReset { side } => format!("[{}] round reset", side),
        }
    }

    pub fn side(&self) -> Side {
        match self {
            Event::CuePlayed { side, .. }
            | Event::CueStopped { side, .. }
            | Event::SoundMissing { side, .. }
            | Event::RoundReset { side } => *side,
        }
    }
}
