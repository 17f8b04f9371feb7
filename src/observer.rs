/// Frame observer
///
/// Extracts the audio-relevant slice of an engine frame for one side. Pure
/// read: nothing here keeps state between ticks.
use std::collections::HashSet;

use crate::game::{Action, CharacterData, CharacterState, FrameData, Side};

/// Stage coordinate of a cue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Bounding box edges of a character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// Active projectile as seen this tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectileView {
    pub id: String,
    /// Midpoint of the projectile's current hit area
    pub center: Position,
}

/// Audio-relevant state of one character
#[derive(Debug, Clone, PartialEq)]
pub struct FighterView {
    pub position: Position,
    pub bounds: Bounds,
    pub speed_x: i32,
    pub speed_y: i32,
    pub hp: i32,
    pub energy: i32,
    pub state: CharacterState,
    /// `None` when the engine reported an action name we do not know
    pub action: Option<Action>,
}

impl FighterView {
    fn from_character(data: &CharacterData) -> Self {
        let action = match data.action.parse::<Action>() {
            Ok(action) => Some(action),
            Err(e) => {
                tracing::debug!("{}; motion cues skipped this tick", e);
                None
            }
        };

        Self {
            position: Position::new(data.x, data.y),
            bounds: Bounds {
                left: data.left,
                right: data.right,
                top: data.top,
                bottom: data.bottom,
            },
            speed_x: data.speed_x,
            speed_y: data.speed_y,
            hp: data.hp,
            energy: data.energy,
            state: data.state,
            action,
        }
    }
}

/// Immutable per-tick snapshot from one side's point of view
#[derive(Debug, Clone, PartialEq)]
pub struct FrameObservation {
    pub frame_index: u32,
    pub side: Side,
    pub me: FighterView,
    pub opponent: FighterView,
    /// Non-empty projectiles owned by `me`, duplicates removed (first wins)
    pub projectiles: Vec<ProjectileView>,
}

impl FrameObservation {
    /// Build the observation for `side`
    ///
    /// Returns `None` when the frame lacks either character; the caller skips
    /// the tick.
    pub fn observe(frame: &FrameData, side: Side) -> Option<Self> {
        let me = frame.character(side)?;
        let opponent = frame.character(side.opponent())?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut projectiles = Vec::new();
        for attack in me.projectile_attack.iter().filter(|a| !a.empty_flag) {
            if !seen.insert(attack.identifier.as_str()) {
                tracing::debug!(
                    "Duplicate projectile id {} on frame {}; ignoring later entry",
                    attack.identifier,
                    frame.current_frame_number
                );
                continue;
            }
            let (x, y) = attack.current_hit_area.center();
            projectiles.push(ProjectileView {
                id: attack.identifier.clone(),
                center: Position::new(x, y),
            });
        }

        Some(Self {
            frame_index: frame.current_frame_number,
            side,
            me: FighterView::from_character(me),
            opponent: FighterView::from_character(opponent),
            projectiles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{AttackData, HitArea};

    fn character(x: i32, action: &str) -> CharacterData {
        CharacterData {
            hp: 400,
            energy: 0,
            x,
            y: 500,
            left: x - 20,
            right: x + 20,
            top: 400,
            bottom: 640,
            speed_x: 0,
            speed_y: 0,
            state: CharacterState::Stand,
            action: action.to_string(),
            projectile_attack: Vec::new(),
        }
    }

    fn projectile(id: &str, left: i32, empty: bool) -> AttackData {
        AttackData {
            identifier: id.to_string(),
            current_hit_area: HitArea {
                left,
                right: left + 40,
                top: 400,
                bottom: 420,
            },
            attack_type: 2,
            down_prop: false,
            guardable: true,
            empty_flag: empty,
        }
    }

    #[test]
    fn test_observe_sides() {
        let frame = FrameData {
            current_frame_number: 12,
            character_data: vec![character(100, "STAND"), character(700, "DASH")],
        };

        let p1 = FrameObservation::observe(&frame, Side::P1).unwrap();
        assert_eq!(p1.frame_index, 12);
        assert_eq!(p1.me.position, Position::new(100, 500));
        assert_eq!(p1.opponent.action, Some(Action::Dash));

        let p2 = FrameObservation::observe(&frame, Side::P2).unwrap();
        assert_eq!(p2.me.position.x, 700);
        assert_eq!(p2.opponent.action, Some(Action::Stand));
    }

    #[test]
    fn test_unknown_action_is_none() {
        let frame = FrameData {
            current_frame_number: 0,
            character_data: vec![character(100, "TELEPORT"), character(700, "STAND")],
        };
        let obs = FrameObservation::observe(&frame, Side::P1).unwrap();
        assert_eq!(obs.me.action, None);
    }

    #[test]
    fn test_missing_opponent() {
        let frame = FrameData {
            current_frame_number: 0,
            character_data: vec![character(100, "STAND")],
        };
        assert!(FrameObservation::observe(&frame, Side::P1).is_none());
    }

    #[test]
    fn test_projectiles_filtered_and_deduplicated() {
        let mut me = character(100, "STAND_D_DF_FA");
        me.projectile_attack = vec![
            projectile("a", 200, false),
            projectile("b", 300, true),
            projectile("a", 500, false),
            projectile("c", 400, false),
        ];
        let frame = FrameData {
            current_frame_number: 5,
            character_data: vec![me, character(700, "STAND")],
        };

        let obs = FrameObservation::observe(&frame, Side::P1).unwrap();
        let ids: Vec<&str> = obs.projectiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(obs.projectiles[0].center, Position::new(220, 410));
    }
}
