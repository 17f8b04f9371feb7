/// Engine frame snapshots
///
/// These mirror what the fighting game engine hands over every tick. They are
/// plain serde types so recorded matches can be replayed from JSON.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Player side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    P1,
    P2,
}

impl Side {
    /// Index into per-side arrays (`P1` = 0)
    pub fn index(&self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }

    /// The other side
    pub fn opponent(&self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }
}

impl Default for Side {
    fn default() -> Self {
        Side::P1
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::P1 => write!(f, "P1"),
            Side::P2 => write!(f, "P2"),
        }
    }
}

/// Coarse motion state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CharacterState {
    Stand,
    Crouch,
    Air,
    Down,
    /// Anything the engine reports that is not one of the above
    #[serde(other)]
    Unknown,
}

impl CharacterState {
    /// Airborne or knocked down; grabs do not connect in these states
    pub fn is_airborne_or_down(&self) -> bool {
        matches!(self, CharacterState::Air | CharacterState::Down)
    }
}

/// Axis-aligned box in stage coordinates (y grows downward)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitArea {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl HitArea {
    /// Integer midpoint of the box
    pub fn center(&self) -> (i32, i32) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }
}

/// Attack height categories as numbered by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackType {
    High,
    Middle,
    Low,
    Throw,
}

impl AttackType {
    /// Decode the engine's numeric attack type
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(AttackType::High),
            2 => Some(AttackType::Middle),
            3 => Some(AttackType::Low),
            4 => Some(AttackType::Throw),
            _ => None,
        }
    }
}

fn default_guardable() -> bool {
    true
}

/// Attack or projectile description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackData {
    /// Stable identity of a projectile across frames
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub current_hit_area: HitArea,
    /// 1 = high, 2 = middle, 3 = low, 4 = throw
    #[serde(default)]
    pub attack_type: u8,
    /// Knocks the defender down on hit
    #[serde(default)]
    pub down_prop: bool,
    #[serde(default = "default_guardable")]
    pub guardable: bool,
    /// Slot is unused (projectile expired or not yet spawned)
    #[serde(default)]
    pub empty_flag: bool,
}

impl AttackData {
    pub fn kind(&self) -> Option<AttackType> {
        AttackType::from_code(self.attack_type)
    }
}

/// Per-character slice of a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    pub hp: i32,
    pub energy: i32,
    pub x: i32,
    pub y: i32,
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
    pub speed_x: i32,
    pub speed_y: i32,
    pub state: CharacterState,
    /// Raw engine action name; parsed by the observer
    pub action: String,
    #[serde(default)]
    pub projectile_attack: Vec<AttackData>,
}

/// One engine tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    pub current_frame_number: u32,
    /// Indexed by [`Side::index`]
    pub character_data: Vec<CharacterData>,
}

impl FrameData {
    /// Character data for one side, if the engine provided it
    pub fn character(&self, side: Side) -> Option<&CharacterData> {
        self.character_data.get(side.index())
    }
}

/// "Attack landed" notification from the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub attacker: Side,
    pub attack: AttackData,
}
