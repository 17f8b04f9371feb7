/// Fighting game action identifiers
///
/// The engine reports the current action of each character as an upper-case
/// name. Motion cues are named after the action, so the enumeration keeps the
/// engine's spelling as its canonical name.
use std::fmt;
use std::str::FromStr;

macro_rules! actions {
    ($($variant:ident => $name:literal,)*) => {
        /// Discrete character action as reported by the engine
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Action {
            $($variant,)*
        }

        impl Action {
            /// Engine name of the action (e.g. `STAND_D_DF_FA`)
            pub fn name(&self) -> &'static str {
                match self {
                    $(Action::$variant => $name,)*
                }
            }
        }

        impl FromStr for Action {
            type Err = UnknownAction;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Action::$variant),)*
                    _ => Err(UnknownAction(s.to_string())),
                }
            }
        }
    };
}

actions! {
    Neutral => "NEUTRAL",
    Stand => "STAND",
    ForwardWalk => "FORWARD_WALK",
    Dash => "DASH",
    BackStep => "BACK_STEP",
    Crouch => "CROUCH",
    Jump => "JUMP",
    ForJump => "FOR_JUMP",
    BackJump => "BACK_JUMP",
    Air => "AIR",
    StandGuard => "STAND_GUARD",
    CrouchGuard => "CROUCH_GUARD",
    AirGuard => "AIR_GUARD",
    StandGuardRecov => "STAND_GUARD_RECOV",
    CrouchGuardRecov => "CROUCH_GUARD_RECOV",
    AirGuardRecov => "AIR_GUARD_RECOV",
    StandRecov => "STAND_RECOV",
    CrouchRecov => "CROUCH_RECOV",
    AirRecov => "AIR_RECOV",
    ChangeDown => "CHANGE_DOWN",
    Down => "DOWN",
    Rise => "RISE",
    Landing => "LANDING",
    ThrowA => "THROW_A",
    ThrowB => "THROW_B",
    ThrowHit => "THROW_HIT",
    ThrowSuffer => "THROW_SUFFER",
    StandA => "STAND_A",
    StandB => "STAND_B",
    CrouchA => "CROUCH_A",
    CrouchB => "CROUCH_B",
    AirA => "AIR_A",
    AirB => "AIR_B",
    AirDa => "AIR_DA",
    AirDb => "AIR_DB",
    StandFa => "STAND_FA",
    StandFb => "STAND_FB",
    CrouchFa => "CROUCH_FA",
    CrouchFb => "CROUCH_FB",
    AirFa => "AIR_FA",
    AirFb => "AIR_FB",
    AirUa => "AIR_UA",
    AirUb => "AIR_UB",
    StandDDfFa => "STAND_D_DF_FA",
    StandDDfFb => "STAND_D_DF_FB",
    StandFDDfa => "STAND_F_D_DFA",
    StandFDDfb => "STAND_F_D_DFB",
    StandDDbBa => "STAND_D_DB_BA",
    StandDDbBb => "STAND_D_DB_BB",
    AirDDfFa => "AIR_D_DF_FA",
    AirDDfFb => "AIR_D_DF_FB",
    AirFDDfa => "AIR_F_D_DFA",
    AirFDDfb => "AIR_F_D_DFB",
    AirDDbBa => "AIR_D_DB_BA",
    AirDDbBb => "AIR_D_DB_BB",
    StandDDfFc => "STAND_D_DF_FC",
}

/// Channel family an action belongs to
///
/// The groups are disjoint: every action maps to exactly one group, so at
/// most one motion channel reacts to a given action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionGroup {
    /// Idle stance or airborne neutral; clears the motion latches
    Neutral,
    /// Stance changes, jumps, throws and normal/special attacks
    Attack,
    /// Crouching
    Crouch,
    /// Walking, dashing and back-stepping (looped cue)
    Locomotion,
    /// Specials that launch a projectile
    ProjectileCast,
    /// Actions without an associated cue (guards, recoveries, knockdowns)
    Silent,
}

impl Action {
    /// Classify the action into its channel family
    pub fn group(&self) -> ActionGroup {
        use Action::*;

        match self {
            Stand | Air => ActionGroup::Neutral,
            Jump | ForJump | BackJump | ThrowA | ThrowB | ThrowHit | ThrowSuffer | StandA
            | StandB | CrouchA | CrouchB | AirA | AirB | AirDa | AirDb | StandFa | StandFb
            | CrouchFa | CrouchFb | AirFa | AirFb | AirUa | AirUb | StandFDDfa | StandFDDfb
            | StandDDbBa | StandDDbBb | AirFDDfa | AirFDDfb | AirDDbBa | AirDDbBb => {
                ActionGroup::Attack
            }
            Crouch => ActionGroup::Crouch,
            ForwardWalk | Dash | BackStep => ActionGroup::Locomotion,
            StandDDfFa | StandDDfFb | AirDDfFa | AirDDfFb | StandDDfFc => {
                ActionGroup::ProjectileCast
            }
            Neutral | StandGuard | CrouchGuard | AirGuard | StandGuardRecov
            | CrouchGuardRecov | AirGuardRecov | StandRecov | CrouchRecov | AirRecov
            | ChangeDown | Down | Rise | Landing => ActionGroup::Silent,
        }
    }

    /// Sound identifier for this action's cue (`NAME` + extension)
    pub fn sound_name(&self, extension: &str) -> String {
        format!("{}{}", self.name(), extension)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Action name the engine reported that this crate does not know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown action: {}", self.0)
    }
}

impl std::error::Error for UnknownAction {}
