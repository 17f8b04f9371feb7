/// Game engine interface
///
/// Types the engine hands over each tick, plus the fighting-game rules the
/// cue logic needs (action families, guard resolution).
///
/// ## Architecture
///
/// ```text
/// FrameData ──> CharacterData x2 ──> projectile_attack: Vec<AttackData>
/// HitEvent  ──> attacker Side + AttackData
/// ```

pub mod action;
pub mod frame;

// Re-export commonly used types
pub use action::{Action, ActionGroup, UnknownAction};
pub use frame::{
    AttackData, AttackType, CharacterData, CharacterState, FrameData, HitArea, HitEvent, Side,
};

/// Whether the defender's current action guards the attack
///
/// High attacks are blocked by any guard, middle attacks by standing or
/// airborne guards, low attacks by crouching guards. Throws and unguardable
/// attacks always connect.
pub fn is_guard(defender_action: Action, attack: &AttackData) -> bool {
    if !attack.guardable {
        return false;
    }

    let standing = matches!(defender_action, Action::StandGuard | Action::StandGuardRecov);
    let crouching = matches!(defender_action, Action::CrouchGuard | Action::CrouchGuardRecov);
    let airborne = matches!(defender_action, Action::AirGuard | Action::AirGuardRecov);

    match attack.kind() {
        Some(AttackType::High) => standing || crouching || airborne,
        Some(AttackType::Middle) => standing || airborne,
        Some(AttackType::Low) => crouching,
        Some(AttackType::Throw) | None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack(attack_type: u8) -> AttackData {
        AttackData {
            identifier: String::new(),
            current_hit_area: HitArea::default(),
            attack_type,
            down_prop: false,
            guardable: true,
            empty_flag: false,
        }
    }

    #[test]
    fn test_guard_matrix() {
        assert!(is_guard(Action::StandGuard, &attack(1)));
        assert!(is_guard(Action::CrouchGuard, &attack(1)));
        assert!(is_guard(Action::StandGuard, &attack(2)));
        assert!(!is_guard(Action::CrouchGuard, &attack(2)));
        assert!(is_guard(Action::CrouchGuardRecov, &attack(3)));
        assert!(!is_guard(Action::StandGuard, &attack(3)));
        assert!(!is_guard(Action::StandGuard, &attack(4)));
    }

    #[test]
    fn test_no_guard_without_guard_action() {
        assert!(!is_guard(Action::StandA, &attack(1)));
        assert!(!is_guard(Action::Stand, &attack(2)));
    }

    #[test]
    fn test_unguardable_attack() {
        let mut unblockable = attack(1);
        unblockable.guardable = false;
        assert!(!is_guard(Action::StandGuard, &unblockable));
    }
}
