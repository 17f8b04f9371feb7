/// Cue state machine
///
/// Converts one side's per-frame observation into idempotent cue decisions,
/// remembering just enough of the previous frames to fire each cue once per
/// triggering edge instead of once per frame.
///
/// Per tick, in order:
///
/// 1. landing edge
/// 2. border proximity (listener side)
/// 3. vitality bands (listener side)
/// 4. energy surge
/// 5. enemy-side flip (listener side)
/// 6. timer warning and round start (listener side)
/// 7. motion/action cue
/// 8. locomotion stop / follow
/// 9. projectile lifecycle
///
/// Step 7 runs before step 8 because a neutral action clears the locomotion
/// latch that step 8 reads.
use std::sync::Arc;

use super::channel::{Channel, Cue, SoundId};
use super::projectiles::ProjectileSourceRegistry;
use super::vitality::VitalityTracker;
use crate::config::Config;
use crate::game::{is_guard, Action, ActionGroup, AttackData, AttackType, CharacterState, Side};
use crate::observer::{FrameObservation, Position};

/// Which way the opponent is, seen from this side's character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Last sound dispatched per motion channel
///
/// The three latches partition the action space: attack/stance (shared with
/// projectile casts), crouch and locomotion. `None` means nothing is latched,
/// so the next action of that family always fires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotionLatches {
    pub attack: Option<SoundId>,
    pub crouch: Option<SoundId>,
    pub locomotion: Option<SoundId>,
}

impl MotionLatches {
    pub fn clear(&mut self) {
        self.attack = None;
        self.crouch = None;
        self.locomotion = None;
    }
}

fn differs(latch: &Option<SoundId>, sound: &str) -> bool {
    latch.as_deref() != Some(sound)
}

/// Outcome of [`CueStateMachine::hit_attack`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitResponse {
    /// Cues for the defending side
    pub cues: Vec<Cue>,
    /// Motion cue to forward to the attacking side
    pub opponent_action: Option<Action>,
}

pub struct CueStateMachine {
    side: Side,
    config: Arc<Config>,
    latches: MotionLatches,
    previous_bottom: i32,
    previous_energy: i32,
    enemy_side: Option<Direction>,
    vitality: VitalityTracker,
    timer_warning_played: bool,
    round_start_played: bool,
    projectiles: ProjectileSourceRegistry,
}

impl CueStateMachine {
    pub fn new(side: Side, config: Arc<Config>) -> Self {
        let previous_bottom = config.stage.height;
        Self {
            side,
            config,
            latches: MotionLatches::default(),
            previous_bottom,
            previous_energy: 0,
            enemy_side: None,
            vitality: VitalityTracker::new(),
            timer_warning_played: false,
            round_start_played: false,
            projectiles: ProjectileSourceRegistry::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn latches(&self) -> &MotionLatches {
        &self.latches
    }

    pub fn projectiles(&self) -> &ProjectileSourceRegistry {
        &self.projectiles
    }

    pub fn timer_warning_played(&self) -> bool {
        self.timer_warning_played
    }

    pub fn round_start_played(&self) -> bool {
        self.round_start_played
    }

    fn is_listener(&self) -> bool {
        self.side == self.config.listener
    }

    /// Evaluate one frame; mutates the latches and returns this tick's cues
    pub fn update(&mut self, obs: &FrameObservation) -> Vec<Cue> {
        let mut cues = Vec::new();

        self.check_landing(obs, &mut cues);
        if self.is_listener() {
            self.check_border(obs, &mut cues);
            let center = self.config.stage_center();
            cues.extend(self.vitality.observe(
                &self.config.vitality,
                obs.me.hp,
                obs.frame_index,
                center,
            ));
        }
        self.check_energy(obs, &mut cues);
        if self.is_listener() {
            self.check_enemy_side(obs, &mut cues);
            self.check_timer(obs, &mut cues);
            self.check_round_start(obs, &mut cues);
        }

        if obs.me.state != CharacterState::Crouch {
            self.latches.crouch = None;
        }
        let pending_cast = match obs.me.action {
            Some(action) => self.motion_cue(action, obs.me.position, &mut cues),
            None => None,
        };

        self.check_locomotion(obs, &mut cues);
        self.sync_projectiles(obs, pending_cast.as_deref(), &mut cues);

        cues
    }

    /// Motion cue for `action` only, positioned at this side's character
    ///
    /// Entry point for cross-side reactions; none of the per-frame edge checks
    /// run.
    pub fn run_action(&mut self, action: Action, obs: &FrameObservation) -> Vec<Cue> {
        let mut cues = Vec::new();
        if let Some(cast) = self.motion_cue(action, obs.me.position, &mut cues) {
            self.sync_projectiles(obs, Some(cast.as_str()), &mut cues);
        }
        cues
    }

    /// Decide the reaction to an attack that landed on this side
    pub fn hit_attack(&mut self, attack: &AttackData, obs: &FrameObservation) -> HitResponse {
        let position = obs.me.position;
        let sounds = &self.config.sounds;

        if obs.me.action.map_or(false, |action| is_guard(action, attack)) {
            return HitResponse {
                cues: vec![Cue::one_shot(Channel::Impact, sounds.guard.clone(), position)],
                opponent_action: None,
            };
        }

        if attack.kind() == Some(AttackType::Throw) {
            if obs.me.state.is_airborne_or_down() {
                return HitResponse::default();
            }
            let opponent_action = match obs.opponent.action {
                Some(Action::ThrowSuffer) => None,
                _ => Some(Action::ThrowHit),
            };
            return HitResponse {
                cues: self.run_action(Action::ThrowSuffer, obs),
                opponent_action,
            };
        }

        let sound = if attack.down_prop {
            sounds.hit_knockdown.clone()
        } else {
            sounds.hit_normal.clone()
        };
        HitResponse {
            cues: vec![Cue::one_shot(Channel::Impact, sound, position)],
            opponent_action: None,
        }
    }

    /// Return every latch to its initial value; stops what this side still
    /// has running. Calling it twice in a row yields no cues the second time.
    pub fn reset(&mut self) -> Vec<Cue> {
        let mut cues = self.projectiles.reset();
        cues.extend(self.vitality.reset());
        if self.latches.locomotion.is_some() {
            cues.push(Cue::stop(Channel::Locomotion));
        }

        self.latches.clear();
        self.previous_bottom = self.config.stage.height;
        self.previous_energy = 0;
        self.enemy_side = None;
        self.timer_warning_played = false;
        self.round_start_played = false;

        tracing::info!("Reset {} cue state", self.side);
        cues
    }

    fn check_landing(&mut self, obs: &FrameObservation, cues: &mut Vec<Cue>) {
        let bottom = obs.me.bounds.bottom;
        if bottom >= self.config.stage.height && bottom != self.previous_bottom {
            cues.push(Cue::one_shot(
                Channel::Impact,
                self.config.sounds.landing.clone(),
                obs.me.position,
            ));
        }
        self.previous_bottom = bottom;
    }

    fn check_border(&self, obs: &FrameObservation, cues: &mut Vec<Cue>) {
        let policy = &self.config.border;
        let me = &obs.me;
        let any_motion = !policy.require_outward_motion;

        if me.bounds.left <= 0 && (any_motion || me.speed_x < 0) {
            cues.push(
                Cue::one_shot(Channel::BorderLeft, policy.left_sound.clone(), Position::new(0, 0))
                    .if_idle(),
            );
        } else if me.bounds.right >= self.config.stage.width && (any_motion || me.speed_x > 0) {
            cues.push(
                Cue::one_shot(
                    Channel::BorderRight,
                    policy.right_sound.clone(),
                    Position::new(self.config.stage.width, 0),
                )
                .if_idle(),
            );
        }
    }

    fn check_energy(&mut self, obs: &FrameObservation, cues: &mut Vec<Cue>) {
        let energy = obs.me.energy;
        if energy > self.previous_energy.saturating_add(self.config.energy_surge_delta) {
            self.previous_energy = energy;
            let home_edge = match self.side {
                Side::P1 => Position::new(0, 0),
                Side::P2 => Position::new(self.config.stage.width, 0),
            };
            cues.push(Cue::one_shot(
                Channel::EnergySurge,
                self.config.sounds.energy_charge.clone(),
                home_edge,
            ));
        }
    }

    fn check_enemy_side(&mut self, obs: &FrameObservation, cues: &mut Vec<Cue>) {
        let current = if obs.opponent.position.x < obs.me.position.x {
            Direction::Left
        } else {
            Direction::Right
        };

        match self.enemy_side {
            None => self.enemy_side = Some(current),
            Some(previous) if previous != current => {
                let sound = match current {
                    Direction::Left => self.config.sounds.enemy_left.clone(),
                    Direction::Right => self.config.sounds.enemy_right.clone(),
                };
                tracing::info!(
                    "Enemy switched side to {:?} on frame {}",
                    current,
                    obs.frame_index
                );
                cues.push(Cue::one_shot(Channel::EnemySide, sound, obs.me.position));
                self.enemy_side = Some(current);
            }
            Some(_) => {}
        }
    }

    fn check_timer(&mut self, obs: &FrameObservation, cues: &mut Vec<Cue>) {
        if self.timer_warning_played {
            return;
        }
        let remaining = self.config.match_frames.saturating_sub(obs.frame_index);
        if remaining <= self.config.timer_warning_frames {
            self.timer_warning_played = true;
            cues.push(Cue::one_shot(
                Channel::TimerWarning,
                self.config.sounds.timer_warning.clone(),
                self.config.stage_center(),
            ));
        }
    }

    fn check_round_start(&mut self, obs: &FrameObservation, cues: &mut Vec<Cue>) {
        if self.round_start_played {
            return;
        }
        self.round_start_played = true;

        if let Some(sound) = &self.config.sounds.round_start {
            if obs.frame_index < self.config.round_start_window_frames {
                cues.push(Cue::one_shot(
                    Channel::RoundStart,
                    sound.clone(),
                    self.config.stage_center(),
                ));
            }
        }
    }

    /// Motion cue for one action; returns the cast sound when the action
    /// launches a projectile that still needs a source
    fn motion_cue(
        &mut self,
        action: Action,
        position: Position,
        cues: &mut Vec<Cue>,
    ) -> Option<SoundId> {
        let sound = action.sound_name(&self.config.sound_extension);

        match action.group() {
            ActionGroup::Neutral => {
                self.latches.clear();
                None
            }
            ActionGroup::Attack => {
                if differs(&self.latches.attack, &sound) {
                    cues.push(Cue::one_shot(Channel::Action, sound.clone(), position));
                    self.latches.attack = Some(sound);
                }
                None
            }
            ActionGroup::Crouch => {
                self.latches.attack = None;
                if differs(&self.latches.crouch, &sound) {
                    cues.push(Cue::one_shot(Channel::Action, sound.clone(), position));
                    self.latches.crouch = Some(sound);
                }
                None
            }
            ActionGroup::Locomotion => {
                if differs(&self.latches.locomotion, &sound) {
                    cues.push(Cue::looped(Channel::Locomotion, sound.clone(), position));
                    self.latches.locomotion = Some(sound);
                }
                None
            }
            ActionGroup::ProjectileCast => {
                if differs(&self.latches.attack, &sound) {
                    Some(sound)
                } else {
                    None
                }
            }
            ActionGroup::Silent => None,
        }
    }

    fn check_locomotion(&mut self, obs: &FrameObservation, cues: &mut Vec<Cue>) {
        if obs.me.speed_x == 0 || obs.me.state == CharacterState::Air {
            self.latches.locomotion = None;
            cues.push(Cue::stop(Channel::Locomotion));
        } else {
            cues.push(Cue::move_to(Channel::Locomotion, obs.me.position));
        }
    }

    fn sync_projectiles(
        &mut self,
        obs: &FrameObservation,
        cast: Option<&str>,
        cues: &mut Vec<Cue>,
    ) {
        let outcome = self
            .projectiles
            .sync(&obs.projectiles, cast, obs.me.position);
        if outcome.registered.is_some() {
            self.latches.attack = cast.map(str::to_string);
        }
        cues.extend(outcome.cues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::channel::CueCommand;
    use crate::cues::vitality::VitalitySlot;
    use crate::observer::{Bounds, FighterView, ProjectileView};

    fn fighter(x: i32, action: Action) -> FighterView {
        FighterView {
            position: Position::new(x, 537),
            bounds: Bounds {
                left: x - 20,
                right: x + 20,
                top: 435,
                bottom: 640,
            },
            speed_x: 0,
            speed_y: 0,
            hp: 400,
            energy: 0,
            state: CharacterState::Stand,
            action: Some(action),
        }
    }

    fn observation(frame_index: u32) -> FrameObservation {
        FrameObservation {
            frame_index,
            side: Side::P1,
            me: fighter(200, Action::Stand),
            opponent: fighter(700, Action::Stand),
            projectiles: Vec::new(),
        }
    }

    fn machine() -> CueStateMachine {
        let mut config = Config::default();
        config.sounds.round_start = None;
        CueStateMachine::new(Side::P1, Arc::new(config))
    }

    fn starts(cues: &[Cue]) -> Vec<(Channel, String)> {
        cues.iter()
            .filter_map(|cue| cue.sound().map(|s| (cue.channel.clone(), s.to_string())))
            .collect()
    }

    fn starts_on(cues: &[Cue], channel: &Channel) -> usize {
        cues.iter()
            .filter(|cue| cue.is_start() && &cue.channel == channel)
            .count()
    }

    #[test]
    fn test_quiet_frame_emits_only_locomotion_stop() {
        let mut sm = machine();
        let cues = sm.update(&observation(10));
        assert_eq!(cues, vec![Cue::stop(Channel::Locomotion)]);
    }

    #[test]
    fn test_identical_frames_do_not_restart() {
        let mut sm = machine();
        let mut obs = observation(10);
        obs.me.action = Some(Action::StandA);
        obs.me.speed_x = 4;
        obs.me.energy = 80;

        let first = sm.update(&obs);
        assert_eq!(starts_on(&first, &Channel::Action), 1);
        assert_eq!(starts_on(&first, &Channel::EnergySurge), 1);

        let second = sm.update(&obs);
        assert!(second.iter().all(|cue| !cue.is_start()));
    }

    #[test]
    fn test_landing_fires_once_per_touchdown() {
        let mut sm = machine();
        let bottoms = [500, 640, 640, 520, 645];
        let mut landings = Vec::new();

        for (frame, bottom) in bottoms.iter().enumerate() {
            let mut obs = observation(frame as u32 + 100);
            obs.me.bounds.bottom = *bottom;
            let cues = sm.update(&obs);
            landings.push(starts_on(&cues, &Channel::Impact));
        }

        assert_eq!(landings, vec![0, 1, 0, 0, 1]);
    }

    #[test]
    fn test_grounded_at_round_start_is_silent() {
        let mut sm = machine();
        let cues = sm.update(&observation(0));
        assert_eq!(starts_on(&cues, &Channel::Impact), 0);
    }

    #[test]
    fn test_border_alerts_only_when_pushing_outward() {
        let mut sm = machine();

        let mut obs = observation(50);
        obs.me.bounds.left = 0;
        obs.me.speed_x = -3;
        let cues = sm.update(&obs);
        let alert = cues
            .iter()
            .find(|cue| cue.channel == Channel::BorderLeft)
            .expect("expected left border alert");
        assert!(matches!(
            alert.command,
            CueCommand::Start { only_if_idle: true, position: Position { x: 0, y: 0 }, .. }
        ));

        obs.me.speed_x = 3;
        let cues = sm.update(&obs);
        assert!(cues.iter().all(|cue| cue.channel != Channel::BorderLeft));

        let mut obs = observation(51);
        obs.me.bounds.right = 960;
        obs.me.speed_x = 5;
        let cues = sm.update(&obs);
        assert_eq!(starts_on(&cues, &Channel::BorderRight), 1);
    }

    #[test]
    fn test_energy_surge_resets_to_current_value() {
        let mut sm = machine();
        let energies = [30, 51, 90, 101, 102, 152];
        let surges: Vec<usize> = energies
            .iter()
            .enumerate()
            .map(|(frame, energy)| {
                let mut obs = observation(frame as u32 + 100);
                obs.me.energy = *energy;
                starts_on(&sm.update(&obs), &Channel::EnergySurge)
            })
            .collect();

        // 51 > 0 + 50 fires and records 51; 102 > 101 fires; 152 > 152 does not
        assert_eq!(surges, vec![0, 1, 0, 0, 1, 0]);
    }

    #[test]
    fn test_energy_surge_positioned_at_home_edge() {
        let config = Arc::new(Config::default());
        let mut p2 = CueStateMachine::new(Side::P2, config);
        let mut obs = observation(100);
        obs.side = Side::P2;
        obs.me.energy = 60;

        let cues = p2.update(&obs);
        let surge = cues
            .iter()
            .find(|cue| cue.channel == Channel::EnergySurge)
            .unwrap();
        assert!(matches!(
            surge.command,
            CueCommand::Start { position: Position { x: 960, y: 0 }, .. }
        ));
    }

    #[test]
    fn test_enemy_side_flip_sequence() {
        let mut sm = machine();
        let opponent_xs = [500, 600, 100, 50, 300];
        let flips: Vec<Vec<(Channel, String)>> = opponent_xs
            .iter()
            .enumerate()
            .map(|(frame, x)| {
                let mut obs = observation(frame as u32 + 100);
                obs.opponent.position.x = *x;
                starts(&sm.update(&obs))
                    .into_iter()
                    .filter(|(channel, _)| *channel == Channel::EnemySide)
                    .collect()
            })
            .collect();

        assert!(flips[0].is_empty());
        assert!(flips[1].is_empty());
        assert_eq!(flips[2], vec![(Channel::EnemySide, "LEFT.wav".to_string())]);
        assert!(flips[3].is_empty());
        assert_eq!(flips[4], vec![(Channel::EnemySide, "RIGHT.wav".to_string())]);
    }

    #[test]
    fn test_timer_warning_fires_once() {
        let mut sm = machine();
        let total: usize = (3290..3310)
            .map(|frame| starts_on(&sm.update(&observation(frame)), &Channel::TimerWarning))
            .sum();
        assert_eq!(total, 1);
        assert!(sm.timer_warning_played());

        sm.reset();
        assert!(!sm.timer_warning_played());
        let cues = sm.update(&observation(3400));
        assert_eq!(starts_on(&cues, &Channel::TimerWarning), 1);
    }

    #[test]
    fn test_round_start_once_per_round() {
        let mut sm = CueStateMachine::new(Side::P1, Arc::new(Config::default()));
        assert_eq!(starts_on(&sm.update(&observation(0)), &Channel::RoundStart), 1);
        assert_eq!(starts_on(&sm.update(&observation(1)), &Channel::RoundStart), 0);
        assert!(sm.round_start_played());

        sm.reset();
        // First observation of the new round arrives late: no cue, but latched
        assert_eq!(starts_on(&sm.update(&observation(500)), &Channel::RoundStart), 0);
        assert!(sm.round_start_played());
    }

    #[test]
    fn test_shared_cues_only_on_listener() {
        let mut p2 = CueStateMachine::new(Side::P2, Arc::new(Config::default()));
        let mut obs = observation(3500);
        obs.side = Side::P2;
        obs.me.hp = 10;
        obs.me.bounds.left = 0;
        obs.me.speed_x = -2;

        let cues = p2.update(&obs);
        assert!(cues.iter().all(|cue| !matches!(
            cue.channel,
            Channel::TimerWarning
                | Channel::RoundStart
                | Channel::BorderLeft
                | Channel::Vitality(_)
                | Channel::EnemySide
        )));
    }

    #[test]
    fn test_vitality_band_cues() {
        let mut sm = machine();
        let mut per_tick = Vec::new();
        for (frame, hp) in [250, 180, 180, 40, 210].iter().enumerate() {
            let mut obs = observation(frame as u32 + 100);
            obs.me.hp = *hp;
            let cues: Vec<Cue> = sm
                .update(&obs)
                .into_iter()
                .filter(|cue| matches!(cue.channel, Channel::Vitality(_)))
                .collect();
            per_tick.push(cues);
        }

        assert!(per_tick[0].is_empty());
        assert_eq!(per_tick[1].len(), 1);
        assert!(per_tick[2].is_empty());
        assert_eq!(per_tick[3].len(), 2);
        assert_eq!(
            per_tick[4],
            vec![Cue::stop(Channel::Vitality(VitalitySlot::Strain))]
        );
    }

    #[test]
    fn test_action_partition_latches() {
        let mut sm = machine();
        let mut obs = observation(100);

        obs.me.action = Some(Action::StandA);
        assert_eq!(starts(&sm.update(&obs)), vec![(Channel::Action, "STAND_A.wav".to_string())]);
        assert_eq!(sm.latches().attack.as_deref(), Some("STAND_A.wav"));

        // Crouching clears the attack latch and fires its own cue once
        obs.me.action = Some(Action::Crouch);
        obs.me.state = CharacterState::Crouch;
        assert_eq!(starts(&sm.update(&obs)), vec![(Channel::Action, "CROUCH.wav".to_string())]);
        assert!(sm.latches().attack.is_none());
        assert!(starts(&sm.update(&obs)).is_empty());

        // Same attack again after the crouch is not suppressed
        obs.me.action = Some(Action::StandA);
        obs.me.state = CharacterState::Stand;
        assert_eq!(starts(&sm.update(&obs)).len(), 1);
        assert!(sm.latches().crouch.is_none());
    }

    #[test]
    fn test_neutral_action_clears_latches() {
        let mut sm = machine();
        let mut obs = observation(100);
        obs.me.action = Some(Action::StandB);
        sm.update(&obs);

        obs.me.action = Some(Action::Stand);
        sm.update(&obs);
        assert_eq!(sm.latches(), &MotionLatches::default());

        obs.me.action = Some(Action::StandB);
        assert_eq!(starts(&sm.update(&obs)).len(), 1);
    }

    #[test]
    fn test_locomotion_loop_lifecycle() {
        let mut sm = machine();
        let mut obs = observation(100);
        obs.me.action = Some(Action::ForwardWalk);
        obs.me.speed_x = 5;

        let cues = sm.update(&obs);
        assert_eq!(
            cues,
            vec![
                Cue::looped(Channel::Locomotion, "FORWARD_WALK.wav", obs.me.position),
                Cue::move_to(Channel::Locomotion, obs.me.position),
            ]
        );

        obs.me.position.x += 5;
        let cues = sm.update(&obs);
        assert_eq!(cues, vec![Cue::move_to(Channel::Locomotion, obs.me.position)]);

        obs.me.speed_x = 0;
        let cues = sm.update(&obs);
        assert_eq!(cues, vec![Cue::stop(Channel::Locomotion)]);
        assert!(sm.latches().locomotion.is_none());

        // Walking resumes: loop restarts because the stop cleared the latch
        obs.me.speed_x = 5;
        assert_eq!(starts_on(&sm.update(&obs), &Channel::Locomotion), 1);
    }

    #[test]
    fn test_airborne_stops_locomotion() {
        let mut sm = machine();
        let mut obs = observation(100);
        obs.me.action = Some(Action::Dash);
        obs.me.speed_x = 9;
        sm.update(&obs);

        obs.me.state = CharacterState::Air;
        obs.me.action = Some(Action::Air);
        let cues = sm.update(&obs);
        assert!(cues.contains(&Cue::stop(Channel::Locomotion)));
    }

    #[test]
    fn test_unknown_action_skips_motion_only() {
        let mut sm = machine();
        let mut obs = observation(100);
        obs.me.action = None;
        obs.me.energy = 70;
        let cues = sm.update(&obs);
        assert_eq!(starts_on(&cues, &Channel::EnergySurge), 1);
        assert_eq!(starts_on(&cues, &Channel::Action), 0);
    }

    #[test]
    fn test_projectile_cast_lifecycle() {
        let mut sm = machine();
        let mut obs = observation(100);
        obs.me.action = Some(Action::StandDDfFa);

        // Cast animation before the projectile spawns: nothing yet
        let cues = sm.update(&obs);
        assert!(cues.iter().all(|cue| !cue.channel.is_projectile()));

        obs.projectiles = vec![ProjectileView {
            id: "fireball-1".into(),
            center: Position::new(260, 480),
        }];
        let cues = sm.update(&obs);
        let channel = Channel::Projectile("fireball-1".into());
        assert!(cues.contains(&Cue::looped(
            channel.clone(),
            "STAND_D_DF_FA.wav",
            obs.me.position
        )));
        assert_eq!(sm.latches().attack.as_deref(), Some("STAND_D_DF_FA.wav"));

        obs.projectiles[0].center = Position::new(300, 480);
        let cues = sm.update(&obs);
        assert!(cues.contains(&Cue::move_to(channel.clone(), Position::new(300, 480))));
        assert_eq!(sm.projectiles().len(), 1);

        obs.projectiles.clear();
        obs.me.action = Some(Action::Stand);
        let cues = sm.update(&obs);
        assert!(cues.contains(&Cue::stop(channel)));
        assert!(sm.projectiles().is_empty());
    }

    #[test]
    fn test_sustained_cast_registers_one_per_tick() {
        let mut sm = machine();
        let mut obs = observation(100);
        obs.me.action = Some(Action::AirDDfFb);
        obs.projectiles = (0..3)
            .map(|i| ProjectileView {
                id: format!("p{}", i),
                center: Position::new(300 + i, 400),
            })
            .collect();

        for _ in 0..4 {
            let cues = sm.update(&obs);
            let created = cues
                .iter()
                .filter(|cue| cue.channel.is_projectile() && cue.is_start())
                .count();
            assert!(created <= 1);
            assert!(sm.projectiles().len() <= obs.projectiles.len());
            // Clear the shared attack latch so the cast keeps registering
            obs.me.action = Some(Action::AirDDfFb);
            sm.latches.attack = None;
        }
        assert_eq!(sm.projectiles().len(), 3);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut sm = machine();
        let mut obs = observation(3400);
        obs.me.hp = 100;
        obs.me.action = Some(Action::ForwardWalk);
        obs.me.speed_x = 3;
        obs.projectiles = vec![ProjectileView {
            id: "x".into(),
            center: Position::new(0, 0),
        }];
        sm.update(&obs);
        obs.me.action = Some(Action::StandDDfFb);
        sm.update(&obs);

        let stops = sm.reset();
        assert!(stops.contains(&Cue::stop(Channel::Projectile("x".into()))));
        assert!(stops.contains(&Cue::stop(Channel::Vitality(VitalitySlot::Pulse))));
        assert!(stops.iter().all(Cue::is_stop));
        assert!(sm.reset().is_empty());
        assert_eq!(sm.latches(), &MotionLatches::default());
    }

    #[test]
    fn test_hit_reactions() {
        let mut sm = machine();
        let obs = observation(100);
        let mut attack = AttackData {
            identifier: String::new(),
            current_hit_area: Default::default(),
            attack_type: 2,
            down_prop: false,
            guardable: true,
            empty_flag: false,
        };

        let response = sm.hit_attack(&attack, &obs);
        assert_eq!(starts(&response.cues), vec![(Channel::Impact, "HitA.wav".to_string())]);

        attack.down_prop = true;
        let response = sm.hit_attack(&attack, &obs);
        assert_eq!(starts(&response.cues), vec![(Channel::Impact, "HitB.wav".to_string())]);

        let mut guarding = obs.clone();
        guarding.me.action = Some(Action::StandGuard);
        let response = sm.hit_attack(&attack, &guarding);
        assert_eq!(
            starts(&response.cues),
            vec![(Channel::Impact, "WeakGuard.wav".to_string())]
        );
        assert_eq!(response.opponent_action, None);
    }

    #[test]
    fn test_throw_forwards_throw_hit() {
        let mut sm = machine();
        let throw = AttackData {
            identifier: String::new(),
            current_hit_area: Default::default(),
            attack_type: 4,
            down_prop: false,
            guardable: false,
            empty_flag: false,
        };

        let obs = observation(100);
        let response = sm.hit_attack(&throw, &obs);
        assert_eq!(
            starts(&response.cues),
            vec![(Channel::Action, "THROW_SUFFER.wav".to_string())]
        );
        assert_eq!(response.opponent_action, Some(Action::ThrowHit));

        let mut opponent_suffering = observation(101);
        opponent_suffering.opponent.action = Some(Action::ThrowSuffer);
        sm.reset();
        let response = sm.hit_attack(&throw, &opponent_suffering);
        assert_eq!(response.cues.len(), 1);
        assert_eq!(response.opponent_action, None);

        let mut airborne = observation(102);
        airborne.me.state = CharacterState::Air;
        assert_eq!(sm.hit_attack(&throw, &airborne), HitResponse::default());
    }
}
