/// Health-band vitality cues
///
/// Health is partitioned into ordered bands. Each band maps to zero, one or
/// two cues (one per slot). On a band change the cues that are no longer valid
/// are stopped and the new ones started; a cue valid in both bands keeps
/// playing untouched.
use serde::{Deserialize, Serialize};
use std::fmt;

use super::channel::{Channel, Cue};
use crate::error::ConfigError;
use crate::observer::Position;

/// Concurrent vitality cue slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalitySlot {
    /// Heartbeat-style cue
    Pulse,
    /// Alarm-style cue for the lowest bands
    Strain,
}

impl fmt::Display for VitalitySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalitySlot::Pulse => write!(f, "pulse"),
            VitalitySlot::Strain => write!(f, "strain"),
        }
    }
}

/// How a vitality cue is played while its band is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Playback {
    /// One looping start on entry
    Loop,
    /// A one-shot every `every_frames` frames
    Pulse { every_frames: u32 },
}

fn default_gain() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalityCue {
    pub slot: VitalitySlot,
    pub sound: String,
    #[serde(default = "default_gain")]
    pub gain: f32,
    pub playback: Playback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalityBand {
    pub label: String,
    /// Exclusive upper health bound; `None` for the open top band
    pub below: Option<i32>,
    #[serde(default)]
    pub cues: Vec<VitalityCue>,
}

/// Ordered band table, lowest band first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalityPolicy {
    pub bands: Vec<VitalityBand>,
}

impl Default for VitalityPolicy {
    fn default() -> Self {
        Self::alarm_bands()
    }
}

impl VitalityPolicy {
    /// Beep loop below 50 HP, heartbeat loop below 200 HP, silence above
    pub fn alarm_bands() -> Self {
        Self {
            bands: vec![
                VitalityBand {
                    label: "critical".to_string(),
                    below: Some(50),
                    cues: vec![VitalityCue {
                        slot: VitalitySlot::Strain,
                        sound: "Beep.wav".to_string(),
                        gain: 0.5,
                        playback: Playback::Loop,
                    }],
                },
                VitalityBand {
                    label: "low".to_string(),
                    below: Some(200),
                    cues: vec![VitalityCue {
                        slot: VitalitySlot::Pulse,
                        sound: "Heartbeat.wav".to_string(),
                        gain: 3.0,
                        playback: Playback::Loop,
                    }],
                },
                VitalityBand {
                    label: "nominal".to_string(),
                    below: None,
                    cues: Vec::new(),
                },
            ],
        }
    }

    /// Heartbeat pulse that quickens at 200/150/100/50 HP, plus a strain loop
    /// in the critical band
    pub fn graded_pulse() -> Self {
        let pulse = |every_frames| VitalityCue {
            slot: VitalitySlot::Pulse,
            sound: "Heartbeat.wav".to_string(),
            gain: 3.0,
            playback: Playback::Pulse { every_frames },
        };
        let band = |label: &str, below, cues| VitalityBand {
            label: label.to_string(),
            below,
            cues,
        };

        Self {
            bands: vec![
                band(
                    "critical",
                    Some(50),
                    vec![
                        pulse(15),
                        VitalityCue {
                            slot: VitalitySlot::Strain,
                            sound: "Beep.wav".to_string(),
                            gain: 0.5,
                            playback: Playback::Loop,
                        },
                    ],
                ),
                band("danger", Some(100), vec![pulse(30)]),
                band("low", Some(150), vec![pulse(45)]),
                band("wounded", Some(200), vec![pulse(60)]),
                band("nominal", None, Vec::new()),
            ],
        }
    }

    /// Index of the band containing `hp`
    pub fn band_for(&self, hp: i32) -> usize {
        self.bands
            .iter()
            .position(|band| band.below.map_or(true, |below| hp < below))
            .unwrap_or_else(|| self.bands.len().saturating_sub(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let last = self
            .bands
            .len()
            .checked_sub(1)
            .ok_or_else(|| ConfigError::Invalid("vitality table has no bands".to_string()))?;

        let mut previous: Option<i32> = None;
        for (index, band) in self.bands.iter().enumerate() {
            match (band.below, index == last) {
                (None, true) => {}
                (None, false) => {
                    return Err(ConfigError::Invalid(format!(
                        "vitality band '{}' is unbounded but not last",
                        band.label
                    )))
                }
                (Some(_), true) => {
                    return Err(ConfigError::Invalid(
                        "last vitality band must be unbounded".to_string(),
                    ))
                }
                (Some(below), false) => {
                    if previous.map_or(false, |p| below <= p) {
                        return Err(ConfigError::Invalid(format!(
                            "vitality band '{}' bound {} is not ascending",
                            band.label, below
                        )));
                    }
                    previous = Some(below);
                }
            }

            for (i, cue) in band.cues.iter().enumerate() {
                if band.cues[..i].iter().any(|other| other.slot == cue.slot) {
                    return Err(ConfigError::Invalid(format!(
                        "vitality band '{}' uses slot {} twice",
                        band.label, cue.slot
                    )));
                }
                if cue.playback == (Playback::Pulse { every_frames: 0 }) {
                    return Err(ConfigError::Invalid(format!(
                        "vitality cue {} has a zero pulse interval",
                        cue.sound
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
struct ActiveCue {
    slot: VitalitySlot,
    sound: String,
    gain: f32,
    playback: Playback,
    next_pulse: u32,
}

/// Remembers the current band and which vitality cues are running
#[derive(Debug, Clone, Default)]
pub struct VitalityTracker {
    band: Option<usize>,
    active: Vec<ActiveCue>,
}

impl VitalityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current health; returns the cues to issue this tick
    pub fn observe(
        &mut self,
        policy: &VitalityPolicy,
        hp: i32,
        frame: u32,
        position: Position,
    ) -> Vec<Cue> {
        let mut cues = Vec::new();
        let band = policy.band_for(hp);

        if self.band != Some(band) {
            let wanted = policy
                .bands
                .get(band)
                .map(|b| b.cues.as_slice())
                .unwrap_or(&[]);

            self.active.retain(|active| {
                let keep = wanted
                    .iter()
                    .any(|c| c.slot == active.slot && c.sound == active.sound);
                if !keep {
                    cues.push(Cue::stop(Channel::Vitality(active.slot)));
                }
                keep
            });

            for cue in wanted {
                if let Some(active) = self
                    .active
                    .iter_mut()
                    .find(|a| a.slot == cue.slot && a.sound == cue.sound)
                {
                    // Same cue in both bands: keep it running, adopt the new rate
                    active.playback = cue.playback;
                    continue;
                }

                if cue.playback == Playback::Loop {
                    cues.push(
                        Cue::looped(Channel::Vitality(cue.slot), cue.sound.clone(), position)
                            .with_gain(cue.gain),
                    );
                }
                self.active.push(ActiveCue {
                    slot: cue.slot,
                    sound: cue.sound.clone(),
                    gain: cue.gain,
                    playback: cue.playback,
                    next_pulse: frame,
                });
            }

            tracing::info!(
                "Vitality band {} -> {} at HP={}, frame={}",
                self.band
                    .and_then(|b| policy.bands.get(b))
                    .map_or("none", |b| b.label.as_str()),
                policy.bands.get(band).map_or("none", |b| b.label.as_str()),
                hp,
                frame
            );
            self.band = Some(band);
        }

        for active in &mut self.active {
            if let Playback::Pulse { every_frames } = active.playback {
                if frame >= active.next_pulse {
                    cues.push(
                        Cue::one_shot(Channel::Vitality(active.slot), active.sound.clone(), position)
                            .with_gain(active.gain),
                    );
                    active.next_pulse = frame.saturating_add(every_frames);
                }
            }
        }

        cues
    }

    /// Forget the band and stop every running vitality cue
    pub fn reset(&mut self) -> Vec<Cue> {
        self.band = None;
        self.active
            .drain(..)
            .map(|active| Cue::stop(Channel::Vitality(active.slot)))
            .collect()
    }
}
