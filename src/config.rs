use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cues::vitality::VitalityPolicy;
use crate::error::ConfigError;
use crate::game::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Right border x; the left border is 0
    pub width: i32,
    /// Floor level (bottom edge of a grounded character)
    pub height: i32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 640,
        }
    }
}

/// Sound names for cues that are not derived from an action name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundNames {
    pub landing: String,
    pub guard: String,
    pub hit_knockdown: String,
    pub hit_normal: String,
    pub energy_charge: String,
    pub timer_warning: String,
    /// `None` disables the round-start cue
    pub round_start: Option<String>,
    pub enemy_left: String,
    pub enemy_right: String,
}

impl Default for SoundNames {
    fn default() -> Self {
        Self {
            landing: "LANDING.wav".to_string(),
            guard: "WeakGuard.wav".to_string(),
            hit_knockdown: "HitB.wav".to_string(),
            hit_normal: "HitA.wav".to_string(),
            energy_charge: "EnergyCharge.wav".to_string(),
            timer_warning: "5SECTIMED.wav".to_string(),
            round_start: Some("ROUNDSTART.wav".to_string()),
            enemy_left: "LEFT.wav".to_string(),
            enemy_right: "RIGHT.wav".to_string(),
        }
    }
}

/// Border proximity alert policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderPolicy {
    pub left_sound: String,
    pub right_sound: String,
    /// Only alert while the character keeps pushing into the border
    pub require_outward_motion: bool,
}

impl Default for BorderPolicy {
    fn default() -> Self {
        Self {
            left_sound: "Border_Alert.wav".to_string(),
            right_sound: "BorderAlert.wav".to_string(),
            require_outward_motion: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub stage: StageConfig,

    /// Frames in a round before the time limit
    pub match_frames: u32,

    /// Remaining-frame threshold for the timer warning
    pub timer_warning_frames: u32,

    /// Energy gain (since the last surge) that triggers the surge cue
    pub energy_surge_delta: i32,

    /// Side whose handler produces the shared cues (border, vitality,
    /// enemy side, timer, round start)
    pub listener: Side,

    /// Appended to action names to form motion cue sound names
    pub sound_extension: String,

    pub sounds: SoundNames,

    /// The round-start cue only fires when the round's first observed frame
    /// is inside this window
    pub round_start_window_frames: u32,

    pub border: BorderPolicy,

    pub vitality: VitalityPolicy,

    /// Directory holding the sound files (playback backend)
    pub sound_dir: String,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stage: StageConfig::default(),
            match_frames: 60 * 60,
            timer_warning_frames: 300, // 5 seconds at 60 fps
            energy_surge_delta: 50,
            listener: Side::P1,
            sound_extension: ".wav".to_string(),
            sounds: SoundNames::default(),
            round_start_window_frames: 60,
            border: BorderPolicy::default(),
            vitality: VitalityPolicy::default(),
            sound_dir: "sounds".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Load configuration, creating a default file if it doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Config::default();
            config.save(path)?;
            tracing::info!("Created default config at: {}", path.display());
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        Ok(())
    }

    /// Platform config path (`<config dir>/FtgSoundCues/config.json`)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("FtgSoundCues"))
            .unwrap_or_else(|| PathBuf::from("config"))
            .join("config.json")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stage.width <= 0 || self.stage.height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "stage size must be positive, got {}x{}",
                self.stage.width, self.stage.height
            )));
        }
        if self.energy_surge_delta < 0 {
            return Err(ConfigError::Invalid(
                "energy surge delta must not be negative".to_string(),
            ));
        }
        self.vitality.validate()
    }

    /// Stage center at the top edge, where shared cues are positioned
    pub fn stage_center(&self) -> crate::observer::Position {
        crate::observer::Position::new(self.stage.width / 2, 0)
    }
}
