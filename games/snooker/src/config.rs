//! Tunable game parameters.
//!
//! Every field defaults to the standard table's values; a JSON document only
//! needs to name what it overrides.

use baize_engine::Easing;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Cue geometry and strike response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Closest the cue may sit to the cue ball centre.
    pub min_distance: f32,
    /// Furthest pull-back.
    pub max_distance: f32,
    /// Radians per rotate key press.
    pub angle_step: f32,
    /// Pull-back per power key press.
    pub draw_step: f32,
    /// Power fraction at `min_distance`.
    pub power_low: f32,
    /// Power fraction at `max_distance`.
    pub power_high: f32,
    /// Curve applied to the power fraction before scaling by `max_speed`.
    /// Only `quad_in` passes validation.
    pub power_curve: Easing,
    /// Cue speed at full power, world units per second.
    pub max_speed: f32,
    /// Seconds the cue keeps moving after a strike before it is frozen.
    pub settle_delay: f64,
    /// Cue ball speed under which the table counts as settled.
    pub reset_epsilon: f32,
    /// Seconds the cue ball must stay settled before the cue comes back.
    pub reset_cooldown: f64,
    /// Alpha removed per tick while fading out.
    pub fade_step: u8,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            min_distance: 72.0,
            max_distance: 172.0,
            angle_step: 0.05,
            draw_step: 2.0,
            power_low: 0.1,
            power_high: 0.58,
            power_curve: Easing::QuadIn,
            max_speed: 2100.0,
            settle_delay: 0.5,
            reset_epsilon: 12.0,
            reset_cooldown: 1.0,
            fade_step: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnookerConfig {
    pub cue: CueConfig,
    /// Points deducted for a foul.
    pub foul_penalty: i32,
    /// Seconds the foul banner stays up.
    pub foul_banner_secs: f64,
    /// Seconds the cue-ball collision banner stays up.
    pub collision_banner_secs: f64,
    /// Match length in seconds.
    pub match_secs: u32,
    /// Physics slow-down factor.
    pub time_scale: f32,
    /// RNG seed. `None` seeds from the platform entropy source.
    pub seed: Option<u64>,
}

impl Default for SnookerConfig {
    fn default() -> Self {
        Self {
            cue: CueConfig::default(),
            foul_penalty: 4,
            foul_banner_secs: 3.0,
            collision_banner_secs: 2.0,
            match_secs: 10 * 60,
            time_scale: 0.8,
            seed: None,
        }
    }
}

impl SnookerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SnookerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cue = &self.cue;
        if !(cue.min_distance > 0.0 && cue.min_distance < cue.max_distance) {
            return Err(ConfigError::Invalid(format!(
                "cue distance range {}..{} is empty",
                cue.min_distance, cue.max_distance
            )));
        }
        let in_unit = |p: f32| p > 0.0 && p <= 1.0;
        if !(in_unit(cue.power_low) && in_unit(cue.power_high) && cue.power_low <= cue.power_high) {
            return Err(ConfigError::Invalid(format!(
                "power range {}..{} must lie in (0, 1]",
                cue.power_low, cue.power_high
            )));
        }
        if cue.power_curve != Easing::QuadIn {
            return Err(ConfigError::Invalid(format!(
                "power_curve must be quad_in, got {:?}",
                cue.power_curve
            )));
        }
        if cue.max_speed <= 0.0 || cue.reset_epsilon <= 0.0 {
            return Err(ConfigError::Invalid("cue speeds must be positive".into()));
        }
        if cue.fade_step == 0 {
            return Err(ConfigError::Invalid("fade_step must be at least 1".into()));
        }
        if self.time_scale <= 0.0 {
            return Err(ConfigError::Invalid("time_scale must be positive".into()));
        }
        if self.match_secs == 0 {
            return Err(ConfigError::Invalid("match_secs must be positive".into()));
        }
        Ok(())
    }
}
