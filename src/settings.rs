//! Match settings
//!
//! Every tunable the simulation reads. Loaded from JSON, missing fields fall
//! back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SettingsError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Explosion parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastSettings {
    /// Damage radius
    pub radius: f32,
    /// Damage at distance zero
    pub max_damage: i32,
    /// Radius of the crater carved into terrain
    pub crater_radius: f32,
    /// Knockback force = (radius - dist) * knockback_factor
    pub knockback_factor: f32,
}

impl Default for BlastSettings {
    fn default() -> Self {
        Self {
            radius: BLAST_RADIUS,
            max_damage: MAX_DAMAGE,
            crater_radius: CRATER_RADIUS,
            knockback_factor: KNOCKBACK_FACTOR,
        }
    }
}

/// Match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    // === World ===
    pub world_width: f32,
    pub terrain_segments: usize,
    pub water_level: f32,

    // === Physics ===
    pub gravity: f32,
    pub wind_max: f32,
    pub projectile_step: f32,
    pub projectile_time_scale: f32,
    pub out_of_bounds_margin: f32,
    pub spawn_height_offset: f32,

    // === Controls ===
    pub charge_rate: f32,
    pub max_power: f32,
    pub move_speed: f32,
    pub aim_speed: f32,
    pub aim_min: f32,
    pub aim_max: f32,

    // === Combat ===
    pub blast: BlastSettings,
    pub explosion_decay: f32,

    // === Turns / roster ===
    pub turn_time: f32,
    pub team_count: u32,
    pub characters_per_team: u32,
    pub starting_health: i32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            terrain_segments: TERRAIN_SEGMENTS,
            water_level: WATER_LEVEL,

            gravity: GRAVITY,
            wind_max: WIND_MAX,
            projectile_step: PROJECTILE_STEP,
            projectile_time_scale: PROJECTILE_TIME_SCALE,
            out_of_bounds_margin: OUT_OF_BOUNDS_MARGIN,
            spawn_height_offset: SPAWN_HEIGHT_OFFSET,

            charge_rate: CHARGE_RATE,
            max_power: MAX_POWER,
            move_speed: MOVE_SPEED,
            aim_speed: AIM_SPEED,
            aim_min: AIM_MIN,
            aim_max: AIM_MAX,

            blast: BlastSettings::default(),
            explosion_decay: EXPLOSION_DECAY,

            turn_time: TURN_TIME,
            team_count: TEAM_COUNT,
            characters_per_team: CHARACTERS_PER_TEAM,
            starting_health: STARTING_HEALTH,
        }
    }
}

impl MatchSettings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json).inspect_err(|e| {
            log::warn!("Rejected settings from {}: {}", path.display(), e);
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Half the playable width (world x runs from -half to +half)
    pub fn half_width(&self) -> f32 {
        self.world_width / 2.0
    }

    /// Fixed projectile integration delta
    pub fn projectile_dt(&self) -> f32 {
        self.projectile_step * self.projectile_time_scale
    }

    /// Total roster size
    pub fn roster_size(&self) -> usize {
        (self.team_count * self.characters_per_team) as usize
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.world_width > 0.0) {
            return Err(SettingsError::invalid("world_width", "must be positive"));
        }
        if self.terrain_segments == 0 {
            return Err(SettingsError::invalid("terrain_segments", "must be at least 1"));
        }
        if self.team_count < 2 {
            return Err(SettingsError::invalid("team_count", "a duel needs at least 2 teams"));
        }
        if self.characters_per_team == 0 {
            return Err(SettingsError::invalid("characters_per_team", "must be at least 1"));
        }
        if self.starting_health <= 0 {
            return Err(SettingsError::invalid("starting_health", "must be positive"));
        }
        if !(self.blast.radius > 0.0) {
            return Err(SettingsError::invalid("blast.radius", "must be positive"));
        }
        if !(self.blast.crater_radius > 0.0) {
            return Err(SettingsError::invalid("blast.crater_radius", "must be positive"));
        }
        if !(self.gravity > 0.0 && self.gravity.is_finite()) {
            return Err(SettingsError::invalid("gravity", "must be positive and finite"));
        }
        if !(self.max_power > 0.0) {
            return Err(SettingsError::invalid("max_power", "must be positive"));
        }
        if !(self.projectile_dt() > 0.0) {
            return Err(SettingsError::invalid(
                "projectile_step",
                "step * time scale must be positive",
            ));
        }
        if !(self.explosion_decay > 0.0) {
            return Err(SettingsError::invalid("explosion_decay", "must be positive"));
        }
        if self.aim_min > self.aim_max {
            return Err(SettingsError::invalid(
                "aim_min",
                format!("{} exceeds aim_max {}", self.aim_min, self.aim_max),
            ));
        }
        if !(self.wind_max >= 0.0 && self.wind_max.is_finite()) {
            return Err(SettingsError::invalid("wind_max", "must be finite and not negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = MatchSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.roster_size(), 4);
        assert_eq!(settings.blast.radius, 8.0);
        assert_eq!(settings.blast.max_damage, 40);
        assert_eq!(settings.blast.crater_radius, 6.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "gravity": 12.0, "blast": { "radius": 10.0 } }"#;
        let settings = MatchSettings::from_json(json).expect("valid settings");
        assert_eq!(settings.gravity, 12.0);
        assert_eq!(settings.blast.radius, 10.0);
        assert_eq!(settings.blast.crater_radius, CRATER_RADIUS);
        assert_eq!(settings.world_width, WORLD_WIDTH);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let err = MatchSettings::from_json(r#"{ "team_count": 1 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "team_count", .. }));

        let err = MatchSettings::from_json(r#"{ "aim_min": 2.0, "aim_max": 1.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "aim_min", .. }));

        // Without gravity a slow shot never comes down
        let err = MatchSettings::from_json(r#"{ "gravity": 0.0, "wind_max": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "gravity", .. }));

        let mut settings = MatchSettings::default();
        settings.gravity = f32::INFINITY;
        assert!(settings.validate().is_err());
        settings.gravity = GRAVITY;
        settings.wind_max = f32::NAN;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid { field: "wind_max", .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = MatchSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let mut settings = MatchSettings::default();
        settings.wind_max = 0.0;
        let json = settings.to_json().unwrap();
        assert_eq!(MatchSettings::from_json(&json).unwrap(), settings);
    }
}
