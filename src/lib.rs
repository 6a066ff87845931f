//! Crater Duel - turn-based artillery on destructible terrain
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, ballistics, combat, turns)
//! - `settings`: Data-driven match tuning
//! - `tally`: End-of-match team standings

pub mod settings;
pub mod sim;
pub mod tally;

pub use settings::{MatchSettings, SettingsError};
pub use tally::{MatchTally, TeamTally};

/// Default tuning constants
pub mod consts {
    /// Display-rate simulation timestep (one tick per frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playable width, centered on x = 0
    pub const WORLD_WIDTH: f32 = 100.0;
    /// Terrain segments (samples = segments + 1)
    pub const TERRAIN_SEGMENTS: usize = 200;
    /// Water surface height; anything below it splashes
    pub const WATER_LEVEL: f32 = -5.0;

    /// Downward acceleration on projectiles (units/s²)
    pub const GRAVITY: f32 = 9.8;
    /// Wind is drawn uniformly from [-WIND_MAX, WIND_MAX] each turn
    pub const WIND_MAX: f32 = 3.0;

    /// Power gained per second of held fire
    pub const CHARGE_RATE: f32 = 20.0;
    /// Power cap
    pub const MAX_POWER: f32 = 30.0;

    /// Projectile integration step (seconds), independent of frame time
    pub const PROJECTILE_STEP: f32 = 0.016;
    /// Speed multiplier applied to the projectile step
    pub const PROJECTILE_TIME_SCALE: f32 = 2.0;
    /// Shots further than this past either edge are lost
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 20.0;
    /// Projectile spawns this far above the shooter's ground height
    pub const SPAWN_HEIGHT_OFFSET: f32 = 1.5;

    /// Character walking speed (units/s)
    pub const MOVE_SPEED: f32 = 5.0;
    /// Aim adjustment speed (radians/s)
    pub const AIM_SPEED: f32 = 1.5;
    /// Lowest aim angle (radians)
    pub const AIM_MIN: f32 = -0.5;
    /// Highest aim angle (radians)
    pub const AIM_MAX: f32 = 1.5;
    /// Aim angle given to freshly spawned characters
    pub const AIM_DEFAULT: f32 = 0.5;

    /// Damage radius of an explosion
    pub const BLAST_RADIUS: f32 = 8.0;
    /// Damage at the epicenter
    pub const MAX_DAMAGE: i32 = 40;
    /// Crater radius carved into the terrain (independent of BLAST_RADIUS)
    pub const CRATER_RADIUS: f32 = 6.0;
    /// Knockback per unit of distance inside the blast radius
    pub const KNOCKBACK_FACTOR: f32 = 0.5;
    /// Explosion life lost per second (life starts at 1.0)
    pub const EXPLOSION_DECAY: f32 = 2.0;

    /// Per-turn countdown (display only)
    pub const TURN_TIME: f32 = 30.0;

    /// Roster shape
    pub const TEAM_COUNT: u32 = 2;
    pub const CHARACTERS_PER_TEAM: u32 = 2;
    pub const STARTING_HEALTH: i32 = 100;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
