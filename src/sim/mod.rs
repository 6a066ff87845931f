//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed-step projectile integration only
//! - Seeded RNG only
//! - Stable iteration order (roster order)
//! - No rendering or platform dependencies

pub mod ballistics;
pub mod combat;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod turn;
pub mod view;

pub use ballistics::{FlightOutcome, ImpactSurface, fire, launch_velocity, step, trajectory};
pub use combat::{Hit, damage_at, knockback_at, resolve_impact};
pub use state::{Character, Explosion, Facing, MatchEvent, MatchPhase, MatchState, Projectile};
pub use terrain::TerrainField;
pub use tick::{TickInput, tick};
pub use turn::{TurnManager, TurnOutcome, next_live_index, snap_to_ground, teams_alive};
pub use view::{ExplosionView, MatchView, TeamAlive};
