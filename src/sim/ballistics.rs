//! Projectile launch and fixed-step flight
//!
//! Integration is semi-implicit Euler on a constant step that does not depend
//! on frame time: velocity is updated first, then position.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{Facing, Projectile};
use super::terrain::TerrainField;
use crate::settings::MatchSettings;

/// What the shell came down on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactSurface {
    Ground,
    Water,
}

/// Result of one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightOutcome {
    /// Still airborne
    InFlight,
    /// Hit ground or water; detonate here
    Impact { point: Vec3, surface: ImpactSurface },
    /// Left the playable width plus margin; no explosion
    OutOfBounds,
}

/// Unit launch direction scaled by power
pub fn launch_velocity(power: f32, facing: Facing, aim: f32) -> Vec3 {
    Vec3::new(aim.cos() * facing.sign(), aim.sin(), 0.0) * power
}

/// Spawn a projectile above the ground at `origin.x`
///
/// `power` is expected to be clamped by the caller.
pub fn fire(
    origin: Vec3,
    power: f32,
    facing: Facing,
    aim: f32,
    terrain: &TerrainField,
    settings: &MatchSettings,
) -> Projectile {
    let ground = terrain.height_at(origin.x);
    Projectile {
        pos: Vec3::new(origin.x, ground + settings.spawn_height_offset, 0.0),
        vel: launch_velocity(power, facing, aim),
        active: true,
    }
}

/// Advance the projectile one fixed step and test for termination
///
/// Deactivates the projectile on any terminal outcome.
pub fn step(
    projectile: &mut Projectile,
    wind: f32,
    terrain: &TerrainField,
    settings: &MatchSettings,
) -> FlightOutcome {
    let dt = settings.projectile_dt();

    projectile.vel.y -= settings.gravity * dt;
    projectile.vel.x += wind * dt;
    projectile.pos += projectile.vel * dt;

    let pos = projectile.pos;
    if pos.x.abs() > settings.half_width() + settings.out_of_bounds_margin {
        projectile.active = false;
        return FlightOutcome::OutOfBounds;
    }

    let surface = if pos.y <= terrain.height_at(pos.x) {
        Some(ImpactSurface::Ground)
    } else if pos.y < settings.water_level {
        Some(ImpactSurface::Water)
    } else {
        None
    };

    match surface {
        Some(surface) => {
            projectile.active = false;
            FlightOutcome::Impact { point: pos, surface }
        }
        None => FlightOutcome::InFlight,
    }
}

/// Run a copy of `projectile` until it terminates or `max_steps` elapse
///
/// Returns the visited positions (after each step) and the final outcome.
/// Used for aim previews; the live projectile is untouched.
pub fn trajectory(
    projectile: &Projectile,
    wind: f32,
    terrain: &TerrainField,
    settings: &MatchSettings,
    max_steps: usize,
) -> (Vec<Vec3>, FlightOutcome) {
    let mut shell = *projectile;
    let mut points = Vec::new();
    for _ in 0..max_steps {
        let outcome = step(&mut shell, wind, terrain, settings);
        points.push(shell.pos);
        if outcome != FlightOutcome::InFlight {
            return (points, outcome);
        }
    }
    (points, FlightOutcome::InFlight)
}
