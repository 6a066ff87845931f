//! Explosion damage, knockback and cratering

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::Character;
use super::terrain::TerrainField;
use crate::settings::BlastSettings;

/// Below this distance the push direction is undefined
const MIN_KNOCKBACK_DIST: f32 = 1e-4;

/// Damage dealt to one character by one explosion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub character: u32,
    pub damage: i32,
    /// Signed x displacement applied
    pub knockback: f32,
    pub killed: bool,
}

/// Linear falloff: `max_damage` at the epicenter, zero at the radius
pub fn damage_at(dist: f32, blast: &BlastSettings) -> i32 {
    if dist >= blast.radius {
        return 0;
    }
    let falloff = 1.0 - dist / blast.radius;
    (blast.max_damage as f32 * falloff).floor().max(0.0) as i32
}

/// Horizontal push away from the blast; zero when the direction is undefined
pub fn knockback_at(dx: f32, dist: f32, blast: &BlastSettings) -> f32 {
    if dist < MIN_KNOCKBACK_DIST || dist >= blast.radius {
        return 0.0;
    }
    let force = (blast.radius - dist) * blast.knockback_factor;
    dx / dist * force
}

/// Apply an explosion at `point`
///
/// Every living character within the blast radius takes damage and is pushed
/// away, then the crater is carved and everyone is re-seated on the ground.
/// Returns one [`Hit`] per affected character.
pub fn resolve_impact(
    characters: &mut [Character],
    terrain: &mut TerrainField,
    point: Vec3,
    blast: &BlastSettings,
) -> Vec<Hit> {
    let half = terrain.width() / 2.0;
    let mut hits = Vec::new();

    for c in characters.iter_mut().filter(|c| c.alive) {
        let offset = c.pos - point;
        let dist = offset.truncate().length();
        if dist > blast.radius {
            continue;
        }

        let damage = damage_at(dist, blast);
        let knockback = knockback_at(offset.x, dist, blast);
        c.pos.x = (c.pos.x + knockback).clamp(-half, half);
        let killed = c.apply_damage(damage);

        if killed {
            log::info!("{} was killed", c.name);
        }
        hits.push(Hit {
            character: c.id,
            damage,
            knockback,
            killed,
        });
    }

    terrain.deform(point.x, blast.crater_radius);
    super::turn::snap_to_ground(characters, terrain);

    hits
}
