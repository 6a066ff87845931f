//! Read-only snapshot for rendering and UI
//!
//! Borrowed from `MatchState` once per frame. Nothing here can mutate the
//! simulation.

use glam::Vec3;
use serde::Serialize;

use super::state::{Character, MatchPhase, MatchState};
use super::turn::teams_alive;

/// Explosion as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExplosionView {
    pub center: Vec3,
    pub radius: f32,
    /// 0.0 at detonation, 1.0 when finished
    pub progress: f32,
}

/// Per-team live count for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamAlive {
    pub team: u32,
    pub alive: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchView<'a> {
    pub phase: MatchPhase,
    pub wind: f32,
    /// Charge so far, 0 when not charging
    pub power: f32,
    pub max_power: f32,
    pub active: usize,
    pub turn_number: u32,
    /// Turn countdown in seconds
    pub turn_timer: f32,
    pub characters: &'a [Character],
    /// Terrain samples from x = -width/2 to +width/2
    pub terrain: &'a [f32],
    pub terrain_width: f32,
    pub water_level: f32,
    /// Present only while a shot is in flight
    pub projectile: Option<Vec3>,
    pub explosion: Option<ExplosionView>,
    pub teams: Vec<TeamAlive>,
    pub camera_target: Vec3,
    /// Last team standing, once the match is over
    pub winner: Option<u32>,
}

impl<'a> MatchView<'a> {
    pub fn new(state: &'a MatchState) -> Self {
        let projectile = state.projectile.active.then_some(state.projectile.pos);
        let explosion = state.explosion.map(|e| ExplosionView {
            center: e.center,
            radius: e.radius,
            progress: e.progress(),
        });

        let power = match state.phase {
            MatchPhase::Charging => state.charge_power(),
            _ => 0.0,
        };

        let team_count = state.settings.team_count;
        let teams = (0..team_count)
            .map(|team| TeamAlive {
                team,
                alive: state
                    .characters
                    .iter()
                    .filter(|c| c.alive && c.team == team)
                    .count(),
            })
            .collect();

        let winner = match (state.phase, teams_alive(&state.characters).as_slice()) {
            (MatchPhase::GameOver, [team]) => Some(*team),
            _ => None,
        };

        Self {
            phase: state.phase,
            wind: state.turn.wind,
            power,
            max_power: state.settings.max_power,
            active: state.turn.current,
            turn_number: state.turn.turn_number,
            turn_timer: state.turn.timer,
            characters: &state.characters,
            terrain: state.terrain.samples(),
            terrain_width: state.terrain.width(),
            water_level: state.settings.water_level,
            projectile,
            explosion,
            teams,
            camera_target: camera_target(state),
            winner,
        }
    }

    /// Serialize for an external renderer
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Follow the shot, then the blast, otherwise the active character
fn camera_target(state: &MatchState) -> Vec3 {
    if state.projectile.active {
        return state.projectile.pos;
    }
    if let Some(explosion) = &state.explosion {
        return explosion.center;
    }
    state
        .active_character()
        .map(|c| c.pos)
        .unwrap_or(Vec3::ZERO)
}
