//! Per-frame simulation tick
//!
//! Reads one input snapshot, advances whichever phase is active and drives
//! the phase transitions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ballistics::{self, FlightOutcome, ImpactSurface};
use super::combat;
use super::state::{Explosion, MatchEvent, MatchPhase, MatchState};
use super::turn::{TurnOutcome, snap_to_ground};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub aim_up: bool,
    pub aim_down: bool,
    /// Held to charge, released to fire
    pub fire_held: bool,
}

/// Advance the match by one tick of `dt` seconds
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    if state.phase == MatchPhase::GameOver {
        return;
    }

    state.time_ticks += 1;
    state.turn.tick_timer(dt);

    match state.phase {
        MatchPhase::AwaitingInput | MatchPhase::Charging => {
            if !state.active_character().is_some_and(|c| c.alive) {
                end_turn(state);
                return;
            }

            state
                .turn
                .apply_controls(&mut state.characters, &state.terrain, input, &state.settings, dt);

            match (state.phase, input.fire_held) {
                (MatchPhase::AwaitingInput, true) => {
                    state.phase = MatchPhase::Charging;
                    state.charge_time = 0.0;
                    state.push_event(MatchEvent::ChargeStarted {
                        active: state.turn.current,
                    });
                }
                (MatchPhase::Charging, true) => {
                    state.charge_time += dt;
                }
                (MatchPhase::Charging, false) => {
                    let power = state.charge_power();
                    launch(state, power);
                }
                _ => {}
            }
        }
        MatchPhase::ProjectileInFlight => {
            let outcome = ballistics::step(
                &mut state.projectile,
                state.turn.wind,
                &state.terrain,
                &state.settings,
            );
            match outcome {
                FlightOutcome::InFlight => {}
                FlightOutcome::Impact { point, surface } => detonate(state, point, surface),
                FlightOutcome::OutOfBounds => {
                    let x = state.projectile.pos.x;
                    log::debug!("Shot lost out of bounds at x={:.2}", x);
                    state.push_event(MatchEvent::ShotLost { x });
                    end_turn(state);
                }
            }
        }
        MatchPhase::ExplosionAnimating => {
            let done = match state.explosion.as_mut() {
                Some(explosion) => explosion.decay(dt, state.settings.explosion_decay),
                None => true,
            };
            if done {
                state.explosion = None;
                end_turn(state);
            }
        }
        MatchPhase::GameOver => {}
    }

    snap_to_ground(&mut state.characters, &state.terrain);
}

/// Fire the active character's shot at `power`
fn launch(state: &mut MatchState, power: f32) {
    let Some(shooter) = state.active_character() else {
        return;
    };
    let shooter_id = shooter.id;
    let power = power.clamp(0.0, state.settings.max_power);
    let projectile = ballistics::fire(
        shooter.pos,
        power,
        shooter.facing,
        shooter.aim,
        &state.terrain,
        &state.settings,
    );

    log::info!("{} fires at power {:.1}", shooter.name, power);
    state.projectile = projectile;
    state.charge_time = 0.0;
    state.phase = MatchPhase::ProjectileInFlight;
    state.push_event(MatchEvent::ShotFired {
        shooter: shooter_id,
        power,
    });
}

/// Resolve an impact and start the explosion animation
fn detonate(state: &mut MatchState, point: Vec3, surface: ImpactSurface) {
    let blast = state.settings.blast;
    let hits = combat::resolve_impact(&mut state.characters, &mut state.terrain, point, &blast);

    log::info!(
        "Impact ({:?}) at ({:.2}, {:.2}): {} hit",
        surface,
        point.x,
        point.y,
        hits.len()
    );
    let deaths: Vec<u32> = hits.iter().filter(|h| h.killed).map(|h| h.character).collect();
    state.push_event(MatchEvent::Impact { point, surface, hits });
    for id in deaths {
        state.push_event(MatchEvent::CharacterDied { id });
    }

    state.explosion = Some(Explosion::new(point, blast.radius));
    state.phase = MatchPhase::ExplosionAnimating;
}

/// Hand the turn on, or end the match
fn end_turn(state: &mut MatchState) {
    state.projectile.active = false;
    state.charge_time = 0.0;

    match state.turn.advance(&state.characters, &state.settings, &mut state.rng) {
        TurnOutcome::Next(active) => {
            state.phase = MatchPhase::AwaitingInput;
            state.push_event(MatchEvent::TurnStarted {
                active,
                wind: state.turn.wind,
            });
        }
        TurnOutcome::GameOver { winner } => {
            state.phase = MatchPhase::GameOver;
            state.push_event(MatchEvent::GameOver { winner });
        }
    }
}
