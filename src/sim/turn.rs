//! Turn order, wind and active-character control

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Character, Facing};
use super::terrain::TerrainField;
use super::tick::TickInput;
use crate::settings::MatchSettings;

/// Result of ending a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Control passes to this roster index
    Next(usize),
    /// No eligible next character. `winner` is the last team standing, if any.
    GameOver { winner: Option<u32> },
}

/// Next live roster index after `current`, wrapping
///
/// Tries every index once, ending with `current` itself. `None` iff nobody
/// is alive.
pub fn next_live_index(characters: &[Character], current: usize) -> Option<usize> {
    let n = characters.len();
    (1..=n)
        .map(|step| (current + step) % n)
        .find(|&i| characters[i].alive)
}

/// Distinct teams that still have a live character, ascending
pub fn teams_alive(characters: &[Character]) -> Vec<u32> {
    let mut teams: Vec<u32> = characters.iter().filter(|c| c.alive).map(|c| c.team).collect();
    teams.sort_unstable();
    teams.dedup();
    teams
}

/// Put every character on the terrain surface
pub fn snap_to_ground(characters: &mut [Character], terrain: &TerrainField) {
    for c in characters {
        c.pos.y = terrain.height_at(c.pos.x);
    }
}

/// Owns whose turn it is and the per-turn environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnManager {
    /// Active roster index
    pub current: usize,
    /// Horizontal acceleration on projectiles, re-rolled each turn
    pub wind: f32,
    /// Seconds left on the turn clock (display only)
    pub timer: f32,
    /// Turns started so far, starting at 1
    pub turn_number: u32,
}

impl TurnManager {
    /// First character active, wind rolled once
    pub fn new<R: Rng>(settings: &MatchSettings, rng: &mut R) -> Self {
        Self {
            current: 0,
            wind: roll_wind(settings, rng),
            timer: settings.turn_time,
            turn_number: 1,
        }
    }

    /// End the current turn and hand control to the next live character
    pub fn advance<R: Rng>(
        &mut self,
        characters: &[Character],
        settings: &MatchSettings,
        rng: &mut R,
    ) -> TurnOutcome {
        let teams = teams_alive(characters);
        let next = next_live_index(characters, self.current);

        match next {
            Some(next) if teams.len() >= 2 => {
                self.current = next;
                self.wind = roll_wind(settings, rng);
                self.timer = settings.turn_time;
                self.turn_number += 1;
                log::info!(
                    "Turn {}: {} (wind {:.2})",
                    self.turn_number,
                    characters[next].name,
                    self.wind
                );
                TurnOutcome::Next(next)
            }
            _ => {
                let winner = match teams.as_slice() {
                    [team] => Some(*team),
                    _ => None,
                };
                log::info!("Game over after {} turns, winner: {:?}", self.turn_number, winner);
                TurnOutcome::GameOver { winner }
            }
        }
    }

    /// Count down the turn clock
    pub fn tick_timer(&mut self, dt: f32) {
        self.timer = (self.timer - dt).max(0.0);
    }

    /// Apply movement and aim input to the active character only
    pub fn apply_controls(
        &self,
        characters: &mut [Character],
        terrain: &TerrainField,
        input: &TickInput,
        settings: &MatchSettings,
        dt: f32,
    ) {
        let Some(active) = characters.get_mut(self.current) else {
            return;
        };
        if !active.alive {
            return;
        }

        let half = settings.half_width();
        match (input.move_left, input.move_right) {
            (true, false) => {
                active.facing = Facing::Left;
                active.pos.x = (active.pos.x - settings.move_speed * dt).clamp(-half, half);
            }
            (false, true) => {
                active.facing = Facing::Right;
                active.pos.x = (active.pos.x + settings.move_speed * dt).clamp(-half, half);
            }
            _ => {}
        }

        let aim_delta = match (input.aim_up, input.aim_down) {
            (true, false) => settings.aim_speed * dt,
            (false, true) => -settings.aim_speed * dt,
            _ => 0.0,
        };
        active.aim = (active.aim + aim_delta).clamp(settings.aim_min, settings.aim_max);
        active.pos.y = terrain.height_at(active.pos.x);
    }
}

fn roll_wind<R: Rng>(settings: &MatchSettings, rng: &mut R) -> f32 {
    if settings.wind_max <= 0.0 {
        return 0.0;
    }
    rng.random_range(-settings.wind_max..=settings.wind_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn roster(alive: &[bool]) -> Vec<Character> {
        alive
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                let id = i as u32;
                let mut c = Character::new(id, id % 2, format!("W{}", i), 100, 0.0, Facing::Right);
                if !a {
                    c.apply_damage(100);
                }
                c
            })
            .collect()
    }

    #[test]
    fn test_skip_dead() {
        let r = roster(&[true, false, false, true]);
        assert_eq!(next_live_index(&r, 0), Some(3));
        assert_eq!(next_live_index(&r, 3), Some(0));
        // Sole survivor keeps the turn
        let r = roster(&[false, false, true, false]);
        assert_eq!(next_live_index(&r, 2), Some(2));
        let r = roster(&[false, false, false, false]);
        assert_eq!(next_live_index(&r, 1), None);
    }

    #[test]
    fn test_advance_rerolls_wind_and_resets_timer() {
        let settings = MatchSettings::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut turns = TurnManager::new(&settings, &mut rng);
        turns.tick_timer(10.0);
        let r = roster(&[true, true, true, true]);

        let winds: Vec<f32> = (0..8)
            .map(|_| {
                assert!(matches!(turns.advance(&r, &settings, &mut rng), TurnOutcome::Next(_)));
                assert_eq!(turns.timer, settings.turn_time);
                turns.wind
            })
            .collect();
        assert!(winds.iter().all(|w| w.abs() <= settings.wind_max));
        assert!(winds.windows(2).any(|w| w[0] != w[1]));
        assert_eq!(turns.turn_number, 9);
    }

    #[test]
    fn test_team_wiped_is_game_over() {
        let settings = MatchSettings::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut turns = TurnManager::new(&settings, &mut rng);
        // Team 1 is indices 1 and 3
        let r = roster(&[true, false, true, false]);
        assert_eq!(
            turns.advance(&r, &settings, &mut rng),
            TurnOutcome::GameOver { winner: Some(0) }
        );

        let r = roster(&[false, false, false, false]);
        assert_eq!(
            turns.advance(&r, &settings, &mut rng),
            TurnOutcome::GameOver { winner: None }
        );
    }

    #[test]
    fn test_timer_floors_at_zero() {
        let settings = MatchSettings::default();
        let mut turns = TurnManager::new(&settings, &mut Pcg32::seed_from_u64(0));
        turns.tick_timer(settings.turn_time + 5.0);
        assert_eq!(turns.timer, 0.0);
    }

    #[test]
    fn test_controls_move_and_aim_active_only() {
        let settings = MatchSettings::default();
        let mut terrain = TerrainField::flat(100.0, 200, 0.0);
        terrain.deform(-1.0, 3.0);
        let turns = TurnManager::new(&settings, &mut Pcg32::seed_from_u64(0));
        let mut r = roster(&[true, true]);

        let input = TickInput {
            move_left: true,
            aim_up: true,
            ..Default::default()
        };
        turns.apply_controls(&mut r, &terrain, &input, &settings, 0.2);

        assert!((r[0].pos.x + 1.0).abs() < 1e-6);
        assert_eq!(r[0].facing, Facing::Left);
        assert!((r[0].aim - (crate::consts::AIM_DEFAULT + 0.3)).abs() < 1e-6);
        assert_eq!(r[0].pos.y, -3.0);
        assert_eq!(r[1].pos.x, 0.0);
        assert_eq!(r[1].aim, crate::consts::AIM_DEFAULT);
    }

    #[test]
    fn test_controls_clamp() {
        let settings = MatchSettings::default();
        let terrain = TerrainField::flat(100.0, 200, 0.0);
        let turns = TurnManager::new(&settings, &mut Pcg32::seed_from_u64(0));
        let mut r = roster(&[true]);
        r[0].pos.x = 49.9;

        let input = TickInput {
            move_right: true,
            aim_down: true,
            ..Default::default()
        };
        turns.apply_controls(&mut r, &terrain, &input, &settings, 10.0);
        assert_eq!(r[0].pos.x, 50.0);
        assert_eq!(r[0].aim, settings.aim_min);
    }

    proptest! {
        #[test]
        fn prop_advance_lands_on_live(
            alive in prop::collection::vec(any::<bool>(), 1..12),
            start in 0usize..12,
        ) {
            let r = roster(&alive);
            let current = start % r.len();
            match next_live_index(&r, current) {
                Some(i) => prop_assert!(r[i].alive),
                None => prop_assert!(alive.iter().all(|a| !a)),
            }
        }
    }
}
