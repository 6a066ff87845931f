//! Match state and core simulation types
//!
//! `MatchState` is the single owner of everything the simulation mutates.
//! Renderers and UI read it through [`super::view::MatchView`].

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ballistics::ImpactSurface;
use super::combat::Hit;
use super::terrain::TerrainField;
use super::turn::TurnManager;
use crate::lerp;
use crate::settings::MatchSettings;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Active character may move and aim
    AwaitingInput,
    /// Fire is held, power building up
    Charging,
    /// The shot is travelling
    ProjectileInFlight,
    /// Explosion visual decaying; turn ends when it completes
    ExplosionAnimating,
    /// No eligible next character. Terminal.
    GameOver,
}

/// Which way a character faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Team display names, indexed by team id
const TEAM_NAMES: [&str; 4] = ["Red", "Blue", "Green", "Yellow"];

/// A worm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub team: u32,
    pub name: String,
    /// Never below zero
    pub health: i32,
    /// z stays 0
    pub pos: Vec3,
    pub facing: Facing,
    /// Radians above the horizontal, in the facing direction
    pub aim: f32,
    pub alive: bool,
}

impl Character {
    pub fn new(
        id: u32,
        team: u32,
        name: impl Into<String>,
        health: i32,
        x: f32,
        facing: Facing,
    ) -> Self {
        Self {
            id,
            team,
            name: name.into(),
            health,
            pos: Vec3::new(x, 0.0, 0.0),
            facing,
            aim: crate::consts::AIM_DEFAULT,
            alive: true,
        }
    }

    /// Subtract damage, clamping at zero. Returns true if this killed the character.
    pub fn apply_damage(&mut self, damage: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = (self.health - damage.max(0)).max(0);
        if self.health <= 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// The single in-flight shell
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec3,
    pub vel: Vec3,
    pub active: bool,
}

/// Decaying explosion visual
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec3,
    pub radius: f32,
    /// 1.0 at detonation, complete at 0.0
    pub life: f32,
}

impl Explosion {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            life: 1.0,
        }
    }

    /// Decay by `rate` per second. Returns true once finished.
    pub fn decay(&mut self, dt: f32, rate: f32) -> bool {
        self.life = (self.life - dt * rate).max(0.0);
        self.life <= 0.0
    }

    /// 0.0 at detonation, 1.0 when complete
    pub fn progress(&self) -> f32 {
        1.0 - self.life
    }
}

/// Things that happened during a tick, drained by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    TurnStarted { active: usize, wind: f32 },
    ChargeStarted { active: usize },
    ShotFired { shooter: u32, power: f32 },
    Impact { point: Vec3, surface: ImpactSurface, hits: Vec<Hit> },
    CharacterDied { id: u32 },
    ShotLost { x: f32 },
    GameOver { winner: Option<u32> },
}

/// Complete match state
///
/// Constructors expect settings that pass [`MatchSettings::validate`]; an
/// invalid configuration (no gravity, say) can leave a shot in flight forever.
/// Events pile up until [`MatchState::drain_events`] is called, so the
/// presentation layer should drain once per frame.
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: MatchSettings,
    pub terrain: TerrainField,
    /// Roster in turn order. Dead characters stay for the final tally.
    pub characters: Vec<Character>,
    pub projectile: Projectile,
    pub explosion: Option<Explosion>,
    pub phase: MatchPhase,
    pub turn: TurnManager,
    /// Seconds fire has been held this turn
    pub charge_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<MatchEvent>,
}

impl MatchState {
    /// New match with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(MatchSettings::default(), seed)
    }

    /// New match on generated terrain
    pub fn with_settings(settings: MatchSettings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = TerrainField::generate(&settings, &mut rng);
        Self::build(settings, terrain, rng, seed)
    }

    /// New match on the given terrain
    pub fn with_terrain(settings: MatchSettings, terrain: TerrainField, seed: u64) -> Self {
        let rng = Pcg32::seed_from_u64(seed);
        Self::build(settings, terrain, rng, seed)
    }

    fn build(settings: MatchSettings, terrain: TerrainField, mut rng: Pcg32, seed: u64) -> Self {
        debug_assert!(settings.validate().is_ok(), "match built from invalid settings");
        let characters = spawn_roster(&settings, &terrain);
        let turn = TurnManager::new(&settings, &mut rng);

        let mut state = Self {
            seed,
            rng,
            settings,
            terrain,
            characters,
            projectile: Projectile::default(),
            explosion: None,
            phase: MatchPhase::AwaitingInput,
            turn,
            charge_time: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        };

        log::info!(
            "Match started: seed={} roster={} wind={:.2}",
            seed,
            state.characters.len(),
            state.turn.wind
        );
        state.push_event(MatchEvent::TurnStarted {
            active: state.turn.current,
            wind: state.turn.wind,
        });
        state
    }

    /// Character whose turn it is
    pub fn active_character(&self) -> Option<&Character> {
        self.characters.get(self.turn.current)
    }

    /// Current charge expressed as launch power
    pub fn charge_power(&self) -> f32 {
        (self.charge_time * self.settings.charge_rate).clamp(0.0, self.settings.max_power)
    }

    pub fn push_event(&mut self, event: MatchEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for the presentation layer
    pub fn view(&self) -> super::view::MatchView<'_> {
        super::view::MatchView::new(self)
    }
}

/// Interleave teams in turn order, each team holding its own stretch of ground
fn spawn_roster(settings: &MatchSettings, terrain: &TerrainField) -> Vec<Character> {
    let half = settings.half_width();
    let team_span = settings.world_width / settings.team_count as f32;
    let mut characters = Vec::with_capacity(settings.roster_size());

    for slot in 0..settings.characters_per_team {
        for team in 0..settings.team_count {
            let region_start = -half + team as f32 * team_span;
            let t = (slot as f32 + 0.5) / settings.characters_per_team as f32;
            let x = region_start + lerp(0.15, 0.85, t) * team_span;
            let facing = if x < 0.0 { Facing::Right } else { Facing::Left };
            let team_name = TEAM_NAMES
                .get(team as usize)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("Team {}", team + 1));

            let mut character = Character::new(
                characters.len() as u32,
                team,
                format!("{} {}", team_name, slot + 1),
                settings.starting_health,
                x,
                facing,
            );
            character.pos.y = terrain.height_at(x);
            character.aim = character.aim.clamp(settings.aim_min, settings.aim_max);
            characters.push(character);
        }
    }
    characters
}
