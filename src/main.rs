//! Crater Duel headless driver
//!
//! Plays a scripted match on the fixed-step loop and prints the final tally.
//!
//! Usage: `crater-duel [settings.json] [seed]`

use std::error::Error;

use crater_duel::consts::{MAX_SUBSTEPS, SIM_DT};
use crater_duel::sim::{MatchEvent, MatchPhase, MatchState, TickInput, tick};
use crater_duel::{MatchSettings, MatchTally};

/// Simulated display frame time (two sim ticks per frame)
const FRAME_DT: f32 = 1.0 / 30.0;
/// Stop after ten simulated minutes
const MAX_FRAMES: u32 = 30 * 60 * 10;
/// Ticks spent adjusting aim before charging
const AIM_TICKS: u32 = 20;

/// Fixed per-turn input script: aim for a moment, hold fire, release
struct TurnScript {
    ticks: u32,
    charge_ticks: u32,
    aim_up: bool,
}

impl TurnScript {
    fn for_turn(turn_number: u32) -> Self {
        Self {
            ticks: 0,
            // 0.6s to 1.05s of charge, cycling
            charge_ticks: 36 + 9 * (turn_number % 4),
            aim_up: turn_number % 2 == 0,
        }
    }

    fn next_input(&mut self) -> TickInput {
        let t = self.ticks;
        self.ticks += 1;
        if t < AIM_TICKS {
            TickInput {
                aim_up: self.aim_up,
                aim_down: !self.aim_up,
                ..Default::default()
            }
        } else if t < AIM_TICKS + self.charge_ticks {
            TickInput {
                fire_held: true,
                ..Default::default()
            }
        } else {
            TickInput::default()
        }
    }
}

struct Driver {
    state: MatchState,
    script: TurnScript,
    accumulator: f32,
}

impl Driver {
    fn new(settings: MatchSettings, seed: u64) -> Self {
        Self {
            state: MatchState::with_settings(settings, seed),
            script: TurnScript::for_turn(1),
            accumulator: 0.0,
        }
    }

    /// Run simulation ticks for one display frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = match self.state.phase {
                MatchPhase::AwaitingInput | MatchPhase::Charging => self.script.next_input(),
                _ => TickInput::default(),
            };
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in self.state.drain_events() {
                self.report(&event);
            }
        }
    }

    fn report(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::TurnStarted { .. } => {
                self.script = TurnScript::for_turn(self.state.turn.turn_number);
            }
            MatchEvent::Impact { hits, .. } => {
                for hit in hits {
                    log::info!(
                        "  character {} took {} damage (knockback {:.2})",
                        hit.character,
                        hit.damage,
                        hit.knockback
                    );
                }
            }
            MatchEvent::ShotLost { x } => log::info!("Shot lost at x={:.1}", x),
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => MatchSettings::load(path)?,
        None => MatchSettings::default(),
    };
    settings.validate()?;
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 0x5eed,
    };

    log::info!("Crater Duel (headless) starting with seed {}", seed);
    let mut driver = Driver::new(settings, seed);

    let mut frames = 0;
    while driver.state.phase != MatchPhase::GameOver && frames < MAX_FRAMES {
        driver.update(FRAME_DT);
        frames += 1;
    }
    if driver.state.phase != MatchPhase::GameOver {
        log::warn!("Stopped after {} frames without a result", frames);
    }

    let tally = MatchTally::from_characters(&driver.state.characters);
    println!("{}", serde_json::to_string_pretty(&tally)?);
    Ok(())
}
