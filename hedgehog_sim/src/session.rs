// A play session: one map, a game controller and the lives budget.
//
// The controller knows how to restart a game but not whether the player may.
// `Session` adds that policy on top:
//
// - Each `restart()` while lives remain spends one. Spending the last life
//   ends the session (`OutOfLives`) without starting a new game.
// - A `restart()` with no lives left refills them to `default_lives` and
//   starts over (`NewGame`).
//
// It also stands in for the front end's predator timer: `tick(now_ms)` runs
// one predator tick per elapsed `predator.tick_interval_ms` of caller-supplied
// time. The sim never reads a clock itself.
//
// See also: `controller.rs` for the game rules, `hedgehog_cli` which drives a
// session from a script.

use crate::command::{CommandOutcome, GameCommand};
use crate::config::SimConfig;
use crate::controller::{GameController, GameSnapshot};
use crate::map::MapDescription;
use tracing::info;

/// Upper bound on predator ticks one `Session::tick` call will run.
pub const MAX_CATCH_UP_TICKS: u32 = 1_000;

/// What a lives-aware restart did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartOutcome {
    /// A life was spent and a new attempt started.
    LifeLost { remaining: u32 },
    /// The last life was spent. No new attempt was started.
    OutOfLives,
    /// Lives were refilled and a fresh game started.
    NewGame,
}

#[derive(Debug)]
pub struct Session {
    controller: GameController,
    map: MapDescription,
    last_tick_ms: Option<u64>,
}

impl Session {
    pub fn new(map: MapDescription, config: SimConfig, seed: u64) -> Self {
        Self {
            controller: GameController::new(&map, config, seed),
            map,
            last_tick_ms: None,
        }
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GameController {
        &mut self.controller
    }

    pub fn map(&self) -> &MapDescription {
        &self.map
    }

    pub fn lives(&self) -> u32 {
        self.controller.lives()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.controller.game_state()
    }

    /// Apply a command. `Restart` commands swap in their map and go through
    /// the lives policy like `restart()`.
    pub fn apply(&mut self, command: GameCommand) -> CommandOutcome {
        match command {
            GameCommand::Restart { map } => {
                self.map = map;
                self.restart();
                CommandOutcome::Applied
            }
            other => self.controller.apply(other),
        }
    }

    pub fn restart(&mut self) -> RestartOutcome {
        let lives = self.controller.lives();
        let outcome = if lives > 0 {
            let remaining = lives - 1;
            self.controller.set_lives(remaining);
            if remaining == 0 {
                info!("out of lives");
                return RestartOutcome::OutOfLives;
            }
            RestartOutcome::LifeLost { remaining }
        } else {
            self.controller
                .set_lives(self.controller.config().default_lives);
            RestartOutcome::NewGame
        };
        self.controller.restart(&self.map);
        self.last_tick_ms = None;
        outcome
    }

    /// Run the predator ticks due by `now_ms`. The first call only sets the
    /// time base. At most `MAX_CATCH_UP_TICKS` run per call and none once the
    /// game is over; either way the time base jumps to `now_ms`. Returns how
    /// many ticks ran.
    pub fn tick(&mut self, now_ms: u64) -> u32 {
        let interval = self.controller.config().predator.tick_interval_ms.max(1);
        let Some(mut last) = self.last_tick_ms else {
            self.last_tick_ms = Some(now_ms);
            return 0;
        };
        let mut ran = 0;
        while now_ms.saturating_sub(last) >= interval {
            if ran == MAX_CATCH_UP_TICKS || self.controller.is_game_over() {
                last = now_ms;
                break;
            }
            last += interval;
            self.controller.tick_predators();
            ran += 1;
        }
        self.last_tick_ms = Some(last);
        ran
    }
}
