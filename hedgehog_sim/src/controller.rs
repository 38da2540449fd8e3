// The game controller: rules, turn order and hazard resolution.
//
// `GameController` owns one game: the `World`, the `Hedgehog`, the `GameRng`,
// the `EventBus`, the turn clock and the lives counter. Every player action
// goes through one of its methods (or `apply()` with a `GameCommand`), runs
// to completion, and reports through events.
//
// Move resolution, in order:
//   1. Game over → nothing happens.
//   2. Destination off the map → `InvalidMove`, nothing else changes.
//   3. Curled throttle: while curled only every `curled_move_interval`-th
//      in-bounds request actually moves. Throttled requests cost nothing.
//   4. The hedgehog pays for the step (and may die of exhaustion), the clock
//      ticks down (`TimeOut` at 0). Stop if the game is over.
//   5. Hungry predator on the cell and hedgehog vulnerable → `PredatorDeath`.
//   6. Fox bush → `BushTrapDeath` if vulnerable, else `BushSurvived`.
//   7. Food within reach is eaten automatically (Normal state only).
//   8. Pit → roll `pit_survival_chance`: `PitSurvived` or `PitDeath`.
//   9. Victory check.
//
// Predators only patrol when the external timer calls `tick_predators()`. A
// predator that steps onto the hedgehog's cell triggers `handle_predator()`.
//
// Once `is_game_over()` is true, move/collect/talk/tick are no-ops until
// `restart()`. Curl and uncurl still emit, but a dead hedgehog ignores them.
//
// See also: `session.rs` for lives-aware restarts and the predator timer,
// `event.rs` for the event payloads, `config.rs` for every tunable here.
//
// **Critical constraint: determinism.** Every random outcome draws from
// `self.rng`, in a fixed order per operation. Do not add draws to existing
// paths without accepting that old replays will diverge.

use crate::command::{CommandOutcome, GameCommand};
use crate::config::SimConfig;
use crate::direction::Direction;
use crate::event::{EventBus, GameEvent};
use crate::hedgehog::Hedgehog;
use crate::map::{MapDescription, WorldBuilder};
use crate::npc::TalkResult;
use crate::types::GridCoord;
use crate::world::World;
use hedgehog_prng::GameRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The hedgehog half of a `GameSnapshot`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgehogSnapshot {
    pub position: GridCoord,
    pub energy: u32,
    pub score: u32,
    pub state: String,
}

/// Read-only view of the game for rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub hedgehog: HedgehogSnapshot,
    pub time_remaining: u32,
    pub is_game_over: bool,
    pub lives: u32,
}

#[derive(Debug)]
pub struct GameController {
    config: SimConfig,
    rng: GameRng,
    events: EventBus,
    world: World,
    hedgehog: Hedgehog,
    time_remaining: u32,
    game_over: bool,
    curled_move_counter: u32,
    lives: u32,
}

impl GameController {
    pub fn new(map: &MapDescription, config: SimConfig, seed: u64) -> Self {
        Self::with_rng(map, config, GameRng::new(seed))
    }

    pub fn with_rng(map: &MapDescription, config: SimConfig, mut rng: GameRng) -> Self {
        let world = WorldBuilder::from_description(map).build(&config, &mut rng);
        let hedgehog = Hedgehog::new(config.start_position, config.hedgehog.clone());
        Self {
            time_remaining: config.max_time,
            lives: config.default_lives,
            config,
            rng,
            events: EventBus::new(),
            world,
            hedgehog,
            game_over: false,
            curled_move_counter: 0,
        }
    }

    // --- Accessors ---

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hedgehog(&self) -> &Hedgehog {
        &self.hedgehog
    }

    /// Direct access to the hedgehog, for scenario setup.
    pub fn hedgehog_mut(&mut self) -> &mut Hedgehog {
        &mut self.hedgehog
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over || !self.hedgehog.is_alive()
    }

    pub fn game_state(&self) -> GameSnapshot {
        GameSnapshot {
            hedgehog: HedgehogSnapshot {
                position: self.hedgehog.position(),
                energy: self.hedgehog.energy(),
                score: self.hedgehog.score(),
                state: self.hedgehog.state_name().to_string(),
            },
            time_remaining: self.time_remaining,
            is_game_over: self.is_game_over(),
            lives: self.lives,
        }
    }

    // --- Commands ---

    pub fn apply(&mut self, command: GameCommand) -> CommandOutcome {
        match command {
            GameCommand::Move { .. }
            | GameCommand::CollectFood
            | GameCommand::Talk
            | GameCommand::Tick
                if self.is_game_over() =>
            {
                CommandOutcome::Ignored
            }
            GameCommand::Move { direction } => CommandOutcome::Moved(self.move_hedgehog(direction)),
            GameCommand::CollectFood => CommandOutcome::Collected(self.collect_food()),
            GameCommand::Talk => CommandOutcome::Talked(self.talk_to_npc()),
            GameCommand::Curl => {
                self.curl_hedgehog();
                CommandOutcome::Applied
            }
            GameCommand::Uncurl => {
                self.uncurl_hedgehog();
                CommandOutcome::Applied
            }
            GameCommand::Restart { map } => {
                self.restart(&map);
                CommandOutcome::Applied
            }
            GameCommand::Tick => {
                self.tick_predators();
                CommandOutcome::Applied
            }
        }
    }

    /// Try to step one cell. Returns true if the hedgehog changed cells.
    pub fn move_hedgehog(&mut self, direction: Direction) -> bool {
        if self.is_game_over() {
            return false;
        }

        let (dx, dy) = direction.delta();
        let from = self.hedgehog.position();
        if !self.world.is_valid_position(from.offset(dx, dy)) {
            debug!(%direction, position = %from, "move blocked by map edge");
            self.emit(GameEvent::InvalidMove { direction });
            return false;
        }

        if self.hedgehog.is_vulnerable() {
            self.curled_move_counter = 0;
        } else {
            self.curled_move_counter += 1;
            if self.curled_move_counter % self.config.curled_move_interval.max(1) != 0 {
                return false;
            }
            self.curled_move_counter = 0;
        }

        self.hedgehog.move_by(dx, dy);
        self.decrease_time();
        if self.is_game_over() {
            self.log_game_over();
            return self.hedgehog.position() != from;
        }

        if !self.check_danger() {
            self.collect_nearby_food();
            self.check_pit();
            self.check_victory();
        }
        if self.is_game_over() {
            self.log_game_over();
        }
        self.hedgehog.position() != from
    }

    /// Eat the nearest reachable food. Normal state only.
    pub fn collect_food(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        let collected = self.collect_nearby_food();
        if collected {
            self.check_victory();
        }
        collected
    }

    pub fn talk_to_npc(&mut self) -> Option<TalkResult> {
        if self.is_game_over() || !self.hedgehog.can_talk() {
            return None;
        }
        let npc = self
            .world
            .npc_in_radius(self.hedgehog.position(), self.config.talk_radius)?;

        let dialog = npc.dialog(&mut self.rng);
        let advice = npc.give_advice(self.config.advice_direction, &mut self.rng);
        let warning = npc.predator_warning_message(&self.world);
        let result = TalkResult {
            npc: npc.name().to_string(),
            dialog: warning
                .as_ref()
                .map_or(dialog, |w| w.message.clone()),
            advice,
            warning,
        };
        debug!(npc = %result.npc, %advice, "talked to npc");
        self.emit(GameEvent::NpcTalk(result.clone()));
        Some(result)
    }

    pub fn curl_hedgehog(&mut self) {
        self.hedgehog.curl();
        self.emit(GameEvent::HedgehogCurl);
    }

    pub fn uncurl_hedgehog(&mut self) {
        self.hedgehog.uncurl();
        self.emit(GameEvent::HedgehogUncurl);
    }

    /// Resolve an attack by predator `index` on the hedgehog. Returns true
    /// if the hedgehog died.
    pub fn handle_predator(&mut self, index: usize) -> bool {
        let Some(predator) = self.world.predators().get(index) else {
            return false;
        };
        let name = predator.name().to_string();
        let killed = predator.attack(&mut self.hedgehog);
        let GridCoord { x, y } = self.hedgehog.position();
        debug!(predator = %name, killed, "predator encounter");
        if killed {
            self.emit(GameEvent::PredatorDeath {
                predator: name,
                position_x: x,
                position_y: y,
            });
            self.log_game_over();
        } else {
            self.emit(GameEvent::PredatorSurvived {
                predator: name,
                position_x: x,
                position_y: y,
            });
        }
        killed
    }

    /// Advance every predator's patrol once.
    pub fn tick_predators(&mut self) {
        if self.is_game_over() {
            return;
        }
        let bounds = self.world.bounds();
        for index in 0..self.world.predators().len() {
            let predator = &mut self.world.predators_mut()[index];
            let moved = predator.step(bounds, &mut self.rng);
            if moved && predator.position() == self.hedgehog.position() {
                self.handle_predator(index);
                if self.is_game_over() {
                    return;
                }
            }
        }
    }

    /// Start over on `map`. Lives are not touched.
    pub fn restart(&mut self, map: &MapDescription) {
        self.world = WorldBuilder::from_description(map).build(&self.config, &mut self.rng);
        self.hedgehog = Hedgehog::new(self.config.start_position, self.config.hedgehog.clone());
        self.time_remaining = self.config.max_time;
        self.game_over = false;
        self.curled_move_counter = 0;
        info!(lives = self.lives, "game restarted");
        self.emit(GameEvent::GameRestart);
    }

    // --- Internals ---

    fn emit(&mut self, event: GameEvent) {
        self.events.emit(&event);
    }

    fn decrease_time(&mut self) {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.game_over = true;
            self.emit(GameEvent::TimeOut);
        }
    }

    /// Predator and fox-bush hazards on the current cell. Returns true if
    /// the hedgehog died.
    fn check_danger(&mut self) -> bool {
        let here = self.hedgehog.position();
        let vulnerable = self.hedgehog.is_vulnerable();

        if let Some(predator) = self.world.predator_at(here)
            && vulnerable
            && !predator.is_full()
        {
            let name = predator.name().to_string();
            self.hedgehog.die();
            debug!(predator = %name, position = %here, "walked into a predator");
            self.emit(GameEvent::PredatorDeath {
                predator: name,
                position_x: here.x,
                position_y: here.y,
            });
            return true;
        }

        if self.world.check_bush_trap(here) {
            if vulnerable {
                self.hedgehog.die();
                debug!(position = %here, "fox bush trap");
                self.emit(GameEvent::BushTrapDeath {
                    position_x: here.x,
                    position_y: here.y,
                });
                return true;
            }
            self.emit(GameEvent::BushSurvived {
                position_x: here.x,
                position_y: here.y,
            });
        }
        false
    }

    fn collect_nearby_food(&mut self) -> bool {
        if !self.hedgehog.can_talk() {
            return false;
        }
        let Some(cell) = self
            .world
            .food_in_radius(self.hedgehog.position(), self.config.collect_radius)
        else {
            return false;
        };
        let value = self.world.collect_food(cell);
        self.hedgehog.eat(value);
        self.hedgehog.add_score(value);
        debug!(value, position = %cell, score = self.hedgehog.score(), "food collected");
        self.emit(GameEvent::FoodCollected {
            value,
            position_x: cell.x,
            position_y: cell.y,
        });
        true
    }

    fn check_pit(&mut self) {
        let here = self.hedgehog.position();
        if !self.world.has_pit(here) {
            return;
        }
        let survived = self.rng.chance(self.config.pit_survival_chance);
        debug!(position = %here, survived, "pit roll");
        if survived {
            self.emit(GameEvent::PitSurvived {
                position_x: here.x,
                position_y: here.y,
            });
        } else {
            self.hedgehog.die();
            self.emit(GameEvent::PitDeath {
                position_x: here.x,
                position_y: here.y,
            });
        }
    }

    fn check_victory(&mut self) {
        let score = self.hedgehog.score();
        if self.is_game_over() || score < self.config.win_score {
            return;
        }
        self.game_over = true;
        info!(score, "victory");
        self.emit(GameEvent::Victory { score });
    }

    fn log_game_over(&self) {
        if self.is_game_over() {
            info!(
                score = self.hedgehog.score(),
                state = self.hedgehog.state_name(),
                time_remaining = self.time_remaining,
                "game over"
            );
        }
    }
}
