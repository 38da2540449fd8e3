// Data-driven game configuration.
//
// All tunable simulation parameters live here in `SimConfig`: survival
// chances, move costs, leash radii, the NPC honesty rate, timers. The sim
// never reads module-level constants for these; the controller and the
// entities it builds take the values from the config they were given. This
// keeps the core free of hidden global state and lets tests dial in edge
// cases (e.g. a pit survival chance of 1.0) without touching code.
//
// Parameters are grouped the way the entities consume them:
// `HedgehogRules` (energy budget and move costs), `PredatorRules` (patrol
// cadence and leash), `NpcRules` (honesty rate and sensing radius). Every
// struct is `#[serde(default)]`, so a config JSON only needs the fields it
// overrides.
//
// See also: `controller.rs` which owns the `SimConfig`, `map.rs` which reads
// `PredatorRules`/`NpcRules` while building a world.
//
// **Critical constraint: determinism.** Config values feed directly into
// simulation logic. Replays must use the config they were recorded with.

use crate::direction::Direction;
use crate::error::{SimError, SimResult};
use crate::types::GridCoord;
use serde::{Deserialize, Serialize};

/// Energy budget and per-state move costs of the hedgehog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HedgehogRules {
    /// Energy at spawn and the ceiling for eating.
    pub max_energy: u32,
    /// Energy spent per move while in the Normal state.
    pub normal_move_cost: u32,
    /// Energy spent per move while curled up.
    pub curled_move_cost: u32,
}

impl Default for HedgehogRules {
    fn default() -> Self {
        Self {
            max_energy: 100,
            normal_move_cost: 1,
            curled_move_cost: 2,
        }
    }
}

/// Patrol behaviour shared by every predator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorRules {
    /// A predator only attempts a step on every Nth call to `step()`.
    pub move_interval: u32,
    /// Maximum Manhattan distance from the spawn anchor.
    pub leash_radius: u32,
    /// Wall-clock cadence of predator ticks, used by `Session::tick()`.
    pub tick_interval_ms: u64,
}

impl Default for PredatorRules {
    fn default() -> Self {
        Self {
            move_interval: 10,
            leash_radius: 10,
            tick_interval_ms: 500,
        }
    }
}

/// Advice and warning parameters for NPCs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcRules {
    /// Probability a deceptive NPC tells the true direction.
    pub honesty_rate: f64,
    /// How far (Manhattan) an NPC can sense predators.
    pub sensing_radius: u32,
    /// Personality seed is `x * position_multiplier + y`.
    pub position_multiplier: i64,
}

impl Default for NpcRules {
    fn default() -> Self {
        Self {
            honesty_rate: 0.6,
            sensing_radius: 15,
            position_multiplier: 1000,
        }
    }
}

/// Top-level simulation configuration. Never mutated at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Turns available per game; every advancing move costs one.
    pub max_time: u32,
    /// Lives a fresh session starts with.
    pub default_lives: u32,
    /// Where the hedgehog spawns on start and restart.
    pub start_position: GridCoord,
    /// Probability of climbing back out of a pit.
    pub pit_survival_chance: f64,
    /// While curled, only every Nth move request actually moves.
    pub curled_move_interval: u32,
    /// Collecting this much score wins the game.
    pub win_score: u32,
    /// Manhattan radius searched by `collect_food`.
    pub collect_radius: u32,
    /// Manhattan radius searched by `talk_to_npc`.
    pub talk_radius: u32,
    /// Direction NPC advice is measured against.
    pub advice_direction: Direction,
    pub hedgehog: HedgehogRules,
    pub predator: PredatorRules,
    pub npc: NpcRules,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_time: 100,
            default_lives: 5,
            start_position: GridCoord::new(0, 0),
            pit_survival_chance: 0.5,
            curled_move_interval: 2,
            win_score: 1000,
            collect_radius: 1,
            talk_radius: 1,
            advice_direction: Direction::North,
            hedgehog: HedgehogRules::default(),
            predator: PredatorRules::default(),
            npc: NpcRules::default(),
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        check_probability("pit_survival_chance", self.pit_survival_chance)?;
        check_probability("npc.honesty_rate", self.npc.honesty_rate)?;
        if self.curled_move_interval == 0 {
            return Err(SimError::InvalidConfig(
                "curled_move_interval must be at least 1".into(),
            ));
        }
        if self.predator.move_interval == 0 {
            return Err(SimError::InvalidConfig(
                "predator.move_interval must be at least 1".into(),
            ));
        }
        if self.hedgehog.max_energy == 0 {
            return Err(SimError::InvalidConfig(
                "hedgehog.max_energy must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
