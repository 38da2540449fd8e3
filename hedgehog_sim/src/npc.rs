// Non-player characters: advice and the seeded deception protocol.
//
// NPCs stand still and talk. Each carries an `AdviceStrategy`:
//
// - `Honest` always tells the true direction and only warns about real,
//   hungry predators.
// - `Deceptive { honesty_rate }` tells the true direction with probability
//   `honesty_rate` (drawn fresh from the game RNG per question), and lies
//   about predators according to a fixed personality.
//
// The personality is not random per conversation. Every "should I lie",
// "should I warn" and "which line do I say" decision is a hash of the NPC's
// personality seed (`x * position_multiplier + y`) plus a small fixed offset,
// so asking the same NPC twice in the same world state gives the same answer.
// The hash is `|32 * seed| mod 1000`, and a derived flag is "true" when the
// hashed value is even. Offsets:
//
//   +1  index of the predator a liar invents a warning about
//   +2  whether that invented warning says "danger"
//   +3  whether a liar flips the real danger signal
//   +10 / +11  warn-line index (deceptive / honest)
//   +12 / +13  safe-line index (deceptive / honest)
//   +14 no-threat line index
//
// See also: `world.rs` for `nearest_predator()`, `controller.rs` for
// `talk_to_npc()` which packages all of this into a `TalkResult`.
//
// **Critical constraint: determinism.** The offsets and the hash are part of
// replay compatibility. Changing them changes what every NPC says.

use crate::config::NpcRules;
use crate::direction::{ADVICE_DIRECTIONS, Direction};
use crate::types::GridCoord;
use crate::world::World;
use hedgehog_prng::GameRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const HASH_MULTIPLIER: i64 = 32;
const HASH_MODULO: i64 = 1000;

const OFFSET_PREDATOR_INDEX: i64 = 1;
const OFFSET_SHOULD_WARN: i64 = 2;
const OFFSET_SHOULD_LIE: i64 = 3;
const OFFSET_WARN_DECEPTIVE: i64 = 10;
const OFFSET_WARN_HONEST: i64 = 11;
const OFFSET_SAFE_DECEPTIVE: i64 = 12;
const OFFSET_SAFE_HONEST: i64 = 13;
const OFFSET_NO_THREAT: i64 = 14;

const NO_THREAT_LINES: [&str; 3] = [
    "All is well! There is no danger around here.",
    "You can walk on calmly, it's safe here.",
    "Don't worry, everything is fine.",
];

fn warn_lines(predator: &str) -> [String; 3] {
    [
        format!("Careful! {predator} is close by! Curl up or you won't make it!"),
        format!("Beware of {predator}! It is dangerous!"),
        format!("{predator} is looking for food! Watch your step!"),
    ]
}

fn safe_lines(predator: &str) -> [String; 3] {
    [
        format!("All is well! {predator} has eaten, no need to fear it."),
        format!("{predator} isn't dangerous right now, you can pass."),
        format!("Don't worry, {predator} has already had its fill!"),
    ]
}

/// How an NPC answers questions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdviceStrategy {
    Honest,
    Deceptive {
        #[serde(rename = "honestyRate")]
        honesty_rate: f64,
    },
}

impl AdviceStrategy {
    /// The strategy named by a map's NPC `type` tag. Only `"honest"` is
    /// honest; every other tag lies at the configured rate.
    pub fn from_tag(tag: &str, rules: &NpcRules) -> Self {
        if tag == "honest" {
            AdviceStrategy::Honest
        } else {
            AdviceStrategy::Deceptive {
                honesty_rate: rules.honesty_rate,
            }
        }
    }

    pub fn give_advice(self, actual: Direction, rng: &mut GameRng) -> Direction {
        match self {
            AdviceStrategy::Honest => actual,
            AdviceStrategy::Deceptive { honesty_rate } => {
                if rng.chance(honesty_rate) {
                    return actual;
                }
                let others: SmallVec<[Direction; 4]> = ADVICE_DIRECTIONS
                    .iter()
                    .copied()
                    .filter(|&d| d != actual)
                    .collect();
                rng.pick(&others).copied().unwrap_or(actual)
            }
        }
    }
}

/// What an NPC believes (or claims) about a predator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredatorWarning {
    /// Index into `World::predators()`.
    pub predator_index: usize,
    pub should_warn: bool,
    pub is_truthful: bool,
}

/// A warning rendered as a line of dialog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningMessage {
    pub message: String,
    /// Whether the NPC's words, if believed, would make the hedgehog curl
    /// to its own benefit.
    pub should_curl: bool,
    pub is_warning: bool,
    pub predator: Option<String>,
}

/// Everything one conversation produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalkResult {
    pub npc: String,
    pub dialog: String,
    pub advice: Direction,
    pub warning: Option<WarningMessage>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Npc {
    name: String,
    strategy: AdviceStrategy,
    position: GridCoord,
    dialogs: Vec<String>,
    sensing_radius: u32,
    position_multiplier: i64,
}

impl Npc {
    pub fn new(name: impl Into<String>, strategy: AdviceStrategy, position: GridCoord) -> Self {
        let rules = NpcRules::default();
        Self {
            name: name.into(),
            strategy,
            position,
            dialogs: Vec::new(),
            sensing_radius: rules.sensing_radius,
            position_multiplier: rules.position_multiplier,
        }
    }

    /// Take sensing radius and personality-seed multiplier from `rules`.
    pub fn with_rules(mut self, rules: &NpcRules) -> Self {
        self.sensing_radius = rules.sensing_radius;
        self.position_multiplier = rules.position_multiplier;
        self
    }

    pub fn add_dialog(&mut self, line: impl Into<String>) {
        self.dialogs.push(line.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> AdviceStrategy {
        self.strategy
    }

    pub fn position(&self) -> GridCoord {
        self.position
    }

    pub fn dialogs(&self) -> &[String] {
        &self.dialogs
    }

    pub fn is_deceptive(&self) -> bool {
        matches!(self.strategy, AdviceStrategy::Deceptive { .. })
    }

    pub fn give_advice(&self, actual: Direction, rng: &mut GameRng) -> Direction {
        self.strategy.give_advice(actual, rng)
    }

    /// A line from the dialog pool, or a stock line when the pool is empty.
    pub fn dialog(&self, rng: &mut GameRng) -> String {
        match rng.pick(&self.dialogs) {
            Some(line) => line.clone(),
            None => format!("{} has nothing to say.", self.name),
        }
    }

    pub fn personality_seed(&self) -> i64 {
        i64::from(self.position.x) * self.position_multiplier + i64::from(self.position.y)
    }

    fn trait_value(&self, offset: i64) -> usize {
        deterministic_value(self.personality_seed() + offset) as usize
    }

    fn trait_flag(&self, offset: i64) -> bool {
        self.trait_value(offset) % 2 == 0
    }

    pub fn predator_warning(&self, world: &World) -> Option<PredatorWarning> {
        let predators = world.predators();
        let nearest = world.nearest_predator_index(self.position, self.sensing_radius);

        let Some(index) = nearest else {
            if !self.is_deceptive() || predators.is_empty() {
                return None;
            }
            return Some(PredatorWarning {
                predator_index: self.trait_value(OFFSET_PREDATOR_INDEX) % predators.len(),
                should_warn: self.trait_flag(OFFSET_SHOULD_WARN),
                is_truthful: false,
            });
        };

        let dangerous = !predators[index].is_full();
        let mut should_warn = dangerous;
        if self.is_deceptive() && self.trait_flag(OFFSET_SHOULD_LIE) {
            should_warn = !should_warn;
        }
        Some(PredatorWarning {
            predator_index: index,
            should_warn,
            is_truthful: should_warn == dangerous,
        })
    }

    pub fn predator_warning_message(&self, world: &World) -> Option<WarningMessage> {
        let deceptive = self.is_deceptive();
        let Some(warning) = self.predator_warning(world) else {
            if !deceptive {
                return None;
            }
            let line = NO_THREAT_LINES[self.trait_value(OFFSET_NO_THREAT) % NO_THREAT_LINES.len()];
            return Some(WarningMessage {
                message: line.to_string(),
                should_curl: false,
                is_warning: false,
                predator: None,
            });
        };

        let predator = world.predators()[warning.predator_index].name();
        let (pool, offset, should_curl) = if warning.should_warn {
            let offset = if deceptive {
                OFFSET_WARN_DECEPTIVE
            } else {
                OFFSET_WARN_HONEST
            };
            (warn_lines(predator), offset, !deceptive || warning.is_truthful)
        } else {
            let offset = if deceptive {
                OFFSET_SAFE_DECEPTIVE
            } else {
                OFFSET_SAFE_HONEST
            };
            (safe_lines(predator), offset, deceptive && !warning.is_truthful)
        };
        let message = pool[self.trait_value(offset) % pool.len()].clone();
        tracing::debug!(
            npc = %self.name,
            predator,
            should_warn = warning.should_warn,
            truthful = warning.is_truthful,
            "npc predator warning"
        );
        Some(WarningMessage {
            message,
            should_curl,
            is_warning: warning.should_warn,
            predator: Some(predator.to_string()),
        })
    }
}

/// `|32 * seed| mod 1000`.
pub fn deterministic_value(seed: i64) -> i64 {
    seed.wrapping_mul(HASH_MULTIPLIER).wrapping_abs() % HASH_MODULO
}
