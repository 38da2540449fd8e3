// Patrolling predators.
//
// A predator wanders horizontally around the cell it spawned on (its
// anchor). It only acts on every `move_interval`-th call to `step()`; on an
// acting tick it flips its direction bias if it has reached the leash
// radius, then picks `+bias` or `-bias` uniformly and takes the step only if
// the destination is on the map and still within the leash. Otherwise it
// stays put for this tick.
//
// A full (`is_full`) predator never attacks. Attacks only kill a vulnerable
// (Normal) hedgehog.
//
// See also: `world.rs` which owns predators, `controller.rs` which drives
// `step()` from `tick_predators()` and resolves encounters.
//
// **Critical constraint: determinism.** Direction choices come from the
// controller's `GameRng`, never from an ambient source.

use crate::config::PredatorRules;
use crate::hedgehog::Hedgehog;
use crate::types::GridCoord;
use crate::world::Bounds;
use hedgehog_prng::GameRng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Predator {
    name: String,
    position: GridCoord,
    anchor: GridCoord,
    leash_radius: u32,
    move_interval: u32,
    /// Preferred horizontal step, +1 or -1.
    bias: i32,
    move_counter: u32,
    is_full: bool,
}

impl Predator {
    /// A hungry predator anchored at `position`, biased to the right.
    pub fn new(name: impl Into<String>, position: GridCoord, rules: &PredatorRules) -> Self {
        Self {
            name: name.into(),
            position,
            anchor: position,
            leash_radius: rules.leash_radius,
            move_interval: rules.move_interval.max(1),
            bias: 1,
            move_counter: 0,
            is_full: false,
        }
    }

    pub fn with_full(mut self, is_full: bool) -> Self {
        self.is_full = is_full;
        self
    }

    /// Set the initial bias. Any negative value means left.
    pub fn with_bias(mut self, bias: i32) -> Self {
        self.bias = if bias < 0 { -1 } else { 1 };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> GridCoord {
        self.position
    }

    pub fn anchor(&self) -> GridCoord {
        self.anchor
    }

    pub fn bias(&self) -> i32 {
        self.bias
    }

    pub fn is_full(&self) -> bool {
        self.is_full
    }

    /// Advance the patrol by one tick. Returns true if the predator moved.
    pub fn step(&mut self, bounds: Bounds, rng: &mut GameRng) -> bool {
        self.move_counter = self.move_counter.wrapping_add(1);
        if self.move_counter % self.move_interval != 0 {
            return false;
        }

        if self.position.manhattan_distance(self.anchor) >= self.leash_radius {
            self.bias = -self.bias;
        }

        let dx = if rng.chance(0.5) { self.bias } else { -self.bias };
        let target = self.position.offset(dx, 0);
        if !bounds.contains(target) || target.manhattan_distance(self.anchor) > self.leash_radius {
            return false;
        }

        tracing::debug!(
            predator = %self.name,
            from = %self.position,
            to = %target,
            "predator moved"
        );
        self.position = target;
        true
    }

    /// Try to kill the hedgehog. Returns true if it died.
    pub fn attack(&self, hedgehog: &mut Hedgehog) -> bool {
        if self.is_full || !hedgehog.is_vulnerable() {
            return false;
        }
        hedgehog.die();
        true
    }
}
