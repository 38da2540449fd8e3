// The hedgehog and its behavioral state machine.
//
// `HedgehogState` is a closed enum {Normal, Curled, Dead}. Each state answers
// the same questions (move cost, vulnerability, whether it can talk or pick
// up food) and knows its own legal transitions; the hedgehog replaces its
// state wholesale on a transition and nothing else ever mutates it.
//
//   Normal --curl()--> Curled --uncurl()--> Normal
//   any    --die()---> Dead   (terminal until the controller builds a new
//                              hedgehog on restart)
//
// Energy accounting lives on `Hedgehog::move_by()` and `consume_energy()`:
// energy is clamped to `[0, max_energy]` and the hedgehog dies exactly when
// it reaches 0. A move the hedgehog cannot afford drains energy to 0 and
// kills it without moving.
//
// See also: `config.rs` for `HedgehogRules`, `controller.rs` which is the
// only caller that mutates a hedgehog during play.

use crate::config::HedgehogRules;
use crate::types::GridCoord;
use serde::{Deserialize, Serialize};

/// Behavioral state of the hedgehog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HedgehogState {
    /// Walking around: can be eaten, can talk, can collect food.
    Normal,
    /// Rolled into a ball: immune to predators and fox bushes, slow, mute.
    Curled,
    /// Terminal.
    Dead,
}

impl HedgehogState {
    pub const fn name(self) -> &'static str {
        match self {
            HedgehogState::Normal => "Normal",
            HedgehogState::Curled => "Curled",
            HedgehogState::Dead => "Dead",
        }
    }

    /// Energy one move costs in this state. Dead costs 0, which makes every
    /// move a no-op.
    pub fn move_cost(self, rules: &HedgehogRules) -> u32 {
        match self {
            HedgehogState::Normal => rules.normal_move_cost,
            HedgehogState::Curled => rules.curled_move_cost,
            HedgehogState::Dead => 0,
        }
    }

    pub const fn is_vulnerable(self) -> bool {
        matches!(self, HedgehogState::Normal)
    }

    /// Talking and collecting food share this gate.
    pub const fn can_talk(self) -> bool {
        matches!(self, HedgehogState::Normal)
    }

    /// State after a `curl()` request.
    pub const fn curled(self) -> Self {
        match self {
            HedgehogState::Normal => HedgehogState::Curled,
            other => other,
        }
    }

    /// State after an `uncurl()` request.
    pub const fn uncurled(self) -> Self {
        match self {
            HedgehogState::Curled => HedgehogState::Normal,
            other => other,
        }
    }
}

/// The player character.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hedgehog {
    position: GridCoord,
    energy: u32,
    score: u32,
    state: HedgehogState,
    rules: HedgehogRules,
}

impl Hedgehog {
    /// A fresh hedgehog: full energy, no score, Normal state.
    pub fn new(position: GridCoord, rules: HedgehogRules) -> Self {
        Self {
            position,
            energy: rules.max_energy,
            score: 0,
            state: HedgehogState::Normal,
            rules,
        }
    }

    pub fn position(&self) -> GridCoord {
        self.position
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> HedgehogState {
        self.state
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn curl(&mut self) {
        self.state = self.state.curled();
    }

    pub fn uncurl(&mut self) {
        self.state = self.state.uncurled();
    }

    pub fn die(&mut self) {
        self.state = HedgehogState::Dead;
    }

    pub fn is_alive(&self) -> bool {
        self.state != HedgehogState::Dead
    }

    pub fn is_vulnerable(&self) -> bool {
        self.state.is_vulnerable()
    }

    pub fn can_talk(&self) -> bool {
        self.state.can_talk()
    }

    /// Move by `(dx, dy)`, paying the current state's energy cost.
    ///
    /// The caller is responsible for bounds checking.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let cost = self.state.move_cost(&self.rules);
        if cost == 0 {
            return;
        }
        if self.energy < cost {
            self.energy = 0;
            self.die();
            return;
        }
        self.position = self.position.offset(dx, dy);
        self.consume_energy(cost);
    }

    /// Spend energy, dying if it runs out.
    pub fn consume_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_sub(amount);
        if self.energy == 0 {
            self.die();
        }
    }

    /// Regain energy, capped at the maximum.
    pub fn eat(&mut self, amount: u32) {
        self.energy = self
            .energy
            .saturating_add(amount)
            .min(self.rules.max_energy);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Teleport without paying energy. Used by scenario setup and tests.
    pub fn place_at(&mut self, position: GridCoord) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hedgehog() -> Hedgehog {
        Hedgehog::new(GridCoord::new(0, 0), HedgehogRules::default())
    }

    #[test]
    fn new_hedgehog_is_fresh() {
        let h = hedgehog();
        assert_eq!(h.energy(), 100);
        assert_eq!(h.score(), 0);
        assert_eq!(h.state(), HedgehogState::Normal);
        assert!(h.is_alive());
    }

    #[test]
    fn curl_and_uncurl_round_trip() {
        let mut h = hedgehog();
        h.curl();
        assert_eq!(h.state_name(), "Curled");
        assert!(!h.is_vulnerable());
        assert!(!h.can_talk());
        h.uncurl();
        assert_eq!(h.state_name(), "Normal");
        assert!(h.is_vulnerable());
        assert!(h.can_talk());
    }

    #[test]
    fn illegal_transitions_are_noops() {
        let mut h = hedgehog();
        h.uncurl();
        assert_eq!(h.state(), HedgehogState::Normal);
        h.curl();
        h.curl();
        assert_eq!(h.state(), HedgehogState::Curled);
        h.die();
        h.curl();
        h.uncurl();
        assert_eq!(h.state(), HedgehogState::Dead);
    }

    #[test]
    fn move_costs_depend_on_state() {
        let mut h = hedgehog();
        h.move_by(1, 0);
        assert_eq!(h.position(), GridCoord::new(1, 0));
        assert_eq!(h.energy(), 99);
        h.curl();
        h.move_by(0, 1);
        assert_eq!(h.position(), GridCoord::new(1, 1));
        assert_eq!(h.energy(), 97);
    }

    #[test]
    fn dead_hedgehog_does_not_move() {
        let mut h = hedgehog();
        h.die();
        h.move_by(1, 0);
        assert_eq!(h.position(), GridCoord::new(0, 0));
        assert_eq!(h.energy(), 100);
    }

    #[test]
    fn last_point_of_energy_moves_then_dies() {
        let mut h = hedgehog();
        h.consume_energy(99);
        h.move_by(1, 0);
        assert_eq!(h.position(), GridCoord::new(1, 0));
        assert_eq!(h.energy(), 0);
        assert!(!h.is_alive());
    }

    #[test]
    fn unaffordable_move_drains_and_kills_in_place() {
        let mut h = hedgehog();
        h.consume_energy(99);
        h.curl();
        h.move_by(1, 0);
        assert_eq!(h.position(), GridCoord::new(0, 0));
        assert_eq!(h.energy(), 0);
        assert_eq!(h.state(), HedgehogState::Dead);
    }

    #[test]
    fn energy_is_clamped_both_ways() {
        let mut h = hedgehog();
        h.consume_energy(5);
        h.eat(20);
        assert_eq!(h.energy(), 100);
        h.consume_energy(500);
        assert_eq!(h.energy(), 0);
        assert!(!h.is_alive());
    }

    #[test]
    fn score_accumulates() {
        let mut h = hedgehog();
        h.add_score(10);
        h.add_score(15);
        assert_eq!(h.score(), 25);
    }
}
