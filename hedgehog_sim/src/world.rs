// The forest grid and its entity registry.
//
// `World` owns every static and patrolling thing on the map: pits, food,
// bushes (optionally hiding a fox), NPCs and predators. It answers the
// spatial questions the controller and NPCs ask (bounds, food within a
// radius, nearest predator, predators along a ray) and owns nothing about
// game rules; the controller decides what a pit or a fox bush does to the
// hedgehog.
//
// Cell-keyed collections are `BTreeMap`/`BTreeSet` keyed by `GridCoord`, so
// inserting at an occupied cell overwrites and iteration order is stable.
// NPCs and predators are `Vec`s in registration order; several queries break
// ties by that order.
//
// `WorldBuilder` drops off-map descriptors, so every registered coordinate
// lies inside the grid. The `add_*` methods themselves do not check bounds.
//
// See also: `map.rs` for `WorldBuilder`, `predator.rs` / `npc.rs` for the
// entities, `controller.rs` for hazard resolution.
//
// **Critical constraint: determinism.** Every query must be a pure function
// of the registered entities. No `HashMap` iteration here.

use crate::direction::Direction;
use crate::npc::Npc;
use crate::predator::Predator;
use crate::types::GridCoord;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// A bush cell. Food under a bush cannot be collected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bush {
    pub has_fox: bool,
}

/// The rectangle `[0, width) x [0, height)`. Copied into predators so they
/// can check a step while the world is mutably borrowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn contains(self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }
}

/// One predator seen along a ray, with its index in `World::predators()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredatorSighting {
    pub index: usize,
    pub distance: u32,
}

/// Names that mark an NPC as the fox guarding a bush.
const FOX_TAGS: [&str; 2] = ["Fox", "Лисиця"];

#[derive(Clone, Debug)]
pub struct World {
    bounds: Bounds,
    pits: BTreeSet<GridCoord>,
    food: BTreeMap<GridCoord, u32>,
    npcs: Vec<Npc>,
    predators: Vec<Predator>,
    bushes: BTreeMap<GridCoord, Bush>,
}

impl World {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            bounds: Bounds { width, height },
            pits: BTreeSet::new(),
            food: BTreeMap::new(),
            npcs: Vec::new(),
            predators: Vec::new(),
            bushes: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.bounds.width
    }

    pub fn height(&self) -> i32 {
        self.bounds.height
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_valid_position(&self, coord: GridCoord) -> bool {
        self.bounds.contains(coord)
    }

    // --- Pits ---

    pub fn add_pit(&mut self, coord: GridCoord) {
        self.pits.insert(coord);
    }

    pub fn has_pit(&self, coord: GridCoord) -> bool {
        self.pits.contains(&coord)
    }

    pub fn pits(&self) -> &BTreeSet<GridCoord> {
        &self.pits
    }

    // --- Food ---

    pub fn add_food(&mut self, coord: GridCoord, value: u32) {
        self.food.insert(coord, value);
    }

    pub fn has_food(&self, coord: GridCoord) -> bool {
        self.food.contains_key(&coord)
    }

    /// Remove the food at `coord` and return its value, or 0 if there was
    /// none.
    pub fn collect_food(&mut self, coord: GridCoord) -> u32 {
        self.food.remove(&coord).unwrap_or(0)
    }

    /// First collectable food within Manhattan `radius` of `center`.
    ///
    /// The center cell is checked first, then offsets with `dx` as the outer
    /// loop and `dy` as the inner one, both ascending from `-radius`. Food
    /// under a bush is skipped.
    pub fn food_in_radius(&self, center: GridCoord, radius: u32) -> Option<GridCoord> {
        if self.is_collectable(center) {
            return Some(center);
        }
        let r = radius as i32;
        for dx in -r..=r {
            for dy in -r..=r {
                if (dx, dy) == (0, 0) || dx.unsigned_abs() + dy.unsigned_abs() > radius {
                    continue;
                }
                let cell = center.offset(dx, dy);
                if self.is_collectable(cell) {
                    return Some(cell);
                }
            }
        }
        None
    }

    fn is_collectable(&self, coord: GridCoord) -> bool {
        self.has_food(coord) && !self.has_bush(coord)
    }

    pub fn food(&self) -> &BTreeMap<GridCoord, u32> {
        &self.food
    }

    // --- NPCs ---

    pub fn add_npc(&mut self, npc: Npc) {
        self.npcs.push(npc);
    }

    pub fn npc_at(&self, coord: GridCoord) -> Option<&Npc> {
        self.npc_in_radius(coord, 1)
    }

    /// An NPC standing exactly on `coord`, else the first NPC (registration
    /// order) within Manhattan `radius`.
    pub fn npc_in_radius(&self, coord: GridCoord, radius: u32) -> Option<&Npc> {
        self.npcs
            .iter()
            .find(|npc| npc.position() == coord)
            .or_else(|| {
                self.npcs
                    .iter()
                    .find(|npc| npc.position().manhattan_distance(coord) <= radius)
            })
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    // --- Predators ---

    pub fn add_predator(&mut self, predator: Predator) {
        self.predators.push(predator);
    }

    pub fn predator_at(&self, coord: GridCoord) -> Option<&Predator> {
        self.predators.iter().find(|p| p.position() == coord)
    }

    pub fn predator_at_mut(&mut self, coord: GridCoord) -> Option<&mut Predator> {
        self.predators.iter_mut().find(|p| p.position() == coord)
    }

    /// Index of the first predator standing on `coord`.
    pub fn predator_index_at(&self, coord: GridCoord) -> Option<usize> {
        self.predators.iter().position(|p| p.position() == coord)
    }

    /// The predator closest to `coord` within `max_distance`. Ties go to the
    /// earliest registered.
    pub fn nearest_predator(&self, coord: GridCoord, max_distance: u32) -> Option<&Predator> {
        self.nearest_predator_index(coord, max_distance)
            .map(|index| &self.predators[index])
    }

    pub fn nearest_predator_index(&self, coord: GridCoord, max_distance: u32) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (index, predator) in self.predators.iter().enumerate() {
            let distance = predator.position().manhattan_distance(coord);
            if distance <= max_distance && best.is_none_or(|(_, d)| distance < d) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    /// The first predator along the ray from `origin` in `direction`.
    pub fn predator_in_front_of(
        &self,
        origin: GridCoord,
        direction: Direction,
        max_distance: u32,
    ) -> Option<&Predator> {
        self.scan_ray(origin, direction, max_distance)
            .next()
            .map(|s| &self.predators[s.index])
    }

    /// Every predator along the ray from `origin` in `direction`, nearest
    /// first. The scan stops at the edge of the map.
    pub fn predators_in_direction(
        &self,
        origin: GridCoord,
        direction: Direction,
        max_distance: u32,
    ) -> SmallVec<[PredatorSighting; 4]> {
        self.scan_ray(origin, direction, max_distance).collect()
    }

    fn scan_ray(
        &self,
        origin: GridCoord,
        direction: Direction,
        max_distance: u32,
    ) -> impl Iterator<Item = PredatorSighting> + '_ {
        let (dx, dy) = direction.delta();
        (1..=max_distance)
            .map(move |distance| {
                let d = distance as i32;
                (origin.offset(dx * d, dy * d), distance)
            })
            .take_while(|&(cell, _)| self.is_valid_position(cell))
            .filter_map(|(cell, distance)| {
                self.predator_index_at(cell)
                    .map(|index| PredatorSighting { index, distance })
            })
    }

    pub fn predators(&self) -> &[Predator] {
        &self.predators
    }

    pub fn predators_mut(&mut self) -> &mut [Predator] {
        &mut self.predators
    }

    // --- Bushes ---

    pub fn add_bush(&mut self, coord: GridCoord, has_fox: bool) {
        self.bushes.insert(coord, Bush { has_fox });
    }

    pub fn has_bush(&self, coord: GridCoord) -> bool {
        self.bushes.contains_key(&coord)
    }

    pub fn bush(&self, coord: GridCoord) -> Option<Bush> {
        self.bushes.get(&coord).copied()
    }

    /// Whether `coord` is a bush with a fox in it.
    pub fn check_bush_trap(&self, coord: GridCoord) -> bool {
        self.bush(coord).is_some_and(|b| b.has_fox)
    }

    /// Whether a fox NPC stands guard on the side of `bush` the hedgehog is
    /// approaching from. Only the dominant axis of the approach vector is
    /// considered; a tie goes to the vertical axis.
    pub fn fox_guards_bush(&self, bush: GridCoord, approach_from: GridCoord) -> bool {
        if !self.has_bush(bush) {
            return false;
        }
        let vx = bush.x.saturating_sub(approach_from.x);
        let vy = bush.y.saturating_sub(approach_from.y);
        let guard = if vx.unsigned_abs() > vy.unsigned_abs() {
            bush.offset(-vx.signum(), 0)
        } else if vy > 0 {
            bush.offset(0, -1)
        } else {
            bush.offset(0, 1)
        };
        self.npcs
            .iter()
            .find(|npc| npc.position() == guard)
            .is_some_and(|npc| FOX_TAGS.iter().any(|tag| npc.name().contains(tag)))
    }

    pub fn bushes(&self) -> &BTreeMap<GridCoord, Bush> {
        &self.bushes
    }
}
