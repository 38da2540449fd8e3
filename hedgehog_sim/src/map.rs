// Map descriptions and the world builder.
//
// `MapDescription` is the serde model of a map JSON file (camelCase keys, the
// format the game's map assets use). It is deliberately forgiving: missing
// arrays are empty, a missing or zero width/height falls back to 10, a missing
// `dialogs` list is empty, a missing `hasFox`/`isFull` is false. Only a JSON
// syntax (or type) error makes `from_json` fail.
//
// `WorldBuilder` is a fluent builder over the same data. `build()` turns it
// into a `World`, applying `SimConfig` to the entities it creates: NPC honesty
// rate and sensing radius, predator leash and move interval. Each predator's
// initial direction bias is drawn from the game RNG in registration order,
// so a rebuild with the same RNG state produces the same patrols.
//
// Descriptors outside the grid are skipped with a warning, so a built world
// only ever holds on-map coordinates. Skipped predators draw no bias.
//
// See also: `world.rs` for the built `World`, `controller.rs` which rebuilds
// the world on restart.

use crate::config::SimConfig;
use crate::error::SimResult;
use crate::npc::{AdviceStrategy, Npc};
use crate::predator::Predator;
use crate::types::GridCoord;
use crate::world::World;
use hedgehog_prng::GameRng;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: i32 = 10;
pub const DEFAULT_HEIGHT: i32 = 10;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDesc {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodDesc {
    pub x: i32,
    pub y: i32,
    pub value: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcDesc {
    pub name: String,
    /// `"honest"` or anything else (deceptive).
    #[serde(rename = "type", default)]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub dialogs: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredatorDesc {
    pub name: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub is_full: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BushDesc {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub has_fox: bool,
}

/// A map as loaded from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapDescription {
    pub width: i32,
    pub height: i32,
    pub pits: Vec<CellDesc>,
    pub food: Vec<FoodDesc>,
    pub npcs: Vec<NpcDesc>,
    pub predators: Vec<PredatorDesc>,
    pub bushes: Vec<BushDesc>,
}

impl Default for MapDescription {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pits: Vec::new(),
            food: Vec::new(),
            npcs: Vec::new(),
            predators: Vec::new(),
            bushes: Vec::new(),
        }
    }
}

impl MapDescription {
    pub fn from_json(json: &str) -> SimResult<Self> {
        let mut desc: MapDescription = serde_json::from_str(json)?;
        desc.width = dimension_or_default(desc.width, DEFAULT_WIDTH);
        desc.height = dimension_or_default(desc.height, DEFAULT_HEIGHT);
        Ok(desc)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn dimension_or_default(value: i32, default: i32) -> i32 {
    if value > 0 { value } else { default }
}

fn on_map(world: &World, kind: &str, x: i32, y: i32) -> Option<GridCoord> {
    let cell = GridCoord::new(x, y);
    if world.is_valid_position(cell) {
        Some(cell)
    } else {
        tracing::warn!(
            kind,
            %cell,
            width = world.width(),
            height = world.height(),
            "skipping off-map entity"
        );
        None
    }
}

/// Fluent builder for a `World`.
#[derive(Clone, Debug, Default)]
pub struct WorldBuilder {
    desc: MapDescription,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(desc: &MapDescription) -> Self {
        Self { desc: desc.clone() }
    }

    pub fn dimensions(mut self, width: i32, height: i32) -> Self {
        self.desc.width = width;
        self.desc.height = height;
        self
    }

    pub fn pit(mut self, x: i32, y: i32) -> Self {
        self.desc.pits.push(CellDesc { x, y });
        self
    }

    pub fn food(mut self, x: i32, y: i32, value: u32) -> Self {
        self.desc.food.push(FoodDesc { x, y, value });
        self
    }

    pub fn npc(mut self, name: &str, kind: &str, x: i32, y: i32, dialogs: &[&str]) -> Self {
        self.desc.npcs.push(NpcDesc {
            name: name.to_string(),
            kind: kind.to_string(),
            x,
            y,
            dialogs: dialogs.iter().map(|d| d.to_string()).collect(),
        });
        self
    }

    pub fn predator(mut self, name: &str, x: i32, y: i32, is_full: bool) -> Self {
        self.desc.predators.push(PredatorDesc {
            name: name.to_string(),
            x,
            y,
            is_full,
        });
        self
    }

    pub fn bush(mut self, x: i32, y: i32, has_fox: bool) -> Self {
        self.desc.bushes.push(BushDesc { x, y, has_fox });
        self
    }

    /// The description this builder would build.
    pub fn description(&self) -> &MapDescription {
        &self.desc
    }

    pub fn build(&self, config: &SimConfig, rng: &mut GameRng) -> World {
        let desc = &self.desc;
        let mut world = World::new(
            dimension_or_default(desc.width, DEFAULT_WIDTH),
            dimension_or_default(desc.height, DEFAULT_HEIGHT),
        );

        for pit in &desc.pits {
            if let Some(cell) = on_map(&world, "pit", pit.x, pit.y) {
                world.add_pit(cell);
            }
        }
        for food in &desc.food {
            if let Some(cell) = on_map(&world, "food", food.x, food.y) {
                world.add_food(cell, food.value);
            }
        }
        for n in &desc.npcs {
            let Some(cell) = on_map(&world, "npc", n.x, n.y) else {
                continue;
            };
            let strategy = AdviceStrategy::from_tag(&n.kind, &config.npc);
            let mut npc = Npc::new(n.name.clone(), strategy, cell).with_rules(&config.npc);
            for line in &n.dialogs {
                npc.add_dialog(line.clone());
            }
            world.add_npc(npc);
        }
        for p in &desc.predators {
            let Some(cell) = on_map(&world, "predator", p.x, p.y) else {
                continue;
            };
            let bias = if rng.next_f64() > 0.5 { 1 } else { -1 };
            world.add_predator(
                Predator::new(p.name.clone(), cell, &config.predator)
                    .with_full(p.is_full)
                    .with_bias(bias),
            );
        }
        for bush in &desc.bushes {
            if let Some(cell) = on_map(&world, "bush", bush.x, bush.y) {
                world.add_bush(cell, bush.has_fox);
            }
        }

        tracing::debug!(
            width = world.width(),
            height = world.height(),
            npcs = world.npcs().len(),
            predators = world.predators().len(),
            "built world"
        );
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOREST: &str = r#"{
        "width": 12,
        "height": 8,
        "pits": [{ "x": 3, "y": 3 }],
        "food": [{ "x": 1, "y": 0, "value": 20 }, { "x": 1, "y": 0, "value": 35 }],
        "npcs": [
            { "name": "Owl", "type": "honest", "x": 2, "y": 2, "dialogs": ["Hoo!"] },
            { "name": "Magpie", "type": "deceptive", "x": 5, "y": 5 }
        ],
        "predators": [
            { "name": "Wolf", "x": 7, "y": 1 },
            { "name": "Bear", "x": 9, "y": 6, "isFull": true }
        ],
        "bushes": [{ "x": 4, "y": 4, "hasFox": true }, { "x": 6, "y": 6 }]
    }"#;

    #[test]
    fn builds_every_entity_from_json() {
        let desc = MapDescription::from_json(FOREST).unwrap();
        let mut rng = GameRng::new(1);
        let world = WorldBuilder::from_description(&desc).build(&SimConfig::default(), &mut rng);

        assert_eq!((world.width(), world.height()), (12, 8));
        assert!(world.has_pit(GridCoord::new(3, 3)));
        // Duplicate food keys overwrite.
        assert_eq!(world.food().get(&GridCoord::new(1, 0)), Some(&35));

        assert_eq!(world.npcs().len(), 2);
        assert_eq!(world.npcs()[0].strategy(), AdviceStrategy::Honest);
        assert_eq!(world.npcs()[0].dialogs(), ["Hoo!".to_string()]);
        assert!(world.npcs()[1].is_deceptive());
        assert!(world.npcs()[1].dialogs().is_empty());

        assert_eq!(world.predators().len(), 2);
        assert!(!world.predators()[0].is_full());
        assert!(world.predators()[1].is_full());

        assert!(world.check_bush_trap(GridCoord::new(4, 4)));
        assert!(world.has_bush(GridCoord::new(6, 6)));
        assert!(!world.check_bush_trap(GridCoord::new(6, 6)));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let desc = MapDescription::from_json("{}").unwrap();
        assert_eq!(desc, MapDescription::default());
        let desc = MapDescription::from_json(r#"{ "width": 0, "height": 4 }"#).unwrap();
        assert_eq!((desc.width, desc.height), (10, 4));
    }

    #[test]
    fn unknown_npc_type_is_deceptive_with_configured_rate() {
        let mut config = SimConfig::default();
        config.npc.honesty_rate = 0.25;
        let mut rng = GameRng::new(1);
        let world = WorldBuilder::new()
            .npc("Crow", "mysterious", 0, 0, &[])
            .build(&config, &mut rng);
        assert_eq!(
            world.npcs()[0].strategy(),
            AdviceStrategy::Deceptive { honesty_rate: 0.25 }
        );
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(MapDescription::from_json("{ \"width\": ").is_err());
    }

    #[test]
    fn predator_bias_follows_the_rng() {
        let builder = WorldBuilder::new()
            .dimensions(30, 3)
            .predator("A", 10, 0, false)
            .predator("B", 12, 1, false)
            .predator("C", 14, 2, false);
        let biases = |seed| {
            let mut rng = GameRng::new(seed);
            builder
                .build(&SimConfig::default(), &mut rng)
                .predators()
                .iter()
                .map(|p| p.bias())
                .collect::<Vec<_>>()
        };
        assert_eq!(biases(77), biases(77));
        assert!(biases(77).iter().all(|b| *b == 1 || *b == -1));
    }

    #[test]
    fn builder_description_serializes_camel_case() {
        let builder = WorldBuilder::new().predator("Wolf", 1, 1, true).bush(2, 2, true);
        let json = builder.description().to_json().unwrap();
        assert!(json.contains("\"isFull\": true"));
        assert!(json.contains("\"hasFox\": true"));
    }

    #[test]
    fn off_map_entities_are_skipped() {
        let mut rng = GameRng::new(4);
        let world = WorldBuilder::new()
            .food(20, 20, 5)
            .food(2, 2, 7)
            .pit(-3, 0)
            .pit(9, 9)
            .npc("Owl", "honest", 10, 0, &[])
            .predator("Wolf", 0, 10, false)
            .predator("Bear", 4, 4, true)
            .bush(-1, -1, true)
            .build(&SimConfig::default(), &mut rng);

        assert_eq!(world.food().len(), 1);
        assert_eq!(world.food().get(&GridCoord::new(2, 2)), Some(&7));
        assert_eq!(world.pits().len(), 1);
        assert!(world.has_pit(GridCoord::new(9, 9)));
        assert!(world.npcs().is_empty());
        assert_eq!(world.predators().len(), 1);
        assert_eq!(world.predators()[0].name(), "Bear");
        assert!(world.bushes().is_empty());
    }

    #[test]
    fn skipped_predators_draw_no_bias() {
        let with_stray = WorldBuilder::new()
            .predator("Stray", -5, 0, false)
            .predator("Wolf", 3, 3, false);
        let without = WorldBuilder::new().predator("Wolf", 3, 3, false);
        let bias = |builder: &WorldBuilder| {
            let mut rng = GameRng::new(21);
            builder.build(&SimConfig::default(), &mut rng).predators()[0].bias()
        };
        assert_eq!(bias(&with_stray), bias(&without));
    }

    #[test]
    fn extreme_coordinates_never_reach_the_world() {
        let desc = MapDescription::from_json(
            r#"{
                "predators": [
                    { "name": "Wolf", "x": -2147483648, "y": 0 },
                    { "name": "Bear", "x": 2147483647, "y": 0 }
                ],
                "npcs": [{ "name": "Owl", "type": "honest", "x": 1, "y": 0 }]
            }"#,
        )
        .unwrap();
        let mut rng = GameRng::new(9);
        let world = WorldBuilder::from_description(&desc).build(&SimConfig::default(), &mut rng);
        assert!(world.predators().is_empty());
        assert_eq!(world.npcs().len(), 1);
        assert_eq!(world.nearest_predator_index(GridCoord::new(1, 0), 100), None);
    }
}
