// hedgehog_sim: pure Rust simulation library for the hedgehog forest game.
//
// This crate contains all game logic: the forest grid and its entities, the
// hedgehog's state machine, predator patrols, the NPC advice and deception
// protocol, the event bus, and the controller that ties them into turns. It
// has no rendering or input dependencies and can be tested, benchmarked, and
// run headless.
//
// Module overview:
// - `controller.rs`: GameController: turn order, hazard resolution, snapshots.
// - `session.rs`:    Session: lives policy and the predator tick timer.
// - `command.rs`:    GameCommand / CommandOutcome, plus the script line parser.
// - `event.rs`:      GameEvent wire model and the synchronous EventBus.
// - `world.rs`:      World: pits, food, bushes, NPCs, predators, spatial queries.
// - `map.rs`:        MapDescription (map JSON) and the fluent WorldBuilder.
// - `hedgehog.rs`:   Hedgehog and the Normal/Curled/Dead state machine.
// - `predator.rs`:   Predator: leashed horizontal patrol and attacks.
// - `npc.rs`:        Npc, AdviceStrategy, seeded predator warnings.
// - `config.rs`:     SimConfig: every tunable parameter, loadable from JSON.
// - `direction.rs`:  Direction vocabulary and grid deltas.
// - `error.rs`:      SimError for the parsing/config boundaries.
// - `prng`:          Re-exported from `hedgehog_prng`: xoshiro256++ with SplitMix64 seeding.
// - `types.rs`:      GridCoord.
//
// Front ends (such as the headless `hedgehog_cli`) subscribe to
// events and read snapshots; they own no game rules.
//
// **Critical constraint: determinism.** Given a seed and a command sequence
// the game replays identically. All randomness comes from one seeded
// `GameRng` owned by the controller. No `HashMap`, no system time, no OS
// entropy. Use `BTreeMap` for ordered collections.

pub mod command;
pub mod config;
pub mod controller;
pub mod direction;
pub mod error;
pub mod event;
pub mod hedgehog;
pub mod map;
pub mod npc;
pub mod predator;
pub use hedgehog_prng as prng;
pub mod session;
pub mod types;
pub mod world;
