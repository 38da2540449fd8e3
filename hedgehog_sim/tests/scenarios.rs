// End-to-end game scenarios.
//
// Each test drives a `GameController` (or a `Session`) through the public
// API only, the same way a front end would: build a map, issue commands,
// watch events and snapshots. Statistical checks run over 1000 seeded
// trials so they are reproducible.

use std::cell::RefCell;
use std::rc::Rc;

use hedgehog_sim::command::{GameCommand, ScriptStep, parse_script_line};
use hedgehog_sim::config::SimConfig;
use hedgehog_sim::controller::GameController;
use hedgehog_sim::direction::Direction;
use hedgehog_sim::event::{EventKind, GameEvent};
use hedgehog_sim::map::{MapDescription, WorldBuilder};
use hedgehog_sim::session::{RestartOutcome, Session};
use hedgehog_sim::types::GridCoord;

const DIRECTIONS: [Direction; 8] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

const FOREST: &str = r#"{
    "width": 12,
    "height": 6,
    "pits": [{ "x": 4, "y": 0 }, { "x": 2, "y": 3 }],
    "food": [
        { "x": 1, "y": 0, "value": 20 },
        { "x": 6, "y": 2, "value": 15 },
        { "x": 7, "y": 2, "value": 40 }
    ],
    "npcs": [
        { "name": "Owl", "type": "honest", "x": 0, "y": 1, "dialogs": ["Hoo!", "Mind the pits."] },
        { "name": "Magpie", "type": "deceptive", "x": 5, "y": 1, "dialogs": ["Shiny!"] }
    ],
    "predators": [
        { "name": "Wolf", "x": 9, "y": 4 },
        { "name": "Bear", "x": 3, "y": 5, "isFull": true }
    ],
    "bushes": [{ "x": 7, "y": 2 }, { "x": 10, "y": 1, "hasFox": true }]
}"#;

fn forest() -> MapDescription {
    MapDescription::from_json(FOREST).unwrap()
}

fn record(game: &mut GameController) -> Rc<RefCell<Vec<GameEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    game.events_mut()
        .on_any(move |e| sink.borrow_mut().push(e.clone()));
    log
}

// ---------------------------------------------------------------------------
// Movement and bounds
// ---------------------------------------------------------------------------

#[test]
fn every_edge_move_is_rejected_exactly_once() {
    let desc = WorldBuilder::new().dimensions(3, 3).description().clone();
    for x in 0..3 {
        for y in 0..3 {
            for direction in DIRECTIONS {
                let (dx, dy) = direction.delta();
                let target = GridCoord::new(x + dx, y + dy);
                if (0..3).contains(&target.x) && (0..3).contains(&target.y) {
                    continue;
                }
                let mut game = GameController::new(&desc, SimConfig::default(), 1);
                game.hedgehog_mut().place_at(GridCoord::new(x, y));
                let log = record(&mut game);

                assert!(!game.move_hedgehog(direction));
                assert_eq!(game.hedgehog().position(), GridCoord::new(x, y));
                assert_eq!(game.hedgehog().energy(), 100);
                assert_eq!(game.time_remaining(), 100);
                assert_eq!(*log.borrow(), vec![GameEvent::InvalidMove { direction }]);
            }
        }
    }
}

#[test]
fn food_next_door() {
    let desc = WorldBuilder::new().food(1, 0, 20).description().clone();
    let mut game = GameController::new(&desc, SimConfig::default(), 3);
    game.move_hedgehog(Direction::Right);
    assert_eq!(game.hedgehog().energy(), 100);
    assert_eq!(game.hedgehog().score(), 20);
    assert!(!game.collect_food());
    assert!(!game.collect_food());
}

#[test]
fn last_energy_point_kills_after_the_move() {
    let mut game = GameController::new(&MapDescription::default(), SimConfig::default(), 3);
    game.hedgehog_mut().consume_energy(99);
    assert!(game.move_hedgehog(Direction::Down));
    let state = game.game_state();
    assert_eq!(state.hedgehog.position, GridCoord::new(0, 1));
    assert_eq!(state.hedgehog.energy, 0);
    assert_eq!(state.hedgehog.state, "Dead");
    assert!(state.is_game_over);
}

#[test]
fn energy_stays_in_range_on_a_long_walk() {
    let desc = forest();
    for seed in 0..50 {
        let mut game = GameController::new(&desc, SimConfig::default(), seed);
        let mut dice = hedgehog_sim::prng::GameRng::new(seed + 1000);
        for _ in 0..300 {
            let direction = *dice.pick(&DIRECTIONS).unwrap();
            match dice.range_usize(0, 10) {
                0 => game.curl_hedgehog(),
                1 => game.uncurl_hedgehog(),
                2 => {
                    game.collect_food();
                }
                3 => game.tick_predators(),
                _ => {
                    game.move_hedgehog(direction);
                }
            }
            let h = game.hedgehog();
            assert!(h.energy() <= 100);
            if h.energy() == 0 {
                assert!(!h.is_alive());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

fn play(seed: u64) -> (Vec<String>, Vec<GameEvent>) {
    let script = "
        right
        down
        talk
        right
        right
        curl
        right
        right
        uncurl
        down
        tick 40
        right
        right
        talk
        up
        left
    ";
    let mut session = Session::new(forest(), SimConfig::default(), seed);
    let log = record(session.controller_mut());
    let mut trajectory = Vec::new();
    for line in script.lines() {
        match parse_script_line(line).unwrap() {
            None => continue,
            Some(ScriptStep::Command(cmd)) => {
                session.apply(cmd);
            }
            Some(ScriptStep::Ticks(n)) => {
                for _ in 0..n {
                    session.apply(GameCommand::Tick);
                }
            }
            Some(ScriptStep::Restart) => {
                session.restart();
            }
        }
        trajectory.push(serde_json::to_string(&session.snapshot()).unwrap());
    }
    let events = log.borrow().clone();
    (trajectory, events)
}

#[test]
fn same_seed_same_game() {
    for seed in [1, 2, 17, 12345] {
        assert_eq!(play(seed), play(seed));
    }
}

// ---------------------------------------------------------------------------
// Probabilities
// ---------------------------------------------------------------------------

#[test]
fn pit_survival_is_about_half() {
    let desc = WorldBuilder::new().pit(1, 0).description().clone();
    let survived = (0..1000u64)
        .filter(|&seed| {
            let mut game = GameController::new(&desc, SimConfig::default(), seed);
            game.move_hedgehog(Direction::Right);
            game.hedgehog().is_alive()
        })
        .count();
    assert!((400..=600).contains(&survived), "survived = {survived}");
}

#[test]
fn deceptive_advice_is_true_about_sixty_percent() {
    let desc = WorldBuilder::new()
        .npc("Magpie", "deceptive", 1, 0, &[])
        .description()
        .clone();
    let mut game = GameController::new(&desc, SimConfig::default(), 100);
    let truthful = (0..1000)
        .filter(|_| game.talk_to_npc().unwrap().advice == Direction::North)
        .count();
    assert!((500..=700).contains(&truthful), "truthful = {truthful}");

    let desc = WorldBuilder::new()
        .npc("Owl", "honest", 1, 0, &[])
        .description()
        .clone();
    let mut game = GameController::new(&desc, SimConfig::default(), 100);
    for _ in 0..1000 {
        assert_eq!(game.talk_to_npc().unwrap().advice, Direction::North);
    }
}

// ---------------------------------------------------------------------------
// Curling
// ---------------------------------------------------------------------------

#[test]
fn curled_hedgehog_is_immune_to_predators_and_fox_bushes() {
    for is_full in [false, true] {
        let desc = WorldBuilder::new()
            .predator("Wolf", 1, 0, is_full)
            .bush(1, 1, true)
            .description()
            .clone();
        let mut game = GameController::new(&desc, SimConfig::default(), 5);
        game.curl_hedgehog();
        for direction in [Direction::Right, Direction::Right, Direction::Down, Direction::Down] {
            game.move_hedgehog(direction);
        }
        assert_eq!(game.hedgehog().position(), GridCoord::new(1, 1));
        assert!(game.hedgehog().is_alive());
        assert!(!game.handle_predator(0));
        assert!(game.hedgehog().is_alive());
    }

    let desc = WorldBuilder::new()
        .predator("Wolf", 1, 0, false)
        .description()
        .clone();
    let mut game = GameController::new(&desc, SimConfig::default(), 5);
    game.move_hedgehog(Direction::Right);
    assert!(!game.hedgehog().is_alive());
}

#[test]
fn dead_hedgehog_ignores_curl_but_events_still_fire() {
    let mut game = GameController::new(&MapDescription::default(), SimConfig::default(), 5);
    game.hedgehog_mut().die();
    let log = record(&mut game);
    game.curl_hedgehog();
    game.uncurl_hedgehog();
    assert_eq!(game.game_state().hedgehog.state, "Dead");
    let kinds: Vec<_> = log.borrow().iter().map(GameEvent::kind).collect();
    assert_eq!(kinds, vec![EventKind::HedgehogCurl, EventKind::HedgehogUncurl]);
}

// ---------------------------------------------------------------------------
// Predators on patrol
// ---------------------------------------------------------------------------

#[test]
fn patrolling_predator_can_catch_the_hedgehog() {
    let desc = WorldBuilder::new()
        .dimensions(2, 1)
        .predator("Wolf", 1, 0, false)
        .description()
        .clone();
    let mut config = SimConfig::default();
    config.predator.move_interval = 1;
    let mut game = GameController::new(&desc, config, 8);
    let log = record(&mut game);
    for _ in 0..100 {
        game.tick_predators();
        if game.is_game_over() {
            break;
        }
    }
    assert!(game.is_game_over());
    assert_eq!(log.borrow().last().unwrap().kind(), EventKind::PredatorDeath);
    // Ticks after game over do nothing.
    let before = log.borrow().len();
    game.tick_predators();
    assert_eq!(log.borrow().len(), before);
}

// ---------------------------------------------------------------------------
// Restart and lives
// ---------------------------------------------------------------------------

#[test]
fn restart_after_death_is_a_fresh_game() {
    let desc = forest();
    let mut config = SimConfig::default();
    config.pit_survival_chance = 0.0;
    let mut game = GameController::new(&desc, config, 11);
    for _ in 0..4 {
        game.move_hedgehog(Direction::Right);
    }
    assert!(game.is_game_over());
    assert_eq!(game.hedgehog().score(), 20);

    game.restart(&desc);
    let state = game.game_state();
    assert_eq!(state.hedgehog.energy, 100);
    assert_eq!(state.hedgehog.score, 0);
    assert_eq!(state.hedgehog.state, "Normal");
    assert_eq!(state.time_remaining, 100);
    assert!(!state.is_game_over);
    assert!(game.world().has_food(GridCoord::new(1, 0)));
}

#[test]
fn session_lives_cycle() {
    let mut session = Session::new(forest(), SimConfig::default(), 2);
    let mut outcomes = Vec::new();
    for _ in 0..6 {
        outcomes.push(session.restart());
    }
    assert_eq!(
        outcomes,
        vec![
            RestartOutcome::LifeLost { remaining: 4 },
            RestartOutcome::LifeLost { remaining: 3 },
            RestartOutcome::LifeLost { remaining: 2 },
            RestartOutcome::LifeLost { remaining: 1 },
            RestartOutcome::OutOfLives,
            RestartOutcome::NewGame,
        ]
    );
    assert_eq!(session.lives(), 5);
}
