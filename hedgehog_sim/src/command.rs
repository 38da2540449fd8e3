// Commands that drive the game.
//
// Every player action reaches the controller as a `GameCommand`. The
// controller is a state machine `(state, command) -> (new state, events)`;
// `GameController::apply()` dispatches a command to the matching operation
// and reports what came of it as a `CommandOutcome`.
//
// Current commands:
// - `Move`: step one cell in a direction (see `controller.rs` for the
//   hazard order).
// - `CollectFood` / `Talk`: Normal-state interactions with adjacent cells.
// - `Curl` / `Uncurl`: toggle the defensive ball.
// - `Restart`: rebuild from a map description. Lives are managed one layer
//   up, in `session.rs`.
// - `Tick`: advance predator patrols once (the external timer's hook).
//
// Commands serialize with a camelCase `command` tag, so a UI can send
// `{"command":"move","direction":"up"}`.
//
// This file also parses the line-oriented script format the headless driver
// reads: one command per line, `#` comments, `tick N` for N ticks, or a raw
// JSON command.
//
// See also: `controller.rs` for `apply()`, `session.rs` for lives-aware
// restarts, `event.rs` for what each command emits.
//
// **Critical constraint: determinism.** Commands are the only external input
// besides the seed. The same seed and command list must replay the same game.

use crate::direction::Direction;
use crate::error::{SimError, SimResult};
use crate::map::MapDescription;
use crate::npc::TalkResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum GameCommand {
    Move { direction: Direction },
    CollectFood,
    Talk,
    Curl,
    Uncurl,
    Restart { map: MapDescription },
    Tick,
}

impl GameCommand {
    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// What applying a command produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The hedgehog changed cells (false: blocked, throttled or dead).
    Moved(bool),
    Collected(bool),
    Talked(Option<TalkResult>),
    Applied,
    /// The game is over; the command had no effect.
    Ignored,
}

/// One line of a command script.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptStep {
    Command(GameCommand),
    /// Advance predator patrols this many times.
    Ticks(u32),
    /// Restart through the session, spending a life.
    Restart,
}

/// Parse one script line. Blank lines and `#` comments yield `None`. A line
/// starting with `{` is a JSON `GameCommand`.
pub fn parse_script_line(line: &str) -> SimResult<Option<ScriptStep>> {
    if line.trim_start().starts_with('{') {
        return GameCommand::from_json(line).map(|cmd| Some(ScriptStep::Command(cmd)));
    }
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or("").to_ascii_lowercase();
    let arg = words.next();
    if words.next().is_some() {
        return Err(SimError::UnknownCommand(line.to_string()));
    }

    let step = match (head.as_str(), arg) {
        ("collect", None) => ScriptStep::Command(GameCommand::CollectFood),
        ("talk", None) => ScriptStep::Command(GameCommand::Talk),
        ("curl", None) => ScriptStep::Command(GameCommand::Curl),
        ("uncurl", None) => ScriptStep::Command(GameCommand::Uncurl),
        ("restart", None) => ScriptStep::Restart,
        ("tick", None) => ScriptStep::Ticks(1),
        ("tick", Some(n)) => ScriptStep::Ticks(
            n.parse()
                .map_err(|_| SimError::UnknownCommand(line.to_string()))?,
        ),
        ("move", Some(dir)) => ScriptStep::Command(GameCommand::Move {
            direction: dir.parse()?,
        }),
        (word, None) => match word.parse::<Direction>() {
            Ok(direction) => ScriptStep::Command(GameCommand::Move { direction }),
            Err(_) => return Err(SimError::UnknownCommand(line.to_string())),
        },
        _ => return Err(SimError::UnknownCommand(line.to_string())),
    };
    Ok(Some(step))
}
