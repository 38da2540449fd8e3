// Errors for the few fallible boundaries of the simulation.
//
// Gameplay itself never fails: illegal actions return `false`/`None` or emit
// an `InvalidMove` event, and game over is a state, not an error. `SimError`
// only covers parsing external input (map/config/command JSON, direction
// tokens, script lines) and rejecting nonsensical configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown direction: {0:?}")]
    UnknownDirection(String),
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type SimResult<T> = Result<T, SimError>;
