use hb_agent::AgentError;
use hb_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match arena count {expected}")]
    ArenaCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),
}

pub type SimResult<T> = Result<T, SimError>;
