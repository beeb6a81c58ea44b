use hb_flower::FlowerError;
use hb_world::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("action vector must have {expected} elements, got {got}")]
    ActionLength { expected: usize, got: usize },

    #[error(transparent)]
    Flower(#[from] FlowerError),

    #[error(transparent)]
    World(#[from] WorldError),
}

pub type AgentResult<T> = Result<T, AgentError>;
