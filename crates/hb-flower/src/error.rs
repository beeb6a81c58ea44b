use hb_core::{ColliderId, NodeId};
use hb_world::WorldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowerError {
    /// A contact reported a nectar collider the arena never registered.
    /// Indicates an integration bug, not a runtime condition.
    #[error("nectar collider {0} is not registered to any flower")]
    ProbeNotRegistered(ColliderId),

    #[error("flower node {node} has no {missing} child with a collider")]
    MalformedFlower {
        node:    NodeId,
        missing: &'static str,
    },

    #[error("nectar collider {0} is registered to more than one flower")]
    DuplicateProbe(ColliderId),

    #[error(transparent)]
    World(#[from] WorldError),
}

pub type FlowerResult<T> = Result<T, FlowerError>;
