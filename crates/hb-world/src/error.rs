use hb_core::ColliderId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("collider {0} is not registered with the physics world")]
    UnknownCollider(ColliderId),
}

pub type WorldResult<T> = Result<T, WorldError>;
