use std::fmt;

use crate::object::GameObject;
use crate::registry::SystemHandle;

/// Which fixed-size table ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityKind {
    Objects,
    ComponentKinds,
}

impl fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityKind::Objects => f.write_str("game objects"),
            CapacityKind::ComponentKinds => f.write_str("component kinds"),
        }
    }
}

/// Errors reported by the ECS. Every failure is returned to the caller of the
/// offending operation; nothing is retried or swallowed internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("capacity reached: at most {limit} {resource}")]
    Capacity { resource: CapacityKind, limit: usize },

    #[error("game object {0} is out of range or not alive")]
    InvalidHandle(GameObject),

    #[error("game object {object} already has a {component} component")]
    DuplicateComponent {
        object: GameObject,
        component: &'static str,
    },

    #[error("game object {object} has no {component} component")]
    MissingComponent {
        object: GameObject,
        component: &'static str,
    },

    #[error("unknown system {0:?}")]
    UnknownSystem(SystemHandle),
}

pub type Result<T, E = EcsError> = std::result::Result<T, E>;
