//! Ember ECS - Entity Component System
//!
//! A fixed-capacity ECS for the Ember engine. Game objects are plain integer
//! ids recycled through a FIFO free list, components live in dense
//! swap-remove stores, and systems track their members through bitset
//! signatures. [`Coordinator`] is the only mutation entry point.

mod allocator;
mod component;
mod coordinator;
mod error;
mod object;
mod registry;
mod shared;
mod signature;
mod store;
mod system;

pub use allocator::ObjectAllocator;
pub use component::{Component, ComponentSet};
pub use coordinator::Coordinator;
pub use error::{CapacityKind, EcsError, Result};
pub use object::{GameObject, MAX_OBJECTS};
pub use registry::{SystemHandle, SystemRegistry};
pub use shared::SharedCoordinator;
pub use signature::{ComponentKind, Signature, MAX_COMPONENT_KINDS};
pub use store::ComponentStore;
pub use system::{System, SystemSchedule};
