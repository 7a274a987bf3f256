use std::any::TypeId;

use crate::coordinator::Coordinator;
use crate::error::{CapacityKind, EcsError, Result};
use crate::signature::{Signature, MAX_COMPONENT_KINDS};

/// Marker trait for types that can be stored as ECS components.
pub trait Component: 'static + Send + Sync {}

/// Blanket implementation: any `'static + Send + Sync` type is a valid component.
impl<T: 'static + Send + Sync> Component for T {}

/// A tuple of component types, used to build a system signature from types.
///
/// ```ignore
/// let renderables = coordinator.register_system_for::<(Transform, Material)>()?;
/// ```
pub trait ComponentSet {
    /// Register every type in the set and return the combined signature.
    ///
    /// Either every type is registered or, if they would not all fit, none are.
    fn signature(coordinator: &mut Coordinator) -> Result<Signature>;
}

macro_rules! impl_component_set_tuple {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn signature(coordinator: &mut Coordinator) -> Result<Signature> {
                let mut unregistered: Vec<TypeId> = Vec::new();
                $(
                    let id = TypeId::of::<$name>();
                    if coordinator.component_kind::<$name>().is_none() && !unregistered.contains(&id) {
                        unregistered.push(id);
                    }
                )+
                if coordinator.component_kind_count() + unregistered.len() > MAX_COMPONENT_KINDS {
                    return Err(EcsError::Capacity {
                        resource: CapacityKind::ComponentKinds,
                        limit: MAX_COMPONENT_KINDS,
                    });
                }

                let mut signature = Signature::EMPTY;
                $(signature.insert(coordinator.register_component::<$name>()?);)+
                Ok(signature)
            }
        }
    };
}

impl_component_set_tuple!(A);
impl_component_set_tuple!(A, B);
impl_component_set_tuple!(A, B, C);
impl_component_set_tuple!(A, B, C, D);
impl_component_set_tuple!(A, B, C, D, E);
impl_component_set_tuple!(A, B, C, D, E, F);
impl_component_set_tuple!(A, B, C, D, E, F, G);
impl_component_set_tuple!(A, B, C, D, E, F, G, H);
