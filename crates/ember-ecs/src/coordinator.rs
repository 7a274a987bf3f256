use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use tracing::{debug, error, trace};

use crate::allocator::ObjectAllocator;
use crate::component::{Component, ComponentSet};
use crate::error::{CapacityKind, EcsError, Result};
use crate::object::GameObject;
use crate::registry::{SystemHandle, SystemRegistry};
use crate::signature::{ComponentKind, Signature, MAX_COMPONENT_KINDS};
use crate::store::{ComponentStore, ErasedStore};

struct KindEntry {
    name: &'static str,
    store: Box<dyn ErasedStore>,
}

/// The central ECS container and the only mutation entry point.
///
/// Every operation that touches more than one of the allocator, the component
/// stores, and the system registry goes through here, in the order signature →
/// store → registry, so the three never disagree once a call returns.
pub struct Coordinator {
    objects: ObjectAllocator,
    kinds: HashMap<TypeId, ComponentKind>,
    /// Indexed by `ComponentKind::index`.
    stores: Vec<KindEntry>,
    systems: SystemRegistry,
}

impl Coordinator {
    pub fn new() -> Self {
        Self {
            objects: ObjectAllocator::new(),
            kinds: HashMap::new(),
            stores: Vec::new(),
            systems: SystemRegistry::new(),
        }
    }

    // ---- Component kinds ----

    /// Assign a kind to `T`, or return the one it already has.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentKind> {
        if let Some(kind) = self.component_kind::<T>() {
            return Ok(kind);
        }
        let kind = u8::try_from(self.stores.len())
            .ok()
            .and_then(ComponentKind::new)
            .ok_or(EcsError::Capacity {
                resource: CapacityKind::ComponentKinds,
                limit: MAX_COMPONENT_KINDS,
            })?;
        let name = std::any::type_name::<T>();
        self.kinds.insert(TypeId::of::<T>(), kind);
        self.stores.push(KindEntry {
            name,
            store: Box::new(ComponentStore::<T>::new()),
        });
        debug!(component = name, kind = kind.bit(), "registered component kind");
        Ok(kind)
    }

    /// The kind assigned to `T`, if it has been registered.
    pub fn component_kind<T: Component>(&self) -> Option<ComponentKind> {
        self.kinds.get(&TypeId::of::<T>()).copied()
    }

    /// Type name of the component registered under `kind`.
    pub fn component_name(&self, kind: ComponentKind) -> Option<&'static str> {
        self.stores.get(kind.index()).map(|entry| entry.name)
    }

    /// Number of registered component kinds.
    pub fn component_kind_count(&self) -> usize {
        self.stores.len()
    }

    fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let kind = self.component_kind::<T>()?;
        self.stores[kind.index()]
            .store
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
    }

    fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        let kind = self.component_kind::<T>()?;
        self.stores[kind.index()]
            .store
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
    }

    fn missing<T: Component>(object: GameObject) -> EcsError {
        EcsError::MissingComponent {
            object,
            component: std::any::type_name::<T>(),
        }
    }

    // ---- Object lifecycle ----

    /// Create an object with no components.
    pub fn create_object(&mut self) -> Result<GameObject> {
        let object = self.objects.create()?;
        self.systems.on_object_created(object);
        trace!(%object, "created game object");
        Ok(object)
    }

    /// Destroy an object, removing every component it owns.
    ///
    /// Liveness is checked before anything changes. Every component the
    /// signature names is removed even if one store disagrees with the
    /// signature, so the object is always fully torn down.
    pub fn destroy_object(&mut self, object: GameObject) -> Result<()> {
        let signature = self.objects.signature(object)?;
        for kind in signature.kinds() {
            let Some(entry) = self.stores.get_mut(kind.index()) else {
                error!(%object, kind = kind.bit(), "signature names an unregistered component kind");
                continue;
            };
            if let Err(err) = entry.store.remove_object(object) {
                error!(%object, component = entry.name, %err, "store out of sync with signature");
            }
        }
        self.objects.destroy(object)?;
        self.systems.on_object_destroyed(object);
        trace!(%object, components = signature.len(), "destroyed game object");
        Ok(())
    }

    /// Check whether an object is alive.
    pub fn is_alive(&self, object: GameObject) -> bool {
        self.objects.is_alive(object)
    }

    /// Number of alive objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn signature(&self, object: GameObject) -> Result<Signature> {
        self.objects.signature(object)
    }

    // ---- Component management ----

    /// Attach a component. Registers `T` on first use.
    ///
    /// On failure neither the store nor the signature is touched.
    pub fn add_component<T: Component>(&mut self, object: GameObject, component: T) -> Result<()> {
        let old = self.objects.signature(object)?;
        let kind = self.register_component::<T>()?;
        self.store_mut::<T>()
            .ok_or_else(|| Self::missing::<T>(object))?
            .insert(object, component)?;

        let new = old.with(kind);
        self.objects.set_signature(object, new)?;
        self.systems.on_signature_changed(object, old, new);
        trace!(%object, component = std::any::type_name::<T>(), "added component");
        Ok(())
    }

    /// Detach and return a component.
    pub fn remove_component<T: Component>(&mut self, object: GameObject) -> Result<T> {
        let old = self.objects.signature(object)?;
        let kind = self
            .component_kind::<T>()
            .ok_or_else(|| Self::missing::<T>(object))?;
        let component = self
            .store_mut::<T>()
            .ok_or_else(|| Self::missing::<T>(object))?
            .remove(object)?;

        let mut new = old;
        new.remove(kind);
        self.objects.set_signature(object, new)?;
        self.systems.on_signature_changed(object, old, new);
        trace!(%object, component = std::any::type_name::<T>(), "removed component");
        Ok(component)
    }

    /// Detach a component by kind, dropping its value.
    pub fn remove_component_kind(&mut self, object: GameObject, kind: ComponentKind) -> Result<()> {
        let old = self.objects.signature(object)?;
        let entry = self.stores.get_mut(kind.index()).ok_or(EcsError::MissingComponent {
            object,
            component: "<unregistered>",
        })?;
        entry.store.remove_object(object)?;
        let name = entry.name;

        let mut new = old;
        new.remove(kind);
        self.objects.set_signature(object, new)?;
        self.systems.on_signature_changed(object, old, new);
        trace!(%object, component = name, "removed component");
        Ok(())
    }

    pub fn get_component<T: Component>(&self, object: GameObject) -> Result<&T> {
        if !self.objects.is_alive(object) {
            return Err(EcsError::InvalidHandle(object));
        }
        self.store::<T>()
            .ok_or_else(|| Self::missing::<T>(object))?
            .get(object)
    }

    pub fn get_component_mut<T: Component>(&mut self, object: GameObject) -> Result<&mut T> {
        if !self.objects.is_alive(object) {
            return Err(EcsError::InvalidHandle(object));
        }
        self.store_mut::<T>()
            .ok_or_else(|| Self::missing::<T>(object))?
            .get_mut(object)
    }

    /// Whether a live object has a component of type `T`.
    pub fn has_component<T: Component>(&self, object: GameObject) -> bool {
        self.component_kind::<T>()
            .is_some_and(|kind| self.has_component_kind(object, kind))
    }

    /// Whether a live object has a component of the given kind.
    pub fn has_component_kind(&self, object: GameObject, kind: ComponentKind) -> bool {
        self.objects
            .signature(object)
            .is_ok_and(|signature| signature.contains(kind))
    }

    /// Read-only view of the packed store for `T`.
    pub fn components<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.store::<T>()
    }

    /// Iterate every `(object, &T)` in packed order.
    pub fn iter_components<T: Component>(&self) -> impl Iterator<Item = (GameObject, &T)> {
        self.store::<T>().into_iter().flat_map(|store| store.iter())
    }

    // ---- Systems ----

    /// Register a system requiring `signature`. Existing matching objects join immediately.
    pub fn register_system(&mut self, signature: Signature) -> SystemHandle {
        let handle = self.systems.register_system_with(signature, self.objects.iter());
        debug!(
            system = handle.index(),
            ?signature,
            members = self.systems.members(handle).map_or(0, HashSet::len),
            "registered system"
        );
        handle
    }

    /// Register a system requiring every component type in `S`.
    pub fn register_system_for<S: ComponentSet>(&mut self) -> Result<SystemHandle> {
        let signature = S::signature(self)?;
        Ok(self.register_system(signature))
    }

    /// Objects currently matching the system.
    pub fn members(&self, handle: SystemHandle) -> Result<&HashSet<GameObject>> {
        self.systems.members(handle)
    }

    pub fn system_signature(&self, handle: SystemHandle) -> Result<Signature> {
        self.systems.signature(handle)
    }

    /// Number of registered systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}
