use std::any::Any;

use crate::component::Component;
use crate::error::{EcsError, Result};
use crate::object::{GameObject, MAX_OBJECTS};

/// Type-erased store interface, so the coordinator can tear an object down
/// across every component type without knowing them.
pub(crate) trait ErasedStore: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove_object(&mut self, object: GameObject) -> Result<()>;
    fn has(&self, object: GameObject) -> bool;
    fn len(&self) -> usize;
}

/// Dense storage for one component type. O(1) insert/remove/lookup and
/// contiguous iteration.
///
/// Removal swaps the last value into the hole, so packed order changes on
/// every removal. Snapshot [`ComponentStore::objects`] before removing while
/// walking the store.
pub struct ComponentStore<T> {
    /// Maps object id → packed index. `None` means the object has no component.
    sparse: Vec<Option<u32>>,
    /// Packed component values.
    dense: Vec<T>,
    /// Owner of each packed slot.
    objects: Vec<GameObject>,
}

impl<T: Component> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Append a component for `object`. Fails if it already has one, or if
    /// the id lies outside `0..MAX_OBJECTS`.
    pub fn insert(&mut self, object: GameObject, value: T) -> Result<()> {
        let idx = object.index();
        if idx >= MAX_OBJECTS {
            return Err(EcsError::InvalidHandle(object));
        }
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }
        if self.sparse[idx].is_some() {
            return Err(EcsError::DuplicateComponent {
                object,
                component: std::any::type_name::<T>(),
            });
        }
        self.sparse[idx] = Some(self.dense.len() as u32);
        self.dense.push(value);
        self.objects.push(object);
        Ok(())
    }

    /// Remove and return the component for `object`.
    pub fn remove(&mut self, object: GameObject) -> Result<T> {
        let dense_idx = self.dense_index(object)?;
        self.sparse[object.index()] = None;

        let last = self.dense.len() - 1;
        if dense_idx != last {
            let moved = self.objects[last];
            self.sparse[moved.index()] = Some(dense_idx as u32);
        }
        self.objects.swap_remove(dense_idx);
        Ok(self.dense.swap_remove(dense_idx))
    }

    pub fn get(&self, object: GameObject) -> Result<&T> {
        let dense_idx = self.dense_index(object)?;
        Ok(&self.dense[dense_idx])
    }

    pub fn get_mut(&mut self, object: GameObject) -> Result<&mut T> {
        let dense_idx = self.dense_index(object)?;
        Ok(&mut self.dense[dense_idx])
    }

    pub fn has(&self, object: GameObject) -> bool {
        matches!(self.sparse.get(object.index()), Some(Some(_)))
    }

    /// Iterate over all (object, &component) pairs in packed order.
    pub fn iter(&self) -> impl Iterator<Item = (GameObject, &T)> {
        self.objects.iter().copied().zip(self.dense.iter())
    }

    /// Iterate over all (object, &mut component) pairs in packed order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GameObject, &mut T)> {
        self.objects.iter().copied().zip(self.dense.iter_mut())
    }

    /// Owners of each packed slot.
    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// The packed values, ready for bulk upload.
    pub fn values(&self) -> &[T] {
        &self.dense
    }

    /// Number of components stored.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    fn dense_index(&self, object: GameObject) -> Result<usize> {
        match self.sparse.get(object.index()) {
            Some(Some(dense_idx)) => Ok(*dense_idx as usize),
            _ => Err(EcsError::MissingComponent {
                object,
                component: std::any::type_name::<T>(),
            }),
        }
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove_object(&mut self, object: GameObject) -> Result<()> {
        self.remove(object).map(drop)
    }

    fn has(&self, object: GameObject) -> bool {
        ComponentStore::has(self, object)
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }
}
