use std::collections::HashSet;

use crate::error::{EcsError, Result};
use crate::object::GameObject;
use crate::signature::Signature;

/// Identifies a system registered with a [`SystemRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemHandle(u32);

impl SystemHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

struct SystemRecord {
    signature: Signature,
    members: HashSet<GameObject>,
}

/// Tracks, for every system, the objects whose signature covers the system's.
///
/// Updates are incremental: a signature change costs one subset test per
/// system, independent of how many objects exist.
pub struct SystemRegistry {
    systems: Vec<SystemRecord>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Register a system requiring `signature`, with no members yet.
    pub fn register_system(&mut self, signature: Signature) -> SystemHandle {
        let handle = SystemHandle(self.systems.len() as u32);
        self.systems.push(SystemRecord {
            signature,
            members: HashSet::new(),
        });
        handle
    }

    /// Register a system and seed it with the matching objects among `existing`.
    pub fn register_system_with<I>(&mut self, signature: Signature, existing: I) -> SystemHandle
    where
        I: IntoIterator<Item = (GameObject, Signature)>,
    {
        let handle = self.register_system(signature);
        let record = &mut self.systems[handle.index()];
        record.members.extend(
            existing
                .into_iter()
                .filter(|(_, object_sig)| object_sig.contains_all(signature))
                .map(|(object, _)| object),
        );
        handle
    }

    /// Move `object` in or out of each system whose match changed.
    pub fn on_signature_changed(&mut self, object: GameObject, old: Signature, new: Signature) {
        for record in &mut self.systems {
            let was = old.contains_all(record.signature);
            let is = new.contains_all(record.signature);
            if is && !was {
                record.members.insert(object);
            } else if was && !is {
                record.members.remove(&object);
            }
        }
    }

    /// Admit a fresh object, whose signature is empty, to systems requiring nothing.
    pub fn on_object_created(&mut self, object: GameObject) {
        for record in &mut self.systems {
            if record.signature.is_empty() {
                record.members.insert(object);
            }
        }
    }

    /// Evict `object` from every system.
    pub fn on_object_destroyed(&mut self, object: GameObject) {
        for record in &mut self.systems {
            record.members.remove(&object);
        }
    }

    /// Objects currently matching the system. Iteration order is unspecified.
    pub fn members(&self, handle: SystemHandle) -> Result<&HashSet<GameObject>> {
        self.record(handle).map(|record| &record.members)
    }

    pub fn signature(&self, handle: SystemHandle) -> Result<Signature> {
        self.record(handle).map(|record| record.signature)
    }

    /// Number of registered systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    fn record(&self, handle: SystemHandle) -> Result<&SystemRecord> {
        self.systems
            .get(handle.index())
            .ok_or(EcsError::UnknownSystem(handle))
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::ComponentKind;

    fn sig(bits: &[u8]) -> Signature {
        bits.iter()
            .map(|bit| ComponentKind::new(*bit).unwrap())
            .collect()
    }

    fn obj(id: u32) -> GameObject {
        GameObject::from_raw(id)
    }

    #[test]
    fn gains_and_loses_members() {
        let mut registry = SystemRegistry::new();
        let render = registry.register_system(sig(&[0, 1]));
        let physics = registry.register_system(sig(&[0]));

        registry.on_signature_changed(obj(1), sig(&[]), sig(&[0]));
        assert!(registry.members(render).unwrap().is_empty());
        assert!(registry.members(physics).unwrap().contains(&obj(1)));

        registry.on_signature_changed(obj(1), sig(&[0]), sig(&[0, 1]));
        assert!(registry.members(render).unwrap().contains(&obj(1)));
        assert_eq!(registry.members(physics).unwrap().len(), 1);

        registry.on_signature_changed(obj(1), sig(&[0, 1]), sig(&[1]));
        assert!(registry.members(render).unwrap().is_empty());
        assert!(registry.members(physics).unwrap().is_empty());
    }

    #[test]
    fn unrelated_bits_do_not_matter() {
        let mut registry = SystemRegistry::new();
        let system = registry.register_system(sig(&[2]));
        registry.on_signature_changed(obj(4), sig(&[]), sig(&[2, 5]));
        registry.on_signature_changed(obj(4), sig(&[2, 5]), sig(&[2]));
        assert_eq!(
            registry.members(system).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![obj(4)]
        );
    }

    #[test]
    fn destroy_evicts_everywhere() {
        let mut registry = SystemRegistry::new();
        let a = registry.register_system(sig(&[0]));
        let b = registry.register_system(sig(&[1]));
        registry.on_signature_changed(obj(2), sig(&[]), sig(&[0, 1]));
        registry.on_object_destroyed(obj(2));
        assert!(registry.members(a).unwrap().is_empty());
        assert!(registry.members(b).unwrap().is_empty());
    }

    #[test]
    fn empty_signature_system_seeded_from_existing() {
        let mut registry = SystemRegistry::new();
        let existing = vec![(obj(0), sig(&[])), (obj(1), sig(&[3])), (obj(2), sig(&[4]))];
        let all = registry.register_system_with(Signature::EMPTY, existing.clone());
        let threes = registry.register_system_with(sig(&[3]), existing);
        assert_eq!(registry.members(all).unwrap().len(), 3);
        assert_eq!(
            registry.members(threes).unwrap().iter().copied().collect::<Vec<_>>(),
            vec![obj(1)]
        );
        assert_eq!(registry.signature(threes).unwrap(), sig(&[3]));
    }

    #[test]
    fn created_objects_join_catch_all_systems() {
        let mut registry = SystemRegistry::new();
        let all = registry.register_system(Signature::EMPTY);
        let some = registry.register_system(sig(&[0]));
        registry.on_object_created(obj(9));
        assert!(registry.members(all).unwrap().contains(&obj(9)));
        assert!(registry.members(some).unwrap().is_empty());
    }

    #[test]
    fn unknown_handle() {
        let mut other = SystemRegistry::new();
        other.register_system(sig(&[0]));
        let handle = other.register_system(sig(&[1]));
        let registry = SystemRegistry::new();
        assert_eq!(
            registry.members(handle).err(),
            Some(EcsError::UnknownSystem(handle))
        );
    }
}
