use std::collections::VecDeque;

use crate::error::{CapacityKind, EcsError, Result};
use crate::object::{GameObject, MAX_OBJECTS};
use crate::signature::Signature;

/// Issues and recycles game object ids and holds each live object's signature.
///
/// Freed ids go to the back of a FIFO queue, so an id sits unused for as long
/// as possible before it is handed out again.
pub struct ObjectAllocator {
    available: VecDeque<GameObject>,
    signatures: Box<[Signature]>,
    alive: Box<[bool]>,
    len: usize,
}

impl ObjectAllocator {
    pub fn new() -> Self {
        Self {
            available: (0..MAX_OBJECTS as u32).map(GameObject).collect(),
            signatures: vec![Signature::EMPTY; MAX_OBJECTS].into_boxed_slice(),
            alive: vec![false; MAX_OBJECTS].into_boxed_slice(),
            len: 0,
        }
    }

    /// Take the oldest free id. Its signature starts empty.
    pub fn create(&mut self) -> Result<GameObject> {
        if self.len >= MAX_OBJECTS {
            return Err(EcsError::Capacity {
                resource: CapacityKind::Objects,
                limit: MAX_OBJECTS,
            });
        }
        let object = self.available.pop_front().ok_or(EcsError::Capacity {
            resource: CapacityKind::Objects,
            limit: MAX_OBJECTS,
        })?;
        self.signatures[object.index()] = Signature::EMPTY;
        self.alive[object.index()] = true;
        self.len += 1;
        Ok(object)
    }

    /// Release a live id to the back of the free queue.
    pub fn destroy(&mut self, object: GameObject) -> Result<()> {
        self.check_alive(object)?;
        self.signatures[object.index()] = Signature::EMPTY;
        self.alive[object.index()] = false;
        self.available.push_back(object);
        self.len -= 1;
        Ok(())
    }

    pub fn set_signature(&mut self, object: GameObject, signature: Signature) -> Result<()> {
        self.check_alive(object)?;
        self.signatures[object.index()] = signature;
        Ok(())
    }

    pub fn signature(&self, object: GameObject) -> Result<Signature> {
        self.check_alive(object)?;
        Ok(self.signatures[object.index()])
    }

    /// Check if an id is in range and currently live.
    pub fn is_alive(&self, object: GameObject) -> bool {
        self.alive.get(object.index()).copied().unwrap_or(false)
    }

    /// Live objects with their signatures, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (GameObject, Signature)> + '_ {
        self.alive
            .iter()
            .zip(self.signatures.iter())
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(index, (_, signature))| (GameObject(index as u32), *signature))
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of ids that can still be created.
    pub fn available(&self) -> usize {
        self.available.len()
    }

    fn check_alive(&self, object: GameObject) -> Result<()> {
        if self.is_alive(object) {
            Ok(())
        } else {
            Err(EcsError::InvalidHandle(object))
        }
    }
}

impl Default for ObjectAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::ComponentKind;

    #[test]
    fn create_sequential() {
        let mut alloc = ObjectAllocator::new();
        let o0 = alloc.create().unwrap();
        let o1 = alloc.create().unwrap();
        assert_eq!(o0.id(), 0);
        assert_eq!(o1.id(), 1);
        assert_eq!(alloc.len(), 2);
        assert_eq!(alloc.available(), MAX_OBJECTS - 2);
    }

    #[test]
    fn freed_ids_go_to_the_back() {
        let mut alloc = ObjectAllocator::new();
        let o0 = alloc.create().unwrap();
        alloc.destroy(o0).unwrap();
        // Every never-used id is handed out before 0 comes back.
        for expected in 1..MAX_OBJECTS as u32 {
            assert_eq!(alloc.create().unwrap().id(), expected);
        }
        assert_eq!(alloc.create().unwrap(), o0);
        assert!(alloc.create().is_err());
    }

    #[test]
    fn capacity_exhaustion() {
        let mut alloc = ObjectAllocator::new();
        for _ in 0..MAX_OBJECTS {
            alloc.create().unwrap();
        }
        assert_eq!(
            alloc.create(),
            Err(EcsError::Capacity {
                resource: CapacityKind::Objects,
                limit: MAX_OBJECTS,
            })
        );
        alloc.destroy(GameObject::from_raw(42)).unwrap();
        assert_eq!(alloc.create().unwrap().id(), 42);
    }

    #[test]
    fn double_destroy_fails() {
        let mut alloc = ObjectAllocator::new();
        let o = alloc.create().unwrap();
        alloc.destroy(o).unwrap();
        assert_eq!(alloc.destroy(o), Err(EcsError::InvalidHandle(o)));
        assert_eq!(alloc.len(), 0);
    }

    #[test]
    fn out_of_range_id_is_invalid() {
        let mut alloc = ObjectAllocator::new();
        let bogus = GameObject::from_raw(MAX_OBJECTS as u32);
        assert!(!alloc.is_alive(bogus));
        assert_eq!(alloc.signature(bogus), Err(EcsError::InvalidHandle(bogus)));
        assert_eq!(
            alloc.set_signature(bogus, Signature::EMPTY),
            Err(EcsError::InvalidHandle(bogus))
        );
        assert_eq!(alloc.destroy(bogus), Err(EcsError::InvalidHandle(bogus)));
    }

    #[test]
    fn signature_cleared_on_reuse() {
        let mut alloc = ObjectAllocator::new();
        let o = alloc.create().unwrap();
        let sig = Signature::EMPTY.with(ComponentKind::new(4).unwrap());
        alloc.set_signature(o, sig).unwrap();
        assert_eq!(alloc.signature(o).unwrap(), sig);
        alloc.destroy(o).unwrap();
        assert!(alloc.signature(o).is_err());

        for _ in 0..MAX_OBJECTS {
            let reused = alloc.create().unwrap();
            assert!(alloc.signature(reused).unwrap().is_empty());
        }
    }

    #[test]
    fn iter_yields_live_objects() {
        let mut alloc = ObjectAllocator::new();
        let o0 = alloc.create().unwrap();
        let o1 = alloc.create().unwrap();
        let o2 = alloc.create().unwrap();
        alloc.destroy(o1).unwrap();
        let live: Vec<_> = alloc.iter().map(|(o, _)| o).collect();
        assert_eq!(live, vec![o0, o2]);
    }
}
