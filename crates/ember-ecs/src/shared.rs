use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::coordinator::Coordinator;

/// A cloneable, lock-protected coordinator for hosts that touch the ECS from
/// more than one thread.
///
/// Every access takes one exclusive lock around the whole coordinator, so
/// calls from different threads are serialized and each runs to completion.
#[derive(Clone, Default)]
pub struct SharedCoordinator {
    inner: Arc<Mutex<Coordinator>>,
}

impl SharedCoordinator {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(coordinator)),
        }
    }

    /// Lock the coordinator. Keep the guard short-lived; the simulation thread
    /// blocks while it is held.
    pub fn lock(&self) -> MutexGuard<'_, Coordinator> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access and return its result.
    pub fn with<R>(&self, f: impl FnOnce(&mut Coordinator) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EcsError;
    use std::thread;

    #[derive(Debug, PartialEq)]
    struct Score(u32);

    #[test]
    fn serialized_access_from_threads() {
        let shared = SharedCoordinator::default();
        let object = shared.with(|ecs| {
            let object = ecs.create_object()?;
            ecs.add_component(object, Score(0))?;
            Ok::<_, EcsError>(object)
        })
        .unwrap();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        shared.with(|ecs| ecs.get_component_mut::<Score>(object).unwrap().0 += 1);
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(shared.lock().get_component::<Score>(object), Ok(&Score(400)));
    }

    #[test]
    fn workers_create_distinct_objects() {
        let shared = SharedCoordinator::new(Coordinator::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    (0..50)
                        .map(|_| shared.with(|ecs| ecs.create_object().unwrap()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut ids: Vec<_> = workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 200);
        assert_eq!(shared.lock().object_count(), 200);
    }
}
