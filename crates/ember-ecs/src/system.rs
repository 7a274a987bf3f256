use crate::coordinator::Coordinator;
use crate::error::Result;
use crate::object::GameObject;
use crate::registry::SystemHandle;

/// A system that processes its matching objects each frame.
///
/// `members` is a snapshot taken just before the call, sorted by id. The
/// system may add or remove components and destroy objects while it runs; an
/// object it destroys stays in the snapshot, so check
/// [`Coordinator::is_alive`] when that can happen.
pub trait System: Send + Sync {
    fn run(&mut self, coordinator: &mut Coordinator, members: &[GameObject]);
}

/// Blanket implementation so closures can be used as systems.
impl<F: FnMut(&mut Coordinator, &[GameObject]) + Send + Sync> System for F {
    fn run(&mut self, coordinator: &mut Coordinator, members: &[GameObject]) {
        (self)(coordinator, members);
    }
}

/// An ordered list of systems to run each frame, one after another.
pub struct SystemSchedule {
    systems: Vec<(SystemHandle, Box<dyn System>)>,
}

impl SystemSchedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Add a system to the end of the schedule, fed by the members of `handle`.
    pub fn add_system<S: System + 'static>(&mut self, handle: SystemHandle, system: S) {
        self.systems.push((handle, Box::new(system)));
    }

    /// Run all systems in order on the given coordinator.
    pub fn run_all(&mut self, coordinator: &mut Coordinator) -> Result<()> {
        for (handle, system) in &mut self.systems {
            let mut members: Vec<GameObject> =
                coordinator.members(*handle)?.iter().copied().collect();
            members.sort_unstable();
            system.run(coordinator, &members);
        }
        Ok(())
    }

    /// Number of systems in the schedule.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for SystemSchedule {
    fn default() -> Self {
        Self::new()
    }
}
