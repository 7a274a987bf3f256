use std::fmt;

/// Maximum number of simultaneously live game objects.
pub const MAX_OBJECTS: usize = 8192;

/// An opaque game object id, dense in `0..MAX_OBJECTS`.
///
/// Ids are recycled after destruction, so a stale copy may later name a
/// different object. Hold ids only as long as the object is known to be alive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameObject(pub(crate) u32);

impl GameObject {
    /// Create an id from its raw value (mainly for testing and FFI).
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// The raw id.
    pub const fn id(self) -> u32 {
        self.0
    }

    /// The id as a table index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameObject({})", self.0)
    }
}

impl fmt::Display for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<GameObject> for u32 {
    fn from(object: GameObject) -> Self {
        object.0
    }
}
