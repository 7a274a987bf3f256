use std::fmt;

/// Maximum number of distinct component types a coordinator can register.
pub const MAX_COMPONENT_KINDS: usize = 32;

/// Bit position assigned to a component type at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentKind(pub(crate) u8);

impl ComponentKind {
    /// Build a kind from a bit position. Returns `None` past `MAX_COMPONENT_KINDS`.
    pub fn new(bit: u8) -> Option<Self> {
        ((bit as usize) < MAX_COMPONENT_KINDS).then_some(Self(bit))
    }

    pub fn bit(self) -> u8 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn mask(self) -> u32 {
        1 << self.0
    }
}

/// The set of component kinds an object has, or a system requires.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u32);

impl Signature {
    pub const EMPTY: Signature = Signature(0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builder form of [`Signature::insert`].
    #[must_use]
    pub fn with(mut self, kind: ComponentKind) -> Self {
        self.insert(kind);
        self
    }

    pub fn insert(&mut self, kind: ComponentKind) {
        self.0 |= kind.mask();
    }

    pub fn remove(&mut self, kind: ComponentKind) {
        self.0 &= !kind.mask();
    }

    pub fn contains(self, kind: ComponentKind) -> bool {
        self.0 & kind.mask() != 0
    }

    /// Whether every kind in `required` is also in `self`.
    pub fn contains_all(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the kinds present, lowest bit first.
    pub fn kinds(self) -> impl Iterator<Item = ComponentKind> {
        (0..MAX_COMPONENT_KINDS as u8)
            .map(ComponentKind)
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<ComponentKind> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Signature::EMPTY, |signature, kind| signature.with(kind))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#034b})", self.0)
    }
}
