use crate::internal::*;

/// Identity of a family of trained networks (one model format, one
/// framework...).
///
/// Only ever used as a key: two network types are the same if their
/// identifiers are. An empty identifier stands for "no network type".
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkType(StaticName);

impl NetworkType {
    pub fn new(identifier: impl Into<StaticName>) -> NetworkType {
        NetworkType(identifier.into())
    }

    pub const fn from_static(identifier: &'static str) -> NetworkType {
        NetworkType(Cow::Borrowed(identifier))
    }

    pub const fn absent() -> NetworkType {
        NetworkType(Cow::Borrowed(""))
    }

    pub fn identifier(&self) -> &str {
        &self.0
    }

    pub fn is_absent(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NetworkType({})", self.0)
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
