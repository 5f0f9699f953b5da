//! Single tensor dimension.
use std::fmt;

/// Textual token standing for a dimension of unknown size.
pub const UNKNOWN_DIM_TOKEN: &str = "?";

/// One element of a shape: either a known size, or explicitly unknown.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum DimValue {
    Known(u64),
    Unknown,
}

impl DimValue {
    pub fn is_known(&self) -> bool {
        matches!(self, DimValue::Known(_))
    }

    pub fn as_known(&self) -> Option<u64> {
        match self {
            DimValue::Known(d) => Some(*d),
            DimValue::Unknown => None,
        }
    }

    /// True if a concrete `size` could stand in place of this dimension.
    pub fn accepts(&self, size: u64) -> bool {
        match self {
            DimValue::Known(d) => *d == size,
            DimValue::Unknown => true,
        }
    }
}

impl From<u64> for DimValue {
    fn from(d: u64) -> DimValue {
        DimValue::Known(d)
    }
}

impl From<Option<u64>> for DimValue {
    fn from(d: Option<u64>) -> DimValue {
        d.map(DimValue::Known).unwrap_or(DimValue::Unknown)
    }
}

impl fmt::Display for DimValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DimValue::Known(d) => write!(f, "{d}"),
            DimValue::Unknown => write!(f, "{UNKNOWN_DIM_TOKEN}"),
        }
    }
}
