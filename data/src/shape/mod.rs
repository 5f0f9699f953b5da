//! Tensor shapes, their textual form, and the constraints a declaration puts
//! on them.
use std::fmt;
use std::str::FromStr;

use crate::dim::DimValue;
use crate::errors::ValidationError;
use crate::TVec;

mod constraint;
mod parse;

pub use self::constraint::{DimConstraint, ShapeConstraint, ShapeSlot};
pub use self::parse::{parse_shape, render_shape};

/// Shape of a tensor slot.
///
/// A shape is either rank-known, with an ordered (possibly empty) sequence of
/// dimensions, or rank-unknown. The empty rank-known shape is a scalar, not
/// an unknown shape.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct TensorShape {
    dims: Option<TVec<DimValue>>,
}

impl TensorShape {
    /// Shape whose rank is not even known.
    pub fn unknown() -> TensorShape {
        TensorShape { dims: None }
    }

    pub fn known(dims: impl IntoIterator<Item = DimValue>) -> TensorShape {
        TensorShape { dims: Some(dims.into_iter().collect()) }
    }

    pub fn fixed(dims: &[u64]) -> TensorShape {
        TensorShape::known(dims.iter().copied().map(DimValue::Known))
    }

    /// Rank-0 shape.
    pub fn scalar() -> TensorShape {
        TensorShape { dims: Some(TVec::new()) }
    }

    pub fn dims(&self) -> Option<&[DimValue]> {
        self.dims.as_deref()
    }

    pub fn dim(&self, ix: usize) -> Option<DimValue> {
        self.dims.as_ref().and_then(|d| d.get(ix)).copied()
    }

    pub fn rank(&self) -> Option<usize> {
        self.dims.as_ref().map(|d| d.len())
    }

    pub fn is_rank_known(&self) -> bool {
        self.dims.is_some()
    }

    /// True if the rank and every dimension are known.
    pub fn is_fixed(&self) -> bool {
        self.dims.as_ref().is_some_and(|d| d.iter().all(|d| d.is_known()))
    }

    /// True if the rank is known but some dimensions are not.
    pub fn is_partial(&self) -> bool {
        self.dims.as_ref().is_some_and(|d| d.iter().any(|d| !d.is_known()))
    }

    pub fn fixed_dims(&self) -> Option<TVec<u64>> {
        self.dims.as_ref()?.iter().map(|d| d.as_known()).collect()
    }

    /// Number of elements of a tensor of this shape.
    ///
    /// 1 for a scalar. `None` if any dimension is unknown or if the product
    /// does not fit in a u64.
    pub fn size(&self) -> Option<u64> {
        self.fixed_dims()?.iter().try_fold(1u64, |acc, d| acc.checked_mul(*d))
    }

    /// True if a concrete shape could be a realisation of this one.
    pub fn accepts(&self, concrete: &[u64]) -> bool {
        match &self.dims {
            None => true,
            Some(dims) => {
                dims.len() == concrete.len() && dims.iter().zip(concrete).all(|(d, c)| d.accepts(*c))
            }
        }
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render_shape(self))
    }
}

impl fmt::Debug for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_rank_known() {
            write!(f, "({})", render_shape(self))
        } else {
            write!(f, "(..)")
        }
    }
}

impl FromStr for TensorShape {
    type Err = ValidationError;

    /// Parse with the most permissive constraint: any rank, `?` allowed.
    fn from_str(s: &str) -> Result<TensorShape, ValidationError> {
        parse_shape(s, &ShapeConstraint::partial())
    }
}

impl From<&[u64]> for TensorShape {
    fn from(dims: &[u64]) -> TensorShape {
        TensorShape::fixed(dims)
    }
}
