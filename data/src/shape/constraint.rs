use crate::dim::DimValue;
use crate::errors::ValidationError;
use crate::shape::{parse_shape, TensorShape};

/// Restriction on the value of every known dimension of a shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DimConstraint {
    #[default]
    NonNegative,
    Positive,
}

impl DimConstraint {
    pub fn check(&self, dim: &DimValue) -> bool {
        match (self, dim) {
            (DimConstraint::Positive, DimValue::Known(0)) => false,
            _ => true,
        }
    }
}

/// Legal shapes for one declared tensor slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeConstraint {
    min_rank: usize,
    max_rank: Option<usize>,
    partial_allowed: bool,
    dim_constraint: DimConstraint,
}

impl Default for ShapeConstraint {
    fn default() -> ShapeConstraint {
        ShapeConstraint::strict()
    }
}

impl ShapeConstraint {
    /// Any rank, every dimension must be given.
    pub fn strict() -> ShapeConstraint {
        ShapeConstraint {
            min_rank: 0,
            max_rank: None,
            partial_allowed: false,
            dim_constraint: DimConstraint::NonNegative,
        }
    }

    /// Any rank, `?` accepted for unknown dimensions.
    pub fn partial() -> ShapeConstraint {
        ShapeConstraint { partial_allowed: true, ..ShapeConstraint::strict() }
    }

    pub fn with_rank(
        self,
        min_rank: usize,
        max_rank: Option<usize>,
    ) -> Result<ShapeConstraint, ValidationError> {
        if let Some(max) = max_rank {
            if max < min_rank {
                return Err(ValidationError::invalid_argument(format!(
                    "max rank {max} is lower than min rank {min_rank}"
                )));
            }
        }
        Ok(ShapeConstraint { min_rank, max_rank, ..self })
    }

    pub fn with_exact_rank(self, rank: usize) -> ShapeConstraint {
        ShapeConstraint { min_rank: rank, max_rank: Some(rank), ..self }
    }

    pub fn with_partial_allowed(self, partial_allowed: bool) -> ShapeConstraint {
        ShapeConstraint { partial_allowed, ..self }
    }

    pub fn with_dim_constraint(self, dim_constraint: DimConstraint) -> ShapeConstraint {
        ShapeConstraint { dim_constraint, ..self }
    }

    pub fn min_rank(&self) -> usize {
        self.min_rank
    }

    pub fn max_rank(&self) -> Option<usize> {
        self.max_rank
    }

    pub fn partial_allowed(&self) -> bool {
        self.partial_allowed
    }

    pub fn dim_constraint(&self) -> DimConstraint {
        self.dim_constraint
    }

    pub fn check_rank(&self, rank: usize) -> Result<(), ValidationError> {
        if rank < self.min_rank || self.max_rank.is_some_and(|max| rank > max) {
            return Err(ValidationError::RankViolation {
                rank,
                min_rank: self.min_rank,
                max_rank: self.max_rank,
            });
        }
        Ok(())
    }

    /// Check an already built shape against this constraint.
    ///
    /// This is what `parse_shape` applies after the grammar check, usable on
    /// shapes that come from somewhere else than text.
    pub fn check(&self, shape: &TensorShape) -> Result<(), ValidationError> {
        let Some(dims) = shape.dims() else {
            return Err(ValidationError::ConstraintInfeasible(
                "Shape rank must be known".to_string(),
            ));
        };
        self.check_rank(dims.len())?;
        if !self.partial_allowed && dims.iter().any(|d| !d.is_known()) {
            return Err(ValidationError::Format {
                text: shape.to_string(),
                partial_allowed: false,
            });
        }
        self.check_dims(dims)
    }

    pub(super) fn check_dims(&self, dims: &[DimValue]) -> Result<(), ValidationError> {
        if let Some(ix) = dims.iter().position(|d| !self.dim_constraint.check(d)) {
            return Err(ValidationError::ConstraintInfeasible(format!(
                "Dimension #{ix} must be strictly positive"
            )));
        }
        Ok(())
    }
}

/// A shape-valued parameter of a declaration: constraint, whether a value is
/// required, and the value used when an optional slot is left blank.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeSlot {
    pub constraint: ShapeConstraint,
    pub required: bool,
    pub default: TensorShape,
}

impl ShapeSlot {
    pub fn required(constraint: ShapeConstraint) -> ShapeSlot {
        ShapeSlot { constraint, required: true, default: TensorShape::scalar() }
    }

    pub fn optional(constraint: ShapeConstraint, default: TensorShape) -> ShapeSlot {
        ShapeSlot { constraint, required: false, default }
    }

    /// Validate user text for this slot.
    ///
    /// Blank text in an optional slot resolves to the default, blank text in
    /// a required slot is parsed (and may violate the rank constraint).
    pub fn accept(&self, text: &str) -> Result<TensorShape, ValidationError> {
        if !self.required && text.trim().is_empty() {
            return Ok(self.default.clone());
        }
        parse_shape(text, &self.constraint)
    }
}
