//! Declarations of the tensors a network consumes and produces.
use std::collections::HashSet;
use std::fmt;

use crate::datum::DatumType;
use crate::errors::ValidationError;
use crate::shape::{parse_shape, ShapeConstraint, TensorShape};

/// Declaration of one input, hidden output or output slot of a network.
///
/// The shape does not include the batch dimension.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TensorSpec {
    name: String,
    batch_size: Option<u64>,
    shape: Option<TensorShape>,
    datum_type: DatumType,
}

impl TensorSpec {
    pub fn new(
        name: impl Into<String>,
        batch_size: Option<u64>,
        shape: Option<TensorShape>,
        datum_type: DatumType,
    ) -> Result<TensorSpec, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::invalid_argument("tensor name must not be empty"));
        }
        if batch_size == Some(0) {
            return Err(ValidationError::invalid_argument(format!(
                "batch size of tensor {name:?} must be strictly positive"
            )));
        }
        // persisted as a signed integer
        if batch_size.is_some_and(|b| b > i64::MAX as u64) {
            return Err(ValidationError::invalid_argument(format!(
                "batch size of tensor {name:?} must not exceed {}",
                i64::MAX
            )));
        }
        Ok(TensorSpec { name, batch_size, shape, datum_type })
    }

    /// Spec whose shape comes from user text, validated against `constraint`.
    pub fn parse_shaped(
        name: impl Into<String>,
        batch_size: Option<u64>,
        shape: &str,
        constraint: &ShapeConstraint,
        datum_type: DatumType,
    ) -> Result<TensorSpec, ValidationError> {
        let shape = parse_shape(shape, constraint)?;
        TensorSpec::new(name, batch_size, Some(shape), datum_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch_size(&self) -> Option<u64> {
        self.batch_size
    }

    pub fn shape(&self) -> Option<&TensorShape> {
        self.shape.as_ref()
    }

    pub fn datum_type(&self) -> DatumType {
        self.datum_type
    }

    /// Batch size and shape both fixed: the full concrete shape.
    pub fn concrete_shape(&self) -> Option<Vec<u64>> {
        let batch = self.batch_size?;
        let dims = self.shape.as_ref()?.fixed_dims()?;
        Some(std::iter::once(batch).chain(dims).collect())
    }

    pub fn with_batch_size(self, batch_size: u64) -> Result<TensorSpec, ValidationError> {
        TensorSpec::new(self.name, Some(batch_size), self.shape, self.datum_type)
    }
}

impl fmt::Debug for TensorSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: ", self.name)?;
        match self.batch_size {
            Some(b) => write!(f, "{b}")?,
            None => write!(f, "?")?,
        }
        match &self.shape {
            Some(shape) if shape.is_rank_known() => write!(f, "x({shape})")?,
            _ => write!(f, "x(..)")?,
        }
        write!(f, " {}", self.datum_type)
    }
}

/// First spec named `name`, scanning `collections` in order.
///
/// The order of the collections sets the precedence when names collide
/// across them.
pub fn find_by_name<'s>(name: &str, collections: &[&'s [TensorSpec]]) -> Option<&'s TensorSpec> {
    collections.iter().flat_map(|c| c.iter()).find(|s| s.name == name)
}

/// Tensor declarations of a whole network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NetworkSpec {
    inputs: Vec<TensorSpec>,
    hidden_outputs: Vec<TensorSpec>,
    outputs: Vec<TensorSpec>,
}

impl NetworkSpec {
    pub fn new(
        inputs: Vec<TensorSpec>,
        hidden_outputs: Vec<TensorSpec>,
        outputs: Vec<TensorSpec>,
    ) -> Result<NetworkSpec, ValidationError> {
        for (section, specs) in
            [("inputs", &inputs), ("hidden outputs", &hidden_outputs), ("outputs", &outputs)]
        {
            let mut seen = HashSet::new();
            if let Some(dup) = specs.iter().find(|s| !seen.insert(s.name())) {
                return Err(ValidationError::invalid_argument(format!(
                    "tensor name {:?} appears twice in {section}",
                    dup.name()
                )));
            }
        }
        Ok(NetworkSpec { inputs, hidden_outputs, outputs })
    }

    pub fn inputs(&self) -> &[TensorSpec] {
        &self.inputs
    }

    pub fn hidden_outputs(&self) -> &[TensorSpec] {
        &self.hidden_outputs
    }

    pub fn outputs(&self) -> &[TensorSpec] {
        &self.outputs
    }

    /// Lookup by name: inputs first, then hidden outputs, then outputs.
    pub fn find_spec(&self, name: &str) -> Option<&TensorSpec> {
        find_by_name(name, &[&self.inputs[..], &self.hidden_outputs[..], &self.outputs[..]])
    }
}
