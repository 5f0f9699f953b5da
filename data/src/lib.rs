#[macro_use]
mod macros;

/// A Smallvec instantiation with 4 embeddable values.
///
/// Used for shape dimensions: most tensors declared by a network have a rank
/// of four or less.
pub type TVec<T> = smallvec::SmallVec<[T; 4]>;

pub type DlError = anyhow::Error;
pub type DlResult<T> = anyhow::Result<T>;

pub mod prelude {
    pub use crate::datum::DatumType;
    pub use crate::dim::DimValue;
    pub use crate::errors::ValidationError;
    pub use crate::monitor::MonitoredQuantity;
    pub use crate::settings::{Entry, Persist, Scalar, Settings};
    pub use crate::shape::{
        parse_shape, render_shape, DimConstraint, ShapeConstraint, ShapeSlot, TensorShape,
    };
    pub use crate::spec::{find_by_name, NetworkSpec, TensorSpec};
    pub use crate::{shape, tvec};
    pub use crate::{DlError, DlResult, TVec};
}

pub mod internal {
    pub use crate::prelude::*;
    pub use anyhow::{anyhow, bail, ensure, format_err, Context as _};
    pub use itertools::Itertools;
    pub use smallvec as dl_smallvec;
    pub use std::fmt;
}

pub use anyhow;

mod datum;
mod dim;
mod errors;
mod monitor;
mod settings;
mod shape;
mod spec;
