//! # dlspec-core
//!
//! Registry of the execution contexts (backends) able to run each family of
//! trained networks.
//!
//! ```
//! use dlspec_core::internal::*;
//!
//! let keras = NetworkType::new("keras");
//! let registry = ExecutionContextRegistry::new();
//! registry.register(ContextDescriptor::new("keras.tensorflow", "Keras (TensorFlow)", keras.clone()))?;
//!
//! assert_eq!(registry.contexts_for(&keras).len(), 1);
//! assert!(registry.find_by_identifier("keras.tensorflow").is_some());
//! assert!(registry.contexts_for(&NetworkType::new("onnx")).is_empty());
//! # Ok::<(), DlError>(())
//! ```
#[macro_use]
extern crate downcast_rs;
#[allow(unused_imports)]
#[macro_use]
extern crate log;

pub mod context;
pub mod discovery;
pub mod network;
pub mod registry;

pub use dlspec_data;

/// Names known at compile time most of the time, but not always.
pub type StaticName = std::borrow::Cow<'static, str>;

pub mod prelude {
    pub use crate::context::{ContextDescriptor, ExecutionContext};
    pub use crate::discovery::{Discovery, LazyRegistry};
    pub use crate::network::NetworkType;
    pub use crate::registry::ExecutionContextRegistry;
    pub use dlspec_data::prelude::*;
}

pub mod internal {
    pub use crate::prelude::*;
    pub use crate::StaticName;
    pub use dlspec_data::internal::*;
    pub use downcast_rs::Downcast;
    pub use std::borrow::Cow;
    pub use std::sync::Arc;
}

#[cfg(test)]
#[allow(dead_code)]
fn setup_test_logger() {
    let _ = env_logger::Builder::from_env("DLSPEC_LOG").try_init();
}
