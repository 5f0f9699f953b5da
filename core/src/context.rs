//! Execution contexts: the backends a network can run on.
use crate::internal::*;

/// A backend able to execute networks of one `NetworkType`.
///
/// Implementations are shared between threads behind `Arc`s once registered,
/// so they should be cheap immutable descriptions of the backend rather than
/// live sessions.
pub trait ExecutionContext:
    fmt::Debug + Downcast + dyn_clone::DynClone + Send + Sync + 'static
{
    /// Stable identifier, unique across every registered context.
    fn identifier(&self) -> &str;

    /// Human readable name.
    fn name(&self) -> StaticName {
        Cow::Owned(self.identifier().to_string())
    }

    fn network_type(&self) -> &NetworkType;

    /// Value equality across implementations. Registering a context that is
    /// `same_as` an already registered one is a no-op.
    fn same_as(&self, other: &dyn ExecutionContext) -> bool;
}

impl_downcast!(ExecutionContext);
dyn_clone::clone_trait_object!(ExecutionContext);

/// Plain data execution context, for backends that need nothing more than an
/// identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextDescriptor {
    identifier: StaticName,
    name: StaticName,
    network_type: NetworkType,
}

impl ContextDescriptor {
    pub fn new(
        identifier: impl Into<StaticName>,
        name: impl Into<StaticName>,
        network_type: NetworkType,
    ) -> ContextDescriptor {
        ContextDescriptor { identifier: identifier.into(), name: name.into(), network_type }
    }
}

impl ExecutionContext for ContextDescriptor {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn name(&self) -> StaticName {
        self.name.clone()
    }

    fn network_type(&self) -> &NetworkType {
        &self.network_type
    }

    fn same_as(&self, other: &dyn ExecutionContext) -> bool {
        if let Some(other) = other.downcast_ref::<Self>() { self == other } else { false }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Gpu {
        network_type: NetworkType,
        devices: usize,
    }

    impl ExecutionContext for Gpu {
        fn identifier(&self) -> &str {
            "keras.gpu"
        }

        fn network_type(&self) -> &NetworkType {
            &self.network_type
        }

        fn same_as(&self, other: &dyn ExecutionContext) -> bool {
            other.downcast_ref::<Self>().is_some_and(|o| o == self)
        }
    }

    #[test]
    fn same_as_requires_same_concrete_type() {
        let keras = NetworkType::new("keras");
        let a = ContextDescriptor::new("keras.gpu", "GPU", keras.clone());
        let b = Gpu { network_type: keras, devices: 2 };
        assert!(!a.same_as(&b));
        assert!(!b.same_as(&a));
        assert!(b.same_as(&b.clone()));
        assert!(a.same_as(&a.clone()));
    }

    #[test]
    fn downcast_from_trait_object() {
        let ctx: Box<dyn ExecutionContext> =
            Box::new(Gpu { network_type: NetworkType::new("keras"), devices: 4 });
        let cloned = ctx.clone();
        assert_eq!(cloned.downcast_ref::<Gpu>().map(|g| g.devices), Some(4));
        assert!(cloned.downcast_ref::<ContextDescriptor>().is_none());
        assert_eq!(cloned.name(), "keras.gpu");
    }
}
