use crate::internal::*;
use std::sync::OnceLock;

/// Something able to find execution contexts and register them: a plugin
/// loader, a hardcoded list, a probe of the available accelerators...
pub trait Discovery: Send + Sync {
    fn name(&self) -> StaticName {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    fn discover(&self, registry: &ExecutionContextRegistry) -> DlResult<()>;
}

impl<F> Discovery for F
where
    F: Fn(&ExecutionContextRegistry) -> DlResult<()> + Send + Sync,
{
    fn discover(&self, registry: &ExecutionContextRegistry) -> DlResult<()> {
        (self)(registry)
    }
}

/// A registry populated by its discoveries on first access.
///
/// Discovery runs exactly once: threads racing on the first `get` wait for
/// the winner, then all of them get the same populated registry.
pub struct LazyRegistry {
    discoveries: Vec<Box<dyn Discovery>>,
    registry: OnceLock<Arc<ExecutionContextRegistry>>,
}

impl LazyRegistry {
    pub fn new(discoveries: Vec<Box<dyn Discovery>>) -> LazyRegistry {
        LazyRegistry { discoveries, registry: OnceLock::new() }
    }

    pub fn with_discovery(mut self, discovery: impl Discovery + 'static) -> LazyRegistry {
        self.discoveries.push(Box::new(discovery));
        self
    }

    pub fn get(&self) -> Arc<ExecutionContextRegistry> {
        self.registry
            .get_or_init(|| {
                debug!("Initializing execution context registry");
                let discoveries = self.discoveries.iter().map(|d| &**d).collect_vec();
                Arc::new(ExecutionContextRegistry::from_discoveries(&discoveries))
            })
            .clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.get().is_some()
    }
}

impl Default for LazyRegistry {
    fn default() -> LazyRegistry {
        LazyRegistry::new(vec![])
    }
}

impl fmt::Debug for LazyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LazyRegistry")
            .field("discoveries", &self.discoveries.iter().map(|d| d.name()).collect_vec())
            .field("registry", &self.registry.get())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Static(Vec<ContextDescriptor>);

    impl Discovery for Static {
        fn discover(&self, registry: &ExecutionContextRegistry) -> DlResult<()> {
            self.0.iter().try_for_each(|c| registry.register(c.clone()))
        }
    }

    fn keras(id: &'static str) -> ContextDescriptor {
        ContextDescriptor::new(id, id, NetworkType::new("keras"))
    }

    #[test]
    fn lazy_until_first_get() {
        let lazy = LazyRegistry::default().with_discovery(Static(vec![keras("a"), keras("b")]));
        assert!(!lazy.is_initialized());
        let registry = lazy.get();
        assert!(lazy.is_initialized());
        assert_eq!(registry.len(), 2);
        assert!(Arc::ptr_eq(&registry, &lazy.get()));
    }

    #[test]
    fn closures_are_discoveries() {
        let lazy = LazyRegistry::default().with_discovery(|r: &ExecutionContextRegistry| {
            r.register(keras("from_closure"))
        });
        assert!(lazy.get().find_by_identifier("from_closure").is_some());
    }

    #[test]
    fn failing_discovery_does_not_stop_the_others() {
        crate::setup_test_logger();
        let lazy = LazyRegistry::default()
            .with_discovery(Static(vec![keras("a"), keras("")]))
            .with_discovery(Static(vec![keras("b")]));
        let registry = lazy.get();
        assert!(registry.find_by_identifier("a").is_some());
        assert!(registry.find_by_identifier("b").is_some());
    }

    #[test]
    fn explicit_discover_propagates() {
        let registry = ExecutionContextRegistry::new();
        let e = registry.discover(&Static(vec![keras("")])).unwrap_err();
        assert!(e.to_string().starts_with("Running execution context discovery"));
        assert!(matches!(
            e.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidArgument(_))
        ));
    }
}
