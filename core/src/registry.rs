use crate::internal::*;
use parking_lot::RwLock;
use std::collections::HashMap;

type ContextSet = Vec<Arc<dyn ExecutionContext>>;

/// Maps each `NetworkType` to the execution contexts able to run it.
///
/// Meant to be built once at startup, wrapped in an `Arc` and handed to
/// every consumer. Registration is additive: there is no way to remove a
/// context. Every method takes `&self` and is safe to call from any thread.
#[derive(Default)]
pub struct ExecutionContextRegistry {
    contexts: RwLock<HashMap<NetworkType, ContextSet>>,
}

impl ExecutionContextRegistry {
    pub fn new() -> ExecutionContextRegistry {
        ExecutionContextRegistry::default()
    }

    /// Registry populated by running every discovery in turn.
    ///
    /// A failing discovery is reported and skipped: the contexts it managed
    /// to register before failing stay, and the following discoveries still
    /// run. Use `discover` to get the error instead.
    pub fn from_discoveries(discoveries: &[&dyn Discovery]) -> ExecutionContextRegistry {
        let registry = ExecutionContextRegistry::new();
        for discovery in discoveries {
            if let Err(e) = registry.discover(*discovery) {
                error!("{e:?}");
            }
        }
        registry
    }

    pub fn discover(&self, discovery: &dyn Discovery) -> DlResult<()> {
        let before = self.len();
        discovery
            .discover(self)
            .with_context(|| format!("Running execution context discovery {}", discovery.name()))?;
        debug!("Discovery {} registered {} context(s)", discovery.name(), self.len() - before);
        Ok(())
    }

    pub fn register(&self, context: impl ExecutionContext) -> DlResult<()> {
        self.register_arc(Arc::new(context))
    }

    /// Adds a context to the set of its network type.
    ///
    /// Registering a context `same_as` one already there does nothing.
    /// Registering a different context under an identifier that is already
    /// taken fails with `ValidationError::DuplicateIdentifier`, whatever the
    /// network types.
    pub fn register_arc(&self, context: Arc<dyn ExecutionContext>) -> DlResult<()> {
        if context.network_type().is_absent() {
            bail!(ValidationError::invalid_argument(format!(
                "execution context {:?} has no network type",
                context.identifier()
            )));
        }
        if context.identifier().trim().is_empty() {
            bail!(ValidationError::invalid_argument(format!(
                "execution context for {} has an empty identifier",
                context.network_type()
            )));
        }
        let mut contexts = self.contexts.write();
        if contexts
            .get(context.network_type())
            .is_some_and(|set| set.iter().any(|c| c.same_as(&*context)))
        {
            debug!("Execution context {} already registered", context.identifier());
            return Ok(());
        }
        if contexts.values().flatten().any(|c| c.identifier() == context.identifier()) {
            bail!(ValidationError::DuplicateIdentifier(context.identifier().to_string()));
        }
        debug!(
            "Registering execution context {} ({}) for {}",
            context.identifier(),
            context.name(),
            context.network_type()
        );
        contexts.entry(context.network_type().clone()).or_default().push(context);
        Ok(())
    }

    /// Contexts able to run `network_type`, in registration order. Empty if
    /// none is known.
    pub fn contexts_for(&self, network_type: &NetworkType) -> Vec<Arc<dyn ExecutionContext>> {
        self.contexts.read().get(network_type).cloned().unwrap_or_default()
    }

    pub fn find_by_identifier(&self, identifier: &str) -> Option<Arc<dyn ExecutionContext>> {
        self.contexts.read().values().flatten().find(|c| c.identifier() == identifier).cloned()
    }

    pub fn network_types(&self) -> Vec<NetworkType> {
        self.contexts.read().keys().cloned().sorted().collect()
    }

    /// Number of registered contexts, over all network types.
    pub fn len(&self) -> usize {
        self.contexts.read().values().map(|set| set.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ExecutionContextRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let contexts = self.contexts.read();
        f.debug_map()
            .entries(contexts.iter().sorted_by(|a, b| a.0.cmp(b.0)).map(|(nt, set)| {
                (nt.identifier(), set.iter().map(|c| c.identifier()).collect::<Vec<_>>())
            }))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn keras() -> NetworkType {
        NetworkType::new("keras")
    }

    fn onnx() -> NetworkType {
        NetworkType::new("onnx")
    }

    fn validation_error(e: &DlError) -> Option<&ValidationError> {
        e.downcast_ref::<ValidationError>()
    }

    #[test]
    fn set_semantics() -> DlResult<()> {
        let registry = ExecutionContextRegistry::new();
        let ctx = ContextDescriptor::new("keras.tf", "TensorFlow", keras());
        registry.register(ctx.clone())?;
        registry.register(ctx)?;
        assert_eq!(registry.contexts_for(&keras()).len(), 1);
        assert_eq!(registry.len(), 1);
        Ok(())
    }

    #[test]
    fn partition() -> DlResult<()> {
        let registry = ExecutionContextRegistry::new();
        registry.register(ContextDescriptor::new("keras.tf", "TensorFlow", keras()))?;
        registry.register(ContextDescriptor::new("onnx.rt", "ONNX Runtime", onnx()))?;
        let ids = |nt: &NetworkType| {
            registry.contexts_for(nt).iter().map(|c| c.identifier().to_string()).collect_vec()
        };
        assert_eq!(ids(&keras()), vec!["keras.tf"]);
        assert_eq!(ids(&onnx()), vec!["onnx.rt"]);
        assert!(registry.contexts_for(&NetworkType::new("torch")).is_empty());
        assert_eq!(registry.network_types(), vec![keras(), onnx()]);
        Ok(())
    }

    #[test]
    fn registration_order_is_kept() -> DlResult<()> {
        let registry = ExecutionContextRegistry::new();
        for id in ["b", "a", "c"] {
            registry.register(ContextDescriptor::new(id, id, keras()))?;
        }
        let ids = registry.contexts_for(&keras()).iter().map(|c| c.name()).join(",");
        assert_eq!(ids, "b,a,c");
        Ok(())
    }

    #[test]
    fn absent_network_type_is_rejected() {
        let registry = ExecutionContextRegistry::new();
        let e = registry
            .register(ContextDescriptor::new("x", "x", NetworkType::absent()))
            .unwrap_err();
        assert!(matches!(validation_error(&e), Some(ValidationError::InvalidArgument(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let registry = ExecutionContextRegistry::new();
        let e = registry.register(ContextDescriptor::new("", "nameless", keras())).unwrap_err();
        assert!(matches!(validation_error(&e), Some(ValidationError::InvalidArgument(_))));
    }

    #[test]
    fn duplicate_identifier_is_rejected() -> DlResult<()> {
        crate::setup_test_logger();
        let registry = ExecutionContextRegistry::new();
        registry.register(ContextDescriptor::new("shared", "first", keras()))?;
        let e = registry.register(ContextDescriptor::new("shared", "second", keras())).unwrap_err();
        assert_eq!(
            validation_error(&e),
            Some(&ValidationError::DuplicateIdentifier("shared".into()))
        );
        let e = registry.register(ContextDescriptor::new("shared", "first", onnx())).unwrap_err();
        assert!(matches!(validation_error(&e), Some(ValidationError::DuplicateIdentifier(_))));
        assert_eq!(registry.find_by_identifier("shared").map(|c| c.name()), Some("first".into()));
        assert!(registry.contexts_for(&onnx()).is_empty());
        Ok(())
    }

    #[test]
    fn find_by_identifier() -> DlResult<()> {
        let registry = ExecutionContextRegistry::new();
        registry.register(ContextDescriptor::new("keras.tf", "TensorFlow", keras()))?;
        registry.register(ContextDescriptor::new("onnx.rt", "ONNX Runtime", onnx()))?;
        let found = registry.find_by_identifier("onnx.rt").unwrap();
        assert_eq!(found.network_type(), &onnx());
        assert!(registry.find_by_identifier("onnx").is_none());
        Ok(())
    }

    #[test]
    fn snapshots_are_not_live() -> DlResult<()> {
        let registry = ExecutionContextRegistry::new();
        registry.register(ContextDescriptor::new("a", "a", keras()))?;
        let snapshot = registry.contexts_for(&keras());
        registry.register(ContextDescriptor::new("b", "b", keras()))?;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.contexts_for(&keras()).len(), 2);
        Ok(())
    }

    #[test]
    fn debug_lists_identifiers() -> DlResult<()> {
        let registry = ExecutionContextRegistry::new();
        registry.register(ContextDescriptor::new("onnx.rt", "ONNX Runtime", onnx()))?;
        registry.register(ContextDescriptor::new("keras.tf", "TensorFlow", keras()))?;
        assert_eq!(format!("{registry:?}"), r#"{"keras": ["keras.tf"], "onnx": ["onnx.rt"]}"#);
        Ok(())
    }
}
