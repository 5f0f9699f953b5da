use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};

use dlspec_core::internal::*;
use proptest::prelude::*;

const THREADS: usize = 8;
const PER_THREAD: usize = 50;

#[derive(Clone, Debug, PartialEq)]
struct Accelerator {
    identifier: String,
    network_type: NetworkType,
    units: usize,
}

impl ExecutionContext for Accelerator {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn network_type(&self) -> &NetworkType {
        &self.network_type
    }

    fn same_as(&self, other: &dyn ExecutionContext) -> bool {
        other.downcast_ref::<Self>().is_some_and(|o| o == self)
    }
}

fn setup_test_logger() {
    let _ = env_logger::Builder::from_env("DLSPEC_LOG").try_init();
}

fn keras() -> NetworkType {
    NetworkType::new("keras")
}

#[test]
fn concurrent_registrations_are_not_lost() -> DlResult<()> {
    let registry = ExecutionContextRegistry::new();
    let barrier = Barrier::new(THREADS);
    std::thread::scope(|s| {
        let handles = (0..THREADS)
            .map(|t| {
                let registry = &registry;
                let barrier = &barrier;
                s.spawn(move || -> DlResult<()> {
                    barrier.wait();
                    for i in 0..PER_THREAD {
                        let nt = if i % 2 == 0 { keras() } else { NetworkType::new("onnx") };
                        registry.register(ContextDescriptor::new(format!("{t}.{i}"), "ctx", nt))?;
                    }
                    Ok(())
                })
            })
            .collect_vec();
        handles.into_iter().try_for_each(|h| h.join().unwrap())
    })?;
    assert_eq!(registry.len(), THREADS * PER_THREAD);
    assert_eq!(registry.contexts_for(&keras()).len(), THREADS * PER_THREAD / 2);
    for t in 0..THREADS {
        for i in 0..PER_THREAD {
            assert!(registry.find_by_identifier(&format!("{t}.{i}")).is_some());
        }
    }
    Ok(())
}

#[test]
fn racing_duplicates_end_up_registered_once() {
    let registry = ExecutionContextRegistry::new();
    let barrier = Barrier::new(THREADS);
    let context = ContextDescriptor::new("keras.tf", "TensorFlow", keras());
    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                registry.register(context.clone()).unwrap();
            });
        }
    });
    assert_eq!(registry.contexts_for(&keras()).len(), 1);
}

#[test]
fn racing_identifier_claims_have_a_single_winner() {
    let registry = ExecutionContextRegistry::new();
    let barrier = Barrier::new(THREADS);
    let rejected = AtomicUsize::new(0);
    std::thread::scope(|s| {
        for units in 0..THREADS {
            let (registry, barrier, rejected) = (&registry, &barrier, &rejected);
            s.spawn(move || {
                barrier.wait();
                let ctx =
                    Accelerator { identifier: "keras.gpu".into(), network_type: keras(), units };
                if let Err(e) = registry.register(ctx) {
                    assert!(matches!(
                        e.downcast_ref::<ValidationError>(),
                        Some(ValidationError::DuplicateIdentifier(_))
                    ));
                    rejected.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });
    assert_eq!(registry.len(), 1);
    assert_eq!(rejected.load(Ordering::SeqCst), THREADS - 1);
}

#[test]
fn lazy_registry_discovers_once() {
    setup_test_logger();
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let lazy = LazyRegistry::default().with_discovery(move |r: &ExecutionContextRegistry| {
        counter.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(10));
        (0..10).try_for_each(|i| r.register(ContextDescriptor::new(format!("k{i}"), "k", keras())))
    });
    let barrier = Barrier::new(THREADS);
    let registries = std::thread::scope(|s| {
        let handles = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    let registry = lazy.get();
                    assert_eq!(registry.len(), 10);
                    registry
                })
            })
            .collect_vec();
        handles.into_iter().map(|h| h.join().unwrap()).collect_vec()
    });
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(registries.iter().all(|r| Arc::ptr_eq(r, &registries[0])));
}

#[test]
fn registration_after_discovery() -> DlResult<()> {
    let lazy = LazyRegistry::default().with_discovery(|r: &ExecutionContextRegistry| {
        r.register(ContextDescriptor::new("discovered", "d", keras()))
    });
    lazy.get().register(ContextDescriptor::new("explicit", "e", keras()))?;
    assert_eq!(lazy.get().contexts_for(&keras()).len(), 2);
    Ok(())
}

#[test]
fn downcast_registered_context() -> DlResult<()> {
    let registry = ExecutionContextRegistry::new();
    registry.register(Accelerator {
        identifier: "keras.gpu".into(),
        network_type: keras(),
        units: 3,
    })?;
    let ctx = registry.find_by_identifier("keras.gpu").unwrap();
    assert_eq!(ctx.downcast_ref::<Accelerator>().map(|a| a.units), Some(3));
    assert!((*ctx).as_any().is::<Accelerator>());
    assert!(!(*ctx).as_any().is::<ContextDescriptor>());
    Ok(())
}

proptest! {
    #[test]
    fn contexts_land_in_their_network_type_only(
        assignments in proptest::collection::vec((0usize..4, 0usize..4), 0..40)
    ) {
        let types = ["keras", "onnx", "tflite", "torch"].map(NetworkType::from_static);
        let registry = ExecutionContextRegistry::new();
        for (id, nt) in &assignments {
            let ctx = ContextDescriptor::new(format!("{}.{id}", types[*nt]), "c", types[*nt].clone());
            registry.register(ctx).unwrap();
        }
        for nt in &types {
            let expected = assignments.iter()
                .filter(|(_, t)| &types[*t] == nt)
                .map(|(id, _)| *id)
                .unique()
                .count();
            let found = registry.contexts_for(nt);
            prop_assert_eq!(found.len(), expected);
            prop_assert!(found.iter().all(|c| c.network_type() == nt));
        }
    }
}
