//! Core trait defining locator behavior.
//!
//! This module provides the `LocatorApi` trait with default implementations for
//! registering factories by name, resolving them lazily, and tracing every
//! operation.
//!
//! Each name has at most one factory and at most one cached instance. Setting a
//! name again replaces its factory and drops the cached instance, so the next
//! lookup constructs anew.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::{Factory, FactoryError, Instance, LocatorError, LocatorEvent, TraceCallback};

/// Storage backing a locator: one slot per registered name.
pub type Storage = Mutex<HashMap<String, Arc<Slot>>>;

/// Storage for the optional trace callback.
pub type TraceHook = Mutex<Option<Arc<TraceCallback>>>;

/// One registration of a name: its factory and, once constructed, its instance.
///
/// `set` installs a fresh slot, which is how a cached instance is invalidated.
pub struct Slot {
    factory: Factory,
    instance: Mutex<Option<Instance>>,
}

impl Slot {
    pub(crate) fn new(factory: Factory) -> Self {
        Self {
            factory,
            instance: Mutex::new(None),
        }
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// Whether the factory has already produced the instance.
    ///
    /// Returns `false` while the factory is still running on another thread.
    pub fn is_cached(&self) -> bool {
        match self.instance.try_lock() {
            Ok(guard) => guard.is_some(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_some(),
            Err(TryLockError::WouldBlock) => false,
        }
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("type_name", &self.factory.type_name())
            .field("cached", &self.is_cached())
            .finish()
    }
}

/// Locks recovering from poisoning.
///
/// A poisoned lock means a factory or callback panicked. The guarded data is
/// never left half-written: a slot is only filled after its factory returns.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

/// Core trait defining locator behavior.
///
/// Provides default implementations for all locator operations, requiring only
/// two accessor methods (`storage` and `trace`) to be implemented.
pub trait LocatorApi {
    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Access the trace callback storage.
    fn trace(&self) -> &TraceHook;

    /// Set a tracing callback for locator operations.
    ///
    /// The callback will be invoked for every operation (set, get, contains)
    /// and for every failed factory. It replaces any previous callback.
    fn set_trace_callback(&self, callback: impl Fn(&LocatorEvent<'_>) + Send + Sync + 'static) {
        *lock(self.trace()) = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// This does not affect registered factories or cached instances.
    fn clear_trace_callback(&self) {
        *lock(self.trace()) = None;
    }

    /// Emit an event to the current callback, if any.
    ///
    /// The callback runs with no locator lock held, so it may use the locator.
    /// Operations it performs on this locator emit events of their own.
    fn emit_event(&self, event: &LocatorEvent<'_>) {
        let callback = lock(self.trace()).clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Locator
    // -------------------------------------------------------------------------------------------------

    /// Access the slot storage.
    fn storage(&self) -> &Storage;

    /// Register a factory under `name`.
    ///
    /// The factory is not invoked here; it runs on the first `get(name)`.
    /// Registering an existing name replaces its factory and drops its cached
    /// instance, even if the new factory never runs.
    fn set<T, F>(&self, name: impl Into<String>, factory: F)
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.set_factory(name, Factory::new(factory));
    }

    /// Register a factory that may fail.
    ///
    /// See [`Factory::fallible`].
    fn try_set<T, E, F>(&self, name: impl Into<String>, factory: F)
    where
        T: Send + Sync + 'static,
        E: Into<FactoryError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        self.set_factory(name, Factory::fallible(factory));
    }

    /// Register an already-built [`Factory`] under `name`.
    ///
    /// This is what `set` and `try_set` delegate to.
    fn set_factory(&self, name: impl Into<String>, factory: Factory) {
        let name = name.into();
        let type_name = factory.type_name();

        // Bound so the superseded slot is dropped after the map lock is released.
        let previous = lock(self.storage()).insert(name.clone(), Arc::new(Slot::new(factory)));
        let replaced = previous.is_some();
        drop(previous);

        tracing::debug!(name = %name, type_name, replaced, "registered factory");

        self.emit_event(&LocatorEvent::Set {
            name: &name,
            type_name,
            replaced,
        });
    }

    /// Resolve `name` to its instance without a type check.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no factory is registered under `name`
    /// - `Factory` if the factory fails; the name stays uncached
    fn get_any(&self, name: &str) -> Result<Instance, LocatorError> {
        resolve(self, name).map(|(instance, _)| instance)
    }

    /// Resolve `name` to its instance.
    ///
    /// The first call for a registration runs the factory and caches the
    /// result; later calls return the same `Arc` (`Arc::ptr_eq` holds) until
    /// the name is set again.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no factory is registered under `name`
    /// - `Factory` if the factory fails; the name stays uncached
    /// - `TypeMismatch` if the instance is not a `T`; the instance stays cached
    ///
    /// # Deadlocks
    ///
    /// A factory may resolve other names from the same locator, but resolving
    /// its own name from inside itself blocks forever.
    fn get<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, LocatorError> {
        let (instance, found) = resolve(self, name)?;

        instance.downcast::<T>().map_err(|_| {
            let expected = std::any::type_name::<T>();
            tracing::warn!(name, expected, found, "instance type mismatch");
            LocatorError::TypeMismatch {
                name: name.to_string(),
                expected,
                found,
            }
        })
    }

    /// Resolve `name` and return an owned clone of its instance.
    ///
    /// # Errors
    ///
    /// Same as [`LocatorApi::get`].
    fn get_cloned<T: Send + Sync + Clone + 'static>(&self, name: &str) -> Result<T, LocatorError> {
        let arc = self.get::<T>(name)?;
        Ok((*arc).clone())
    }

    /// Check if a factory is registered under `name`.
    fn contains(&self, name: &str) -> bool {
        let found = lock(self.storage()).contains_key(name);

        self.emit_event(&LocatorEvent::Contains { name, found });

        found
    }

    /// Check if `name` is registered and its instance already constructed.
    fn is_cached(&self, name: &str) -> bool {
        let slot = lock(self.storage()).get(name).cloned();
        slot.is_some_and(|slot| slot.is_cached())
    }

    /// All registered names, sorted.
    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = lock(self.storage()).keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

/// Returns the instance for `name` and the type name its factory produces.
fn resolve<L: LocatorApi + ?Sized>(
    locator: &L,
    name: &str,
) -> Result<(Instance, &'static str), LocatorError> {
    let slot = lock(locator.storage()).get(name).cloned();

    let Some(slot) = slot else {
        tracing::debug!(name, "no factory registered");
        locator.emit_event(&LocatorEvent::Get {
            name,
            found: false,
            constructed: false,
        });
        return Err(LocatorError::NotFound {
            name: name.to_string(),
        });
    };

    // Held across the factory call so concurrent lookups construct once.
    let mut cached = lock(&slot.instance);

    let (instance, constructed) = match cached.clone() {
        Some(instance) => {
            tracing::trace!(name, "cache hit");
            (instance, false)
        }
        None => match slot.factory.invoke() {
            Ok(instance) => {
                tracing::debug!(name, type_name = slot.factory.type_name(), "constructed instance");
                *cached = Some(instance.clone());
                (instance, true)
            }
            Err(source) => {
                drop(cached);
                tracing::warn!(name, error = %source, "factory failed");
                locator.emit_event(&LocatorEvent::FactoryFailed { name });
                return Err(LocatorError::Factory {
                    name: name.to_string(),
                    source,
                });
            }
        },
    };
    drop(cached);

    locator.emit_event(&LocatorEvent::Get {
        name,
        found: true,
        constructed,
    });

    Ok((instance, slot.factory.type_name()))
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{LocatorApi, Storage, TraceHook};
    use crate::LocatorError;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Api {
        storage: Storage,
        trace: TraceHook,
    }

    impl LocatorApi for Api {
        fn storage(&self) -> &Storage {
            &self.storage
        }

        fn trace(&self) -> &TraceHook {
            &self.trace
        }
    }

    fn recorder(api: &Api) -> Arc<Mutex<Vec<String>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        api.set_trace_callback(move |e| {
            events_clone.lock().unwrap().push(format!("{}", e));
        });
        events
    }

    #[test]
    fn test_set_and_get_primitive() -> Result<(), LocatorError> {
        let api = Api::default();
        api.set("answer", || 42i32);

        let num: Arc<i32> = api.get("answer")?;
        assert_eq!(*num, 42);

        let num_2 = api.get::<i32>("answer")?;
        assert!(Arc::ptr_eq(&num, &num_2));

        Ok(())
    }

    #[test]
    fn test_get_nonexistent() {
        let api = Api::default();

        let result: Result<Arc<String>, LocatorError> = api.get("NoSuchInstance");
        match result {
            Err(LocatorError::NotFound { name }) => assert_eq!(name, "NoSuchInstance"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_set_does_not_invoke_factory() {
        let api = Api::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        api.set("lazy", move || counter.fetch_add(1, Ordering::SeqCst));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!api.is_cached("lazy"));

        let _ = api.get::<usize>("lazy").unwrap();
        let _ = api.get::<usize>("lazy").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(api.is_cached("lazy"));
    }

    #[test]
    fn test_set_invalidates_cached_instance() {
        let api = Api::default();
        api.set("svc", || String::from("first"));
        let first: Arc<String> = api.get("svc").unwrap();

        api.set("svc", || String::from("second"));
        assert!(!api.is_cached("svc"));

        let second: Arc<String> = api.get("svc").unwrap();
        assert_eq!(&*second, "second");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_type_mismatch_keeps_instance_cached() {
        let api = Api::default();
        api.set("port", || 8080u16);

        let err = api.get::<String>("port").unwrap_err();
        match err {
            LocatorError::TypeMismatch {
                name,
                expected,
                found,
            } => {
                assert_eq!(name, "port");
                assert_eq!(expected, "alloc::string::String");
                assert_eq!(found, "u16");
            }
            other => panic!("expected TypeMismatch, got {:?}", other),
        }

        assert!(api.is_cached("port"));
        assert_eq!(*api.get::<u16>("port").unwrap(), 8080);
    }

    #[test]
    fn test_get_cloned() {
        let api = Api::default();
        api.set("greeting", || "hello".to_string());
        let value: String = api.get_cloned("greeting").unwrap();
        assert_eq!(value, "hello");
    }

    #[test]
    fn test_contains_and_names() {
        let api = Api::default();
        assert!(!api.contains("b"));

        api.set("b", || 2u8);
        api.set("a", || 1u8);

        assert!(api.contains("b"));
        assert_eq!(api.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_try_set_failure_is_not_cached() {
        let api = Api::default();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        api.try_set("flaky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("not ready")
            } else {
                Ok(7u64)
            }
        });

        let err = api.get::<u64>("flaky").unwrap_err();
        assert!(matches!(err, LocatorError::Factory { .. }));
        assert!(!api.is_cached("flaky"));

        assert_eq!(*api.get::<u64>("flaky").unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_trace_callback_set_event() {
        let api = Api::default();
        let events = recorder(&api);

        api.set("n", || 5u8);
        api.set("n", || 6u8);

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(captured[0], "set { name: n, type_name: u8, replaced: false }");
        assert_eq!(captured[1], "set { name: n, type_name: u8, replaced: true }");
    }

    #[test]
    fn test_trace_callback_get_event() {
        let api = Api::default();
        api.set("n", || 42i32);
        let events = recorder(&api);

        let _ = api.get::<i32>("n");
        let _ = api.get::<i32>("n");
        let _ = api.get::<i32>("missing");

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured[0], "get { name: n, found: true, constructed: true }");
        assert_eq!(captured[1], "get { name: n, found: true, constructed: false }");
        assert_eq!(
            captured[2],
            "get { name: missing, found: false, constructed: false }"
        );
    }

    #[test]
    fn test_trace_callback_factory_failed_event() {
        let api = Api::default();
        api.try_set("broken", || Err::<u8, _>("boom"));
        let events = recorder(&api);

        let _ = api.get_any("broken");

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0], "factory_failed { name: broken }");
    }

    #[test]
    fn test_clear_trace_callback_stops_events() {
        let api = Api::default();
        let events = recorder(&api);

        api.set("x", || 10u16);
        {
            let captured = events.lock().unwrap();
            assert_eq!(captured.len(), 1);
        }

        api.clear_trace_callback();

        api.set("x", || 20u16);
        let _ = api.get::<u16>("x");
        let _ = api.contains("x");

        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Barrier;
        use std::thread;

        let api = Arc::new(Api::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        api.set("shared", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            String::from("built once")
        });

        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let api = api.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    api.get::<String>("shared").unwrap()
                })
            })
            .collect();

        let results: Vec<Arc<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
