//! The stock locator: an explicit, owned registry of named factories.
//!
//! A `Locator` is meant to be passed to the components that need lookups
//! (or shared behind an `Arc`), never stored in a global.
//!
//! # Examples
//!
//! ```
//! use service_locator::{Locator, LocatorApi};
//! use std::sync::Arc;
//!
//! let locator = Locator::new();
//! locator.set("greeting", || String::from("Hello, World!"));
//!
//! let first: Arc<String> = locator.get("greeting").unwrap();
//! let second: Arc<String> = locator.get("greeting").unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::locator_trait::Slot;
use crate::{Factory, LocatorApi, Storage, TraceHook};

/// A lazily-constructing, name-keyed service locator.
#[derive(Default)]
pub struct Locator {
    storage: Storage,
    trace: TraceHook,
}

impl Locator {
    /// Creates an empty locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a locator pre-seeded with `(name, factory)` pairs.
    ///
    /// No factory is invoked. When a name repeats, the last pair wins. The
    /// result behaves exactly as an empty locator followed by one `set` per
    /// pair.
    ///
    /// ```
    /// use service_locator::{Factory, Locator, LocatorApi};
    ///
    /// let locator = Locator::with_factories([
    ///     ("host", Factory::new(|| String::from("localhost"))),
    ///     ("port", Factory::new(|| 8080u16)),
    /// ]);
    ///
    /// assert_eq!(*locator.get::<u16>("port").unwrap(), 8080);
    /// assert!(!locator.is_cached("host"));
    /// ```
    pub fn with_factories<I, K>(factories: I) -> Self
    where
        I: IntoIterator<Item = (K, Factory)>,
        K: Into<String>,
    {
        let slots: HashMap<String, Arc<Slot>> = factories
            .into_iter()
            .map(|(name, factory)| (name.into(), Arc::new(Slot::new(factory))))
            .collect();

        tracing::debug!(count = slots.len(), "pre-seeded locator");

        Self {
            storage: Mutex::new(slots),
            trace: TraceHook::default(),
        }
    }
}

impl LocatorApi for Locator {
    fn storage(&self) -> &Storage {
        &self.storage
    }

    fn trace(&self) -> &TraceHook {
        &self.trace
    }
}

impl<K: Into<String>> FromIterator<(K, Factory)> for Locator {
    fn from_iter<I: IntoIterator<Item = (K, Factory)>>(iter: I) -> Self {
        Self::with_factories(iter)
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        f.debug_map()
            .entries(names.iter().map(|name| (name, self.is_cached(name))))
            .finish()
    }
}
