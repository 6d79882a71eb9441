//! Type-erased factories and the instances they produce.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A constructed value as the locator stores it.
///
/// Typed access goes through `LocatorApi::get`, which downcasts to `Arc<T>`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Error type a fallible factory is boxed into.
pub type FactoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

type BuildFn = dyn Fn() -> Result<Instance, FactoryError> + Send + Sync;

/// A zero-argument constructor registered under a name.
///
/// Cloning a `Factory` is cheap; clones share the same closure.
#[derive(Clone)]
pub struct Factory {
    build: Arc<BuildFn>,
    type_name: &'static str,
}

impl Factory {
    /// Wraps an infallible constructor.
    ///
    /// ```rust
    /// use service_locator::Factory;
    ///
    /// let factory = Factory::new(|| String::from("hello"));
    /// assert_eq!(factory.type_name(), "alloc::string::String");
    /// ```
    pub fn new<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(move || Ok(Arc::new(factory()) as Instance)),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wraps a constructor that may fail.
    ///
    /// An error is handed back to the caller of `get` unchanged as the
    /// `source` of `LocatorError::Factory`; nothing is cached.
    pub fn fallible<T, E, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        E: Into<FactoryError>,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        Self {
            build: Arc::new(move || {
                factory()
                    .map(|value| Arc::new(value) as Instance)
                    .map_err(Into::into)
            }),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Name of the type this factory produces.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn invoke(&self) -> Result<Instance, FactoryError> {
        (self.build)()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
