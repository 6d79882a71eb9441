/// Events emitted by a locator during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// Names are borrowed for the duration of the callback; use `to_string()` or
/// clone the fields you need to keep.
///
/// # Examples
///
/// ```rust
/// use service_locator::LocatorEvent;
///
/// let event = LocatorEvent::Contains { name: "db", found: false };
/// assert_eq!(event.to_string(), "contains { name: db, found: false }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorEvent<'a> {
    /// A factory was registered under `name`.
    Set {
        name: &'a str,
        /// The type name the factory produces (e.g. "alloc::string::String")
        type_name: &'static str,
        /// Whether a previous factory for `name` was replaced
        replaced: bool,
    },

    /// An instance was requested.
    Get {
        name: &'a str,
        /// Whether a factory is registered under `name`
        found: bool,
        /// Whether the factory ran during this request
        constructed: bool,
    },

    /// A registration check was performed.
    Contains { name: &'a str, found: bool },

    /// The factory for `name` returned an error; nothing was cached.
    FactoryFailed { name: &'a str },
}

impl std::fmt::Display for LocatorEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocatorEvent::Set {
                name,
                type_name,
                replaced,
            } => write!(
                f,
                "set {{ name: {}, type_name: {}, replaced: {} }}",
                name, type_name, replaced
            ),
            LocatorEvent::Get {
                name,
                found,
                constructed,
            } => write!(
                f,
                "get {{ name: {}, found: {}, constructed: {} }}",
                name, found, constructed
            ),
            LocatorEvent::Contains { name, found } => {
                write!(f, "contains {{ name: {}, found: {} }}", name, found)
            }
            LocatorEvent::FactoryFailed { name } => {
                write!(f, "factory_failed {{ name: {} }}", name)
            }
        }
    }
}

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every event a locator emits. It must be thread-safe
/// because a locator may be shared across threads.
pub type TraceCallback = dyn Fn(&LocatorEvent<'_>) + Send + Sync + 'static;
