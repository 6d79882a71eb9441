//! Macros for building pre-seeded locators.

/// Builds a [`Locator`](crate::Locator) from `name => factory` pairs.
///
/// Each factory is any zero-argument closure or function; none of them is
/// invoked until its name is first resolved. With no pairs the macro yields an
/// empty locator.
///
/// # Examples
///
/// ```rust
/// use service_locator::{locator, LocatorApi};
/// use std::sync::Arc;
///
/// struct Database {
///     url: String,
/// }
///
/// let app = locator! {
///     "db" => || Database { url: "postgres://localhost".to_string() },
///     "retries" => || 3u32,
/// };
///
/// let db: Arc<Database> = app.get("db").unwrap();
/// assert_eq!(db.url, "postgres://localhost");
/// assert_eq!(*app.get::<u32>("retries").unwrap(), 3);
/// ```
///
/// Names may be any expression convertible into a `String`:
///
/// ```rust
/// use service_locator::{locator, LocatorApi};
///
/// let prefix = "cache";
/// let app = locator! {
///     format!("{}.ttl", prefix) => || 60u64,
/// };
///
/// assert!(app.contains("cache.ttl"));
/// ```
#[macro_export]
macro_rules! locator {
    () => {
        $crate::Locator::new()
    };
    ($($name:expr => $factory:expr),+ $(,)?) => {
        $crate::Locator::with_factories([
            $((
                ::std::string::String::from($name),
                $crate::Factory::new($factory),
            )),+
        ])
    };
}
