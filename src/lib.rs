//! # Service Locator
//!
//! A thread-safe, name-keyed registry of factories. Each factory runs lazily on
//! the first lookup of its name, and the result is cached: every later lookup
//! returns the same `Arc` until the name is registered again.
//!
//! Locators are plain values. Create one, hand it (or an `Arc` of it) to the
//! components that need lookups, and drop it with its owner.
//!
//! ## Quick Start
//!
//! ```rust
//! use service_locator::{Locator, LocatorApi};
//! use std::sync::Arc;
//!
//! struct Mailer;
//!
//! let locator = Locator::new();
//! locator.set("mailer", || Mailer);
//!
//! let first: Arc<Mailer> = locator.get("mailer").unwrap();
//! let second: Arc<Mailer> = locator.get("mailer").unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//!
//! assert!(locator.get_any("absent").unwrap_err().is_not_found());
//! ```
//!
//! ## Features
//!
//! - **Lazy**: registering a factory never runs it
//! - **Identity-preserving**: one instance per registration, shared as `Arc<T>`
//! - **Invalidation**: setting a name again drops its cached instance
//! - **Heterogeneous**: each name may produce a different type
//! - **Thread-safe**: concurrent first lookups of a name run its factory once
//! - **Tracing support**: per-locator event callback plus `tracing` logs
//!
//! ## Main Operations
//!
//! - [`LocatorApi::set`] - Register a factory under a name
//! - [`LocatorApi::try_set`] - Register a factory that may fail
//! - [`LocatorApi::get`] - Resolve a name to `Arc<T>`
//! - [`LocatorApi::get_cloned`] - Resolve a name to an owned clone
//! - [`LocatorApi::contains`] - Check if a name is registered
//! - [`LocatorApi::set_trace_callback`] - Observe locator operations
//! - [`locator!`] - Build a pre-seeded locator

mod factory;
mod locator;
mod locator_error;
mod locator_event;
mod locator_trait;
mod macros;

pub use factory::{Factory, FactoryError, Instance};
pub use locator::Locator;
pub use locator_error::LocatorError;
pub use locator_event::{LocatorEvent, TraceCallback};
pub use locator_trait::{LocatorApi, Slot, Storage, TraceHook};
