//! Basic usage example for service-locator.
//!
//! Demonstrates:
//! - Registering factories with `set()` and `locator!`
//! - Lazy construction on the first `get()`, cached afterwards
//! - Invalidation when a name is set again
//! - Handling unknown names and failing factories
//!
//! Run with: `RUST_LOG=debug cargo run --example basic_usage`

use service_locator::{locator, LocatorApi, LocatorError};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct AppConfig {
    name: String,
    version: u32,
    debug_mode: bool,
}

#[derive(Debug)]
struct Database {
    url: String,
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    println!("=== service-locator: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Pre-seed a locator
    // -------------------------------------------------------------------------
    println!("1. Building a locator...");

    let app = locator! {
        "config" => || {
            println!("   (constructing AppConfig)");
            AppConfig {
                name: "MyApp".to_string(),
                version: 1,
                debug_mode: true,
            }
        },
    };

    app.set("db", || {
        println!("   (constructing Database)");
        Database {
            url: "postgres://localhost/app".to_string(),
        }
    });

    println!("   Registered: {:?}", app.names());
    println!("   Nothing constructed yet: {:?}", app);

    // -------------------------------------------------------------------------
    // 2. First lookup constructs, second one reuses
    // -------------------------------------------------------------------------
    println!("\n2. Resolving instances...");

    let cfg: Arc<AppConfig> = app.get("config").unwrap();
    let again: Arc<AppConfig> = app.get("config").unwrap();

    println!("   config:        {:?}", cfg);
    println!("   same instance: {}", Arc::ptr_eq(&cfg, &again));
    println!("   {} v{} (debug: {})", cfg.name, cfg.version, cfg.debug_mode);

    // -------------------------------------------------------------------------
    // 3. Setting a name again invalidates its cached instance
    // -------------------------------------------------------------------------
    println!("\n3. Replacing the database factory...");

    let old_db: Arc<Database> = app.get("db").unwrap();
    app.set("db", || Database {
        url: "postgres://replica/app".to_string(),
    });
    let new_db: Arc<Database> = app.get("db").unwrap();

    println!("   before: {}", old_db.url);
    println!("   after:  {}", new_db.url);

    // -------------------------------------------------------------------------
    // 4. Errors
    // -------------------------------------------------------------------------
    println!("\n4. Handling errors...");

    match app.get::<Database>("cache") {
        Ok(value) => println!("   Found cache: {:?}", value),
        Err(e) => println!("   Error (expected): {}", e),
    }

    app.try_set("port", || "80a".parse::<u16>());
    if let Err(LocatorError::Factory { name, source }) = app.get::<u16>("port") {
        println!("   Factory `{}` failed (expected): {}", name, source);
    }

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------
    println!("\n=== Example Complete ===");
    println!("Final state: {:?}", app);
}
