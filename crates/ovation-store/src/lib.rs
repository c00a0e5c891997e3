//! # ovation-store
//!
//! Event store layer implementing the `EventStore` port from
//! `ovation-core`.
//!
//! ## Overview
//!
//! Two adapters are provided:
//!
//! - [`PgEventStore`] - the durable backend: an append-only PostgreSQL
//!   table written through SQLx
//! - [`MemoryEventStore`] - an in-process log for tests and single-node
//!   deployments that can live without a database
//!
//! Both assign a strictly increasing `seq` cursor at append time and scan
//! a room's events in append order.

pub mod memory;
pub mod models;
pub mod pg;
pub mod pool;

// Re-export commonly used types
pub use memory::MemoryEventStore;
pub use pg::{run_migrations, PgEventStore};
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
