//! Database layer for the Parley demo agents.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode
//! initialization, and embedded SQL migrations. The fraud-case tables and
//! their demo seed data are created through versioned migrations managed
//! by this crate.
//!
//! # Design decisions
//!
//! - **SQLite**: the demo runs as a single process against a single file
//!   database; no external database server is involved.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the server and cannot drift
//!   from the code that depends on it. Demo cases are seeded the same way.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
