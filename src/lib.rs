//! Generic SQLite data access.
//!
//! # Intention
//!
//! - Provide table-agnostic CRUD (`create`, `read`, `update`, `delete`,
//!   `count`) over a single connection, plus raw `execute`/`fetch`.
//! - Return rows as ordered column→[`Value`] mappings that a text renderer can
//!   consume directly.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here.
//! - No schema management, migrations, transactions or pooling.
//! - Values are always parameter-bound. Table and column names are interpolated
//!   into SQL text after an identifier allow-list check.

pub mod config;
pub mod error;
pub mod sql;
pub mod sqlite;
pub mod value;

pub use config::{Config, DbConfig};
pub use error::{DatabaseError, Result};
pub use sqlite::Database;
pub use value::{Record, Row, Value};
