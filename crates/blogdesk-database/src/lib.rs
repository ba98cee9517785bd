//! # blogdesk-database
//!
//! PostgreSQL connection management, migrations, and the credential store
//! that owns durable principal records.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{CredentialStore, MemoryCredentialStore, PgCredentialStore, open_store};
