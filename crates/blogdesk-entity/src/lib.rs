//! # blogdesk-entity
//!
//! Domain entity models for BlogDesk. Database-backed entities derive
//! `sqlx::FromRow`; everything that leaves the process derives `Serialize`.

pub mod user;
