//! Route handlers organized by domain.

pub mod access;
pub mod auth;
pub mod health;
pub mod user;
