//! Axum middleware stack.

pub mod cors;
pub mod guard;
pub mod logging;

pub use guard::protect;
