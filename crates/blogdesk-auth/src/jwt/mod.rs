//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::TokenVerifier;
pub use encoder::{IssuedToken, TokenIssuer};
