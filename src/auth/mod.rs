//! Resolves the calling user from a Bearer token. Tokens are minted elsewhere.

pub mod claims;
pub(crate) mod extractors;

pub use extractors::AuthUser;
