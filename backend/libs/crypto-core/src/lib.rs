//! Shared cryptographic primitives for marketplace services.
//!
//! - `jwt`: HS256 bearer token encoding and decoding over an explicit key set
pub mod jwt;
