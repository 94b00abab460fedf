//! # Core Codec Components
//!
//! Stateless encoders shared by the identity layer.
//!
//! ## Components
//! - **Field Codec**: fixed-width big-endian field packing driven by a schema
//! - **Hex**: lowercase hex text wrapping with strict decoding
//! - **Base-N**: radix 2-62 integer text encoding
//!
//! All functions here are pure, allocation-light and safe to call from any
//! number of threads. None of them log; failures come back as
//! [`IdentityError`](crate::error::IdentityError) values.

pub mod base_n;
pub mod field_codec;
pub mod hex;
