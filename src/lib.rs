//! # Connection Identity
//!
//! Stateless, compact identifiers for network connections.
//!
//! A connection is named by the server endpoint that accepted it, the client
//! endpoint that opened it, and a 32-bit id issued by the server. The three
//! are packed into a 16-byte big-endian record and rendered as a 32-character
//! lowercase hex token that any process can decode without shared state.
//!
//! ## Quick Start
//! ```rust
//! use connection_identity::{Address, ConnectionIdentity, IdAllocator};
//!
//! let allocator = IdAllocator::new();
//! let server = Address::parse("127.0.0.1", 80)?;
//! let client = Address::parse("127.0.0.2", 443)?;
//!
//! let conn = ConnectionIdentity::accept(server, client, &allocator);
//! let token = conn.pack();
//! assert_eq!(token.len(), 32);
//!
//! let decoded = ConnectionIdentity::unpack(&token)?;
//! assert_eq!(decoded, conn);
//!
//! conn.release(&allocator);
//! # Ok::<(), connection_identity::IdentityError>(())
//! ```
//!
//! ## Modules
//! - [`core`]: field codec, hex and base-N encoders
//! - [`identity`]: addresses, id allocator, connection tokens
//! - [`config`]: TOML / environment configuration
//! - [`utils`]: logging setup and allocator metrics
//! - [`error`]: error type and result alias

pub mod config;
pub mod core;
pub mod error;
pub mod identity;
pub mod utils;

pub use config::IdentityConfig;
pub use error::{IdentityError, Result};
pub use identity::{Address, ConnectionIdentity, IdAllocator, ID_FLOOR};
