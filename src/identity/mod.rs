//! # Connection Identity
//!
//! Endpoint addresses, connection id allocation and the token that ties
//! them together.
//!
//! ## Data Flow
//! ```text
//! IdAllocator::allocate ──► ConnectionIdentity::new(server, client, id)
//!                                     │
//!                                   pack()  ──► 32-char hex token ──► other process
//!                                                                          │
//!                                         ConnectionIdentity::unpack ◄─────┘
//! ```
//! Unpacking never touches the allocator.

pub mod address;
pub mod allocator;
pub mod connection;

pub use address::{ip_to_u32, u32_to_ip, Address, LocalAddressResolver, StaticResolver};
pub use allocator::{IdAllocator, ID_FLOOR};
pub use connection::{ConnectionIdentity, CONNECTION_SCHEMA, RECORD_LEN, TOKEN_LEN};
