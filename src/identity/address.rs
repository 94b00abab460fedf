//! # Endpoint Addresses
//!
//! [`Address`] is an IPv4 address and port stored as raw `(u32, u16)` so it can
//! be packed directly into a connection token.
//!
//! Whether an address is the server or the client side of a connection is
//! decided only by where it sits inside a
//! [`ConnectionIdentity`](crate::identity::connection::ConnectionIdentity).
//!
//! ## Outbound Address Resolution
//! A server bound to `0.0.0.0` has no useful address to advertise. The
//! [`LocalAddressResolver`] trait is the seam through which the embedding
//! service supplies the host's outbound address; this crate never queries the
//! network itself.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddrV4};

use serde::{Deserialize, Serialize};

use crate::error::{constants, IdentityError, Result};

/// Convert a dotted-quad string into its 32-bit value, first octet most significant
pub fn ip_to_u32(ip: &str) -> Result<u32> {
    let invalid = |reason| IdentityError::InvalidAddress {
        input: ip.to_string(),
        reason,
    };

    let mut octets = [0u8; 4];
    let mut parts = ip.split('.');
    for slot in octets.iter_mut() {
        let part = parts.next().ok_or_else(|| invalid(constants::ERR_OCTET_COUNT))?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid(constants::ERR_OCTET_VALUE));
        }
        *slot = part
            .parse::<u8>()
            .map_err(|_| invalid(constants::ERR_OCTET_VALUE))?;
    }
    if parts.next().is_some() {
        return Err(invalid(constants::ERR_OCTET_COUNT));
    }

    Ok(u32::from_be_bytes(octets))
}

/// Render a 32-bit value as a dotted-quad string
pub fn u32_to_ip(ip: u32) -> String {
    Ipv4Addr::from(ip).to_string()
}

/// IPv4 endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Address {
    ip: u32,
    port: u16,
}

impl Address {
    pub const fn new(ip: u32, port: u16) -> Self {
        Self { ip, port }
    }

    /// Build an address from a dotted-quad string and a port
    pub fn parse(ip: &str, port: u16) -> Result<Self> {
        Ok(Self::new(ip_to_u32(ip)?, port))
    }

    /// Build the local server endpoint.
    ///
    /// An empty or `0.0.0.0` bind address is replaced by the resolver's
    /// outbound address.
    pub fn server(ip: &str, port: u16, resolver: &dyn LocalAddressResolver) -> Result<Self> {
        let ip = ip.trim();
        if ip.is_empty() || ip == "0.0.0.0" {
            let outbound = resolver.outbound_ip()?;
            return Self::parse(&outbound, port);
        }
        Self::parse(ip, port)
    }

    /// Raw 32-bit address
    pub const fn ip(&self) -> u32 {
        self.ip
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Dotted-quad form of the address
    pub fn ip_string(&self) -> String {
        u32_to_ip(self.ip)
    }

    pub fn ipv4(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ip)
    }
}

/// Formats as `ip:port`
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ipv4(), self.port)
    }
}

impl From<SocketAddrV4> for Address {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(u32::from(*addr.ip()), addr.port())
    }
}

impl From<Address> for SocketAddrV4 {
    fn from(addr: Address) -> Self {
        SocketAddrV4::new(addr.ipv4(), addr.port)
    }
}

/// Supplies the host's outbound IPv4 address
pub trait LocalAddressResolver {
    /// Dotted-quad address other hosts can reach this one on
    fn outbound_ip(&self) -> Result<String>;
}

/// Resolver that always answers with a fixed address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticResolver {
    ip: Option<String>,
}

impl StaticResolver {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
        }
    }

    /// Resolver with no address; every lookup fails
    pub fn unavailable() -> Self {
        Self { ip: None }
    }
}

impl LocalAddressResolver for StaticResolver {
    fn outbound_ip(&self) -> Result<String> {
        self.ip
            .clone()
            .ok_or_else(|| IdentityError::ResolverError(constants::ERR_NO_OUTBOUND_IP.to_string()))
    }
}
