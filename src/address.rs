//! Six-byte wire endpoint: a little-endian u32 id and a little-endian u16 port.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size in bytes of an [`Address`] on the wire.
pub const ADDRESS_LEN: usize = 6;

/// A cluster endpoint, byte-wise equal to its wire encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub id: u32,
    pub port: u16,
}

impl Address {
    /// The well-known address joiners send their JOINREQ to.
    pub const INTRODUCER: Address = Address { id: 1, port: 0 };

    pub fn new(id: u32, port: u16) -> Self {
        Address { id, port }
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        let mut buf = [0u8; ADDRESS_LEN];
        buf[0..4].copy_from_slice(&self.id.to_le_bytes());
        buf[4..6].copy_from_slice(&self.port.to_le_bytes());
        buf
    }

    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        let id = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        let port = u16::from_le_bytes(bytes[4..6].try_into().unwrap());
        Address { id, port }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.port)
    }
}
