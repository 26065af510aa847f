//! Membership table rows.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Sentinel heartbeat value meaning "confirmed failed". A one-way latch:
/// once an entry carries this value, no merge ever changes it back.
pub const FAILED_HEARTBEAT: i64 = -1;

/// One row of a [`crate::table::MembershipTable`].
///
/// `timestamp` is always a local-clock value: the tick at which this node
/// last *accepted* an update for this entry. It is never taken from the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberListEntry {
    pub id: u32,
    pub port: u16,
    pub heartbeat: i64,
    pub timestamp: i32,
}

impl MemberListEntry {
    pub fn new(address: Address, heartbeat: i64, timestamp: i32) -> Self {
        MemberListEntry {
            id: address.id,
            port: address.port,
            heartbeat,
            timestamp,
        }
    }

    pub fn address(&self) -> Address {
        Address::new(self.id, self.port)
    }

    /// True once the sticky failed sentinel has latched.
    pub fn is_failed(&self) -> bool {
        self.heartbeat == FAILED_HEARTBEAT
    }
}
