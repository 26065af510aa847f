//! Integrates a single remote (address, heartbeat) observation into the
//! local membership table under the monotone-heartbeat and sticky-failed
//! rules (§4.4 of the spec).

use crate::codec::Observation;
use crate::entry::{MemberListEntry, FAILED_HEARTBEAT};
use crate::logger::Logger;
use crate::table::MembershipTable;

/// Merge `observed` into `table`, stamping any accepted change with `now`.
///
/// Never mutates the self entry. Idempotent: merging the same observation
/// twice in a row leaves the table in the same state as merging it once.
/// Commutative for distinct addresses: merging two unrelated observations
/// in either order yields the same table.
pub fn merge(
    table: &mut MembershipTable,
    self_address: crate::address::Address,
    observed: Observation,
    now: i32,
    logger: &dyn Logger,
) {
    if observed.address == self_address {
        return;
    }

    if let Some(local) = table.find_peer_mut(observed.address) {
        if observed.heartbeat == FAILED_HEARTBEAT {
            local.heartbeat = FAILED_HEARTBEAT;
            return;
        }
        if local.heartbeat == FAILED_HEARTBEAT {
            return;
        }
        if observed.heartbeat > local.heartbeat {
            local.heartbeat = observed.heartbeat;
            local.timestamp = now;
        }
        return;
    }

    if observed.heartbeat == FAILED_HEARTBEAT {
        return;
    }

    table.insert_peer(MemberListEntry::new(observed.address, observed.heartbeat, now));
    logger.log_node_added(self_address, observed.address);
}
