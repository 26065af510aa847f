//! The ordered membership list: slot 0 is always this node's own entry.

use crate::address::Address;
use crate::entry::MemberListEntry;

/// Ordered membership list. `entries[0]` is always this node's own entry;
/// `entries[1..]` are peers. No two entries ever share an (id, port).
#[derive(Debug, Clone)]
pub struct MembershipTable {
    entries: Vec<MemberListEntry>,
}

impl MembershipTable {
    /// Build a freshly-initialized table containing only `self_entry`.
    pub fn new(self_entry: MemberListEntry) -> Self {
        MembershipTable {
            entries: vec![self_entry],
        }
    }

    pub fn self_entry(&self) -> &MemberListEntry {
        &self.entries[0]
    }

    pub fn self_entry_mut(&mut self) -> &mut MemberListEntry {
        &mut self.entries[0]
    }

    pub fn peers(&self) -> &[MemberListEntry] {
        self.entries.get(1..).unwrap_or(&[])
    }

    pub fn peer_count(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// Full table (self entry included), in wire order, for serializing a PING.
    pub fn all_entries(&self) -> &[MemberListEntry] {
        &self.entries
    }

    pub fn find_peer(&self, address: Address) -> Option<&MemberListEntry> {
        self.peers().iter().find(|e| e.address() == address)
    }

    pub fn find_peer_mut(&mut self, address: Address) -> Option<&mut MemberListEntry> {
        self.entries
            .get_mut(1..)
            .unwrap_or(&mut [])
            .iter_mut()
            .find(|e| e.address() == address)
    }

    /// Mutable access to peer rows for the failure-detector's suspect pass,
    /// which flips stale entries to the failed sentinel in place rather than
    /// removing them (removal is [`Self::sweep_remove`]'s job).
    pub fn peers_mut_for_sweep(&mut self) -> impl Iterator<Item = &mut MemberListEntry> {
        self.entries.get_mut(1..).unwrap_or(&mut []).iter_mut()
    }

    /// Insert a brand-new peer row. Caller is responsible for upholding the
    /// uniqueness invariant (the merger never calls this for an address that
    /// [`Self::find_peer`] already found).
    pub fn insert_peer(&mut self, entry: MemberListEntry) {
        debug_assert!(
            self.find_peer(entry.address()).is_none(),
            "duplicate peer address inserted into membership table"
        );
        self.entries.push(entry);
    }

    /// Drop every entry, including the self entry. Used only by
    /// [`crate::Node::shutdown`], whose terminal state makes the table
    /// transiently invalid (no slot 0) until the node is re-initialized.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Run the failure sweep. `decide` is called once per peer entry (slot >= 1)
    /// and returns whether that entry should be evicted; entries are removed in
    /// a single reverse pass so indices stay valid as removals happen, matching
    /// the iterate-in-reverse pattern used to avoid iterator invalidation.
    ///
    /// Returns the addresses of entries that were removed, in sweep order.
    pub fn sweep_remove(&mut self, mut decide: impl FnMut(&MemberListEntry) -> bool) -> Vec<Address> {
        let mut removed = Vec::new();
        for idx in (1..self.entries.len()).rev() {
            if decide(&self.entries[idx]) {
                removed.push(self.entries.remove(idx).address());
            }
        }
        removed.reverse();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, heartbeat: i64, timestamp: i32) -> MemberListEntry {
        MemberListEntry::new(Address::new(id, 0), heartbeat, timestamp)
    }

    #[test]
    fn new_table_has_only_self_entry() {
        let table = MembershipTable::new(entry(1, 0, 0));
        assert_eq!(table.peer_count(), 0);
        assert_eq!(table.self_entry().address(), Address::new(1, 0));
    }

    #[test]
    fn insert_and_find_peer() {
        let mut table = MembershipTable::new(entry(1, 0, 0));
        table.insert_peer(entry(2, 5, 10));
        assert_eq!(table.find_peer(Address::new(2, 0)).unwrap().heartbeat, 5);
        assert!(table.find_peer(Address::new(3, 0)).is_none());
    }

    #[test]
    fn sweep_remove_tolerates_removals_mid_iteration() {
        let mut table = MembershipTable::new(entry(1, 0, 0));
        table.insert_peer(entry(2, 0, 0));
        table.insert_peer(entry(3, 0, 0));
        table.insert_peer(entry(4, 0, 0));

        let removed = table.sweep_remove(|e| e.id == 2 || e.id == 4);

        assert_eq!(removed, vec![Address::new(2, 0), Address::new(4, 0)]);
        assert_eq!(table.peer_count(), 1);
        assert_eq!(table.peers()[0].id, 3);
    }

    #[test]
    fn clear_empties_everything_including_self() {
        let mut table = MembershipTable::new(entry(1, 0, 0));
        table.insert_peer(entry(2, 0, 0));
        table.clear();
        assert_eq!(table.peer_count(), 0);
        assert_eq!(table.all_entries().len(), 0);
    }

    #[test]
    fn sweep_remove_never_touches_self_entry() {
        let mut table = MembershipTable::new(entry(1, 0, 0));
        table.insert_peer(entry(2, 0, 0));

        let removed = table.sweep_remove(|_| true);

        assert_eq!(removed, vec![Address::new(2, 0)]);
        assert_eq!(table.self_entry().address(), Address::new(1, 0));
        assert_eq!(table.peer_count(), 0);
    }
}
