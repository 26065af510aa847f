//! Per-node state machine: bootstrap, dispatch, merge, and the heartbeat/
//! failure loop, tied together behind the small public surface a driver
//! actually calls (`start`/`tick`/`shutdown`/`is_failed`).

use std::collections::VecDeque;

use crate::address::Address;
use crate::clock::Clock;
use crate::codec::{Message, Observation};
use crate::entry::MemberListEntry;
use crate::error::BootstrapError;
use crate::logger::Logger;
use crate::merge::merge;
use crate::params::Params;
use crate::table::MembershipTable;
use crate::transport::Transport;

/// A single membership-protocol participant.
///
/// Generic over its three external collaborators so tests can plug in the
/// in-memory reference doubles (or a harness can plug in real ones) without
/// the core ever depending on a concrete transport, clock, or logger.
pub struct Node<T: Transport, C: Clock, L: Logger> {
    address: Address,
    params: Params,
    table: MembershipTable,
    heartbeat: i64,
    ping_counter: u32,
    inited: bool,
    in_group: bool,
    failed: bool,
    inbound: VecDeque<Vec<u8>>,
    transport: T,
    clock: C,
    logger: L,
}

impl<T: Transport, C: Clock, L: Logger> Node<T, C, L> {
    /// Construct an inert node. Call [`Self::initialize`] and
    /// [`Self::introduce`] (or just [`Self::start`]) before ticking it.
    pub fn new(address: Address, params: Params, transport: T, clock: C, logger: L) -> Self {
        Node {
            address,
            params,
            table: MembershipTable::new(MemberListEntry::new(address, 0, 0)),
            heartbeat: 0,
            ping_counter: params.tping,
            inited: false,
            in_group: false,
            failed: false,
            inbound: VecDeque::new(),
            transport,
            clock,
            logger,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn is_in_group(&self) -> bool {
        self.in_group
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn table(&self) -> &MembershipTable {
        &self.table
    }

    /// Seed the table with this node's own entry and clear bootstrap flags.
    pub fn initialize(&mut self) -> Result<(), BootstrapError> {
        if self.inited {
            return Err(BootstrapError::AlreadyInitialized(self.address));
        }
        let now = self.clock.now();
        self.heartbeat = 0;
        self.table = MembershipTable::new(MemberListEntry::new(self.address, 0, now));
        self.ping_counter = self.params.tping;
        self.inited = true;
        self.in_group = false;
        self.failed = false;
        Ok(())
    }

    /// Either declare ourselves the introducer, or send one best-effort
    /// JOINREQ and wait for a JOINREP to arrive on a later tick.
    pub fn introduce(&mut self, join_addr: Address) -> Result<(), BootstrapError> {
        if !self.inited {
            return Err(BootstrapError::NotInitialized(self.address));
        }

        if self.address == join_addr {
            self.in_group = true;
            self.logger.log(self.address, "group started");
            return Ok(());
        }

        let request = Message::JoinReq(Observation::new(self.address, self.heartbeat));
        self.transport
            .send(self.address, join_addr, request.encode());
        Ok(())
    }

    /// Convenience wrapper over `initialize` + `introduce`: a bootstrap
    /// failure here is fatal, matching the original's `nodeStart`, which
    /// exits the process rather than leaving a half-initialized node running.
    pub fn start(&mut self, join_addr: Address) {
        self.initialize()
            .expect("node bootstrap: initialize failed");
        self.introduce(join_addr)
            .expect("node bootstrap: introduce failed");
    }

    /// Wind the node down: drop the table (including the self entry) and
    /// mark it permanently failed. All further ticks are ignored.
    pub fn shutdown(&mut self) {
        self.inited = false;
        self.in_group = false;
        self.heartbeat = 0;
        self.table.clear();
        self.failed = true;
    }

    /// Advance one simulation step. No-op once the node has been shut down.
    pub fn tick(&mut self) {
        if self.failed {
            return;
        }

        self.dispatch_inbound();

        if !self.in_group {
            return;
        }

        self.heartbeat_or_decrement();
        self.failure_sweep();
    }

    fn dispatch_inbound(&mut self) {
        if let Err(err) = self.transport.recv_into(&mut self.inbound) {
            self.logger
                .log(self.address, &format!("transport recv failed: {err}"));
            return;
        }

        while let Some(bytes) = self.inbound.pop_front() {
            match Message::decode(&bytes) {
                Ok(Message::JoinReq(obs)) => self.handle_join_request(obs),
                Ok(Message::JoinRep(obs)) => self.handle_join_reply(obs),
                Ok(Message::Ping(observations)) => self.handle_ping(observations),
                Err(_err) => {
                    // Malformed/unreadable datagram: indistinguishable from
                    // corruption on an unreliable transport. Drop silently.
                }
            }
        }
    }

    fn handle_join_request(&mut self, requester: Observation) {
        let now = self.clock.now();
        merge(&mut self.table, self.address, requester, now, &self.logger);

        let reply = Message::JoinRep(Observation::new(self.address, self.heartbeat));
        self.transport
            .send(self.address, requester.address, reply.encode());
    }

    fn handle_join_reply(&mut self, introducer: Observation) {
        self.in_group = true;
        let now = self.clock.now();
        merge(
            &mut self.table,
            self.address,
            introducer,
            now,
            &self.logger,
        );
    }

    fn handle_ping(&mut self, observations: Vec<Observation>) {
        let now = self.clock.now();
        for obs in observations {
            merge(&mut self.table, self.address, obs, now, &self.logger);
        }
    }

    fn heartbeat_or_decrement(&mut self) {
        if self.ping_counter == 0 {
            self.heartbeat += 1;
            let now = self.clock.now();
            let self_entry = self.table.self_entry_mut();
            self_entry.heartbeat = self.heartbeat;
            self_entry.timestamp = now;

            let observations: Vec<Observation> = self
                .table
                .all_entries()
                .iter()
                .map(|e| Observation::new(e.address(), e.heartbeat))
                .collect();
            let ping = Message::Ping(observations).encode();

            // Dissemination reaches every peer, suspected or not: suppressing
            // sends to already-suspected entries would only slow detection
            // of their eventual recovery or removal, and the original never does it.
            for peer in self.table.peers().to_vec() {
                self.transport
                    .send(self.address, peer.address(), ping.clone());
            }

            self.ping_counter = self.params.tping;
        } else {
            self.ping_counter -= 1;
        }
    }

    fn failure_sweep(&mut self) {
        let now = self.clock.now();
        let tfail = self.params.tfail;
        let tremove = self.params.tremove;

        let removed = self.table.sweep_remove(|entry| {
            let age = now - entry.timestamp;
            age > tremove
        });
        for peer in removed {
            self.logger.log_node_removed(self.address, peer);
        }

        for peer in self.table.peers_mut_for_sweep() {
            let age = now - peer.timestamp;
            if age > tfail && peer.heartbeat != crate::entry::FAILED_HEARTBEAT {
                peer.heartbeat = crate::entry::FAILED_HEARTBEAT;
            }
        }
    }
}
