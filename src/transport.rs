//! Queued, unreliable message delivery consumed by the core.
//!
//! `tick()` never blocks or yields, so both operations here are synchronous
//! and non-blocking by contract: `send` is fire-and-forget, `recv_into` only
//! ever drains whatever has already arrived.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::address::Address;

/// Boxed, opaque transport failure. The core never inspects the cause; a
/// `recv_into` error may cause the driver to skip dispatch for this tick.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

pub trait Transport {
    /// Best-effort send: may silently drop. No acknowledgement.
    fn send(&mut self, from: Address, to: Address, bytes: Vec<u8>);

    /// Drain whatever is currently buffered for `self` into `queue`. Never blocks.
    fn recv_into(&mut self, queue: &mut VecDeque<Vec<u8>>) -> Result<(), TransportError>;
}

#[derive(Default)]
struct Network {
    mailboxes: HashMap<Address, VecDeque<Vec<u8>>>,
}

/// A reference in-memory transport: several [`InMemoryTransport`] handles
/// sharing one [`Network`] hub simulate a best-effort, queued datagram
/// network for deterministic tests. Not a production transport.
#[derive(Clone, Default)]
pub struct InMemoryNetwork {
    inner: Rc<RefCell<Network>>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        InMemoryNetwork::default()
    }

    /// Build a handle bound to `address`, used by exactly one [`crate::Node`].
    pub fn handle(&self, address: Address) -> InMemoryTransport {
        self.inner
            .borrow_mut()
            .mailboxes
            .entry(address)
            .or_default();
        InMemoryTransport {
            address,
            network: self.inner.clone(),
        }
    }

    /// Sever an address's mailbox entirely, modeling a crashed / isolated node
    /// that can no longer be reached (all further sends to it are dropped).
    pub fn isolate(&self, address: Address) {
        self.inner.borrow_mut().mailboxes.remove(&address);
    }
}

pub struct InMemoryTransport {
    address: Address,
    network: Rc<RefCell<Network>>,
}

impl Transport for InMemoryTransport {
    fn send(&mut self, _from: Address, to: Address, bytes: Vec<u8>) {
        if let Some(mailbox) = self.network.borrow_mut().mailboxes.get_mut(&to) {
            mailbox.push_back(bytes);
        }
        // Destination unknown or isolated: best-effort drop, no error.
    }

    fn recv_into(&mut self, queue: &mut VecDeque<Vec<u8>>) -> Result<(), TransportError> {
        let mut network = self.network.borrow_mut();
        if let Some(mailbox) = network.mailboxes.get_mut(&self.address) {
            queue.extend(mailbox.drain(..));
        }
        Ok(())
    }
}
