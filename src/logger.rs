//! Event-audit interface consumed by the core. The exact textual form is not
//! normative; the call points (§8 of the spec) are.

use std::cell::RefCell;

use crate::address::Address;

pub trait Logger {
    fn log_node_added(&self, self_addr: Address, peer_addr: Address);
    fn log_node_removed(&self, self_addr: Address, peer_addr: Address);
    fn log(&self, self_addr: Address, message: &str);
}

/// Default logger: forwards to the `log` crate at `info!`/`debug!` so a host
/// binary's `env_logger` (or any other `log` backend) picks these up for free.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log_node_added(&self, self_addr: Address, peer_addr: Address) {
        log::info!(target: "membership_core", "{self_addr}: node added: {peer_addr}");
    }

    fn log_node_removed(&self, self_addr: Address, peer_addr: Address) {
        log::info!(target: "membership_core", "{self_addr}: node removed: {peer_addr}");
    }

    fn log(&self, self_addr: Address, message: &str) {
        log::debug!(target: "membership_core", "{self_addr}: {message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    NodeAdded { peer: Address },
    NodeRemoved { peer: Address },
    Message(String),
}

/// Test double that records every event instead of emitting it, so scenario
/// tests can assert on exactly what the core observed.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    events: RefCell<Vec<LogEvent>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        RecordingLogger::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events.borrow().clone()
    }
}

impl Logger for RecordingLogger {
    fn log_node_added(&self, _self_addr: Address, peer_addr: Address) {
        self.events.borrow_mut().push(LogEvent::NodeAdded { peer: peer_addr });
    }

    fn log_node_removed(&self, _self_addr: Address, peer_addr: Address) {
        self.events
            .borrow_mut()
            .push(LogEvent::NodeRemoved { peer: peer_addr });
    }

    fn log(&self, _self_addr: Address, message: &str) {
        self.events
            .borrow_mut()
            .push(LogEvent::Message(message.to_owned()));
    }
}
