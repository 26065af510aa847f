//! Per-node SWIM-style membership core: heartbeat dissemination, monotone
//! merge, and two-phase (suspected/removed) failure detection, driven by an
//! externally-ticked, non-blocking state machine.
//!
//! The `Transport`/`Clock`/`Logger` traits are the only seams to the outside
//! world; this crate ships one in-memory reference implementation of each
//! for tests, not a production transport, clock, or logger.

pub mod address;
pub mod clock;
pub mod codec;
pub mod entry;
pub mod error;
pub mod logger;
pub mod merge;
pub mod node;
pub mod params;
pub mod table;
pub mod transport;

pub use address::Address;
pub use clock::{Clock, SimClock};
pub use codec::{Message, Observation};
pub use entry::MemberListEntry;
pub use logger::{DefaultLogger, LogEvent, Logger, RecordingLogger};
pub use node::Node;
pub use params::Params;
pub use table::MembershipTable;
pub use transport::{InMemoryNetwork, InMemoryTransport, Transport, TransportError};
