//! Typed error kinds for the codec, bootstrap, and configuration boundaries.
//!
//! Decode failures are absorbed silently by the dispatcher (the transport is
//! unreliable; a malformed datagram is indistinguishable from corruption) but
//! are still typed here so tests can assert on them directly.

use thiserror::Error;

use crate::address::Address;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload length {len} is not a valid multiple of the 15-byte entry record")]
    Truncated { len: usize },
    #[error("unrecognized message type tag {0}")]
    UnknownType(u8),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    #[error("destination buffer too small: need {needed}, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("node {0} was already initialized")]
    AlreadyInitialized(Address),
    #[error("node {0} introduced itself before being initialized")]
    NotInitialized(Address),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("TFAIL ({tfail}) must be strictly less than TREMOVE ({tremove})")]
    FailNotBeforeRemove { tfail: i32, tremove: i32 },
    #[error("TPING must be a positive number of ticks, got {0}")]
    NonPositivePingPeriod(u32),
}
