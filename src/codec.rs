//! Bit-exact binary wire format for JOINREQ, JOINREP and PING messages.
//!
//! Every message is `Header ‖ Payload`. The header is a single tag byte.
//! The payload is zero or more 15-byte entry records: 6 bytes of [`Address`],
//! one padding byte (preserved byte-identically, never interpreted), then an
//! 8-byte little-endian signed heartbeat. The interior padding byte is load
//! bearing for wire compatibility and must never be dropped.

use crate::address::{Address, ADDRESS_LEN};
use crate::error::DecodeError;

/// Size in bytes of one entry record on the wire: 6 (address) + 1 (padding) + 8 (heartbeat).
pub const ENTRY_LEN: usize = ADDRESS_LEN + 1 + 8;

const JOINREQ_TAG: u8 = 0;
const JOINREP_TAG: u8 = 1;
const PING_TAG: u8 = 2;

/// One (address, heartbeat) observation as carried on the wire. Unlike
/// [`crate::entry::MemberListEntry`] this has no `timestamp` field: the wire
/// format never carries a remote timestamp, only the locally-observed value
/// that `merge` later stamps on acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    pub address: Address,
    pub heartbeat: i64,
}

impl Observation {
    pub fn new(address: Address, heartbeat: i64) -> Self {
        Observation { address, heartbeat }
    }

    fn encode_into(self, out: &mut [u8; ENTRY_LEN]) {
        out[0..ADDRESS_LEN].copy_from_slice(&self.address.to_bytes());
        out[ADDRESS_LEN] = 0; // padding byte, zeroed on write
        out[ADDRESS_LEN + 1..ENTRY_LEN].copy_from_slice(&self.heartbeat.to_le_bytes());
    }

    fn decode_from(bytes: &[u8; ENTRY_LEN]) -> Self {
        let mut addr_bytes = [0u8; ADDRESS_LEN];
        addr_bytes.copy_from_slice(&bytes[0..ADDRESS_LEN]);
        // bytes[ADDRESS_LEN] is the padding byte; ignored on read.
        let mut hb_bytes = [0u8; 8];
        hb_bytes.copy_from_slice(&bytes[ADDRESS_LEN + 1..ENTRY_LEN]);
        Observation {
            address: Address::from_bytes(addr_bytes),
            heartbeat: i64::from_le_bytes(hb_bytes),
        }
    }
}

/// A decoded (or to-be-encoded) membership protocol message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    JoinReq(Observation),
    JoinRep(Observation),
    Ping(Vec<Observation>),
}

impl Message {
    fn tag(&self) -> u8 {
        match self {
            Message::JoinReq(_) => JOINREQ_TAG,
            Message::JoinRep(_) => JOINREP_TAG,
            Message::Ping(_) => PING_TAG,
        }
    }

    /// Encode into a freshly allocated buffer. Cannot fail: this path always
    /// sizes its own buffer, so [`crate::error::EncodeError::BufferTooSmall`]
    /// never arises here.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + self.payload_len());
        buf.push(self.tag());
        match self {
            Message::JoinReq(obs) | Message::JoinRep(obs) => {
                let mut record = [0u8; ENTRY_LEN];
                obs.encode_into(&mut record);
                buf.extend_from_slice(&record);
            }
            Message::Ping(observations) => {
                for obs in observations {
                    let mut record = [0u8; ENTRY_LEN];
                    obs.encode_into(&mut record);
                    buf.extend_from_slice(&record);
                }
            }
        }
        buf
    }

    fn payload_len(&self) -> usize {
        match self {
            Message::JoinReq(_) | Message::JoinRep(_) => ENTRY_LEN,
            Message::Ping(observations) => observations.len() * ENTRY_LEN,
        }
    }

    /// Decode a full `Header ‖ Payload` datagram.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let (&tag, payload) = bytes
            .split_first()
            .ok_or(DecodeError::Truncated { len: 0 })?;

        match tag {
            JOINREQ_TAG => Ok(Message::JoinReq(decode_single_entry(payload)?)),
            JOINREP_TAG => Ok(Message::JoinRep(decode_single_entry(payload)?)),
            PING_TAG => Ok(Message::Ping(decode_entries(payload)?)),
            other => Err(DecodeError::UnknownType(other)),
        }
    }
}

fn decode_single_entry(payload: &[u8]) -> Result<Observation, DecodeError> {
    if payload.len() != ENTRY_LEN {
        return Err(DecodeError::Truncated { len: payload.len() });
    }
    let mut record = [0u8; ENTRY_LEN];
    record.copy_from_slice(payload);
    Ok(Observation::decode_from(&record))
}

fn decode_entries(payload: &[u8]) -> Result<Vec<Observation>, DecodeError> {
    if payload.len() % ENTRY_LEN != 0 {
        return Err(DecodeError::Truncated { len: payload.len() });
    }
    Ok(payload
        .chunks_exact(ENTRY_LEN)
        .map(|chunk| {
            let mut record = [0u8; ENTRY_LEN];
            record.copy_from_slice(chunk);
            Observation::decode_from(&record)
        })
        .collect())
}
