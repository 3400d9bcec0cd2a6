//! Receive-side frame handling: classify each incoming frame, route Fast
//! Packet fragments through the assembler, decode completed payloads, and
//! report everything else as an `Unknown` variant instead of an error.
use std::sync::Arc;

use log::trace;
use serde_json::Value;

use crate::core::Envelope;
use crate::infra::codec::engine::MessageParser;
use crate::infra::registry::Registry;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::fast_packet::assembler::{AssemblyKey, FastPacketAssembler};

/// Why a frame could not be turned into a known message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownReason {
    /// J1939/N2K traffic always uses 29-bit identifiers.
    NotExtendedFrame,
    /// The identifier carries bits above the 29-bit space.
    InvalidIdentifier,
    /// DLC or payload length is unusable.
    InvalidFrame,
    /// The dialect does not define this PGN.
    UnsupportedPgn,
    /// The payload did not decode against its definition.
    DecodeFailed,
}

/// A frame (or reassembled message) decoded against the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct KnownMessage {
    pub can_id: CanId,
    pub raw_can_id: u32,
    /// Complete payload: the single frame's data or the reassembled bytes.
    pub payload: Vec<u8>,
    pub envelope: Envelope,
}

/// A frame the handler saw but could not decode; reported inline, never
/// thrown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub raw_can_id: u32,
    pub reason: UnknownReason,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedMessage {
    Known(KnownMessage),
    Unknown(UnknownMessage),
}

/// Per-receive-stream frame handler. Owns the Fast Packet assembler, so one
/// handler serves exactly one CAN bus; the registry behind it is shared.
#[derive(Debug)]
pub struct FrameHandler {
    parser: MessageParser,
    assembler: FastPacketAssembler,
}

impl FrameHandler {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            parser: MessageParser::new(registry),
            assembler: FastPacketAssembler::new(),
        }
    }

    /// Handle one received frame.
    ///
    /// Returns `None` for empty frames and for Fast Packet fragments that
    /// are still accumulating; everything else comes back as a
    /// [`ReceivedMessage`].
    pub fn handle_frame(
        &mut self,
        raw_can_id: u32,
        extended_frame: bool,
        dlc: usize,
        data: &[u8],
    ) -> Option<ReceivedMessage> {
        if dlc == 0 {
            return None;
        }
        if dlc > 8 {
            return Some(unknown(raw_can_id, UnknownReason::InvalidFrame, "DLC > 8"));
        }
        if data.len() < dlc {
            return Some(unknown(
                raw_can_id,
                UnknownReason::InvalidFrame,
                "data shorter than DLC",
            ));
        }
        if !extended_frame {
            return Some(unknown_bare(raw_can_id, UnknownReason::NotExtendedFrame));
        }
        if raw_can_id & 0xE000_0000 != 0 {
            return Some(unknown_bare(raw_can_id, UnknownReason::InvalidIdentifier));
        }

        let can_id = CanId::parse(raw_can_id);
        let data = &data[..dlc];

        let key = AssemblyKey {
            pgn: can_id.pgn(),
            source: can_id.source_address(),
            destination: can_id.destination_address(),
            sequence_id: (data[0] >> 5) & 0x07,
        };
        let frame_index = data[0] & 0x1F;

        // Continuations for a session we are tracking always go to the
        // assembler; start-looking frames go there unless the PGN is known
        // to fit a single frame.
        let route_to_assembler = if frame_index > 0 {
            self.assembler.in_progress(&key)
        } else {
            self.looks_like_fast_packet_start(key.pgn, data)
        };

        let payload: Vec<u8> = if route_to_assembler {
            trace!("Fast Packet fragment {} for pgn {}", frame_index, key.pgn);
            match self.assembler.process_frame(key, data) {
                // Still accumulating.
                None => return None,
                Some(payload) => payload,
            }
        } else {
            data.to_vec()
        };

        Some(self.decode(can_id, raw_can_id, payload))
    }

    /// Fast-packet-start heuristic: frame index 0 with a length byte that a
    /// single frame could not carry. The length byte is payload data for
    /// single-frame PGNs, so a PGN declared FIXED at eight bytes or fewer
    /// is always treated as single-frame; for the rest, second-byte values
    /// of 7 or 8 keep their documented ambiguity.
    fn looks_like_fast_packet_start(&self, pgn: u32, data: &[u8]) -> bool {
        if data.len() < 2 || data[1] <= 8 {
            return false;
        }
        match self.parser.registry().get(pgn) {
            Some(message) => message.fixed_length_bytes.map_or(true, |len| len > 8),
            None => true,
        }
    }

    fn decode(&self, can_id: CanId, raw_can_id: u32, payload: Vec<u8>) -> ReceivedMessage {
        match self.parser.decode_to_json(can_id.pgn(), &payload) {
            Ok(Some(envelope)) => ReceivedMessage::Known(KnownMessage {
                can_id,
                raw_can_id,
                payload,
                envelope,
            }),
            Ok(None) => unknown_message(raw_can_id, UnknownReason::UnsupportedPgn, None),
            Err(err) => {
                unknown_message(raw_can_id, UnknownReason::DecodeFailed, Some(err.to_string()))
            }
        }
    }

    /// Diagnostic view of the assembler's lost-start counter.
    pub fn lost_fast_packet_starts(&self) -> u64 {
        self.assembler.lost_starts()
    }
}

fn unknown(raw_can_id: u32, reason: UnknownReason, detail: &str) -> ReceivedMessage {
    unknown_message(raw_can_id, reason, Some(detail.to_owned()))
}

fn unknown_bare(raw_can_id: u32, reason: UnknownReason) -> ReceivedMessage {
    unknown_message(raw_can_id, reason, None)
}

fn unknown_message(
    raw_can_id: u32,
    reason: UnknownReason,
    detail: Option<String>,
) -> ReceivedMessage {
    ReceivedMessage::Unknown(UnknownMessage {
        raw_can_id,
        reason,
        detail,
    })
}

impl KnownMessage {
    /// The `{pgn, decoded}` JSON value of the envelope.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(&self.envelope).unwrap_or(Value::Null)
    }
}
