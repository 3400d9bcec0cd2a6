//! Envelope-to-frames packing: serializes a `{pgn, decoded}` envelope
//! against the registry, builds the 29-bit identifier, and emits the frame
//! sequence (single frame or Fast Packet) in transmit order.
use std::sync::Arc;

use serde_json::Value;

use crate::core::Envelope;
use crate::error::PackError;
use crate::infra::codec::engine::MessageParser;
use crate::infra::registry::Registry;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::{CanId, BROADCAST};
use crate::protocol::transport::fast_packet::builder::FastPacketBuilder;
use crate::protocol::transport::fast_packet::sequence::SequenceProvider;

/// Stateless apart from its sequence counters; shareable across sender
/// threads.
#[derive(Debug)]
pub struct FramePacker {
    parser: MessageParser,
    sequences: SequenceProvider,
}

impl FramePacker {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            parser: MessageParser::new(registry),
            sequences: SequenceProvider::new(),
        }
    }

    /// Pack a JSON envelope into transmit-ready frames.
    ///
    /// Payloads up to eight bytes yield one frame whose DLC matches the
    /// payload. Larger payloads allocate a sequence id for the
    /// `(pgn, source, destination)` flow and fragment into Fast Packet
    /// frames in strict ascending index order.
    pub fn pack(
        &self,
        pgn: u32,
        priority: u8,
        source: u8,
        destination: Option<u8>,
        envelope: &Value,
    ) -> Result<Vec<CanFrame>, PackError> {
        let payload = self.parser.encode_from_json(pgn, envelope)?;
        self.frames_for(pgn, priority, source, destination, &payload)
    }

    /// Same as [`pack`](Self::pack) for a typed envelope.
    pub fn pack_envelope(
        &self,
        priority: u8,
        source: u8,
        destination: Option<u8>,
        envelope: &Envelope,
    ) -> Result<Vec<CanFrame>, PackError> {
        let payload = self.parser.encode_envelope(envelope)?;
        self.frames_for(envelope.pgn, priority, source, destination, &payload)
    }

    fn frames_for(
        &self,
        pgn: u32,
        priority: u8,
        source: u8,
        destination: Option<u8>,
        payload: &[u8],
    ) -> Result<Vec<CanFrame>, PackError> {
        let mut builder = CanId::builder(pgn, source).with_priority(priority);
        if let Some(destination) = destination {
            builder = builder.to_destination(destination);
        }
        let id = builder.build()?;

        // Single-frame sends never consume a sequence id.
        let sequence_id = if payload.len() > 8 {
            self.sequences
                .next_sequence_id(pgn, source, destination.unwrap_or(BROADCAST))
        } else {
            0
        };

        Ok(FastPacketBuilder::new(id, sequence_id, payload)?
            .build()
            .collect())
    }
}
