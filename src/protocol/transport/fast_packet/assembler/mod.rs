//! NMEA 2000 Fast Packet assembler: rebuilds application messages by
//! aggregating the CAN frames of a multi-packet session.
//!
//! Sessions are keyed by `(pgn, source, destination, sequence_id)`, so
//! interleaved messages from one sender and concurrent senders on one bus
//! reassemble independently. The in-progress map is bounded: past the
//! capacity, the oldest session is evicted so lossy links cannot grow the
//! map without limit.
use std::collections::HashMap;

use log::debug;

use crate::protocol::transport::fast_packet::{FIRST_FRAME_DATA, NEXT_FRAME_DATA};

/// Default bound on concurrently reassembling sessions.
const DEFAULT_MAX_SESSIONS: usize = 64;

/// Identity of one Fast Packet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssemblyKey {
    pub pgn: u32,
    pub source: u8,
    pub destination: u8,
    pub sequence_id: u8,
}

/// One in-progress reassembly.
#[derive(Debug)]
struct Assembly {
    expected_len: usize,
    buffer: Vec<u8>,
    started_at: u64,
}

/// Main assembler: owns the session map for one receive stream. Calls must
/// be serialized per stream; frames from several buses through one
/// assembler would cross-talk.
#[derive(Debug)]
pub struct FastPacketAssembler {
    sessions: HashMap<AssemblyKey, Assembly>,
    max_sessions: usize,
    start_stamp: u64,
    lost_starts: u64,
}

impl Default for FastPacketAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FastPacketAssembler {
    pub fn new() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }

    /// Assembler with a custom session bound.
    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            max_sessions: max_sessions.max(1),
            start_stamp: 0,
            lost_starts: 0,
        }
    }

    /// Whether a session is currently reassembling under this key.
    pub fn in_progress(&self, key: &AssemblyKey) -> bool {
        self.sessions.contains_key(key)
    }

    /// Continuation frames that arrived without a matching start. A rising
    /// counter on a live bus points at dropped start frames.
    pub fn lost_starts(&self) -> u64 {
        self.lost_starts
    }

    /// Process one frame of a Fast Packet session.
    ///
    /// `data` is the raw frame payload: byte 0 carries the sequence bits
    /// and frame index, a start frame carries the total length in byte 1.
    /// Returns the reassembled payload once the session completes.
    pub fn process_frame(&mut self, key: AssemblyKey, data: &[u8]) -> Option<Vec<u8>> {
        let Some(&header) = data.first() else {
            return None;
        };
        let frame_index = header & 0x1F;

        if frame_index == 0 {
            self.process_start(key, data)
        } else {
            self.process_continuation(key, data)
        }
    }

    fn process_start(&mut self, key: AssemblyKey, data: &[u8]) -> Option<Vec<u8>> {
        // A start frame supersedes whatever was reassembling under the key,
        // valid or not.
        self.sessions.remove(&key);

        if data.len() < 2 {
            return None;
        }
        let expected_len = data[1] as usize;
        if expected_len == 0 {
            return None;
        }

        let mut assembly = Assembly {
            expected_len,
            buffer: Vec::with_capacity(expected_len),
            started_at: self.start_stamp,
        };
        self.start_stamp += 1;

        // First frame transports up to six payload bytes after the header.
        let n = FIRST_FRAME_DATA
            .min(data.len() - 2)
            .min(expected_len);
        assembly.buffer.extend_from_slice(&data[2..2 + n]);

        if assembly.buffer.len() >= expected_len {
            return Some(assembly.buffer);
        }

        self.evict_oldest_if_full();
        self.sessions.insert(key, assembly);
        None
    }

    fn process_continuation(&mut self, key: AssemblyKey, data: &[u8]) -> Option<Vec<u8>> {
        let Some(assembly) = self.sessions.get_mut(&key) else {
            // Missed the start frame: nothing to append to.
            self.lost_starts += 1;
            debug!(
                "Dropping continuation for pgn {} src {} seq {} without a start",
                key.pgn, key.source, key.sequence_id
            );
            return None;
        };

        // Continuations provide up to seven payload bytes.
        let remaining = assembly.expected_len - assembly.buffer.len();
        let n = NEXT_FRAME_DATA.min(data.len() - 1).min(remaining);
        assembly.buffer.extend_from_slice(&data[1..1 + n]);

        if assembly.buffer.len() >= assembly.expected_len {
            return self.sessions.remove(&key).map(|a| a.buffer);
        }
        None
    }

    /// Keep the map under its bound by evicting the oldest session.
    fn evict_oldest_if_full(&mut self) {
        if self.sessions.len() < self.max_sessions {
            return;
        }
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, a)| a.started_at)
            .map(|(key, _)| *key);
        if let Some(key) = oldest {
            debug!(
                "Evicting stale Fast Packet session pgn {} src {} seq {}",
                key.pgn, key.source, key.sequence_id
            );
            self.sessions.remove(&key);
        }
    }
}
