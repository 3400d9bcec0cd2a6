//! Allocation of the 3-bit Fast Packet sequence counters. Receivers use the
//! sequence identifier to keep interleaved messages apart, so each
//! `(pgn, source, destination)` flow advances its own counter.
use std::collections::HashMap;
use std::sync::Mutex;

/// Thread-safe per-flow counter store. Concurrent callers on the same key
/// observe distinct, in-order modulo-8 values.
#[derive(Debug, Default)]
pub struct SequenceProvider {
    counters: Mutex<HashMap<(u32, u8, u8), u8>>,
}

impl SequenceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequence identifier for the flow, starting at 0 on first use
    /// and cycling 0..=7.
    pub fn next_sequence_id(&self, pgn: u32, source: u8, destination: u8) -> u8 {
        let mut counters = self.counters.lock().expect("sequence counters poisoned");
        let counter = counters.entry((pgn, source, destination)).or_insert(0);
        let current = *counter;
        *counter = (current + 1) & 0x07;
        current
    }
}
