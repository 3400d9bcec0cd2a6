//! Creation and extraction of the 29-bit CAN identifiers used by
//! NMEA 2000 (derived from the SAE J1939 specification).
use crate::error::CanIdError;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Encapsulates an extended CAN identifier (29 bits) and exposes accessors
/// for priority, PGN, destination, and source. The stored value carries only
/// identifier bits, never kernel flag bits.
pub struct CanId(u32);

/// Broadcast destination address (global).
pub const BROADCAST: u8 = 0xFF;

/// Highest PDU Format value still addressing a specific node (PDU1).
const PDU1_MAX_PF: u8 = 239;

impl CanId {
    /// Interpret a raw identifier, masking it down to its 29 bits.
    pub fn parse(raw: u32) -> Self {
        Self(raw & 0x1FFF_FFFF)
    }

    // Builder entry point
    /// Creates a pre-configured [`CanIdBuilder`] for a PGN and source address.
    pub fn builder(pgn: u32, source_address: u8) -> CanIdBuilder {
        CanIdBuilder::new(pgn, source_address)
    }

    /// Raw 29-bit identifier.
    pub fn raw(&self) -> u32 {
        self.0
    }

    // Getters used to deconstruct the identifier
    /// Returns the priority (3 bits, value 0-7) encoded in the CAN ID.
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// Extracts the 18-bit PGN, handling the PDU1/PDU2 distinction.
    pub fn pgn(&self) -> u32 {
        let ps = (self.0 >> 8) & 0xFF;
        let pf = (self.0 >> 16) & 0xFF;
        let dp = (self.0 >> 24) & 0x01;

        if pf as u8 <= PDU1_MAX_PF {
            // PDU1: PF < 240, PS stores the explicit destination.
            (dp << 16) | (pf << 8)
        } else {
            // PDU2: PF >= 240, implicit destination, PS becomes part of the PGN.
            (dp << 16) | (pf << 8) | ps
        }
    }

    /// Destination address: the PS byte for PDU1, global for PDU2.
    pub fn destination_address(&self) -> u8 {
        let pf = ((self.0 >> 16) & 0xFF) as u8;
        if pf <= PDU1_MAX_PF {
            ((self.0 >> 8) & 0xFF) as u8
        } else {
            BROADCAST
        }
    }

    /// Eight-bit source address (logical node identifier on the bus).
    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// A PGN whose low byte is zero addresses a specific node.
    pub fn is_pdu1(&self) -> bool {
        self.pgn() & 0xFF == 0
    }

    /// Broadcast parameter groups carry the PS byte inside the PGN.
    pub fn is_pdu2(&self) -> bool {
        !self.is_pdu1()
    }
}

//==================================================================================CAN_ID_BUILDER
#[derive(Debug)]
/// Fluent builder that enforces the PDU1/PDU2 rules.
pub struct CanIdBuilder {
    priority: u8,
    pgn: u32,
    source_address: u8,
    destination: Option<u8>,
}

impl CanIdBuilder {
    /// Initializes the builder for a given PGN and source address.
    pub fn new(pgn: u32, source_address: u8) -> Self {
        Self {
            priority: 6, // Default priority
            pgn,
            source_address,
            destination: None,
        }
    }

    /// Sets the priority (3 bits) to use during construction.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Assigns a destination address. Meaningful for PDU1 PGNs only; PDU2
    /// identifiers are implicitly broadcast.
    pub fn to_destination(mut self, destination_address: u8) -> Self {
        self.destination = Some(destination_address);
        self
    }

    /// Builds the CAN identifier while applying J1939 rules:
    /// - priority must fit its three bits
    /// - PDU1 (PF < 240): the PGN's PS byte must be zero; the destination
    ///   lands in PS (global when unset)
    /// - PDU2 (PF >= 240): PS comes from the PGN; the destination is ignored
    /// - DP/PF/PS bits are copied from the provided PGN
    ///
    /// The result is masked to 29 bits; flag bits are never set here.
    pub fn build(self) -> Result<CanId, CanIdError> {
        if self.priority > 7 {
            return Err(CanIdError::PriorityOutOfRange {
                priority: self.priority,
            });
        }

        let dp = (self.pgn >> 16) & 0x01;
        let pf = ((self.pgn >> 8) & 0xFF) as u8;
        let ps_from_pgn = (self.pgn & 0xFF) as u8;

        let ps = if pf <= PDU1_MAX_PF {
            if ps_from_pgn != 0 {
                return Err(CanIdError::NonZeroPdu1Low { pgn: self.pgn });
            }
            self.destination.unwrap_or(BROADCAST)
        } else {
            ps_from_pgn
        };

        let id = ((self.priority as u32) << 26)
            | (dp << 24)
            | ((pf as u32) << 16)
            | ((ps as u32) << 8)
            | (self.source_address as u32);
        Ok(CanId(id & 0x1FFF_FFFF))
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
