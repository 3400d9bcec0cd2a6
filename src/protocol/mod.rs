//! High-level components of the NMEA 2000 protocol: CAN/Fast Packet
//! transport, envelope-to-frame packing, and receive-side frame handling.
pub mod handler;
pub mod packer;
pub mod transport;
