//! NMEA 2000 transport layer: CAN frame representation, 29-bit identifier
//! management, kernel wire layouts, Fast Packet encoding, and the frame I/O
//! capability consumed from the host.
pub mod can_frame;
pub mod can_id;
pub mod fast_packet;
pub mod socket;
pub mod traits;
