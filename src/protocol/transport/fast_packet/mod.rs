//! NMEA 2000 Fast Packet support: encapsulates payloads larger than eight
//! bytes across successive CAN frames, and reassembles them on receive.

/// Maximum payload a Fast Packet can transport once reassembled.
pub const MAX_FAST_PACKET_PAYLOAD: usize = 223;

/// Frame indices are five bits, so one sequence spans at most 32 frames.
pub const MAX_FAST_PACKET_FRAMES: usize = 32;

/// Payload bytes carried by the first frame of a sequence.
pub const FIRST_FRAME_DATA: usize = 6;

/// Payload bytes carried by each continuation frame.
pub const NEXT_FRAME_DATA: usize = 7;

pub mod assembler;
pub mod builder;
pub mod sequence;
