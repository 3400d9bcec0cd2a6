//! `n2k-stack` library: a layered stack for the CAN / J1939 / NMEA 2000
//! protocol family. The crate exposes the infrastructure modules (bit codec,
//! dialect compiler, message parser, schema registry) and the protocol logic
//! (29-bit identifiers, Fast Packet transport, frame packing and handling).
//!
//! The stack is plain library code: it spawns no threads and blocks only
//! inside the caller-provided [`FrameIo`](protocol::transport::traits::frame_io::FrameIo)
//! capability.
//==================================================================================
/// Core data types shared by the dialect compiler and the codec engine.
pub mod core;
/// Domain and low-level errors (CAN identifier construction, dialect
/// compilation, serialization, deserialization, and related issues).
pub mod error;
/// Infrastructure modules: bit codec, dialect parser, compiled registry,
/// JSON-schema generation.
pub mod infra;
/// NMEA 2000 protocol implementation: CAN transport, Fast Packet, frame
/// packing and receive-side handling.
pub mod protocol;
//==================================================================================
pub use crate::core::Envelope;
pub use crate::infra::codec::engine::MessageParser;
pub use crate::infra::dialect::parse_dialect;
pub use crate::infra::registry::Registry;
pub use crate::infra::schema::SchemaRegistry;
pub use crate::protocol::handler::{FrameHandler, ReceivedMessage};
pub use crate::protocol::packer::FramePacker;
pub use crate::protocol::transport::can_frame::CanFrame;
pub use crate::protocol::transport::can_id::CanId;
pub use crate::protocol::transport::traits::frame_io::{FrameIo, IoCapabilities};
