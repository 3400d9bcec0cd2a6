//! Abstraction traits consumed by the transport layer.
pub mod frame_io;
