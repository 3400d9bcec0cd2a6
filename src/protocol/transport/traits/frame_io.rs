//! Minimal abstraction for a blocking CAN device. Allows the stack to plug
//! into various hosts (SocketCAN, serial gateways, replay files) without
//! owning any of them.
//!
//! `read_frame` and `write_frame` are the only potentially blocking
//! operations in the stack; they block the calling thread until the host
//! completes or errors. A host can unblock readers by closing the
//! underlying descriptor, which must surface as an error here.
use crate::error::FrameIoError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::socket::{CAN_MAX_DLEN, CANFD_MAX_DLEN};

/// What the device and its socket path can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoCapabilities {
    /// The network interface itself is FD-capable.
    pub interface_fd_enabled: bool,
    /// The socket was opened with FD frames enabled.
    pub socket_fd_enabled: bool,
    /// Largest payload the interface accepts.
    pub interface_max_payload_bytes: usize,
    /// Largest payload one read/write can move.
    pub io_max_payload_bytes: usize,
}

impl IoCapabilities {
    /// Classic CAN device: eight-byte payloads everywhere.
    pub fn classic() -> Self {
        Self {
            interface_fd_enabled: false,
            socket_fd_enabled: false,
            interface_max_payload_bytes: CAN_MAX_DLEN,
            io_max_payload_bytes: CAN_MAX_DLEN,
        }
    }

    /// FD-enabled device: 64-byte payloads end to end.
    pub fn fd() -> Self {
        Self {
            interface_fd_enabled: true,
            socket_fd_enabled: true,
            interface_max_payload_bytes: CANFD_MAX_DLEN,
            io_max_payload_bytes: CANFD_MAX_DLEN,
        }
    }
}

/// Contract to exchange CAN frames with a host device.
pub trait FrameIo {
    /// Open the named interface (e.g. "can0").
    fn open(interface: &str) -> Result<Self, FrameIoError>
    where
        Self: Sized;

    /// Block until the next frame arrives or the device errors.
    fn read_frame(&mut self) -> Result<CanFrame, FrameIoError>;

    /// Block until the frame is handed to the device or the device errors.
    fn write_frame(&mut self, frame: &CanFrame) -> Result<(), FrameIoError>;

    /// Advertised device capabilities.
    fn capabilities(&self) -> IoCapabilities;

    /// Release the device. Further reads and writes fail with
    /// [`FrameIoError::Closed`].
    fn close(&mut self) -> Result<(), FrameIoError>;
}
