//! Kernel-facing wire layouts for classic CAN and CAN-FD frames, plus the
//! identifier flag discipline: EFF is stripped on read, RTR/ERR frames are
//! rejected, and identifiers are masked to their format width.
//!
//! The stack never opens a socket itself; these helpers give a
//! [`FrameIo`](super::traits::frame_io::FrameIo) implementation its codec
//! and write gating.
use crate::error::{FrameError, FrameIoError};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::frame_io::IoCapabilities;

/// Extended frame format flag (29-bit ID).
pub const CAN_EFF_FLAG: u32 = 0x8000_0000;
/// Remote transmission request flag.
pub const CAN_RTR_FLAG: u32 = 0x4000_0000;
/// Error frame flag.
pub const CAN_ERR_FLAG: u32 = 0x2000_0000;

/// Standard frame format ID mask (11-bit).
pub const CAN_SFF_MASK: u32 = 0x0000_07FF;
/// Extended frame format ID mask (29-bit).
pub const CAN_EFF_MASK: u32 = 0x1FFF_FFFF;

/// Classic kernel frame size: id, DLC, padding, eight data bytes.
pub const CAN_MTU: usize = 16;
/// CAN-FD kernel frame size: id, length, flags, padding, 64 data bytes.
pub const CANFD_MTU: usize = 72;

/// Maximum data length for classic CAN frames.
pub const CAN_MAX_DLEN: usize = 8;
/// Maximum data length for CAN FD frames.
pub const CANFD_MAX_DLEN: usize = 64;

//==================================================================================ENCODE

/// Lay a frame out as a 16-byte classic kernel buffer. The payload is
/// zero-padded to eight bytes; FD-sized frames do not fit this layout.
pub fn encode_classic(frame: &CanFrame) -> Result<[u8; CAN_MTU], FrameError> {
    if frame.dlc() > CAN_MAX_DLEN {
        return Err(FrameError::DlcOutOfRange { dlc: frame.dlc() });
    }

    let mut wire = [0u8; CAN_MTU];
    wire[..4].copy_from_slice(&wire_id(frame).to_le_bytes());
    wire[4] = frame.dlc() as u8;
    wire[8..8 + frame.dlc()].copy_from_slice(frame.data());
    Ok(wire)
}

/// Lay a frame out as a 72-byte CAN-FD kernel buffer.
pub fn encode_fd(frame: &CanFrame) -> Result<[u8; CANFD_MTU], FrameError> {
    if frame.dlc() > CANFD_MAX_DLEN {
        return Err(FrameError::DlcOutOfRange { dlc: frame.dlc() });
    }

    let mut wire = [0u8; CANFD_MTU];
    wire[..4].copy_from_slice(&wire_id(frame).to_le_bytes());
    wire[4] = frame.dlc() as u8;
    // Byte 5 carries the FD flags, bytes 6..7 are reserved.
    wire[8..8 + frame.dlc()].copy_from_slice(frame.data());
    Ok(wire)
}

fn wire_id(frame: &CanFrame) -> u32 {
    if frame.is_extended() {
        frame.raw_id() | CAN_EFF_FLAG
    } else {
        frame.raw_id()
    }
}

/// Gate a write against the device capabilities and pick the wire layout:
/// classic for DLC <= 8, FD otherwise (FD requires `socket_fd_enabled`).
pub fn encode_for_write(
    frame: &CanFrame,
    capabilities: &IoCapabilities,
) -> Result<Vec<u8>, FrameIoError> {
    if frame.dlc() <= CAN_MAX_DLEN {
        Ok(encode_classic(frame)?.to_vec())
    } else if capabilities.socket_fd_enabled {
        Ok(encode_fd(frame)?.to_vec())
    } else {
        Err(FrameIoError::FdNotEnabled)
    }
}

//==================================================================================DECODE

/// Decode a kernel read of either layout, discriminated by size.
pub fn decode_read(wire: &[u8]) -> Result<CanFrame, FrameIoError> {
    match wire.len() {
        CAN_MTU => Ok(decode_classic(wire)?),
        CANFD_MTU => Ok(decode_fd(wire)?),
        actual => Err(FrameIoError::UnexpectedReadSize { actual }),
    }
}

/// Decode a 16-byte classic kernel buffer into a frame.
pub fn decode_classic(wire: &[u8]) -> Result<CanFrame, FrameError> {
    if wire.len() != CAN_MTU {
        return Err(FrameError::WireSizeMismatch {
            expected: CAN_MTU,
            actual: wire.len(),
        });
    }

    let (id, extended) = strip_id(u32::from_le_bytes([wire[0], wire[1], wire[2], wire[3]]))?;
    let dlc = (wire[4] & 0x0F) as usize;
    if dlc > CAN_MAX_DLEN {
        return Err(FrameError::DlcOutOfRange { dlc });
    }
    CanFrame::new(id, extended, &wire[8..8 + dlc])
}

/// Decode a 72-byte CAN-FD kernel buffer into a frame.
pub fn decode_fd(wire: &[u8]) -> Result<CanFrame, FrameError> {
    if wire.len() != CANFD_MTU {
        return Err(FrameError::WireSizeMismatch {
            expected: CANFD_MTU,
            actual: wire.len(),
        });
    }

    let (id, extended) = strip_id(u32::from_le_bytes([wire[0], wire[1], wire[2], wire[3]]))?;
    let len = wire[4] as usize;
    if len > CANFD_MAX_DLEN {
        return Err(FrameError::DlcOutOfRange { dlc: len });
    }
    CanFrame::new(id, extended, &wire[8..8 + len])
}

/// Strip EFF, reject RTR/ERR, and mask the identifier to its format width.
fn strip_id(raw: u32) -> Result<(u32, bool), FrameError> {
    if raw & (CAN_RTR_FLAG | CAN_ERR_FLAG) != 0 {
        return Err(FrameError::RemoteOrErrorFrame {
            flags: raw & (CAN_RTR_FLAG | CAN_ERR_FLAG),
        });
    }

    let extended = raw & CAN_EFF_FLAG != 0;
    let id = if extended {
        raw & CAN_EFF_MASK
    } else {
        raw & CAN_SFF_MASK
    };
    Ok((id, extended))
}
