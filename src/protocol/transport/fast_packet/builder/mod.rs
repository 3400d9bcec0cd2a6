//! CAN frame generator for Fast Packet messages. Builds the required frame
//! sequence (single or multi-packet) from an application payload.
use crate::error::PackError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::fast_packet::{
    FIRST_FRAME_DATA, MAX_FAST_PACKET_FRAMES, NEXT_FRAME_DATA,
};

#[derive(Debug)]
/// Shared parameters for all frames composing one message.
pub struct FastPacketBuilder<'a> {
    id: CanId,
    sequence_id: u8,
    payload: &'a [u8],
}

impl<'a> FastPacketBuilder<'a> {
    /// Prepare a frame sequence for the payload. Payloads up to eight bytes
    /// travel as one plain frame; larger ones are segmented. Payloads that
    /// would not fit the 5-bit frame index space are rejected.
    pub fn new(id: CanId, sequence_id: u8, payload: &'a [u8]) -> Result<Self, PackError> {
        let builder = Self {
            id,
            sequence_id: sequence_id & 0x07,
            payload,
        };
        if builder.frame_count() > MAX_FAST_PACKET_FRAMES {
            return Err(PackError::TooManyFrames {
                frames: builder.frame_count(),
            });
        }
        Ok(builder)
    }

    /// Number of frames the payload needs.
    pub fn frame_count(&self) -> usize {
        let len = self.payload.len();
        if len <= 8 {
            1
        } else {
            1 + (len - FIRST_FRAME_DATA).div_ceil(NEXT_FRAME_DATA)
        }
    }

    /// Start the iteration; each call to `next` yields the next frame.
    pub fn build(self) -> FrameIterator<'a> {
        FrameIterator {
            builder: self,
            frame_index: 0,
            bytes_sent: 0,
            finished: false,
        }
    }
}

/// Lazy iterator returning frames one by one as they are encoded, in strict
/// ascending frame-index order.
pub struct FrameIterator<'a> {
    builder: FastPacketBuilder<'a>,
    frame_index: u8,
    bytes_sent: usize,
    finished: bool,
}

impl Iterator for FrameIterator<'_> {
    type Item = CanFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let payload = self.builder.payload;
        let total_len = payload.len();

        // Payload <= 8 bytes: single-frame message, DLC equals the payload.
        if total_len <= 8 {
            self.finished = true;
            return Some(frame(self.builder.id, payload));
        }

        let header = (self.builder.sequence_id << 5) | (self.frame_index & 0x1F);
        let mut data = [0xFF; 8];
        data[0] = header;

        if self.frame_index == 0 {
            // First frame: header, total length, six data bytes.
            data[1] = total_len as u8;
            let n = FIRST_FRAME_DATA.min(total_len);
            data[2..2 + n].copy_from_slice(&payload[..n]);
            self.bytes_sent += n;
        } else {
            let n = NEXT_FRAME_DATA.min(total_len - self.bytes_sent);
            data[1..1 + n].copy_from_slice(&payload[self.bytes_sent..self.bytes_sent + n]);
            self.bytes_sent += n;
        }

        self.frame_index = self.frame_index.wrapping_add(1);
        if self.bytes_sent >= total_len {
            self.finished = true;
        }

        Some(frame(self.builder.id, &data))
    }
}

fn frame(id: CanId, data: &[u8]) -> CanFrame {
    // A masked 29-bit identifier with at most eight data bytes always forms
    // a valid extended frame.
    CanFrame::extended(id, data).expect("valid extended frame")
}
