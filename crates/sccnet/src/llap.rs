//! LocalTalk Link Access Protocol headers.
//!
//! Just enough to build and inspect the frames that cross a segment. The
//! SCC itself only cares about the first byte (destination node).

/// Destination node that every station accepts.
pub const BROADCAST: u8 = 0xFF;

/// Short DDP datagram.
pub const TYPE_DDP_SHORT: u8 = 0x01;
/// Long DDP datagram.
pub const TYPE_DDP_LONG: u8 = 0x02;
/// Node address enquiry, sent while picking a node number.
pub const TYPE_ENQ: u8 = 0x81;
/// Reply to an enquiry for an address already in use.
pub const TYPE_ACK: u8 = 0x82;
/// Request to send, part of directed transmissions.
pub const TYPE_RTS: u8 = 0x84;
/// Clear to send.
pub const TYPE_CTS: u8 = 0x85;

pub const HEADER_LEN: usize = 3;

/// Build a frame: destination, source, type, then the payload.
pub fn frame(dst: u8, src: u8, kind: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&[dst, src, kind]);
    out.extend_from_slice(payload);
    out
}

/// Control frames carry no payload.
pub fn control(dst: u8, src: u8, kind: u8) -> Vec<u8> {
    frame(dst, src, kind, &[])
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Header {
    pub dst: u8,
    pub src: u8,
    pub kind: u8,
}

impl Header {
    pub fn parse(frame: &[u8]) -> Option<Self> {
        match *frame {
            [dst, src, kind, ..] => Some(Self { dst, src, kind }),
            _ => None,
        }
    }

    pub fn is_control(&self) -> bool {
        self.kind & 0x80 != 0
    }
}
