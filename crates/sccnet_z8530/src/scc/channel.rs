use sccnet_common::SccConfig;

use super::regs::{Wr1, Wr15};
use super::rx::RxQueue;
use super::tx::TxPath;

/// Per-channel traffic counters.
///
/// These make data loss observable to the host: the chip itself has no
/// other way of reporting a dropped frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SccStats {
    /// Frames placed into a receive slot.
    pub frames_queued: u64,
    /// Frames whose address matched and were handed to software.
    pub frames_accepted: u64,
    /// Frames discarded by the address check.
    pub frames_rejected: u64,
    /// Frames lost because every receive slot was occupied.
    pub frames_dropped: u64,
    /// Frames handed to the network transport.
    pub frames_sent: u64,
    /// Data-register writes that did not fit the transmit buffer.
    pub tx_overflow_bytes: u64,
}

pub(super) struct ChannelState {
    pub(super) dcd: bool,
    pub(super) cts: bool,
    pub(super) wr1: Wr1,
    pub(super) wr15: Wr15,
    pub(super) sdlc_address: u8,
    /// Not yet synchronized to a frame boundary.
    pub(super) hunting: bool,
    pub(super) tx: TxPath,
    pub(super) rx: RxQueue,
    /// Ticks left until end-of-frame is signalled; 0 when inactive.
    pub(super) eof_countdown: u32,
    pub(super) eof_int_pending: bool,
    pub(super) stats: SccStats,
}

impl ChannelState {
    pub(super) fn new(config: &SccConfig) -> Self {
        Self {
            dcd: false,
            cts: false,
            wr1: Wr1::empty(),
            wr15: Wr15::empty(),
            sdlc_address: 0,
            hunting: false,
            tx: TxPath::new(config.max_frame_len),
            rx: RxQueue::new(config.rx_slots),
            eof_countdown: 0,
            eof_int_pending: false,
            stats: SccStats::default(),
        }
    }
}
