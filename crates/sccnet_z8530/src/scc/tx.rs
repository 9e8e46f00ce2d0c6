//! Transmit path.
//!
//! Data-register writes accumulate into one buffer. Every byte pushes the
//! underrun countdown further out; when the tick driver runs it down to
//! zero the transmitter has "underrun" and the whole buffer goes out as a
//! single frame.
use sccnet_common::{Channel, FrameTransport, HexDump, InterruptLine, SccEvent};

use super::Scc;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum TxTimer {
    /// Never armed since power-on.
    Idle,
    /// Counted down to zero; the buffer has been flushed.
    Expired,
    Running(u32),
}

pub(super) struct TxPath {
    buffer: Vec<u8>,
    capacity: usize,
    pub(super) timer: TxTimer,
}

impl TxPath {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            buffer: Vec::new(),
            capacity,
            timer: TxTimer::Idle,
        }
    }

    /// Append a byte and extend the countdown by `service_ticks`.
    ///
    /// Returns `false` when the buffer is full and the byte was dropped. The
    /// countdown is extended either way since the shifter is still busy.
    pub(super) fn push(&mut self, byte: u8, service_ticks: u32) -> bool {
        self.timer = match self.timer {
            TxTimer::Running(n) => TxTimer::Running(n.saturating_add(service_ticks)),
            TxTimer::Idle | TxTimer::Expired => TxTimer::Running(service_ticks),
        };
        if self.buffer.len() >= self.capacity {
            return false;
        }
        self.buffer.push(byte);
        true
    }

    /// Reset Tx underrun/EOM latch: underrun on the very next tick unless
    /// more data arrives first.
    pub(super) fn arm_next_tick(&mut self) {
        self.timer = TxTimer::Running(1);
    }

    /// Returns `true` on the tick the countdown expires.
    pub(super) fn tick(&mut self) -> bool {
        match self.timer {
            TxTimer::Running(n) if n <= 1 => {
                self.timer = TxTimer::Expired;
                true
            }
            TxTimer::Running(n) => {
                self.timer = TxTimer::Running(n - 1);
                false
            }
            TxTimer::Idle | TxTimer::Expired => false,
        }
    }

    #[inline]
    pub(super) fn expired(&self) -> bool {
        self.timer == TxTimer::Expired
    }

    #[inline]
    pub(super) fn pending(&self) -> &[u8] {
        &self.buffer
    }

    pub(super) fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl<I: InterruptLine, T: FrameTransport> Scc<I, T> {
    pub(super) fn write_data(&mut self, channel: Channel, value: u8) {
        let service_ticks = self.config.tx_byte_ticks;
        let ch = &mut self.channels[channel.index()];
        if !ch.tx.push(value, service_ticks) {
            ch.stats.tx_overflow_bytes += 1;
            log::warn!(
                "SCC chan {channel}: transmit buffer full ({} bytes), dropping 0x{value:02X}",
                ch.tx.pending().len()
            );
        }
    }

    /// Hand everything buffered to the transport and go back to hunting:
    /// a finished transmission ends this node's turn on the half-duplex
    /// link.
    pub(super) fn finish_transmit(&mut self, channel: Channel) {
        let index = channel.index();
        self.channels[index].hunting = true;

        let len = self.channels[index].tx.pending().len();
        if len == 0 {
            log::debug!("SCC chan {channel}: transmitter underrun with nothing buffered");
            return;
        }

        log::trace!(
            "SCC chan {channel}: sending\n{}",
            HexDump(self.channels[index].tx.pending())
        );
        self.transport.send_frame(self.channels[index].tx.pending());
        self.channels[index].tx.clear();
        self.channels[index].stats.frames_sent += 1;
        self.emit(SccEvent::FrameTransmitted { channel, len });
    }
}
