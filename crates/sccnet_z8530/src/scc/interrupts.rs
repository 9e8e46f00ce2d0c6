//! Interrupt controller.
//!
//! Causes accumulate in the chip-wide pending vector (RR3). Raising is
//! edge-driven by the other components but level-like in effect: whenever
//! a channel raises and anything is pending, the line is asserted again.
use sccnet_common::{Channel, FrameTransport, InterruptLine, SccEvent};

use super::regs::{Pending, Wr1, Wr9};
use super::Scc;

/// Acknowledge order for RR2 reads, highest priority first, with the
/// status code each cause places in the vector.
const ACK_PRIORITY: [(Pending, u8); 4] = [
    (Pending::CHB_EXT, 1),
    (Pending::CHA_EXT, 5),
    (Pending::CHA_RX, 6),
    (Pending::CHB_RX, 2),
];

impl<I: InterruptLine, T: FrameTransport> Scc<I, T> {
    /// Mark `cause` pending and raise on behalf of `channel`.
    pub(super) fn signal(&mut self, cause: Pending, channel: Channel) {
        self.pending |= cause;
        self.raise(channel);
    }

    /// Assert the host line if `channel` has interrupts enabled and any
    /// cause is pending.
    pub(super) fn raise(&mut self, channel: Channel) {
        if self.pending.is_empty() {
            return;
        }
        if !self.channels[channel.index()]
            .wr1
            .contains(Wr1::INT_ENABLE)
        {
            return;
        }
        self.pending_shadow = self.pending;
        if log::log_enabled!(log::Level::Debug) {
            let names: Vec<&str> = self.pending.iter_names().map(|(name, _)| name).collect();
            log::debug!(
                "SCC int from chan {channel}, pending 0x{:02X}: {}",
                self.pending.bits(),
                names.join(" ")
            );
        }
        self.emit(SccEvent::InterruptRaised {
            channel,
            pending: self.pending.bits(),
        });
        self.irq.assert_interrupt();
    }

    /// RR2 read on channel B: clear the highest-priority pending cause and
    /// return the modified vector. Anything still pending is re-raised so
    /// repeated acknowledges drain every cause.
    pub(super) fn acknowledge(&mut self) -> u8 {
        let code = match ACK_PRIORITY
            .iter()
            .find(|(cause, _)| self.pending.contains(*cause))
        {
            Some(&(cause, code)) => {
                self.pending.remove(cause);
                code
            }
            None => 0,
        };

        let vector = self.vector(code);
        self.emit(SccEvent::InterruptAcknowledged { code, vector });

        if self.pending.intersects(Pending::of(Channel::A)) {
            self.raise(Channel::A);
        }
        if self.pending.intersects(Pending::of(Channel::B)) {
            self.raise(Channel::B);
        }
        vector
    }

    /// WR2 with the 3-bit status code merged in at bits 4..6 (status high)
    /// or bits 1..3.
    fn vector(&self, code: u8) -> u8 {
        if self.wr9.contains(Wr9::STATUS_HIGH) {
            (self.wr2 & !0x70) | (code << 4)
        } else {
            (self.wr2 & !0x0E) | (code << 1)
        }
    }
}
