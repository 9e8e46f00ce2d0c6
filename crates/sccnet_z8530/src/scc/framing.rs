//! Framing/hunting state machine.
//!
//! Runs once per frame, on the tick its receive slot becomes ready. A
//! hunting channel only locks onto frames addressed to it or to everyone.
use sccnet_common::{Channel, FrameTransport, HexDump, InterruptLine, SccEvent};

use super::regs::{Pending, Wr15};
use super::Scc;
use crate::BROADCAST_ADDRESS;

impl<I: InterruptLine, T: FrameTransport> Scc<I, T> {
    pub(super) fn frame_ready(&mut self, channel: Channel) {
        let index = channel.index();
        let eof_ticks_per_byte = self.config.eof_ticks_per_byte;
        let ch = &mut self.channels[index];
        let slot = ch.rx.cursor();
        log::trace!(
            "SCC chan {channel}: slot {slot} ready\n{}",
            HexDump(ch.rx.active_frame())
        );

        if !ch.hunting {
            // Already synchronized: the frame is delivered as it stands.
            return;
        }

        let frame = ch.rx.active_frame();
        let address = frame[0];
        let len = frame.len();
        if address != BROADCAST_ADDRESS && address != ch.sdlc_address {
            ch.rx.discard_active();
            ch.stats.frames_rejected += 1;
            self.emit(SccEvent::FrameRejected {
                channel,
                slot,
                address,
            });
            return;
        }

        ch.rx.rewind();
        ch.hunting = false;
        ch.eof_countdown = (len as u32).saturating_mul(eof_ticks_per_byte);
        ch.stats.frames_accepted += 1;
        let wr15 = ch.wr15;
        let mode = ch.wr1.rx_int_mode();
        self.emit(SccEvent::FrameAccepted {
            channel,
            slot,
            address,
        });

        if wr15.contains(Wr15::SYNC_HUNT) {
            self.signal(Pending::ext(channel), channel);
        }
        if mode.signals_first_char() {
            self.signal(Pending::rx(channel), channel);
        }
    }
}
