use sccnet_common::{Channel, FrameTransport, InterruptLine, SccEvent};

use super::regs::Pending;
use super::Scc;

impl<I: InterruptLine, T: FrameTransport> Scc<I, T> {
    /// Advance every timer by one unit.
    ///
    /// The host calls this at roughly 800 kHz. Within a channel the order
    /// is fixed: transmit underrun, receive arrival, then end-of-frame.
    pub fn tick(&mut self) {
        for channel in Channel::ALL {
            let index = channel.index();
            if self.channels[index].tx.tick() {
                self.finish_transmit(channel);
            }
            if self.channels[index].rx.tick() {
                self.frame_ready(channel);
            }
            self.tick_end_of_frame(channel);
        }
    }

    fn tick_end_of_frame(&mut self, channel: Channel) {
        let ch = &mut self.channels[channel.index()];
        if ch.eof_countdown == 0 {
            return;
        }
        ch.eof_countdown -= 1;
        if ch.eof_countdown == 0 && ch.wr1.rx_int_mode().signals_end_of_frame() {
            ch.eof_int_pending = true;
            self.emit(SccEvent::EndOfFrame { channel });
            self.signal(Pending::rx(channel), channel);
        }
        // Break/abort status is approximated as asserted for the whole
        // end-of-frame window.
        self.signal(Pending::ext(channel), channel);
    }
}
