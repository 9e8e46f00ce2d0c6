use sccnet_common::{Channel, FrameTransport, InterruptLine, SccEvent};

use super::super::Scc;
use super::{
    ExplainWrite, Pending, Wr0Command, Wr0Reset, Wr1, Wr15, Wr9, DATA_REGISTER, WR3_ENTER_HUNT,
};

impl<I: InterruptLine, T: FrameTransport> Scc<I, T> {
    /// Bus write to the chip.
    ///
    /// Address bit 1 picks the channel and bit 2 the data port; control-port
    /// writes go to whatever register the last WR0 pointed at.
    pub fn write(&mut self, address: u32, value: u8) {
        let (channel, reg) = self.decode(address);
        let explained = ExplainWrite {
            channel,
            reg,
            value,
        };
        if !explained.is_noise() {
            log::debug!("SCC: {explained}");
        }
        self.emit(SccEvent::RegisterWrite {
            channel,
            reg,
            value,
        });

        let index = channel.index();
        match reg {
            0 => self.write_wr0(channel, value),
            1 => self.channels[index].wr1 = Wr1::from_bits_retain(value),
            2 => self.wr2 = value,
            3 => {
                // Software re-enabling the receiver asks for a fresh hunt.
                if value & WR3_ENTER_HUNT != 0 {
                    self.channels[index].hunting = true;
                }
            }
            6 => self.channels[index].sdlc_address = value,
            DATA_REGISTER => self.write_data(channel, value),
            9 => self.wr9 = Wr9::from_bits_retain(value),
            15 => {
                self.channels[index].wr15 = Wr15::from_bits_retain(value);
                // A cause that is already pending fires as soon as it is enabled.
                self.raise(channel);
            }
            _ => {}
        }
    }

    fn write_wr0(&mut self, channel: Channel, value: u8) {
        let command = Wr0Command::decode(value);
        self.reg_ptr = value & 0x07;
        match command {
            Wr0Command::PointHigh => self.reg_ptr |= 0x08,
            Wr0Command::ResetExtStatusInterrupts => {
                self.pending = Pending::empty();
                self.pending_shadow = Pending::empty();
            }
            Wr0Command::SendAbort => self.finish_transmit(channel),
            _ => {}
        }
        if Wr0Reset::decode(value) == Wr0Reset::ResetTxUnderrunLatch {
            self.channels[channel.index()].tx.arm_next_tick();
        }
    }
}
