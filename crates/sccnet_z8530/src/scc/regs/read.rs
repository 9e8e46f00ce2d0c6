use sccnet_common::{Channel, FrameTransport, InterruptLine, SccEvent};

use super::super::Scc;
use super::{Pending, Rr0, Rr1, RxIntMode, Wr15, DATA_REGISTER};

/// Value returned for registers the model does not implement.
const UNMAPPED: u8 = 0xFF;

impl<I: InterruptLine, T: FrameTransport> Scc<I, T> {
    /// Bus read from the chip.
    ///
    /// Reads can have side effects: RR2 on channel B acknowledges the
    /// highest-priority interrupt and RR8 pops the receive FIFO.
    pub fn read(&mut self, address: u32) -> u8 {
        let (channel, reg) = self.decode(address);
        let value = match reg {
            0 => self.rr0(channel).bits(),
            1 => self.rr1(channel).bits(),
            2 => match channel {
                Channel::B => self.acknowledge(),
                // Channel A reads back the unmodified vector base.
                Channel::A => self.wr2,
            },
            3 => match channel {
                Channel::A => self.pending.bits(),
                Channel::B => 0,
            },
            DATA_REGISTER => self.read_data(channel),
            // SDLC miscellaneous status: loop/clock bits are not modelled.
            10 => 0,
            15 => self.channels[channel.index()].wr15.bits(),
            _ => UNMAPPED,
        };
        self.emit(SccEvent::RegisterRead {
            channel,
            reg,
            value,
        });
        value
    }

    /// RR0 as the channel would report it right now.
    pub(in crate::scc) fn rr0(&self, channel: Channel) -> Rr0 {
        let ch = &self.channels[channel.index()];
        // Flow control is not modelled: the transmit buffer is always empty.
        let mut rr0 = Rr0::TX_EMPTY;
        rr0.set(Rr0::RX_AVAILABLE, ch.rx.has_byte());
        rr0.set(Rr0::DCD, ch.dcd);
        rr0.set(Rr0::SYNC_HUNT, ch.hunting);
        rr0.set(Rr0::CTS, ch.cts);
        rr0.set(Rr0::TX_UNDERRUN, ch.tx.expired());
        // Abort is imminent once only the trailer is left to read.
        rr0.set(Rr0::BREAK_ABORT, ch.rx.bytes_left() <= 2);
        rr0
    }

    pub(in crate::scc) fn rr1(&self, channel: Channel) -> Rr1 {
        // Residue code 011 and all-sent; end-of-frame tags the last byte.
        let mut rr1 = Rr1::RESIDUE_1 | Rr1::RESIDUE_2 | Rr1::ALL_SENT;
        rr1.set(
            Rr1::END_OF_FRAME,
            self.channels[channel.index()].rx.bytes_left() == 1,
        );
        rr1
    }

    fn read_data(&mut self, channel: Channel) -> u8 {
        let index = channel.index();
        let Some((byte, left)) = self.channels[index].rx.pop() else {
            log::debug!("SCC chan {channel}: data read with nothing received");
            return 0;
        };
        log::trace!("SCC chan {channel}: read 0x{byte:02X}, {left} bytes left");

        let ch = &mut self.channels[index];
        let mode = ch.wr1.rx_int_mode();
        let wr15 = ch.wr15;
        if left == 0 {
            ch.eof_int_pending = false;
        }
        if left != 0 && mode == RxIntMode::AllCharsOrSpecial {
            self.signal(Pending::rx(channel), channel);
        }
        if left == 1 {
            // Only the abort marker remains: the frame body is done.
            self.channels[index].hunting = true;
            if wr15.contains(Wr15::BREAK_ABORT) {
                self.signal(Pending::ext(channel), channel);
            }
        }
        byte
    }
}
