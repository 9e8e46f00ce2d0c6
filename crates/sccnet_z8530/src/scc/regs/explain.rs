use std::fmt;

use bitflags::Flags;
use sccnet_common::Channel;

use super::{Wr0Command, Wr0Reset, Wr1, Wr15, Wr9};

/// Human-readable rendering of a register write for the debug log.
pub(in crate::scc) struct ExplainWrite {
    pub(in crate::scc) channel: Channel,
    pub(in crate::scc) reg: u8,
    pub(in crate::scc) value: u8,
}

impl ExplainWrite {
    /// Plain pointer writes to WR0 are too frequent to be worth a line.
    pub(in crate::scc) fn is_noise(&self) -> bool {
        self.reg == 0 && matches!(self.value & 0xF8, 0x00 | 0x08)
    }
}

fn write_flags<F: Flags>(f: &mut fmt::Formatter<'_>, flags: F) -> fmt::Result {
    for (name, _) in flags.iter_names() {
        write!(f, "{name} ")?;
    }
    Ok(())
}

impl fmt::Display for ExplainWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            channel,
            reg,
            value,
        } = *self;
        match reg {
            0 => write!(
                f,
                "write reg 0 chan {channel}: cmd_hi={} cmd_lo={}",
                Wr0Reset::decode(value).name(),
                Wr0Command::decode(value).name()
            ),
            1 => {
                let wr1 = Wr1::from_bits_retain(value);
                write!(f, "write reg 1 chan {channel}: ")?;
                write_flags(f, wr1.difference(Wr1::RX_INT_MODE_LO | Wr1::RX_INT_MODE_HI))?;
                f.write_str(wr1.rx_int_mode().name())
            }
            9 => {
                let wr9 = Wr9::from_bits_retain(value);
                write!(f, "write reg 9: cmd={} ", wr9.reset_command_name())?;
                write_flags(f, wr9.difference(Wr9::RESET_CMD_LO | Wr9::RESET_CMD_HI))
            }
            15 => {
                write!(f, "write reg 15 chan {channel}: ")?;
                write_flags(f, Wr15::from_bits_retain(value))
            }
            _ => write!(f, "write chan {channel} reg {reg} val 0x{value:02X}"),
        }
    }
}
