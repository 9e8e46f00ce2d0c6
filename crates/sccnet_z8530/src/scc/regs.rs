//! Register layouts and bus address decoding.
//!
//! Bit names follow the Z8530 technical manual. Only the bits the model
//! acts on have behaviour attached; the rest are stored and reported.
use bitflags::bitflags;
use sccnet_common::{Channel, FrameTransport, InterruptLine};

use super::Scc;

mod explain;
mod read;
mod write;

pub(super) use explain::ExplainWrite;

/// Address bit selecting channel A (clear selects B).
pub const ADDR_CHANNEL_A: u32 = 1 << 1;
/// Address bit selecting the data register instead of the control port.
pub const ADDR_DATA: u32 = 1 << 2;

/// Register index data-port accesses are routed to.
pub const DATA_REGISTER: u8 = 8;

/// WR3 "enter hunt mode".
pub const WR3_ENTER_HUNT: u8 = 1 << 4;

/// Bus address of a channel's control port.
pub const fn control_address(channel: Channel) -> u32 {
    match channel {
        Channel::A => ADDR_CHANNEL_A,
        Channel::B => 0,
    }
}

/// Bus address of a channel's data port.
pub const fn data_address(channel: Channel) -> u32 {
    control_address(channel) | ADDR_DATA
}

bitflags! {
    /// WR1: transmit/receive interrupt and data transfer mode.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Wr1: u8 {
        /// Gates every interrupt this channel raises.
        const INT_ENABLE = 1 << 0;
        const TX_INT_ENABLE = 1 << 1;
        const PARITY_IS_SPECIAL = 1 << 2;
        const RX_INT_MODE_LO = 1 << 3;
        const RX_INT_MODE_HI = 1 << 4;
        const WAIT_DMA_ON_RX_TX = 1 << 5;
        const WAIT_DMA_FUNCTION = 1 << 6;
        const WAIT_DMA_ENABLE = 1 << 7;
    }

    /// WR9: master interrupt control, chip-wide.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Wr9: u8 {
        const VECTOR_INCLUDES_STATUS = 1 << 0;
        const NO_VECTOR = 1 << 1;
        const DISABLE_LOWER_CHAIN = 1 << 2;
        const MASTER_INT_ENABLE = 1 << 3;
        /// Place the status code in vector bits 4..6 instead of 1..3.
        const STATUS_HIGH = 1 << 4;
        const RESERVED = 1 << 5;
        const RESET_CMD_LO = 1 << 6;
        const RESET_CMD_HI = 1 << 7;
    }

    /// WR15: external/status interrupt enables.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Wr15: u8 {
        const ZERO_COUNT = 1 << 1;
        const DCD = 1 << 3;
        const SYNC_HUNT = 1 << 4;
        const CTS = 1 << 5;
        const TX_UNDERRUN = 1 << 6;
        const BREAK_ABORT = 1 << 7;
    }

    /// RR0: transmit/receive buffer and external status.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Rr0: u8 {
        const RX_AVAILABLE = 1 << 0;
        const ZERO_COUNT = 1 << 1;
        const TX_EMPTY = 1 << 2;
        const DCD = 1 << 3;
        const SYNC_HUNT = 1 << 4;
        const CTS = 1 << 5;
        const TX_UNDERRUN = 1 << 6;
        const BREAK_ABORT = 1 << 7;
    }

    /// RR1: special receive condition status.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Rr1: u8 {
        const ALL_SENT = 1 << 0;
        const RESIDUE_2 = 1 << 1;
        const RESIDUE_1 = 1 << 2;
        const RESIDUE_0 = 1 << 3;
        const PARITY_ERROR = 1 << 4;
        const RX_OVERRUN = 1 << 5;
        const CRC_ERROR = 1 << 6;
        const END_OF_FRAME = 1 << 7;
    }

    /// RR3 (channel A only): interrupt-pending vector.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct Pending: u8 {
        const CHB_EXT = 1 << 0;
        const CHB_TX = 1 << 1;
        const CHB_RX = 1 << 2;
        const CHA_EXT = 1 << 3;
        const CHA_TX = 1 << 4;
        const CHA_RX = 1 << 5;
    }
}

impl Pending {
    /// External/status cause of `channel`.
    pub const fn ext(channel: Channel) -> Self {
        match channel {
            Channel::A => Self::CHA_EXT,
            Channel::B => Self::CHB_EXT,
        }
    }

    /// Receive cause of `channel`.
    pub const fn rx(channel: Channel) -> Self {
        match channel {
            Channel::A => Self::CHA_RX,
            Channel::B => Self::CHB_RX,
        }
    }

    /// Every cause belonging to `channel`.
    pub const fn of(channel: Channel) -> Self {
        match channel {
            Channel::A => Self::CHA_EXT.union(Self::CHA_TX).union(Self::CHA_RX),
            Channel::B => Self::CHB_EXT.union(Self::CHB_TX).union(Self::CHB_RX),
        }
    }
}

/// Receive interrupt mode, WR1 bits 3..4.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RxIntMode {
    Disabled,
    FirstCharOrSpecial,
    AllCharsOrSpecial,
    SpecialOnly,
}

impl RxIntMode {
    pub const fn name(self) -> &'static str {
        match self {
            RxIntMode::Disabled => "RxIntDisabled",
            RxIntMode::FirstCharOrSpecial => "RxInt1stCharOrSpecial",
            RxIntMode::AllCharsOrSpecial => "RxIntAllCharOrSpecial",
            RxIntMode::SpecialOnly => "RxIntSpecial",
        }
    }

    /// Modes with WR1 bit 4 set signal end-of-frame as a receive cause.
    pub const fn signals_end_of_frame(self) -> bool {
        matches!(self, RxIntMode::AllCharsOrSpecial | RxIntMode::SpecialOnly)
    }

    /// Modes that interrupt when a frame's first character arrives.
    pub const fn signals_first_char(self) -> bool {
        matches!(
            self,
            RxIntMode::FirstCharOrSpecial | RxIntMode::AllCharsOrSpecial
        )
    }
}

impl Wr1 {
    pub const fn rx_int_mode(self) -> RxIntMode {
        match (self.bits() >> 3) & 0x03 {
            0 => RxIntMode::Disabled,
            1 => RxIntMode::FirstCharOrSpecial,
            2 => RxIntMode::AllCharsOrSpecial,
            _ => RxIntMode::SpecialOnly,
        }
    }
}

impl Wr9 {
    pub const fn reset_command_name(self) -> &'static str {
        match (self.bits() >> 6) & 0x03 {
            0 => "NoReset",
            1 => "ResetChB",
            2 => "ResetChA",
            _ => "HwReset",
        }
    }
}

/// WR0 bits 3..5.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Wr0Command {
    Null,
    /// Add 8 to the register pointer.
    PointHigh,
    ResetExtStatusInterrupts,
    SendAbort,
    EnableIntOnNextRxChar,
    ResetTxIntPending,
    ErrorReset,
    ResetHighestIus,
}

impl Wr0Command {
    pub const fn decode(value: u8) -> Self {
        match (value >> 3) & 0x07 {
            0 => Wr0Command::Null,
            1 => Wr0Command::PointHigh,
            2 => Wr0Command::ResetExtStatusInterrupts,
            3 => Wr0Command::SendAbort,
            4 => Wr0Command::EnableIntOnNextRxChar,
            5 => Wr0Command::ResetTxIntPending,
            6 => Wr0Command::ErrorReset,
            _ => Wr0Command::ResetHighestIus,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Wr0Command::Null => "null",
            Wr0Command::PointHigh => "point_high",
            Wr0Command::ResetExtStatusInterrupts => "reset_ext_status_int",
            Wr0Command::SendAbort => "send_ABORT",
            Wr0Command::EnableIntOnNextRxChar => "ena_int_on_next_char",
            Wr0Command::ResetTxIntPending => "reset_tx_pending",
            Wr0Command::ErrorReset => "error_reset",
            Wr0Command::ResetHighestIus => "reset_highest_ius",
        }
    }
}

/// WR0 bits 6..7.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Wr0Reset {
    Null,
    ResetRxCrc,
    ResetTxCrc,
    ResetTxUnderrunLatch,
}

impl Wr0Reset {
    pub const fn decode(value: u8) -> Self {
        match value >> 6 {
            0 => Wr0Reset::Null,
            1 => Wr0Reset::ResetRxCrc,
            2 => Wr0Reset::ResetTxCrc,
            _ => Wr0Reset::ResetTxUnderrunLatch,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Wr0Reset::Null => "null",
            Wr0Reset::ResetRxCrc => "reset_rx_crc",
            Wr0Reset::ResetTxCrc => "reset_tx_crc",
            Wr0Reset::ResetTxUnderrunLatch => "reset_tx_underrun_EOM_latch",
        }
    }
}

impl<I: InterruptLine, T: FrameTransport> Scc<I, T> {
    /// Decode a bus address into the channel and register it targets.
    ///
    /// Control-port accesses consume the register pointer, which falls back
    /// to 0 so the next control access hits WR0/RR0 again.
    pub(super) fn decode(&mut self, address: u32) -> (Channel, u8) {
        let channel = if address & ADDR_CHANNEL_A != 0 {
            Channel::A
        } else {
            Channel::B
        };
        let reg = if address & ADDR_DATA != 0 {
            DATA_REGISTER
        } else {
            std::mem::take(&mut self.reg_ptr)
        };
        (channel, reg)
    }
}
