pub mod config;
pub mod event;
pub mod hexdump;
pub mod host;

use std::fmt;

pub use config::SccConfig;
pub use event::{SccEvent, SccObserver};
pub use hexdump::HexDump;
pub use host::{FrameTransport, InterruptLine};

/// One of the two serial channels of the chip.
///
/// The bus decodes address bit 1 into a channel: set selects A, clear
/// selects B.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    A,
    B,
}

impl Channel {
    /// Both channels, in the order the tick driver services them.
    pub const ALL: [Channel; 2] = [Channel::A, Channel::B];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::A => 0,
            Channel::B => 1,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::A => f.write_str("A"),
            Channel::B => f.write_str("B"),
        }
    }
}
