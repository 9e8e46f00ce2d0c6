use std::fmt;

use crate::Channel;

/// Diagnostic events emitted by the chip at well-defined points.
///
/// Events are informational only. The chip never reads anything back from
/// an observer, so dropping the observer (or the log output) cannot change
/// emulated behaviour.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SccEvent {
    RegisterWrite {
        channel: Channel,
        reg: u8,
        value: u8,
    },
    RegisterRead {
        channel: Channel,
        reg: u8,
        value: u8,
    },
    InterruptRaised {
        channel: Channel,
        pending: u8,
    },
    InterruptAcknowledged {
        code: u8,
        vector: u8,
    },
    FrameQueued {
        channel: Channel,
        slot: usize,
        len: usize,
        wire_delay: u32,
        queued_ahead: usize,
    },
    FrameDropped {
        channel: Channel,
        len: usize,
    },
    FrameAccepted {
        channel: Channel,
        slot: usize,
        address: u8,
    },
    FrameRejected {
        channel: Channel,
        slot: usize,
        address: u8,
    },
    EndOfFrame {
        channel: Channel,
    },
    FrameTransmitted {
        channel: Channel,
        len: usize,
    },
}

impl SccEvent {
    /// Level the event is logged at. Register traffic is very chatty and
    /// stays at trace; everything else is debug, except data loss.
    pub fn level(&self) -> log::Level {
        match self {
            SccEvent::RegisterWrite { .. } | SccEvent::RegisterRead { .. } => log::Level::Trace,
            SccEvent::FrameDropped { .. } => log::Level::Warn,
            _ => log::Level::Debug,
        }
    }
}

impl fmt::Display for SccEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SccEvent::RegisterWrite {
                channel,
                reg,
                value,
            } => write!(f, "write chan {channel} reg {reg} val 0x{value:02X}"),
            SccEvent::RegisterRead {
                channel,
                reg,
                value,
            } => write!(f, "read chan {channel} reg {reg} val 0x{value:02X}"),
            SccEvent::InterruptRaised { channel, pending } => {
                write!(f, "int raised by chan {channel}, pending 0x{pending:02X}")
            }
            SccEvent::InterruptAcknowledged { code, vector } => {
                write!(f, "int acknowledged, code {code} vector 0x{vector:02X}")
            }
            SccEvent::FrameQueued {
                channel,
                slot,
                len,
                wire_delay,
                queued_ahead,
            } => write!(
                f,
                "chan {channel} frame queued in slot {slot}, len={len} delay={wire_delay}, {queued_ahead} other frames in queue"
            ),
            SccEvent::FrameDropped { channel, len } => {
                write!(f, "chan {channel} receive queue full, dropped {len} byte frame")
            }
            SccEvent::FrameAccepted {
                channel,
                slot,
                address,
            } => write!(f, "chan {channel} accepted slot {slot} for address 0x{address:02X}"),
            SccEvent::FrameRejected {
                channel,
                slot,
                address,
            } => write!(
                f,
                "chan {channel} ignored slot {slot}: address 0x{address:02X} is not for us"
            ),
            SccEvent::EndOfFrame { channel } => write!(f, "chan {channel} end of frame"),
            SccEvent::FrameTransmitted { channel, len } => {
                write!(f, "chan {channel} transmitted {len} byte frame")
            }
        }
    }
}

/// Receiver for [`SccEvent`]s, for hosts that want more than the log.
pub trait SccObserver {
    fn on_event(&mut self, event: &SccEvent);
}

impl<F: FnMut(&SccEvent)> SccObserver for F {
    fn on_event(&mut self, event: &SccEvent) {
        self(event)
    }
}
