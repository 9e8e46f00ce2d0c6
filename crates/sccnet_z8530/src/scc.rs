//! Zilog 8530 Serial Communications Controller.
//!
//! Both channels carry the register file the classic Mac drivers touch, a
//! four-slot SDLC receive queue and a transmit buffer flushed on underrun.
//! Time only advances through [`Scc::tick`]; the bus entry points
//! ([`Scc::read`], [`Scc::write`]) and the host inputs ([`Scc::set_dcd`],
//! [`Scc::set_cts`], [`Scc::receive_frame`]) run to completion and apply
//! all their side effects before returning.
use sccnet_common::{
    Channel, FrameTransport, HexDump, InterruptLine, SccConfig, SccEvent, SccObserver,
};

use crate::error::SccError;
use rx::FRAME_TRAILER;

mod channel;
mod framing;
mod interrupts;
pub mod regs;
mod rx;
mod tick;
mod tx;

pub use channel::SccStats;

use channel::ChannelState;
use regs::{Pending, Wr1, Wr15, Wr9};

pub struct Scc<I: InterruptLine = (), T: FrameTransport = ()> {
    config: SccConfig,
    /// Register selected by the last WR0 for the next control access.
    reg_ptr: u8,
    pending: Pending,
    /// Pending vector as of the last assertion. Diagnostics only.
    pending_shadow: Pending,
    channels: [ChannelState; 2],
    /// Interrupt vector base.
    wr2: u8,
    wr9: Wr9,
    irq: I,
    transport: T,
    observer: Option<Box<dyn SccObserver>>,
}

impl<I: InterruptLine, T: FrameTransport> Scc<I, T> {
    pub fn new(irq: I, transport: T) -> Self {
        Self::with_config(SccConfig::default(), irq, transport)
    }

    /// Power-on state: DCD high on both channels, transmitters idle, every
    /// receive slot free.
    pub fn with_config(config: SccConfig, irq: I, transport: T) -> Self {
        let channels = [ChannelState::new(&config), ChannelState::new(&config)];
        let mut scc = Self {
            config,
            reg_ptr: 0,
            pending: Pending::empty(),
            pending_shadow: Pending::empty(),
            channels,
            wr2: 0,
            wr9: Wr9::empty(),
            irq,
            transport,
            observer: None,
        };
        for channel in Channel::ALL {
            scc.set_dcd(channel, true);
        }
        scc
    }

    /// Install an observer that sees every [`SccEvent`].
    pub fn set_observer(&mut self, observer: impl SccObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Data-carrier-detect input changed. An edge raises the channel's
    /// external/status cause when WR15 enables DCD interrupts.
    pub fn set_dcd(&mut self, channel: Channel, asserted: bool) {
        let ch = &mut self.channels[channel.index()];
        let changed = ch.dcd != asserted;
        ch.dcd = asserted;
        if changed && ch.wr15.contains(Wr15::DCD) {
            self.signal(Pending::ext(channel), channel);
        }
    }

    /// Clear-to-send input changed. Same rules as DCD with the WR15 CTS
    /// enable.
    pub fn set_cts(&mut self, channel: Channel, asserted: bool) {
        let ch = &mut self.channels[channel.index()];
        let changed = ch.cts != asserted;
        ch.cts = asserted;
        if changed && ch.wr15.contains(Wr15::CTS) {
            self.signal(Pending::ext(channel), channel);
        }
    }

    /// Queue a frame from the network. It becomes visible to software after
    /// `wire_delay` ticks, once every frame queued before it has been read.
    /// A `wire_delay` of 0 counts as 1: arrival always happens on a tick, so
    /// the frame is never readable before the next [`Scc::tick`].
    pub fn receive_frame(
        &mut self,
        channel: Channel,
        frame: &[u8],
        wire_delay: u32,
    ) -> Result<(), SccError> {
        if frame.is_empty() {
            return Err(SccError::EmptyFrame);
        }
        let max = self.config.max_frame_len.saturating_sub(FRAME_TRAILER.len());
        if frame.len() > max {
            return Err(SccError::FrameTooLong {
                len: frame.len(),
                max,
            });
        }

        let ch = &mut self.channels[channel.index()];
        match ch.rx.enqueue(frame, wire_delay) {
            Some((slot, queued_ahead)) => {
                ch.stats.frames_queued += 1;
                log::trace!("SCC chan {channel}: queued\n{}", HexDump(frame));
                self.emit(SccEvent::FrameQueued {
                    channel,
                    slot,
                    len: frame.len(),
                    wire_delay,
                    queued_ahead,
                });
                Ok(())
            }
            None => {
                let depth = ch.rx.depth();
                ch.stats.frames_dropped += 1;
                self.emit(SccEvent::FrameDropped {
                    channel,
                    len: frame.len(),
                });
                Err(SccError::QueueFull { channel, depth })
            }
        }
    }

    pub(crate) fn emit(&mut self, event: SccEvent) {
        log::log!(event.level(), "SCC: {event}");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }

    pub fn config(&self) -> &SccConfig {
        &self.config
    }

    pub fn irq(&self) -> &I {
        &self.irq
    }

    pub fn irq_mut(&mut self) -> &mut I {
        &mut self.irq
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// RR3 contents, without going through the bus.
    pub fn pending(&self) -> Pending {
        self.pending
    }

    /// Pending vector as of the last time the line was asserted.
    pub fn last_signalled(&self) -> Pending {
        self.pending_shadow
    }

    pub fn wr1(&self, channel: Channel) -> Wr1 {
        self.channels[channel.index()].wr1
    }

    pub fn wr2(&self) -> u8 {
        self.wr2
    }

    pub fn wr9(&self) -> Wr9 {
        self.wr9
    }

    pub fn wr15(&self, channel: Channel) -> Wr15 {
        self.channels[channel.index()].wr15
    }

    pub fn sdlc_address(&self, channel: Channel) -> u8 {
        self.channels[channel.index()].sdlc_address
    }

    pub fn is_hunting(&self, channel: Channel) -> bool {
        self.channels[channel.index()].hunting
    }

    pub fn dcd(&self, channel: Channel) -> bool {
        self.channels[channel.index()].dcd
    }

    pub fn cts(&self, channel: Channel) -> bool {
        self.channels[channel.index()].cts
    }

    /// Set when end-of-frame was signalled for the frame being read;
    /// cleared once it has been drained.
    pub fn end_of_frame_pending(&self, channel: Channel) -> bool {
        self.channels[channel.index()].eof_int_pending
    }

    /// Receive slots currently holding a frame.
    pub fn rx_frames_queued(&self, channel: Channel) -> usize {
        self.channels[channel.index()].rx.occupied()
    }

    /// Bytes written to the data register and not yet sent.
    pub fn tx_pending(&self, channel: Channel) -> &[u8] {
        self.channels[channel.index()].tx.pending()
    }

    pub fn stats(&self, channel: Channel) -> &SccStats {
        &self.channels[channel.index()].stats
    }
}

impl Default for Scc {
    fn default() -> Self {
        Self::new((), ())
    }
}

#[cfg(test)]
mod tests;
