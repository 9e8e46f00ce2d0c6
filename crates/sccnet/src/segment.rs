//! A shared LocalTalk cable.
//!
//! Every node is one SCC channel. Whatever a node transmits is delivered to
//! every other node on the segment after a wire delay proportional to the
//! frame length; address filtering is left to each receiver's hunt logic.
use std::collections::VecDeque;

use anyhow::{Context, Result};
use sccnet_common::{Channel, SccConfig};
use sccnet_z8530::{Scc, SccError};
use typed_builder::TypedBuilder;

use crate::IrqLatch;

/// Chip type hosted by a segment node: latched interrupt line, outbox
/// drained by the segment after every tick.
pub type NodeScc = Scc<IrqLatch, VecDeque<Vec<u8>>>;

#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct SegmentConfig {
    /// Ticks a byte spends on the wire.
    #[builder(default = 3)]
    pub wire_ticks_per_byte: u32,
    /// Floor for the wire delay of very short frames.
    #[builder(default = 1)]
    pub min_wire_delay: u32,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

pub struct Node {
    pub scc: NodeScc,
    /// The channel wired to the cable.
    pub channel: Channel,
}

impl Node {
    /// Service the interrupt line the way a CPU polls it between
    /// instructions.
    pub fn take_interrupt(&mut self) -> bool {
        self.scc.irq_mut().take()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SegmentStats {
    pub frames_sent: u64,
    /// Frame copies handed to a receiver.
    pub frames_delivered: u64,
    /// Frame copies a receiver had no free slot for or refused outright.
    pub frames_lost: u64,
}

#[derive(Default)]
pub struct Segment {
    config: SegmentConfig,
    nodes: Vec<Node>,
    ticks: u64,
    stats: SegmentStats,
}

impl Segment {
    pub fn new(config: SegmentConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Plug a fresh chip into the cable on `channel`.
    pub fn attach(&mut self, channel: Channel, config: SccConfig) -> NodeId {
        let id = NodeId(self.nodes.len());
        log::debug!("segment: node {} attached on channel {channel}", id.0);
        self.nodes.push(Node {
            scc: Scc::with_config(config, IrqLatch::default(), VecDeque::new()),
            channel,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    pub fn stats(&self) -> &SegmentStats {
        &self.stats
    }

    /// Ticks run since the segment was created.
    pub fn elapsed(&self) -> u64 {
        self.ticks
    }

    pub fn wire_delay(&self, len: usize) -> u32 {
        let ticks = u32::try_from(len)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.config.wire_ticks_per_byte);
        ticks.max(self.config.min_wire_delay)
    }

    /// Advance every node by one tick, then put whatever they sent on the
    /// wire.
    pub fn tick(&mut self) -> Result<()> {
        for node in &mut self.nodes {
            node.scc.tick();
        }
        self.ticks += 1;
        self.propagate()
    }

    pub fn run(&mut self, ticks: u32) -> Result<()> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    /// Tick until `done` holds, giving up after `limit` ticks. Returns the
    /// number of ticks taken.
    pub fn run_until(
        &mut self,
        limit: u32,
        mut done: impl FnMut(&mut Segment) -> bool,
    ) -> Result<Option<u32>> {
        for n in 0..limit {
            if done(self) {
                return Ok(Some(n));
            }
            self.tick()?;
        }
        Ok(done(self).then_some(limit))
    }

    /// Drain every node's outbox onto the cable.
    ///
    /// Frames sent on the same tick are delivered in node order. A receiver
    /// refusing a frame does not keep it from the others: every outbox is
    /// drained and every node offered the frame before the first refusal is
    /// returned.
    pub fn propagate(&mut self) -> Result<()> {
        let mut refused = None;
        for src in 0..self.nodes.len() {
            while let Some(frame) = self.nodes[src].scc.transport_mut().pop_front() {
                self.stats.frames_sent += 1;
                let delay = self.wire_delay(frame.len());
                log::debug!(
                    "segment: node {src} sent {} bytes, wire delay {delay}",
                    frame.len()
                );
                for dst in (0..self.nodes.len()).filter(|&dst| dst != src) {
                    if let Err(err) = self.deliver(NodeId(dst), &frame, delay) {
                        log::warn!("segment: node {dst} refused frame from node {src}: {err}");
                        self.stats.frames_lost += 1;
                        if refused.is_none() {
                            refused = Some(anyhow::Error::new(err).context(format!(
                                "delivering frame from node {src} to node {dst}"
                            )));
                        }
                    }
                }
            }
        }
        match refused {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Hand a frame to one node as if it had come off the cable from a
    /// station outside the segment.
    pub fn inject(&mut self, id: NodeId, frame: &[u8]) -> Result<()> {
        let delay = self.wire_delay(frame.len());
        self.deliver(id, frame, delay).with_context(|| {
            format!("injecting {} byte frame into node {}", frame.len(), id.0)
        })
    }

    fn deliver(&mut self, id: NodeId, frame: &[u8], delay: u32) -> Result<(), SccError> {
        let node = &mut self.nodes[id.0];
        match node.scc.receive_frame(node.channel, frame, delay) {
            Ok(()) => {
                self.stats.frames_delivered += 1;
                Ok(())
            }
            Err(SccError::QueueFull { channel, depth }) => {
                // A busy receiver misses the frame, like a real collision.
                log::warn!(
                    "segment: node {} channel {channel} has all {depth} slots busy, frame lost",
                    id.0
                );
                self.stats.frames_lost += 1;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
