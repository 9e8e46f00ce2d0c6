//! Host-side glue for the SCC model: an in-process LocalTalk segment.
pub mod driver;
mod irq;
pub mod llap;
mod segment;

pub use irq::IrqLatch;
pub use segment::{Node, NodeId, NodeScc, Segment, SegmentConfig, SegmentStats};

pub use sccnet_z8530::{regs, Channel, HexDump, Scc, SccConfig, SccError, SccEvent};
