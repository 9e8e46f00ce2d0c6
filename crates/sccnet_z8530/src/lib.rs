mod error;
mod scc;

pub use error::SccError;
pub use scc::regs;
pub use scc::{Scc, SccStats};

pub use sccnet_common::{
    Channel, FrameTransport, HexDump, InterruptLine, SccConfig, SccEvent, SccObserver,
};

/// First-byte address every node accepts.
pub const BROADCAST_ADDRESS: u8 = 0xFF;
