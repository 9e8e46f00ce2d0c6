use sccnet_common::Channel;
use thiserror::Error;

/// Reasons a frame handed to the chip by the network backend was not queued.
///
/// Register accesses never fail; only frame arrival can lose data.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum SccError {
    #[error("receive queue of channel {channel} is full ({depth} frames pending)")]
    QueueFull { channel: Channel, depth: usize },
    #[error("frame of {len} bytes does not fit a {max}-byte receive slot")]
    FrameTooLong { len: usize, max: usize },
    #[error("refusing to queue an empty frame")]
    EmptyFrame,
}
