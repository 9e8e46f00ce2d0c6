use typed_builder::TypedBuilder;

/// Number of receive slots per channel.
pub const DEFAULT_RX_SLOTS: usize = 4;
/// Bytes a single receive slot or the transmit buffer can hold, including
/// the three synthesized trailer bytes on receive.
pub const DEFAULT_MAX_FRAME_LEN: usize = 8192;
/// Ticks the transmitter spends shifting out one data byte.
pub const DEFAULT_TX_BYTE_TICKS: u32 = 30;
/// Ticks per received byte before end-of-frame is signalled.
pub const DEFAULT_EOF_TICKS_PER_BYTE: u32 = 3;

/// Tunables of the chip model.
///
/// All fields default to the values the LocalTalk driver timing was tuned
/// against, so `SccConfig::default()` is what a host normally wants.
#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct SccConfig {
    #[builder(default = DEFAULT_RX_SLOTS)]
    pub rx_slots: usize,
    #[builder(default = DEFAULT_MAX_FRAME_LEN)]
    pub max_frame_len: usize,
    #[builder(default = DEFAULT_TX_BYTE_TICKS)]
    pub tx_byte_ticks: u32,
    #[builder(default = DEFAULT_EOF_TICKS_PER_BYTE)]
    pub eof_ticks_per_byte: u32,
}

impl Default for SccConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
