use sccnet_common::InterruptLine;

/// Interrupt input of an emulated CPU: latches assertions until the CPU
/// gets around to servicing them.
#[derive(Debug, Default)]
pub struct IrqLatch {
    asserted: bool,
    count: u64,
}

impl IrqLatch {
    /// Returns whether the line was asserted since the last call, clearing
    /// the latch.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.asserted)
    }

    #[inline]
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Assertions since power-on.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl InterruptLine for IrqLatch {
    fn assert_interrupt(&mut self) {
        self.asserted = true;
        self.count += 1;
    }
}
