//! Receive queue.
//!
//! A fixed ring of slots per channel. Frames are allocated into the first
//! free slot walking forward from the cursor and drained only at the
//! cursor, so arrival order is preserved. Only the slot under the cursor
//! counts down its wire delay; queued slots wait their turn.

/// Bytes appended to every received frame: two CRC filler bytes and the
/// zero byte standing in for the closing abort sequence.
pub(super) const FRAME_TRAILER: [u8; 3] = [0xA5, 0xA5, 0x00];

#[derive(Default)]
struct RxSlot {
    occupied: bool,
    /// Ticks until the frame becomes readable. Meaningless when free.
    countdown: u32,
    data: Vec<u8>,
}

impl RxSlot {
    #[inline]
    fn ready(&self) -> bool {
        self.occupied && self.countdown == 0
    }
}

pub(super) struct RxQueue {
    slots: Vec<RxSlot>,
    cursor: usize,
    /// Read position inside the slot under the cursor.
    read_pos: usize,
}

impl RxQueue {
    pub(super) fn new(depth: usize) -> Self {
        Self {
            slots: (0..depth.max(1)).map(|_| RxSlot::default()).collect(),
            cursor: 0,
            read_pos: 0,
        }
    }

    #[inline]
    pub(super) fn depth(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(super) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(super) fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.occupied).count()
    }

    /// Store `frame` plus the trailer in the next free slot.
    ///
    /// Returns the slot index and how many occupied slots were skipped to
    /// find it, or `None` when every slot is taken. A wire delay of 0 is
    /// treated as 1 so the ready edge is always produced by a tick.
    pub(super) fn enqueue(&mut self, frame: &[u8], wire_delay: u32) -> Option<(usize, usize)> {
        let depth = self.depth();
        let (ahead, index) = (0..depth)
            .map(|n| (n, (self.cursor + n) % depth))
            .find(|&(_, index)| !self.slots[index].occupied)?;

        let slot = &mut self.slots[index];
        slot.occupied = true;
        slot.countdown = wire_delay.max(1);
        slot.data.clear();
        slot.data.extend_from_slice(frame);
        slot.data.extend_from_slice(&FRAME_TRAILER);
        Some((index, ahead))
    }

    /// Advance the active slot's arrival countdown.
    ///
    /// Returns `true` exactly once per frame: on the tick the countdown
    /// reaches zero.
    pub(super) fn tick(&mut self) -> bool {
        let slot = &mut self.slots[self.cursor];
        if slot.occupied && slot.countdown > 0 {
            slot.countdown -= 1;
            return slot.countdown == 0;
        }
        false
    }

    #[inline]
    pub(super) fn has_byte(&self) -> bool {
        self.slots[self.cursor].ready()
    }

    /// Unread bytes in the active slot, 0 when it is not readable.
    pub(super) fn bytes_left(&self) -> usize {
        let slot = &self.slots[self.cursor];
        if !slot.ready() {
            return 0;
        }
        slot.data.len() - self.read_pos
    }

    /// Bytes of the active slot, trailer included.
    #[inline]
    pub(super) fn active_frame(&self) -> &[u8] {
        &self.slots[self.cursor].data
    }

    /// Pop the next byte of the active slot together with the number of
    /// bytes still unread after it. Draining the last byte frees the slot
    /// and moves the cursor on.
    pub(super) fn pop(&mut self) -> Option<(u8, usize)> {
        if !self.has_byte() {
            return None;
        }
        let slot = &self.slots[self.cursor];
        let byte = slot.data[self.read_pos];
        self.read_pos += 1;
        let left = slot.data.len() - self.read_pos;
        if left == 0 {
            self.discard_active();
        }
        Some((byte, left))
    }

    pub(super) fn rewind(&mut self) {
        self.read_pos = 0;
    }

    /// Free the active slot without delivering the rest of it.
    pub(super) fn discard_active(&mut self) {
        let slot = &mut self.slots[self.cursor];
        slot.occupied = false;
        slot.countdown = 0;
        slot.data.clear();
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.read_pos = 0;
    }

    #[cfg(test)]
    pub(super) fn slot_data(&self, index: usize) -> Option<&[u8]> {
        let slot = self.slots.get(index)?;
        slot.occupied.then_some(slot.data.as_slice())
    }
}
