//! Collaborators the chip calls out to.
//!
//! The host emulator owns the interrupt line and the network backend. The
//! chip only ever pushes into them; nothing here is read back for control
//! flow.
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// The CPU interrupt input the chip drives.
pub trait InterruptLine {
    /// Assert the line because an enabled cause is pending.
    fn assert_interrupt(&mut self);
}

/// Network backend that accepts completed outgoing frames.
///
/// Delivery is fire-and-forget: there is no acknowledgement path back into
/// the chip.
pub trait FrameTransport {
    fn send_frame(&mut self, frame: &[u8]);
}

impl InterruptLine for () {
    fn assert_interrupt(&mut self) {}
}

impl FrameTransport for () {
    fn send_frame(&mut self, _frame: &[u8]) {}
}

impl<L: InterruptLine + ?Sized> InterruptLine for &mut L {
    fn assert_interrupt(&mut self) {
        (**self).assert_interrupt()
    }
}

impl<L: InterruptLine + ?Sized> InterruptLine for Box<L> {
    fn assert_interrupt(&mut self) {
        (**self).assert_interrupt()
    }
}

impl<L: InterruptLine + ?Sized> InterruptLine for Rc<RefCell<L>> {
    fn assert_interrupt(&mut self) {
        self.borrow_mut().assert_interrupt()
    }
}

impl<T: FrameTransport + ?Sized> FrameTransport for &mut T {
    fn send_frame(&mut self, frame: &[u8]) {
        (**self).send_frame(frame)
    }
}

impl<T: FrameTransport + ?Sized> FrameTransport for Box<T> {
    fn send_frame(&mut self, frame: &[u8]) {
        (**self).send_frame(frame)
    }
}

impl<T: FrameTransport + ?Sized> FrameTransport for Rc<RefCell<T>> {
    fn send_frame(&mut self, frame: &[u8]) {
        self.borrow_mut().send_frame(frame)
    }
}

/// Collect frames in send order.
impl FrameTransport for Vec<Vec<u8>> {
    fn send_frame(&mut self, frame: &[u8]) {
        self.push(frame.to_vec());
    }
}

/// Collect frames as an outbox the host drains from the front.
impl FrameTransport for VecDeque<Vec<u8>> {
    fn send_frame(&mut self, frame: &[u8]) {
        self.push_back(frame.to_vec());
    }
}
