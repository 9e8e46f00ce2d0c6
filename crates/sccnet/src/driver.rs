//! What the guest's LocalTalk driver does through the bus.
//!
//! Handy for hosts and tests that want traffic on a segment without running
//! real guest code. Every access goes through [`Scc::read`] and
//! [`Scc::write`], so side effects are the same as for emulated software.
//!
//! [`Scc::read`]: sccnet_z8530::Scc::read
//! [`Scc::write`]: sccnet_z8530::Scc::write
use sccnet_z8530::regs::{control_address, data_address, Rr0, Wr1, Wr15, Wr9, WR3_ENTER_HUNT};
use sccnet_z8530::Channel;

use crate::Node;

/// WR0 value pointing the next control access at `reg`.
fn pointer(reg: u8) -> u8 {
    if reg >= 8 {
        0x08 | (reg & 0x07)
    } else {
        reg
    }
}

pub fn write_reg(node: &mut Node, reg: u8, value: u8) {
    let ctrl = control_address(node.channel);
    if reg != 0 {
        node.scc.write(ctrl, pointer(reg));
    }
    node.scc.write(ctrl, value);
}

pub fn read_reg(node: &mut Node, reg: u8) -> u8 {
    let ctrl = control_address(node.channel);
    if reg != 0 {
        node.scc.write(ctrl, pointer(reg));
    }
    node.scc.read(ctrl)
}

pub fn rr0(node: &mut Node) -> Rr0 {
    Rr0::from_bits_retain(read_reg(node, 0))
}

/// Take node address `address`, enable interrupts with a receive interrupt
/// on every character, and start hunting.
pub fn open(node: &mut Node, address: u8) {
    write_reg(node, 6, address);
    write_reg(node, 1, (Wr1::INT_ENABLE | Wr1::RX_INT_MODE_HI).bits());
    write_reg(node, 15, (Wr15::SYNC_HUNT | Wr15::BREAK_ABORT).bits());
    write_reg(node, 3, WR3_ENTER_HUNT);
}

/// Load a frame into the transmitter. It goes out once the underrun
/// countdown runs out.
pub fn send(node: &mut Node, frame: &[u8]) {
    let data = data_address(node.channel);
    for &byte in frame {
        node.scc.write(data, byte);
    }
}

/// Read the frame under the receive cursor, trailer included. `None` when
/// nothing is readable yet.
pub fn receive(node: &mut Node) -> Option<Vec<u8>> {
    let data = data_address(node.channel);
    let mut frame = Vec::new();
    while rr0(node).contains(Rr0::RX_AVAILABLE) {
        frame.push(node.scc.read(data));
    }
    (!frame.is_empty()).then_some(frame)
}

/// Acknowledge pending interrupts through RR2 on channel B until the chip
/// reports nothing left, returning the status codes in service order.
pub fn service_interrupts(node: &mut Node) -> Vec<u8> {
    let ctrl = control_address(Channel::B);
    let shift = if node.scc.wr9().contains(Wr9::STATUS_HIGH) {
        4
    } else {
        1
    };
    let mut codes = Vec::new();
    loop {
        node.scc.write(ctrl, pointer(2));
        let vector = node.scc.read(ctrl);
        let code = (vector >> shift) & 0x07;
        if code == 0 {
            break;
        }
        codes.push(code);
    }
    node.take_interrupt();
    codes
}
