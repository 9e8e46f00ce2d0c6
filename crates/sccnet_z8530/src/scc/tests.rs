use std::cell::RefCell;
use std::rc::Rc;

use super::regs::{control_address, data_address, Pending, Rr0, Rr1, WR3_ENTER_HUNT};
use super::*;

#[derive(Default)]
struct IrqCount(u32);

impl InterruptLine for IrqCount {
    fn assert_interrupt(&mut self) {
        self.0 += 1;
    }
}

type TestScc = Scc<IrqCount, Vec<Vec<u8>>>;

fn new_scc() -> TestScc {
    let _ = env_logger::builder().is_test(true).try_init();
    Scc::new(IrqCount::default(), Vec::new())
}

/// WR0 value that points the next control access at `reg`.
fn pointer(reg: u8) -> u8 {
    if reg >= 8 {
        (reg & 0x07) | 0x08
    } else {
        reg
    }
}

fn write_reg(scc: &mut TestScc, channel: Channel, reg: u8, value: u8) {
    let ctrl = control_address(channel);
    if reg != 0 {
        scc.write(ctrl, pointer(reg));
    }
    scc.write(ctrl, value);
}

fn read_reg(scc: &mut TestScc, channel: Channel, reg: u8) -> u8 {
    let ctrl = control_address(channel);
    if reg != 0 {
        scc.write(ctrl, pointer(reg));
    }
    scc.read(ctrl)
}

fn rr0(scc: &mut TestScc, channel: Channel) -> Rr0 {
    Rr0::from_bits_retain(read_reg(scc, channel, 0))
}

fn rr1(scc: &mut TestScc, channel: Channel) -> Rr1 {
    Rr1::from_bits_retain(read_reg(scc, channel, 1))
}

fn read_data(scc: &mut TestScc, channel: Channel) -> u8 {
    scc.read(data_address(channel))
}

fn ticks(scc: &mut TestScc, n: u32) {
    for _ in 0..n {
        scc.tick();
    }
}

/// Program a channel the way the LocalTalk driver does before receiving.
fn setup_receiver(scc: &mut TestScc, channel: Channel, address: u8, wr1: u8) {
    write_reg(scc, channel, 6, address);
    write_reg(scc, channel, 1, wr1);
    write_reg(scc, channel, 3, WR3_ENTER_HUNT);
}

fn drain(scc: &mut TestScc, channel: Channel) -> Vec<u8> {
    let mut out = Vec::new();
    while rr0(scc, channel).contains(Rr0::RX_AVAILABLE) {
        out.push(read_data(scc, channel));
    }
    out
}

#[test]
fn power_on_state() {
    let mut scc = new_scc();
    for channel in Channel::ALL {
        assert!(scc.dcd(channel));
        assert!(!scc.cts(channel));
        assert!(!scc.is_hunting(channel));
        assert_eq!(rr0(&mut scc, channel).bits(), 0x8C);
        assert_eq!(scc.rx_frames_queued(channel), 0);
    }
    assert!(scc.pending().is_empty());
    assert_eq!(scc.irq().0, 0);
}

#[test]
fn pass_through_registers_read_back() {
    let mut scc = new_scc();
    for (channel, seed) in [(Channel::A, 0x10u8), (Channel::B, 0x20u8)] {
        write_reg(&mut scc, channel, 1, seed | 0x08);
        write_reg(&mut scc, channel, 6, seed | 0x06);
        write_reg(&mut scc, channel, 15, seed | 0x80);
        assert_eq!(scc.wr1(channel).bits(), seed | 0x08);
        assert_eq!(scc.sdlc_address(channel), seed | 0x06);
        assert_eq!(scc.wr15(channel).bits(), seed | 0x80);
        assert_eq!(read_reg(&mut scc, channel, 15), seed | 0x80);
    }

    write_reg(&mut scc, Channel::B, 2, 0x5A);
    write_reg(&mut scc, Channel::A, 9, 0x0A);
    assert_eq!(scc.wr2(), 0x5A);
    assert_eq!(scc.wr9().bits(), 0x0A);
    assert_eq!(read_reg(&mut scc, Channel::A, 2), 0x5A);
}

#[test]
fn control_pointer_is_consumed_by_one_access() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::A, 15, 0x88);

    scc.write(control_address(Channel::A), pointer(15));
    assert_eq!(scc.read(control_address(Channel::A)), 0x88);
    // Pointer fell back to 0: this is RR0 again.
    assert_eq!(scc.read(control_address(Channel::A)), 0x8C);
}

#[test]
fn data_port_does_not_consume_pointer() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::B, 15, 0x08);
    scc.write(control_address(Channel::B), pointer(15));
    assert_eq!(read_data(&mut scc, Channel::B), 0);
    assert_eq!(scc.read(control_address(Channel::B)), 0x08);
}

#[test]
fn unmapped_registers_read_ff() {
    let mut scc = new_scc();
    for reg in [4u8, 5, 6, 7, 9, 11, 12, 13, 14] {
        assert_eq!(read_reg(&mut scc, Channel::A, reg), 0xFF, "reg {reg}");
    }
    assert_eq!(read_reg(&mut scc, Channel::A, 10), 0);
    assert_eq!(read_reg(&mut scc, Channel::B, 3), 0);
}

#[test]
fn frame_readable_after_exact_wire_delay() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::B, 0x22, 0x00);
    scc.receive_frame(Channel::B, &[0x22, 0x01, 0x02], 5).unwrap();

    ticks(&mut scc, 4);
    assert!(!rr0(&mut scc, Channel::B).contains(Rr0::RX_AVAILABLE));

    scc.tick();
    assert!(rr0(&mut scc, Channel::B).contains(Rr0::RX_AVAILABLE));
    assert_eq!(read_data(&mut scc, Channel::B), 0x22);
}

#[test]
fn zero_wire_delay_arrives_on_next_tick() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::A, 0x22, 0x00);
    scc.receive_frame(Channel::A, &[0x22], 0).unwrap();
    assert!(!rr0(&mut scc, Channel::A).contains(Rr0::RX_AVAILABLE));
    scc.tick();
    assert!(rr0(&mut scc, Channel::A).contains(Rr0::RX_AVAILABLE));
}

#[test]
fn broadcast_is_accepted_regardless_of_address() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::A, 0x22, 0x00);
    scc.receive_frame(Channel::A, &[0xFF, 0x01, 0x0A], 1).unwrap();
    scc.tick();

    assert!(!scc.is_hunting(Channel::A));
    assert_eq!(
        drain(&mut scc, Channel::A),
        vec![0xFF, 0x01, 0x0A, 0xA5, 0xA5, 0x00]
    );
    assert_eq!(scc.stats(Channel::A).frames_accepted, 1);
}

#[test]
fn frame_for_other_node_never_surfaces() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::B, 0x22, 0x00);
    scc.receive_frame(Channel::B, &[0x33, 0x01, 0x0A], 3).unwrap();
    ticks(&mut scc, 10);

    assert!(!rr0(&mut scc, Channel::B).contains(Rr0::RX_AVAILABLE));
    assert_eq!(read_data(&mut scc, Channel::B), 0);
    assert!(scc.is_hunting(Channel::B));
    assert_eq!(scc.rx_frames_queued(Channel::B), 0);
    assert_eq!(scc.stats(Channel::B).frames_rejected, 1);
}

#[test]
fn rejected_frame_lets_next_one_through() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::B, 0x22, 0x00);
    scc.receive_frame(Channel::B, &[0x33, 0xAA], 2).unwrap();
    scc.receive_frame(Channel::B, &[0x22, 0xBB], 2).unwrap();

    ticks(&mut scc, 2);
    assert!(!rr0(&mut scc, Channel::B).contains(Rr0::RX_AVAILABLE));
    ticks(&mut scc, 2);
    assert_eq!(
        drain(&mut scc, Channel::B),
        vec![0x22, 0xBB, 0xA5, 0xA5, 0x00]
    );
}

#[test]
fn frame_delivered_unchecked_when_not_hunting() {
    let mut scc = new_scc();
    // Receiver never put into hunt mode.
    write_reg(&mut scc, Channel::B, 6, 0x22);
    scc.receive_frame(Channel::B, &[0x33, 0x44], 1).unwrap();
    scc.tick();
    assert_eq!(read_data(&mut scc, Channel::B), 0x33);
    assert_eq!(scc.stats(Channel::B).frames_rejected, 0);
}

#[test]
fn reading_last_byte_clears_available_and_hunts() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::B, 0x22, 0x00);
    scc.receive_frame(Channel::B, &[0x22, 0x10, 0x20], 1).unwrap();
    scc.tick();
    assert!(!scc.is_hunting(Channel::B));

    let mut bytes = Vec::new();
    for _ in 0..3 {
        assert!(!rr0(&mut scc, Channel::B).contains(Rr0::BREAK_ABORT));
        bytes.push(read_data(&mut scc, Channel::B));
    }
    // Two CRC filler bytes and the abort marker remain.
    bytes.push(read_data(&mut scc, Channel::B));
    assert!(rr0(&mut scc, Channel::B).contains(Rr0::BREAK_ABORT));
    assert!(!rr1(&mut scc, Channel::B).contains(Rr1::END_OF_FRAME));
    bytes.push(read_data(&mut scc, Channel::B));
    assert!(rr1(&mut scc, Channel::B).contains(Rr1::END_OF_FRAME));
    assert!(scc.is_hunting(Channel::B));
    bytes.push(read_data(&mut scc, Channel::B));

    assert_eq!(bytes, vec![0x22, 0x10, 0x20, 0xA5, 0xA5, 0x00]);
    let status = rr0(&mut scc, Channel::B);
    assert!(!status.contains(Rr0::RX_AVAILABLE));
    assert!(status.contains(Rr0::SYNC_HUNT));
    assert_eq!(scc.rx_frames_queued(Channel::B), 0);
}

#[test]
fn rr1_reports_residue_code() {
    let mut scc = new_scc();
    assert_eq!(read_reg(&mut scc, Channel::A, 1), 0x07);
}

#[test]
fn fifth_pending_frame_is_rejected() {
    let mut scc = new_scc();
    for n in 0..4u8 {
        scc.receive_frame(Channel::A, &[0x22, n], 100).unwrap();
    }
    let err = scc.receive_frame(Channel::A, &[0x22, 9], 100).unwrap_err();
    assert_eq!(
        err,
        SccError::QueueFull {
            channel: Channel::A,
            depth: 4
        }
    );

    let rx = &scc.channels[Channel::A.index()].rx;
    for n in 0..4u8 {
        assert_eq!(rx.slot_data(n as usize), Some(&[0x22, n, 0xA5, 0xA5, 0x00][..]));
    }
    assert_eq!(scc.stats(Channel::A).frames_dropped, 1);
    assert_eq!(scc.stats(Channel::A).frames_queued, 4);
    // The other channel has its own queue.
    assert!(scc.receive_frame(Channel::B, &[0x22], 1).is_ok());
}

#[test]
fn freed_slot_is_reused_after_drain() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::A, 0x22, 0x00);
    for n in 0..4u8 {
        scc.receive_frame(Channel::A, &[0x22, n], 1).unwrap();
    }
    scc.tick();
    assert_eq!(drain(&mut scc, Channel::A)[1], 0);
    scc.receive_frame(Channel::A, &[0x22, 4], 1).unwrap();
    assert_eq!(scc.rx_frames_queued(Channel::A), 4);

    let mut seconds = Vec::new();
    for _ in 0..4 {
        scc.tick();
        seconds.push(drain(&mut scc, Channel::A)[1]);
    }
    assert_eq!(seconds, vec![1, 2, 3, 4]);
}

#[test]
fn queued_frame_waits_for_active_one() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::B, 0x22, 0x00);
    scc.receive_frame(Channel::B, &[0x22, 0x01], 2).unwrap();
    scc.receive_frame(Channel::B, &[0x22, 0x02], 2).unwrap();

    ticks(&mut scc, 50);
    assert_eq!(drain(&mut scc, Channel::B)[1], 0x01);
    assert!(!rr0(&mut scc, Channel::B).contains(Rr0::RX_AVAILABLE));

    ticks(&mut scc, 1);
    assert!(!rr0(&mut scc, Channel::B).contains(Rr0::RX_AVAILABLE));
    ticks(&mut scc, 1);
    assert_eq!(drain(&mut scc, Channel::B)[1], 0x02);
}

#[test]
fn invalid_frames_are_refused() {
    let mut scc = new_scc();
    assert_eq!(
        scc.receive_frame(Channel::A, &[], 1),
        Err(SccError::EmptyFrame)
    );
    let big = vec![0x22; 8190];
    assert_eq!(
        scc.receive_frame(Channel::A, &big, 1),
        Err(SccError::FrameTooLong {
            len: 8190,
            max: 8189
        })
    );
    assert!(scc.receive_frame(Channel::A, &big[..8189], 1).is_ok());
}

#[test]
fn transmit_flushes_once_on_underrun() {
    let mut scc = new_scc();
    let data = data_address(Channel::A);
    for byte in [0x22, 0x11, 0x01, 0xC0] {
        scc.write(data, byte);
    }
    assert_eq!(scc.tx_pending(Channel::A), &[0x22, 0x11, 0x01, 0xC0]);

    ticks(&mut scc, 119);
    assert!(scc.transport().is_empty());
    assert!(!rr0(&mut scc, Channel::A).contains(Rr0::TX_UNDERRUN));

    scc.tick();
    assert_eq!(scc.transport(), &vec![vec![0x22, 0x11, 0x01, 0xC0]]);
    assert!(scc.tx_pending(Channel::A).is_empty());
    assert!(scc.is_hunting(Channel::A));
    assert!(rr0(&mut scc, Channel::A).contains(Rr0::TX_UNDERRUN));

    ticks(&mut scc, 500);
    assert_eq!(scc.transport().len(), 1);
    assert_eq!(scc.stats(Channel::A).frames_sent, 1);
}

#[test]
fn writes_without_ticks_never_flush() {
    let mut scc = new_scc();
    for n in 0..200u8 {
        scc.write(data_address(Channel::B), n);
    }
    assert!(scc.transport().is_empty());
    assert_eq!(scc.tx_pending(Channel::B).len(), 200);
}

#[test]
fn underrun_latch_reset_fires_on_next_tick() {
    let mut scc = new_scc();
    scc.write(data_address(Channel::B), 0x42);
    write_reg(&mut scc, Channel::B, 0, 0xC0);
    scc.tick();
    assert_eq!(scc.transport(), &vec![vec![0x42]]);
}

#[test]
fn bytes_after_latch_reset_extend_the_frame() {
    let mut scc = new_scc();
    let data = data_address(Channel::B);
    scc.write(data, 0x01);
    write_reg(&mut scc, Channel::B, 0, 0xC0);
    scc.write(data, 0x02);
    scc.write(data, 0x03);
    ticks(&mut scc, 60);
    assert!(scc.transport().is_empty());
    scc.tick();
    assert_eq!(scc.transport(), &vec![vec![0x01, 0x02, 0x03]]);
}

#[test]
fn send_abort_flushes_immediately() {
    let mut scc = new_scc();
    scc.write(data_address(Channel::A), 0x55);
    scc.write(data_address(Channel::A), 0x66);
    write_reg(&mut scc, Channel::A, 0, 0x18);
    assert_eq!(scc.transport(), &vec![vec![0x55, 0x66]]);

    // The countdown still expires later, but there is nothing left to send.
    ticks(&mut scc, 100);
    assert_eq!(scc.transport().len(), 1);
}

#[test]
fn transmit_buffer_overflow_is_counted() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = SccConfig::builder().max_frame_len(4).build();
    let mut scc: TestScc = Scc::with_config(config, IrqCount::default(), Vec::new());
    for n in 0..6u8 {
        scc.write(data_address(Channel::A), n);
    }
    assert_eq!(scc.stats(Channel::A).tx_overflow_bytes, 2);
    write_reg(&mut scc, Channel::A, 0, 0x18);
    assert_eq!(scc.transport(), &vec![vec![0, 1, 2, 3]]);
}

#[test]
fn acknowledge_follows_priority_order() {
    let mut scc = new_scc();
    scc.pending = Pending::CHA_EXT | Pending::CHB_RX;

    assert_eq!(read_reg(&mut scc, Channel::B, 2), 5 << 1);
    assert_eq!(scc.pending(), Pending::CHB_RX);

    assert_eq!(read_reg(&mut scc, Channel::B, 2), 2 << 1);
    assert!(scc.pending().is_empty());

    assert_eq!(read_reg(&mut scc, Channel::B, 2), 0);
}

#[test]
fn acknowledge_walks_all_four_causes() {
    let mut scc = new_scc();
    scc.pending = Pending::CHA_EXT | Pending::CHB_RX | Pending::CHB_EXT | Pending::CHA_RX;
    let codes: Vec<u8> = (0..4)
        .map(|_| read_reg(&mut scc, Channel::B, 2) >> 1)
        .collect();
    assert_eq!(codes, vec![1, 5, 6, 2]);
    assert!(scc.pending().is_empty());
}

#[test]
fn vector_status_placement_follows_wr9() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::A, 2, 0x8F);

    scc.pending = Pending::CHA_RX;
    // Low placement replaces bits 1..3.
    assert_eq!(read_reg(&mut scc, Channel::B, 2), 0x81 | (6 << 1));

    write_reg(&mut scc, Channel::A, 9, 0x10);
    scc.pending = Pending::CHA_RX;
    // High placement replaces bits 4..6.
    assert_eq!(read_reg(&mut scc, Channel::B, 2), 0x8F | (6 << 4));
}

#[test]
fn acknowledge_reraises_remaining_causes() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::A, 1, 0x01);
    write_reg(&mut scc, Channel::B, 1, 0x01);
    scc.pending = Pending::CHB_EXT | Pending::CHA_RX;

    read_reg(&mut scc, Channel::B, 2);
    assert_eq!(scc.irq().0, 1);
    assert_eq!(scc.last_signalled(), Pending::CHA_RX);

    read_reg(&mut scc, Channel::B, 2);
    assert_eq!(scc.irq().0, 1);
}

#[test]
fn rr3_exposes_pending_on_channel_a_only() {
    let mut scc = new_scc();
    scc.pending = Pending::CHA_RX | Pending::CHB_EXT;
    assert_eq!(read_reg(&mut scc, Channel::A, 3), 0x21);
    assert_eq!(read_reg(&mut scc, Channel::B, 3), 0);
}

#[test]
fn reset_ext_status_command_clears_everything() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::A, 1, 0x01);
    write_reg(&mut scc, Channel::A, 15, 0x08);
    scc.set_dcd(Channel::A, false);
    assert_eq!(scc.pending(), Pending::CHA_EXT);
    assert_eq!(scc.last_signalled(), Pending::CHA_EXT);

    write_reg(&mut scc, Channel::B, 0, 0x10);
    assert!(scc.pending().is_empty());
    assert!(scc.last_signalled().is_empty());
}

#[test]
fn dcd_edge_raises_external_status() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::B, 1, 0x01);
    write_reg(&mut scc, Channel::B, 15, 0x08);

    scc.set_dcd(Channel::B, true);
    assert!(scc.pending().is_empty());
    assert_eq!(scc.irq().0, 0);

    scc.set_dcd(Channel::B, false);
    assert_eq!(scc.pending(), Pending::CHB_EXT);
    assert_eq!(scc.irq().0, 1);
    assert!(!rr0(&mut scc, Channel::B).contains(Rr0::DCD));
}

#[test]
fn dcd_edge_without_enable_is_silent() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::A, 1, 0x01);
    scc.set_dcd(Channel::A, false);
    assert!(scc.pending().is_empty());
}

#[test]
fn pending_cause_without_int_enable_does_not_assert() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::A, 15, 0x08);
    scc.set_dcd(Channel::A, false);
    assert_eq!(scc.pending(), Pending::CHA_EXT);
    assert_eq!(scc.irq().0, 0);

    // Enabling interrupts alone does not re-evaluate; WR15 does.
    write_reg(&mut scc, Channel::A, 1, 0x01);
    assert_eq!(scc.irq().0, 0);
    write_reg(&mut scc, Channel::A, 15, 0x08);
    assert_eq!(scc.irq().0, 1);
}

#[test]
fn wr15_write_with_nothing_pending_stays_quiet() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::A, 1, 0x01);
    write_reg(&mut scc, Channel::A, 15, 0xFA);
    assert_eq!(scc.irq().0, 0);
}

#[test]
fn cts_edge_raises_external_status() {
    let mut scc = new_scc();
    write_reg(&mut scc, Channel::A, 1, 0x01);
    write_reg(&mut scc, Channel::A, 15, 0x20);
    scc.set_cts(Channel::A, true);
    assert_eq!(scc.pending(), Pending::CHA_EXT);
    assert_eq!(scc.irq().0, 1);
    assert!(rr0(&mut scc, Channel::A).contains(Rr0::CTS));
}

#[test]
fn accepted_frame_raises_sync_and_first_char() {
    let mut scc = new_scc();
    // Interrupts on, receive interrupt on first character.
    setup_receiver(&mut scc, Channel::B, 0x22, 0x09);
    write_reg(&mut scc, Channel::B, 15, 0x10);
    scc.receive_frame(Channel::B, &[0x22, 0x01], 1).unwrap();
    scc.tick();

    assert!(scc.pending().contains(Pending::CHB_EXT | Pending::CHB_RX));
    assert!(scc.irq().0 >= 2);
}

#[test]
fn rx_disabled_mode_raises_no_receive_cause() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::A, 0x22, 0x01);
    scc.receive_frame(Channel::A, &[0x22, 0x01], 1).unwrap();
    scc.tick();
    assert!(!scc.pending().contains(Pending::CHA_RX));
}

#[test]
fn all_chars_mode_reraises_after_each_byte() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::A, 0x22, 0x11);
    scc.receive_frame(Channel::A, &[0x22, 0x01, 0x02], 1).unwrap();
    scc.tick();
    write_reg(&mut scc, Channel::A, 0, 0x10);

    read_data(&mut scc, Channel::A);
    assert!(scc.pending().contains(Pending::CHA_RX));
}

#[test]
fn first_char_mode_does_not_reraise_per_byte() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::A, 0x22, 0x09);
    scc.receive_frame(Channel::A, &[0x22, 0x01, 0x02], 1).unwrap();
    scc.tick();
    write_reg(&mut scc, Channel::A, 0, 0x10);

    read_data(&mut scc, Channel::A);
    assert!(!scc.pending().contains(Pending::CHA_RX));
}

#[test]
fn break_abort_enable_raises_at_end_of_body() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::B, 0x22, 0x01);
    scc.receive_frame(Channel::B, &[0x22], 1).unwrap();
    // Let the end-of-frame window close, then start from a clean slate.
    ticks(&mut scc, 20);
    write_reg(&mut scc, Channel::B, 15, 0x80);
    write_reg(&mut scc, Channel::B, 0, 0x10);

    read_data(&mut scc, Channel::B);
    read_data(&mut scc, Channel::B);
    assert!(scc.pending().is_empty());
    read_data(&mut scc, Channel::B);
    assert_eq!(scc.pending(), Pending::CHB_EXT);
}

#[test]
fn end_of_frame_fires_after_three_ticks_per_byte() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::A, 0x22, 0x11);
    // Two payload bytes plus trailer: 5 bytes, 15 ticks.
    scc.receive_frame(Channel::A, &[0x22, 0x01], 1).unwrap();
    scc.tick();

    ticks(&mut scc, 13);
    assert!(!scc.end_of_frame_pending(Channel::A));
    scc.tick();
    assert!(scc.end_of_frame_pending(Channel::A));
    assert!(scc.pending().contains(Pending::CHA_RX | Pending::CHA_EXT));

    // Window closed: no more break/abort causes.
    write_reg(&mut scc, Channel::A, 0, 0x10);
    ticks(&mut scc, 10);
    assert!(scc.pending().is_empty());

    drain(&mut scc, Channel::A);
    assert!(!scc.end_of_frame_pending(Channel::A));
}

#[test]
fn end_of_frame_window_asserts_break_every_tick() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::B, 0x22, 0x01);
    scc.receive_frame(Channel::B, &[0x22, 0x01], 1).unwrap();
    scc.tick();
    let after_accept = scc.irq().0;

    for _ in 0..5 {
        write_reg(&mut scc, Channel::B, 0, 0x10);
        scc.tick();
        assert_eq!(scc.pending(), Pending::CHB_EXT);
    }
    assert_eq!(scc.irq().0, after_accept + 5);
}

#[test]
fn first_char_mode_skips_end_of_frame_cause() {
    let mut scc = new_scc();
    setup_receiver(&mut scc, Channel::B, 0x22, 0x09);
    scc.receive_frame(Channel::B, &[0x22], 1).unwrap();
    ticks(&mut scc, 12);
    assert!(!scc.end_of_frame_pending(Channel::B));
}

#[test]
fn observer_sees_frame_lifecycle() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut scc = new_scc();
    let sink = Rc::clone(&events);
    scc.set_observer(move |event: &SccEvent| {
        if !matches!(
            event,
            SccEvent::RegisterRead { .. } | SccEvent::RegisterWrite { .. }
        ) {
            sink.borrow_mut().push(event.clone());
        }
    });

    setup_receiver(&mut scc, Channel::A, 0x22, 0x00);
    scc.receive_frame(Channel::A, &[0x33], 1).unwrap();
    scc.receive_frame(Channel::A, &[0x22], 1).unwrap();
    ticks(&mut scc, 2);

    let events = events.borrow();
    assert_eq!(
        events[..4],
        [
            SccEvent::FrameQueued {
                channel: Channel::A,
                slot: 0,
                len: 1,
                wire_delay: 1,
                queued_ahead: 0,
            },
            SccEvent::FrameQueued {
                channel: Channel::A,
                slot: 1,
                len: 1,
                wire_delay: 1,
                queued_ahead: 1,
            },
            SccEvent::FrameRejected {
                channel: Channel::A,
                slot: 0,
                address: 0x33,
            },
            SccEvent::FrameAccepted {
                channel: Channel::A,
                slot: 1,
                address: 0x22,
            },
        ]
    );
}

#[test]
fn dropped_frame_is_reported_to_observer() {
    let dropped = Rc::new(RefCell::new(0u32));
    let mut scc = new_scc();
    let counter = Rc::clone(&dropped);
    scc.set_observer(move |event: &SccEvent| {
        if let SccEvent::FrameDropped { .. } = event {
            *counter.borrow_mut() += 1;
        }
    });
    for _ in 0..6 {
        let _ = scc.receive_frame(Channel::B, &[0x22], 10);
    }
    assert_eq!(*dropped.borrow(), 2);

    scc.clear_observer();
    let _ = scc.receive_frame(Channel::B, &[0x22], 10);
    assert_eq!(*dropped.borrow(), 2);
}
