use anyhow::{bail, Context, Result};
use sccnet::{driver, llap, Channel, HexDump, NodeId, SccConfig, Segment, SegmentConfig};

const DEFAULT_NODES: usize = 3;
const TICK_LIMIT: u32 = 100_000;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let count = match args.next() {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("node count '{arg}' is not a number"))?,
        None => DEFAULT_NODES,
    };
    if !(2..=254).contains(&count) {
        bail!("need between 2 and 254 nodes, got {count}");
    }

    let mut segment = Segment::new(SegmentConfig::default());
    let ids: Vec<NodeId> = (0..count)
        .map(|n| {
            let channel = if n % 2 == 0 { Channel::B } else { Channel::A };
            segment.attach(channel, SccConfig::default())
        })
        .collect();
    for (n, &id) in ids.iter().enumerate() {
        driver::open(segment.node_mut(id), address_of(n));
    }

    // Node 0 probes for its address, then talks to the last node.
    let first = ids[0];
    let last = ids[count - 1];
    let enq = llap::control(llap::BROADCAST, address_of(0), llap::TYPE_ENQ);
    transmit(&mut segment, first, &enq)?;
    let ddp = llap::frame(
        address_of(count - 1),
        address_of(0),
        llap::TYPE_DDP_SHORT,
        b"hello, localtalk",
    );
    transmit(&mut segment, first, &ddp)?;

    let stats = segment.stats();
    log::info!(
        "{} ticks: {} sent, {} delivered, {} lost",
        segment.elapsed(),
        stats.frames_sent,
        stats.frames_delivered,
        stats.frames_lost
    );
    let scc_stats = segment.node(last).scc.stats(segment.node(last).channel);
    log::info!(
        "node {}: {} accepted, {} rejected",
        last.index(),
        scc_stats.frames_accepted,
        scc_stats.frames_rejected
    );
    Ok(())
}

fn address_of(n: usize) -> u8 {
    (n + 1) as u8
}

/// Send from `src` and let every other node drain what it got.
fn transmit(segment: &mut Segment, src: NodeId, frame: &[u8]) -> Result<()> {
    driver::send(segment.node_mut(src), frame);
    let before = segment.stats().frames_sent;
    let sent = segment.run_until(TICK_LIMIT, |seg| seg.stats().frames_sent > before)?;
    if sent.is_none() {
        bail!("node {} never finished transmitting", src.index());
    }

    // Let the frame cross the wire, servicing receivers as a CPU would.
    let ids: Vec<NodeId> = segment.nodes().map(|(id, _)| id).collect();
    for _ in 0..segment.wire_delay(frame.len()) + 1 {
        segment.tick()?;
        for &id in &ids {
            let node = segment.node_mut(id);
            if !node.take_interrupt() {
                continue;
            }
            driver::service_interrupts(node);
            if let Some(received) = driver::receive(node) {
                log::info!("node {} received\n{}", id.index(), HexDump(&received));
            }
        }
    }
    Ok(())
}
