use std::io::{BufReader, Read};

use peak_alloc::PeakAlloc;
use rangewall_core::{
    class::{Classification, Direction::*, Protocol::*},
    octet::Octets,
};
use rangewall_io::rules;
use rangewall_table::{DispatchTable, PacketFilter, TableConfig};

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

const DUPLICATES: [&str; 4] = [
    "inbound,tcp,80-85,192.168.1.1",
    "outbound,udp,500-600,1.1.1.1",
    "outbound,tcp,323,5.4.3.2-5.4.4.5",
    "inbound,udp,842,9.2.3.5",
];

/// Produces `remaining` rule lines on the fly, picking among [DUPLICATES] with an LCG, so the
/// whole source never exists in memory.
struct DuplicatedSource {
    remaining: usize,
    state: u64,
    pending: Vec<u8>,
}

impl DuplicatedSource {
    fn new(lines: usize) -> Self {
        DuplicatedSource {
            remaining: lines,
            state: 0,
            pending: Vec::new(),
        }
    }
}

impl Read for DuplicatedSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pending.is_empty() {
            if self.remaining == 0 {
                return Ok(0);
            }
            self.remaining -= 1;
            self.state = self
                .state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let line = DUPLICATES[(self.state >> 33) as usize % DUPLICATES.len()];
            self.pending.extend_from_slice(line.as_bytes());
            self.pending.push(b'\n');
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

fn load_duplicates(lines: usize) -> rangewall_table::FrozenTable {
    let source = BufReader::new(DuplicatedSource::new(lines));
    DispatchTable::build(rules(source), TableConfig::default()).unwrap()
}

#[test]
fn test_duplicates_collapse() {
    let table = load_duplicates(100_000);
    assert_eq!(table.len(), DUPLICATES.len());
    for class in Classification::ALL {
        assert_eq!(table.group(class).len(), 1);
    }
    assert!(table.accept_packet(Inbound, Tcp, 83, Octets::new(192, 168, 1, 1)));
    assert!(table.accept_packet(Outbound, Udp, 550, Octets::new(1, 1, 1, 1)));
    assert!(table.accept_packet(Outbound, Tcp, 323, Octets::new(5, 4, 3, 5)));
    assert!(table.accept_packet(Inbound, Udp, 842, Octets::new(9, 2, 3, 5)));
    assert!(!table.accept_packet(Inbound, Udp, 843, Octets::new(9, 2, 3, 5)));
}

#[test]
#[ignore = "test should be run mannually"]
fn test_million_duplicates_bounded_memory() {
    let current_mem = PEAK_ALLOC.current_usage_as_kb();
    println!("This program initially uses {} kB of RAM.", current_mem);

    let table = load_duplicates(1_000_000);
    assert_eq!(table.len(), DUPLICATES.len());

    let peak_mem = PEAK_ALLOC.peak_usage_as_kb();
    println!("after loading 1M records: peak usage {} kB of RAM.", peak_mem);
    // the source alone would be ~30 MB if it were buffered wholesale
    assert!(peak_mem < 16384.0);

    let mut accepted = 0;
    let mut state = 7u32;
    for _ in 0..1000 {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        let [a, b, c, d] = state.to_be_bytes();
        let port = (state % 65535) as u16 + 1;
        let class = Classification::ALL[(state >> 30) as usize];
        if table.accept_packet(class.direction, class.protocol, port, Octets::new(a, b, c, d)) {
            accepted += 1;
        }
    }
    println!("accepted {} of 1000 random queries", accepted);
}
