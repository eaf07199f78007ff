use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};
use rangewall_core::{
    class::{Direction, Protocol},
    octet::Octets,
};

use crate::{table::FrozenTable, PacketFilter};

/// [TableHandle] publishes the active [FrozenTable] to any number of query threads.
///
/// Reads are lock-free. A rule update builds a whole new table and swaps it in with
/// [reload](TableHandle::reload); a published table is never mutated, and the old one is freed
/// once the last in-flight reader drops it.
pub struct TableHandle {
    current: ArcSwap<FrozenTable>,
}

impl TableHandle {
    pub fn new(table: FrozenTable) -> Self {
        TableHandle {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// Borrows the active table for a short burst of queries.
    #[inline]
    pub fn load(&self) -> Guard<Arc<FrozenTable>> {
        self.current.load()
    }

    /// Clones out the active table, for holders that outlive a single query.
    pub fn snapshot(&self) -> Arc<FrozenTable> {
        self.current.load_full()
    }

    /// Atomically replaces the active table, returning the previous one.
    pub fn reload(&self, table: FrozenTable) -> Arc<FrozenTable> {
        let distinct = table.len();
        let previous = self.current.swap(Arc::new(table));
        tracing::info!(
            distinct,
            previous = previous.len(),
            "rule table reloaded"
        );
        previous
    }
}

impl PacketFilter for TableHandle {
    #[inline]
    fn accept_packet(
        &self,
        direction: Direction,
        protocol: Protocol,
        port: u16,
        addr: Octets,
    ) -> bool {
        self.current
            .load()
            .accept_packet(direction, protocol, port, addr)
    }
}

impl From<FrozenTable> for TableHandle {
    fn from(table: FrozenTable) -> Self {
        TableHandle::new(table)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use rangewall_core::class::{Direction::*, Protocol::*};
    use rangewall_io::rules;

    use super::*;
    use crate::table::{DispatchTable, TableConfig};

    fn build(content: &str) -> FrozenTable {
        DispatchTable::build(rules(content.as_bytes()), TableConfig::default()).unwrap()
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let handle = TableHandle::new(build("inbound,tcp,22,10.0.0.1"));
        let addr = Octets::new(10, 0, 0, 1);
        assert!(handle.accept_packet(Inbound, Tcp, 22, addr));

        let before = handle.snapshot();
        let previous = handle.reload(build("inbound,tcp,2222,10.0.0.1"));
        assert!(Arc::ptr_eq(&before, &previous));

        // readers holding the old snapshot keep their view
        assert!(before.accept_packet(Inbound, Tcp, 22, addr));
        assert!(!handle.accept_packet(Inbound, Tcp, 22, addr));
        assert!(handle.accept_packet(Inbound, Tcp, 2222, addr));
        assert_eq!(handle.load().len(), 1);
    }

    #[test]
    fn test_concurrent_readers() {
        let handle = Arc::new(TableHandle::from(build(
            "outbound,udp,53,8.8.8.8\noutbound,udp,53,8.8.4.4",
        )));
        let readers: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || {
                    (0..1000).all(|_| handle.accept_packet(Outbound, Udp, 53, Octets::new(8, 8, 8, 8)))
                })
            })
            .collect();
        handle.reload(build("outbound,udp,53,8.8.8.8"));
        for r in readers {
            assert!(r.join().unwrap());
        }
    }
}
