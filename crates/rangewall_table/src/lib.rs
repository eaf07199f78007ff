//! This crate provides the rule groups and the dispatch table that answer packet queries, plus a
//! handle for publishing a loaded table to concurrent readers.
mod group;
mod handle;
mod table;

use rangewall_core::{
    class::{Direction, Protocol},
    octet::Octets,
    record::PacketQuery,
};

pub use {
    group::{Bounds, RuleGroup},
    handle::TableHandle,
    table::{DispatchTable, FrozenTable, LoadStats, TableConfig},
};

/// PacketFilter answers whether any loaded rule permits a packet.
pub trait PacketFilter {
    // Required method
    fn accept_packet(
        &self,
        direction: Direction,
        protocol: Protocol,
        port: u16,
        addr: Octets,
    ) -> bool;

    // Provided method
    fn accept(&self, query: &PacketQuery) -> bool {
        self.accept_packet(
            query.class.direction,
            query.class.protocol,
            query.port,
            query.addr,
        )
    }
}

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        Bounds, DispatchTable, FrozenTable, LoadStats, PacketFilter, RuleGroup, TableConfig,
        TableHandle,
    };
}
