//! # rangewall
//!
//! Answers one question: does any configured rule permit this packet?
//!
//! Rules are `direction,protocol,port_spec,addr_spec` records. They are loaded once into a
//! [DispatchTable](table::DispatchTable), deduplicated per (direction, protocol), and then
//! queried through [PacketFilter](table::PacketFilter).
//!
//! Addresses are matched as boxes in octet space: `1.0.0.0-2.255.255.255` admits `1.5.5.5`
//! because every octet is individually within bounds.
//!
//! ## Example
//! ```
//! use rangewall::prelude::*;
//!
//! let source = "inbound,tcp,80-85,192.168.1.1-192.168.1.10\n";
//! let table = DispatchTable::build(rules(source.as_bytes()), TableConfig::default()).unwrap();
//! let addr = Octets::new(192, 168, 1, 5);
//! assert!(table.accept_packet(Direction::Inbound, Protocol::Tcp, 82, addr));
//! assert!(!table.accept_packet(Direction::Inbound, Protocol::Tcp, 90, addr));
//! ```
pub use rangewall_internal::*;
