//! This crate provides the value types of the rule engine: octet boxes, range rules and packet
//! classifications, plus the error type shared by every other crate in the workspace.
pub mod class;
pub mod error;
pub mod octet;
pub mod record;
pub mod rule;

/// Matcher is anything that can decide whether a (port, address) pair is permitted.
///
/// Both a single [RangeRule](rule::RangeRule) and a whole rule group implement it, so callers
/// can treat one rule and a set of rules the same way.
pub trait Matcher {
    fn matches(&self, port: u16, addr: octet::Octets) -> bool;
}

impl<M: Matcher + ?Sized> Matcher for &M {
    #[inline]
    fn matches(&self, port: u16, addr: octet::Octets) -> bool {
        (**self).matches(port, addr)
    }
}

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        class::{Classification, Direction, Protocol},
        error::{Error, Result},
        octet::{dominates_ge, dominates_le, Octets},
        record::{PacketQuery, RuleRecord},
        rule::{AddrBox, PortRange, RangeRule},
        Matcher,
    };
}
