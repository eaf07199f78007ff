//! # Range rule
//!
//! A [RangeRule] permits every packet whose port lies in an inclusive [PortRange] and whose
//! address lies in an inclusive [AddrBox]. Two rules are the same rule when their four bounds
//! are equal, regardless of how they were written (`80` and `80-80` are one rule).
use std::fmt::{Display, Formatter};

use crate::{
    error::{Error, Result},
    octet::{dominates_le, Octets},
    Matcher,
};

pub const MIN_PORT: u16 = 1;
pub const MAX_PORT: u16 = u16::MAX;

/// Inclusive port interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PortRange {
    pub low: u16,
    pub high: u16,
}

impl PortRange {
    #[inline]
    pub const fn new(low: u16, high: u16) -> Self {
        PortRange { low, high }
    }

    #[inline]
    pub const fn single(port: u16) -> Self {
        PortRange {
            low: port,
            high: port,
        }
    }

    #[inline]
    pub fn contains(&self, port: u16) -> bool {
        self.low <= port && port <= self.high
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.low > self.high
    }
}

/// Inclusive component-wise address box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AddrBox {
    pub low: Octets,
    pub high: Octets,
}

impl AddrBox {
    #[inline]
    pub const fn new(low: Octets, high: Octets) -> Self {
        AddrBox { low, high }
    }

    #[inline]
    pub const fn single(addr: Octets) -> Self {
        AddrBox {
            low: addr,
            high: addr,
        }
    }

    #[inline]
    pub fn contains(&self, addr: Octets) -> bool {
        addr.within(self.low, self.high)
    }

    /// True when some octet of `low` exceeds the same octet of `high`; such a box is empty.
    ///
    /// This is not numeric order: `10.0.0.200-10.0.1.5` is inverted on the fourth octet.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        !dominates_le(self.low, self.high)
    }

    /// First inverted octet as `(position, low, high)`, with positions counted from 1.
    pub fn inverted_octet(&self) -> Option<(usize, u8, u8)> {
        self.low
            .octets()
            .into_iter()
            .zip(self.high.octets())
            .enumerate()
            .find(|(_, (lo, hi))| lo > hi)
            .map(|(i, (lo, hi))| (i + 1, lo, hi))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangeRule {
    pub ports: PortRange,
    pub addrs: AddrBox,
}

impl RangeRule {
    /// Builds a rule, rejecting inverted intervals on either axis.
    pub fn new(ports: PortRange, addrs: AddrBox) -> Result<Self> {
        let rule = RangeRule { ports, addrs };
        let reason = if ports.is_inverted() {
            format!("port {} > {}", ports.low, ports.high)
        } else if let Some((pos, lo, hi)) = addrs.inverted_octet() {
            format!("octet {pos}: {lo} > {hi}")
        } else {
            return Ok(rule);
        };
        Err(Error::InvariantViolation {
            line: 0,
            rule: rule.to_string(),
            reason,
        })
    }

    /// Builds a rule without checking its bounds. An inverted rule matches no packet.
    #[inline]
    pub const fn new_unchecked(ports: PortRange, addrs: AddrBox) -> Self {
        RangeRule { ports, addrs }
    }

    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.ports.is_inverted() || self.addrs.is_inverted()
    }
}

impl Matcher for RangeRule {
    #[inline]
    fn matches(&self, port: u16, addr: Octets) -> bool {
        self.ports.contains(port) && self.addrs.contains(addr)
    }
}

impl Display for PortRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

impl Display for AddrBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

impl Display for RangeRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.ports, self.addrs)
    }
}
