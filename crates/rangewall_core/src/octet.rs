//! # Octet module
//!
//! An IPv4 address is treated as a point in a 4-dimensional space of octets, not as a 32-bit
//! number. Ordering is component-wise, which makes it a partial order: `1.9.0.0` and `2.0.0.0`
//! are incomparable, neither dominates the other.
//!
//! ## Example
//! ```
//! use rangewall_core::octet::{dominates_le, Octets};
//!
//! let lo = Octets::new(1, 0, 0, 0);
//! let hi = Octets::new(2, 255, 255, 255);
//! assert!(Octets::new(1, 5, 5, 5).within(lo, hi));
//! assert!(!dominates_le(Octets::new(1, 9, 0, 0), Octets::new(2, 0, 0, 0)));
//! ```
use std::{
    fmt::{Display, Formatter},
    net::Ipv4Addr,
};

/// Four octets of an IPv4 address, most significant first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Octets(pub [u8; 4]);

impl Octets {
    pub const MIN: Octets = Octets([u8::MIN; 4]);
    pub const MAX: Octets = Octets([u8::MAX; 4]);

    #[inline]
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Octets([a, b, c, d])
    }

    #[inline]
    pub const fn octets(&self) -> [u8; 4] {
        self.0
    }

    /// Box containment: every octet lies within the corresponding octets of `lo` and `hi`.
    #[inline]
    pub fn within(self, lo: Octets, hi: Octets) -> bool {
        dominates_le(lo, self) && dominates_le(self, hi)
    }

    /// Per-axis minimum. The result is dominated by both inputs.
    #[inline]
    pub fn meet(self, other: Octets) -> Octets {
        let mut out = self.0;
        for (o, x) in out.iter_mut().zip(other.0) {
            *o = (*o).min(x);
        }
        Octets(out)
    }

    /// Per-axis maximum. The result dominates both inputs.
    #[inline]
    pub fn join(self, other: Octets) -> Octets {
        let mut out = self.0;
        for (o, x) in out.iter_mut().zip(other.0) {
            *o = (*o).max(x);
        }
        Octets(out)
    }
}

/// `a[i] <= b[i]` for every octet.
#[inline]
pub fn dominates_le(a: Octets, b: Octets) -> bool {
    a.0.iter().zip(b.0.iter()).all(|(l, u)| l <= u)
}

/// `a[i] >= b[i]` for every octet.
#[inline]
pub fn dominates_ge(a: Octets, b: Octets) -> bool {
    dominates_le(b, a)
}

impl From<[u8; 4]> for Octets {
    #[inline]
    fn from(value: [u8; 4]) -> Self {
        Octets(value)
    }
}

impl From<Ipv4Addr> for Octets {
    #[inline]
    fn from(value: Ipv4Addr) -> Self {
        Octets(value.octets())
    }
}

impl From<Octets> for Ipv4Addr {
    #[inline]
    fn from(value: Octets) -> Self {
        Ipv4Addr::from(value.0)
    }
}

impl Display for Octets {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}
