//! # Classification
//!
//! Every rule and every packet belongs to exactly one of four classifications: a
//! [Direction] crossed with a transport [Protocol].
use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Inbound = 0,
    Outbound = 1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    Tcp = 0,
    Udp = 1,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

impl Protocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

/// A (direction, protocol) pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Classification {
    pub direction: Direction,
    pub protocol: Protocol,
}

impl Classification {
    pub const COUNT: usize = 4;

    pub const ALL: [Classification; Classification::COUNT] = [
        Classification::new(Direction::Inbound, Protocol::Tcp),
        Classification::new(Direction::Inbound, Protocol::Udp),
        Classification::new(Direction::Outbound, Protocol::Tcp),
        Classification::new(Direction::Outbound, Protocol::Udp),
    ];

    #[inline]
    pub const fn new(direction: Direction, protocol: Protocol) -> Self {
        Classification {
            direction,
            protocol,
        }
    }

    /// Dense index in `0..COUNT`, the position of this classification in [ALL](Self::ALL).
    #[inline]
    pub const fn index(self) -> usize {
        (self.direction as usize) << 1 | self.protocol as usize
    }
}

impl From<(Direction, Protocol)> for Classification {
    #[inline]
    fn from((direction, protocol): (Direction, Protocol)) -> Self {
        Classification::new(direction, protocol)
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.direction, self.protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all() {
        for (i, c) in Classification::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_display() {
        let c = Classification::from((Direction::Outbound, Protocol::Udp));
        assert_eq!(c.to_string(), "outbound,udp");
        assert_eq!(Direction::Inbound.as_str(), "inbound");
        assert_eq!(Protocol::Tcp.as_str(), "tcp");
    }
}
