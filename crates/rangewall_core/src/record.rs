//! Typed forms of the two line formats the engine consumes: rule records and packet queries.
use crate::{
    class::Classification,
    error::Result,
    octet::Octets,
    rule::{AddrBox, PortRange, RangeRule},
};

/// One parsed rule record: `direction,protocol,port_spec,addr_spec`.
///
/// The bounds are kept exactly as written so the consumer decides what to do with inverted
/// intervals. `line` is the 1-based source line, `0` if unknown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuleRecord {
    pub line: usize,
    pub class: Classification,
    pub ports: PortRange,
    pub addrs: AddrBox,
}

impl RuleRecord {
    pub fn new(class: Classification, ports: PortRange, addrs: AddrBox) -> Self {
        RuleRecord {
            line: 0,
            class,
            ports,
            addrs,
        }
    }

    /// Builds the checked rule, reporting an inverted interval against this record's line.
    pub fn rule(&self) -> Result<RangeRule> {
        RangeRule::new(self.ports, self.addrs).map_err(|e| e.at_line(self.line))
    }

    #[inline]
    pub fn rule_unchecked(&self) -> RangeRule {
        RangeRule::new_unchecked(self.ports, self.addrs)
    }
}

/// One packet to classify: `direction,protocol,port,A.B.C.D`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PacketQuery {
    pub class: Classification,
    pub port: u16,
    pub addr: Octets,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{Direction, Protocol};

    #[test]
    fn test_rule_reports_line() {
        let mut rec = RuleRecord::new(
            Classification::new(Direction::Inbound, Protocol::Tcp),
            PortRange::new(85, 80),
            AddrBox::single(Octets::new(1, 1, 1, 1)),
        );
        rec.line = 12;
        let err = rec.rule().unwrap_err();
        assert_eq!(err.line(), Some(12));
        assert!(rec.rule_unchecked().is_inverted());
    }
}
