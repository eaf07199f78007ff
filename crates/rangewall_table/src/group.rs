use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use rangewall_core::{
    octet::Octets,
    rule::{AddrBox, PortRange, RangeRule, MAX_PORT, MIN_PORT},
    Matcher,
};

/// Aggregate bounding box of every rule a group has ever seen.
///
/// Each axis is widened independently (integer min/max on ports, per-octet
/// [meet](Octets::meet)/[join](Octets::join) on addresses), so the box always covers every
/// inserted rule and a packet outside it cannot match any of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub ports: PortRange,
    pub addrs: AddrBox,
}

impl Bounds {
    /// The inverted box that the first insertion replaces on every axis.
    pub const EMPTY: Bounds = Bounds {
        ports: PortRange::new(MAX_PORT, MIN_PORT),
        addrs: AddrBox::new(Octets::MAX, Octets::MIN),
    };

    #[inline]
    fn widen(&mut self, rule: &RangeRule) {
        self.ports.low = self.ports.low.min(rule.ports.low);
        self.ports.high = self.ports.high.max(rule.ports.high);
        self.addrs.low = self.addrs.low.meet(rule.addrs.low);
        self.addrs.high = self.addrs.high.join(rule.addrs.high);
    }

    /// Whether every bound of `rule` lies inside this box.
    pub fn covers(&self, rule: &RangeRule) -> bool {
        self.ports.low <= rule.ports.low
            && rule.ports.high <= self.ports.high
            && rule.addrs.low.within(self.addrs.low, self.addrs.high)
            && rule.addrs.high.within(self.addrs.low, self.addrs.high)
    }

    #[inline]
    pub fn admits(&self, port: u16, addr: Octets) -> bool {
        self.ports.contains(port) && self.addrs.contains(addr)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::EMPTY
    }
}

/// [RuleGroup] holds the distinct rules of one classification.
///
/// Rules are deduplicated by value, so a source that repeats the same rule a million times costs
/// one entry. Queries first test the aggregate [Bounds] and only scan the rules when the packet
/// falls inside it. The group only grows: there is no removal.
#[derive(Clone, Debug, Default)]
pub struct RuleGroup {
    rules: IndexSet<RangeRule, FxBuildHasher>,
    bounds: Bounds,
}

impl RuleGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `rule`, returning `false` if an equal rule was already present.
    pub fn insert(&mut self, rule: RangeRule) -> bool {
        self.bounds.widen(&rule);
        self.rules.insert(rule)
    }

    /// Answers the query by scanning every rule, without the fast-reject.
    pub fn scan_matches(&self, port: u16, addr: Octets) -> bool {
        self.rules.iter().any(|r| r.matches(port, addr))
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct rules in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RangeRule> {
        self.rules.iter()
    }
}

impl Matcher for RuleGroup {
    fn matches(&self, port: u16, addr: Octets) -> bool {
        if !self.bounds.admits(port, addr) {
            return false;
        }
        self.scan_matches(port, addr)
    }
}

impl Extend<RangeRule> for RuleGroup {
    fn extend<T: IntoIterator<Item = RangeRule>>(&mut self, iter: T) {
        for rule in iter {
            self.insert(rule);
        }
    }
}

impl FromIterator<RangeRule> for RuleGroup {
    fn from_iter<T: IntoIterator<Item = RangeRule>>(iter: T) -> Self {
        let mut group = RuleGroup::new();
        group.extend(iter);
        group
    }
}
