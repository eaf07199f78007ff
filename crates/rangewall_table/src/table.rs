use rangewall_core::{
    class::{Classification, Direction, Protocol},
    error::Result,
    octet::Octets,
    record::RuleRecord,
    Matcher,
};

use crate::{group::RuleGroup, PacketFilter};

/// Loading options of a [DispatchTable].
#[derive(Copy, Clone, Debug, Default)]
pub struct TableConfig {
    /// Keep rules whose bounds are inverted instead of failing the load. Such rules never match.
    pub allow_inverted: bool,
}

/// Counters reported at the end of a load.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records consumed.
    pub records: usize,
    /// Records that added a new distinct rule.
    pub distinct: usize,
    /// Inverted rules that were accepted.
    pub inverted: usize,
}

/// [DispatchTable] routes every classification to its [RuleGroup].
///
/// This is the mutable load phase of the engine. Once every record is in, [freeze] it into a
/// [FrozenTable] for querying.
///
/// [freeze]: DispatchTable::freeze
#[derive(Clone, Debug, Default)]
pub struct DispatchTable {
    groups: [RuleGroup; Classification::COUNT],
    config: TableConfig,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableConfig) -> Self {
        DispatchTable {
            groups: Default::default(),
            config,
        }
    }

    /// Builds a frozen table from a record stream in one go. The first error drops everything
    /// loaded so far.
    pub fn build<I>(records: I, config: TableConfig) -> Result<FrozenTable>
    where
        I: IntoIterator<Item = Result<RuleRecord>>,
    {
        let mut table = DispatchTable::with_config(config);
        table.load(records)?;
        Ok(table.freeze())
    }

    /// Routes one record into its group. Returns whether the rule was new.
    pub fn insert(&mut self, record: RuleRecord) -> Result<bool> {
        let rule = if self.config.allow_inverted {
            let rule = record.rule_unchecked();
            if rule.is_inverted() {
                tracing::warn!(line = record.line, %rule, "accepting inverted rule, it will never match");
            }
            rule
        } else {
            record.rule()?
        };
        Ok(self.groups[record.class.index()].insert(rule))
    }

    /// Streams records into the table, one at a time.
    ///
    /// On error the table holds whatever was loaded before the failing record and should be
    /// discarded; [build](DispatchTable::build) does that for you.
    pub fn load<I>(&mut self, records: I) -> Result<LoadStats>
    where
        I: IntoIterator<Item = Result<RuleRecord>>,
    {
        let mut stats = LoadStats::default();
        for record in records {
            let record = record?;
            let inverted = record.ports.is_inverted() || record.addrs.is_inverted();
            if self.insert(record)? {
                stats.distinct += 1;
            }
            if inverted {
                stats.inverted += 1;
            }
            stats.records += 1;
        }
        for class in Classification::ALL {
            tracing::debug!(%class, rules = self.group(class).len(), "group loaded");
        }
        tracing::info!(
            records = stats.records,
            distinct = stats.distinct,
            duplicates = stats.records - stats.distinct,
            "rule load complete"
        );
        Ok(stats)
    }

    #[inline]
    pub fn group(&self, class: Classification) -> &RuleGroup {
        &self.groups[class.index()]
    }

    /// Ends the load phase.
    pub fn freeze(self) -> FrozenTable {
        FrozenTable {
            groups: self.groups,
        }
    }
}

impl PacketFilter for DispatchTable {
    #[inline]
    fn accept_packet(
        &self,
        direction: Direction,
        protocol: Protocol,
        port: u16,
        addr: Octets,
    ) -> bool {
        self.group(Classification::new(direction, protocol))
            .matches(port, addr)
    }
}

/// [FrozenTable] is the read-only query phase of a [DispatchTable].
///
/// It has no interior mutability, so it can be shared across threads and queried concurrently
/// without locking.
#[derive(Clone, Debug, Default)]
pub struct FrozenTable {
    groups: [RuleGroup; Classification::COUNT],
}

impl FrozenTable {
    #[inline]
    pub fn group(&self, class: Classification) -> &RuleGroup {
        &self.groups[class.index()]
    }

    /// Number of distinct rules across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(RuleGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(RuleGroup::is_empty)
    }
}

impl PacketFilter for FrozenTable {
    #[inline]
    fn accept_packet(
        &self,
        direction: Direction,
        protocol: Protocol,
        port: u16,
        addr: Octets,
    ) -> bool {
        self.group(Classification::new(direction, protocol))
            .matches(port, addr)
    }
}
