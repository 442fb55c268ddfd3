//! Partitioning screened records by symbol and per-symbol volume statistics.

use std::collections::HashMap;

use serde::Serialize;

use crate::screening::ScreenedRecord;
use crate::{PipelineError, Symbol};

/// Records of one symbol, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolGroup<'r> {
    symbol: &'r Symbol,
    records: Vec<&'r ScreenedRecord<'r>>,
}

impl<'r> SymbolGroup<'r> {
    pub fn symbol(&self) -> &'r Symbol {
        self.symbol
    }

    pub fn records(&self) -> &[&'r ScreenedRecord<'r>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// All groups of a run, iterated in first-seen symbol order.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolGroups<'r> {
    groups: Vec<SymbolGroup<'r>>,
    index: HashMap<&'r Symbol, usize>,
}

impl<'r> SymbolGroups<'r> {
    pub fn get(&self, symbol: &Symbol) -> Option<&SymbolGroup<'r>> {
        self.index.get(symbol).map(|&slot| &self.groups[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolGroup<'r>> {
        self.groups.iter()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(SymbolGroup::len).sum()
    }
}

/// Volume statistics of one symbol group.
///
/// `average` is cached at construction and always equals `sum / count`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymbolAggregate {
    sum: f64,
    count: usize,
    average: f64,
}

impl SymbolAggregate {
    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn average(&self) -> f64 {
        self.average
    }
}

/// Per-symbol aggregates keyed by symbol.
pub type SymbolAggregates<'r> = HashMap<&'r Symbol, SymbolAggregate>;

/// Builds [`SymbolGroups`] and their [`SymbolAggregate`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordGrouper;

impl RecordGrouper {
    pub fn group<'r>(records: &'r [ScreenedRecord<'r>]) -> Result<SymbolGroups<'r>, PipelineError> {
        if records.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let mut groups: Vec<SymbolGroup<'r>> = Vec::new();
        let mut index: HashMap<&'r Symbol, usize> = HashMap::new();

        for screened in records {
            let symbol = screened.symbol;
            let slot = *index.entry(symbol).or_insert_with(|| {
                groups.push(SymbolGroup {
                    symbol,
                    records: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].records.push(screened);
        }

        Ok(SymbolGroups { groups, index })
    }

    /// Volume sum/count/average of a non-empty group.
    pub fn aggregate(group: &SymbolGroup<'_>) -> SymbolAggregate {
        let sum: f64 = group.records.iter().map(|screened| screened.bar.volume).sum();
        let count = group.records.len();
        // Groups are only built with at least one record.
        let average = if count == 0 { 0.0 } else { sum / count as f64 };
        SymbolAggregate {
            sum,
            count,
            average,
        }
    }

    pub fn aggregate_all<'r>(groups: &SymbolGroups<'r>) -> SymbolAggregates<'r> {
        groups
            .iter()
            .map(|group| (group.symbol(), Self::aggregate(group)))
            .collect()
    }
}
