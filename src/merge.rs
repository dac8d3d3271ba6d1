use std::collections::HashMap;

use crate::record::{DateEntry, MergedRecord, PartialRecord};

/// How date cells are attached to records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MergeStrategy {
    /// `records[i]` takes `dates[i]`; nothing ties the two lists together.
    #[default]
    Positional,
    /// Each record takes the first date cell found inside its own row.
    ByRow,
}

pub fn merge(
    records: Vec<PartialRecord>,
    dates: Vec<DateEntry>,
    strategy: MergeStrategy,
) -> Vec<MergedRecord> {
    if strategy == MergeStrategy::Positional && records.len() != dates.len() {
        tracing::warn!(
            target: "merge",
            "{} records but {} date cells, positional merge may be misaligned",
            records.len(),
            dates.len(),
        );
    }

    match strategy {
        MergeStrategy::Positional => {
            let mut dates = dates.into_iter();
            records
                .into_iter()
                .map(|record| MergedRecord {
                    record,
                    datas: dates.next().map(|d| d.value),
                })
                .collect()
        }
        MergeStrategy::ByRow => {
            let mut first = HashMap::new();
            for date in dates {
                if let Some(row) = date.row {
                    first.entry(row).or_insert(date.value);
                }
            }
            records
                .into_iter()
                .map(|record| MergedRecord {
                    datas: first.remove(&record.id),
                    record,
                })
                .collect()
        }
    }
}
