//! Per-file record tables -> one ordered table.

use crate::record::{NormalizedRecord, NormalizedTable};

/// Concatenate tables in the given order, keeping row order within each.
///
/// No de-duplication: repeated hosts across files stay repeated.
pub fn merge_tables<I>(tables: I) -> Vec<NormalizedRecord>
where
    I: IntoIterator<Item = NormalizedTable>,
{
    let mut l_records = Vec::new();
    for table in tables {
        tracing::trace!(
            "Merging {} records from {}",
            table.records.len(),
            table.path_source.display()
        );
        l_records.extend(table.records);
    }
    l_records
}
