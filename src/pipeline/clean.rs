use indexmap::IndexMap;
use tracing::debug;

use crate::types::Record;

/// Collapse records sharing an id down to one record each. The last
/// occurrence of an id in arrival order wins, while output order follows the
/// position where each distinct id was first seen.
pub fn dedupe(records: Vec<Record>) -> Vec<Record> {
    let before = records.len();
    let mut by_id: IndexMap<String, Record> = IndexMap::with_capacity(records.len());
    for record in records {
        by_id.insert(record.id.clone(), record);
    }
    debug!("dedupe: {} records in, {} out", before, by_id.len());
    by_id.into_values().collect()
}

/// Drop records missing any of the required identity fields. The surviving
/// order is unchanged.
pub fn validate(records: Vec<Record>) -> Vec<Record> {
    records
        .into_iter()
        .filter(|r| !r.id.is_empty() && !r.name.is_empty() && !r.category.is_empty())
        .collect()
}
