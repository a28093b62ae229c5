use indexmap::IndexMap;
use tracing::debug;

use crate::types::Record;

/// Buckets keyed by category name, in first-seen category order. Within a
/// bucket, records keep their validated order.
pub type CategoryBuckets = IndexMap<String, Vec<Record>>;

/// Group records by their exact category string. No normalization: two
/// categories differing only in case or whitespace are distinct buckets.
pub fn organize(records: Vec<Record>) -> CategoryBuckets {
    let mut buckets: CategoryBuckets = IndexMap::new();
    for record in records {
        buckets
            .entry(record.category.clone())
            .or_default()
            .push(record);
    }
    debug!("organize: {} buckets", buckets.len());
    buckets
}
