use serde::Serialize;

use super::query::{QueryError, QueryParams};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_record_count: usize,
    pub start_index: usize,
}

/// Apply `startIndex` and `limit` from the query to `items`. Without a limit
/// everything from `startIndex` on is returned.
pub fn paginate<T>(items: Vec<T>, params: &QueryParams) -> Result<Page<T>, QueryError> {
    let start_index = params.usize_or("startIndex", 0)?;
    let limit = params.get_usize("limit")?.unwrap_or(usize::MAX);
    let total = items.len();

    let items = items.into_iter().skip(start_index).take(limit).collect();

    Ok(Page {
        items,
        total_record_count: total,
        start_index,
    })
}
