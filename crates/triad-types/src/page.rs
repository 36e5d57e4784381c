use serde::{Deserialize, Serialize};

/// A bounded slice of a list result plus pagination metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page_size: usize,
    pub skip: usize,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Assemble a page. `has_next` is derived from how many items were
    /// actually returned, not from the requested page size, so a short
    /// final page reports no successor.
    pub fn new(items: Vec<T>, total: u64, page_size: usize, skip: usize) -> Self {
        let seen = (skip as u64).saturating_add(items.len() as u64);
        Self {
            has_next: seen < total,
            items,
            total,
            page_size,
            skip,
        }
    }
}
