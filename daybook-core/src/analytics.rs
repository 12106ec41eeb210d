//! Per-category completion counts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::task::{Category, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub total: usize,
    pub completed: usize,
}

impl CategoryStats {
    /// `completed / total`; `None` for an empty category.
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.completed as f64 / self.total as f64)
    }

    pub fn percent(&self) -> Option<f64> {
        self.ratio().map(|r| r * 100.0)
    }
}

/// Group tasks by category in one pass.
///
/// Categories without tasks are absent from the map, not zero-valued.
pub fn aggregate_by_category(tasks: &[Task]) -> BTreeMap<Category, CategoryStats> {
    let mut out: BTreeMap<Category, CategoryStats> = BTreeMap::new();
    for t in tasks {
        let stats = out.entry(t.category).or_default();
        stats.total += 1;
        if t.completed {
            stats.completed += 1;
        }
    }
    out
}
