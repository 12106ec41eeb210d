//! Occurrence resolution over a task collection.

use chrono::NaiveDateTime;

use crate::recurrence::next_occurrence;
use crate::task::Task;
use crate::time::AsDayKey;

/// Number of entries the upcoming list shows by default.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Tasks with an occurrence on `day`, in input order.
pub fn occurrences_on<'a, D: AsDayKey + ?Sized>(tasks: &'a [Task], day: &D) -> Vec<&'a Task> {
    let key = day.day_key();
    let out: Vec<&Task> = tasks.iter().filter(|t| t.occurs_on(&key)).collect();
    tracing::trace!(day = %key, count = out.len(), "resolved occurrences");
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upcoming<'a> {
    pub task: &'a Task,
    pub at: NaiveDateTime,
}

/// Incomplete tasks whose next occurrence is after `now`, soonest first.
///
/// Ties keep input order.
pub fn upcoming(tasks: &[Task], now: NaiveDateTime, limit: usize) -> Vec<Upcoming<'_>> {
    let mut out: Vec<Upcoming<'_>> = tasks
        .iter()
        .filter(|t| !t.completed)
        .filter_map(|task| next_occurrence(task, now).map(|at| Upcoming { task, at }))
        .collect();
    out.sort_by_key(|u| u.at);
    out.truncate(limit);
    out
}
