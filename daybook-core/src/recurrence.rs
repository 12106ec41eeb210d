//! Recurrence matching: does a task have an occurrence on a given day?
//!
//! Rules, in evaluation order:
//! - the anchor day is always an occurrence, whatever the recurrence;
//! - `None` never matches any other day;
//! - nothing is projected backwards from the anchor;
//! - nothing falls after `recurrence_end` (inclusive bound);
//! - `Daily` matches every day, `Weekly` every seventh day, `Monthly` every
//!   day with the anchor's day-of-month.
//!
//! Monthly recurrences are not clamped: an anchor on the 31st has no
//! occurrence in months with 30 days or fewer.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::task::{Recurrence, Task};
use crate::time::{AsDayKey, DayKey, whole_days_between};

pub fn matches<A, Q>(anchor: &A, recurrence: Recurrence, recurrence_end: Option<DayKey>, query: &Q) -> bool
where
    A: AsDayKey + ?Sized,
    Q: AsDayKey + ?Sized,
{
    let anchor = anchor.day_key();
    let query = query.day_key();

    if query == anchor {
        return true;
    }
    if recurrence == Recurrence::None || query < anchor {
        return false;
    }
    if recurrence_end.is_some_and(|end| query > end) {
        return false;
    }

    let delta = whole_days_between(&anchor, &query);
    match recurrence {
        Recurrence::None => false,
        Recurrence::Daily => delta >= 0,
        Recurrence::Weekly => delta % 7 == 0,
        Recurrence::Monthly => query.day_of_month() == anchor.day_of_month(),
    }
}

/// First day on or after `from` that the recurrence lands on, ignoring the end bound.
fn first_on_or_after(anchor: DayKey, recurrence: Recurrence, from: DayKey) -> Option<DayKey> {
    let start = anchor.max(from);
    match recurrence {
        Recurrence::None => (anchor >= from).then_some(anchor),
        Recurrence::Daily => Some(start),
        Recurrence::Weekly => {
            let rem = whole_days_between(&anchor, &start).rem_euclid(7);
            start.offset((7 - rem) % 7)
        }
        Recurrence::Monthly => {
            let dom = anchor.day_of_month();
            let (mut year, mut month) = (start.date().year(), start.date().month());
            // Any day-of-month reappears within the next two months.
            for _ in 0..3 {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, dom) {
                    if date >= start.date() {
                        return Some(DayKey::new(date));
                    }
                }
                if month == 12 {
                    year += 1;
                    month = 1;
                } else {
                    month += 1;
                }
            }
            None
        }
    }
}

/// Earliest occurrence of `task` strictly after `after`.
pub fn next_occurrence(task: &Task, after: NaiveDateTime) -> Option<NaiveDateTime> {
    let anchor = task.anchor_day();
    let mut from = after.day_key();

    // The occurrence on `after`'s own day may already be past; at most one retry.
    for _ in 0..2 {
        let day = first_on_or_after(anchor, task.recurrence, from)?;
        if task.recurrence.is_repeating() && task.recurrence_end.is_some_and(|end| day > end) {
            return None;
        }
        let at = day.date().and_time(task.anchor.time());
        if at > after {
            return Some(at);
        }
        from = day.offset(1)?;
    }
    None
}
