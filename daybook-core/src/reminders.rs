//! Reminder policy and the per-poll threshold check.
//!
//! A reminder for an occurrence may fire once its lead window has opened and
//! the occurrence has not started yet. Each occurrence fires at most once:
//! the caller keeps a [`NotifiedLog`] across polls.

use std::collections::HashSet;
use std::fmt;

use anyhow::{Result, bail};
use chrono::{NaiveDateTime, TimeDelta};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};
use crate::time::{AsDayKey, DayKey};

/// Lead times offered by the notification settings, in minutes.
pub const LEAD_PRESETS: [i64; 4] = [15, 30, 60, 120];

/// Upper bound for a configured lead time (one week).
pub const MAX_LEAD_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPolicy {
    pub enabled: bool,
    pub lead_minutes: i64,
    pub high_priority_only: bool,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            lead_minutes: 30,
            high_priority_only: false,
        }
    }
}

impl ReminderPolicy {
    fn admits(&self, task: &Task) -> bool {
        !task.completed && (!self.high_priority_only || task.priority == Priority::High)
    }
}

/// True iff the lead window before `occurrence` is open at `now` and nothing
/// was sent for this occurrence yet.
///
/// A lead too large to represent opens the window at the start of time; a
/// negative one never opens it.
pub fn should_remind(
    occurrence: NaiveDateTime,
    lead_minutes: i64,
    now: NaiveDateTime,
    already_notified: bool,
) -> bool {
    if already_notified {
        return false;
    }
    let opened = match TimeDelta::try_minutes(lead_minutes)
        .and_then(|lead| occurrence.checked_sub_signed(lead))
    {
        Some(opens) => now >= opens,
        None => lead_minutes > 0,
    };
    opened && now < occurrence
}

/// Identity of one occurrence of one task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderKey {
    pub task_id: String,
    pub day: DayKey,
}

impl ReminderKey {
    pub fn new(task_id: impl Into<String>, day: DayKey) -> Self {
        Self {
            task_id: task_id.into(),
            day,
        }
    }
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.task_id, self.day)
    }
}

/// Occurrences a reminder was already sent for.
#[derive(Debug, Clone, Default)]
pub struct NotifiedLog {
    sent: HashSet<ReminderKey>,
}

impl NotifiedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &ReminderKey) -> bool {
        self.sent.contains(key)
    }

    /// Returns false if the key was already recorded.
    pub fn mark(&mut self, key: ReminderKey) -> bool {
        self.sent.insert(key)
    }

    pub fn len(&self) -> usize {
        self.sent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    /// Forget occurrences on days before `day`; they can never fire again.
    pub fn prune_before(&mut self, day: DayKey) {
        self.sent.retain(|k| k.day >= day);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderIntent {
    pub key: ReminderKey,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub occurrence_at: NaiveDateTime,
}

/// Evaluate every admitted task against `now` and record what fired.
///
/// Candidate occurrences lie on the days from `now` through `now + lead`, with
/// the lead capped at [`MAX_LEAD_MINUTES`] for the scan.
pub fn poll_due_reminders(
    tasks: &[Task],
    policy: ReminderPolicy,
    now: NaiveDateTime,
    notified: &mut NotifiedLog,
) -> Vec<ReminderIntent> {
    if !policy.enabled {
        return vec![];
    }

    let first = now.day_key();
    let scan = TimeDelta::minutes(policy.lead_minutes.clamp(0, MAX_LEAD_MINUTES));
    let last = now.checked_add_signed(scan).unwrap_or(now).day_key();

    let mut out = Vec::new();
    for task in tasks.iter().filter(|t| policy.admits(t)) {
        let mut day = first;
        while day <= last {
            if let Some(at) = task.occurrence_on(&day) {
                let key = ReminderKey::new(task.id.clone(), day);
                if should_remind(at, policy.lead_minutes, now, notified.contains(&key)) {
                    tracing::debug!(%key, at = %at, "reminder due");
                    notified.mark(key.clone());
                    out.push(ReminderIntent {
                        key,
                        title: task.title.clone(),
                        body: format!("In {} ({})", format_lead(policy.lead_minutes), at.format("%H:%M")),
                        priority: task.priority,
                        occurrence_at: at,
                    });
                }
            }
            let Some(next) = day.offset(1) else { break };
            day = next;
        }
    }

    out
}

/// Parse a lead time such as "30m", "2h", "90" (minutes) into minutes.
pub fn parse_lead(s: &str) -> Result<i64> {
    let re = Regex::new(r"(?i)^\s*(\d+)\s*(m|min|mins|minutes|h|hr|hrs|hours)?\s*$")?;
    let caps = re
        .captures(s)
        .ok_or_else(|| anyhow::anyhow!("invalid lead time '{s}' (expected e.g. 15m, 2h)"))?;

    let value: i64 = caps[1].parse()?;
    let minutes = match caps.get(2).map(|m| m.as_str().to_lowercase()) {
        Some(unit) if unit.starts_with('h') => value.saturating_mul(60),
        _ => value,
    };

    if minutes > MAX_LEAD_MINUTES {
        bail!("lead time '{s}' exceeds one week");
    }
    Ok(minutes)
}

/// "15 min", "2 h", "1.5 h". Hours keep up to two decimals.
pub fn format_lead(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    if minutes % 60 == 0 {
        return format!("{} h", minutes / 60);
    }
    let hours = format!("{:.2}", minutes as f64 / 60.0);
    format!("{} h", hours.trim_end_matches('0').trim_end_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Recurrence, TaskDraft};
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn window_bounds() {
        let occ = at(3, 14, 0);
        assert!(!should_remind(occ, 30, at(3, 13, 29), false));
        assert!(should_remind(occ, 30, at(3, 13, 30), false));
        assert!(should_remind(occ, 30, at(3, 13, 59), false));
        assert!(!should_remind(occ, 30, at(3, 14, 0), false));
        assert!(!should_remind(occ, 30, at(3, 13, 45), true));
    }

    #[test]
    fn oversized_lead_keeps_window_open() {
        let occ = at(3, 14, 0);
        assert!(should_remind(occ, i64::MAX, at(1, 0, 0), false));
        assert!(should_remind(occ, i64::MAX / 2, at(3, 13, 59), false));
        assert!(!should_remind(occ, i64::MAX, at(3, 14, 0), false));
        assert!(!should_remind(occ, i64::MIN, at(3, 13, 0), false));
        assert!(!should_remind(occ, -30, at(3, 13, 45), false));
    }

    #[test]
    fn poll_with_oversized_lead_scans_one_week() {
        let tasks = vec![
            TaskDraft::new("Soon", at(5, 9, 0)).build("soon").unwrap(),
            TaskDraft::new("Later", at(20, 9, 0)).build("later").unwrap(),
        ];
        for lead_minutes in [i64::MAX, i64::MAX / 2] {
            let policy = ReminderPolicy {
                lead_minutes,
                ..ReminderPolicy::default()
            };
            let mut log = NotifiedLog::new();
            let fired = poll_due_reminders(&tasks, policy, at(1, 8, 0), &mut log);
            assert_eq!(fired.len(), 1);
            assert_eq!(fired[0].key.task_id, "soon");
        }
    }

    #[test]
    fn fires_once_per_occurrence() {
        let tasks = vec![TaskDraft::new("Wedding shoot", at(3, 14, 0)).build("1").unwrap()];
        let mut log = NotifiedLog::new();
        let policy = ReminderPolicy::default();

        let first = poll_due_reminders(&tasks, policy, at(3, 13, 40), &mut log);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].key, ReminderKey::new("1", DayKey::from_ymd(2024, 6, 3).unwrap()));
        assert_eq!(first[0].body, "In 30 min (14:00)");

        assert!(poll_due_reminders(&tasks, policy, at(3, 13, 41), &mut log).is_empty());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn recurring_task_fires_per_day() {
        let tasks = vec![
            TaskDraft::new("Vitamins", at(1, 8, 0))
                .repeating(Recurrence::Daily, None)
                .build("v")
                .unwrap(),
        ];
        let mut log = NotifiedLog::new();
        let policy = ReminderPolicy::default();
        assert_eq!(poll_due_reminders(&tasks, policy, at(3, 7, 45), &mut log).len(), 1);
        assert_eq!(poll_due_reminders(&tasks, policy, at(4, 7, 45), &mut log).len(), 1);
        assert_eq!(log.len(), 2);

        log.prune_before(DayKey::from_ymd(2024, 6, 4).unwrap());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn window_crossing_midnight() {
        let tasks = vec![TaskDraft::new("Early flight", at(4, 0, 30)).build("f").unwrap()];
        let mut log = NotifiedLog::new();
        let policy = ReminderPolicy {
            lead_minutes: 60,
            ..ReminderPolicy::default()
        };
        let out = poll_due_reminders(&tasks, policy, at(3, 23, 45), &mut log);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].occurrence_at, at(4, 0, 30));
    }

    #[test]
    fn policy_filters() {
        let mut done = TaskDraft::new("Done", at(3, 14, 0)).build("d").unwrap();
        done.completed = true;
        let low = TaskDraft::new("Low", at(3, 14, 0))
            .with_priority(Priority::Low)
            .build("l")
            .unwrap();
        let high = TaskDraft::new("High", at(3, 14, 0))
            .with_priority(Priority::High)
            .build("h")
            .unwrap();
        let tasks = vec![done, low, high];
        let now = at(3, 13, 50);

        let strict = ReminderPolicy {
            high_priority_only: true,
            ..ReminderPolicy::default()
        };
        let out = poll_due_reminders(&tasks, strict, now, &mut NotifiedLog::new());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].key.task_id, "h");

        let off = ReminderPolicy {
            enabled: false,
            ..ReminderPolicy::default()
        };
        assert!(poll_due_reminders(&tasks, off, now, &mut NotifiedLog::new()).is_empty());

        let all = poll_due_reminders(&tasks, ReminderPolicy::default(), now, &mut NotifiedLog::new());
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn lead_parsing() {
        assert_eq!(parse_lead("15m").unwrap(), 15);
        assert_eq!(parse_lead("2h").unwrap(), 120);
        assert_eq!(parse_lead(" 90 ").unwrap(), 90);
        assert_eq!(parse_lead("1 HR").unwrap(), 60);
        assert!(parse_lead("soon").is_err());
        assert!(parse_lead("-5m").is_err());
        assert!(parse_lead("200h").is_err());
    }

    #[test]
    fn lead_formatting() {
        assert_eq!(format_lead(15), "15 min");
        assert_eq!(format_lead(120), "2 h");
        assert_eq!(format_lead(90), "1.5 h");
        assert_eq!(format_lead(100), "1.67 h");
        assert_eq!(format_lead(59), "59 min");
        assert!(LEAD_PRESETS.iter().all(|m| parse_lead(&format!("{m}m")).is_ok()));
    }
}
