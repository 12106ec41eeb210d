//! daybook-core: recurrence matching and mood/task aggregation for the Daybook planner.
//!
//! Every function here is pure over its inputs. The current time is always a
//! parameter; nothing reads a clock.

pub mod analytics;
pub mod book;
pub mod error;
pub mod mood;
pub mod occurrences;
pub mod recurrence;
pub mod reminders;
pub mod series;
pub mod task;
pub mod time;

pub use analytics::{CategoryStats, aggregate_by_category};
pub use book::TaskBook;
pub use error::{BookError, ValidationError};
pub use mood::{Mood, MoodEntry, MoodLog, RawMoodEntry, Symptoms};
pub use occurrences::{DEFAULT_UPCOMING_LIMIT, Upcoming, occurrences_on, upcoming};
pub use recurrence::{matches, next_occurrence};
pub use reminders::{
    LEAD_PRESETS, NotifiedLog, ReminderIntent, ReminderKey, ReminderPolicy, format_lead,
    parse_lead, poll_due_reminders, should_remind,
};
pub use series::{
    DEFAULT_WINDOW_DAYS, DayPoint, MoodBand, SeriesSummary, SymptomCounts, average_score,
    build_series, symptom_counts,
};
pub use task::{Category, Priority, RawTask, Recurrence, Task, TaskDraft};
pub use time::{AsDayKey, DayKey, day_key, whole_days_between};
