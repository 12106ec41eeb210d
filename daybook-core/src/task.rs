//! Task model: schedulable units with an anchor day and an optional recurrence.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::recurrence;
use crate::time::{AsDayKey, DayKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Family,
    Health,
    Work,
    Sport,
    Tasks,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Family => "family",
            Category::Health => "health",
            Category::Work => "work",
            Category::Sport => "sport",
            Category::Tasks => "tasks",
        }
    }

    /// Display name.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Family => "Family & kids",
            Category::Health => "Health",
            Category::Work => "Photography work",
            Category::Sport => "Sport",
            Category::Tasks => "Tasks",
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "family" => Ok(Category::Family),
            "health" => Ok(Category::Health),
            "work" => Ok(Category::Work),
            "sport" => Ok(Category::Sport),
            "tasks" => Ok(Category::Tasks),
            _ => Err(ValidationError::invalid_enum("category", s)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ValidationError::invalid_enum("priority", s)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
        }
    }

    pub fn is_repeating(&self) -> bool {
        *self != Recurrence::None
    }
}

impl FromStr for Recurrence {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Recurrence::None),
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "monthly" => Ok(Recurrence::Monthly),
            _ => Err(ValidationError::invalid_enum("recurrence", s)),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core task type.
///
/// `completed` belongs to the task, not to a single occurrence: toggling a
/// repeating task marks the whole series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,

    /// Local wall-clock time of the first occurrence.
    pub anchor: NaiveDateTime,

    pub category: Category,
    pub priority: Priority,
    pub completed: bool,

    pub recurrence: Recurrence,

    /// Last day an occurrence may fall on. Ignored for `Recurrence::None`.
    pub recurrence_end: Option<DayKey>,
}

impl Task {
    pub fn anchor_day(&self) -> DayKey {
        self.anchor.day_key()
    }

    pub fn occurs_on<D: AsDayKey + ?Sized>(&self, day: &D) -> bool {
        recurrence::matches(&self.anchor, self.recurrence, self.recurrence_end, day)
    }

    /// Wall-clock time of the occurrence on `day`: that day at the anchor's time of day.
    pub fn occurrence_on<D: AsDayKey + ?Sized>(&self, day: &D) -> Option<NaiveDateTime> {
        let day = day.day_key();
        self.occurs_on(&day)
            .then(|| day.date().and_time(self.anchor.time()))
    }
}

/// Validated input for a new task. `build` is the only place ranges and
/// titles are checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub anchor: NaiveDateTime,
    pub category: Category,
    pub priority: Priority,
    pub recurrence: Recurrence,
    pub recurrence_end: Option<NaiveDate>,
}

impl TaskDraft {
    /// Defaults mirror the new-task form: category `tasks`, priority `medium`.
    pub fn new(title: impl Into<String>, anchor: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            anchor,
            category: Category::Tasks,
            priority: Priority::Medium,
            recurrence: Recurrence::None,
            recurrence_end: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn repeating(mut self, recurrence: Recurrence, until: Option<NaiveDate>) -> Self {
        self.recurrence = recurrence;
        self.recurrence_end = until;
        self
    }

    pub fn build(self, id: impl Into<String>) -> Result<Task, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        // An end bound on a one-off task carries no meaning; drop it.
        let recurrence_end = match (self.recurrence, self.recurrence_end) {
            (Recurrence::None, _) | (_, None) => None,
            (_, Some(end)) => {
                let anchor = self.anchor.date();
                if end < anchor {
                    return Err(ValidationError::InvalidRange { anchor, end });
                }
                Some(DayKey::new(end))
            }
        };

        Ok(Task {
            id: id.into(),
            title: title.to_string(),
            description: self.description,
            anchor: self.anchor,
            category: self.category,
            priority: self.priority,
            completed: false,
            recurrence: self.recurrence,
            recurrence_end,
        })
    }
}

/// Task as handed over by the presentation layer, with untyped tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTask {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub anchor: NaiveDateTime,
    pub category: String,
    pub priority: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default)]
    pub recurrence_end: Option<NaiveDate>,
}

impl RawTask {
    pub fn draft(&self) -> Result<TaskDraft, ValidationError> {
        let recurrence = match &self.recurrence {
            Some(tag) => tag.parse()?,
            None => Recurrence::None,
        };
        Ok(TaskDraft::new(self.title.clone(), self.anchor)
            .with_description(self.description.clone())
            .with_category(self.category.parse()?)
            .with_priority(self.priority.parse()?)
            .repeating(recurrence, self.recurrence_end))
    }

    /// Validate into a task, keeping the recorded id and completion flag.
    pub fn into_task(self, fallback_id: impl Into<String>) -> Result<Task, ValidationError> {
        let id = self.id.clone().unwrap_or_else(|| fallback_id.into());
        let mut task = self.draft()?.build(id)?;
        task.completed = self.completed;
        Ok(task)
    }
}
