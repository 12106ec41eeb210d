//! Mood entries: one per calendar day, last write wins.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::{AsDayKey, DayKey};

/// Ordinal mood scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Terrible = 1,
    Bad = 2,
    Ok = 3,
    Good = 4,
    Great = 5,
}

impl Mood {
    pub fn score(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Terrible => "terrible",
            Mood::Bad => "bad",
            Mood::Ok => "ok",
            Mood::Good => "good",
            Mood::Great => "great",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Terrible => "Terrible",
            Mood::Bad => "Bad",
            Mood::Ok => "Okay",
            Mood::Good => "Good",
            Mood::Great => "Great",
        }
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terrible" => Ok(Mood::Terrible),
            "bad" => Ok(Mood::Bad),
            "ok" => Ok(Mood::Ok),
            "good" => Ok(Mood::Good),
            "great" => Ok(Mood::Great),
            _ => Err(ValidationError::invalid_enum("mood", s)),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent symptom flags; any combination is valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symptoms {
    #[serde(default)]
    pub headache: bool,
    #[serde(default)]
    pub anxiety: bool,
    #[serde(default)]
    pub apathy: bool,
}

impl Symptoms {
    pub fn any(&self) -> bool {
        self.headache || self.anxiety || self.apathy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date: DayKey,
    pub mood: Mood,
    #[serde(flatten)]
    pub symptoms: Symptoms,
    #[serde(default)]
    pub notes: Option<String>,
}

impl MoodEntry {
    pub fn new<D: AsDayKey + ?Sized>(day: &D, mood: Mood) -> Self {
        Self {
            date: day.day_key(),
            mood,
            symptoms: Symptoms::default(),
            notes: None,
        }
    }

    pub fn with_symptoms(mut self, symptoms: Symptoms) -> Self {
        self.symptoms = symptoms;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = (!notes.trim().is_empty()).then_some(notes);
        self
    }
}

impl AsDayKey for MoodEntry {
    fn day_key(&self) -> DayKey {
        self.date
    }
}

/// Mood entry as handed over by the presentation layer, with an untyped
/// mood tag and a full timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMoodEntry {
    pub date: NaiveDateTime,
    pub mood: String,
    #[serde(flatten)]
    pub symptoms: Symptoms,
    #[serde(default)]
    pub notes: String,
}

impl RawMoodEntry {
    pub fn into_entry(self) -> Result<MoodEntry, ValidationError> {
        let mood = self.mood.parse()?;
        Ok(MoodEntry::new(&self.date, mood)
            .with_symptoms(self.symptoms)
            .with_notes(self.notes))
    }
}

/// Owned mood log keyed by calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodLog {
    entries: Vec<MoodEntry>,
}

impl MoodLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from raw entries; later entries for a day replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = MoodEntry>) -> Self {
        let mut log = Self::new();
        for e in entries {
            log.record(e);
        }
        log
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn on<D: AsDayKey + ?Sized>(&self, day: &D) -> Option<&MoodEntry> {
        let key = day.day_key();
        self.entries.iter().find(|e| e.date == key)
    }

    /// Insert or replace the entry for the entry's day. Returns the replaced entry.
    pub fn record(&mut self, entry: MoodEntry) -> Option<MoodEntry> {
        match self.entries.iter_mut().find(|e| e.date == entry.date) {
            Some(slot) => {
                tracing::debug!(day = %entry.date, mood = %entry.mood, "replacing mood entry");
                Some(std::mem::replace(slot, entry))
            }
            None => {
                self.entries.push(entry);
                None
            }
        }
    }
}
