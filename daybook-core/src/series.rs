//! Fixed-length daily mood series for charting.
//!
//! A series always covers `[end - window + 1, end]`, oldest first, one point
//! per calendar day. Days without an entry carry no score and no symptoms.

use std::collections::HashMap;

use serde::Serialize;

use crate::mood::MoodEntry;
use crate::time::DayKey;

/// Window the analytics view uses by default.
pub const DEFAULT_WINDOW_DAYS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayPoint {
    pub date: DayKey,
    pub score: Option<u8>,
    pub headache: bool,
    pub anxiety: bool,
    pub apathy: bool,
}

impl DayPoint {
    fn empty(date: DayKey) -> Self {
        Self {
            date,
            score: None,
            headache: false,
            anxiety: false,
            apathy: false,
        }
    }

    pub fn band(&self) -> Option<MoodBand> {
        self.score.map(MoodBand::of)
    }
}

/// Coarse bucket a chart colors a bar by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoodBand {
    Good,
    Neutral,
    Low,
}

impl MoodBand {
    pub fn of(score: u8) -> Self {
        match score {
            s if s >= 4 => MoodBand::Good,
            3 => MoodBand::Neutral,
            _ => MoodBand::Low,
        }
    }
}

pub fn build_series(entries: &[MoodEntry], window_days: usize, end: DayKey) -> Vec<DayPoint> {
    // Later entries win if a caller hands over duplicates for a day.
    let by_day: HashMap<DayKey, &MoodEntry> = entries.iter().map(|e| (e.date, e)).collect();

    let mut days: Vec<DayKey> = std::iter::successors(Some(end), |d| d.offset(-1))
        .take(window_days)
        .collect();
    days.reverse();

    days.into_iter()
        .map(|date| match by_day.get(&date) {
            Some(e) => DayPoint {
                date,
                score: Some(e.mood.score()),
                headache: e.symptoms.headache,
                anxiety: e.symptoms.anxiety,
                apathy: e.symptoms.apathy,
            },
            None => DayPoint::empty(date),
        })
        .collect()
}

/// Mean score over days that have one; `None` when no day does.
pub fn average_score(series: &[DayPoint]) -> Option<f64> {
    let (sum, n) = series
        .iter()
        .filter_map(|p| p.score)
        .fold((0u32, 0u32), |(sum, n), s| (sum + u32::from(s), n + 1));
    (n > 0).then(|| f64::from(sum) / f64::from(n))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SymptomCounts {
    pub headache: usize,
    pub anxiety: usize,
    pub apathy: usize,
}

pub fn symptom_counts(series: &[DayPoint]) -> SymptomCounts {
    series.iter().fold(SymptomCounts::default(), |mut c, p| {
        c.headache += usize::from(p.headache);
        c.anxiety += usize::from(p.anxiety);
        c.apathy += usize::from(p.apathy);
        c
    })
}

/// Headline numbers shown above the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub average: Option<f64>,
    pub recorded_days: usize,
    pub symptoms: SymptomCounts,
}

impl SeriesSummary {
    pub fn of(series: &[DayPoint]) -> Self {
        Self {
            average: average_score(series),
            recorded_days: series.iter().filter(|p| p.score.is_some()).count(),
            symptoms: symptom_counts(series),
        }
    }
}
