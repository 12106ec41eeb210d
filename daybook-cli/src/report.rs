//! Plain-text views over the core outputs. Formatting only; no decisions.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use daybook_core::{
    DayKey, MoodBand, MoodLog, Priority, Recurrence, SeriesSummary, Task, TaskBook,
    aggregate_by_category, build_series,
};

fn recurrence_label(r: Recurrence) -> Option<&'static str> {
    match r {
        Recurrence::None => None,
        Recurrence::Daily => Some("daily"),
        Recurrence::Weekly => Some("weekly"),
        Recurrence::Monthly => Some("monthly"),
    }
}

fn task_line(t: &Task) -> String {
    let mut line = format!(
        "[{}] {} {}",
        if t.completed { "x" } else { " " },
        t.anchor.format("%H:%M"),
        t.title
    );
    if t.priority == Priority::High {
        line.push_str(" (important)");
    }
    let _ = write!(line, " | {}", t.category.label());
    if let Some(r) = recurrence_label(t.recurrence) {
        let _ = write!(line, " | {r}");
    }
    line
}

pub fn render_agenda(book: &TaskBook, moods: &MoodLog, day: DayKey) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "# {}\n", day.date().format("%A, %-d %B %Y"));

    let tasks = book.on(&day);
    if tasks.is_empty() {
        s.push_str("No tasks for this day\n");
    }
    for t in tasks {
        let _ = writeln!(s, "{}", task_line(t));
        if !t.description.is_empty() {
            let _ = writeln!(s, "      {}", t.description);
        }
    }

    s.push_str("\n## Wellbeing\n\n");
    match moods.on(&day) {
        Some(e) => {
            let _ = writeln!(s, "{} ({}/5)", e.mood.label(), e.mood.score());
            if e.symptoms.any() {
                let flags: Vec<&str> = [
                    (e.symptoms.headache, "headache"),
                    (e.symptoms.anxiety, "anxiety"),
                    (e.symptoms.apathy, "apathy"),
                ]
                .into_iter()
                .filter_map(|(on, name)| on.then_some(name))
                .collect();
                let _ = writeln!(s, "Symptoms: {}", flags.join(", "));
            }
            if let Some(notes) = &e.notes {
                let _ = writeln!(s, "{notes}");
            }
        }
        None => s.push_str("No wellbeing entry yet\n"),
    }
    s
}

fn bar(band: Option<MoodBand>) -> char {
    match band {
        Some(MoodBand::Good) => '+',
        Some(MoodBand::Neutral) => '=',
        Some(MoodBand::Low) => '-',
        None => '.',
    }
}

pub fn render_analytics(book: &TaskBook, moods: &MoodLog, window_days: usize, end: DayKey) -> String {
    let series = build_series(moods.entries(), window_days, end);
    let summary = SeriesSummary::of(&series);
    let mut s = String::new();

    let _ = writeln!(s, "## Mood, last {window_days} days\n");
    match summary.average {
        Some(avg) => {
            let _ = writeln!(s, "Average score: {avg:.1} over {} days", summary.recorded_days);
        }
        None => s.push_str("Average score: no data\n"),
    }
    let _ = writeln!(
        s,
        "Headache days: {} | Anxiety days: {} | Apathy days: {}",
        summary.symptoms.headache, summary.symptoms.anxiety, summary.symptoms.apathy
    );
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        let chart: String = series.iter().map(|p| bar(p.band())).collect();
        let _ = writeln!(
            s,
            "{} {} {}",
            first.date.date().format("%-d %b"),
            chart,
            last.date.date().format("%-d %b")
        );
    }

    s.push_str("\n## Tasks by category\n\n");
    let stats = aggregate_by_category(book.tasks());
    if stats.is_empty() {
        s.push_str("No tasks yet\n");
    }
    for (category, st) in &stats {
        let pct = st.percent().map_or_else(|| "-".to_string(), |p| format!("{p:.0}%"));
        let _ = writeln!(s, "{:<18} {}/{} {}", category.label(), st.completed, st.total, pct);
    }
    s
}

pub fn render_upcoming(book: &TaskBook, now: NaiveDateTime, limit: usize) -> String {
    let up = book.upcoming(now, limit);
    if up.is_empty() {
        return "No upcoming tasks\n".to_string();
    }
    let mut s = String::new();
    for u in up {
        let marker = match u.task.priority {
            Priority::High => "!!",
            Priority::Medium => "! ",
            Priority::Low => "  ",
        };
        let _ = writeln!(s, "{marker} {}  {}", u.at.format("%d %b %Y, %H:%M"), u.task.title);
    }
    s
}
