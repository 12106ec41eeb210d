use chrono::{NaiveDate, NaiveDateTime};
use daybook_core::{
    Category, DayKey, Mood, MoodEntry, MoodLog, NotifiedLog, Recurrence, ReminderKey,
    ReminderPolicy, TaskBook, TaskDraft, aggregate_by_category, average_score, build_series,
    matches, poll_due_reminders, should_remind,
};

fn day(y: i32, m: u32, d: u32) -> DayKey {
    DayKey::from_ymd(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

/// Every day of 2024 plus a little of 2025.
fn query_days() -> impl Iterator<Item = DayKey> {
    std::iter::successors(Some(day(2024, 1, 1)), |d| d.offset(1)).take(400)
}

#[test]
fn anchor_day_is_reflexive_for_every_rule() {
    let anchor = at(2024, 2, 29, 18, 30);
    for r in [Recurrence::None, Recurrence::Daily, Recurrence::Weekly, Recurrence::Monthly] {
        assert!(matches(&anchor, r, None, &anchor));
        assert!(matches(&anchor, r, Some(day(2024, 2, 29)), &day(2024, 2, 29)));
    }
}

#[test]
fn daily_covers_exactly_anchor_through_end() {
    let anchor = day(2024, 3, 10);
    let end = day(2024, 4, 2);
    for q in query_days() {
        let expected = q >= anchor && q <= end;
        assert_eq!(matches(&anchor, Recurrence::Daily, Some(end), &q), expected, "{q}");
    }
}

#[test]
fn weekly_is_seven_day_periodic() {
    let anchor = day(2024, 1, 3);
    for q in query_days() {
        let Some(later) = q.offset(7) else { continue };
        if q >= anchor {
            assert_eq!(
                matches(&anchor, Recurrence::Weekly, None, &q),
                matches(&anchor, Recurrence::Weekly, None, &later),
                "{q}"
            );
        }
    }
}

#[test]
fn monthly_on_the_31st() {
    let anchor = at(2024, 1, 31, 9, 0);
    assert!(!matches(&anchor, Recurrence::Monthly, None, &day(2024, 2, 29)));
    assert!(matches(&anchor, Recurrence::Monthly, None, &day(2024, 3, 31)));

    let hits: Vec<DayKey> = query_days()
        .filter(|q| matches(&anchor, Recurrence::Monthly, None, q))
        .collect();
    // Jan, Mar, May, Jul, Aug, Oct, Dec of 2024 and Jan 2025.
    assert_eq!(hits.len(), 8);
    assert!(hits.iter().all(|d| d.day_of_month() == 31));
}

#[test]
fn mood_series_with_gap() {
    let mut log = MoodLog::new();
    log.record(MoodEntry::new(&day(2024, 5, 1), Mood::Good));
    log.record(MoodEntry::new(&day(2024, 5, 3), Mood::Bad));

    let series = build_series(log.entries(), 3, day(2024, 5, 3));
    let got: Vec<(DayKey, Option<u8>)> = series.iter().map(|p| (p.date, p.score)).collect();
    assert_eq!(
        got,
        vec![
            (day(2024, 5, 1), Some(4)),
            (day(2024, 5, 2), None),
            (day(2024, 5, 3), Some(2)),
        ]
    );
    assert_eq!(average_score(&series), Some(3.0));
}

#[test]
fn series_length_never_depends_on_entries() {
    let many: Vec<MoodEntry> = query_days().map(|d| MoodEntry::new(&d, Mood::Ok)).collect();
    for window in [0usize, 1, 7, 30, 90] {
        assert_eq!(build_series(&[], window, day(2024, 6, 30)).len(), window);
        assert_eq!(build_series(&many, window, day(2024, 6, 30)).len(), window);
    }
}

#[test]
fn category_aggregation_scenario() {
    let anchor = at(2024, 6, 1, 10, 0);
    let mut book = TaskBook::new();
    let mut health_ids = Vec::new();
    for i in 0..4 {
        let t = book
            .add(TaskDraft::new(format!("checkup {i}"), anchor).with_category(Category::Health))
            .unwrap();
        health_ids.push(t.id.clone());
    }
    for (i, c) in [Category::Family, Category::Sport, Category::Tasks]
        .iter()
        .cycle()
        .take(6)
        .enumerate()
    {
        book.add(TaskDraft::new(format!("other {i}"), anchor).with_category(*c))
            .unwrap();
    }
    book.toggle(&health_ids[2]).unwrap();

    let stats = aggregate_by_category(book.tasks());
    assert_eq!(book.len(), 10);
    assert!(!stats.contains_key(&Category::Work));
    assert_eq!(stats[&Category::Health].total, 4);
    assert_eq!(stats[&Category::Health].completed, 1);
    assert_eq!(stats.values().map(|s| s.total).sum::<usize>(), book.len());
    assert!(stats.values().all(|s| s.completed <= s.total));
}

#[test]
fn acknowledged_reminder_stays_quiet() {
    let occ = at(2024, 6, 3, 14, 0);
    let mut notified = false;
    let mut fired = 0;
    for minute in 25..60 {
        let now = at(2024, 6, 3, 13, minute);
        if should_remind(occ, 30, now, notified) {
            fired += 1;
            notified = true;
        }
    }
    assert_eq!(fired, 1);
}

#[test]
fn polling_a_changing_book() {
    let mut book = TaskBook::new();
    let id = book
        .add(TaskDraft::new("Client call", at(2024, 6, 3, 15, 0)))
        .unwrap()
        .id
        .clone();
    let policy = ReminderPolicy::default();
    let mut log = NotifiedLog::new();

    // Completed before the window opens: nothing fires.
    book.toggle(&id).unwrap();
    assert!(poll_due_reminders(book.tasks(), policy, at(2024, 6, 3, 14, 40), &mut log).is_empty());

    // Re-opened between polls: the next poll sees it.
    book.toggle(&id).unwrap();
    let out = poll_due_reminders(book.tasks(), policy, at(2024, 6, 3, 14, 41), &mut log);
    assert_eq!(out.len(), 1);
    assert!(log.contains(&ReminderKey::new(id, day(2024, 6, 3))));
}
