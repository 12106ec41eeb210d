use anyhow::Result;
use chrono::Utc;
use daybook_core::{NotifiedLog, ReminderIntent, poll_due_reminders, time::local_now};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::state::read_snapshot;

/// Poll the snapshot for due reminders until Ctrl-C.
///
/// Each tick re-reads the snapshot so edits made between polls are picked up.
/// A snapshot that fails to load is skipped for that tick.
pub async fn run(cfg: &Config, snapshot: &Path) -> Result<()> {
    let policy = cfg.reminder_policy()?;
    if !policy.enabled {
        println!("Reminders are disabled ([reminders].enabled = false)");
        return Ok(());
    }
    let tz = cfg.tz()?;
    let period = Duration::from_secs(cfg.reminders.poll_seconds.max(1));

    tracing::info!(
        snapshot = %snapshot.display(),
        lead_minutes = policy.lead_minutes,
        high_priority_only = policy.high_priority_only,
        every_secs = period.as_secs(),
        "watching for reminders"
    );

    let mut notified = NotifiedLog::new();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(sent = notified.len(), "stopping");
                return Ok(());
            }
        }

        let loaded = match read_snapshot(snapshot) {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "snapshot unreadable, skipping poll");
                continue;
            }
        };

        let now = local_now(tz, Utc::now());
        for intent in poll_due_reminders(loaded.book.tasks(), policy, now, &mut notified) {
            deliver(&intent);
        }
        notified.prune_before(daybook_core::day_key(&now));
    }
}

fn deliver(intent: &ReminderIntent) {
    tracing::info!(key = %intent.key, priority = %intent.priority, "reminder");
    println!("🔔 {} - {}", intent.title, intent.body);
}
