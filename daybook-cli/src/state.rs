use anyhow::{Context, Result, bail};
use daybook_core::{MoodLog, RawMoodEntry, RawTask, TaskBook};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub fn daybook_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("DAYBOOK_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".daybook"))
}

pub fn ensure_daybook_home() -> Result<PathBuf> {
    let dir = daybook_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_snapshot_path() -> Result<PathBuf> {
    Ok(daybook_home()?.join("snapshot.json"))
}

/// Collections handed over by the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<RawTask>,
    #[serde(default)]
    pub moods: Vec<RawMoodEntry>,
}

/// Validated, owned view of one snapshot read.
pub struct Loaded {
    pub book: TaskBook,
    pub moods: MoodLog,
}

impl Snapshot {
    /// Validate every record. Tasks without an id get `task-<n>`, skipping
    /// ids the snapshot already uses.
    pub fn validate(self) -> Result<Loaded> {
        let taken: HashSet<String> = self.tasks.iter().filter_map(|t| t.id.clone()).collect();
        let mut seq = 0u64;
        let mut tasks = Vec::with_capacity(self.tasks.len());
        for (i, raw) in self.tasks.into_iter().enumerate() {
            let title = raw.title.clone();
            let id = match &raw.id {
                Some(id) => id.clone(),
                None => next_free_id(&taken, &mut seq),
            };
            let task = raw
                .into_task(id)
                .with_context(|| format!("task #{} ('{}')", i + 1, title))?;
            tasks.push(task);
        }
        let book = TaskBook::from_tasks(tasks)?;

        let mut entries = Vec::with_capacity(self.moods.len());
        for (i, raw) in self.moods.into_iter().enumerate() {
            entries.push(raw.into_entry().with_context(|| format!("mood entry #{}", i + 1))?);
        }

        Ok(Loaded {
            book,
            moods: MoodLog::from_entries(entries),
        })
    }
}

fn next_free_id(taken: &HashSet<String>, seq: &mut u64) -> String {
    loop {
        *seq += 1;
        let id = format!("task-{seq}");
        if !taken.contains(&id) {
            return id;
        }
    }
}

pub fn read_snapshot(path: &Path) -> Result<Loaded> {
    if !path.exists() {
        bail!(
            "No snapshot at {} (pass --snapshot <file>)",
            path.display()
        );
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let snapshot: Snapshot =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    let loaded = snapshot
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    tracing::debug!(
        tasks = loaded.book.len(),
        moods = loaded.moods.len(),
        "loaded snapshot"
    );
    Ok(loaded)
}
