use anyhow::{Context, Result};
use chrono_tz::Tz;
use daybook_core::{DEFAULT_UPCOMING_LIMIT, DEFAULT_WINDOW_DAYS, ReminderPolicy, parse_lead};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_daybook_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone that defines the local calendar day.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub reminders: RemindersSection,
    #[serde(default)]
    pub analytics: AnalyticsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemindersSection {
    pub enabled: bool,
    /// "15m", "2h", or plain minutes.
    pub lead: String,
    pub high_priority_only: bool,
    pub poll_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSection {
    pub window_days: usize,
    pub upcoming_limit: usize,
}

fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            reminders: RemindersSection::default(),
            analytics: AnalyticsSection::default(),
        }
    }
}

impl Default for RemindersSection {
    fn default() -> Self {
        Self {
            enabled: true,
            lead: "30m".to_string(),
            high_priority_only: false,
            poll_seconds: 60,
        }
    }
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        daybook_core::time::parse_timezone(&self.timezone)
    }

    pub fn reminder_policy(&self) -> Result<ReminderPolicy> {
        let lead_minutes = parse_lead(&self.reminders.lead).context("config [reminders].lead")?;
        Ok(ReminderPolicy {
            enabled: self.reminders.enabled,
            lead_minutes,
            high_priority_only: self.reminders.high_priority_only,
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_daybook_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        tracing::debug!(path = %p.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
