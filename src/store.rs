use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fs2::FileExt;
use jiff::civil::Date;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{FeedbackEntry, FeedbackStatus, Log, Plan};

/// Atomically write content to a file using a temporary file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let temp = path.with_extension("tmp");
    let mut file = File::create(&temp)
        .with_context(|| format!("Failed to create temporary file: {}", temp.display()))?;
    file.lock_exclusive()
        .context("Failed to acquire file lock")?;
    file.write_all(content)
        .context("Failed to write file content")?;
    file.sync_all().context("Failed to sync file")?;
    file.unlock().context("Failed to unlock file")?;
    fs::rename(&temp, path).with_context(|| format!("Failed to rename to {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FeedbackFile {
    #[serde(default)]
    entries: Vec<FeedbackEntry>,
}

/// Date-keyed records on disk. One plan and one log file per calendar
/// date; saving again for the same date overwrites whole-file.
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn plan_path(&self, date: Date) -> PathBuf {
        self.data_dir.join(format!("{date}-plan.json"))
    }

    pub fn log_path(&self, date: Date) -> PathBuf {
        self.data_dir.join(format!("{date}-log.json"))
    }

    pub fn log_markdown_path(&self, date: Date) -> PathBuf {
        self.data_dir.join(format!("{date}-log.md"))
    }

    pub fn feedback_path(&self) -> PathBuf {
        self.data_dir.join("feedback.json")
    }

    // Plans

    pub fn save_plan(&self, plan: &Plan) -> Result<()> {
        let path = self.plan_path(plan.date);
        debug!("saving plan to {}", path.display());
        let content = serde_json::to_vec_pretty(plan).context("Failed to serialize plan")?;
        atomic_write(&path, &content)
    }

    pub fn load_plan(&self, date: Date) -> Result<Option<Plan>> {
        read_json(&self.plan_path(date))
    }

    pub fn plan_exists(&self, date: Date) -> bool {
        self.plan_path(date).exists()
    }

    /// Dates with a saved plan, newest first.
    pub fn list_plan_dates(&self) -> Result<Vec<Date>> {
        let mut dates = Vec::new();
        let dir = fs::read_dir(&self.data_dir).context("Failed to read data directory")?;

        for entry in dir {
            let entry = entry.context("Failed to read directory entry")?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(stem) = name.strip_suffix("-plan.json")
                && let Ok(date) = stem.parse::<Date>()
            {
                dates.push(date);
            }
        }

        dates.sort_unstable_by(|a, b| b.cmp(a));
        Ok(dates)
    }

    // Logs

    /// Writes the log as JSON plus a Markdown rendition alongside it.
    pub fn save_log(&self, log: &Log) -> Result<()> {
        let path = self.log_path(log.date);
        debug!("saving log to {}", path.display());
        let content = serde_json::to_vec_pretty(log).context("Failed to serialize log")?;
        atomic_write(&path, &content)?;
        atomic_write(&self.log_markdown_path(log.date), log.to_markdown().as_bytes())
    }

    pub fn load_log(&self, date: Date) -> Result<Option<Log>> {
        read_json(&self.log_path(date))
    }

    // Feedback

    pub fn load_feedback(&self) -> Result<Vec<FeedbackEntry>> {
        let file: Option<FeedbackFile> = read_json(&self.feedback_path())?;
        Ok(file.unwrap_or_default().entries)
    }

    pub fn append_feedback(&self, entry: FeedbackEntry) -> Result<()> {
        let mut entries = self.load_feedback()?;
        entries.push(entry);
        self.write_feedback(entries)
    }

    pub fn update_feedback_status(&self, id: &str, status: FeedbackStatus) -> Result<FeedbackEntry> {
        let mut entries = self.load_feedback()?;
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            bail!("Feedback entry not found: {id}");
        };
        entry.status = status;
        let updated = entry.clone();
        self.write_feedback(entries)?;
        Ok(updated)
    }

    fn write_feedback(&self, entries: Vec<FeedbackEntry>) -> Result<()> {
        let file = FeedbackFile { entries };
        let content = serde_json::to_vec_pretty(&file).context("Failed to serialize feedback")?;
        atomic_write(&self.feedback_path(), &content)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(value))
}
