//! Interactive terminal prompts. Invalid input is never fatal: every
//! reader loops until it gets something usable or an accepted default.

use anyhow::{Context, Result};
use console::{Term, style};

use crate::models::{CompletionStatus, QualityRating};

pub struct Interact {
    term: Term,
}

impl Default for Interact {
    fn default() -> Self {
        Self::new()
    }
}

impl Interact {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Free-text input. Returns the trimmed line; empty means the caller
    /// should skip.
    pub fn input(&self, label: &str) -> Result<String> {
        self.term
            .write_str(&format!("{}: ", style(label).cyan()))
            .context("Failed to write prompt")?;
        let line = self.term.read_line().context("Failed to read input")?;
        Ok(line.trim().to_string())
    }

    pub fn confirm(&self, label: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            self.term
                .write_str(&format!("{} [{hint}]: ", style(label).cyan()))
                .context("Failed to write prompt")?;
            let line = self.term.read_line().context("Failed to read input")?;
            match line.trim().to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                other => {
                    self.term.write_line(
                        &style(format!("Please answer y or n, not '{other}'."))
                            .yellow()
                            .to_string(),
                    )?;
                }
            }
        }
    }

    /// Numbered single selection. Re-prompts until a listed number is
    /// entered.
    pub fn select(&self, label: &str, items: &[String]) -> Result<usize> {
        self.term.write_line(&style(label).cyan().to_string())?;
        for (i, item) in items.iter().enumerate() {
            self.term
                .write_line(&format!("  {} {item}", style(format!("{}.", i + 1)).dim()))?;
        }
        loop {
            self.term.write_str("Choice: ")?;
            let line = self.term.read_line().context("Failed to read input")?;
            match line.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= items.len() => return Ok(n - 1),
                _ => {
                    self.term.write_line(
                        &style(format!("Enter a number between 1 and {}.", items.len()))
                            .yellow()
                            .to_string(),
                    )?;
                }
            }
        }
    }

    /// Comma-separated multi selection. Empty input selects nothing;
    /// unknown numbers cause a re-prompt.
    pub fn multi_select(&self, label: &str, items: &[String]) -> Result<Vec<usize>> {
        self.term.write_line(&style(label).cyan().to_string())?;
        for (i, item) in items.iter().enumerate() {
            self.term
                .write_line(&format!("  {} {item}", style(format!("{}.", i + 1)).dim()))?;
        }
        loop {
            self.term
                .write_str("Choices (comma-separated, empty for none): ")?;
            let line = self.term.read_line().context("Failed to read input")?;
            let line = line.trim();
            if line.is_empty() {
                return Ok(Vec::new());
            }

            let parsed: Option<Vec<usize>> = line
                .split(',')
                .map(|part| match part.trim().parse::<usize>() {
                    Ok(n) if n >= 1 && n <= items.len() => Some(n - 1),
                    _ => None,
                })
                .collect();

            match parsed {
                Some(mut indices) => {
                    indices.sort_unstable();
                    indices.dedup();
                    return Ok(indices);
                }
                None => {
                    self.term.write_line(
                        &style(format!("Use numbers between 1 and {}.", items.len()))
                            .yellow()
                            .to_string(),
                    )?;
                }
            }
        }
    }

    /// Completion status for the evening review. Empty input takes the
    /// default; `skip` skips the node entirely.
    pub fn completion_status(&self, label: &str) -> Result<Option<CompletionStatus>> {
        loop {
            self.term.write_str(&format!(
                "{} [yes/no/partial/skip] (yes): ",
                style(label).cyan()
            ))?;
            let line = self.term.read_line().context("Failed to read input")?;
            let word = line.trim();
            if word.is_empty() {
                return Ok(Some(CompletionStatus::Yes));
            }
            if word.eq_ignore_ascii_case("skip") {
                return Ok(None);
            }
            match word.parse::<CompletionStatus>() {
                Ok(status) => return Ok(Some(status)),
                Err(_) => {
                    self.term.write_line(
                        &style("Answer yes, no, partial, or skip.").yellow().to_string(),
                    )?;
                }
            }
        }
    }

    pub fn quality_rating(&self, label: &str) -> Result<QualityRating> {
        loop {
            self.term.write_str(&format!(
                "{} [excellent/good/okay] (good): ",
                style(label).cyan()
            ))?;
            let line = self.term.read_line().context("Failed to read input")?;
            let word = line.trim();
            if word.is_empty() {
                return Ok(QualityRating::Good);
            }
            match word.parse::<QualityRating>() {
                Ok(quality) => return Ok(quality),
                Err(_) => {
                    self.term.write_line(
                        &style("Answer excellent, good, or okay.").yellow().to_string(),
                    )?;
                }
            }
        }
    }
}
