use anyhow::Result;
use console::{Term, style};

use crate::models::{FeedbackEntry, FeedbackStatus, Job, Plan};

const PANEL_WIDTH: usize = 78;

pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    pub fn blank(&self) -> Result<()> {
        self.term.write_line("")?;
        Ok(())
    }

    pub fn header(&self, title: &str, subtitle: &str) -> Result<()> {
        self.term
            .write_line(&style(title).cyan().bold().to_string())?;
        self.term.write_line(&style(subtitle).dim().to_string())?;
        self.term
            .write_line(&style("─".repeat(PANEL_WIDTH)).dim().to_string())?;
        Ok(())
    }

    pub fn info(&self, msg: &str) -> Result<()> {
        self.term.write_line(&style(msg).dim().to_string())?;
        Ok(())
    }

    pub fn working(&self, msg: &str) -> Result<()> {
        self.term.write_line(&style(msg).yellow().to_string())?;
        Ok(())
    }

    pub fn success(&self, msg: &str) -> Result<()> {
        self.term
            .write_line(&format!("{} {msg}", style("✓").green()))?;
        Ok(())
    }

    pub fn warn(&self, msg: &str) -> Result<()> {
        self.term.write_line(&style(msg).yellow().to_string())?;
        Ok(())
    }

    pub fn error(&self, msg: &str) -> Result<()> {
        self.term.write_line(&style(msg).red().to_string())?;
        Ok(())
    }

    /// Boxes wrapped content under a styled title. Used for generated
    /// plans, summaries, and chat replies.
    pub fn panel(&self, title: &str, content: &str) -> Result<()> {
        self.term
            .write_line(&style("─".repeat(PANEL_WIDTH)).dim().to_string())?;
        self.term
            .write_line(&style(title).magenta().bold().to_string())?;
        self.term.write_line("")?;
        for line in content.lines() {
            if line.is_empty() {
                self.term.write_line("")?;
                continue;
            }
            for wrapped in textwrap::wrap(line, PANEL_WIDTH - 2) {
                self.term.write_line(&format!("  {wrapped}"))?;
            }
        }
        self.term
            .write_line(&style("─".repeat(PANEL_WIDTH)).dim().to_string())?;
        Ok(())
    }

    pub fn job_header(&self, name: &str, description: &str, depth: usize) -> Result<()> {
        let indent = "  ".repeat(depth);
        self.term
            .write_line(&format!("{indent}{}", style(name).cyan().bold()))?;
        if !description.is_empty() {
            self.term
                .write_line(&format!("{indent}{}", style(description).dim()))?;
        }
        Ok(())
    }

    /// Per-job completion table plus overall progress, printed after a
    /// check session.
    pub fn completion_summary(&self, plan: &Plan) -> Result<()> {
        self.term
            .write_line(&style("Completion Summary").green().bold().to_string())?;
        for job in &plan.jobs {
            job.visit(&mut |j: &Job, depth| {
                let marker = if j.is_done() {
                    style("✓").green().to_string()
                } else {
                    style("○").dim().to_string()
                };
                let indent = "  ".repeat(depth + 1);
                let _ = self
                    .term
                    .write_line(&format!("{indent}{marker} {}", j.name));
            });
        }

        let total = plan.total_jobs();
        let done = plan.completed_jobs();
        let percent = if total > 0 { done * 100 / total } else { 0 };
        self.term.write_line("")?;
        self.term.write_line(&format!(
            "{} {done}/{total} tasks completed ({percent}%)",
            style("Progress:").bold()
        ))?;
        Ok(())
    }

    pub fn status_dashboard(
        &self,
        date_line: &str,
        progress: Option<(usize, usize)>,
        streak: usize,
    ) -> Result<()> {
        self.term.write_line(date_line)?;
        match progress {
            Some((done, total)) => {
                let percent = if total > 0 { done * 100 / total } else { 0 };
                let bar = progress_bar(done, total, 15);
                self.term
                    .write_line(&format!("Today: {bar} {done}/{total} done ({percent}%)"))?;
            }
            None => {
                self.term
                    .write_line(&style("No plan yet for today.").dim().to_string())?;
            }
        }
        if streak > 0 {
            self.term.write_line(
                &style(format!("{streak}-day completion streak!"))
                    .yellow()
                    .bold()
                    .to_string(),
            )?;
        }
        Ok(())
    }

    pub fn feedback_table(&self, entries: &[FeedbackEntry]) -> Result<()> {
        if entries.is_empty() {
            self.term.write_line("No feedback entries found.")?;
            return Ok(());
        }

        for entry in entries {
            let status = match entry.status {
                FeedbackStatus::Pending => style("pending").yellow().to_string(),
                FeedbackStatus::Implemented => style("implemented").green().to_string(),
                FeedbackStatus::Dismissed => style("dismissed").dim().to_string(),
            };
            let mut text = entry.text.clone();
            if text.len() > 50 {
                text.truncate(47);
                text.push_str("...");
            }
            self.term.write_line(&format!(
                "{} [{status}] {text}",
                style(&entry.id).cyan().bold()
            ))?;
            self.term.write_line(&format!(
                "  {}",
                style(entry.created_at.to_string()).dim()
            ))?;
        }
        self.term.write_line("")?;
        self.term.write_line(
            &style(format!("Total: {} entries", entries.len()))
                .dim()
                .to_string(),
        )?;
        Ok(())
    }

    pub fn feedback_detail(&self, entry: &FeedbackEntry) -> Result<()> {
        self.term.write_line(&format!(
            "Feedback {} [{}]",
            style(&entry.id).cyan().bold(),
            style(entry.status.as_ref()).yellow()
        ))?;
        self.term
            .write_line(&format!("  Created: {}", entry.created_at))?;
        self.term.write_line(&format!("  Text: {}", entry.text))?;
        if let Some(understanding) = &entry.understanding {
            self.term.write_line("")?;
            self.panel("Assistant's understanding", understanding)?;
        }
        Ok(())
    }
}

fn progress_bar(done: usize, total: usize, width: usize) -> String {
    let filled = if total > 0 { width * done / total } else { 0 };
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(width - filled));
    if total > 0 && done == total {
        style(bar).green().to_string()
    } else {
        style(bar).cyan().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        let bar = console::strip_ansi_codes(&progress_bar(1, 2, 10)).to_string();
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), 5);
        assert_eq!(bar.chars().filter(|&c| c == '░').count(), 5);
    }

    #[test]
    fn progress_bar_handles_empty_plan() {
        let bar = console::strip_ansi_codes(&progress_bar(0, 0, 10)).to_string();
        assert_eq!(bar.chars().filter(|&c| c == '░').count(), 10);
    }
}
