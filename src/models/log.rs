use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::chat::ChatExchange;
use super::job::{CompletionStatus, QualityRating};
use super::plan::Plan;

/// Review collected for one job during the evening walk, in visit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReview {
    pub job_name: String,
    pub status: CompletionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The evening's record of one day: the reviewed plan, per-job reviews,
/// the generated summary, and any closing chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    pub date: Date,
    pub created_at: Timestamp,
    pub plan: Plan,
    pub reviews: Vec<JobReview>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chat: Vec<ChatExchange>,
}

impl Log {
    pub fn new(
        plan: Plan,
        reviews: Vec<JobReview>,
        summary: String,
        chat: Vec<ChatExchange>,
    ) -> Self {
        Self {
            date: plan.date,
            created_at: Timestamp::now(),
            plan,
            reviews,
            summary,
            chat,
        }
    }

    /// Markdown rendition written next to the JSON file.
    pub fn to_markdown(&self) -> String {
        let mut md = format!("# Daily Summary - {}\n\n{}\n\n", self.date, self.summary);

        if !self.chat.is_empty() {
            md.push_str("## Chat History\n\n");
            for exchange in &self.chat {
                md.push_str(&format!("**You:** {}\n\n", exchange.user));
                md.push_str(&format!("**Assistant:** {}\n\n", exchange.assistant));
            }
        }

        md.push_str("---\n*Generated by dayplan*\n");
        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Job;

    fn sample_log() -> Log {
        let plan = Plan::new(
            Date::constant(2026, 8, 7),
            vec![Job::new("Work", "Deep work")],
            "- [ ] work".to_string(),
        );
        let reviews = vec![JobReview {
            job_name: "Work".to_string(),
            status: CompletionStatus::Yes,
            quality: Some(QualityRating::Good),
            notes: None,
        }];
        Log::new(plan, reviews, "A solid day.".to_string(), Vec::new())
    }

    #[test]
    fn log_date_follows_plan_date() {
        let log = sample_log();
        assert_eq!(log.date, log.plan.date);
    }

    #[test]
    fn round_trips_through_json() {
        let mut log = sample_log();
        log.chat.push(ChatExchange::new("how did I do?", "well"));

        let json = serde_json::to_string(&log).unwrap();
        let loaded: Log = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.reviews.len(), 1);
        assert_eq!(loaded.reviews[0].status, CompletionStatus::Yes);
        assert_eq!(loaded.reviews[0].quality, Some(QualityRating::Good));
        assert_eq!(loaded.chat.len(), 1);
        assert_eq!(loaded.summary, "A solid day.");
    }

    #[test]
    fn markdown_includes_summary_and_chat() {
        let mut log = sample_log();
        let md = log.to_markdown();
        assert!(md.starts_with("# Daily Summary - 2026-08-07"));
        assert!(md.contains("A solid day."));
        assert!(!md.contains("## Chat History"));

        log.chat.push(ChatExchange::new("question", "answer"));
        let md = log.to_markdown();
        assert!(md.contains("## Chat History"));
        assert!(md.contains("**You:** question"));
        assert!(md.contains("**Assistant:** answer"));
    }
}
