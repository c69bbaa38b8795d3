use jiff::Timestamp;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FeedbackStatus {
    Pending,
    Implemented,
    Dismissed,
}

/// A note about the tool itself. Appended to a single accumulating file;
/// only the status changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub understanding: Option<String>,
    pub created_at: Timestamp,
    pub status: FeedbackStatus,
}

impl FeedbackEntry {
    pub fn new(text: impl Into<String>, understanding: Option<String>) -> Self {
        Self {
            id: nanoid!(8),
            text: text.into(),
            understanding,
            created_at: Timestamp::now(),
            status: FeedbackStatus::Pending,
        }
    }
}
