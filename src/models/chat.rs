use serde::{Deserialize, Serialize};

/// One user/assistant exchange, recorded into plans and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub user: String,
    pub assistant: String,
}

impl ChatExchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}
