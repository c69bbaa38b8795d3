//! Chat-completion client for plan and summary generation.
//!
//! One blocking HTTPS request per generation or chat turn. Transient
//! failures (timeouts, rate limits, 5xx) are retried a bounded number of
//! times with exponential backoff; anything else surfaces immediately.

use std::fmt::Write as _;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AiSettings;
use crate::models::{Job, JobReview, Plan};

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Request never produced a usable HTTP response.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response arrived but carried no usable text.
    #[error("unusable response: {0}")]
    Content(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

pub struct ChatClient {
    http: reqwest::blocking::Client,
    model: String,
    api_key: String,
    base_url: String,
    max_tokens: u32,
    temperature_generate: f64,
    temperature_chat: f64,
}

impl ChatClient {
    pub fn new(settings: &AiSettings, api_key: String) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            model: settings.model.clone(),
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_tokens: settings.max_tokens,
            temperature_generate: settings.temperature_generate,
            temperature_chat: settings.temperature_chat,
        })
    }

    fn request_body(&self, messages: &[ChatMessage], temperature: f64) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": temperature,
            "max_tokens": self.max_tokens,
        })
    }

    /// Sends the message history and returns the generated text.
    pub fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
    ) -> Result<String, ClientError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.request_body(messages, temperature);

        let mut last_error = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(
                    "retrying completion after transient error (attempt {attempt}, backoff {backoff}ms)"
                );
                std::thread::sleep(Duration::from_millis(backoff));
            }

            let response = match self
                .http
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("content-type", "application/json")
                .json(&body)
                .send()
            {
                Ok(r) => r,
                Err(e) => {
                    debug!("completion request failed: {e}");
                    last_error = Some(ClientError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();
            if is_retryable_status(status) && attempt + 1 < MAX_ATTEMPTS {
                let message = response.text().unwrap_or_default();
                debug!("retryable status {status}: {message}");
                last_error = Some(ClientError::Api { status, message });
                continue;
            }

            if !response.status().is_success() {
                let message = response.text().unwrap_or_default();
                return Err(ClientError::Api { status, message });
            }

            let api_response: ApiResponse = response.json()?;
            return extract_content(api_response);
        }

        Err(last_error
            .unwrap_or_else(|| ClientError::Content("no attempt produced a response".to_string())))
    }

    /// Generates the morning plan from the collected job tree.
    pub fn generate_plan(&self, jobs: &[Job]) -> Result<String, ClientError> {
        let messages = [
            ChatMessage::system(
                "You are a helpful planning assistant that creates clear, actionable daily \
                 plans with proper hierarchy.",
            ),
            ChatMessage::user(plan_prompt(jobs)),
        ];
        self.complete(&messages, self.temperature_generate)
    }

    /// Regenerates the plan after user feedback, preserving structure.
    pub fn refine_plan(&self, current: &str, feedback: &str) -> Result<String, ClientError> {
        let messages = [
            ChatMessage::system(
                "You are a helpful planning assistant that refines daily plans based on \
                 user feedback.",
            ),
            ChatMessage::user(refine_prompt(current, feedback)),
        ];
        self.complete(&messages, self.temperature_generate)
    }

    /// Generates the evening summary from the plan and its reviews.
    pub fn generate_summary(
        &self,
        plan: &Plan,
        reviews: &[JobReview],
    ) -> Result<String, ClientError> {
        let messages = [
            ChatMessage::system(
                "You are a thoughtful reflection assistant that helps people learn from \
                 their daily experiences.",
            ),
            ChatMessage::user(summary_prompt(plan, reviews)),
        ];
        self.complete(&messages, self.temperature_generate)
    }

    /// One conversational turn. Appends both sides to `history` on success.
    pub fn chat(
        &self,
        history: &mut Vec<ChatMessage>,
        message: &str,
    ) -> Result<String, ClientError> {
        history.push(ChatMessage::user(message));
        match self.complete(history, self.temperature_chat) {
            Ok(reply) => {
                history.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                // Keep the history consistent with what the service saw.
                history.pop();
                Err(err)
            }
        }
    }
}

fn extract_content(response: ApiResponse) -> Result<String, ClientError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(ClientError::Content("response had no text".to_string()));
    }
    Ok(content)
}

fn plan_prompt(jobs: &[Job]) -> String {
    let mut prompt = String::from(
        "Based on the following job inputs, create a detailed daily plan with checkboxes.\n\
         Break down each job into specific, actionable tasks.\n\
         Use markdown format with checkbox syntax (- [ ]).\n\
         For sub-tasks, use nested indentation to show hierarchy.\n\n",
    );

    for job in jobs {
        let _ = writeln!(prompt, "## {}", job.name);
        let _ = writeln!(prompt, "Description: {}", job.description);
        let _ = writeln!(prompt, "What to do: {}", job.goal);
        if let Some(from) = job.carried_over_from {
            let _ = writeln!(prompt, "Carried over from: {from}");
        }
        if !job.sub_jobs.is_empty() {
            prompt.push_str("Sub-tasks:\n");
            format_sub_jobs(&mut prompt, &job.sub_jobs, 1);
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Please create a well-organized daily plan with clear, actionable tasks. \
         Preserve the hierarchy of sub-tasks.",
    );
    prompt
}

fn format_sub_jobs(out: &mut String, sub_jobs: &[Job], depth: usize) {
    let indent = "  ".repeat(depth);
    for sub in sub_jobs {
        let _ = writeln!(out, "{indent}- Sub-task: {}", sub.name);
        let _ = writeln!(out, "{indent}  What to do: {}", sub.description);
        format_sub_jobs(out, &sub.sub_jobs, depth + 1);
    }
}

fn refine_prompt(current: &str, feedback: &str) -> String {
    format!(
        "Here is the current daily plan:\n\n{current}\n\nUser feedback: {feedback}\n\n\
         Please update the plan based on the feedback. Keep the same structure and format. \
         Make the requested changes while preserving what works well."
    )
}

fn summary_prompt(plan: &Plan, reviews: &[JobReview]) -> String {
    let mut prompt = String::from(
        "Based on the following plan and review, create a comprehensive daily summary.\n\
         Include accomplishments, challenges, reflections, and recommendations for tomorrow.\n\n",
    );

    prompt.push_str("## Original Plan:\n");
    for job in &plan.jobs {
        let _ = writeln!(prompt, "### {}", job.name);
        let _ = writeln!(prompt, "{}\n", job.goal);
    }

    prompt.push_str("## Review:\n");
    for review in reviews {
        let _ = writeln!(prompt, "### {}", review.job_name);
        let _ = writeln!(prompt, "Status: {}", review.status.as_ref());
        if let Some(quality) = review.quality {
            let _ = writeln!(prompt, "Quality: {}", quality.as_ref());
        }
        if let Some(notes) = &review.notes {
            let _ = writeln!(prompt, "Issue: {notes}");
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Please create a thoughtful summary with sections for:\n\
         1. Accomplishments\n2. Challenges\n3. Reflection\n4. Recommendations for Tomorrow",
    );
    prompt
}

// Chat-completion response shape; only the fields we read.

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}
