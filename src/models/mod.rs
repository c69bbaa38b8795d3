mod chat;
mod feedback;
pub mod job;
mod log;
mod plan;

pub use chat::ChatExchange;
pub use feedback::{FeedbackEntry, FeedbackStatus};
pub use job::{CompletionStatus, Job, MAX_TREE_DEPTH, QualityRating};
pub use log::{JobReview, Log};
pub use plan::{Plan, Refinement};
