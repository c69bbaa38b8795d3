use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

use super::ChatExchange;

/// Interactive sub-task collection refuses to nest deeper than this.
/// Loaded trees are walked without a guard: ownership makes cycles
/// impossible, so recursion terminates on tree depth.
pub const MAX_TREE_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CompletionStatus {
    Yes,
    No,
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QualityRating {
    Excellent,
    Good,
    Okay,
}

/// A unit of planned activity. Owns its sub-jobs exclusively, so the
/// structure is a strict tree and deletion drops the whole subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_jobs: Vec<Job>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CompletionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityRating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chat_notes: Vec<ChatExchange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carried_over_from: Option<Date>,
}

impl Job {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            goal: String::new(),
            sub_jobs: Vec::new(),
            status: None,
            quality: None,
            notes: None,
            chat_notes: Vec::new(),
            carried_over_from: None,
        }
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == Some(CompletionStatus::Yes)
    }

    /// Number of nodes in this subtree, the job itself included.
    pub fn count_nodes(&self) -> usize {
        1 + self.sub_jobs.iter().map(Job::count_nodes).sum::<usize>()
    }

    pub fn count_done(&self) -> usize {
        usize::from(self.is_done()) + self.sub_jobs.iter().map(Job::count_done).sum::<usize>()
    }

    /// Depth-first pre-order visit of this subtree. The callback receives
    /// each job together with its depth (this job is depth 0).
    pub fn visit<F: FnMut(&Job, usize)>(&self, f: &mut F) {
        self.visit_at(0, f);
    }

    fn visit_at<F: FnMut(&Job, usize)>(&self, depth: usize, f: &mut F) {
        f(self, depth);
        for sub in &self.sub_jobs {
            sub.visit_at(depth + 1, f);
        }
    }

    /// Drops review state from this subtree. Used when a job is carried
    /// over into a new day's plan.
    pub fn clear_review(&mut self) {
        self.status = None;
        self.quality = None;
        self.notes = None;
        for sub in &mut self.sub_jobs {
            sub.clear_review();
        }
    }
}

pub fn count_all(jobs: &[Job]) -> usize {
    jobs.iter().map(Job::count_nodes).sum()
}

pub fn count_done(jobs: &[Job]) -> usize {
    jobs.iter().map(Job::count_done).sum()
}

/// Resolves an index path (one index per tree level) to a job in a forest.
pub fn job_at_path_mut<'a>(jobs: &'a mut [Job], path: &[usize]) -> Option<&'a mut Job> {
    let (&first, rest) = path.split_first()?;
    let job = jobs.get_mut(first)?;
    if rest.is_empty() {
        Some(job)
    } else {
        job_at_path_mut(&mut job.sub_jobs, rest)
    }
}
