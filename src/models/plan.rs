use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::job::{self, Job};

/// One round of the refine loop: what the user asked for and the draft it
/// replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refinement {
    pub feedback: String,
    pub previous_content: String,
}

/// The morning's plan for one calendar date. Created by `dp plan`; the
/// check workflow only flips job statuses, the evening workflow reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub date: Date,
    pub created_at: Timestamp,
    pub jobs: Vec<Job>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refinements: Vec<Refinement>,
}

impl Plan {
    pub fn new(date: Date, jobs: Vec<Job>, content: String) -> Self {
        Self {
            date,
            created_at: Timestamp::now(),
            jobs,
            content,
            refinements: Vec::new(),
        }
    }

    /// Node count across the whole tree, sub-jobs included.
    pub fn total_jobs(&self) -> usize {
        job::count_all(&self.jobs)
    }

    pub fn completed_jobs(&self) -> usize {
        job::count_done(&self.jobs)
    }

    pub fn is_fully_complete(&self) -> bool {
        self.total_jobs() > 0 && self.completed_jobs() == self.total_jobs()
    }

    /// Top-level jobs not marked done, candidates for carry-over.
    pub fn unfinished_jobs(&self) -> Vec<&Job> {
        self.jobs.iter().filter(|j| !j.is_done()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompletionStatus;

    fn plan_with_tree() -> Plan {
        let mut deep = Job::new("Deep work", "Focus block").with_goal("Finish the parser");
        deep.sub_jobs.push(Job::new("Tests", "Cover edge cases"));
        deep.sub_jobs.push(Job::new("Docs", "Update the guide"));
        let errands = Job::new("Errands", "Around town").with_goal("Post office");
        Plan::new(
            Date::constant(2026, 8, 7),
            vec![deep, errands],
            "- [ ] parser\n- [ ] errands".to_string(),
        )
    }

    #[test]
    fn counts_span_the_whole_tree() {
        let mut plan = plan_with_tree();
        assert_eq!(plan.total_jobs(), 4);
        assert_eq!(plan.completed_jobs(), 0);

        plan.jobs[0].sub_jobs[0].status = Some(CompletionStatus::Yes);
        plan.jobs[1].status = Some(CompletionStatus::Yes);
        assert_eq!(plan.completed_jobs(), 2);
        assert!(!plan.is_fully_complete());
    }

    #[test]
    fn fully_complete_requires_every_node() {
        let mut plan = plan_with_tree();
        plan.jobs[0].status = Some(CompletionStatus::Yes);
        plan.jobs[0].sub_jobs[0].status = Some(CompletionStatus::Yes);
        plan.jobs[0].sub_jobs[1].status = Some(CompletionStatus::Yes);
        plan.jobs[1].status = Some(CompletionStatus::Yes);
        assert!(plan.is_fully_complete());
    }

    #[test]
    fn unfinished_jobs_are_top_level_not_done() {
        let mut plan = plan_with_tree();
        plan.jobs[1].status = Some(CompletionStatus::Yes);
        let unfinished = plan.unfinished_jobs();
        assert_eq!(unfinished.len(), 1);
        assert_eq!(unfinished[0].name, "Deep work");

        // Partial still counts as unfinished.
        plan.jobs[0].status = Some(CompletionStatus::Partial);
        assert_eq!(plan.unfinished_jobs().len(), 1);
    }

    #[test]
    fn round_trips_through_json() {
        let mut plan = plan_with_tree();
        plan.refinements.push(Refinement {
            feedback: "move errands to the afternoon".to_string(),
            previous_content: "- [ ] old draft".to_string(),
        });

        let json = serde_json::to_string_pretty(&plan).unwrap();
        let loaded: Plan = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.date, plan.date);
        assert_eq!(loaded.total_jobs(), 4);
        assert_eq!(loaded.content, plan.content);
        assert_eq!(loaded.refinements.len(), 1);
    }
}
