use anyhow::{Context, Result};
use jiff::civil::Date;

use super::generate_with_retry;
use crate::client::{ChatClient, ChatMessage};
use crate::interact::Interact;
use crate::models::{ChatExchange, CompletionStatus, Job, JobReview, Log};
use crate::output::Output;
use crate::store::Store;

const CHAT_EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

/// Evening workflow: walk the plan's tree collecting a review per node,
/// generate a summary, chat about the day, persist the log.
pub fn run(
    store: &Store,
    client: &ChatClient,
    interact: &Interact,
    output: &Output,
    date: Date,
) -> Result<()> {
    output.header(
        "Daily Summary",
        &date.strftime("%A, %B %d, %Y").to_string(),
    )?;

    let Some(mut plan) = store.load_plan(date)? else {
        output.warn(&format!("No plan found for {date}."))?;
        output.info("Run 'dp plan' first to create one.")?;
        return Ok(());
    };

    output.blank()?;
    output.panel("Today's Plan", &plan.content)?;

    output.blank()?;
    output.success("Let's review your day!")?;

    let mut reviews = Vec::new();
    for job in &mut plan.jobs {
        review_job(job, 0, interact, output, &mut reviews)?;
    }

    output.blank()?;
    output.working("Generating your daily summary...")?;
    let summary = generate_with_retry(interact, output, "Summary generation", || {
        client.generate_summary(&plan, &reviews)
    })?;

    output.panel("Your Daily Summary", &summary)?;

    let chat = free_chat(client, interact, output)?;

    let log = Log::new(plan, reviews, summary, chat);
    store.save_log(&log).context("Failed to save log")?;

    output.blank()?;
    output.success("Summary saved.")?;
    output.info(&store.log_path(date).display().to_string())?;
    output.info(&store.log_markdown_path(date).display().to_string())?;
    Ok(())
}

/// Depth-first review: status for this node, quality on success, notes
/// on problems, then the same for each sub-job. Skipping a node leaves
/// it unreviewed but still descends into its children.
fn review_job(
    job: &mut Job,
    depth: usize,
    interact: &Interact,
    output: &Output,
    reviews: &mut Vec<JobReview>,
) -> Result<()> {
    output.blank()?;
    output.job_header(&job.name, &format!("Planned: {}", job.goal), depth)?;

    if let Some(status) = interact.completion_status("Did you finish this?")? {
        let mut review = JobReview {
            job_name: job.name.clone(),
            status,
            quality: None,
            notes: None,
        };

        match status {
            CompletionStatus::Yes => {
                review.quality = Some(interact.quality_rating("How did it go?")?);
            }
            CompletionStatus::No | CompletionStatus::Partial => {
                let notes = interact.input("What was the problem?")?;
                if !notes.is_empty() {
                    review.notes = Some(notes);
                }
            }
        }

        job.status = Some(status);
        job.quality = review.quality;
        job.notes = review.notes.clone();
        reviews.push(review);
    }

    for sub in &mut job.sub_jobs {
        review_job(sub, depth + 1, interact, output, reviews)?;
    }
    Ok(())
}

fn free_chat(
    client: &ChatClient,
    interact: &Interact,
    output: &Output,
) -> Result<Vec<ChatExchange>> {
    output.blank()?;
    output.info("You can now chat about your day. Type 'exit' to finish.")?;

    let mut history = vec![ChatMessage::system(
        "You are a helpful assistant for daily planning and reflection.",
    )];
    let mut exchanges = Vec::new();

    loop {
        let message = interact.input("You")?;
        if message.is_empty() {
            continue;
        }
        if CHAT_EXIT_WORDS.contains(&message.to_lowercase().as_str()) {
            output.info("Ending chat session.")?;
            break;
        }

        output.working("Thinking...")?;
        match client.chat(&mut history, &message) {
            Ok(reply) => {
                exchanges.push(ChatExchange::new(&message, &reply));
                output.panel("Assistant", &reply)?;
            }
            Err(err) => {
                output.error(&format!("Chat failed: {err}"))?;
                if !interact.confirm("Keep chatting?", true)? {
                    break;
                }
            }
        }
    }
    Ok(exchanges)
}
