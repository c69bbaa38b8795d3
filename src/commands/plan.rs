use anyhow::{Context, Result};
use jiff::civil::Date;

use super::generate_with_retry;
use crate::client::{ChatClient, ChatMessage};
use crate::config::Config;
use crate::interact::Interact;
use crate::models::{ChatExchange, Job, MAX_TREE_DEPTH, Plan, Refinement};
use crate::output::Output;
use crate::store::Store;

const CHAT_EXIT_WORDS: [&str; 4] = ["done", "exit", "quit", "q"];

/// Morning workflow: carry over unfinished jobs, collect goals per
/// category (recursing into sub-tasks), generate a plan, refine until
/// accepted, persist.
pub fn run(
    config: &Config,
    store: &Store,
    client: &ChatClient,
    interact: &Interact,
    output: &Output,
    date: Date,
    force: bool,
) -> Result<()> {
    output.header(
        "Daily Planning",
        &date.strftime("%A, %B %d, %Y").to_string(),
    )?;

    if store.plan_exists(date) && !force {
        output.warn("A plan already exists for today.")?;
        if !interact.confirm("Create a new plan?", false)? {
            output.info("Keeping the existing plan.")?;
            return Ok(());
        }
    }

    if config.jobs.is_empty() {
        anyhow::bail!("No job categories in config.toml. Add at least one [[jobs]] entry.");
    }

    let carried_over = carry_over_jobs(store, interact, output, date)?;

    output.blank()?;
    output.success("Let's plan your day!")?;
    output.info("For each category, describe what you want to accomplish. Empty input skips.")?;

    let mut jobs = Vec::new();
    for template in &config.jobs {
        output.blank()?;
        output.job_header(&template.name, &template.description, 0)?;

        let goal = interact.input("What do you need to do")?;
        if goal.is_empty() {
            continue;
        }

        let mut job = Job::new(&template.name, &template.description).with_goal(goal);
        job.sub_jobs = collect_sub_jobs(interact, output, &template.name, 1)?;

        if interact.confirm(&format!("Chat about '{}'?", template.name), false)? {
            chat_about_job(client, interact, output, &mut job)?;
        }

        jobs.push(job);
    }

    if !carried_over.is_empty() {
        output.blank()?;
        output.info(&format!(
            "Adding {} carried-over job(s) to today's plan.",
            carried_over.len()
        ))?;
        jobs.extend(carried_over);
    }

    if jobs.is_empty() {
        output.warn("No inputs provided. Nothing to plan.")?;
        return Ok(());
    }

    output.blank()?;
    output.working("Generating your daily plan...")?;
    let mut content = generate_with_retry(interact, output, "Plan generation", || {
        client.generate_plan(&jobs)
    })?;

    let mut refinements = Vec::new();
    loop {
        output.panel("Your Daily Plan", &content)?;

        if !interact.confirm("Refine this plan?", false)? {
            break;
        }

        let feedback = interact.input("What would you like to change or add")?;
        if feedback.is_empty() {
            output.warn("No feedback provided, keeping the current plan.")?;
            break;
        }

        output.working("Refining your plan...")?;
        let revised = generate_with_retry(interact, output, "Plan refinement", || {
            client.refine_plan(&content, &feedback)
        })?;

        refinements.push(Refinement {
            feedback,
            previous_content: std::mem::replace(&mut content, revised),
        });
    }

    let mut plan = Plan::new(date, jobs, content);
    plan.refinements = refinements;
    store.save_plan(&plan).context("Failed to save plan")?;

    output.blank()?;
    output.success("Plan saved.")?;
    output.info(&store.plan_path(date).display().to_string())?;
    Ok(())
}

/// Offers yesterday's unfinished jobs for carry-over. Selected jobs come
/// back with review state cleared and the origin date marked.
fn carry_over_jobs(
    store: &Store,
    interact: &Interact,
    output: &Output,
    date: Date,
) -> Result<Vec<Job>> {
    let Ok(yesterday) = date.yesterday() else {
        return Ok(Vec::new());
    };
    let Some(previous) = store.load_plan(yesterday)? else {
        output.info("No plan found for yesterday.")?;
        return Ok(Vec::new());
    };

    let unfinished: Vec<Job> = previous.unfinished_jobs().into_iter().cloned().collect();
    if unfinished.is_empty() {
        output.success("All jobs from yesterday were completed!")?;
        return Ok(Vec::new());
    }

    output.blank()?;
    output.warn(&format!(
        "Found {} unfinished job(s) from yesterday.",
        unfinished.len()
    ))?;

    let names: Vec<String> = unfinished.iter().map(|j| j.name.clone()).collect();
    let selected = interact.multi_select("Select jobs to carry over:", &names)?;

    let mut carried = Vec::new();
    for index in selected {
        let mut job = unfinished[index].clone();
        job.clear_review();
        job.carried_over_from = Some(yesterday);
        carried.push(job);
    }
    if !carried.is_empty() {
        output.success(&format!("Carrying over {} job(s).", carried.len()))?;
    }
    Ok(carried)
}

/// Recursively collects sub-tasks for a parent job. Stops offering more
/// nesting once the depth guard is reached.
fn collect_sub_jobs(
    interact: &Interact,
    output: &Output,
    parent: &str,
    depth: usize,
) -> Result<Vec<Job>> {
    if depth >= MAX_TREE_DEPTH {
        output.warn("Sub-task nesting limit reached.")?;
        return Ok(Vec::new());
    }

    let mut sub_jobs = Vec::new();
    loop {
        if !interact.confirm(&format!("Add a sub-task for '{parent}'?"), false)? {
            break;
        }

        let name = interact.input("Sub-task name")?;
        if name.is_empty() {
            continue;
        }
        let description = interact.input("What do you need to do for this")?;

        let mut job = Job::new(&name, description);
        job.sub_jobs = collect_sub_jobs(interact, output, &name, depth + 1)?;
        output.success(&format!("Added sub-task: {name}"))?;
        sub_jobs.push(job);
    }
    Ok(sub_jobs)
}

/// Short free-form chat about one job; exchanges are recorded on the job.
fn chat_about_job(
    client: &ChatClient,
    interact: &Interact,
    output: &Output,
    job: &mut Job,
) -> Result<()> {
    output.info("Chat about this job. Type 'done' when finished.")?;

    let mut history = vec![ChatMessage::system(format!(
        "You are helping the user plan their '{}' tasks. They want to do: {}. \
         Help them think through this task, offer suggestions, or answer questions. \
         Be concise and helpful.",
        job.name, job.goal
    ))];

    loop {
        let message = interact.input("You")?;
        if message.is_empty() {
            continue;
        }
        if CHAT_EXIT_WORDS.contains(&message.to_lowercase().as_str()) {
            output.info("Ending chat for this job.")?;
            break;
        }

        match client.chat(&mut history, &message) {
            Ok(reply) => {
                job.chat_notes.push(ChatExchange::new(&message, &reply));
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
    Ok(())
}
