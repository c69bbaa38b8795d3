use anyhow::{Context, Result, bail};
use jiff::civil::Date;

use crate::interact::Interact;
use crate::models::{CompletionStatus, Job, Plan, job};
use crate::output::Output;
use crate::store::Store;

/// One selectable row in the toggle menu: the index path into the job
/// forest plus its rendered label.
struct MenuEntry {
    path: Vec<usize>,
    label: String,
}

/// Midday workflow: pick a saved plan, toggle completion on any node of
/// the tree, save, show progress.
pub fn run(
    store: &Store,
    interact: &Interact,
    output: &Output,
    date: Option<Date>,
) -> Result<()> {
    output.header("Task Checker", "Mark tasks as done")?;

    let date = match date {
        Some(date) => date,
        None => match pick_plan_date(store, interact, output)? {
            Some(date) => date,
            None => return Ok(()),
        },
    };

    let Some(mut plan) = store.load_plan(date)? else {
        bail!("No plan found for {date}");
    };

    output.blank()?;
    output.panel(&format!("Plan for {date}"), &plan.content)?;

    toggle_loop(&mut plan, interact, output)?;

    store.save_plan(&plan).context("Failed to save plan")?;

    output.blank()?;
    output.completion_summary(&plan)?;
    output.blank()?;
    output.success("Progress saved.")?;
    Ok(())
}

fn pick_plan_date(
    store: &Store,
    interact: &Interact,
    output: &Output,
) -> Result<Option<Date>> {
    let dates = store.list_plan_dates()?;
    if dates.is_empty() {
        output.warn("No plans found. Create one first with 'dp plan'.")?;
        return Ok(None);
    }

    let labels: Vec<String> = dates
        .iter()
        .map(|d| d.strftime("%Y-%m-%d (%A)").to_string())
        .collect();
    let index = interact.select("Select a plan:", &labels)?;
    Ok(Some(dates[index]))
}

fn toggle_loop(plan: &mut Plan, interact: &Interact, output: &Output) -> Result<()> {
    output.blank()?;
    output.info("Pick a task to toggle it between done and not done.")?;

    loop {
        let mut labels: Vec<String> = menu_entries(&plan.jobs)
            .iter()
            .map(|e| e.label.clone())
            .collect();
        labels.push("Done - save and exit".to_string());

        let choice = interact.select("Select a task to toggle:", &labels)?;
        let entries = menu_entries(&plan.jobs);
        if choice == entries.len() {
            break;
        }

        let path = &entries[choice].path;
        let job = job::job_at_path_mut(&mut plan.jobs, path)
            .context("Selected task no longer exists")?;
        if job.is_done() {
            job.status = None;
            output.warn(&format!("'{}' marked as not done", job.name))?;
        } else {
            job.status = Some(CompletionStatus::Yes);
            output.success(&format!("'{}' marked as done", job.name))?;
        }
    }
    Ok(())
}

/// Flattens the job forest depth-first into menu rows, indenting by
/// depth and marking done nodes.
fn menu_entries(jobs: &[Job]) -> Vec<MenuEntry> {
    let mut entries = Vec::new();
    for (index, job) in jobs.iter().enumerate() {
        push_entries(job, vec![index], 0, &mut entries);
    }
    entries
}

fn push_entries(job: &Job, path: Vec<usize>, depth: usize, entries: &mut Vec<MenuEntry>) {
    let marker = if job.is_done() { "[✓]" } else { "[ ]" };
    let indent = "  ".repeat(depth);
    entries.push(MenuEntry {
        path: path.clone(),
        label: format!("{indent}{marker} {}", job.name),
    });
    for (index, sub) in job.sub_jobs.iter().enumerate() {
        let mut sub_path = path.clone();
        sub_path.push(index);
        push_entries(sub, sub_path, depth + 1, entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_jobs() -> Vec<Job> {
        let mut work = Job::new("Work", "Deep work");
        let mut review = Job::new("Review", "PR queue");
        review.sub_jobs.push(Job::new("Storage PR", "Read diff"));
        work.sub_jobs.push(review);
        vec![work, Job::new("Errands", "Around town")]
    }

    #[test]
    fn menu_lists_every_node_in_visit_order() {
        let jobs = sample_jobs();
        let entries = menu_entries(&jobs);

        assert_eq!(entries.len(), job::count_all(&jobs));
        assert_eq!(entries[0].label, "[ ] Work");
        assert_eq!(entries[1].label, "  [ ] Review");
        assert_eq!(entries[2].label, "    [ ] Storage PR");
        assert_eq!(entries[3].label, "[ ] Errands");
    }

    #[test]
    fn menu_paths_resolve_back_to_their_jobs() {
        let mut jobs = sample_jobs();
        let entries = menu_entries(&jobs);

        let deep = job::job_at_path_mut(&mut jobs, &entries[2].path).unwrap();
        assert_eq!(deep.name, "Storage PR");
        deep.status = Some(CompletionStatus::Yes);

        let entries = menu_entries(&jobs);
        assert_eq!(entries[2].label, "    [✓] Storage PR");
    }
}
