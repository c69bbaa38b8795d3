use anyhow::Result;
use jiff::civil::Date;

use crate::output::Output;
use crate::store::Store;

/// Shows today's progress and the completion streak.
pub fn run(store: &Store, output: &Output, date: Date) -> Result<()> {
    output.header("Dayplan", &date.strftime("%A, %B %d, %Y").to_string())?;

    let progress = store
        .load_plan(date)?
        .map(|plan| (plan.completed_jobs(), plan.total_jobs()));

    let streak = completion_streak(store, date)?;

    output.status_dashboard(&format!("Date: {date}"), progress, streak)?;
    Ok(())
}

/// Consecutive days with a fully-completed plan, counting back from
/// `date`. An incomplete or missing plan today doesn't break a streak
/// earned up to yesterday.
fn completion_streak(store: &Store, date: Date) -> Result<usize> {
    let mut streak = 0;
    let mut current = date;

    let today_complete = store
        .load_plan(current)?
        .is_some_and(|plan| plan.is_fully_complete());
    if today_complete {
        streak += 1;
    }

    loop {
        let Ok(previous) = current.yesterday() else {
            break;
        };
        current = previous;
        match store.load_plan(current)? {
            Some(plan) if plan.is_fully_complete() => streak += 1,
            _ => break,
        }
    }
    Ok(streak)
}
