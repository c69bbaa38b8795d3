use anyhow::{Context, Result, anyhow};
use strsim::levenshtein;

use crate::client::{ChatClient, ChatMessage};
use crate::interact::Interact;
use crate::models::{FeedbackEntry, FeedbackStatus};
use crate::output::Output;
use crate::store::Store;

/// Adds a feedback entry about the tool. When a client is available the
/// assistant restates its understanding and the user can refine it; the
/// entry saves fine without one.
pub fn add(
    store: &Store,
    client: Option<&ChatClient>,
    interact: &Interact,
    output: &Output,
    text: Option<String>,
) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => interact.input("What would you like to improve about this tool?")?,
    };
    if text.trim().is_empty() {
        output.warn("No feedback provided.")?;
        return Ok(());
    }

    let understanding = match client {
        Some(client) => confirm_understanding(client, interact, output, &text)?,
        None => None,
    };

    let entry = FeedbackEntry::new(text, understanding);
    let id = entry.id.clone();
    store
        .append_feedback(entry)
        .context("Failed to save feedback")?;

    output.success(&format!("Feedback recorded: {id}"))?;
    Ok(())
}

pub fn list(store: &Store, output: &Output) -> Result<()> {
    let entries = store.load_feedback()?;
    output.feedback_table(&entries)
}

pub fn show(store: &Store, output: &Output, id: &str) -> Result<()> {
    let entries = store.load_feedback()?;
    let entry = find_entry(&entries, id)?;
    output.feedback_detail(entry)
}

pub fn set_status(store: &Store, output: &Output, id: &str, status: FeedbackStatus) -> Result<()> {
    // Resolve near-miss ids before touching the file.
    let entries = store.load_feedback()?;
    let entry_id = find_entry(&entries, id)?.id.clone();

    let updated = store.update_feedback_status(&entry_id, status)?;
    output.success(&format!(
        "Feedback {} marked as {}",
        updated.id,
        updated.status.as_ref()
    ))?;
    Ok(())
}

/// Lets the assistant restate the feedback until the user confirms the
/// understanding. A service failure degrades to saving without one.
fn confirm_understanding(
    client: &ChatClient,
    interact: &Interact,
    output: &Output,
    text: &str,
) -> Result<Option<String>> {
    let mut history = vec![ChatMessage::system(
        "You are helping understand user feedback about a daily planning tool. \
         The user will describe what they want improved. Confirm your understanding \
         of their request in a clear, concise way.",
    )];

    let mut request = format!(
        "User feedback: {text}\n\nPlease confirm your understanding of what the user wants."
    );

    loop {
        let understanding = match client.chat(&mut history, &request) {
            Ok(reply) => reply,
            Err(err) => {
                output.error(&format!("AI confirmation failed: {err}"))?;
                output.warn("Saving feedback without AI confirmation.")?;
                return Ok(None);
            }
        };

        output.panel("Assistant's understanding", &understanding)?;

        if interact.confirm("Is this understanding correct?", true)? {
            return Ok(Some(understanding));
        }

        let correction = interact.input("What should be different")?;
        if correction.is_empty() {
            output.warn("No refinement provided, keeping the current understanding.")?;
            return Ok(Some(understanding));
        }
        request = format!("Not quite: {correction}\n\nPlease restate your understanding.");
    }
}

fn find_entry<'a>(entries: &'a [FeedbackEntry], id: &str) -> Result<&'a FeedbackEntry> {
    if let Some(entry) = entries.iter().find(|e| e.id == id) {
        return Ok(entry);
    }

    match closest_id(id, entries) {
        Some(suggestion) => Err(anyhow!(
            "Feedback entry not found: {id}\nDid you mean: {suggestion}"
        )),
        None => Err(anyhow!("Feedback entry not found: {id}")),
    }
}

/// Closest existing id within a small edit distance, for typo hints.
fn closest_id<'a>(target: &str, entries: &'a [FeedbackEntry]) -> Option<&'a str> {
    entries
        .iter()
        .map(|entry| (entry.id.as_str(), levenshtein(target, &entry.id)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_id(id: &str) -> FeedbackEntry {
        let mut entry = FeedbackEntry::new("some idea", None);
        entry.id = id.to_string();
        entry
    }

    #[test]
    fn closest_id_suggests_near_misses_only() {
        let entries = vec![
            entry_with_id("t8zwaROl"),
            entry_with_id("xYz9Kp2m"),
        ];

        assert_eq!(closest_id("t8zwaRO1", &entries), Some("t8zwaROl"));
        assert_eq!(closest_id("zzzzzzzz", &entries), None);
    }

    #[test]
    fn find_entry_errors_carry_the_suggestion() {
        let entries = vec![entry_with_id("t8zwaROl")];
        let err = find_entry(&entries, "t8zwaRO1").unwrap_err();
        assert!(err.to_string().contains("Did you mean: t8zwaROl"));
    }

    #[test]
    fn find_entry_resolves_exact_ids() {
        let entries = vec![entry_with_id("t8zwaROl")];
        assert_eq!(find_entry(&entries, "t8zwaROl").unwrap().id, "t8zwaROl");
    }
}
