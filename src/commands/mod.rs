#![allow(clippy::needless_pass_by_value)]

pub mod check;
pub mod feedback;
pub mod init;
pub mod plan;
pub mod status;
pub mod summarize;

use anyhow::{Result, bail};

use crate::client::ClientError;
use crate::interact::Interact;
use crate::output::Output;

/// Runs a generation step, offering retry-or-abort on failure. Inputs
/// collected before the call stay with the caller, so a retry reuses
/// them.
pub(crate) fn generate_with_retry<F>(
    interact: &Interact,
    output: &Output,
    what: &str,
    mut attempt: F,
) -> Result<String>
where
    F: FnMut() -> Result<String, ClientError>,
{
    loop {
        match attempt() {
            Ok(text) => return Ok(text),
            Err(err) => {
                output.error(&format!("{what} failed: {err}"))?;
                if !interact.confirm("Try again?", true)? {
                    bail!("{what} aborted");
                }
            }
        }
    }
}
