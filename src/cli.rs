use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dayplan")]
#[command(about = "AI-assisted daily planning and review", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize dayplan in the current directory
    Init,

    /// Plan the day: collect goals per category and generate a daily plan
    Plan {
        /// Replace an existing plan without asking
        #[arg(long)]
        force: bool,
    },

    /// Mark tasks on a saved plan as done
    Check {
        /// Plan date (YYYY-MM-DD); picked interactively when omitted
        #[arg(long)]
        date: Option<String>,
    },

    /// Review the day and generate a summary
    Summarize {
        /// Plan date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Show today's progress and completion streak
    Status {
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Manage feedback about the tool itself
    #[command(subcommand)]
    Feedback(FeedbackCommands),
}

#[derive(Subcommand)]
pub enum FeedbackCommands {
    /// Add a feedback entry
    Add {
        /// Feedback text; prompted for when omitted
        text: Option<String>,

        /// Skip the AI understanding confirmation
        #[arg(long)]
        no_ai: bool,
    },

    /// List all feedback entries
    List,

    /// Show one feedback entry
    Show {
        /// The entry id
        id: String,
    },

    /// Update the status of a feedback entry
    SetStatus {
        /// The entry id
        id: String,

        /// New status: pending, implemented, or dismissed
        status: String,
    },
}
