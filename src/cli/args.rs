use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "libra", version, author, about = "A terminal companion for weight tracking, goals and streaks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// First-run setup wizard (unit, height, initial goal)
    Setup {
        /// Reset existing configuration
        #[arg(long)]
        reset: bool,
    },
    /// Log a weight entry for today (or a past date)
    Log {
        /// Weight in your configured unit
        weight: f64,
        /// Effective date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Optional note, e.g. "after holiday"
        #[arg(long)]
        note: Option<String>,
    },
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: GoalCommands,
    },
    /// Show recent entries
    History {
        /// Number of entries to show
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete an entry by id (see `history`)
    Delete {
        /// Entry id
        id: i64,
    },
    /// Show streaks, trend and goal statistics
    Stats {
        /// Include a 30-day chart
        #[arg(long)]
        month: bool,
    },
    /// Export a summary to stdout
    Export {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Set a new goal (replaces the current one)
    Set {
        /// Target weight in your configured unit
        target: f64,
        /// Starting weight; defaults to your latest entry
        #[arg(long)]
        start: Option<f64>,
        /// Optional deadline (YYYY-MM-DD), display only
        #[arg(long)]
        by: Option<String>,
    },
    /// Show the current goal and progress
    Show,
    /// Remove the current goal
    Clear,
}
