use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ideaflow")]
#[command(version, about = "Idea submission and review workflow")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub identity: IdentityArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Who is running the command. Falls back to the project config when unset.
#[derive(Args, Debug, Clone, Default)]
pub struct IdentityArgs {
    /// User id to act as
    #[arg(long, global = true, env = "IDEAFLOW_USER")]
    pub user: Option<String>,

    /// Role to act with (submitter, admin)
    #[arg(long, global = true, env = "IDEAFLOW_ROLE")]
    pub role: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new ideaflow project in the current directory
    Init,

    /// Submit a new idea
    Submit {
        /// Idea title
        title: String,

        /// What the idea is about
        #[arg(long, short = 'd')]
        description: String,

        /// Category the idea belongs to
        #[arg(long, short = 'c')]
        category: String,

        /// Attach a supporting file
        #[arg(long, value_name = "PATH")]
        attach: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List visible ideas
    List {
        /// Only show ideas in this status (submitted, under_review, accepted, rejected)
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single idea with its latest decision
    Show {
        /// Idea ID (sequence number like "3" or UUID prefix like "a1b2c")
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a review decision (admin only)
    Decide {
        /// Idea ID (sequence number or UUID prefix)
        id: String,

        /// Outcome (under_review, accepted, rejected)
        outcome: String,

        /// Reviewer comment, required for accepted and rejected
        #[arg(long, short = 'm', default_value = "")]
        comment: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the status history of an idea
    History {
        /// Idea ID (sequence number or UUID prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Attach a file to an idea (one attachment per idea)
    Attach {
        /// Idea ID (sequence number or UUID prefix)
        id: String,

        /// File to attach
        path: PathBuf,
    },

    /// Delete an idea with its attachment and decisions (admin only)
    Delete {
        /// Idea ID (sequence number or UUID prefix)
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Dashboard of every idea with its latest decision (admin only)
    Overview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
