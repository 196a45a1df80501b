use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notehub")]
#[command(version, about = "Create, list and manage notes on a NoteHub backend")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use an in-process backend instead of the configured server
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .notehub/ with a default config in the current directory
    Init,

    /// Inspect or edit the pending note draft
    Draft(DraftCommand),

    /// Create a note from the saved draft plus the given field edits
    Create {
        /// Note title (3-50 characters)
        #[arg(long)]
        title: Option<String>,

        /// Note content (up to 500 characters)
        #[arg(long)]
        content: Option<String>,

        /// Tag: Todo, Work, Personal, Meeting or Shopping
        #[arg(long)]
        tag: Option<String>,

        /// Read content from stdin
        #[arg(long, conflicts_with = "content")]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List notes
    List {
        /// Only notes with this tag ("all" for every tag)
        #[arg(long, short = 't')]
        tag: Option<String>,

        /// Case-insensitive text to match in title or content
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a single note by ID
    Get {
        /// Note ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a note by ID
    Delete {
        /// Note ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DraftCommand {
    #[command(subcommand)]
    pub action: DraftAction,
}

#[derive(Subcommand, Debug)]
pub enum DraftAction {
    /// Show the pending draft
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Merge fields into the pending draft (no validation)
    Set {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        tag: Option<String>,
    },

    /// Discard the pending draft
    Clear,
}
