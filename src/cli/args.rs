// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Base URL of the notes API (overrides the config file)
    #[arg(long, value_name = "URL", env = "NOTES_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Email used to sign in before changing notes
    #[arg(long, value_name = "EMAIL", env = "NOTES_EMAIL", global = true)]
    pub email: Option<String>,

    /// Password used to sign in before changing notes
    #[arg(long, value_name = "PASSWORD", env = "NOTES_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

// Hand-written so the password never reaches the logs.
impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("api_url", &self.api_url)
            .field("config", &self.config)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("verbose", &self.verbose)
            .field("command", &self.command)
            .finish()
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List notes, optionally filtered by text and tags
    List {
        /// Text matched against title, content and tag names
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Only notes carrying one of these tag ids
        #[arg(short, long = "tag", value_name = "TAG_ID")]
        tags: Vec<String>,
    },

    /// Show a single note
    Show {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        /// Output note as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all tags
    Tags,

    /// Create a note
    Create {
        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short = 'b', long, default_value = "")]
        content: String,

        /// Existing tag id to attach
        #[arg(long = "tag", value_name = "TAG_ID")]
        tags: Vec<String>,

        /// Tag name to attach, created on the server if needed
        #[arg(long = "new-tag", value_name = "NAME")]
        new_tags: Vec<String>,
    },

    /// Change an existing note
    Edit {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short = 'b', long)]
        content: Option<String>,

        /// Existing tag id to attach
        #[arg(long = "tag", value_name = "TAG_ID")]
        tags: Vec<String>,

        /// Tag id to detach
        #[arg(long = "untag", value_name = "TAG_ID")]
        untags: Vec<String>,

        /// Tag name to attach, created on the server if needed
        #[arg(long = "new-tag", value_name = "NAME")]
        new_tags: Vec<String>,
    },

    /// Delete a note
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the signed-in user
    Whoami,

    /// Interactive session
    Shell,

    /// Write a config file with default settings (to --config, else the default location)
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
