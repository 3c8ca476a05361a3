//! CLI argument structures
//!
//! Defines the top-level parser and every subcommand. The original short
//! command names are kept as visible aliases.

use clap::{Args, Parser, Subcommand};

use crate::session::ExitMode;

/// Open, suspend, resume, save back or discard named git sessions
#[derive(Parser, Debug)]
#[command(name = "kaishaku")]
#[command(about = "kaishaku - safe git experiments in named detached-HEAD sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start a new session detached at a commit (default HEAD)
    #[command(visible_alias = "checkout")]
    Open {
        /// Session name
        session: String,

        /// Commit, tag or branch to start from
        #[arg(value_name = "REF")]
        reference: Option<String>,
    },

    /// Make an existing session active again
    #[command(visible_alias = "switch")]
    Resume {
        /// Session name
        session: String,
    },

    /// Turn the active session into a real branch
    #[command(name = "branch-off", visible_alias = "branch")]
    BranchOff {
        /// Branch to create
        name: String,
    },

    /// Merge the active session into its original branch
    #[command(name = "save-back", visible_alias = "save")]
    SaveBack {
        /// Temporary branch used for the merge
        name: String,
    },

    /// Leave the active session and return to the original branch
    Exit(ExitArgs),

    /// Show the active session
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all sessions
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove one inactive session, or every inactive session
    #[command(visible_alias = "clean")]
    Purge {
        /// Session to remove
        session: Option<String>,
    },

    /// Get or set configuration (confirm.exit, auto.stash, auto.save)
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Reactivate a session, recreating its original branch if needed
    Recover {
        /// Session name
        session: String,
    },

    /// Rename an inactive session
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },

    /// Discard a session and its records (default: the active session)
    Abort {
        /// Session name
        session: Option<String>,
    },
}

/// How to treat uncommitted changes on exit
#[derive(Args, Debug, Default, PartialEq, Eq)]
#[group(multiple = false)]
pub struct ExitArgs {
    /// Discard changes without asking
    #[arg(long)]
    pub force: bool,

    /// Stash changes before leaving
    #[arg(long)]
    pub keep: bool,

    /// Commit changes before leaving
    #[arg(long)]
    pub save: bool,

    /// Do not commit changes even when auto.save is set
    #[arg(long)]
    pub no_save: bool,
}

impl ExitArgs {
    pub fn mode(&self) -> ExitMode {
        if self.force {
            ExitMode::Force
        } else if self.keep {
            ExitMode::Keep
        } else if self.save {
            ExitMode::Save
        } else if self.no_save {
            ExitMode::NoSave
        } else {
            ExitMode::Default
        }
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print a configuration value as 0 or 1
    Get {
        /// confirm.exit, auto.stash or auto.save
        key: String,
    },
    /// Store a configuration value (0, 1, true or false)
    Set {
        /// confirm.exit, auto.stash or auto.save
        key: String,
        /// New value
        value: String,
    },
}
