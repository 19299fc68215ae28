use clap::{Parser, Subcommand, ValueEnum};
use hiredeskapp::model::Namespace;
use hiredeskapp::prefs::Theme;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hiredesk",
    bin_name = "hiredesk",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Local applicant tracking: candidates, job postings and interviews", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $HIREDESK_DATA or the OS data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Print JSON instead of formatted output
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (debug logging to stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load sample data into empty collections
    Seed,

    /// List records of a collection
    #[command(alias = "ls")]
    List {
        /// candidates, jobs or interviews
        namespace: Namespace,
    },

    /// Show one record
    #[command(alias = "show")]
    Get { namespace: Namespace, id: String },

    /// Insert or update a record from JSON (file or stdin)
    Save {
        namespace: Namespace,

        /// JSON file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete { namespace: Namespace, id: String },

    /// Snapshots of the collections
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Dashboard summary
    Stats,

    /// Show or set the color theme
    Theme {
        #[arg(value_enum)]
        value: Option<ThemeArg>,
    },

    /// Show resolved configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum BackupAction {
    /// Snapshot every collection now
    Now,
    /// Show the active storage tier and each snapshot's age
    Status,
    /// Replace a collection with its snapshot
    Restore { namespace: Namespace },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}
