use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bert",
    about = "A friendly package assistant built on top of Homebrew and the Node package managers",
    long_about = "Bert wraps Homebrew and your Node package manager behind one CLI. \
                  Run any command through it and a missing command gets installed first; \
                  back up everything you have installed and restore it on another machine.",
    version,
    next_line_help = false,
    term_width = 80,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct GlobalFlags {
    /// Use the Node package manager instead of Homebrew
    #[arg(long, global = true)]
    pub node: bool,

    /// Treat the package as a Homebrew cask
    #[arg(long, global = true)]
    pub cask: bool,

    /// Verbose output (show every backend command)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Quiet mode
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long = "yes", global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install a package (name or name@version)
    Install {
        /// Package to install
        package: String,
    },

    /// Uninstall a package
    Uninstall {
        /// Package to uninstall
        package: String,
    },

    /// Update installed packages (all of them when none are given)
    Update {
        /// Packages to update
        packages: Vec<String>,
    },

    /// Search for a package
    Search {
        /// Search term
        query: String,
    },

    /// List installed packages
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Back up installed formulae, casks, taps and Node packages
    Backup {
        /// Where to write the backup (default: ~/.bert/backups/bert_backup_<timestamp>.json)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Restore packages from a backup (the latest one by default)
    Restore {
        /// Backup file to restore
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Backup file to restore
        #[arg(short, long, value_name = "PATH", conflicts_with = "path")]
        input: Option<PathBuf>,

        /// Install the versions recorded in the backup instead of the latest
        #[arg(long)]
        pin_versions: bool,
    },

    /// Update bert itself to the latest release
    SelfUpdate {
        /// Only report whether an update is available
        #[arg(long)]
        check: bool,

        /// Install this release instead of the latest
        #[arg(long = "version", id = "target_version", value_name = "X.Y.Z")]
        version: Option<String>,
    },

    /// Choose the Node package manager (npm, yarn, pnpm or bun)
    SetManager {
        /// npm, yarn, pnpm or bun
        manager: String,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Run any other command, installing it first if it is missing
    #[command(external_subcommand)]
    External(Vec<String>),
}
