//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Drive the kanban and tree mutation engines from seed files and action scripts
#[derive(Parser, Debug)]
#[command(name = "boardtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ./.boardtree.toml if present)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with a kanban board
    Kanban {
        #[command(subcommand)]
        command: KanbanCommands,
    },

    /// Work with a tree view
    Tree {
        #[command(subcommand)]
        command: TreeCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum KanbanCommands {
    /// Print the board
    Show {
        /// Board seed file (TOML or JSON), demo board if omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        seed: Option<PathBuf>,
    },
    /// Apply an action script and print the resulting board
    Apply {
        /// Action script (TOML or JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Board seed file (TOML or JSON), demo board if omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        seed: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TreeCommands {
    /// Print the tree
    Show {
        /// Forest seed file (TOML or JSON), demo tree if omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        seed: Option<PathBuf>,
        /// Show collapsed subtrees too
        #[arg(short, long)]
        all: bool,
    },
    /// Apply an action script and print the resulting tree
    Apply {
        /// Action script (TOML or JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,
        /// Forest seed file (TOML or JSON), demo tree if omitted
        #[arg(long, value_hint = ValueHint::FilePath)]
        seed: Option<PathBuf>,
        /// Show collapsed subtrees too
        #[arg(short, long)]
        all: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Print the config file locations
    Path,
}
