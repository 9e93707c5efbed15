//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--file <path>` / `-f`: Document to operate on
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bsg - Maintain a group hierarchy over blend shape targets
#[derive(Parser, Debug)]
#[command(name = "bsg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Hierarchy document (defaults to config `document`, then groups.json)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty hierarchy document
    #[command(
        name = "init",
        long_about = "Create an empty hierarchy document.\n\n\
            The new document holds only the root group (slot 0, named 'Group').",
        after_help = "\
EXAMPLES:
    bsg init
    bsg --file rig/face.json init --force"
    )]
    Init {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Add or delete leaves (targets)
    Leaf {
        #[command(subcommand)]
        action: LeafAction,
    },

    /// Create a group
    #[command(
        name = "create",
        long_about = "Create a group under a parent group.\n\n\
            The name is made unique among the new group's siblings by appending \
            the smallest free number. Listed leaves are moved into the new group.",
        after_help = "\
EXAMPLES:
    # Empty group under the root
    bsg create --name Market

    # Group under group 1 holding leaves 0, 1 and 3
    bsg create --name Fruit --parent 1 --leaves 0 1 3"
    )]
    Create {
        /// Parent group slot
        #[arg(short, long, default_value_t = 0)]
        parent: u32,

        /// Group name (defaults to config `default_group_name`)
        #[arg(short, long)]
        name: Option<String>,

        /// Leaves to move into the new group
        #[arg(short, long, num_args = 1..)]
        leaves: Vec<u32>,
    },

    /// Move groups under another group
    #[command(
        name = "move-groups",
        long_about = "Move groups under a destination group.\n\n\
            A group is skipped, with a warning, when the destination is the group \
            itself or one of its descendants. The other groups still move.",
        after_help = "\
EXAMPLES:
    bsg move-groups 3 --to 1"
    )]
    MoveGroups {
        /// Group slots to move
        #[arg(required = true)]
        groups: Vec<u32>,

        /// Destination group slot
        #[arg(long)]
        to: u32,
    },

    /// Move leaves under a group
    #[command(name = "move-leaves")]
    MoveLeaves {
        /// Leaf slots to move
        #[arg(required = true)]
        leaves: Vec<u32>,

        /// Destination group slot
        #[arg(long)]
        to: u32,
    },

    /// Rename a group
    Rename {
        /// Group slot
        group: u32,

        /// New name (a numeric suffix is added if a sibling has it)
        name: String,
    },

    /// Delete a group and everything beneath it
    #[command(
        name = "delete",
        long_about = "Delete a group and everything beneath it.\n\n\
            Nested groups are removed and leaves beneath the group are deleted, \
            not reparented. The root group cannot be deleted."
    )]
    Delete {
        /// Group slot
        group: u32,
    },

    /// List every group with its slot and name
    List,

    /// Show the hierarchy as an indented tree
    Tree {
        /// Subtree root (defaults to the root group)
        #[arg(default_value_t = 0)]
        group: u32,
    },

    /// Find a group by name
    Find {
        /// Group name
        name: String,
    },

    /// Show a group's ancestors, nearest first
    Ancestors {
        /// Group slot
        group: u32,
    },

    /// Check the document for structural problems
    Verify,

    /// Write the Market/Fruit/Veggies example hierarchy
    Demo {
        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    bsg completion bash > ~/.local/share/bash-completion/completions/bsg
    bsg completion zsh > ~/.zfunc/_bsg
    bsg completion fish > ~/.config/fish/completions/bsg.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Leaf subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum LeafAction {
    /// Register leaves under the root group
    Add {
        /// Leaf slots
        #[arg(required = true)]
        leaves: Vec<u32>,
    },

    /// Delete a leaf and drop it from its group
    Delete {
        /// Leaf slot
        leaf: u32,
    },
}

/// Shells supported by `completion`.
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
