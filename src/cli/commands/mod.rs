//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Converts raw slots into typed ids
//! 2. Calls the hierarchy engine
//! 3. Formats and displays output
//!
//! Mutating handlers go through [`mutate`], which holds the document lock
//! from load to save and writes the document only if the mutation
//! succeeded. A failed command leaves the file as it was.

mod completion;
mod create;
mod delete;
mod demo;
mod init;
mod leaf;
mod move_cmd;
mod query;
mod rename;
mod verify_cmd;

pub use completion::completion;
pub use create::create;
pub use delete::delete;
pub use demo::{build_scene, demo, Scene};
pub use init::init;
pub use leaf::{leaf_add, leaf_delete};
pub use move_cmd::{move_groups, move_leaves};
pub use query::{ancestors, find, list, tree};
pub use rename::rename;
pub use verify_cmd::verify;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::cli::args::{Command, LeafAction};
use crate::cli::Context;
use crate::core::hierarchy::GroupHierarchy;
use crate::core::lock::DocumentLock;
use crate::store::{document, MemoryStore};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Init { force } => init::init(ctx, force),
        Command::Leaf { action } => match action {
            LeafAction::Add { leaves } => leaf::leaf_add(ctx, &leaves),
            LeafAction::Delete { leaf } => leaf::leaf_delete(ctx, leaf),
        },
        Command::Create {
            parent,
            name,
            leaves,
        } => create::create(ctx, parent, name.as_deref(), &leaves),
        Command::MoveGroups { groups, to } => move_cmd::move_groups(ctx, &groups, to),
        Command::MoveLeaves { leaves, to } => move_cmd::move_leaves(ctx, &leaves, to),
        Command::Rename { group, name } => rename::rename(ctx, group, &name),
        Command::Delete { group } => delete::delete(ctx, group),
        Command::List => query::list(ctx),
        Command::Tree { group } => query::tree(ctx, group),
        Command::Find { name } => query::find(ctx, &name),
        Command::Ancestors { group } => query::ancestors(ctx, group),
        Command::Verify => verify_cmd::verify(ctx),
        Command::Demo { force } => demo::demo(ctx, force),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load the document for reading.
pub(crate) fn load(ctx: &Context) -> Result<GroupHierarchy<MemoryStore>> {
    if !ctx.document.exists() {
        anyhow::bail!(
            "no document at '{}'. Run 'bsg init' first.",
            ctx.document.display()
        );
    }
    let store = document::load(&ctx.document)
        .with_context(|| format!("failed to load '{}'", ctx.document.display()))?;
    Ok(GroupHierarchy::new(store))
}

/// Run `f` against the document under the lock and save the result.
pub(crate) fn mutate<T>(
    ctx: &Context,
    f: impl FnOnce(&mut GroupHierarchy<MemoryStore>) -> Result<T>,
) -> Result<T> {
    let _lock = DocumentLock::acquire(&ctx.document)?;
    let mut groups = load(ctx)?;

    let out = f(&mut groups)?;

    document::save(&ctx.document, groups.store())
        .with_context(|| format!("failed to save '{}'", ctx.document.display()))?;
    debug!(document = %ctx.document.display(), "saved document");
    Ok(out)
}

/// Write a fresh store to the document under the lock.
///
/// Refuses to overwrite an existing document unless `force` is set.
pub(crate) fn write_new(ctx: &Context, store: &MemoryStore, force: bool) -> Result<()> {
    let _lock = DocumentLock::acquire(&ctx.document)?;
    if ctx.document.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            ctx.document.display()
        );
    }
    document::save(&ctx.document, store)
        .with_context(|| format!("failed to save '{}'", ctx.document.display()))?;
    Ok(())
}
