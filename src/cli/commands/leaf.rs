//! leaf commands - Register and delete leaves
//!
//! `leaf add` plays the host's part: a new target appears under the root
//! group. `leaf delete` goes through the hierarchy so the owning group's
//! child list is cleaned up.

use anyhow::Result;

use super::mutate;
use crate::cli::Context;
use crate::core::types::LeafId;
use crate::ui::output;

/// Register `leaves` under the root group.
pub fn leaf_add(ctx: &Context, leaves: &[u32]) -> Result<()> {
    mutate(ctx, |groups| {
        for slot in leaves {
            groups.store_mut().insert_leaf(LeafId::new(*slot))?;
        }
        Ok(())
    })?;
    output::print(format!("Added {} leaf(s)", leaves.len()), ctx.verbosity);
    Ok(())
}

/// Delete `leaf`.
pub fn leaf_delete(ctx: &Context, leaf: u32) -> Result<()> {
    let leaf = LeafId::new(leaf);
    mutate(ctx, |groups| Ok(groups.delete_leaf(leaf)?))?;
    output::print(format!("Deleted leaf {}", leaf), ctx.verbosity);
    Ok(())
}
