//! move commands - Reparent groups and leaves
//!
//! Illegal group moves (into self, into a descendant) are reported as
//! warnings; the command still succeeds for the groups that moved. Groups
//! renamed on arrival are listed.

use anyhow::Result;

use super::mutate;
use crate::cli::Context;
use crate::core::types::{GroupId, LeafId};
use crate::ui::output;

/// Move `groups` under `to`.
pub fn move_groups(ctx: &Context, groups: &[u32], to: u32) -> Result<()> {
    let ids: Vec<GroupId> = groups.iter().copied().map(GroupId::new).collect();
    let dest = GroupId::new(to);

    let report = mutate(ctx, |hierarchy| Ok(hierarchy.move_groups(&ids, dest)?))?;

    for skipped in &report.skipped {
        output::warn(skipped, ctx.verbosity);
    }
    for (group, name) in &report.renamed {
        output::print(format!("Renamed {} to {}", group, name), ctx.verbosity);
    }
    output::print(
        format!("Moved {} group(s) under {}", report.moved.len(), dest),
        ctx.verbosity,
    );
    Ok(())
}

/// Move `leaves` under `to`.
pub fn move_leaves(ctx: &Context, leaves: &[u32], to: u32) -> Result<()> {
    let ids: Vec<LeafId> = leaves.iter().copied().map(LeafId::new).collect();
    let dest = GroupId::new(to);

    mutate(ctx, |hierarchy| Ok(hierarchy.move_leaves(&ids, dest)?))?;

    output::print(
        format!("Moved {} leaf(s) under {}", ids.len(), dest),
        ctx.verbosity,
    );
    Ok(())
}
