//! delete command - Delete a group and its subtree

use anyhow::Result;

use super::mutate;
use crate::cli::Context;
use crate::core::types::GroupId;
use crate::ui::output;

/// Delete `group`, its nested groups, and the leaves beneath it.
pub fn delete(ctx: &Context, group: u32) -> Result<()> {
    let group = GroupId::new(group);
    let report = mutate(ctx, |groups| Ok(groups.delete_group(group)?))?;

    output::print(
        format!(
            "Deleted {} group(s) and {} leaf(s)",
            report.groups.len(),
            report.leaves.len()
        ),
        ctx.verbosity,
    );
    Ok(())
}
