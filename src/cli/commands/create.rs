//! create command - Create a group

use anyhow::Result;

use super::mutate;
use crate::cli::Context;
use crate::core::hierarchy::NewGroup;
use crate::core::types::{GroupId, LeafId};
use crate::ui::output;

/// Create a group under `parent`, moving `leaves` into it.
///
/// Prints the new slot and the name actually assigned.
pub fn create(ctx: &Context, parent: u32, name: Option<&str>, leaves: &[u32]) -> Result<()> {
    let new = NewGroup::named(name.unwrap_or_else(|| ctx.config.default_group_name()))
        .under(GroupId::new(parent))
        .with_leaves(leaves.iter().copied().map(LeafId::new));

    let (group, name) = mutate(ctx, |groups| {
        let group = groups.create_group(new)?;
        let name = groups.group_name(group)?;
        Ok((group, name))
    })?;

    output::print(format!("{} {}", group, name), ctx.verbosity);
    Ok(())
}
