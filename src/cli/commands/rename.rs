//! rename command - Rename a group
//!
//! The printed name is the one actually stored, which carries a numeric
//! suffix when a sibling already uses the requested name.

use anyhow::Result;

use super::mutate;
use crate::cli::Context;
use crate::core::types::GroupId;
use crate::ui::output;

/// Rename `group` to `name`.
pub fn rename(ctx: &Context, group: u32, name: &str) -> Result<()> {
    let group = GroupId::new(group);
    let resolved = mutate(ctx, |groups| Ok(groups.rename_group(group, name)?))?;
    output::print(format!("{} {}", group, resolved), ctx.verbosity);
    Ok(())
}
