//! query commands - Read-only views of the hierarchy
//!
//! Groups print as `<slot> <name>`, leaves as `leaf <slot>`.

use anyhow::Result;

use super::load;
use crate::cli::Context;
use crate::core::hierarchy::GroupHierarchy;
use crate::core::types::{GroupId, NodeRef};
use crate::store::HierarchyStore;
use crate::ui::output;

/// Display label for one node.
fn label<S: HierarchyStore>(groups: &GroupHierarchy<S>, node: NodeRef) -> Result<String> {
    Ok(match node {
        NodeRef::Group(group) => format!("{} {}", group, groups.group_name(group)?),
        NodeRef::Leaf(leaf) => format!("leaf {}", leaf),
    })
}

/// Every group, in storage order.
pub fn list(ctx: &Context) -> Result<()> {
    let groups = load(ctx)?;
    let rows = groups
        .groups()?
        .map(|group| label(&groups, NodeRef::Group(group)))
        .collect::<Result<Vec<_>>>()?;
    output::print(output::format_list(&rows, ""), ctx.verbosity);
    Ok(())
}

/// The subtree at `group` as an indented tree.
pub fn tree(ctx: &Context, group: u32) -> Result<()> {
    let groups = load(ctx)?;
    let rows = groups
        .walk(GroupId::new(group))?
        .into_iter()
        .map(|(depth, node)| -> Result<(usize, String)> {
            Ok((depth, label(&groups, node)?))
        })
        .collect::<Result<Vec<_>>>()?;
    output::print(output::format_tree(&rows), ctx.verbosity);
    Ok(())
}

/// The first group named `name`.
pub fn find(ctx: &Context, name: &str) -> Result<()> {
    let groups = load(ctx)?;
    match groups.find_group(name)? {
        Some(group) => output::print(group, ctx.verbosity),
        None => anyhow::bail!("no group named '{}'", name),
    }
    Ok(())
}

/// Ancestors of `group`, nearest first.
pub fn ancestors(ctx: &Context, group: u32) -> Result<()> {
    let groups = load(ctx)?;
    let rows = groups
        .ancestors_of(GroupId::new(group))?
        .into_iter()
        .map(|ancestor| label(&groups, NodeRef::Group(ancestor)))
        .collect::<Result<Vec<_>>>()?;
    output::print(output::format_list(&rows, ""), ctx.verbosity);
    Ok(())
}
