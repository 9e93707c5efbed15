//! demo command - Write the Market/Fruit/Veggies example hierarchy
//!
//! ```text
//! 0 Group
//!   1 Market
//!     2 Fruit
//!       leaf 0  (apple)
//!       leaf 1  (banana)
//!       leaf 3  (durian)
//!     3 Veggies
//!       leaf 2  (carrot)
//!       leaf 4  (eggplant)
//!       leaf 5  (fennel)
//! ```

use anyhow::Result;

use super::write_new;
use crate::cli::Context;
use crate::core::hierarchy::{GroupHierarchy, NewGroup, Result as HierarchyResult};
use crate::core::types::{GroupId, LeafId};
use crate::store::MemoryStore;
use crate::ui::output;

const APPLE: LeafId = LeafId::new(0);
const BANANA: LeafId = LeafId::new(1);
const CARROT: LeafId = LeafId::new(2);
const DURIAN: LeafId = LeafId::new(3);
const EGGPLANT: LeafId = LeafId::new(4);
const FENNEL: LeafId = LeafId::new(5);

/// Group slots created by [`build_scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scene {
    pub market: GroupId,
    pub fruit: GroupId,
    pub veggies: GroupId,
}

/// Build the example hierarchy in a fresh store.
pub fn build_scene() -> HierarchyResult<(GroupHierarchy<MemoryStore>, Scene)> {
    let mut store = MemoryStore::new();
    for leaf in [APPLE, BANANA, CARROT, DURIAN, EGGPLANT, FENNEL] {
        store.insert_leaf(leaf)?;
    }
    let mut groups = GroupHierarchy::new(store);

    let market = groups.create_group(NewGroup::named("Market"))?;
    let fruit = groups.create_group(
        NewGroup::named("Fruit")
            .under(market)
            .with_leaves([APPLE, BANANA, DURIAN]),
    )?;
    let veggies = groups.create_group(NewGroup::named("Veggies"))?;
    groups.move_leaves(&[CARROT, EGGPLANT, FENNEL], veggies)?;
    groups.move_groups(&[veggies], market)?;

    Ok((
        groups,
        Scene {
            market,
            fruit,
            veggies,
        },
    ))
}

/// Write the example hierarchy to the document.
pub fn demo(ctx: &Context, force: bool) -> Result<()> {
    let (groups, _) = build_scene()?;
    write_new(ctx, groups.store(), force)?;
    output::print(
        format!("Wrote example hierarchy to {}", ctx.document.display()),
        ctx.verbosity,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::verify::verify;

    #[test]
    fn scene_matches_layout() {
        let (groups, scene) = build_scene().unwrap();

        assert_eq!(
            groups.groups().unwrap().collect::<Vec<_>>(),
            vec![GroupId::ROOT, scene.market, scene.fruit, scene.veggies]
        );
        assert_eq!(
            groups.child_groups(scene.market).unwrap(),
            vec![scene.fruit, scene.veggies]
        );
        assert_eq!(
            groups.child_leaves(scene.veggies).unwrap(),
            vec![LeafId::new(2), LeafId::new(4), LeafId::new(5)]
        );
        assert_eq!(
            groups.child_leaves(scene.fruit).unwrap(),
            vec![LeafId::new(0), LeafId::new(1), LeafId::new(3)]
        );
        assert!(groups.child_leaves(GroupId::ROOT).unwrap().is_empty());
        assert!(verify(groups.store()).unwrap().ok);
    }
}
