//! core::naming
//!
//! Group naming rules.
//!
//! # Rules
//!
//! - Names are unique among sibling groups only; cousins may share a name
//! - A colliding name gets the smallest numeric suffix that frees it:
//!   `name`, `name1`, `name2`, ...
//! - Resolution happens against the siblings present at the time of the call

use super::types::{GroupName, TypeError};

/// Name given to groups created without an explicit name.
pub const DEFAULT_GROUP_NAME: &str = "New Group";

/// Resolve `base` against the names already taken by siblings.
///
/// # Example
///
/// ```
/// use blendgroups::core::naming::unique_name;
///
/// assert_eq!(unique_name::<&str>("Fruit", &[]), "Fruit");
/// assert_eq!(unique_name("Fruit", &["Fruit"]), "Fruit1");
/// assert_eq!(unique_name("Fruit", &["Fruit", "Fruit1"]), "Fruit2");
/// ```
pub fn unique_name<S: AsRef<str>>(base: &str, taken: &[S]) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|name| name.as_ref() == candidate);

    let mut candidate = base.to_string();
    let mut suffix = 1u64;
    while is_taken(&candidate) {
        candidate = format!("{}{}", base, suffix);
        suffix += 1;
    }
    candidate
}

/// Validate `base` and resolve it against sibling names.
///
/// # Errors
///
/// Returns `TypeError::InvalidGroupName` if `base` is not a valid name.
pub fn resolve_group_name<S: AsRef<str>>(base: &str, taken: &[S]) -> Result<GroupName, TypeError> {
    let base = GroupName::new(base)?;
    GroupName::new(unique_name(base.as_str(), taken))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_name_is_kept() {
        assert_eq!(unique_name("Veggies", &["Fruit"]), "Veggies");
    }

    #[test]
    fn suffix_skips_taken_numbers() {
        assert_eq!(unique_name("A", &["A", "A1", "A2", "A4"]), "A3");
    }

    #[test]
    fn suffix_is_appended_without_separator() {
        assert_eq!(unique_name("New Group", &["New Group"]), "New Group1");
    }

    #[test]
    fn taken_suffixed_name_does_not_block_base() {
        assert_eq!(unique_name("A", &["A1"]), "A");
    }

    #[test]
    fn resolve_rejects_empty() {
        let taken: [&str; 0] = [];
        assert!(resolve_group_name("", &taken).is_err());
    }

    #[test]
    fn resolve_applies_suffix() {
        let name = resolve_group_name("Fruit", &["Fruit".to_string()]).unwrap();
        assert_eq!(name, "Fruit1");
    }
}
