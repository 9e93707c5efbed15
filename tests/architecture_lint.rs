//! Architecture enforcement tests.
//!
//! The crate is layered: `store` sits under `core`, and `cli` sits on top.
//! These tests read the sources and fail when an import crosses a layer
//! the wrong way.
//!
//! # Test Categories
//!
//! 1. **Store Isolation** - Storage knows only ids and records
//! 2. **Core Isolation** - Domain logic never reaches into the CLI
//! 3. **Error Discipline** - `anyhow` stays in the binary layer

use std::fs;
use std::path::{Path, PathBuf};

/// All `.rs` files under `dir`, recursively.
fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(&current).expect("Failed to read directory") {
            let path = entry.expect("Failed to read entry").path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Code before the first `#[cfg(test)]`, with comment lines dropped so doc
/// examples don't count.
fn non_test_source(path: &Path) -> String {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to read {}", path.display()));
    let code = match content.find("#[cfg(test)]") {
        Some(index) => &content[..index],
        None => content.as_str(),
    };
    code.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collect `file: pattern` for every forbidden pattern found under `dir`.
fn find_violations(dir: &str, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for path in rust_files(Path::new(dir)) {
        let source = non_test_source(&path);
        for pattern in forbidden {
            if source.contains(pattern) {
                violations.push(format!("{}: contains `{}`", path.display(), pattern));
            }
        }
    }
    violations
}

// =============================================================================
// Store Isolation
// =============================================================================

/// Storage must not depend on the engine built on top of it.
#[test]
fn store_does_not_import_engine() {
    let violations = find_violations(
        "src/store",
        &["crate::core::hierarchy", "crate::core::verify", "crate::cli"],
    );
    assert!(
        violations.is_empty(),
        "store layer imports upper layers:\n{}",
        violations.join("\n")
    );
}

// =============================================================================
// Core Isolation
// =============================================================================

/// Domain logic must not know about the CLI or output formatting.
#[test]
fn core_does_not_import_cli() {
    let violations = find_violations("src/core", &["crate::cli", "crate::ui", "println!"]);
    assert!(
        violations.is_empty(),
        "core layer reaches into the CLI:\n{}",
        violations.join("\n")
    );
}

/// The hierarchy engine goes through the store trait, never a concrete store.
#[test]
fn hierarchy_uses_store_trait_only() {
    let violations = find_violations("src/core/hierarchy", &["MemoryStore", "store::document"]);
    assert!(
        violations.is_empty(),
        "hierarchy engine depends on a concrete store:\n{}",
        violations.join("\n")
    );
}

// =============================================================================
// Error Discipline
// =============================================================================

/// Library layers use typed errors; `anyhow` is for the CLI only.
#[test]
fn anyhow_only_in_cli() {
    let mut violations = find_violations("src/core", &["anyhow"]);
    violations.extend(find_violations("src/store", &["anyhow"]));
    assert!(
        violations.is_empty(),
        "anyhow used outside the CLI:\n{}",
        violations.join("\n")
    );
}

/// Library code propagates errors instead of panicking.
#[test]
fn no_unwrap_in_library_code() {
    let mut violations = find_violations("src/core", &[".unwrap()", ".expect("]);
    violations.extend(find_violations("src/store", &[".unwrap()", ".expect("]));
    assert!(
        violations.is_empty(),
        "panicking calls in library code:\n{}",
        violations.join("\n")
    );
}
