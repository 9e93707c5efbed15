//! verify command - Check a document for structural problems
//!
//! Exits non-zero when any problem is found.

use anyhow::Result;

use super::load;
use crate::cli::Context;
use crate::core::verify::verify as verify_store;
use crate::ui::output;

/// Verify the document and report every problem found.
pub fn verify(ctx: &Context) -> Result<()> {
    let groups = load(ctx)?;
    let result = verify_store(groups.store())?;

    if result.ok {
        output::print("ok", ctx.verbosity);
        return Ok(());
    }

    for problem in &result.errors {
        output::error(problem);
    }
    anyhow::bail!("{} problem(s) found", result.errors.len())
}
