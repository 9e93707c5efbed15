//! init command - Create an empty hierarchy document

use anyhow::Result;

use super::write_new;
use crate::cli::Context;
use crate::store::MemoryStore;
use crate::ui::output;

/// Write a document holding only the root group.
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    write_new(ctx, &MemoryStore::new(), force)?;
    output::print(
        format!("Initialized {}", ctx.document.display()),
        ctx.verbosity,
    );
    Ok(())
}
