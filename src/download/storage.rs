// src/download/storage.rs
// =============================================================================
// Filesystem helpers: output directory setup and the "is this really an
// image?" check.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};

// Deletes the output directory (if any) with everything inside, then
// creates it again empty. Every run starts from a clean slate.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("problem removing {} directory", dir.display()))?;
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("problem creating {} directory", dir.display()))?;

    Ok(())
}

// Servers often answer a missing image with a 200 and an HTML (or JSON) page.
// Real image formats are binary and are practically never valid UTF-8, so a
// body that decodes as UTF-8 is treated as "not an image".
//
// An empty body decodes fine too, and is rejected along with the rest.
pub fn is_text(bytes: &[u8]) -> bool {
    std::str::from_utf8(bytes).is_ok()
}
