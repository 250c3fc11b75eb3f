// src/manifest.rs
// =============================================================================
// Writes <output-dir>/index.json, the record of every image we saved:
//
//   {"images": [{"url": "...", "page": "...", "depth": 1}, ...]}
//
// Only entries marked as downloaded are included, in index order. The file
// is written once at the end of the run and replaces any previous one.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::crawl::CrawlIndex;

pub const MANIFEST_FILE_NAME: &str = "index.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub images: Vec<ManifestImage>,
}

// One saved image and where it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestImage {
    /// Image URL as it appeared in the page
    pub url: String,
    /// Page the image was found on
    pub page: String,
    pub depth: u32,
}

impl Manifest {
    pub fn from_index(index: &CrawlIndex) -> Self {
        let images = index
            .downloaded()
            .map(|(key, entry)| ManifestImage {
                url: key.image_url.clone(),
                page: key.page_url.clone(),
                depth: entry.depth,
            })
            .collect();

        Self { images }
    }
}

pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILE_NAME)
}

// Serializes the downloaded entries and writes them to the output directory
//
// Returns: the number of images listed in the manifest
pub fn write_manifest(index: &CrawlIndex, output_dir: &Path) -> Result<usize> {
    let manifest = Manifest::from_index(index);
    let json = serde_json::to_string(&manifest)?;

    let path = manifest_path(output_dir);
    std::fs::write(&path, json)
        .with_context(|| format!("problem writing manifest {}", path.display()))?;

    Ok(manifest.images.len())
}
