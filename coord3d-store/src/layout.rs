//! On-disk layout of a dataset.
//!
//! ```text
//! <root>/<owner>/<dataset_id>/
//!     <resolution>/
//!         coords.npy              int32 [total_bins, model_capacity, 3]
//!         index.json[.gz]         metadata bundle + regions
//! ```
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use coord3d_core::models::{MetadataBundle, RegionRecord};
use coord3d_core::utils::{find_first_existing, get_dynamic_reader};
use coord3d_core::{StoreError, StoreResult};

pub const COORDS_FILE: &str = "coords.npy";
pub const INDEX_FILES: [&str; 2] = ["index.json", "index.json.gz"];

///
/// Contents of a resolution's `index.json`. Regions are listed in
/// ingestion order.
///
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionIndexFile {
    #[serde(default)]
    pub metadata: MetadataBundle,
    #[serde(default)]
    pub regions: Vec<RegionRecord>,
}

impl ResolutionIndexFile {
    pub fn read(resolution_dir: &Path) -> StoreResult<Self> {
        let path = find_first_existing(resolution_dir, &INDEX_FILES).ok_or_else(|| {
            StoreError::StorageUnavailable(format!(
                "No region index found in {}",
                resolution_dir.display()
            ))
        })?;
        let reader = get_dynamic_reader(&path)?;
        Ok(serde_json::from_reader(reader)?)
    }
}

///
/// List the resolution partitions of a dataset directory, keyed by
/// resolution. Entries that are not decimal integers, or that have no
/// region index, are skipped.
///
pub fn scan_resolutions(dataset_dir: &Path) -> StoreResult<BTreeMap<u32, PathBuf>> {
    let entries = match fs::read_dir(dataset_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            return Err(StoreError::DatasetNotFound(dataset_dir.display().to_string()));
        }
        Err(e) => {
            return Err(StoreError::StorageUnavailable(format!(
                "Can't read dataset directory {}: {e}",
                dataset_dir.display()
            )));
        }
    };

    let mut resolutions = BTreeMap::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let Ok(resolution) = name.parse::<u32>() else {
            warn!("Skipping non-resolution entry {}", path.display());
            continue;
        };

        if find_first_existing(&path, &INDEX_FILES).is_none() {
            warn!("Skipping resolution {resolution}: no region index in {}", path.display());
            continue;
        }
        resolutions.insert(resolution, path);
    }

    Ok(resolutions)
}
