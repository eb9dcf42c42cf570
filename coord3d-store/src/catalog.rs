use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{debug, info};

use coord3d_core::models::{DatasetId, MetadataBundle};
use coord3d_core::{StoreError, StoreResult};

use crate::backend::{CoordinateBackend, InMemoryCoords, MmapCoords};
use crate::config::{BackendKind, StoreConfig};
use crate::index::RegionIndex;
use crate::layout::{COORDS_FILE, ResolutionIndexFile, scan_resolutions};

///
/// One opened resolution: its region index, its coordinate array and its
/// metadata bundle. Cloning is cheap and every clone reads the same data.
///
#[derive(Debug, Clone)]
pub struct ResolutionHandle {
    resolution: u32,
    index: Arc<RegionIndex>,
    coords: Arc<dyn CoordinateBackend>,
    metadata: Arc<MetadataBundle>,
}

// handles and datasets are shared across request threads
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResolutionHandle>();
    assert_send_sync::<Dataset>();
};

impl ResolutionHandle {
    ///
    /// Bind an already parsed index file to a coordinate backend. The index
    /// is validated against the backend's shape.
    ///
    pub fn from_parts(
        resolution: u32,
        index_file: ResolutionIndexFile,
        coords: Arc<dyn CoordinateBackend>,
    ) -> StoreResult<Self> {
        let index = RegionIndex::build(index_file.regions, coords.shape())?;
        Ok(ResolutionHandle {
            resolution,
            index: Arc::new(index),
            coords,
            metadata: Arc::new(index_file.metadata),
        })
    }

    ///
    /// Open a resolution directory containing `coords.npy` and an index file.
    ///
    pub fn load(resolution: u32, dir: &Path, backend: BackendKind) -> StoreResult<Self> {
        let index_file = ResolutionIndexFile::read(dir)?;
        let coords_path = dir.join(COORDS_FILE);
        let coords: Arc<dyn CoordinateBackend> = match backend {
            BackendKind::Mmap => Arc::new(MmapCoords::open(&coords_path)?),
            BackendKind::Memory => Arc::new(InMemoryCoords::from_npy(&coords_path)?),
        };

        let handle = ResolutionHandle::from_parts(resolution, index_file, coords)?;
        info!(
            "Opened resolution {resolution} ({} regions, {:?} backend)",
            handle.index.len(),
            backend
        );
        Ok(handle)
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn index(&self) -> &RegionIndex {
        &self.index
    }

    pub fn coords(&self) -> &dyn CoordinateBackend {
        self.coords.as_ref()
    }

    pub fn metadata(&self) -> &MetadataBundle {
        &self.metadata
    }
}

#[derive(Debug)]
struct CatalogEntry {
    /// `None` for resolutions that were handed in already opened.
    dir: Option<PathBuf>,
    loaded: RwLock<Option<ResolutionHandle>>,
}

///
/// Resolution value to lazily opened [`ResolutionHandle`].
///
#[derive(Debug)]
pub struct ResolutionCatalog {
    backend: BackendKind,
    entries: BTreeMap<u32, CatalogEntry>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::StorageUnavailable("resolution cache lock poisoned".to_string())
}

impl ResolutionCatalog {
    pub fn scan(dataset_dir: &Path, backend: BackendKind) -> StoreResult<Self> {
        let entries = scan_resolutions(dataset_dir)?
            .into_iter()
            .map(|(resolution, dir)| {
                let entry = CatalogEntry {
                    dir: Some(dir),
                    loaded: RwLock::new(None),
                };
                (resolution, entry)
            })
            .collect();

        Ok(ResolutionCatalog { backend, entries })
    }

    pub fn from_handles(handles: Vec<ResolutionHandle>) -> StoreResult<Self> {
        let mut entries = BTreeMap::new();
        for handle in handles {
            let resolution = handle.resolution();
            let entry = CatalogEntry {
                dir: None,
                loaded: RwLock::new(Some(handle)),
            };
            if entries.insert(resolution, entry).is_some() {
                return Err(StoreError::InvalidArgument(format!(
                    "resolution {resolution} given more than once"
                )));
            }
        }

        Ok(ResolutionCatalog {
            backend: BackendKind::Memory,
            entries,
        })
    }

    pub fn list_resolutions(&self) -> Vec<u32> {
        self.entries.keys().copied().collect()
    }

    pub fn open_resolution(&self, resolution: u32) -> StoreResult<ResolutionHandle> {
        let entry = self
            .entries
            .get(&resolution)
            .ok_or(StoreError::ResolutionNotFound(resolution))?;

        if let Some(handle) = entry.loaded.read().map_err(poisoned)?.as_ref() {
            debug!("Resolution {resolution} served from cache");
            return Ok(handle.clone());
        }

        let mut slot = entry.loaded.write().map_err(poisoned)?;
        // another caller may have loaded it while we waited
        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }

        let dir = entry
            .dir
            .as_deref()
            .ok_or(StoreError::ResolutionNotFound(resolution))?;
        let handle = ResolutionHandle::load(resolution, dir, self.backend)?;
        *slot = Some(handle.clone());
        Ok(handle)
    }
}

///
/// An opened dataset. Call [`Dataset::close`] when done; handles already
/// obtained from [`Dataset::open_resolution`] remain usable afterwards.
///
#[derive(Debug)]
pub struct Dataset {
    id: DatasetId,
    catalog: Option<ResolutionCatalog>,
}

impl Dataset {
    pub fn in_memory(id: DatasetId, handles: Vec<ResolutionHandle>) -> StoreResult<Self> {
        Ok(Dataset {
            id,
            catalog: Some(ResolutionCatalog::from_handles(handles)?),
        })
    }

    pub fn id(&self) -> &DatasetId {
        &self.id
    }

    pub fn is_open(&self) -> bool {
        self.catalog.is_some()
    }

    fn catalog(&self) -> StoreResult<&ResolutionCatalog> {
        self.catalog
            .as_ref()
            .ok_or_else(|| StoreError::StoreClosed(self.id.to_string()))
    }

    ///
    /// Every resolution present in the dataset, ascending. An empty dataset
    /// gives an empty list.
    ///
    pub fn list_resolutions(&self) -> StoreResult<Vec<u32>> {
        Ok(self.catalog()?.list_resolutions())
    }

    pub fn open_resolution(&self, resolution: u32) -> StoreResult<ResolutionHandle> {
        self.catalog()?.open_resolution(resolution)
    }

    /// Release the dataset. Safe to call more than once.
    pub fn close(&mut self) {
        if self.catalog.take().is_some() {
            info!("Closed dataset {}", self.id);
        }
    }
}

///
/// Entry point: a root directory holding `<owner>/<dataset_id>/` trees.
///
#[derive(Debug, Clone, Default)]
pub struct CoordStore {
    config: StoreConfig,
}

impl CoordStore {
    pub fn new(config: StoreConfig) -> Self {
        CoordStore { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn dataset_dir(&self, id: &DatasetId) -> PathBuf {
        self.config.root.join(id.relative_path())
    }

    pub fn open_dataset(&self, id: &DatasetId) -> StoreResult<Dataset> {
        let dir = self.dataset_dir(id);
        let catalog = ResolutionCatalog::scan(&dir, self.config.backend)?;
        info!(
            "Opened dataset {id} with {} resolution(s) from {}",
            catalog.entries.len(),
            dir.display()
        );
        Ok(Dataset {
            id: id.clone(),
            catalog: Some(catalog),
        })
    }
}
