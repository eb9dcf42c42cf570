use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use ndarray::ArrayView3;
use ndarray_npy::{ViewNpyError, ViewNpyExt};

use coord3d_core::{StoreError, StoreResult};

use super::{CoordShape, CoordinateBackend};

///
/// Coordinate array backed by a memory-mapped `.npy` file. Slices are views
/// straight into the mapping; nothing is copied until a caller formats them.
///
pub struct MmapCoords {
    path: PathBuf,
    mmap: Mmap,
    shape: CoordShape,
}

fn npy_error(path: &Path, err: ViewNpyError) -> StoreError {
    StoreError::StorageUnavailable(format!(
        "Failed to view coordinate array {}: {err}",
        path.display()
    ))
}

impl MmapCoords {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let file = File::open(path).map_err(|e| {
            StoreError::StorageUnavailable(format!("Can't open {}: {e}", path.display()))
        })?;

        // SAFETY: published datasets are immutable; nothing writes to the
        // file while it is mapped.
        let mmap = unsafe { Mmap::map(&file)? };

        let shape = {
            let view = ArrayView3::<i32>::view_npy(&mmap).map_err(|e| npy_error(path, e))?;
            CoordShape::from_dim(view.dim())?
        };

        Ok(MmapCoords {
            path: path.to_path_buf(),
            mmap,
            shape,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for MmapCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MmapCoords")
            .field("path", &self.path)
            .field("shape", &self.shape)
            .finish()
    }
}

impl CoordinateBackend for MmapCoords {
    fn shape(&self) -> CoordShape {
        self.shape
    }

    /// Each call re-reads the `.npy` header at the front of the mapping to
    /// locate the data. That costs a parse of a few hundred header bytes;
    /// the coordinate data itself is never copied.
    fn view(&self) -> StoreResult<ArrayView3<'_, i32>> {
        ArrayView3::<i32>::view_npy(&self.mmap).map_err(|e| npy_error(&self.path, e))
    }
}
