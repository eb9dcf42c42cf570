use std::path::Path;

use ndarray::{Array3, ArrayView3};
use ndarray_npy::read_npy;

use coord3d_core::{StoreError, StoreResult};

use super::{CoordShape, CoordinateBackend};

///
/// Coordinate array held entirely in memory. Used for tests, for embedding,
/// and when a store is configured to load arrays instead of mapping them.
///
#[derive(Debug, Clone)]
pub struct InMemoryCoords {
    data: Array3<i32>,
    shape: CoordShape,
}

impl InMemoryCoords {
    pub fn new(data: Array3<i32>) -> StoreResult<Self> {
        let shape = CoordShape::from_dim(data.dim())?;
        Ok(InMemoryCoords { data, shape })
    }

    ///
    /// Read a whole `.npy` file into memory.
    ///
    pub fn from_npy(path: &Path) -> StoreResult<Self> {
        let data: Array3<i32> = read_npy(path).map_err(|e| {
            StoreError::StorageUnavailable(format!(
                "Failed to read coordinate array {}: {e}",
                path.display()
            ))
        })?;
        InMemoryCoords::new(data)
    }
}

impl CoordinateBackend for InMemoryCoords {
    fn shape(&self) -> CoordShape {
        self.shape
    }

    fn view(&self) -> StoreResult<ArrayView3<'_, i32>> {
        Ok(self.data.view())
    }
}
