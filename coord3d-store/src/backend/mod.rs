use std::fmt::Debug;

use ndarray::{ArrayView2, ArrayView3, s};

use coord3d_core::{StoreError, StoreResult};

pub mod memory;
pub mod mmap;

pub use self::memory::InMemoryCoords;
pub use self::mmap::MmapCoords;

/// Length of the trailing (x, y, z) axis.
pub const COORD_DIMS: usize = 3;

///
/// Extent of a coordinate array: `[bins, model_capacity, 3]`.
///
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct CoordShape {
    pub bins: usize,
    pub model_capacity: usize,
}

impl CoordShape {
    pub(crate) fn from_dim(dim: (usize, usize, usize)) -> StoreResult<Self> {
        let (bins, model_capacity, coords) = dim;
        if coords != COORD_DIMS {
            return Err(StoreError::StorageUnavailable(format!(
                "Coordinate array must have a trailing axis of length {COORD_DIMS}, found {coords}"
            )));
        }
        Ok(CoordShape {
            bins,
            model_capacity,
        })
    }

    ///
    /// Make sure `[i, j)` and (optionally) `row` fall inside the array.
    ///
    pub fn check_window(&self, i: usize, j: usize, row: Option<usize>) -> StoreResult<()> {
        if i >= j || j > self.bins {
            return Err(StoreError::OutOfRange(format!(
                "bin window [{i}, {j}) does not fit an array of {} bins",
                self.bins
            )));
        }
        if let Some(row) = row {
            if row >= self.model_capacity {
                return Err(StoreError::OutOfRange(format!(
                    "model row {row} exceeds model capacity {}",
                    self.model_capacity
                )));
            }
        }
        Ok(())
    }
}

///
/// Read-only access to one resolution's packed `[bins, model_capacity, 3]`
/// signed integer array.
///
/// Implementors only hand out a borrowed view of the whole array; slicing is
/// shared so every backend applies the same bounds checks.
///
pub trait CoordinateBackend: Send + Sync + Debug {
    fn shape(&self) -> CoordShape;

    fn view(&self) -> StoreResult<ArrayView3<'_, i32>>;

    ///
    /// The `(x, y, z)` triple of one model row for every bin in `[i, j)`.
    /// The result has shape `[j - i, 3]`.
    ///
    fn slice_models(&self, i: usize, j: usize, row: usize) -> StoreResult<ArrayView2<'_, i32>> {
        self.shape().check_window(i, j, Some(row))?;
        Ok(self.view()?.slice_move(s![i..j, row, ..]))
    }

    ///
    /// Every model row for the bins in `[i, j)`, shape
    /// `[j - i, model_capacity, 3]`. Cheaper than repeated
    /// [`CoordinateBackend::slice_models`] calls when several models of one
    /// region are needed.
    ///
    fn slice_region(&self, i: usize, j: usize) -> StoreResult<ArrayView3<'_, i32>> {
        self.shape().check_window(i, j, None)?;
        Ok(self.view()?.slice_move(s![i..j, .., ..]))
    }
}

///
/// Flatten a `[bins, 3]` block into `x0, y0, z0, x1, y1, z1, ...`, each
/// value rendered as a decimal string.
///
pub fn flatten_coords(model: &ArrayView2<'_, i32>) -> Vec<String> {
    model.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::Array3;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn coords() -> InMemoryCoords {
        // value encodes (bin, row, axis) so slices are easy to check
        let data = Array3::from_shape_fn((6, 4, 3), |(bin, row, axis)| {
            (bin * 100 + row * 10 + axis) as i32
        });
        InMemoryCoords::new(data).unwrap()
    }

    #[rstest]
    fn test_slice_models(coords: InMemoryCoords) {
        let model = coords.slice_models(2, 4, 1).unwrap();
        assert_eq!(model.dim(), (2, 3));
        assert_eq!(flatten_coords(&model), vec!["210", "211", "212", "310", "311", "312"]);
    }

    #[rstest]
    fn test_slice_region_matches_slice_models(coords: InMemoryCoords) {
        let block = coords.slice_region(1, 5).unwrap();
        assert_eq!(block.dim(), (4, 4, 3));

        for row in 0..4 {
            let from_block = block.slice(s![.., row, ..]);
            let direct = coords.slice_models(1, 5, row).unwrap();
            assert_eq!(flatten_coords(&from_block), flatten_coords(&direct));
        }
    }

    #[rstest]
    #[case(0, 7, 0)]
    #[case(3, 3, 0)]
    #[case(4, 2, 0)]
    #[case(0, 6, 4)]
    fn test_out_of_range_slices(
        coords: InMemoryCoords,
        #[case] i: usize,
        #[case] j: usize,
        #[case] row: usize,
    ) {
        let err = coords.slice_models(i, j, row).unwrap_err();
        assert!(matches!(err, StoreError::OutOfRange(_)));
    }

    #[rstest]
    fn test_rejects_wrong_trailing_axis() {
        let data = Array3::<i32>::zeros((4, 2, 2));
        assert!(InMemoryCoords::new(data).is_err());
    }
}
