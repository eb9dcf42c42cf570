use std::collections::BTreeSet;

use fxhash::FxHashMap as HashMap;
use gtars_core::models::Interval;
use gtars_overlaprs::{Bits, Overlapper};

use coord3d_core::models::{BinWindow, ModelOrderEntry, RegionRecord};
use coord3d_core::{StoreError, StoreResult};

use crate::backend::CoordShape;

///
/// Per-resolution lookup from region id to its genomic location, its bin
/// window and its model-order table.
///
/// Regions are kept in ingestion order, which is also the order used for
/// previous/next navigation. Each chromosome gets its own [`Bits`] whose
/// interval values are those ingestion ordinals.
///
#[derive(Debug, Clone)]
pub struct RegionIndex {
    regions: Vec<RegionRecord>,
    by_id: HashMap<String, usize>,
    by_chrom: HashMap<String, Bits<u32, usize>>,
}

impl RegionIndex {
    ///
    /// Build the index and check it against the coordinate array it points
    /// into. Any inconsistency is reported now rather than at query time.
    ///
    pub fn build(regions: Vec<RegionRecord>, shape: CoordShape) -> StoreResult<Self> {
        let mut by_id: HashMap<String, usize> = HashMap::default();
        let mut intervals: HashMap<String, Vec<Interval<u32, usize>>> = HashMap::default();
        let mut claimed: Vec<(BinWindow, usize)> = Vec::with_capacity(regions.len());

        for (ordinal, region) in regions.iter().enumerate() {
            if by_id.insert(region.id.clone(), ordinal).is_some() {
                return Err(StoreError::CorruptIndex(format!(
                    "duplicate region id {}",
                    region.id
                )));
            }

            let BinWindow { i, j } = region.window;
            if i >= j {
                return Err(StoreError::CorruptIndex(format!(
                    "region {} has an empty bin window {}",
                    region.id, region.window
                )));
            }
            if j > shape.bins {
                return Err(StoreError::OutOfRange(format!(
                    "region {} window {} exceeds the array's {} bins",
                    region.id, region.window, shape.bins
                )));
            }
            if region.model_order.len() > shape.model_capacity {
                return Err(StoreError::CorruptIndex(format!(
                    "region {} lists {} models but the array holds {}",
                    region.id,
                    region.model_order.len(),
                    shape.model_capacity
                )));
            }
            claimed.push((region.window, ordinal));

            intervals
                .entry(region.chromosome.clone())
                .or_default()
                .push(Interval {
                    start: region.start,
                    end: region.end,
                    val: ordinal,
                });
        }

        // bin windows must not share bins
        claimed.sort_by_key(|(w, _)| w.i);
        for pair in claimed.windows(2) {
            let (prev, prev_ordinal) = pair[0];
            let (next, next_ordinal) = pair[1];
            if next.i < prev.j {
                return Err(StoreError::CorruptIndex(format!(
                    "regions {} and {} share bins ({} and {})",
                    regions[prev_ordinal].id, regions[next_ordinal].id, prev, next
                )));
            }
        }

        let by_chrom = intervals
            .into_iter()
            .map(|(chrom, intervals)| (chrom, Bits::build(intervals)))
            .collect();

        Ok(RegionIndex {
            regions,
            by_id,
            by_chrom,
        })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[RegionRecord] {
        &self.regions
    }

    pub fn region(&self, region_id: &str) -> StoreResult<&RegionRecord> {
        self.by_id
            .get(region_id)
            .map(|&ordinal| &self.regions[ordinal])
            .ok_or_else(|| StoreError::RegionNotFound(region_id.to_string()))
    }

    ///
    /// Distinct chromosome names, sorted for stable output.
    ///
    pub fn list_chromosomes(&self) -> BTreeSet<&str> {
        self.by_chrom.keys().map(String::as_str).collect()
    }

    ///
    /// Ids of every region on `chromosome` with `region.start < end` and
    /// `region.end > start`, in navigation order.
    ///
    /// A region that only abuts the query (`region.end == start` or
    /// `region.start == end`) is excluded.
    ///
    pub fn find_regions(&self, chromosome: &str, start: u32, end: u32) -> StoreResult<Vec<&str>> {
        if start > end {
            return Err(StoreError::InvalidArgument(format!(
                "interval start {start} is after end {end}"
            )));
        }

        let Some(bits) = self.by_chrom.get(chromosome) else {
            return Ok(Vec::new());
        };

        // hits come back in start order
        let mut ordinals: Vec<usize> = bits.find_iter(start, end).map(|iv| iv.val).collect();
        ordinals.sort_unstable();

        Ok(ordinals
            .into_iter()
            .map(|ordinal| self.regions[ordinal].id.as_str())
            .collect())
    }

    pub fn region_window(&self, region_id: &str) -> StoreResult<BinWindow> {
        Ok(self.region(region_id)?.window)
    }

    pub fn region_model_order(&self, region_id: &str) -> StoreResult<&[ModelOrderEntry]> {
        Ok(&self.region(region_id)?.model_order)
    }

    ///
    /// Region ids in ingestion order; the basis for previous/next links.
    ///
    pub fn region_navigation_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.regions.iter().map(|r| r.id.as_str())
    }

    ///
    /// Position of `region_id` within the navigation order.
    ///
    pub fn navigation_position(&self, region_id: &str) -> Option<usize> {
        self.by_id.get(region_id).copied()
    }
}
