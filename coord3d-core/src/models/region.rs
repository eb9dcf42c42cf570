use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

///
/// Half-open bin range `[i, j)` into a resolution's coordinate array.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BinWindow {
    pub i: usize,
    pub j: usize,
}

impl BinWindow {
    ///
    /// Number of bins covered by the window
    ///
    pub fn width(&self) -> usize {
        self.j.saturating_sub(self.i)
    }

    pub fn is_empty(&self) -> bool {
        self.j <= self.i
    }
}

impl Display for BinWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.i, self.j)
    }
}

///
/// One row of a region's model-order table. Serialized as a
/// `[model_id, cluster_id]` pair.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct ModelOrderEntry {
    pub model_id: i64,
    pub cluster_id: i64,
}

impl From<(i64, i64)> for ModelOrderEntry {
    fn from((model_id, cluster_id): (i64, i64)) -> Self {
        ModelOrderEntry {
            model_id,
            cluster_id,
        }
    }
}

impl From<ModelOrderEntry> for (i64, i64) {
    fn from(entry: ModelOrderEntry) -> Self {
        (entry.model_id, entry.cluster_id)
    }
}

///
/// A modelled genomic region at one resolution: where it sits on the genome,
/// which bins of the coordinate array hold it, and which model lives in
/// which row.
///
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: String,
    pub chromosome: String,
    pub start: u32,
    pub end: u32,

    #[serde(flatten)]
    pub window: BinWindow,

    /// (model_id, cluster_id) per row, row 0 first
    #[serde(rename = "models", default)]
    pub model_order: Vec<ModelOrderEntry>,

    #[serde(default)]
    pub clusters: Vec<Vec<i64>>,

    #[serde(default)]
    pub centroids: Vec<i64>,

    /// Region-level dependency blob; overrides the resolution-level one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,
}

impl RegionRecord {
    ///
    /// Genomic width of the region
    ///
    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    ///
    /// Strict half-open overlap test against `[start, end)`. A region that
    /// only touches the query boundary does not overlap.
    ///
    pub fn overlaps(&self, chromosome: &str, start: u32, end: u32) -> bool {
        self.chromosome == chromosome && self.start < end && self.end > start
    }
}

impl Display for RegionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}:{}-{}\tbins {}",
            self.id, self.chromosome, self.start, self.end, self.window
        )
    }
}
