//! Read operations over an opened [`ResolutionHandle`].
use std::str::FromStr;

use log::debug;
use ndarray::s;
use serde::Serialize;
use serde_json::Value;

use coord3d_core::models::{ModelOrderEntry, Provenance, RegionRecord};
use coord3d_core::{StoreError, StoreResult};

use crate::backend::{CoordinateBackend, flatten_coords};
use crate::catalog::ResolutionHandle;
use crate::pagination::{PageRequest, PaginationInfo};

///
/// Which models of a region to retrieve.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ModelSelection {
    /// Every model in the region's model-order table, in row order.
    All,
    /// These ids, in this order.
    Ids(Vec<i64>),
}

impl FromStr for ModelSelection {
    type Err = StoreError;

    /// Parse `all` or a comma-separated list of integer ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(ModelSelection::All);
        }

        let ids = s
            .split(',')
            .map(|part| {
                part.trim().parse::<i64>().map_err(|_| {
                    StoreError::InvalidArgument(format!("model id is not an integer: {part}"))
                })
            })
            .collect::<StoreResult<Vec<i64>>>()?;
        Ok(ModelSelection::Ids(ids))
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ModelCoordinates {
    pub model_id: i64,
    /// `x0, y0, z0, x1, ...` as decimal strings
    pub coordinates: Vec<String>,
}

///
/// The `object` record of a model response: provenance plus where the
/// region sits on the genome.
///
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ObjectData {
    #[serde(flatten)]
    pub provenance: Provenance,
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    #[serde(rename = "chromStart")]
    pub chrom_start: Vec<u32>,
    #[serde(rename = "chromEnd")]
    pub chrom_end: Vec<u32>,
    pub dependencies: Value,
    pub uuid: String,
}

///
/// Everything attached once per model response rather than per model.
///
#[derive(PartialEq, Debug, Clone)]
pub struct RegionMetadata {
    pub tadbit_meta: Value,
    pub object: ObjectData,
    pub clusters: Vec<Vec<i64>>,
    pub centroids: Vec<i64>,
    pub restraints: Value,
    pub hic_data: Value,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ModelPage {
    pub models: Vec<ModelCoordinates>,
    pub pagination: PaginationInfo,
    pub metadata: RegionMetadata,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RegionNavigation {
    pub previous_region_id: Option<String>,
    pub next_region_id: Option<String>,
}

///
/// Row of `model_id` in the region's model-order table: the first entry
/// whose model id matches.
///
fn resolve_row(region: &RegionRecord, model_id: i64) -> StoreResult<usize> {
    region
        .model_order
        .iter()
        .position(|entry| entry.model_id == model_id)
        .ok_or_else(|| StoreError::ModelNotFound {
            region_id: region.id.clone(),
            model_id,
        })
}

impl ResolutionHandle {
    pub fn list_chromosomes(&self) -> Vec<String> {
        self.index()
            .list_chromosomes()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn find_regions(&self, chromosome: &str, start: u32, end: u32) -> StoreResult<Vec<String>> {
        let found = self.index().find_regions(chromosome, start, end)?;
        debug!(
            "find_regions {chromosome}:{start}-{end} at {} -> {} region(s)",
            self.resolution(),
            found.len()
        );
        Ok(found.into_iter().map(str::to_string).collect())
    }

    pub fn list_models(&self, region_id: &str) -> StoreResult<&[ModelOrderEntry]> {
        self.index().region_model_order(region_id)
    }

    pub fn resolve_model_row(&self, region_id: &str, model_id: i64) -> StoreResult<usize> {
        resolve_row(self.index().region(region_id)?, model_id)
    }

    ///
    /// Coordinates for one page of the selected models, plus the region's
    /// metadata. Any selected id missing from the region fails the call.
    ///
    pub fn retrieve_models(
        &self,
        region_id: &str,
        selection: &ModelSelection,
        page: PageRequest,
    ) -> StoreResult<ModelPage> {
        let region = self.index().region(region_id)?;

        let model_ids: Vec<i64> = match selection {
            ModelSelection::All => region.model_order.iter().map(|e| e.model_id).collect(),
            ModelSelection::Ids(ids) => ids.clone(),
        };
        if model_ids.is_empty() {
            return Err(StoreError::InvalidArgument(format!(
                "no models selected in region {region_id}"
            )));
        }

        let rows = model_ids
            .iter()
            .map(|&id| resolve_row(region, id))
            .collect::<StoreResult<Vec<usize>>>()?;

        let bounds = page.bounds(model_ids.len());
        debug!(
            "retrieve_models region {region_id} at {}: {} model(s), page {} x {} -> {:?}",
            self.resolution(),
            model_ids.len(),
            page.page,
            page.page_size,
            bounds
        );

        let models = self.read_models(region, &model_ids[bounds.clone()], &rows[bounds])?;

        Ok(ModelPage {
            models,
            pagination: PaginationInfo::new(model_ids.len(), page),
            metadata: self.region_metadata(region),
        })
    }

    fn read_models(
        &self,
        region: &RegionRecord,
        model_ids: &[i64],
        rows: &[usize],
    ) -> StoreResult<Vec<ModelCoordinates>> {
        let (i, j) = (region.window.i, region.window.j);
        let coords = self.coords();

        if model_ids.len() > 1 {
            let block = coords.slice_region(i, j)?;
            let shape = coords.shape();
            return model_ids
                .iter()
                .zip(rows)
                .map(|(&model_id, &row)| {
                    shape.check_window(i, j, Some(row))?;
                    Ok(ModelCoordinates {
                        model_id,
                        coordinates: flatten_coords(&block.slice(s![.., row, ..])),
                    })
                })
                .collect();
        }

        model_ids
            .iter()
            .zip(rows)
            .map(|(&model_id, &row)| {
                Ok(ModelCoordinates {
                    model_id,
                    coordinates: flatten_coords(&coords.slice_models(i, j, row)?),
                })
            })
            .collect()
    }

    fn region_metadata(&self, region: &RegionRecord) -> RegionMetadata {
        let bundle = self.metadata();
        RegionMetadata {
            tadbit_meta: bundle.tadbit_meta_or_default(),
            object: ObjectData {
                provenance: bundle.provenance.clone(),
                chrom: region.chromosome.clone(),
                start: region.start,
                end: region.end,
                chrom_start: vec![region.start],
                chrom_end: vec![region.end],
                dependencies: bundle.dependencies_for(region.dependencies.as_ref()),
                uuid: region.id.clone(),
            },
            clusters: region.clusters.clone(),
            centroids: region.centroids.clone(),
            restraints: bundle.restraints_or_default(),
            hic_data: bundle.hic_data_or_default(),
        }
    }

    ///
    /// Neighbours of `region_id` in navigation order. Either side is `None`
    /// at the ends.
    ///
    pub fn region_navigation(&self, region_id: &str) -> StoreResult<RegionNavigation> {
        let index = self.index();
        let position = index
            .navigation_position(region_id)
            .ok_or_else(|| StoreError::RegionNotFound(region_id.to_string()))?;
        let regions = index.regions();

        Ok(RegionNavigation {
            previous_region_id: position
                .checked_sub(1)
                .map(|p| regions[p].id.clone()),
            next_region_id: regions.get(position + 1).map(|r| r.id.clone()),
        })
    }
}
