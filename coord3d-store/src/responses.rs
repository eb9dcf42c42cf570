//! Fixed-shape records returned to callers, one per endpoint.
use serde::Serialize;
use serde_json::Value;

use coord3d_core::models::ModelOrderEntry;

use crate::query::{ModelPage, ObjectData, RegionNavigation};

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ResolutionEntry {
    pub resolution: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ResolutionsResponse {
    pub resolutions: Vec<ResolutionEntry>,
}

impl From<Vec<u32>> for ResolutionsResponse {
    fn from(resolutions: Vec<u32>) -> Self {
        ResolutionsResponse {
            resolutions: resolutions
                .into_iter()
                .map(|resolution| ResolutionEntry { resolution })
                .collect(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ChromosomesResponse {
    pub resolution: u32,
    pub chromosomes: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct RegionEntry {
    pub region_id: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct RegionsResponse {
    pub resolution: u32,
    pub chromosome: String,
    pub regions: Vec<RegionEntry>,
}

impl RegionsResponse {
    pub fn new(resolution: u32, chromosome: &str, region_ids: Vec<String>) -> Self {
        RegionsResponse {
            resolution,
            chromosome: chromosome.to_string(),
            regions: region_ids
                .into_iter()
                .map(|region_id| RegionEntry { region_id })
                .collect(),
        }
    }
}

/// Model and cluster ids are rendered as strings.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ModelListEntry {
    pub model: String,
    pub cluster: String,
}

impl From<&ModelOrderEntry> for ModelListEntry {
    fn from(entry: &ModelOrderEntry) -> Self {
        ModelListEntry {
            model: entry.model_id.to_string(),
            cluster: entry.cluster_id.to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub model_list: Vec<ModelListEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_region: Option<String>,
}

impl ModelsResponse {
    pub fn new(model_order: &[ModelOrderEntry], navigation: RegionNavigation) -> Self {
        ModelsResponse {
            model_list: model_order.iter().map(ModelListEntry::from).collect(),
            next_region: navigation.next_region_id,
            previous_region: navigation.previous_region_id,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ModelData {
    #[serde(rename = "ref")]
    pub reference: String,
    pub data: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
pub struct QueryData {
    pub model_count: usize,
    pub page_count: usize,
    /// one-based, as requested
    pub page: usize,
    pub mpp: usize,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ModelResponse {
    pub metadata: Value,
    pub object: ObjectData,
    pub models: Vec<ModelData>,
    pub clusters: Vec<Vec<i64>>,
    pub centroids: Vec<i64>,
    pub restraints: Value,
    pub hic_data: Value,
    pub query_data: QueryData,
}

impl From<ModelPage> for ModelResponse {
    fn from(page: ModelPage) -> Self {
        let ModelPage {
            models,
            pagination,
            metadata,
        } = page;

        ModelResponse {
            metadata: metadata.tadbit_meta,
            object: metadata.object,
            models: models
                .into_iter()
                .map(|m| ModelData {
                    reference: m.model_id.to_string(),
                    data: m.coordinates,
                })
                .collect(),
            clusters: metadata.clusters,
            centroids: metadata.centroids,
            restraints: metadata.restraints,
            hic_data: metadata.hic_data,
            query_data: QueryData {
                model_count: pagination.model_count,
                page_count: pagination.page_count,
                page: pagination.page.saturating_add(1),
                mpp: pagination.page_size,
            },
        }
    }
}

///
/// A response for any endpoint. Serializes as the bare record of its variant.
///
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Resolutions(ResolutionsResponse),
    Chromosomes(ChromosomesResponse),
    Regions(RegionsResponse),
    Models(ModelsResponse),
    Model(Box<ModelResponse>),
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_models_response_omits_missing_neighbours() {
        let order: Vec<ModelOrderEntry> = vec![(3, 0).into(), (8, 1).into()];
        let response = ModelsResponse::new(
            &order,
            RegionNavigation {
                previous_region_id: None,
                next_region_id: Some("88".to_string()),
            },
        );

        let value = serde_json::to_value(QueryResponse::Models(response)).unwrap();
        assert_eq!(
            value,
            json!({
                "model_list": [
                    {"model": "3", "cluster": "0"},
                    {"model": "8", "cluster": "1"}
                ],
                "next_region": "88"
            })
        );
    }

    #[rstest]
    fn test_regions_response_shape() {
        let response = RegionsResponse::new(2000, "chr2", vec!["87".to_string()]);
        let value = serde_json::to_value(QueryResponse::Regions(response)).unwrap();
        assert_eq!(
            value,
            json!({"resolution": 2000, "chromosome": "chr2", "regions": [{"region_id": "87"}]})
        );
    }

    #[rstest]
    fn test_resolutions_response_shape() {
        let value = serde_json::to_value(ResolutionsResponse::from(vec![2000, 5000])).unwrap();
        assert_eq!(
            value,
            json!({"resolutions": [{"resolution": 2000}, {"resolution": 5000}]})
        );
    }
}
