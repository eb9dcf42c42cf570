use log::debug;

use coord3d_core::StoreResult;

use crate::catalog::{CoordStore, Dataset};
use crate::params::Request;
use crate::responses::{ChromosomesResponse, ModelResponse, ModelsResponse, QueryResponse, RegionsResponse};

///
/// Run one request end to end. The dataset is opened for the request and
/// closed again before returning, whether or not the query succeeded.
///
pub fn execute(store: &CoordStore, request: &Request) -> StoreResult<QueryResponse> {
    debug!("{} request for {}", request.endpoint(), request.dataset());

    let mut dataset = store.open_dataset(request.dataset())?;
    let response = dispatch(&dataset, request);
    dataset.close();
    response
}

///
/// Answer `request` against an already opened dataset.
///
pub fn dispatch(dataset: &Dataset, request: &Request) -> StoreResult<QueryResponse> {
    let response = match request {
        Request::Resolutions { .. } => QueryResponse::Resolutions(dataset.list_resolutions()?.into()),
        Request::Chromosomes { resolution, .. } => {
            let handle = dataset.open_resolution(*resolution)?;
            QueryResponse::Chromosomes(ChromosomesResponse {
                resolution: *resolution,
                chromosomes: handle.list_chromosomes(),
            })
        }
        Request::Regions {
            resolution,
            chromosome,
            start,
            end,
            ..
        } => {
            let handle = dataset.open_resolution(*resolution)?;
            let region_ids = handle.find_regions(chromosome, *start, *end)?;
            QueryResponse::Regions(RegionsResponse::new(*resolution, chromosome, region_ids))
        }
        Request::Models {
            resolution,
            region_id,
            ..
        } => {
            let handle = dataset.open_resolution(*resolution)?;
            let model_order = handle.list_models(region_id)?;
            let navigation = handle.region_navigation(region_id)?;
            QueryResponse::Models(ModelsResponse::new(model_order, navigation))
        }
        Request::Model {
            resolution,
            region_id,
            selection,
            page,
            ..
        } => {
            let handle = dataset.open_resolution(*resolution)?;
            let models = handle.retrieve_models(region_id, selection, *page)?;
            QueryResponse::Model(Box::new(ModelResponse::from(models)))
        }
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use ndarray::Array3;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use coord3d_core::models::{BinWindow, DatasetId, MetadataBundle, RegionRecord};
    use coord3d_core::StoreError;

    use crate::backend::InMemoryCoords;
    use crate::catalog::ResolutionHandle;
    use crate::layout::ResolutionIndexFile;
    use crate::pagination::PageRequest;
    use crate::query::ModelSelection;

    fn dataset_id() -> DatasetId {
        DatasetId::new("lab", "fly").unwrap()
    }

    #[fixture]
    fn dataset() -> Dataset {
        let coords = InMemoryCoords::new(Array3::from_shape_fn((6, 2, 3), |(b, r, a)| {
            (b * 100 + r * 10 + a) as i32
        }))
        .unwrap();
        let index_file = ResolutionIndexFile {
            metadata: MetadataBundle::default(),
            regions: vec![
                RegionRecord {
                    id: "1".to_string(),
                    chromosome: "chrX".to_string(),
                    start: 0,
                    end: 300,
                    window: BinWindow { i: 0, j: 3 },
                    model_order: vec![(5, 0).into(), (6, 1).into()],
                    clusters: vec![vec![5], vec![6]],
                    centroids: vec![5, 6],
                    dependencies: None,
                },
                RegionRecord {
                    id: "2".to_string(),
                    chromosome: "chrX".to_string(),
                    start: 300,
                    end: 600,
                    window: BinWindow { i: 3, j: 6 },
                    model_order: vec![(1, 0).into()],
                    clusters: vec![vec![1]],
                    centroids: vec![1],
                    dependencies: None,
                },
            ],
        };
        let handle = ResolutionHandle::from_parts(100, index_file, Arc::new(coords)).unwrap();
        Dataset::in_memory(dataset_id(), vec![handle]).unwrap()
    }

    #[rstest]
    fn test_models_listing(dataset: Dataset) {
        let request = Request::Models {
            dataset: dataset_id(),
            resolution: 100,
            region_id: "1".to_string(),
        };
        let value = serde_json::to_value(dispatch(&dataset, &request).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "model_list": [{"model": "5", "cluster": "0"}, {"model": "6", "cluster": "1"}],
                "next_region": "2"
            })
        );
    }

    #[rstest]
    fn test_model_response_echoes_requested_page(dataset: Dataset) {
        let request = Request::Model {
            dataset: dataset_id(),
            resolution: 100,
            region_id: "1".to_string(),
            selection: ModelSelection::All,
            page: PageRequest::new(1, 1).unwrap(),
        };
        let value = serde_json::to_value(dispatch(&dataset, &request).unwrap()).unwrap();

        assert_eq!(
            value["query_data"],
            json!({"model_count": 2, "page_count": 2, "page": 2, "mpp": 1})
        );
        assert_eq!(value["models"][0]["ref"], "6");
        assert_eq!(value["models"][0]["data"][0], "10");
        assert_eq!(value["object"]["chromStart"], json!([0]));
        assert_eq!(value["object"]["uuid"], "1");
        assert_eq!(value["metadata"], json!({}));
        assert_eq!(value["clusters"], json!([[5], [6]]));
    }

    #[rstest]
    fn test_regions_boundary(dataset: Dataset) {
        let request = Request::Regions {
            dataset: dataset_id(),
            resolution: 100,
            chromosome: "chrX".to_string(),
            start: 300,
            end: 301,
        };
        let value = serde_json::to_value(dispatch(&dataset, &request).unwrap()).unwrap();
        assert_eq!(value["regions"], json!([{"region_id": "2"}]));
    }

    #[rstest]
    fn test_unknown_resolution(dataset: Dataset) {
        let request = Request::Chromosomes {
            dataset: dataset_id(),
            resolution: 7,
        };
        let err = dispatch(&dataset, &request).unwrap_err();
        assert!(matches!(err, StoreError::ResolutionNotFound(7)));
        assert_eq!(err.status_code(), 404);
    }
}
