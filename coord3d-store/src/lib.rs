//! Read-only store and query engine for ensembles of 3D genome structure models.
//!
//! A [`CoordStore`] points at a root directory of datasets. Opening a
//! [`Dataset`] scans its resolution partitions; opening a resolution gives a
//! [`ResolutionHandle`], which binds the resolution's region index to its
//! coordinate array and answers every query.
//!
//! ## Features
//!
//! - **Interval search**: strict half-open overlap lookup of regions by chromosome
//! - **Zero-copy slicing**: coordinate arrays are memory-mapped `.npy` files
//! - **Thread-safe**: handles are `Send + Sync` and cheap to clone
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ndarray::Array3;
//! use coord3d_core::models::{BinWindow, DatasetId, RegionRecord};
//! use coord3d_store::backend::InMemoryCoords;
//! use coord3d_store::layout::ResolutionIndexFile;
//! use coord3d_store::{Dataset, ModelSelection, PageRequest, ResolutionHandle};
//!
//! let coords = InMemoryCoords::new(Array3::<i32>::zeros((500, 4, 3))).unwrap();
//! let index = ResolutionIndexFile {
//!     regions: vec![RegionRecord {
//!         id: "87".to_string(),
//!         chromosome: "chr2".to_string(),
//!         start: 500_000,
//!         end: 600_000,
//!         window: BinWindow { i: 0, j: 500 },
//!         model_order: vec![(7, 0).into(), (42, 0).into()],
//!         clusters: vec![vec![7, 42]],
//!         centroids: vec![7],
//!         dependencies: None,
//!     }],
//!     ..Default::default()
//! };
//! let handle = ResolutionHandle::from_parts(2000, index, Arc::new(coords)).unwrap();
//! let dataset = Dataset::in_memory(DatasetId::new("lab", "fly").unwrap(), vec![handle]).unwrap();
//!
//! let res = dataset.open_resolution(2000).unwrap();
//! assert_eq!(res.find_regions("chr2", 10_000, 2_000_000).unwrap(), vec!["87"]);
//!
//! let page = res
//!     .retrieve_models("87", &ModelSelection::Ids(vec![42]), PageRequest::new(0, 10).unwrap())
//!     .unwrap();
//! assert_eq!(page.models[0].coordinates.len(), 500 * 3);
//! ```
//!
pub mod backend;
pub mod catalog;
pub mod config;
pub mod index;
pub mod layout;
pub mod pagination;
pub mod params;
pub mod query;
pub mod responses;
pub mod service;

pub use self::catalog::{CoordStore, Dataset, ResolutionCatalog, ResolutionHandle};
pub use self::config::{BackendKind, StoreConfig};
pub use self::pagination::{PageRequest, PaginationInfo};
pub use self::query::{ModelPage, ModelSelection, RegionNavigation};
pub use self::responses::QueryResponse;
