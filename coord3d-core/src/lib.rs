//! # coord3d-core
//!
//! Shared building blocks for storing and serving ensembles of 3D structural
//! models of genomic regions.
//!
//! A dataset holds one partition per resolution. Each partition is a list of
//! [`models::RegionRecord`]s (where a region sits on the genome, which bins
//! of the coordinate array hold it, which model occupies which row) plus one
//! [`models::MetadataBundle`] describing the experiment.
//!
//! The query engine and the coordinate array backends live in
//! `coord3d-store`; this crate only defines the types they agree on and the
//! [`errors::StoreError`] every operation reports.
//!
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::{ErrorKind, StoreError, StoreResult};
