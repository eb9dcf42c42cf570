pub mod dataset;
pub mod metadata;
pub mod region;

// re-export for cleaner imports
pub use self::dataset::DatasetId;
pub use self::metadata::{MetadataBundle, Provenance};
pub use self::region::{BinWindow, ModelOrderEntry, RegionRecord};
