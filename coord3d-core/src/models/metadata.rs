use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

///
/// Descriptive attributes of the experiment a resolution was modelled from.
/// Every field is optional on disk and defaults to an empty string.
///
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Provenance {
    pub title: String,
    pub experiment_type: String,
    pub species: String,
    pub project: String,
    pub identifier: String,
    pub assembly: String,
    pub cell_type: String,
    pub resolution: String,
    pub datatype: String,
    pub components: String,
    pub source: String,
}

///
/// Read-only metadata attached to one resolution and carried into every
/// model retrieval response.
///
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataBundle {
    pub provenance: Provenance,

    /// Free-form metadata from the modelling tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tadbit_meta: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub restraints: Option<Value>,

    /// Provenance of the interaction (Hi-C) data, when there was any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hic_data: Option<Value>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl MetadataBundle {
    pub fn tadbit_meta_or_default(&self) -> Value {
        self.tadbit_meta.clone().unwrap_or_else(empty_object)
    }

    ///
    /// Dependencies for a region: the region's own blob wins over the
    /// resolution-wide one; absent everywhere renders as `[]`.
    ///
    pub fn dependencies_for(&self, region_override: Option<&Value>) -> Value {
        region_override
            .or(self.dependencies.as_ref())
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()))
    }

    pub fn restraints_or_default(&self) -> Value {
        self.restraints.clone().unwrap_or_else(empty_object)
    }

    pub fn hic_data_or_default(&self) -> Value {
        self.hic_data.clone().unwrap_or_else(empty_object)
    }
}
