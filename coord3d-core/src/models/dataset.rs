use std::fmt::{self, Display};
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::StoreError;

///
/// Identifies one published dataset: the owning identity plus the dataset's
/// own identifier. Both parts must be non-empty.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct DatasetId {
    pub owner: String,
    pub dataset_id: String,
}

impl DatasetId {
    pub fn new(owner: &str, dataset_id: &str) -> Result<Self, StoreError> {
        for (name, part) in [("owner", owner), ("dataset_id", dataset_id)] {
            if part.is_empty() {
                return Err(StoreError::InvalidArgument(format!("{name} must not be empty")));
            }
            // dataset ids become path components on disk
            if part == "." || part == ".." || part.contains(['/', '\\']) {
                return Err(StoreError::InvalidArgument(format!(
                    "{name} is not a valid identifier: {part}"
                )));
            }
        }

        Ok(DatasetId {
            owner: owner.to_string(),
            dataset_id: dataset_id.to_string(),
        })
    }

    ///
    /// Location of the dataset relative to a store root.
    ///
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.owner).join(&self.dataset_id)
    }
}

impl FromStr for DatasetId {
    type Err = StoreError;

    /// Parse `owner/dataset_id`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, dataset_id)) => DatasetId::new(owner, dataset_id),
            None => Err(StoreError::InvalidArgument(format!(
                "Dataset must be given as owner/dataset_id, got: {s}"
            ))),
        }
    }
}

impl Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.dataset_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_parse_dataset_id() {
        let id: DatasetId = "embl/tadbit_chr2".parse().unwrap();
        assert_eq!(id.owner, "embl");
        assert_eq!(id.dataset_id, "tadbit_chr2");
        assert_eq!(id.to_string(), "embl/tadbit_chr2");
        assert_eq!(id.relative_path(), PathBuf::from("embl").join("tadbit_chr2"));
    }

    #[rstest]
    #[case("no_separator")]
    #[case("/missing_owner")]
    #[case("missing_dataset/")]
    #[case("a/b/c")]
    #[case("../etc")]
    fn test_reject_bad_dataset_ids(#[case] raw: &str) {
        assert!(raw.parse::<DatasetId>().is_err());
    }
}
