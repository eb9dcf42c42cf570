//! Turning raw string parameters into typed requests.
//!
//! Each endpoint has a fixed list of required parameters. Supplying none of
//! them asks for the usage text; supplying only some is an error.
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde_json::{Map, Value, json};
use thiserror::Error;

use coord3d_core::models::DatasetId;
use coord3d_core::{StoreError, StoreResult};

use crate::config::StoreConfig;
use crate::pagination::PageRequest;
use crate::query::ModelSelection;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Endpoint {
    Resolutions,
    Chromosomes,
    Regions,
    Models,
    Model,
}

/// (name, label, type)
type ParamSpec = (&'static str, &'static str, &'static str);

const FILE_ID: ParamSpec = ("file_id", "File ID", "str");
const RES: ParamSpec = ("res", "Resolution", "int");
const CHROM: ParamSpec = ("chrom", "Chromosome", "str");
const START: ParamSpec = ("start", "Start", "int");
const END: ParamSpec = ("end", "End", "int");
const REGION: ParamSpec = ("region", "Region ID", "str");
const MODEL: ParamSpec = ("model", "Model ID(s), comma separated, or 'all'", "str");
const PAGE: ParamSpec = ("page", "Page number (default: 1)", "int");
const MPP: ParamSpec = ("mpp", "Models per page", "int");

impl Endpoint {
    pub fn required(&self) -> &'static [ParamSpec] {
        match self {
            Endpoint::Resolutions => &[FILE_ID],
            Endpoint::Chromosomes => &[FILE_ID, RES],
            Endpoint::Regions => &[FILE_ID, RES, CHROM, START, END],
            Endpoint::Models => &[FILE_ID, RES, REGION],
            Endpoint::Model => &[FILE_ID, RES, REGION, MODEL],
        }
    }

    pub fn optional(&self) -> &'static [ParamSpec] {
        match self {
            Endpoint::Model => &[PAGE, MPP],
            _ => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Resolutions => "resolutions",
            Endpoint::Chromosomes => "chromosomes",
            Endpoint::Regions => "regions",
            Endpoint::Models => "models",
            Endpoint::Model => "model",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Endpoint {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resolutions" => Ok(Endpoint::Resolutions),
            "chromosomes" => Ok(Endpoint::Chromosomes),
            "regions" => Ok(Endpoint::Regions),
            "models" => Ok(Endpoint::Models),
            "model" => Ok(Endpoint::Model),
            _ => Err(StoreError::InvalidArgument(format!("Unknown endpoint: {s}"))),
        }
    }
}

#[derive(Error, Debug)]
pub enum ParamError {
    #[error("No parameters given for {0}")]
    Usage(Endpoint),

    #[error("MissingParameters: {endpoint} requires {missing:?}")]
    MissingParameters {
        endpoint: Endpoint,
        missing: Vec<&'static str>,
    },

    #[error("IncorrectParameterType: {name} must be an integer, got {value:?}")]
    IncorrectParameterType {
        endpoint: Endpoint,
        name: &'static str,
        value: String,
    },

    #[error("Forbidden")]
    Forbidden(Endpoint),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ParamError {
    pub fn status_code(&self) -> u16 {
        match self {
            ParamError::Usage(_) => 200,
            ParamError::MissingParameters { .. } | ParamError::IncorrectParameterType { .. } => {
                400
            }
            ParamError::Forbidden(_) => 403,
            ParamError::Store(e) => e.status_code(),
        }
    }

    fn endpoint(&self) -> Option<Endpoint> {
        match self {
            ParamError::Usage(endpoint)
            | ParamError::MissingParameters { endpoint, .. }
            | ParamError::IncorrectParameterType { endpoint, .. }
            | ParamError::Forbidden(endpoint) => Some(*endpoint),
            ParamError::Store(_) => None,
        }
    }

    ///
    /// JSON body describing the endpoint's parameters, with an `error`
    /// field unless this is a plain usage request.
    ///
    pub fn usage(&self) -> Value {
        let mut parameters = Map::new();
        if let Some(endpoint) = self.endpoint() {
            let required = endpoint.required().iter().map(|p| (p, "REQUIRED"));
            let optional = endpoint.optional().iter().map(|p| (p, "OPTIONAL"));
            for ((name, label, kind), need) in required.chain(optional) {
                parameters.insert(name.to_string(), json!([label, kind, need]));
            }
        }

        let mut body = json!({
            "usage": { "parameters": parameters },
            "status_code": self.status_code(),
        });
        if !matches!(self, ParamError::Usage(_)) {
            body["error"] = Value::String(self.to_string());
        }
        body
    }
}

pub type ParamResult<T> = std::result::Result<T, ParamError>;

///
/// A fully validated request for one endpoint.
///
#[derive(PartialEq, Debug, Clone)]
pub enum Request {
    Resolutions {
        dataset: DatasetId,
    },
    Chromosomes {
        dataset: DatasetId,
        resolution: u32,
    },
    Regions {
        dataset: DatasetId,
        resolution: u32,
        chromosome: String,
        start: u32,
        end: u32,
    },
    Models {
        dataset: DatasetId,
        resolution: u32,
        region_id: String,
    },
    Model {
        dataset: DatasetId,
        resolution: u32,
        region_id: String,
        selection: ModelSelection,
        page: PageRequest,
    },
}

impl Request {
    pub fn dataset(&self) -> &DatasetId {
        match self {
            Request::Resolutions { dataset }
            | Request::Chromosomes { dataset, .. }
            | Request::Regions { dataset, .. }
            | Request::Models { dataset, .. }
            | Request::Model { dataset, .. } => dataset,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Request::Resolutions { .. } => Endpoint::Resolutions,
            Request::Chromosomes { .. } => Endpoint::Chromosomes,
            Request::Regions { .. } => Endpoint::Regions,
            Request::Models { .. } => Endpoint::Models,
            Request::Model { .. } => Endpoint::Model,
        }
    }
}

struct Params<'a> {
    endpoint: Endpoint,
    values: &'a BTreeMap<String, String>,
}

impl Params<'_> {
    fn str(&self, spec: ParamSpec) -> &str {
        // presence of required parameters is checked up front
        self.values.get(spec.0).map(String::as_str).unwrap_or_default()
    }

    ///
    /// Parse an integer parameter. Text that is not an integer is a type
    /// error; an integer outside `T`'s range, such as a negative resolution,
    /// is an invalid argument.
    ///
    fn int<T: TryFrom<i64>>(&self, spec: ParamSpec) -> ParamResult<T> {
        let value = self.str(spec);
        let parsed: i64 =
            value
                .trim()
                .parse()
                .map_err(|_| ParamError::IncorrectParameterType {
                    endpoint: self.endpoint,
                    name: spec.0,
                    value: value.to_string(),
                })?;
        T::try_from(parsed).map_err(|_| {
            StoreError::InvalidArgument(format!("{} is out of range: {parsed}", spec.0)).into()
        })
    }

    fn optional_int(&self, spec: ParamSpec) -> ParamResult<Option<i64>> {
        match self.values.get(spec.0) {
            Some(_) => self.int::<i64>(spec).map(Some),
            None => Ok(None),
        }
    }
}

///
/// Clamp a requested page size into `[.., max_page_size]`. Sizes below 1
/// are rejected.
///
pub fn page_size(requested: Option<i64>, config: &StoreConfig) -> StoreResult<usize> {
    let Some(mpp) = requested else {
        return Ok(config.default_page_size);
    };
    if mpp < 1 {
        return Err(StoreError::InvalidPage(mpp));
    }
    Ok(usize::try_from(mpp)
        .unwrap_or(usize::MAX)
        .min(config.max_page_size))
}

///
/// Validate raw parameters for `endpoint`. `identity` is the caller's
/// authenticated owner name; it also selects the owner half of the dataset
/// id.
///
pub fn from_params(
    endpoint: Endpoint,
    identity: Option<&str>,
    values: &BTreeMap<String, String>,
    config: &StoreConfig,
) -> ParamResult<Request> {
    let Some(owner) = identity else {
        return Err(ParamError::Forbidden(endpoint));
    };

    let required = endpoint.required();
    let missing: Vec<&'static str> = required
        .iter()
        .map(|spec| spec.0)
        .filter(|name| !values.contains_key(*name))
        .collect();
    if missing.len() == required.len() {
        return Err(ParamError::Usage(endpoint));
    }
    if !missing.is_empty() {
        return Err(ParamError::MissingParameters { endpoint, missing });
    }

    let params = Params { endpoint, values };
    let dataset = DatasetId::new(owner, params.str(FILE_ID))?;

    let request = match endpoint {
        Endpoint::Resolutions => Request::Resolutions { dataset },
        Endpoint::Chromosomes => Request::Chromosomes {
            dataset,
            resolution: params.int(RES)?,
        },
        Endpoint::Regions => Request::Regions {
            dataset,
            resolution: params.int(RES)?,
            chromosome: params.str(CHROM).to_string(),
            start: params.int(START)?,
            end: params.int(END)?,
        },
        Endpoint::Models => Request::Models {
            dataset,
            resolution: params.int(RES)?,
            region_id: params.str(REGION).to_string(),
        },
        Endpoint::Model => {
            let resolution = params.int(RES)?;
            let selection = params.str(MODEL).parse::<ModelSelection>().map_err(|_| {
                ParamError::IncorrectParameterType {
                    endpoint,
                    name: MODEL.0,
                    value: params.str(MODEL).to_string(),
                }
            })?;
            let page_number = params.optional_int(PAGE)?.unwrap_or(1);
            let mpp = page_size(params.optional_int(MPP)?, config)?;

            Request::Model {
                dataset,
                resolution,
                region_id: params.str(REGION).to_string(),
                selection,
                page: PageRequest::from_one_based(page_number, mpp)?,
            }
        }
    };

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[fixture]
    fn config() -> StoreConfig {
        StoreConfig::default()
    }

    #[rstest]
    fn test_no_parameters_is_usage(config: StoreConfig) {
        let err = from_params(Endpoint::Regions, Some("lab"), &params(&[]), &config).unwrap_err();
        assert_eq!(err.status_code(), 200);
        let body = err.usage();
        assert_eq!(body["usage"]["parameters"]["chrom"][2], "REQUIRED");
        assert!(body.get("error").is_none());
    }

    #[rstest]
    fn test_missing_some_parameters(config: StoreConfig) {
        let err = from_params(
            Endpoint::Regions,
            Some("lab"),
            &params(&[("file_id", "fly"), ("res", "2000")]),
            &config,
        )
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
        match err {
            ParamError::MissingParameters { missing, .. } => {
                assert_eq!(missing, vec!["chrom", "start", "end"])
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[rstest]
    #[case(&[("file_id", "fly"), ("res", "2k")], "res")]
    #[case(&[("file_id", "fly"), ("res", "1.5")], "res")]
    fn test_non_integer_parameter(
        config: StoreConfig,
        #[case] pairs: &[(&str, &str)],
        #[case] name: &str,
    ) {
        let err = from_params(Endpoint::Chromosomes, Some("lab"), &params(pairs), &config)
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(matches!(err, ParamError::IncorrectParameterType { name: n, .. } if n == name));
    }

    #[rstest]
    #[case(Endpoint::Chromosomes, &[("file_id", "fly"), ("res", "-1")], "res")]
    #[case(
        Endpoint::Regions,
        &[("file_id", "fly"), ("res", "2000"), ("chrom", "chr2"), ("start", "-5"), ("end", "10")],
        "start"
    )]
    #[case(
        Endpoint::Regions,
        &[("file_id", "fly"), ("res", "2000"), ("chrom", "chr2"), ("start", "0"), ("end", "4294967296")],
        "end"
    )]
    fn test_out_of_range_integer(
        config: StoreConfig,
        #[case] endpoint: Endpoint,
        #[case] pairs: &[(&str, &str)],
        #[case] name: &str,
    ) {
        let err = from_params(endpoint, Some("lab"), &params(pairs), &config).unwrap_err();
        assert_eq!(err.status_code(), 400);
        match err {
            ParamError::Store(StoreError::InvalidArgument(msg)) => {
                assert!(msg.starts_with(name), "{msg}")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[rstest]
    fn test_missing_identity_is_forbidden(config: StoreConfig) {
        let err = from_params(
            Endpoint::Resolutions,
            None,
            &params(&[("file_id", "fly")]),
            &config,
        )
        .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.usage()["error"], "Forbidden");
    }

    #[rstest]
    fn test_model_request_defaults(config: StoreConfig) {
        let request = from_params(
            Endpoint::Model,
            Some("lab"),
            &params(&[("file_id", "fly"), ("res", "2000"), ("region", "87"), ("model", "42")]),
            &config,
        )
        .unwrap();

        assert_eq!(
            request,
            Request::Model {
                dataset: DatasetId::new("lab", "fly").unwrap(),
                resolution: 2000,
                region_id: "87".to_string(),
                selection: ModelSelection::Ids(vec![42]),
                page: PageRequest::new(0, 10).unwrap(),
            }
        );
    }

    #[rstest]
    #[case("0", "5", 0, 5)]
    #[case("-4", "5", 0, 5)]
    #[case("3", "500", 2, 100)]
    fn test_page_and_mpp_clamping(
        config: StoreConfig,
        #[case] page: &str,
        #[case] mpp: &str,
        #[case] zero_based: usize,
        #[case] size: usize,
    ) {
        let request = from_params(
            Endpoint::Model,
            Some("lab"),
            &params(&[
                ("file_id", "fly"),
                ("res", "2000"),
                ("region", "87"),
                ("model", "all"),
                ("page", page),
                ("mpp", mpp),
            ]),
            &config,
        )
        .unwrap();

        match request {
            Request::Model { page, .. } => {
                assert_eq!(page.page, zero_based);
                assert_eq!(page.page_size, size);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[rstest]
    fn test_zero_mpp_rejected(config: StoreConfig) {
        let err = from_params(
            Endpoint::Model,
            Some("lab"),
            &params(&[
                ("file_id", "fly"),
                ("res", "2000"),
                ("region", "87"),
                ("model", "1"),
                ("mpp", "0"),
            ]),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, ParamError::Store(StoreError::InvalidPage(0))));
        assert_eq!(err.status_code(), 400);
    }

    #[rstest]
    fn test_negative_mpp_reported(config: StoreConfig) {
        let err = from_params(
            Endpoint::Model,
            Some("lab"),
            &params(&[
                ("file_id", "fly"),
                ("res", "2000"),
                ("region", "87"),
                ("model", "all"),
                ("mpp", "-7"),
            ]),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, ParamError::Store(StoreError::InvalidPage(-7))));
        assert!(err.to_string().contains("-7"), "{err}");
    }

    #[rstest]
    fn test_bad_model_list(config: StoreConfig) {
        let err = from_params(
            Endpoint::Model,
            Some("lab"),
            &params(&[("file_id", "fly"), ("res", "2000"), ("region", "87"), ("model", "1,b")]),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, ParamError::IncorrectParameterType { name: "model", .. }));
    }

    #[rstest]
    fn test_endpoint_names_round_trip() {
        for endpoint in [
            Endpoint::Resolutions,
            Endpoint::Chromosomes,
            Endpoint::Regions,
            Endpoint::Models,
            Endpoint::Model,
        ] {
            assert_eq!(endpoint.name().parse::<Endpoint>().unwrap(), endpoint);
        }
    }
}
