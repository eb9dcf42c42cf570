use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;

use coord3d_core::models::DatasetId;
use coord3d_store::CoordStore;
use coord3d_store::params::{Endpoint, from_params};
use coord3d_store::service::execute;

use super::cli::PARAM_ARGS;

fn collect_params(dataset: &DatasetId, matches: &ArgMatches) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    params.insert("file_id".to_string(), dataset.dataset_id.clone());

    for name in PARAM_ARGS {
        // not every endpoint defines every argument
        if let Ok(Some(value)) = matches.try_get_one::<String>(name) {
            params.insert(name.to_string(), value.clone());
        }
    }
    params
}

pub fn run_query(matches: &ArgMatches, store: &CoordStore) -> Result<()> {
    let (name, matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("A query endpoint is required"))?;
    let endpoint: Endpoint = name.parse()?;

    let dataset: DatasetId = matches
        .get_one::<String>("dataset")
        .context("--dataset is required")?
        .parse()?;
    let params = collect_params(&dataset, matches);

    let request = match from_params(endpoint, Some(&dataset.owner), &params, store.config()) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.usage())?);
            return Err(anyhow!("{e} (status {})", e.status_code()));
        }
    };

    let response = execute(store, &request)
        .map_err(|e| anyhow!("{e} (status {})", e.status_code()))?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
