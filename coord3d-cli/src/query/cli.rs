use clap::{Arg, Command};

pub const QUERY_CMD: &str = "query";

/// Optional per-endpoint arguments, named after the request parameter they fill.
pub const PARAM_ARGS: [&str; 8] = ["res", "chrom", "start", "end", "region", "model", "page", "mpp"];

fn dataset_arg() -> Arg {
    Arg::new("dataset")
        .long("dataset")
        .short('d')
        .required(true)
        .help("Dataset as owner/dataset_id")
}

fn param_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub fn create_query_cli() -> Command {
    let res = || param_arg("res", "Resolution");
    let region = || param_arg("region", "Region ID");

    Command::new(QUERY_CMD)
        .author("Databio")
        .about("Query a dataset and print the JSON response")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("resolutions")
                .about("List the resolutions of a dataset")
                .arg(dataset_arg()),
        )
        .subcommand(
            Command::new("chromosomes")
                .about("List the chromosomes modelled at a resolution")
                .arg(dataset_arg())
                .arg(res()),
        )
        .subcommand(
            Command::new("regions")
                .about("Find regions overlapping chrom:start-end")
                .arg(dataset_arg())
                .arg(res())
                .arg(param_arg("chrom", "Chromosome"))
                .arg(param_arg("start", "Start (inclusive)"))
                .arg(param_arg("end", "End (exclusive)")),
        )
        .subcommand(
            Command::new("models")
                .about("List the models of a region with its neighbouring regions")
                .arg(dataset_arg())
                .arg(res())
                .arg(region()),
        )
        .subcommand(
            Command::new("model")
                .about("Retrieve model coordinates, one page at a time")
                .arg(dataset_arg())
                .arg(res())
                .arg(region())
                .arg(param_arg("model", "Model IDs, comma separated, or 'all'"))
                .arg(param_arg("page", "Page number (default: 1)"))
                .arg(param_arg("mpp", "Models per page")),
        )
}
