mod info;
mod query;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;

use coord3d_store::{BackendKind, CoordStore, StoreConfig};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "coord3d";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Query multi-resolution ensembles of 3D genome structure models.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("More logging (-v info, -vv debug). RUST_LOG overrides"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML config file"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Store root directory (overrides the config file)"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .global(true)
                .value_parser(["mmap", "memory"])
                .help("Coordinate array backend (overrides the config file)"),
        )
        .subcommand(query::cli::create_query_cli())
        .subcommand(info::cli::create_info_cli())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

///
/// Config file first, then command line overrides.
///
fn load_store(matches: &ArgMatches) -> Result<CoordStore> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => StoreConfig::try_from(path.as_path())
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StoreConfig::default(),
    };

    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config.root = root.clone();
    }
    match matches.get_one::<String>("backend").map(String::as_str) {
        Some("memory") => config.backend = BackendKind::Memory,
        Some("mmap") => config.backend = BackendKind::Mmap,
        _ => {}
    }

    debug!("Store config: {config:?}");
    if !config.root.is_dir() {
        anyhow::bail!("Store root {} is not a directory", config.root.display());
    }
    Ok(CoordStore::new(config))
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count("verbose"));
    let store = load_store(&matches)?;

    match matches.subcommand() {
        //
        // QUERY
        //
        Some((query::cli::QUERY_CMD, matches)) => {
            query::handlers::run_query(matches, &store)?;
        }

        //
        // INFO
        //
        Some((info::cli::INFO_CMD, matches)) => {
            info::handlers::run_info(matches, &store)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
