use clap::{Arg, Command};

pub const INFO_CMD: &str = "info";

pub fn create_info_cli() -> Command {
    Command::new(INFO_CMD)
        .author("Databio")
        .about("Summarize each resolution of a dataset")
        .arg_required_else_help(true)
        .arg(
            Arg::new("dataset")
                .long("dataset")
                .short('d')
                .required(true)
                .help("Dataset as owner/dataset_id"),
        )
}
