use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use coord3d_core::models::DatasetId;
use coord3d_store::CoordStore;
use coord3d_store::backend::CoordinateBackend;

pub fn run_info(matches: &ArgMatches, store: &CoordStore) -> Result<()> {
    let dataset_id: DatasetId = matches
        .get_one::<String>("dataset")
        .context("--dataset is required")?
        .parse()?;

    let mut dataset = store.open_dataset(&dataset_id)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    writeln!(out, "resolution\tbins\tmodel_capacity\tregions\tchromosomes")?;
    for resolution in dataset.list_resolutions()? {
        let handle = dataset.open_resolution(resolution)?;
        let shape = handle.coords().shape();
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            resolution,
            shape.bins,
            shape.model_capacity,
            handle.index().len(),
            handle.list_chromosomes().join(",")
        )?;
    }
    out.flush()?;

    dataset.close();
    Ok(())
}
