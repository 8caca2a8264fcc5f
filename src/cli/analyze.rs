use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use chrono::TimeDelta;
use clap::Parser;

use crate::{
    analysis::analyze_units,
    core::record::CurtailmentRecord,
    db::Db,
    io::csv::{read_acceptances, read_notifications, read_prices, write_records},
    prelude::*,
    tables::build_metrics_table,
};

#[derive(Clone, Parser)]
pub struct AnalyzeArgs {
    /// Final physical notifications CSV.
    #[clap(long = "fpn", env = "FPN_PATH")]
    fpn_path: PathBuf,

    /// Bid-offer acceptance levels CSV.
    #[clap(long = "boal", env = "BOAL_PATH")]
    boal_path: PathBuf,

    /// Accepted bid-offer prices CSV, curtailment cost is not calculated without it.
    #[clap(long = "prices", env = "PRICES_PATH")]
    prices_path: Option<PathBuf>,

    /// Write the reconciled rows to this CSV.
    #[clap(long = "output", env = "OUTPUT_PATH")]
    output_path: Option<PathBuf>,

    /// Append the reconciled rows to this SQLite database.
    #[clap(long = "db", env = "CURTAILMENT_DB")]
    db_path: Option<PathBuf>,

    /// Write and store only the minutes with a price attached.
    #[clap(long, env = "PRICED_ONLY", requires = "prices_path")]
    priced_only: bool,

    /// Sample interval of the priced rows.
    #[clap(long, env = "ENERGY_INTERVAL", default_value = "30m")]
    energy_interval: humantime::Duration,
}

impl AnalyzeArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let notifications = read_notifications(open(&self.fpn_path)?)
            .with_context(|| format!("failed to read `{}`", self.fpn_path.display()))?;
        let acceptances = read_acceptances(open(&self.boal_path)?)
            .with_context(|| format!("failed to read `{}`", self.boal_path.display()))?;
        let prices = self
            .prices_path
            .as_ref()
            .map(|path| {
                read_prices(open(path)?)
                    .with_context(|| format!("failed to read `{}`", path.display()))
            })
            .transpose()?;
        let energy_interval = TimeDelta::from_std(self.energy_interval.into())
            .context("the energy interval is too long")?;

        let analyses = analyze_units(notifications, acceptances, prices, energy_interval)?;
        println!("{}", build_metrics_table(&analyses));

        let records: Vec<CurtailmentRecord> = analyses
            .into_iter()
            .flat_map(|analysis| analysis.into_records(self.priced_only))
            .collect();
        if let Some(output_path) = &self.output_path {
            let file = File::create(output_path)
                .with_context(|| format!("failed to create `{}`", output_path.display()))?;
            write_records(BufWriter::new(file), &records)?;
            info!(path = %output_path.display(), n_records = records.len(), "written");
        }
        if let Some(db_path) = &self.db_path {
            Db::open(db_path)?.save(&records)?;
        }
        Ok(())
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open `{}`", path.display()))
}
