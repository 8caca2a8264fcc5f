use std::{fs::File, path::PathBuf};

use clap::Parser;

use crate::{cli::db::DbArgs, io::csv::read_records, prelude::*};

#[derive(Parser)]
pub struct LoadArgs {
    /// Curtailment CSV written by `analyze --output`.
    #[clap(long = "input", env = "INPUT_PATH")]
    input_path: PathBuf,

    #[clap(flatten)]
    db: DbArgs,
}

impl LoadArgs {
    pub fn run(&self) -> Result {
        let file = File::open(&self.input_path)
            .with_context(|| format!("failed to open `{}`", self.input_path.display()))?;
        let records = read_records(file)
            .with_context(|| format!("failed to read `{}`", self.input_path.display()))?;
        self.db.open()?.save(&records)?;
        Ok(())
    }
}
