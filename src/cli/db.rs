use std::path::PathBuf;

use clap::Parser;

use crate::{db::Db, prelude::*};

#[derive(Clone, Parser)]
pub struct DbArgs {
    /// SQLite database path.
    #[clap(long = "db", env = "CURTAILMENT_DB")]
    path: PathBuf,
}

impl DbArgs {
    pub fn open(&self) -> Result<Db> {
        Db::open(&self.path)
    }
}
