use chrono::{DateTime, Utc};
use clap::Parser;

use crate::{cli::db::DbArgs, io::parse_timestamp, prelude::*, tables::build_records_table};

#[derive(Parser)]
pub struct QueryArgs {
    #[clap(flatten)]
    db: DbArgs,

    /// Inclusive start time: RFC 3339 or UTC.
    #[clap(long, env = "QUERY_START", value_parser = parse_timestamp)]
    start: DateTime<Utc>,

    /// Inclusive end time: RFC 3339 or UTC.
    #[clap(long, env = "QUERY_END", value_parser = parse_timestamp)]
    end: DateTime<Utc>,
}

impl QueryArgs {
    pub fn run(&self) -> Result {
        ensure!(self.start <= self.end, "the start time is after the end time");
        let records = self.db.open()?.read(self.start..=self.end)?;
        info!(n_records = records.len(), "fetched");
        println!("{}", build_records_table(&records));
        Ok(())
    }
}
