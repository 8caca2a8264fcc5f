mod analyze;
mod db;
mod load;
mod query;
mod watch;

use clap::{Parser, Subcommand};

pub use self::{analyze::AnalyzeArgs, load::LoadArgs, query::QueryArgs, watch::WatchArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile the notifications with the acceptances and report the curtailment per unit.
    #[clap(name = "analyze")]
    Analyze(Box<AnalyzeArgs>),

    /// Print the stored curtailment within a time range.
    #[clap(name = "query")]
    Query(QueryArgs),

    /// Append a previously written curtailment CSV to the store.
    #[clap(name = "load")]
    Load(LoadArgs),

    /// Analyze now and then daily at the specified time.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),
}
