#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod analysis;
mod cli;
mod core;
mod db;
mod error;
mod io;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Analyze(args) => args.run()?,
        Command::Query(args) => args.run()?,
        Command::Load(args) => args.run()?,
        Command::Watch(args) => args.run().await?,
    }

    info!("done!");
    Ok(())
}
