use std::{ops::RangeInclusive, path::Path};

use chrono::{DateTime, Utc};
use itertools::Itertools;
use rusqlite::{Connection, Row, params};

use crate::{core::record::CurtailmentRecord, prelude::*, quantity::power::Megawatts};

/// Curtailment store.
#[must_use]
pub struct Db(Connection);

impl Db {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let connection = Connection::open(path.as_ref())
            .with_context(|| format!("failed to open `{}`", path.as_ref().display()))?;
        Self::initialize(connection)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(connection: Connection) -> Result<Self> {
        connection
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS curtailment (
                    time TEXT NOT NULL,
                    level_fpn REAL NOT NULL,
                    level_boal REAL,
                    level_after_boal REAL NOT NULL,
                    delta_mw REAL NOT NULL
                );
                CREATE INDEX IF NOT EXISTS curtailment_time ON curtailment (time);
                ",
            )
            .context("failed to initialize the schema")?;
        Ok(Self(connection))
    }

    /// Store the records in a single transaction, replacing the stored rows within their time span.
    ///
    /// Saving the same records again leaves the store unchanged.
    #[instrument(skip_all)]
    pub fn save<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a CurtailmentRecord>,
    ) -> Result<usize> {
        let records = records.into_iter().collect_vec();
        let Some((start, end)) = records.iter().map(|record| record.time).minmax().into_option()
        else {
            return Ok(0);
        };
        let transaction = self.0.transaction()?;
        let n_replaced = transaction.execute(
            "DELETE FROM curtailment WHERE time >= ?1 AND time <= ?2",
            params![start, end],
        )?;
        let mut n_records = 0;
        {
            let mut statement = transaction.prepare_cached(
                "
                INSERT INTO curtailment (time, level_fpn, level_boal, level_after_boal, delta_mw)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )?;
            for record in records {
                n_records += statement.execute(params![
                    record.time,
                    record.level_fpn.0,
                    record.level_boal.map(|level| level.0),
                    record.level_after_boal.0,
                    record.delta_mw.0,
                ])?;
            }
        }
        transaction.commit()?;
        info!(%start, %end, n_replaced, n_records, "saved");
        Ok(n_records)
    }
}
