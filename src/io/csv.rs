use std::{
    io::{Read, Write},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    core::{
        price::BidOfferPrice,
        record::CurtailmentRecord,
        segment::{Acceptance, RampSegment, UnitId},
    },
    error::DataShapeError,
    io::parse_timestamp,
    prelude::*,
};

/// Ramp segment of a specific unit.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitSegment<M = ()> {
    pub unit: UnitId,
    pub segment: RampSegment<M>,
}

/// Accepted price of a specific unit.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitPrice {
    pub unit: UnitId,
    pub price: BidOfferPrice,
}

/// Column names, the first one is the canonical.
type Aliases = &'static [&'static str];

const UNIT: Aliases = &["bmUnit"];
const LEVEL_FROM: Aliases = &["levelFrom"];
const TIME_FROM: Aliases = &["timeFrom"];
const LEVEL_TO: Aliases = &["levelTo"];
const TIME_TO: Aliases = &["timeTo"];
const ACCEPT_ID: Aliases = &["acceptanceNumber", "Accept ID"];
const ACCEPT_TIME: Aliases = &["acceptanceTime", "Accept Time"];
const PAIR_NUMBER: Aliases = &["bidOfferPairNumber"];
const BID_PRICE: Aliases = &["bidPrice"];
const PRICE_TIME: Aliases = &["local_datetime"];

/// Read the physical notifications: `bmUnit, levelFrom, timeFrom, levelTo, timeTo`.
#[instrument(skip_all)]
pub fn read_notifications(reader: impl Read) -> Result<Vec<UnitSegment>, DataShapeError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let columns = SegmentColumns::new(reader.headers()?)?;
    let segments = reader
        .records()
        .map(|record| columns.parse(&Row::new(&record?)))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(n_segments = segments.len(), "read the notifications");
    Ok(segments)
}

/// Read the acceptance levels: notification columns plus `acceptanceNumber, acceptanceTime`.
#[instrument(skip_all)]
pub fn read_acceptances(
    reader: impl Read,
) -> Result<Vec<UnitSegment<Acceptance>>, DataShapeError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?;
    let columns = SegmentColumns::new(headers)?;
    let accept_id = column(headers, ACCEPT_ID)?;
    let accept_time = column(headers, ACCEPT_TIME)?;
    let segments = reader
        .records()
        .map(|record| {
            let record = record?;
            let row = Row::new(&record);
            let acceptance = Acceptance {
                id: row.identifier(accept_id, ACCEPT_ID)?,
                accepted_at: row.time(accept_time, ACCEPT_TIME)?,
            };
            let UnitSegment { unit, segment } = columns.parse(&row)?;
            Ok(UnitSegment { unit, segment: segment.with_meta(acceptance) })
        })
        .collect::<Result<Vec<_>, DataShapeError>>()?;
    debug!(n_segments = segments.len(), "read the acceptances");
    Ok(segments)
}

/// Read the accepted prices: `bmUnit, bidOfferPairNumber, bidPrice, local_datetime`.
#[instrument(skip_all)]
pub fn read_prices(reader: impl Read) -> Result<Vec<UnitPrice>, DataShapeError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers()?;
    let unit = column(headers, UNIT)?;
    let pair_number = column(headers, PAIR_NUMBER)?;
    let bid_price = column(headers, BID_PRICE)?;
    let time = column(headers, PRICE_TIME)?;
    let prices = reader
        .records()
        .map(|record| {
            let record = record?;
            let row = Row::new(&record);
            Ok(UnitPrice {
                unit: UnitId::from(row.get(unit)),
                price: BidOfferPrice {
                    time: row.time(time, PRICE_TIME)?,
                    pair_number: row.identifier(pair_number, PAIR_NUMBER)?,
                    bid_price: row.number(bid_price, BID_PRICE)?.into(),
                },
            })
        })
        .collect::<Result<Vec<_>, DataShapeError>>()?;
    debug!(n_prices = prices.len(), "read the prices");
    Ok(prices)
}

/// Write the curtailment records with a header.
pub fn write_records<'a>(
    writer: impl Write,
    records: impl IntoIterator<Item = &'a CurtailmentRecord>,
) -> Result {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read back the curtailment records written by [`write_records`].
pub fn read_records(reader: impl Read) -> Result<Vec<CurtailmentRecord>, DataShapeError> {
    let records = csv::Reader::from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<CurtailmentRecord>, _>>()?;
    Ok(records)
}

fn column(headers: &StringRecord, aliases: Aliases) -> Result<usize, DataShapeError> {
    headers
        .iter()
        .position(|header| aliases.contains(&header))
        .ok_or(DataShapeError::MissingColumn { column: aliases[0] })
}

struct SegmentColumns {
    unit: usize,
    level_from: usize,
    time_from: usize,
    level_to: usize,
    time_to: usize,
}

impl SegmentColumns {
    fn new(headers: &StringRecord) -> Result<Self, DataShapeError> {
        Ok(Self {
            unit: column(headers, UNIT)?,
            level_from: column(headers, LEVEL_FROM)?,
            time_from: column(headers, TIME_FROM)?,
            level_to: column(headers, LEVEL_TO)?,
            time_to: column(headers, TIME_TO)?,
        })
    }

    fn parse(&self, row: &Row) -> Result<UnitSegment, DataShapeError> {
        Ok(UnitSegment {
            unit: UnitId::from(row.get(self.unit)),
            segment: RampSegment::new(
                row.time(self.time_from, TIME_FROM)?,
                row.number(self.level_from, LEVEL_FROM)?.into(),
                row.time(self.time_to, TIME_TO)?,
                row.number(self.level_to, LEVEL_TO)?.into(),
            ),
        })
    }
}

struct Row<'a> {
    record: &'a StringRecord,
    line: u64,
}

impl<'a> Row<'a> {
    fn new(record: &'a StringRecord) -> Self {
        Self { record, line: record.position().map_or(0, csv::Position::line) }
    }

    fn get(&self, index: usize) -> &'a str {
        self.record.get(index).unwrap_or_default()
    }

    fn number(&self, index: usize, aliases: Aliases) -> Result<f64, DataShapeError> {
        let value = self.get(index);
        value.parse().map_err(|_| DataShapeError::UnparseableNumber {
            line: self.line,
            column: aliases[0],
            value: value.to_owned(),
        })
    }

    fn time(&self, index: usize, aliases: Aliases) -> Result<DateTime<Utc>, DataShapeError> {
        let value = self.get(index);
        parse_timestamp(value).map_err(|_| DataShapeError::UnparseableTime {
            line: self.line,
            column: aliases[0],
            value: value.to_owned(),
        })
    }

    fn identifier<T: FromStr>(&self, index: usize, aliases: Aliases) -> Result<T, DataShapeError> {
        let value = self.get(index);
        value.parse().map_err(|_| DataShapeError::UnparseableIdentifier {
            line: self.line,
            column: aliases[0],
            value: value.to_owned(),
        })
    }
}
