//! Column encoding shared by the SQLite adapters
//!
//! Dates are `YYYY-MM-DD` text and times `HH:MM:SS` text, so plain string
//! comparison in SQL orders them correctly. Timestamps are unix seconds.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use petnco_domain::constants::{DATE_FORMAT, TIME_FORMAT};
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn time_to_sql(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Time with its fractional seconds, for comparing against stored times
///
/// A stored `09:00:00` sorts before `09:00:00.5`, matching `NaiveTime`
/// ordering. A whole-second time encodes exactly as [`time_to_sql`].
pub(crate) fn precise_time_to_sql(time: NaiveTime) -> String {
    time.format("%H:%M:%S%.f").to_string()
}

pub(crate) fn opt_date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(date_to_sql)
}

/// Parse a TEXT column through `FromStr`
pub(crate) fn parse_text<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|err| conversion_error(idx, Type::Text, err))
}

pub(crate) fn parse_opt_text<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| raw.parse::<T>().map_err(|err| conversion_error(idx, Type::Text, err)))
        .transpose()
}

pub(crate) fn parse_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|err| conversion_error(idx, Type::Text, err))
}

pub(crate) fn parse_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveTime> {
    let raw: String = row.get(idx)?;
    NaiveTime::parse_from_str(&raw, TIME_FORMAT)
        .map_err(|err| conversion_error(idx, Type::Text, err))
}

pub(crate) fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| conversion_error(idx, Type::Integer, format!("timestamp {secs} out of range")))
}

fn conversion_error(idx: usize, ty: Type, err: impl Display) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, err.to_string().into())
}
