use log::warn;
use serde::Deserialize;
use thiserror::Error;
use wayline_protocol::SharedStr;

use crate::model::{GeoPoint, TripRecord};

use super::parse_date;

#[derive(Debug, Error)]
pub enum TripCsvError {
    #[error("malformed csv: {0}")]
    Read(#[from] ::csv::Error),
}

/// One raw CSV row. Everything is read as text; normalization decides what
/// survives — a free-form rating or blank coordinate must not kill the row.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    date: String,
    #[serde(default, alias = "type", alias = "eventType")]
    event_type: String,
    #[serde(default)]
    lat: String,
    #[serde(default)]
    lng: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    review: String,
    #[serde(default)]
    rating: String,
    /// Pipe-separated photo URLs.
    #[serde(default)]
    photos: String,
}

/// Parse the travel log's CSV export into normalized records.
///
/// Ids are assigned 1-based in row order. Rows without a parseable date are
/// excluded here — the engine never sees them.
pub fn parse_csv(data: &[u8]) -> Result<Vec<TripRecord>, TripCsvError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let mut records = Vec::new();
    let mut next_id: u64 = 1;
    for row in reader.deserialize::<RawRow>() {
        let row = row?;
        let Some(date) = parse_date(&row.date) else {
            warn!("dropping row with unparseable date {:?}", row.date);
            continue;
        };
        records.push(normalize(next_id, date, row));
        next_id += 1;
    }
    Ok(records)
}

fn normalize(id: u64, date: chrono::NaiveDate, row: RawRow) -> TripRecord {
    let location = match (row.lat.parse::<f64>(), row.lng.parse::<f64>()) {
        (Ok(lat), Ok(lng)) => GeoPoint::from_pair(lat, lng),
        _ => None,
    };
    TripRecord {
        id,
        date,
        event_type: SharedStr::from(row.event_type),
        location,
        summary: SharedStr::from(row.summary),
        description: SharedStr::from(row.description),
        review: SharedStr::from(row.review),
        rating: row.rating.trim().parse().ok(),
        photos: row
            .photos
            .split('|')
            .filter(|p| !p.trim().is_empty())
            .map(|p| SharedStr::from(p.trim()))
            .collect(),
    }
}
