use log::warn;
use serde::Deserialize;
use thiserror::Error;
use wayline_protocol::SharedStr;

use crate::model::{GeoPoint, TripRecord};

use super::parse_date;

#[derive(Debug, Error)]
pub enum TripJsonError {
    #[error("malformed json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(default)]
    date: String,
    #[serde(default, alias = "type", alias = "eventType")]
    event_type: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    review: String,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    photos: Vec<String>,
}

/// Wrapper shape used by later exports: `{ "trips": [...] }`.
#[derive(Debug, Deserialize)]
struct TripFile {
    trips: Vec<RawTrip>,
}

/// Parse a JSON trip export — either a bare array of trips or a `{ trips }`
/// wrapper. Same normalization rules as the CSV path.
pub fn parse_json(data: &[u8]) -> Result<Vec<TripRecord>, TripJsonError> {
    let raw: Vec<RawTrip> = match serde_json::from_slice::<Vec<RawTrip>>(data) {
        Ok(trips) => trips,
        Err(_) => serde_json::from_slice::<TripFile>(data)?.trips,
    };

    let mut records = Vec::with_capacity(raw.len());
    let mut next_id: u64 = 1;
    for trip in raw {
        let Some(date) = parse_date(&trip.date) else {
            warn!("dropping trip with unparseable date {:?}", trip.date);
            continue;
        };
        let location = match (trip.lat, trip.lng) {
            (Some(lat), Some(lng)) => GeoPoint::from_pair(lat, lng),
            _ => None,
        };
        records.push(TripRecord {
            id: next_id,
            date,
            event_type: SharedStr::from(trip.event_type),
            location,
            summary: SharedStr::from(trip.summary),
            description: SharedStr::from(trip.description),
            review: SharedStr::from(trip.review),
            rating: trip.rating,
            photos: trip.photos.into_iter().map(SharedStr::from).collect(),
        });
        next_id += 1;
    }
    Ok(records)
}
