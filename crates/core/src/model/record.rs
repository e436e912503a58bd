use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wayline_protocol::SharedStr;

/// A geographic coordinate pair. Only constructible from finite values;
/// records without one are simply absent from map-related structures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn from_pair(lat: f64, lng: f64) -> Option<Self> {
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }
}

/// A single dated entry in the travel log. Immutable after ingestion.
///
/// `summary` through `photos` are opaque display payload: the engine carries
/// them to the render surfaces untouched and never branches on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    /// Unique positive id, assigned in ingestion order.
    pub id: u64,
    /// Calendar day of the event. Rows without a parseable date never reach
    /// the engine.
    pub date: NaiveDate,
    /// Key into the lane model's event-type ownership.
    pub event_type: SharedStr,
    pub location: Option<GeoPoint>,
    pub summary: SharedStr,
    pub description: SharedStr,
    pub review: SharedStr,
    pub rating: Option<f32>,
    pub photos: Vec<SharedStr>,
}
