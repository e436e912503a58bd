pub mod lane;
pub mod record;
pub mod store;

pub use lane::{Lane, LaneAssignment, LaneConfigError, LaneSet};
pub use record::{GeoPoint, TripRecord};
pub use store::{DayGroup, EventStore};
