pub mod ingest;
pub mod model;
pub mod session;
pub mod timeline;

pub use model::{EventStore, GeoPoint, Lane, LaneAssignment, LaneSet, TripRecord};
pub use session::{Command, FocusSink, NullSink, Session, TimelineFrame};
pub use timeline::{TickUnit, TimeScale, ZoomTransform};
