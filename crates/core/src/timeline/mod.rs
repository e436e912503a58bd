pub mod axis;
pub mod cluster;
pub mod layout;
pub mod scale;

pub use cluster::{Cluster, ICON_GAP, ICON_SIZE, MERGE_GAP, compute_lane_clusters};
pub use layout::{
    Badge, BadgeDiff, BadgeKey, IconSlot, LayoutPlan, ROW_HEIGHT, diff_badges, layout,
};
pub use scale::{TickUnit, TimeScale, ZoomTransform};
