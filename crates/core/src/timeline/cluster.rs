use std::collections::HashSet;

use wayline_protocol::SharedStr;

use crate::model::EventStore;

use super::scale::{TimeScale, ZoomTransform};

/// Icon footprint, matching the side-by-side layout within a day group.
pub const ICON_SIZE: f64 = 12.0;
pub const ICON_GAP: f64 = 2.0;

/// Minimum pixel separation below which adjacent day groups merge.
pub const MERGE_GAP: f64 = 6.0;

/// One or more adjacent day groups merged at the current zoom.
///
/// Transient: rebuilt from scratch on every recompute. Identity across
/// recomputes is the render layer's business (see `layout::BadgeKey`).
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Member record ids, concatenated in day order.
    pub records: Vec<u64>,
    /// Midpoint of the merged pixel extent.
    pub center: f64,
    pub left: f64,
    pub right: f64,
    /// Number of distinct calendar days merged in.
    pub day_count: usize,
}

impl Cluster {
    /// True iff more than one distinct day contributed — rendered as a
    /// count badge instead of individual icons.
    pub fn is_cluster(&self) -> bool {
        self.day_count > 1
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Pixel width of `n` icons laid side by side.
pub fn group_width(n: usize) -> f64 {
    n as f64 * ICON_SIZE + n.saturating_sub(1) as f64 * ICON_GAP
}

/// Compute the cluster sequence for one lane at the current zoom.
///
/// Records of hidden types are dropped; records in `expanded` bypass
/// clustering entirely and render individually elsewhere. Surviving day
/// groups are placed on the track, sorted by x, and merged left to right
/// whenever the gap to the open cluster is below [`MERGE_GAP`] — a single
/// interval-merge sweep, no backtracking.
pub fn compute_lane_clusters(
    store: &EventStore,
    lane: usize,
    scale: &TimeScale,
    transform: ZoomTransform,
    hidden_types: &HashSet<SharedStr>,
    expanded: &HashSet<u64>,
) -> Vec<Cluster> {
    let mut candidates: Vec<Cluster> = Vec::new();
    for group in store.day_groups(lane) {
        let survivors: Vec<u64> = group
            .records
            .iter()
            .copied()
            .filter(|id| {
                !expanded.contains(id)
                    && store
                        .record(*id)
                        .is_some_and(|r| !hidden_types.contains(&r.event_type))
            })
            .collect();
        if survivors.is_empty() {
            continue;
        }
        let x = transform.apply(scale.x(group.day));
        let half = group_width(survivors.len()) / 2.0;
        candidates.push(Cluster {
            records: survivors,
            center: x,
            left: x - half,
            right: x + half,
            day_count: 1,
        });
    }

    // Day keys are distinct, so centers are strictly ordered within a lane
    // already; the sort keeps the sweep correct if that ever changes.
    candidates.sort_by(|a, b| a.center.total_cmp(&b.center));

    let mut clusters: Vec<Cluster> = Vec::new();
    for group in candidates {
        match clusters.last_mut() {
            Some(open) if group.left - open.right < MERGE_GAP => {
                open.left = open.left.min(group.left);
                open.right = open.right.max(group.right);
                open.center = (open.left + open.right) / 2.0;
                open.records.extend(group.records);
                open.day_count += 1;
            }
            _ => clusters.push(group),
        }
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LaneSet, TripRecord};
    use chrono::NaiveDate;

    fn record(id: u64, date: &str, event_type: &str) -> TripRecord {
        TripRecord {
            id,
            date: date.parse().expect("test date"),
            event_type: SharedStr::from(event_type),
            location: None,
            summary: SharedStr::default(),
            description: SharedStr::default(),
            review: SharedStr::default(),
            rating: None,
            photos: Vec::new(),
        }
    }

    /// A scale where consecutive days sit `px_per_day` pixels apart under
    /// the identity transform.
    fn day_scale(days: i64, px_per_day: f64) -> TimeScale {
        let min: NaiveDate = "2023-01-01".parse().expect("date");
        // TimeScale pads a year each side; widen the track so the data
        // region keeps the requested density.
        let span = 2.0 * TimeScale::PAD_DAYS as f64 + days as f64 - 1.0;
        TimeScale::new(
            min,
            min + chrono::Days::new(days as u64 - 1),
            span * px_per_day,
        )
    }

    fn clusters_of(
        records: Vec<TripRecord>,
        lane: usize,
        scale: &TimeScale,
        hidden: &[&str],
        expanded: &[u64],
    ) -> Vec<Cluster> {
        let lanes = LaneSet::travel_default();
        let store = EventStore::new(records, &lanes);
        let hidden: HashSet<SharedStr> = hidden.iter().map(|t| SharedStr::from(*t)).collect();
        let expanded: HashSet<u64> = expanded.iter().copied().collect();
        compute_lane_clusters(
            &store,
            lane,
            scale,
            ZoomTransform::IDENTITY,
            &hidden,
            &expanded,
        )
    }

    #[test]
    fn three_adjacent_days_merge_when_icons_overlap() {
        // Days 3px apart with 12px icons: extents overlap, one cluster of 3.
        let scale = day_scale(3, 3.0);
        let records = vec![
            record(1, "2023-01-01", "flight"),
            record(2, "2023-01-02", "flight"),
            record(3, "2023-01-03", "flight"),
        ];
        let clusters = clusters_of(records, 0, &scale, &[], &[]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].records, vec![1, 2, 3]);
        assert_eq!(clusters[0].day_count, 3);
        assert!(clusters[0].is_cluster());
    }

    #[test]
    fn distant_days_stay_separate() {
        // Days 50px apart: gap of 38px between extents, no merge.
        let scale = day_scale(3, 50.0);
        let records = vec![
            record(1, "2023-01-01", "flight"),
            record(2, "2023-01-02", "flight"),
            record(3, "2023-01-03", "flight"),
        ];
        let clusters = clusters_of(records, 0, &scale, &[], &[]);
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| !c.is_cluster()));
        assert!(clusters.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn merge_is_transitive_closure_of_gap_relation() {
        let scale = day_scale(20, 10.0);
        // Two runs of adjacent days, far apart.
        let records = vec![
            record(1, "2023-01-01", "flight"),
            record(2, "2023-01-02", "flight"),
            record(3, "2023-01-03", "flight"),
            record(4, "2023-01-18", "flight"),
            record(5, "2023-01-19", "flight"),
        ];
        let clusters = clusters_of(records, 0, &scale, &[], &[]);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].records, vec![1, 2, 3]);
        assert_eq!(clusters[1].records, vec![4, 5]);

        // No two output clusters sit closer than the merge gap, and inside
        // a cluster every member day chains to the previous one.
        for pair in clusters.windows(2) {
            assert!(pair[1].left - pair[0].right >= MERGE_GAP);
        }
    }

    #[test]
    fn multi_record_days_widen_the_footprint() {
        // Two records on one day widen that day's extent from 12px to 26px,
        // enough to reach a neighbor that a single icon would miss.
        let scale = day_scale(3, 16.0);
        let lone = vec![
            record(1, "2023-01-01", "flight"),
            record(2, "2023-01-02", "flight"),
        ];
        // 16px apart, 12px icons: 4px gap < 6px threshold — merges even solo.
        let clusters = clusters_of(lone, 0, &scale, &[], &[]);
        assert_eq!(clusters.len(), 1);

        let scale = day_scale(3, 19.0);
        let lone = vec![
            record(1, "2023-01-01", "flight"),
            record(2, "2023-01-02", "flight"),
        ];
        // 19px apart: 7px gap — stays separate.
        let clusters = clusters_of(lone, 0, &scale, &[], &[]);
        assert_eq!(clusters.len(), 2);

        let crowded = vec![
            record(1, "2023-01-01", "flight"),
            record(2, "2023-01-01", "train"),
            record(3, "2023-01-02", "flight"),
        ];
        // Same 19px spacing, but day one now spans 26px: its right edge
        // reaches within the threshold and the days merge.
        let clusters = clusters_of(crowded, 0, &scale, &[], &[]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].records, vec![1, 2, 3]);
    }

    #[test]
    fn hidden_types_drop_out_of_clustering() {
        let scale = day_scale(3, 3.0);
        let records = vec![
            record(1, "2023-01-01", "flight"),
            record(2, "2023-01-02", "train"),
            record(3, "2023-01-03", "flight"),
        ];
        let clusters = clusters_of(records, 0, &scale, &["train"], &[]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].records, vec![1, 3]);
        assert_eq!(clusters[0].day_count, 2);
    }

    #[test]
    fn expanded_records_bypass_clustering() {
        let scale = day_scale(3, 3.0);
        let records = vec![
            record(1, "2023-01-01", "flight"),
            record(2, "2023-01-02", "flight"),
            record(3, "2023-01-03", "flight"),
        ];
        let clusters = clusters_of(records, 0, &scale, &[], &[1, 2, 3]);
        assert!(clusters.is_empty());
    }

    #[test]
    fn single_record_day_is_a_size_one_candidate() {
        let scale = day_scale(3, 50.0);
        let clusters = clusters_of(vec![record(1, "2023-01-02", "flight")], 0, &scale, &[], &[]);
        assert_eq!(clusters.len(), 1);
        assert!(!clusters[0].is_cluster());
        assert_eq!(clusters[0].records, vec![1]);
        // Extent is one icon wide, centered on the day.
        assert!((clusters[0].right - clusters[0].left - ICON_SIZE).abs() < 1e-9);
    }
}
