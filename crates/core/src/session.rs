use std::collections::HashSet;

use log::warn;
use wayline_protocol::{RenderCommand, SharedStr};

use crate::model::{EventStore, GeoPoint, LaneSet, TripRecord};
use crate::timeline::axis::render_axis;
use crate::timeline::layout::{
    Badge, BadgeDiff, LayoutPlan, ROW_HEIGHT, diff_badges, layout, render_plan,
};
use crate::timeline::scale::{TimeScale, ZoomTransform};

/// External collaborators notified when the focused trip changes: the map
/// widget and the sidebar. The engine only calls out through this seam.
pub trait FocusSink {
    fn pan_to(&mut self, location: GeoPoint);
    fn open_marker(&mut self, id: u64);
    fn reveal_in_sidebar(&mut self, id: u64);
}

/// A sink that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FocusSink for NullSink {
    fn pan_to(&mut self, _location: GeoPoint) {}
    fn open_marker(&mut self, _id: u64) {}
    fn reveal_in_sidebar(&mut self, _id: u64) {}
}

/// A user interaction, normalized to a typed command. Render surfaces
/// translate their input events into these; [`Session::apply`] is the single
/// state-update function.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Zoom(ZoomTransform),
    Resize { track_width: f64 },
    ToggleLane(usize),
    ExpandCluster(Vec<u64>),
    Focus { id: u64, skip_pan: bool },
}

/// Output of one recompute: the command stream to draw, the geometric plan
/// behind it, and the badge delta against the previous recompute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineFrame {
    pub commands: Vec<RenderCommand>,
    pub plan: LayoutPlan,
    pub badge_diff: BadgeDiff,
}

/// All mutable view state, in one place.
///
/// Single-threaded by construction: each command is fully processed before
/// the next, so no locking discipline is needed and the last command for a
/// given input determines final state.
#[derive(Debug)]
pub struct Session {
    store: EventStore,
    lanes: LaneSet,
    /// None when the log has no dated records — the timeline is disabled
    /// but the rest of the application still runs.
    scale: Option<TimeScale>,
    transform: ZoomTransform,
    track_width: f64,
    hidden_lanes: HashSet<usize>,
    expanded: HashSet<u64>,
    focused: Option<u64>,
    last_scale: f64,
    prev_badges: Vec<Badge>,
}

impl Session {
    pub fn new(records: Vec<TripRecord>, lanes: LaneSet, track_width: f64) -> Self {
        let store = EventStore::new(records, &lanes);
        let scale = match store.date_range() {
            Some((min, max)) => Some(TimeScale::new(min, max, track_width)),
            None => {
                warn!("no dated trips loaded; timeline disabled");
                None
            }
        };
        Self {
            store,
            lanes,
            scale,
            transform: ZoomTransform::IDENTITY,
            track_width: track_width.max(1.0),
            hidden_lanes: HashSet::new(),
            expanded: HashSet::new(),
            focused: None,
            last_scale: ZoomTransform::IDENTITY.k,
            prev_badges: Vec::new(),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn lanes(&self) -> &LaneSet {
        &self.lanes
    }

    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    /// The current cross-view selection, if any.
    pub fn focused(&self) -> Option<u64> {
        self.focused
    }

    pub fn expanded(&self) -> &HashSet<u64> {
        &self.expanded
    }

    pub fn lane_hidden(&self, lane: usize) -> bool {
        self.hidden_lanes.contains(&lane)
    }

    /// Pixel height of the lane area; the axis starts below it.
    pub fn lane_area_height(&self) -> f64 {
        self.lanes.len() as f64 * ROW_HEIGHT
    }

    /// Event types currently filtered out, derived from hidden lanes.
    pub fn hidden_types(&self) -> HashSet<SharedStr> {
        self.hidden_lanes
            .iter()
            .filter_map(|&i| self.lanes.get(i))
            .flat_map(|lane| lane.types.iter().cloned())
            .collect()
    }

    /// Process one command, then recompute. The per-event order is fixed:
    /// state update, axis, icon/cluster layout, badge diff.
    pub fn apply(&mut self, command: Command, sink: &mut dyn FocusSink) -> TimelineFrame {
        match command {
            Command::Zoom(requested) => {
                let next = ZoomTransform::clamped(requested.tx, requested.k, self.track_width);
                // A changed scale factor invalidates earlier expand
                // decisions; panning alone keeps them.
                if next.scale_changed(self.last_scale) {
                    self.expanded.clear();
                }
                self.last_scale = next.k;
                self.transform = next;
            }
            Command::Resize { track_width } => {
                self.track_width = track_width.max(1.0);
                if let Some(scale) = &self.scale {
                    self.scale = Some(scale.with_track_width(self.track_width));
                }
                self.transform =
                    ZoomTransform::clamped(self.transform.tx, self.transform.k, self.track_width);
            }
            Command::ToggleLane(lane) => {
                if lane < self.lanes.len() && !self.hidden_lanes.remove(&lane) {
                    self.hidden_lanes.insert(lane);
                }
            }
            Command::ExpandCluster(ids) => {
                self.expanded.extend(ids);
            }
            Command::Focus { id, skip_pan } => {
                self.focus_trip(id, skip_pan, sink);
            }
        }
        self.recompute()
    }

    /// Full recompute-and-render at the current state. Idempotent.
    pub fn recompute(&mut self) -> TimelineFrame {
        let Some(scale) = &self.scale else {
            self.prev_badges.clear();
            return TimelineFrame::default();
        };

        let mut commands = render_axis(scale, self.transform, self.lane_area_height());
        let hidden_types = self.hidden_types();
        let plan = layout(
            &self.store,
            &self.lanes,
            scale,
            self.transform,
            &hidden_types,
            &self.expanded,
        );
        commands.extend(render_plan(
            &plan,
            &self.store,
            &self.lanes,
            scale.track_width(),
            self.focused,
        ));
        let badge_diff = diff_badges(&self.prev_badges, &plan.badges);
        self.prev_badges = plan.badges.clone();

        TimelineFrame {
            commands,
            plan,
            badge_diff,
        }
    }

    /// Make `id` the focused trip. No-op when `id` is already focused or
    /// unknown. Unless `skip_pan`, the map collaborator is told to pan to
    /// the trip (coordinates permitting) and open its marker; the sidebar
    /// is always asked to reveal it.
    pub fn focus_trip(&mut self, id: u64, skip_pan: bool, sink: &mut dyn FocusSink) {
        if self.focused == Some(id) {
            return;
        }
        let Some(record) = self.store.record(id) else {
            return;
        };
        let location = record.location;
        self.focused = Some(id);
        sink.reveal_in_sidebar(id);
        if !skip_pan && let Some(location) = location {
            sink.pan_to(location);
            sink.open_marker(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::cluster::MERGE_GAP;

    fn record(id: u64, date: &str, event_type: &str) -> TripRecord {
        TripRecord {
            id,
            date: date.parse().expect("test date"),
            event_type: SharedStr::from(event_type),
            location: GeoPoint::from_pair(40.0 + id as f64, 20.0),
            summary: SharedStr::default(),
            description: SharedStr::default(),
            review: SharedStr::default(),
            rating: None,
            photos: Vec::new(),
        }
    }

    /// Three adjacent travel days plus one food day, on a track dense
    /// enough that the travel days cluster at identity zoom.
    fn dense_session() -> Session {
        Session::new(
            vec![
                record(1, "2023-01-01", "flight"),
                record(2, "2023-01-02", "flight"),
                record(3, "2023-01-03", "flight"),
                record(4, "2023-01-02", "restaurant"),
            ],
            LaneSet::travel_default(),
            2196.0,
        )
    }

    #[derive(Default)]
    struct RecordingSink {
        pans: Vec<GeoPoint>,
        markers: Vec<u64>,
        revealed: Vec<u64>,
    }

    impl FocusSink for RecordingSink {
        fn pan_to(&mut self, location: GeoPoint) {
            self.pans.push(location);
        }
        fn open_marker(&mut self, id: u64) {
            self.markers.push(id);
        }
        fn reveal_in_sidebar(&mut self, id: u64) {
            self.revealed.push(id);
        }
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut session = dense_session();
        let a = session.recompute();
        let b = session.recompute();
        assert_eq!(a.commands, b.commands);
        assert_eq!(a.plan, b.plan);
        // Second run: every badge persists under its key.
        assert!(b.badge_diff.created.is_empty());
        assert!(b.badge_diff.removed.is_empty());
        assert_eq!(b.badge_diff.retained.len(), a.plan.badges.len());
    }

    #[test]
    fn expanding_a_badge_renders_members_individually() {
        let mut session = dense_session();
        let frame = session.recompute();
        assert_eq!(frame.plan.badges.len(), 1);
        let members = frame.plan.badges[0].members.clone();
        assert_eq!(members.len(), 3);

        let frame = session.apply(Command::ExpandCluster(members.clone()), &mut NullSink);
        assert!(frame.plan.badges.is_empty());
        let mut ids: Vec<u64> = frame.plan.icons.iter().map(|s| s.record).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(members.iter().all(|id| session.expanded().contains(id)));
    }

    #[test]
    fn scale_change_clears_expansion_pan_does_not() {
        let mut session = dense_session();
        let frame = session.recompute();
        let members = frame.plan.badges[0].members.clone();
        session.apply(Command::ExpandCluster(members), &mut NullSink);
        assert_eq!(session.expanded().len(), 3);

        // Pure pan at the same scale: expansion survives.
        session.apply(
            Command::Zoom(ZoomTransform { tx: -3.0, k: 1.0 }),
            &mut NullSink,
        );
        assert_eq!(session.expanded().len(), 3);

        // Sub-jitter scale wobble: still survives.
        session.apply(
            Command::Zoom(ZoomTransform {
                tx: -3.0,
                k: 1.0 + 1e-9,
            }),
            &mut NullSink,
        );
        assert_eq!(session.expanded().len(), 3);

        // A real scale change invalidates it; the members re-merge.
        let frame = session.apply(
            Command::Zoom(ZoomTransform { tx: 0.0, k: 1.5 }),
            &mut NullSink,
        );
        assert!(session.expanded().is_empty());
        assert_eq!(frame.plan.badges.len(), 1);
    }

    #[test]
    fn hiding_a_lane_leaves_other_lanes_untouched() {
        let mut session = dense_session();
        let with_food = session.recompute();

        // Hide Food (lane 2): Travel clustering must be identical to a run
        // where Food never existed.
        let without_food = session.apply(Command::ToggleLane(2), &mut NullSink);
        assert_eq!(with_food.plan.badges, without_food.plan.badges);
        assert!(without_food.plan.hidden.contains(&4));
        assert!(!without_food.plan.icons.iter().any(|s| s.record == 4));

        let mut food_free = Session::new(
            vec![
                record(1, "2023-01-01", "flight"),
                record(2, "2023-01-02", "flight"),
                record(3, "2023-01-03", "flight"),
            ],
            LaneSet::travel_default(),
            2196.0,
        );
        let reference = food_free.recompute();
        assert_eq!(without_food.plan.badges, reference.plan.badges);
        assert_eq!(without_food.plan.icons, reference.plan.icons);

        // Toggling back restores the food icon.
        let restored = session.apply(Command::ToggleLane(2), &mut NullSink);
        assert!(restored.plan.icons.iter().any(|s| s.record == 4));
    }

    #[test]
    fn focus_is_singular_and_silent_on_misses() {
        let mut session = dense_session();
        let mut sink = RecordingSink::default();

        session.focus_trip(1, false, &mut sink);
        assert_eq!(session.focused(), Some(1));
        session.focus_trip(1, false, &mut sink);
        // Refocusing the same trip is a no-op.
        assert_eq!(sink.revealed, vec![1]);

        session.focus_trip(999, false, &mut sink);
        assert_eq!(session.focused(), Some(1));
        assert_eq!(sink.revealed, vec![1]);

        session.focus_trip(2, false, &mut sink);
        assert_eq!(session.focused(), Some(2));
        assert_eq!(sink.markers, vec![1, 2]);
        assert_eq!(sink.pans.len(), 2);
    }

    #[test]
    fn skip_pan_suppresses_map_calls_only() {
        let mut session = dense_session();
        let mut sink = RecordingSink::default();
        session.focus_trip(3, true, &mut sink);
        assert_eq!(session.focused(), Some(3));
        assert_eq!(sink.revealed, vec![3]);
        assert!(sink.pans.is_empty());
        assert!(sink.markers.is_empty());
    }

    #[test]
    fn focus_without_coordinates_never_pans() {
        let mut no_coords = record(7, "2023-02-01", "hike");
        no_coords.location = None;
        let mut session = Session::new(vec![no_coords], LaneSet::travel_default(), 800.0);
        let mut sink = RecordingSink::default();
        session.focus_trip(7, false, &mut sink);
        assert_eq!(session.focused(), Some(7));
        assert_eq!(sink.revealed, vec![7]);
        assert!(sink.pans.is_empty());
        assert!(sink.markers.is_empty());
    }

    #[test]
    fn empty_log_disables_timeline_quietly() {
        let mut session = Session::new(Vec::new(), LaneSet::travel_default(), 800.0);
        let frame = session.recompute();
        assert!(frame.commands.is_empty());
        assert!(frame.plan.icons.is_empty());
        assert!(frame.plan.badges.is_empty());
        // Commands still process without a timeline.
        let frame = session.apply(Command::ToggleLane(0), &mut NullSink);
        assert_eq!(frame, TimelineFrame::default());
    }

    #[test]
    fn resize_rescales_without_losing_zoom() {
        let mut session = dense_session();
        session.apply(
            Command::Zoom(ZoomTransform { tx: -100.0, k: 2.0 }),
            &mut NullSink,
        );
        let frame = session.apply(
            Command::Resize {
                track_width: 1098.0,
            },
            &mut NullSink,
        );
        assert!((session.transform().k - 2.0).abs() < f64::EPSILON);
        // Halving the track halves pixel distances; the travel days still
        // cluster, now on the narrower track.
        assert_eq!(frame.plan.badges.len(), 1);
    }

    #[test]
    fn separated_clusters_keep_their_distance() {
        // Sanity-check the merge invariant end to end at a mid zoom.
        let mut session = Session::new(
            vec![
                record(1, "2023-01-01", "flight"),
                record(2, "2023-01-02", "flight"),
                record(3, "2023-06-01", "flight"),
            ],
            LaneSet::travel_default(),
            2196.0,
        );
        let frame = session.recompute();
        let travel: Vec<_> = frame
            .plan
            .badges
            .iter()
            .filter(|b| b.key.lane == 0)
            .collect();
        // January pair merges; June stays out as an icon.
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].members, vec![1, 2]);
        assert!(frame.plan.icons.iter().any(|s| s.record == 3));
        for pair in travel.windows(2) {
            assert!(pair[1].center - pair[0].center >= MERGE_GAP);
        }
    }
}
