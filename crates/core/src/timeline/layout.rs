use std::collections::{HashMap, HashSet};

use wayline_protocol::{Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken};

use crate::model::{EventStore, LaneSet};

use super::cluster::{ICON_GAP, ICON_SIZE, compute_lane_clusters, group_width};
use super::scale::{TimeScale, ZoomTransform};

/// Height of one lane strip.
pub const ROW_HEIGHT: f64 = 15.0;
const LABEL_FONT_SIZE: f64 = 9.0;

/// One individually rendered icon: a record that is either the sole day in
/// its cluster or manually expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSlot {
    pub record: u64,
    pub lane: usize,
    pub x: f64,
    pub y: f64,
}

/// Stable identity of a badge across recomputes: lane plus rounded pixel
/// center. Badges that keep their key are updated in place by renderers,
/// preserving hover state and avoiding flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BadgeKey {
    pub lane: usize,
    pub center_px: i64,
}

/// A rendered cluster badge.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub key: BadgeKey,
    pub center: f64,
    pub y: f64,
    pub count: usize,
    pub members: Vec<u64>,
}

/// Full geometric output of one recompute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    pub icons: Vec<IconSlot>,
    pub badges: Vec<Badge>,
    /// Records with no individual icon this round: hidden by filter or
    /// absorbed into a multi-day badge.
    pub hidden: Vec<u64>,
}

/// Badge set changes between two consecutive recomputes, keyed by
/// [`BadgeKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadgeDiff {
    pub created: Vec<Badge>,
    pub retained: Vec<Badge>,
    pub removed: Vec<Badge>,
}

/// Pure layout: place every lane's icons and badges for the given zoom and
/// filter state. Calling it twice with identical inputs yields an identical
/// plan.
pub fn layout(
    store: &EventStore,
    lanes: &LaneSet,
    scale: &TimeScale,
    transform: ZoomTransform,
    hidden_types: &HashSet<SharedStr>,
    expanded: &HashSet<u64>,
) -> LayoutPlan {
    let mut plan = LayoutPlan::default();

    for lane in 0..lanes.len() {
        let y = lane as f64 * ROW_HEIGHT + ROW_HEIGHT / 2.0;

        for cluster in compute_lane_clusters(store, lane, scale, transform, hidden_types, expanded)
        {
            if cluster.is_cluster() {
                plan.hidden.extend(&cluster.records);
                plan.badges.push(Badge {
                    key: BadgeKey {
                        lane,
                        center_px: cluster.center.round() as i64,
                    },
                    center: cluster.center,
                    y,
                    count: cluster.len(),
                    members: cluster.records,
                });
            } else {
                place_row(&mut plan.icons, &cluster.records, lane, cluster.center, y);
            }
        }

        // Expanded records bypass clustering and render individually at
        // their day position.
        for group in store.day_groups(lane) {
            let exp: Vec<u64> = group
                .records
                .iter()
                .copied()
                .filter(|id| {
                    expanded.contains(id)
                        && store
                            .record(*id)
                            .is_some_and(|r| !hidden_types.contains(&r.event_type))
                })
                .collect();
            if exp.is_empty() {
                continue;
            }
            let x = transform.apply(scale.x(group.day));
            place_row(&mut plan.icons, &exp, lane, x, y);
        }
    }

    // Filtered-out records are hidden everywhere on the timeline.
    for record in store.records() {
        if hidden_types.contains(&record.event_type) {
            plan.hidden.push(record.id);
        }
    }
    plan.hidden.sort_unstable();
    plan.hidden.dedup();
    plan
}

/// Lay `records` out side by side, centered on `center`.
fn place_row(icons: &mut Vec<IconSlot>, records: &[u64], lane: usize, center: f64, y: f64) {
    let start = center - group_width(records.len()) / 2.0 + ICON_SIZE / 2.0;
    for (i, &record) in records.iter().enumerate() {
        icons.push(IconSlot {
            record,
            lane,
            x: start + i as f64 * (ICON_SIZE + ICON_GAP),
            y,
        });
    }
}

/// Diff two badge sets by stable key.
pub fn diff_badges(prev: &[Badge], next: &[Badge]) -> BadgeDiff {
    let prev_keys: HashMap<BadgeKey, &Badge> = prev.iter().map(|b| (b.key, b)).collect();
    let next_keys: HashSet<BadgeKey> = next.iter().map(|b| b.key).collect();

    let mut diff = BadgeDiff::default();
    for badge in next {
        if prev_keys.contains_key(&badge.key) {
            diff.retained.push(badge.clone());
        } else {
            diff.created.push(badge.clone());
        }
    }
    for badge in prev {
        if !next_keys.contains(&badge.key) {
            diff.removed.push(badge.clone());
        }
    }
    diff
}

/// Turn a plan into draw commands: lane strips and labels, then icons and
/// badges. Idempotent — pure function of its inputs.
pub fn render_plan(
    plan: &LayoutPlan,
    store: &EventStore,
    lanes: &LaneSet,
    track_width: f64,
    focused: Option<u64>,
) -> Vec<RenderCommand> {
    let mut commands =
        Vec::with_capacity(plan.icons.len() + plan.badges.len() + lanes.len() * 3 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from("lanes"),
        label: None,
    });

    for (i, lane) in lanes.lanes().iter().enumerate() {
        let top = i as f64 * ROW_HEIGHT;
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, top, track_width, ROW_HEIGHT),
            color: ThemeToken::LaneBackground,
            border_color: Some(ThemeToken::LaneBorder),
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(4.0, top + ROW_HEIGHT / 2.0),
            text: lane.name.clone(),
            color: ThemeToken::LaneLabelText,
            font_size: LABEL_FONT_SIZE,
            align: TextAlign::Left,
        });
    }

    for slot in &plan.icons {
        // Icons panned off the track are culled, not clamped.
        if slot.x < -ICON_SIZE || slot.x > track_width + ICON_SIZE {
            continue;
        }
        let Some(record) = store.record(slot.record) else {
            continue;
        };
        commands.push(RenderCommand::DrawIcon {
            at: Point::new(slot.x, slot.y),
            glyph: lanes.glyph_of(&record.event_type),
            color: lanes.color_of(&record.event_type),
            record_id: slot.record,
            focused: focused == Some(slot.record),
        });
    }

    for badge in &plan.badges {
        if badge.center < -ICON_SIZE || badge.center > track_width + ICON_SIZE {
            continue;
        }
        let color = lanes
            .get(badge.key.lane)
            .map_or(ThemeToken::AccentNeutral, |l| l.color);
        commands.push(RenderCommand::DrawBadge {
            center: Point::new(badge.center, badge.y),
            count: badge.count as u32,
            color,
            members: badge.members.clone(),
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TripRecord;
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

    fn dense_scale() -> TimeScale {
        let min: NaiveDate = "2023-01-01".parse().expect("date");
        let max: NaiveDate = "2023-01-03".parse().expect("date");
        // Two padded years over ~2200px: about 3px per day.
        TimeScale::new(min, max, 2196.0)
    }

    fn fixture() -> (EventStore, LaneSet) {
        let lanes = LaneSet::travel_default();
        let store = EventStore::new(
            vec![
                record(1, "2023-01-01", "flight"),
                record(2, "2023-01-02", "flight"),
                record(3, "2023-01-03", "flight"),
                record(4, "2023-01-02", "restaurant"),
            ],
            &lanes,
        );
        (store, lanes)
    }

    #[test]
    fn overlapping_days_become_one_badge() {
        let (store, lanes) = fixture();
        let scale = dense_scale();
        let plan = layout(
            &store,
            &lanes,
            &scale,
            ZoomTransform::IDENTITY,
            &HashSet::new(),
            &HashSet::new(),
        );

        // Travel lane: one badge with three members; Food lane: one solo icon.
        assert_eq!(plan.badges.len(), 1);
        assert_eq!(plan.badges[0].members, vec![1, 2, 3]);
        assert_eq!(plan.badges[0].key.lane, 0);
        assert_eq!(plan.icons.len(), 1);
        assert_eq!(plan.icons[0].record, 4);
        // Absorbed members are reported hidden.
        assert_eq!(plan.hidden, vec![1, 2, 3]);
    }

    #[test]
    fn expanded_members_render_individually() {
        let (store, lanes) = fixture();
        let scale = dense_scale();
        let expanded: HashSet<u64> = [1, 2, 3].into_iter().collect();
        let plan = layout(
            &store,
            &lanes,
            &scale,
            ZoomTransform::IDENTITY,
            &HashSet::new(),
            &expanded,
        );
        assert!(plan.badges.is_empty());
        let mut ids: Vec<u64> = plan.icons.iter().map(|s| s.record).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(plan.hidden.is_empty());
    }

    #[test]
    fn layout_is_idempotent() {
        let (store, lanes) = fixture();
        let scale = dense_scale();
        let a = layout(
            &store,
            &lanes,
            &scale,
            ZoomTransform::IDENTITY,
            &HashSet::new(),
            &HashSet::new(),
        );
        let b = layout(
            &store,
            &lanes,
            &scale,
            ZoomTransform::IDENTITY,
            &HashSet::new(),
            &HashSet::new(),
        );
        assert_eq!(a, b);
        assert_eq!(diff_badges(&a.badges, &b.badges).created, Vec::new());
        assert_eq!(diff_badges(&a.badges, &b.badges).removed, Vec::new());
    }

    #[test]
    fn badge_diff_matches_by_key() {
        let badge = |lane: usize, center: f64, members: Vec<u64>| Badge {
            key: BadgeKey {
                lane,
                center_px: center.round() as i64,
            },
            center,
            y: 7.5,
            count: members.len(),
            members,
        };
        let prev = vec![badge(0, 100.0, vec![1, 2]), badge(1, 250.0, vec![5, 6])];
        let next = vec![badge(0, 100.2, vec![1, 2, 3]), badge(2, 400.0, vec![9, 10])];

        let diff = diff_badges(&prev, &next);
        // 100.2 rounds to the same key as 100.0 — retained, count updated.
        assert_eq!(diff.retained.len(), 1);
        assert_eq!(diff.retained[0].count, 3);
        assert_eq!(diff.created.len(), 1);
        assert_eq!(diff.created[0].key.lane, 2);
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].key.lane, 1);
    }

    #[test]
    fn commands_carry_accents_and_focus() {
        let (store, lanes) = fixture();
        let scale = dense_scale();
        let plan = layout(
            &store,
            &lanes,
            &scale,
            ZoomTransform::IDENTITY,
            &HashSet::new(),
            &HashSet::new(),
        );
        let cmds = render_plan(&plan, &store, &lanes, scale.track_width(), Some(4));

        let icon = cmds
            .iter()
            .find_map(|c| match c {
                RenderCommand::DrawIcon {
                    record_id,
                    color,
                    focused,
                    ..
                } => Some((*record_id, *color, *focused)),
                _ => None,
            })
            .expect("one icon rendered");
        assert_eq!(icon, (4, ThemeToken::AccentAmber, true));

        let badge = cmds
            .iter()
            .find_map(|c| match c {
                RenderCommand::DrawBadge { count, color, .. } => Some((*count, *color)),
                _ => None,
            })
            .expect("one badge rendered");
        assert_eq!(badge, (3, ThemeToken::AccentCoral));
    }
}
