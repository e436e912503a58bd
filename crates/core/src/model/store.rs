use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::lane::{LaneAssignment, LaneSet};
use super::record::TripRecord;

/// All records sharing one lane and one calendar day, in ingestion order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub records: Vec<u64>,
}

/// The normalized record set plus its derived per-lane day grouping.
///
/// The grouping is built once at load and is independent of zoom; every
/// recompute reads it, none mutates it.
#[derive(Debug, Clone)]
pub struct EventStore {
    records: Vec<TripRecord>,
    by_id: HashMap<u64, usize>,
    lane_days: Vec<Vec<DayGroup>>,
    uncategorized: Vec<u64>,
}

impl EventStore {
    pub fn new(records: Vec<TripRecord>, lanes: &LaneSet) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect::<HashMap<_, _>>();

        let mut per_lane: Vec<BTreeMap<NaiveDate, Vec<u64>>> =
            (0..lanes.len()).map(|_| BTreeMap::new()).collect();
        let mut uncategorized = Vec::new();
        for record in &records {
            match lanes.assign(&record.event_type) {
                LaneAssignment::Lane(i) => {
                    per_lane[i].entry(record.date).or_default().push(record.id);
                }
                LaneAssignment::Uncategorized => uncategorized.push(record.id),
            }
        }
        let lane_days = per_lane
            .into_iter()
            .map(|days| {
                days.into_iter()
                    .map(|(day, records)| DayGroup { day, records })
                    .collect()
            })
            .collect();

        Self {
            records,
            by_id,
            lane_days,
            uncategorized,
        }
    }

    pub fn record(&self, id: u64) -> Option<&TripRecord> {
        self.by_id.get(&id).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    /// Day groups of one lane, sorted by day ascending. Empty for an
    /// out-of-range lane index.
    pub fn day_groups(&self, lane: usize) -> &[DayGroup] {
        self.lane_days.get(lane).map_or(&[], Vec::as_slice)
    }

    /// Records whose event type no lane owns. Still visible to map and
    /// sidebar consumers.
    pub fn uncategorized(&self) -> &[u64] {
        &self.uncategorized
    }

    /// Min and max record date, if any records exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// The map-eligible subset: records carrying coordinates.
    pub fn located(&self) -> impl Iterator<Item = &TripRecord> {
        self.records.iter().filter(|r| r.location.is_some())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::GeoPoint;
    use wayline_protocol::SharedStr;

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

    #[test]
    fn groups_by_lane_and_day() {
        let lanes = LaneSet::travel_default();
        let store = EventStore::new(
            vec![
                record(1, "2023-05-01", "flight"),
                record(2, "2023-05-01", "train"),
                record(3, "2023-05-03", "flight"),
                record(4, "2023-05-01", "museum"),
            ],
            &lanes,
        );

        let travel = store.day_groups(0);
        assert_eq!(travel.len(), 2);
        assert_eq!(travel[0].records, vec![1, 2]);
        assert_eq!(travel[1].records, vec![3]);

        let culture = store.day_groups(3);
        assert_eq!(culture.len(), 1);
        assert_eq!(culture[0].records, vec![4]);

        // Lanes with nothing on them are simply empty.
        assert!(store.day_groups(2).is_empty());
        assert!(store.day_groups(99).is_empty());
    }

    #[test]
    fn unknown_types_are_kept_but_own_no_lane() {
        let lanes = LaneSet::travel_default();
        let store = EventStore::new(vec![record(1, "2023-05-01", "submarine")], &lanes);
        assert_eq!(store.uncategorized(), &[1]);
        assert!((0..lanes.len()).all(|i| store.day_groups(i).is_empty()));
        assert!(store.record(1).is_some());
    }

    #[test]
    fn date_range_and_located_subset() {
        let lanes = LaneSet::travel_default();
        let mut with_coords = record(2, "2024-01-10", "hotel");
        with_coords.location = GeoPoint::from_pair(35.0, 135.7);
        let store = EventStore::new(vec![record(1, "2023-05-01", "flight"), with_coords], &lanes);

        let (min, max) = store.date_range().expect("non-empty store");
        assert_eq!(min, "2023-05-01".parse::<NaiveDate>().expect("date"));
        assert_eq!(max, "2024-01-10".parse::<NaiveDate>().expect("date"));
        assert_eq!(store.located().count(), 1);
    }

    #[test]
    fn empty_store() {
        let lanes = LaneSet::travel_default();
        let store = EventStore::new(Vec::new(), &lanes);
        assert!(store.is_empty());
        assert!(store.date_range().is_none());
    }
}
