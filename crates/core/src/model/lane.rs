use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use wayline_protocol::{SharedStr, ThemeToken};

/// A lane is the fundamental layout primitive — one horizontal category
/// strip on the timeline, owning a set of event types.
#[derive(Debug, Clone)]
pub struct Lane {
    pub name: SharedStr,
    /// Accent token used for this lane's icons and badges.
    pub color: ThemeToken,
    /// Icon glyph drawn for records in this lane.
    pub glyph: char,
    pub types: Vec<SharedStr>,
}

/// Where a record's event type lands in the lane model.
///
/// Unknown types are an explicit variant, not a silent lookup miss: they
/// keep the fallback glyph and neutral accent, stay visible to map and
/// sidebar consumers, and own no timeline strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneAssignment {
    Lane(usize),
    Uncategorized,
}

#[derive(Debug, Error)]
pub enum LaneConfigError {
    #[error("event type {0:?} is owned by more than one lane")]
    DuplicateType(String),
    #[error("unknown accent color {0:?}")]
    UnknownColor(String),
    #[error("lane config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// The ordered, startup-fixed set of lanes.
///
/// Lane ownership partitions the universe of known event types: validation
/// rejects a type claimed by two lanes.
#[derive(Debug, Clone)]
pub struct LaneSet {
    lanes: Vec<Lane>,
    index: HashMap<SharedStr, usize>,
}

impl LaneSet {
    pub fn new(lanes: Vec<Lane>) -> Result<Self, LaneConfigError> {
        let mut index = HashMap::new();
        for (i, lane) in lanes.iter().enumerate() {
            for ty in &lane.types {
                if index.insert(ty.clone(), i).is_some() {
                    return Err(LaneConfigError::DuplicateType(ty.to_string()));
                }
            }
        }
        Ok(Self { lanes, index })
    }

    /// The default five-lane travel layout.
    pub fn travel_default() -> Self {
        let lanes = vec![
            lane("Travel", ThemeToken::AccentCoral, '✈', &[
                "flight", "train", "ferry", "drive", "bus",
            ]),
            lane("Hotel", ThemeToken::AccentBlue, '🏨', &["hotel", "camping"]),
            lane("Food", ThemeToken::AccentAmber, '🍜', &["restaurant", "cafe"]),
            lane("Culture", ThemeToken::AccentMauve, '🏛', &[
                "museum", "sight", "show",
            ]),
            lane("Walk", ThemeToken::AccentGreen, '🥾', &["hike", "walk"]),
        ];
        let mut index = HashMap::new();
        for (i, l) in lanes.iter().enumerate() {
            for ty in &l.types {
                index.insert(ty.clone(), i);
            }
        }
        Self { lanes, index }
    }

    /// Load lanes from a `[[lanes]]` TOML table.
    pub fn from_toml(text: &str) -> Result<Self, LaneConfigError> {
        let file: LaneFile = toml::from_str(text)?;
        let mut lanes = Vec::with_capacity(file.lanes.len());
        for entry in file.lanes {
            let color = ThemeToken::accent(&entry.color)
                .ok_or_else(|| LaneConfigError::UnknownColor(entry.color.clone()))?;
            lanes.push(Lane {
                name: SharedStr::from(entry.name),
                color,
                glyph: entry.glyph,
                types: entry.types.into_iter().map(SharedStr::from).collect(),
            });
        }
        Self::new(lanes)
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn assign(&self, event_type: &str) -> LaneAssignment {
        match self.index.get(event_type) {
            Some(&i) => LaneAssignment::Lane(i),
            None => LaneAssignment::Uncategorized,
        }
    }

    /// Accent for an event type; neutral for types no lane owns.
    pub fn color_of(&self, event_type: &str) -> ThemeToken {
        match self.assign(event_type) {
            LaneAssignment::Lane(i) => self.lanes[i].color,
            LaneAssignment::Uncategorized => ThemeToken::AccentNeutral,
        }
    }

    /// Glyph for an event type; a question mark for types no lane owns.
    pub fn glyph_of(&self, event_type: &str) -> char {
        match self.assign(event_type) {
            LaneAssignment::Lane(i) => self.lanes[i].glyph,
            LaneAssignment::Uncategorized => '?',
        }
    }
}

fn lane(name: &str, color: ThemeToken, glyph: char, types: &[&str]) -> Lane {
    Lane {
        name: SharedStr::from(name),
        color,
        glyph,
        types: types.iter().map(|t| SharedStr::from(*t)).collect(),
    }
}

#[derive(Debug, Deserialize)]
struct LaneFile {
    lanes: Vec<LaneEntry>,
}

#[derive(Debug, Deserialize)]
struct LaneEntry {
    name: String,
    color: String,
    #[serde(default = "default_glyph")]
    glyph: char,
    types: Vec<String>,
}

fn default_glyph() -> char {
    '?'
}
