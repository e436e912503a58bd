use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
///
/// The engine never emits concrete colors: lane configuration names an
/// accent token, and each render surface maps tokens to its own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Lane accents — the names lane config files may refer to.
    AccentCoral,
    AccentAmber,
    AccentGreen,
    AccentBlue,
    AccentMauve,
    AccentTeal,
    /// Fallback accent for event types no lane owns.
    AccentNeutral,

    Background,
    Surface,
    Border,

    LaneBackground,
    LaneBorder,
    LaneLabelText,

    AxisLine,
    AxisTick,
    AxisTickText,
    GridLine,

    BadgeBackground,
    BadgeBorder,
    BadgeText,

    FocusRing,

    TextPrimary,
    TextSecondary,
    TextMuted,

    ToolbarBackground,
    ToolbarText,
}

impl ThemeToken {
    /// Resolve an accent color name from lane configuration.
    pub fn accent(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "coral" | "red" => Some(Self::AccentCoral),
            "amber" | "orange" => Some(Self::AccentAmber),
            "green" => Some(Self::AccentGreen),
            "blue" => Some(Self::AccentBlue),
            "mauve" | "purple" => Some(Self::AccentMauve),
            "teal" => Some(Self::AccentTeal),
            "neutral" | "gray" | "grey" => Some(Self::AccentNeutral),
            _ => None,
        }
    }
}
