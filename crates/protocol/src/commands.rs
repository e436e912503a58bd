use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The engine emits a `Vec<RenderCommand>` per recompute. Renderers consume
/// the list sequentially — each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Filled rectangle (lane strips, panels).
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
    },

    /// Text at a position (lane labels, axis tick labels).
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Line segment (axis baseline, ticks, gridlines).
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// One trip icon, centered at `at`. `record_id` is the hit-test handle;
    /// `focused` marks the current cross-view selection.
    DrawIcon {
        at: Point,
        glyph: char,
        color: ThemeToken,
        record_id: u64,
        focused: bool,
    },

    /// A cluster count badge, centered at `center`. Clicking it expands
    /// `members` back into individual icons.
    DrawBadge {
        center: Point,
        count: u32,
        color: ThemeToken,
        members: Vec<u64>,
    },

    /// Begin a logical group (a lane, the axis). Renderers may use this for
    /// batching or layer separation.
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_roundtrip_through_json() {
        let cmds = vec![
            RenderCommand::DrawIcon {
                at: Point::new(40.0, 7.5),
                glyph: '✈',
                color: ThemeToken::AccentCoral,
                record_id: 3,
                focused: true,
            },
            RenderCommand::DrawBadge {
                center: Point::new(120.0, 22.5),
                count: 4,
                color: ThemeToken::AccentBlue,
                members: vec![5, 6, 7, 8],
            },
            RenderCommand::EndGroup,
        ];
        let json = serde_json::to_string(&cmds).expect("serialize");
        let back: Vec<RenderCommand> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cmds);
    }
}
