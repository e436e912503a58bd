use wayline_protocol::{Point, RenderCommand, SharedStr, TextAlign, ThemeToken};

use super::scale::{TickUnit, TimeScale, ZoomTransform};

pub const AXIS_HEIGHT: f64 = 30.0;
const TICK_HEIGHT: f64 = 6.0;
const LABEL_OFFSET_Y: f64 = 18.0;
const FONT_SIZE: f64 = 10.0;

/// Hard cap on emitted ticks; the unit step function keeps real counts far
/// below this.
const MAX_TICKS: usize = 512;

/// Render the date axis for the visible range under `transform`.
///
/// The axis sits directly below the lane strips: a baseline at `axis_top`,
/// tick marks at unit boundaries, labels under the ticks, and gridlines
/// extending up through the lane area.
pub fn render_axis(
    scale: &TimeScale,
    transform: ZoomTransform,
    axis_top: f64,
) -> Vec<RenderCommand> {
    let width = scale.track_width();
    let unit = TickUnit::for_scale(transform.k);
    let (visible_start, visible_end) = transform.visible_days(scale);

    let mut commands = Vec::with_capacity(64);
    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from("axis"),
        label: None,
    });

    commands.push(RenderCommand::DrawLine {
        from: Point::new(0.0, axis_top),
        to: Point::new(width, axis_top),
        color: ThemeToken::AxisLine,
        width: 1.0,
    });

    let mut day = unit.floor(visible_start);
    for _ in 0..MAX_TICKS {
        if day > visible_end {
            break;
        }
        let x = transform.apply(scale.x(day));
        if (0.0..=width).contains(&x) {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, axis_top),
                to: Point::new(x, axis_top + TICK_HEIGHT),
                color: ThemeToken::AxisTick,
                width: 1.0,
            });
            commands.push(RenderCommand::DrawText {
                position: Point::new(x, axis_top + LABEL_OFFSET_Y),
                text: SharedStr::from(unit.label(day)),
                color: ThemeToken::AxisTickText,
                font_size: FONT_SIZE,
                align: TextAlign::Center,
            });
            if axis_top > 0.0 {
                commands.push(RenderCommand::DrawLine {
                    from: Point::new(x, 0.0),
                    to: Point::new(x, axis_top),
                    color: ThemeToken::GridLine,
                    width: 0.5,
                });
            }
        }
        day = unit.next(day);
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
