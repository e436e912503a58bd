use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::Block,
};
use wayline_core::model::GeoPoint;
use wayline_core::session::{Command, FocusSink, Session};
use wayline_core::timeline::{ROW_HEIGHT, ZoomTransform};
use wayline_protocol::{RenderCommand, ThemeToken};

/// Track pixels represented by one terminal cell.
const PX_PER_CELL: f64 = 8.0;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::AccentCoral => Color::Red,
        ThemeToken::AccentAmber => Color::Yellow,
        ThemeToken::AccentGreen => Color::Green,
        ThemeToken::AccentBlue => Color::Blue,
        ThemeToken::AccentMauve => Color::Magenta,
        ThemeToken::AccentTeal => Color::Cyan,
        ThemeToken::AccentNeutral => Color::Gray,
        ThemeToken::Background | ThemeToken::Surface => Color::Black,
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::LaneBackground => Color::Black,
        ThemeToken::LaneBorder => Color::DarkGray,
        ThemeToken::LaneLabelText => Color::White,
        ThemeToken::AxisLine | ThemeToken::AxisTick => Color::DarkGray,
        ThemeToken::AxisTickText => Color::Gray,
        ThemeToken::GridLine => Color::DarkGray,
        ThemeToken::BadgeBackground => Color::DarkGray,
        ThemeToken::BadgeBorder => Color::Gray,
        ThemeToken::BadgeText => Color::White,
        ThemeToken::FocusRing => Color::LightYellow,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::ToolbarBackground => Color::DarkGray,
        ThemeToken::ToolbarText => Color::White,
    }
}

/// The external map collaborator, reduced to a status line.
#[derive(Default)]
struct MapStatus {
    target: Option<GeoPoint>,
    marker: Option<u64>,
}

impl FocusSink for MapStatus {
    fn pan_to(&mut self, location: GeoPoint) {
        self.target = Some(location);
    }
    fn open_marker(&mut self, id: u64) {
        self.marker = Some(id);
    }
    fn reveal_in_sidebar(&mut self, _id: u64) {}
}

/// What a screen cell stands for, for mouse hit-testing.
enum Hit {
    Icon(u64),
    Badge(Vec<u64>),
}

struct HitRegion {
    row: u16,
    col_start: u16,
    col_end: u16,
    hit: Hit,
}

pub fn render_tui(mut session: Session) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut map = MapStatus::default();
    let mut last_cols: u16 = 0;
    let result = event_loop(&mut terminal, &mut session, &mut map, &mut last_cols);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    session: &mut Session,
    map: &mut MapStatus,
    last_cols: &mut u16,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        if size.width != *last_cols {
            *last_cols = size.width;
            session.apply(
                Command::Resize {
                    track_width: f64::from(size.width) * PX_PER_CELL,
                },
                map,
            );
        }

        let frame_data = session.recompute();
        let mut hits: Vec<HitRegion> = Vec::new();
        let focused_summary = session
            .focused()
            .and_then(|id| session.store().record(id))
            .map(|r| format!("{} — {}", r.date.format("%Y-%m-%d"), r.summary));
        let lane_count = session.lanes().len() as u16;
        let transform = session.transform();

        terminal.draw(|frame| {
            let area = frame.area();
            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " wayline — {} trips | ←→ pan | +/- zoom | 1-{lane_count} lanes | e expand | tab focus | q quit ",
                    session.store().len(),
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let col_scale = 1.0 / PX_PER_CELL;
            let lane_rows_top = 1u16;
            let axis_row = lane_rows_top + lane_count;
            let status_row = area.height.saturating_sub(1);

            let buf = frame.buffer_mut();
            let mut in_axis = false;

            for cmd in &frame_data.commands {
                match cmd {
                    RenderCommand::BeginGroup { id, .. } => {
                        in_axis = id.as_str() == "axis";
                    }
                    RenderCommand::EndGroup => in_axis = false,

                    RenderCommand::DrawText {
                        position,
                        text,
                        color,
                        ..
                    } => {
                        let row = if in_axis {
                            axis_row
                        } else {
                            // Lane label: y is the strip's vertical center.
                            lane_rows_top + (position.y / ROW_HEIGHT) as u16
                        };
                        if row >= status_row {
                            continue;
                        }
                        let col = (position.x * col_scale) as u16;
                        let fg = theme_to_color(*color);
                        put_str(buf, area, col, row, text.as_str(), fg, Color::Black);
                    }

                    RenderCommand::DrawIcon {
                        at,
                        glyph,
                        color,
                        record_id,
                        focused,
                    } => {
                        let row = lane_rows_top + (at.y / ROW_HEIGHT) as u16;
                        let col = (at.x * col_scale) as u16;
                        if row >= status_row || col >= area.width {
                            continue;
                        }
                        let fg = theme_to_color(*color);
                        let bg = if *focused {
                            theme_to_color(ThemeToken::FocusRing)
                        } else {
                            Color::Black
                        };
                        buf[(col, row)].set_char(*glyph).set_fg(fg).set_bg(bg);
                        hits.push(HitRegion {
                            row,
                            col_start: col,
                            col_end: col,
                            hit: Hit::Icon(*record_id),
                        });
                    }

                    RenderCommand::DrawBadge {
                        center,
                        count,
                        color,
                        members,
                    } => {
                        let row = lane_rows_top + (center.y / ROW_HEIGHT) as u16;
                        let label = format!("({count})");
                        let half = label.len() as u16 / 2;
                        let col = ((center.x * col_scale) as u16).saturating_sub(half);
                        if row >= status_row || col >= area.width {
                            continue;
                        }
                        let fg = theme_to_color(*color);
                        put_str(
                            buf,
                            area,
                            col,
                            row,
                            &label,
                            fg,
                            theme_to_color(ThemeToken::BadgeBackground),
                        );
                        hits.push(HitRegion {
                            row,
                            col_start: col,
                            col_end: col + label.len() as u16,
                            hit: Hit::Badge(members.clone()),
                        });
                    }

                    // Lines and rects carry no extra information at cell
                    // resolution.
                    RenderCommand::DrawLine { .. } | RenderCommand::DrawRect { .. } => {}
                }
            }

            // Status line: zoom, hidden lanes, focus, and the map stub.
            let hidden: Vec<String> = (0..session.lanes().len())
                .filter(|&i| session.lane_hidden(i))
                .filter_map(|i| session.lanes().get(i))
                .map(|l| l.name.to_string())
                .collect();
            let mut status = format!("zoom {:.0}%", transform.k * 100.0);
            if !hidden.is_empty() {
                status.push_str(&format!(" | hidden: {}", hidden.join(", ")));
            }
            if let Some(summary) = &focused_summary {
                status.push_str(&format!(" | focus: {summary}"));
            }
            if let Some(target) = map.target {
                status.push_str(&format!(" | map → {:.2},{:.2}", target.lat, target.lng));
                if let Some(marker) = map.marker {
                    status.push_str(&format!(" (marker #{marker})"));
                }
            }
            put_str(
                buf,
                area,
                0,
                status_row,
                &status,
                Color::White,
                Color::DarkGray,
            );
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left | KeyCode::Char('h') => {
                        pan(session, map, 4.0 * PX_PER_CELL);
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        pan(session, map, -4.0 * PX_PER_CELL);
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        zoom(session, map, 1.25);
                    }
                    KeyCode::Char('-') => {
                        zoom(session, map, 0.8);
                    }
                    KeyCode::Char('0') => {
                        session.apply(Command::Zoom(ZoomTransform::IDENTITY), map);
                    }
                    KeyCode::Char(c @ '1'..='9') => {
                        let lane = (c as usize) - ('1' as usize);
                        if lane < session.lanes().len() {
                            session.apply(Command::ToggleLane(lane), map);
                        }
                    }
                    KeyCode::Char('e') => {
                        // Expand every visible badge.
                        let members: Vec<u64> = frame_data
                            .plan
                            .badges
                            .iter()
                            .flat_map(|b| b.members.iter().copied())
                            .collect();
                        if !members.is_empty() {
                            session.apply(Command::ExpandCluster(members), map);
                        }
                    }
                    KeyCode::Tab => cycle_focus(session, map, 1),
                    KeyCode::BackTab => cycle_focus(session, map, -1),
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        let found = hits.iter().find(|h| {
                            h.row == mouse.row
                                && mouse.column >= h.col_start
                                && mouse.column <= h.col_end
                        });
                        match found.map(|h| &h.hit) {
                            Some(Hit::Icon(id)) => {
                                session.apply(
                                    Command::Focus {
                                        id: *id,
                                        skip_pan: false,
                                    },
                                    map,
                                );
                            }
                            Some(Hit::Badge(members)) => {
                                session.apply(Command::ExpandCluster(members.clone()), map);
                            }
                            None => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn put_str(
    buf: &mut ratatui::buffer::Buffer,
    area: Rect,
    col: u16,
    row: u16,
    text: &str,
    fg: Color,
    bg: Color,
) {
    for (i, ch) in text.chars().enumerate() {
        let x = col.saturating_add(i as u16);
        if x >= area.width || row >= area.height {
            break;
        }
        buf[(x, row)].set_char(ch).set_fg(fg).set_bg(bg);
    }
}

fn pan(session: &mut Session, map: &mut MapStatus, delta: f64) {
    let t = session.transform();
    session.apply(
        Command::Zoom(ZoomTransform {
            tx: t.tx + delta,
            k: t.k,
        }),
        map,
    );
}

/// Zoom by `factor`, anchored at the viewport center.
fn zoom(session: &mut Session, map: &mut MapStatus, factor: f64) {
    let t = session.transform();
    let anchor = session.track_width() / 2.0;
    let k = (t.k * factor).clamp(ZoomTransform::MIN_SCALE, ZoomTransform::MAX_SCALE);
    let tx = anchor - (anchor - t.tx) * (k / t.k);
    session.apply(Command::Zoom(ZoomTransform { tx, k }), map);
}

fn cycle_focus(session: &mut Session, map: &mut MapStatus, step: i64) {
    let mut ids: Vec<u64> = session.store().records().iter().map(|r| r.id).collect();
    if ids.is_empty() {
        return;
    }
    ids.sort_unstable();
    let next = match session.focused() {
        Some(current) => {
            let pos = ids.iter().position(|&id| id == current).unwrap_or(0) as i64;
            let len = ids.len() as i64;
            ids[((pos + step).rem_euclid(len)) as usize]
        }
        None => ids[0],
    };
    session.apply(
        Command::Focus {
            id: next,
            skip_pan: false,
        },
        map,
    );
}
