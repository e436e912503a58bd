use egui::{Align2, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};
use wayline_protocol::{RenderCommand, TextAlign, ThemeToken};

use crate::theme::{self, ThemeMode};

const ICON_FONT_SIZE: f32 = 12.0;
const BADGE_RADIUS: f32 = 8.0;

/// What a clickable region stands for.
#[derive(Debug, Clone)]
pub enum HitTarget {
    Icon(u64),
    Badge(Vec<u64>),
}

pub struct HitRegion {
    pub rect: Rect,
    pub target: HitTarget,
}

/// Result of rendering a command list: clickable regions for interaction.
pub struct RenderResult {
    pub hit_regions: Vec<HitRegion>,
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area.
pub fn render_commands(
    painter: &egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) -> RenderResult {
    let mut hit_regions: Vec<HitRegion> = Vec::new();

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
            } => {
                let egui_rect = Rect::from_min_size(
                    Pos2::new(rect.x as f32 + offset.x, rect.y as f32 + offset.y),
                    egui::vec2(rect.w as f32, rect.h as f32),
                );
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }
                painter.rect_filled(egui_rect, CornerRadius::ZERO, theme::resolve(*color, mode));
                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        CornerRadius::ZERO,
                        Stroke::new(1.0, theme::resolve(*bc, mode)),
                        StrokeKind::Inside,
                    );
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let pos = Pos2::new(position.x as f32 + offset.x, position.y as f32 + offset.y);
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };
                painter.text(
                    pos,
                    anchor,
                    text.as_ref(),
                    FontId::proportional(*font_size as f32),
                    theme::resolve(*color, mode),
                );
            }

            RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
            } => {
                let p1 = Pos2::new(from.x as f32 + offset.x, from.y as f32 + offset.y);
                let p2 = Pos2::new(to.x as f32 + offset.x, to.y as f32 + offset.y);
                painter.line_segment(
                    [p1, p2],
                    Stroke::new(*width as f32, theme::resolve(*color, mode)),
                );
            }

            RenderCommand::DrawIcon {
                at,
                glyph,
                color,
                record_id,
                focused,
            } => {
                let pos = Pos2::new(at.x as f32 + offset.x, at.y as f32 + offset.y);
                if !painter.clip_rect().contains(pos) {
                    continue;
                }
                if *focused {
                    painter.circle_stroke(
                        pos,
                        ICON_FONT_SIZE * 0.75,
                        Stroke::new(1.5, theme::resolve(ThemeToken::FocusRing, mode)),
                    );
                }
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    glyph.to_string(),
                    FontId::proportional(ICON_FONT_SIZE),
                    theme::resolve(*color, mode),
                );
                hit_regions.push(HitRegion {
                    rect: Rect::from_center_size(
                        pos,
                        egui::vec2(ICON_FONT_SIZE, ICON_FONT_SIZE),
                    ),
                    target: HitTarget::Icon(*record_id),
                });
            }

            RenderCommand::DrawBadge {
                center,
                count,
                color,
                members,
            } => {
                let pos = Pos2::new(center.x as f32 + offset.x, center.y as f32 + offset.y);
                if !painter.clip_rect().contains(pos) {
                    continue;
                }
                painter.circle_filled(
                    pos,
                    BADGE_RADIUS,
                    theme::resolve(ThemeToken::BadgeBackground, mode),
                );
                painter.circle_stroke(
                    pos,
                    BADGE_RADIUS,
                    Stroke::new(1.5, theme::resolve(*color, mode)),
                );
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    count.to_string(),
                    FontId::proportional(10.0),
                    theme::resolve(ThemeToken::BadgeText, mode),
                );
                hit_regions.push(HitRegion {
                    rect: Rect::from_center_size(
                        pos,
                        egui::vec2(BADGE_RADIUS * 2.0, BADGE_RADIUS * 2.0),
                    ),
                    target: HitTarget::Badge(members.clone()),
                });
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups are semantic — no visual effect in egui.
            }
        }
    }

    RenderResult { hit_regions }
}
