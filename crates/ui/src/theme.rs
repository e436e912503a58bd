use wayline_protocol::ThemeToken;

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
    .to_color32()
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    // Catppuccin Mocha palette
    use ThemeToken::*;
    match token {
        AccentCoral => ResolvedColor::rgb(0xf3, 0x8b, 0xa8), // Red
        AccentAmber => ResolvedColor::rgb(0xfa, 0xb3, 0x87), // Peach
        AccentGreen => ResolvedColor::rgb(0xa6, 0xe3, 0xa1), // Green
        AccentBlue => ResolvedColor::rgb(0x89, 0xb4, 0xfa),  // Blue
        AccentMauve => ResolvedColor::rgb(0xcb, 0xa6, 0xf7), // Mauve
        AccentTeal => ResolvedColor::rgb(0x94, 0xe2, 0xd5),  // Teal
        AccentNeutral => ResolvedColor::rgb(0xa6, 0xad, 0xc8), // Subtext0

        Background => ResolvedColor::rgb(0x11, 0x11, 0x1b), // Crust
        Surface => ResolvedColor::rgb(0x18, 0x18, 0x25),    // Mantle
        Border => ResolvedColor::rgb(0x31, 0x32, 0x44),     // Surface0

        LaneBackground => ResolvedColor::rgb(0x1e, 0x1e, 0x2e), // Base
        LaneBorder => ResolvedColor::rgb(0x31, 0x32, 0x44),
        LaneLabelText => ResolvedColor::rgb(0xa6, 0xad, 0xc8), // Subtext0

        AxisLine => ResolvedColor::rgb(0x45, 0x47, 0x5a), // Surface1
        AxisTick => ResolvedColor::rgb(0x45, 0x47, 0x5a),
        AxisTickText => ResolvedColor::rgb(0xba, 0xc2, 0xde), // Subtext1
        GridLine => ResolvedColor::rgba(0x31, 0x32, 0x44, 120),

        BadgeBackground => ResolvedColor::rgb(0x31, 0x32, 0x44),
        BadgeBorder => ResolvedColor::rgb(0x58, 0x5b, 0x70), // Surface2
        BadgeText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),   // Text

        FocusRing => ResolvedColor::rgb(0xf9, 0xe2, 0xaf), // Yellow

        TextPrimary => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),
        TextSecondary => ResolvedColor::rgb(0xba, 0xc2, 0xde),
        TextMuted => ResolvedColor::rgb(0xa6, 0xad, 0xc8),

        ToolbarBackground => ResolvedColor::rgb(0x18, 0x18, 0x25),
        ToolbarText => ResolvedColor::rgb(0xcd, 0xd6, 0xf4),
    }
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        AccentCoral => ResolvedColor::rgb(210, 60, 60),
        AccentAmber => ResolvedColor::rgb(220, 140, 20),
        AccentGreen => ResolvedColor::rgb(56, 142, 60),
        AccentBlue => ResolvedColor::rgb(40, 110, 210),
        AccentMauve => ResolvedColor::rgb(140, 80, 190),
        AccentTeal => ResolvedColor::rgb(20, 140, 140),
        AccentNeutral => ResolvedColor::rgb(120, 125, 140),

        Background => ResolvedColor::rgb(255, 255, 255),
        Surface => ResolvedColor::rgb(245, 245, 248),
        Border => ResolvedColor::rgb(210, 210, 220),

        LaneBackground => ResolvedColor::rgb(250, 250, 252),
        LaneBorder => ResolvedColor::rgb(215, 215, 224),
        LaneLabelText => ResolvedColor::rgb(100, 100, 110),

        AxisLine => ResolvedColor::rgb(180, 180, 190),
        AxisTick => ResolvedColor::rgb(180, 180, 190),
        AxisTickText => ResolvedColor::rgb(80, 80, 100),
        GridLine => ResolvedColor::rgba(0, 0, 0, 18),

        BadgeBackground => ResolvedColor::rgb(235, 235, 240),
        BadgeBorder => ResolvedColor::rgb(190, 190, 200),
        BadgeText => ResolvedColor::rgb(30, 30, 40),

        FocusRing => ResolvedColor::rgb(200, 150, 20),

        TextPrimary => ResolvedColor::rgb(20, 20, 30),
        TextSecondary => ResolvedColor::rgb(80, 80, 100),
        TextMuted => ResolvedColor::rgb(110, 110, 120),

        ToolbarBackground => ResolvedColor::rgb(248, 248, 250),
        ToolbarText => ResolvedColor::rgb(40, 40, 50),
    }
}

/// Dark visuals for egui widget chrome.
pub fn dark_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::dark();
    v.panel_fill = egui::Color32::from_rgb(0x18, 0x18, 0x25);
    v.window_fill = egui::Color32::from_rgb(0x1e, 0x1e, 0x2e);
    v.extreme_bg_color = egui::Color32::from_rgb(0x11, 0x11, 0x1b);
    v.faint_bg_color = egui::Color32::from_rgb(0x1e, 0x1e, 0x2e);
    v.selection.bg_fill = egui::Color32::from_rgba_unmultiplied(0x89, 0xb4, 0xfa, 60);
    v.selection.stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(0x89, 0xb4, 0xfa));
    v.hyperlink_color = egui::Color32::from_rgb(0x89, 0xb4, 0xfa);
    v.warn_fg_color = egui::Color32::from_rgb(0xf9, 0xe2, 0xaf);
    v.error_fg_color = egui::Color32::from_rgb(0xf3, 0x8b, 0xa8);
    v
}

/// Light visuals for egui widget chrome.
pub fn light_visuals() -> egui::Visuals {
    let mut v = egui::Visuals::light();
    v.panel_fill = egui::Color32::from_rgb(250, 250, 252);
    v.window_fill = egui::Color32::WHITE;
    v.selection.bg_fill = egui::Color32::from_rgba_unmultiplied(40, 110, 210, 50);
    v.selection.stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(40, 110, 210));
    v.hyperlink_color = egui::Color32::from_rgb(40, 110, 210);
    v.warn_fg_color = egui::Color32::from_rgb(220, 140, 20);
    v.error_fg_color = egui::Color32::from_rgb(210, 60, 60);
    v
}
