use eframe::egui;
use wayline_core::model::{GeoPoint, LaneSet};
use wayline_core::session::{Command, FocusSink, Session};
use wayline_core::timeline::ZoomTransform;
use wayline_protocol::ThemeToken;

use crate::renderer::{self, HitTarget};
use crate::theme::{self, ThemeMode};

const TIMELINE_TOP_PAD: f32 = 8.0;

/// The external map collaborator, reduced to a pan target readout until a
/// tile widget is wired in.
#[derive(Default)]
struct MapStub {
    target: Option<GeoPoint>,
}

impl FocusSink for MapStub {
    fn pan_to(&mut self, location: GeoPoint) {
        self.target = Some(location);
    }
    fn open_marker(&mut self, _id: u64) {}
    fn reveal_in_sidebar(&mut self, _id: u64) {}
}

/// Main application state.
pub struct WaylineApp {
    session: Option<Session>,
    theme_mode: ThemeMode,
    map: MapStub,
    error: Option<String>,
}

impl WaylineApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_data: Option<Vec<u8>>) -> Self {
        cc.egui_ctx.set_visuals(theme::dark_visuals());
        let mut app = Self {
            session: None,
            theme_mode: ThemeMode::Dark,
            map: MapStub::default(),
            error: None,
        };
        if let Some(data) = initial_data {
            app.load_trips(&data);
        }
        app
    }

    fn load_trips(&mut self, data: &[u8]) {
        match wayline_core::ingest::parse_auto(data) {
            Ok(records) => {
                log::info!("loaded {} trips", records.len());
                self.session = Some(Session::new(records, LaneSet::travel_default(), 800.0));
                self.error = None;
            }
            Err(e) => {
                self.error = Some(format!("Failed to parse trips: {e}"));
            }
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("🧭 wayline");
                ui.separator();

                if ui.button("📂 Open").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("Trip log", &["csv", "json"])
                        .pick_file()
                {
                    match std::fs::read(&path) {
                        Ok(data) => self.load_trips(&data),
                        Err(e) => {
                            self.error = Some(format!("Failed to read file: {e}"));
                        }
                    }
                }

                ui.separator();

                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "🌙 Dark",
                    ThemeMode::Light => "☀ Light",
                };
                if ui.button(theme_label).clicked() {
                    self.theme_mode = match self.theme_mode {
                        ThemeMode::Dark => {
                            ctx.set_visuals(theme::light_visuals());
                            ThemeMode::Light
                        }
                        ThemeMode::Light => {
                            ctx.set_visuals(theme::dark_visuals());
                            ThemeMode::Dark
                        }
                    };
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(session) = &self.session {
                        ui.label(format!("{:.0}%", session.transform().k * 100.0));
                    }
                });
            });
        });
    }

    fn status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                } else if let Some(session) = &self.session {
                    let mut status = format!(
                        "{} trips | {} on map | zoom {:.0}%",
                        session.store().len(),
                        session.store().located().count(),
                        session.transform().k * 100.0,
                    );
                    if let Some(target) = self.map.target {
                        status.push_str(&format!(" | map → {:.3}, {:.3}", target.lat, target.lng));
                    }
                    ui.label(status);
                } else {
                    ui.label("No trip log loaded — click Open or drag & drop a file");
                }
            });
        });
    }

    fn sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar")
            .default_width(230.0)
            .show(ctx, |ui| {
                let Some(session) = &mut self.session else {
                    ui.label("No trips loaded.");
                    return;
                };

                ui.heading("Lanes");
                let rows: Vec<(usize, String, usize, bool)> = (0..session.lanes().len())
                    .filter_map(|i| {
                        let lane = session.lanes().get(i)?;
                        let count: usize = session
                            .store()
                            .day_groups(i)
                            .iter()
                            .map(|g| g.records.len())
                            .sum();
                        Some((i, lane.name.to_string(), count, !session.lane_hidden(i)))
                    })
                    .collect();
                for (i, name, count, mut visible) in rows {
                    if ui
                        .checkbox(&mut visible, format!("{name} ({count})"))
                        .changed()
                    {
                        session.apply(Command::ToggleLane(i), &mut self.map);
                    }
                }
                let stray = session.store().uncategorized().len();
                if stray > 0 {
                    ui.label(format!("Uncategorized: {stray}"));
                }

                ui.separator();
                ui.heading("Focused trip");
                let focused = session
                    .focused()
                    .and_then(|id| session.store().record(id))
                    .cloned();
                match focused {
                    Some(record) => {
                        ui.label(format!(
                            "{} · {}",
                            record.date.format("%B %d, %Y"),
                            record.event_type
                        ));
                        if !record.summary.is_empty() {
                            ui.strong(record.summary.as_str());
                        }
                        if !record.description.is_empty() {
                            ui.label(record.description.as_str());
                        }
                        if !record.review.is_empty() {
                            ui.label(format!("“{}”", record.review));
                        }
                        if let Some(rating) = record.rating {
                            ui.label(format!("Rating: {rating:.1}/5"));
                        }
                        if !record.photos.is_empty() {
                            ui.label(format!("{} photo(s)", record.photos.len()));
                        }
                        if record.location.is_none() {
                            ui.weak("No coordinates saved.");
                        }
                    }
                    None => {
                        ui.weak("Click an icon to focus a trip.");
                    }
                }
            });
    }

    fn timeline(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &mut self.session else {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(ui.available_height() / 3.0);
                        ui.heading("🧭");
                        ui.heading("Drop a trip log here or click Open");
                        ui.label("Supports the CSV and JSON travel-log exports");
                    });
                });
                return;
            };

            let available = ui.available_rect_before_wrap();
            if (f64::from(available.width()) - session.track_width()).abs() > 0.5 {
                session.apply(
                    Command::Resize {
                        track_width: f64::from(available.width()),
                    },
                    &mut self.map,
                );
            }

            let response = ui.allocate_rect(available, egui::Sense::click_and_drag());

            // Drag = pan at the current scale.
            if response.dragged() {
                let delta = response.drag_delta();
                if delta.x.abs() > 0.0 {
                    let t = session.transform();
                    session.apply(
                        Command::Zoom(ZoomTransform {
                            tx: t.tx + f64::from(delta.x),
                            k: t.k,
                        }),
                        &mut self.map,
                    );
                }
            }

            // Scroll wheel = zoom anchored at the cursor.
            let scroll = ui.input(|i| i.smooth_scroll_delta);
            if scroll.y.abs() > 0.1 {
                let anchor = ui
                    .input(|i| i.pointer.hover_pos())
                    .map_or(f64::from(available.width()) / 2.0, |pos| {
                        f64::from(pos.x - available.left())
                    });
                let t = session.transform();
                let k = (t.k * 2.0_f64.powf(f64::from(scroll.y) * 0.01))
                    .clamp(ZoomTransform::MIN_SCALE, ZoomTransform::MAX_SCALE);
                let tx = anchor - (anchor - t.tx) * (k / t.k);
                session.apply(Command::Zoom(ZoomTransform { tx, k }), &mut self.map);
            }

            // Horizontal scroll (trackpad) = pan.
            if scroll.x.abs() > 0.1 {
                let t = session.transform();
                session.apply(
                    Command::Zoom(ZoomTransform {
                        tx: t.tx + f64::from(scroll.x),
                        k: t.k,
                    }),
                    &mut self.map,
                );
            }

            let frame_data = session.recompute();
            let painter = ui.painter_at(available);
            painter.rect_filled(
                available,
                egui::CornerRadius::ZERO,
                theme::resolve(ThemeToken::Background, self.theme_mode),
            );
            let origin = egui::Pos2::new(available.left(), available.top() + TIMELINE_TOP_PAD);
            let result =
                renderer::render_commands(&painter, &frame_data.commands, origin, self.theme_mode);

            // Click: focus an icon or expand a badge.
            if response.clicked()
                && let Some(pos) = response.interact_pointer_pos()
            {
                let hit = result
                    .hit_regions
                    .iter()
                    .find(|h| h.rect.contains(pos))
                    .map(|h| h.target.clone());
                match hit {
                    Some(HitTarget::Icon(id)) => {
                        session.apply(
                            Command::Focus {
                                id,
                                skip_pan: false,
                            },
                            &mut self.map,
                        );
                    }
                    Some(HitTarget::Badge(members)) => {
                        session.apply(Command::ExpandCluster(members), &mut self.map);
                    }
                    None => {}
                }
            }

            // Hover tooltip with the trip's display payload.
            if let Some(hover_pos) = ui.input(|i| i.pointer.hover_pos())
                && available.contains(hover_pos)
            {
                for hit in &result.hit_regions {
                    if !hit.rect.contains(hover_pos) {
                        continue;
                    }
                    match &hit.target {
                        HitTarget::Icon(id) => {
                            if let Some(record) = session.store().record(*id) {
                                let text = format!(
                                    "{}\n{}",
                                    record.date.format("%B %d, %Y"),
                                    record.summary
                                );
                                #[allow(deprecated)]
                                egui::show_tooltip_at_pointer(
                                    ui.ctx(),
                                    ui.layer_id(),
                                    egui::Id::new("trip_tooltip"),
                                    |ui| {
                                        ui.label(text);
                                    },
                                );
                            }
                        }
                        HitTarget::Badge(members) => {
                            let text = format!("{} trips — click to expand", members.len());
                            #[allow(deprecated)]
                            egui::show_tooltip_at_pointer(
                                ui.ctx(),
                                ui.layer_id(),
                                egui::Id::new("trip_tooltip"),
                                |ui| {
                                    ui.label(text);
                                },
                            );
                        }
                    }
                    break;
                }
            }
        });
    }

    fn handle_drops(&mut self, ctx: &egui::Context) {
        let dropped: Option<Vec<u8>> = ctx.input(|i| {
            i.raw.dropped_files.first().and_then(|file| {
                file.bytes
                    .as_ref()
                    .map(|b| b.to_vec())
                    .or_else(|| file.path.as_ref().and_then(|p| std::fs::read(p).ok()))
            })
        });
        if let Some(data) = dropped {
            self.load_trips(&data);
        }
    }
}

impl eframe::App for WaylineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.toolbar(ctx);
        self.status_bar(ctx);
        self.sidebar(ctx);
        self.timeline(ctx);
        self.handle_drops(ctx);
    }
}
