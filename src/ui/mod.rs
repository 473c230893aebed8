//! User interface for the pattern machine.
//!
//! # Module Organization
//!
//! - `state` - The [`PatternApp`] struct and its persisted settings
//! - `controls` - Config form, actions and the history view
//! - `rendering` - Painter adapter drawing render plans
//! - `platform` - Page URL and audio integration (web) or defaults (native)

mod controls;
mod platform;
mod rendering;
mod state;

pub use platform::{MediaAudio, MediaElement};
pub use rendering::{paint_surface, EguiMetrics};
pub use state::{Menu, PatternApp, PreviewTile, UiSettings};

use crate::constants::{APP_STATE_KEY, HISTORY_STORAGE_KEY};
use crate::randomizer::RandomizeOptions;
use eframe::egui;

impl eframe::App for PatternApp {
    /// Persist history and UI settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.settings.to_json() {
            Ok(json) => storage.set_string(APP_STATE_KEY, json),
            Err(err) => log::error!("Failed to serialize UI settings: {err}"),
        }
        if let Some(json) = self.controller.history_json() {
            storage.set_string(HISTORY_STORAGE_KEY, json);
        }
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.show(ctx);

        // Commits are persisted right away rather than on the next autosave.
        if let Some(json) = self.controller.take_history_json() {
            if let Some(storage) = frame.storage_mut() {
                storage.set_string(HISTORY_STORAGE_KEY, json);
            }
            platform::publish_fragment(&self.controller.encoded_config());
        }
    }
}

impl PatternApp {
    /// Runs one frame of the app against `ctx`.
    pub fn show(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        let screen = ctx.input(|i| i.screen_rect());

        self.track_viewport(screen.size());
        self.controller.tick(now);
        self.tick_previews(now);
        self.handle_shortcuts(ctx);

        self.draw_toggle_button(ctx);

        if self.controller.controls_visible() {
            let max_width = (screen.width() * 0.9).max(180.0);
            egui::SidePanel::left("controls_panel")
                .resizable(true)
                .default_width(self.settings.controls_panel_width.clamp(180.0, max_width))
                .show(ctx, |ui| {
                    self.settings.controls_panel_width = ui.available_width().clamp(180.0, max_width);
                    self.draw_controls(ui, now);
                });
        } else if !self.previews.is_empty() {
            self.clear_previews();
        }

        // The pattern fills the window behind the panels; clicking it rerolls.
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let response = ui.interact(
                    ui.max_rect(),
                    ui.id().with("pattern_surface"),
                    egui::Sense::click(),
                );
                if response.clicked() {
                    self.pending_commit = false;
                    self.controller.randomize(RandomizeOptions::default());
                }
            });

        if self.pending_commit && !ctx.is_using_pointer() && !ctx.wants_keyboard_input() {
            self.commit();
        }

        let painter = ctx.layer_painter(egui::LayerId::background());
        let metrics = EguiMetrics::new(&painter, self.surface_side);
        self.controller.render_if_needed(&metrics, now);
        paint_surface(
            &painter,
            screen,
            self.surface_side,
            self.controller.surface(),
            now,
        );

        self.schedule_repaint(ctx, now);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (space, left, right, toggle) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::H),
            )
        });
        if space {
            self.pending_commit = false;
            self.controller.randomize(RandomizeOptions::default());
        }
        if left {
            self.controller.history_back();
        }
        if right {
            self.controller.history_forward();
        }
        if toggle {
            let visible = self.controller.controls_visible();
            self.controller.set_controls_visible(!visible);
        }
    }

    fn draw_toggle_button(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("toggle_controls"))
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let visible = self.controller.controls_visible();
                let label = if visible { "Hide controls" } else { "Show controls" };
                if ui.button(label).clicked() {
                    self.controller.set_controls_visible(!visible);
                }
            });
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: f64) {
        if self.controller.surface().is_animated()
            || self.previews.iter().any(|tile| tile.surface.is_animated())
        {
            ctx.request_repaint();
        } else if let Some(due) = self.controller.next_wakeup() {
            let delay = (due - now).max(0.0);
            ctx.request_repaint_after(std::time::Duration::from_secs_f64(delay));
        }
    }
}

#[cfg(test)]
mod tests;
