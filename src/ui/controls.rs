//! Controls panel: config form, actions and the history view.

use super::rendering::paint_surface;
use super::state::{Menu, PatternApp};
use crate::color::parse_hex;
use crate::constants::PREVIEW_TILE;
use crate::randomizer::RandomizeOptions;
use crate::types::{CharacterPack, FontFamily, PatternConfig, PACKS};
use eframe::egui;

fn hex_of([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

impl PatternApp {
    /// Draws the whole controls panel.
    pub fn draw_controls(&mut self, ui: &mut egui::Ui, now: f64) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.settings.menu, Menu::Config, "Config");
            ui.selectable_value(&mut self.settings.menu, Menu::History, "History");
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| match self.settings.menu {
            Menu::Config => self.draw_config_form(ui, now),
            Menu::History => self.draw_history_view(ui, now),
        });

        ui.separator();
        self.draw_actions(ui);

        if let Some(status) = self.status.clone() {
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                ui.label(status);
                if ui.small_button("✕").clicked() {
                    self.status = None;
                    self.controller.dismiss_error();
                }
            });
        }
    }

    /// Applies a form edit: debounced re-render now, commit once it settles.
    fn edit(&mut self, now: f64, apply: impl FnOnce(&mut PatternConfig)) {
        self.controller.edit(now, apply);
        self.pending_commit = true;
    }

    fn draw_config_form(&mut self, ui: &mut egui::Ui, now: f64) {
        let config = self.controller.config().clone();
        let ranges = self.controller.ranges();

        egui::Grid::new("config_form")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Pattern");
                let mut pattern = config.line_pattern.clone();
                if ui.text_edit_singleline(&mut pattern).changed() {
                    self.edit(now, |c| c.line_pattern = pattern);
                }
                ui.end_row();

                ui.label("Pack");
                let current_pack = config.pack().name;
                let mut chosen: Option<&'static CharacterPack> = None;
                egui::ComboBox::from_id_salt("pack")
                    .selected_text(current_pack)
                    .show_ui(ui, |ui| {
                        for pack in PACKS {
                            if ui
                                .selectable_label(pack.name == current_pack, pack.name)
                                .clicked()
                            {
                                chosen = Some(pack);
                            }
                        }
                    });
                if let Some(pack) = chosen {
                    self.pending_commit = false;
                    self.controller.select_pack(pack.name);
                }
                ui.end_row();

                ui.label("Font");
                let mut font = config.font_family;
                egui::ComboBox::from_id_salt("font_family")
                    .selected_text(font.name())
                    .show_ui(ui, |ui| {
                        for family in FontFamily::ALL {
                            ui.selectable_value(&mut font, family, family.name());
                        }
                    });
                if font != config.font_family {
                    self.edit(now, |c| c.font_family = font);
                }
                ui.end_row();

                ui.label("Font size");
                let mut font_size = config.font_size;
                if ui
                    .add(egui::Slider::new(&mut font_size, ranges.font_size_range()))
                    .changed()
                {
                    self.edit(now, |c| c.font_size = font_size);
                }
                ui.end_row();

                ui.label("Line height");
                let mut line_height = config.line_height;
                if ui
                    .add(egui::Slider::new(&mut line_height, ranges.line_height_range()))
                    .changed()
                {
                    self.edit(now, |c| c.line_height = line_height);
                }
                ui.end_row();

                ui.label("Letter spacing");
                let mut letter_spacing = config.letter_spacing;
                if ui
                    .add(egui::Slider::new(
                        &mut letter_spacing,
                        ranges.letter_spacing_range(),
                    ))
                    .changed()
                {
                    self.edit(now, |c| c.letter_spacing = letter_spacing);
                }
                ui.end_row();

                ui.label("Rotation");
                let mut rotation = config.rotation;
                if ui
                    .add(egui::Slider::new(&mut rotation, 0..=360).suffix("°"))
                    .changed()
                {
                    self.edit(now, |c| c.rotation = rotation);
                }
                ui.end_row();

                ui.label("Color");
                let mut color = parse_hex(&config.color).unwrap_or([255, 255, 255]);
                if ui.color_edit_button_srgb(&mut color).changed() {
                    self.edit(now, |c| c.color = hex_of(color));
                }
                ui.end_row();

                ui.label("Background");
                let mut background = parse_hex(&config.background_color).unwrap_or([0, 0, 0]);
                if ui.color_edit_button_srgb(&mut background).changed() {
                    self.edit(now, |c| c.background_color = hex_of(background));
                }
                ui.end_row();
            });

        ui.add_space(6.0);
        let mut spicy = config.spicy;
        let mut satisfy = config.satisfy;
        let mut colorize = config.colorize;
        ui.horizontal_wrapped(|ui| {
            ui.checkbox(&mut spicy, "Spicy");
            ui.checkbox(&mut satisfy, "Satisfy");
            ui.checkbox(&mut colorize, "Colorize");
        });
        if (spicy, satisfy, colorize) != (config.spicy, config.satisfy, config.colorize) {
            self.edit(now, |c| {
                c.spicy = spicy;
                c.satisfy = satisfy;
                c.colorize = colorize;
            });
        }
    }

    fn draw_history_view(&mut self, ui: &mut egui::Ui, now: f64) {
        self.refresh_previews(ui.painter(), now);
        if self.previews.is_empty() {
            ui.label("Nothing here yet. Randomize a few patterns first.");
            return;
        }

        let mut clicked = None;
        ui.horizontal_wrapped(|ui| {
            for tile in &self.previews {
                let (rect, response) = ui.allocate_exact_size(
                    egui::vec2(PREVIEW_TILE, PREVIEW_TILE),
                    egui::Sense::click(),
                );
                if ui.is_rect_visible(rect) {
                    let painter = ui.painter_at(rect);
                    paint_surface(&painter, rect, PREVIEW_TILE, &tile.surface, now);
                    if response.hovered() {
                        painter.rect_stroke(
                            rect,
                            0.0,
                            ui.visuals().selection.stroke,
                            egui::StrokeKind::Inside,
                        );
                    }
                }
                if response
                    .on_hover_text(tile.config.line_pattern.as_str())
                    .clicked()
                {
                    clicked = Some(tile.index);
                }
            }
        });
        if let Some(index) = clicked {
            self.pending_commit = false;
            self.controller.show_history_entry(index);
        }
    }

    fn draw_actions(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            if ui.button("Randomize").clicked() {
                self.pending_commit = false;
                self.controller.randomize(RandomizeOptions::default());
            }
            if ui.button("Copy link").clicked() {
                let url = self.controller.shareable_url(&self.share_base);
                ui.ctx().copy_text(url);
                self.status =
                    Some("The link to this pattern has been copied to the clipboard".to_string());
            }
            let history = self.controller.history();
            let (can_back, can_forward) = (history.can_go_back(), history.can_go_forward());
            if ui.add_enabled(can_back, egui::Button::new("◀")).clicked() {
                self.controller.history_back();
            }
            if ui.add_enabled(can_forward, egui::Button::new("▶")).clicked() {
                self.controller.history_forward();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting_matches_the_config_format() {
        assert_eq!(hex_of([255, 215, 0]), "#ffd700");
        assert_eq!(hex_of([0, 0, 0]), "#000000");
    }
}
