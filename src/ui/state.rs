//! Application state structures.
//!
//! [`PatternApp`] is the eframe application: the toolkit-independent
//! [`Controller`] plus the bits of state only the UI cares about.

use super::platform;
use super::rendering::EguiMetrics;
use crate::constants::{HISTORY_VIEW_LEN, PREVIEW_TILE};
use crate::controller::Controller;
use crate::history::HistoryStore;
use crate::layout;
use crate::random::PatternRng;
use crate::surface::{SilentAudio, Surface};
use crate::types::PatternConfig;
use eframe::egui;
use serde::{Deserialize, Serialize};

/// Tabs of the controls panel.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Menu {
    /// Config form
    #[default]
    Config,
    /// Previews of earlier patterns
    History,
}

/// UI settings persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    /// Remembered width of the controls panel
    pub controls_panel_width: f32,
    /// Tab shown in the controls panel
    pub menu: Menu,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            controls_panel_width: 280.0,
            menu: Menu::Config,
        }
    }
}

impl UiSettings {
    /// Serializes the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A history thumbnail and the surface drawing it.
pub struct PreviewTile {
    /// Index of the entry in the history log
    pub index: usize,
    /// Preview variant of the entry's config
    pub config: PatternConfig,
    /// Surface owning the thumbnail's recolor timers
    pub surface: Surface,
}

/// The pattern machine application.
pub struct PatternApp {
    /// Persisted UI settings
    pub settings: UiSettings,
    /// Current config, history, timers and the main surface
    pub controller: Controller,
    /// History thumbnails, newest first
    pub previews: Vec<PreviewTile>,
    /// Side of the square the main pattern is laid out on
    pub surface_side: f32,
    /// Last seen viewport size
    pub viewport: egui::Vec2,
    /// Set by form edits; the config is committed once the edit settles
    pub pending_commit: bool,
    /// Transient message shown at the bottom of the controls
    pub status: Option<String>,
    /// Base URL for shareable links
    pub share_base: String,
}

impl Default for PatternApp {
    fn default() -> Self {
        Self::with_controller(
            Controller::new(
                HistoryStore::new(),
                Box::new(SilentAudio::default()),
                PatternRng::from_os(),
            ),
            UiSettings::default(),
        )
    }
}

impl PatternApp {
    /// Creates the app from eframe's creation context.
    ///
    /// History and UI settings are restored from storage; `link` is a shared
    /// URL or fragment to open instead of the startup presentation.
    pub fn new(cc: &eframe::CreationContext<'_>, link: Option<String>) -> Self {
        let (history_json, settings) = match cc.storage {
            Some(storage) => {
                let settings = storage
                    .get_string(crate::constants::APP_STATE_KEY)
                    .and_then(|json| match UiSettings::from_json(&json) {
                        Ok(settings) => Some(settings),
                        Err(err) => {
                            log::warn!("Ignoring unreadable UI settings: {err}");
                            None
                        }
                    })
                    .unwrap_or_default();
                (
                    storage.get_string(crate::constants::HISTORY_STORAGE_KEY),
                    settings,
                )
            }
            None => (None, UiSettings::default()),
        };

        let controller = Controller::restore(
            history_json.as_deref(),
            platform::audio_channel(),
            PatternRng::from_os(),
        );
        let mut app = Self::with_controller(controller, settings);
        let now = cc.egui_ctx.input(|i| i.time);
        let link = link.or_else(platform::initial_link);
        app.controller.start(link.as_deref(), now);
        if let Some(err) = app.controller.last_error() {
            app.status = Some(err.to_string());
        }
        app
    }

    /// Wraps an existing controller.
    pub fn with_controller(controller: Controller, settings: UiSettings) -> Self {
        Self {
            settings,
            controller,
            previews: Vec::new(),
            surface_side: 0.0,
            viewport: egui::Vec2::ZERO,
            pending_commit: false,
            status: None,
            share_base: platform::share_base(),
        }
    }

    /// Records a new viewport size. Returns whether the layout must be redone.
    pub fn track_viewport(&mut self, size: egui::Vec2) -> bool {
        if size == self.viewport {
            return false;
        }
        self.viewport = size;
        self.controller.set_viewport_width(size.x);
        let side = layout::container_side(size.x, size.y);
        if side != self.surface_side {
            self.surface_side = side;
            self.controller.invalidate();
            return true;
        }
        false
    }

    /// Commits the current config; reports whether the history grew.
    pub fn commit(&mut self) -> bool {
        self.pending_commit = false;
        self.controller.commit()
    }

    /// Rebuilds the history thumbnails when the history changed.
    pub fn refresh_previews(&mut self, painter: &egui::Painter, now: f64) {
        let wanted: Vec<(usize, PatternConfig)> = self
            .controller
            .history()
            .recent(HISTORY_VIEW_LEN)
            .map(|(index, config)| (index, config.preview()))
            .collect();
        let unchanged = wanted.len() == self.previews.len()
            && wanted
                .iter()
                .zip(&self.previews)
                .all(|((index, config), tile)| *index == tile.index && *config == tile.config);
        if unchanged {
            return;
        }

        for tile in &mut self.previews {
            tile.surface.clear();
        }
        let metrics = EguiMetrics::new(painter, PREVIEW_TILE);
        let rng = self.controller.rng_mut();
        self.previews = wanted
            .into_iter()
            .map(|(index, config)| {
                let mut surface = Surface::new();
                surface.apply(layout::render(&config, &metrics, rng), now, None);
                PreviewTile {
                    index,
                    config,
                    surface,
                }
            })
            .collect();
    }

    /// Drops every thumbnail and its timers.
    pub fn clear_previews(&mut self) {
        for tile in &mut self.previews {
            tile.surface.clear();
        }
        self.previews.clear();
    }

    /// Advances thumbnail recolor timers.
    pub fn tick_previews(&mut self, now: f64) {
        let rng = self.controller.rng_mut();
        for tile in &mut self.previews {
            tile.surface.tick(now, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip_and_tolerate_missing_fields() {
        let settings = UiSettings {
            controls_panel_width: 320.0,
            menu: Menu::History,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(UiSettings::from_json(&json).unwrap(), settings);
        assert_eq!(UiSettings::from_json("{}").unwrap(), UiSettings::default());
    }

    #[test]
    fn viewport_changes_recompute_side_and_device() {
        let mut app = PatternApp::default();
        assert!(app.track_viewport(egui::vec2(300.0, 400.0)));
        assert_eq!(app.surface_side, 500.0);
        assert_eq!(
            app.controller.device(),
            crate::randomizer::DeviceClass::Mobile
        );
        assert!(!app.track_viewport(egui::vec2(300.0, 400.0)));
        assert!(app.track_viewport(egui::vec2(1600.0, 1200.0)));
        assert_eq!(
            app.controller.device(),
            crate::randomizer::DeviceClass::Desktop
        );
    }
}
