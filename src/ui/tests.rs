use super::*;
use crate::controller::Controller;
use crate::history::HistoryStore;
use crate::layout::RenderBody;
use crate::random::PatternRng;
use crate::share;
use crate::surface::SilentAudio;
use crate::types::{FontFamily, PatternConfig};
use eframe::egui;
use std::collections::HashMap;

const SCREEN: egui::Vec2 = egui::vec2(1200.0, 800.0);

fn seeded_app(seed: u64) -> PatternApp {
    PatternApp::with_controller(
        Controller::new(
            HistoryStore::new(),
            Box::new(SilentAudio::default()),
            PatternRng::seeded(seed),
        ),
        UiSettings::default(),
    )
}

/// Run a single headless frame of the app at `time` with the given input events.
fn run_frame(
    ctx: &egui::Context,
    app: &mut PatternApp,
    time: f64,
    events: Vec<egui::Event>,
) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(egui::Pos2::ZERO, SCREEN));
    raw.time = Some(time);
    raw.events = events;
    ctx.run(raw, |ctx| app.show(ctx))
}

fn pointer_button(pos: egui::Pos2, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::default(),
    }
}

fn key_press(key: egui::Key) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::default(),
    }
}

#[derive(Default)]
struct MemoryStorage(HashMap<String, String>);

impl eframe::Storage for MemoryStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }

    fn flush(&mut self) {}
}

#[test]
fn first_frame_renders_a_square_covering_the_window() {
    let mut app = seeded_app(1);
    let ctx = egui::Context::default();
    run_frame(&ctx, &mut app, 0.0, vec![]);

    assert_eq!(app.surface_side, SCREEN.x.hypot(SCREEN.y).ceil());
    let plan = app.controller.surface().plan().expect("first frame renders");
    // The default pattern is spicy, so every glyph gets its own cell.
    assert!(matches!(plan.body, RenderBody::Decorated(_)));
    assert!(!app.controller.needs_render());
}

#[test]
fn clicking_the_pattern_randomizes_and_commits() {
    let mut app = seeded_app(2);
    let ctx = egui::Context::default();
    let pos = egui::pos2(600.0, 400.0);

    // egui hit-tests against the previous frame's layout, so lay out once first.
    run_frame(&ctx, &mut app, 0.0, vec![]);
    run_frame(&ctx, &mut app, 0.02, vec![egui::Event::PointerMoved(pos)]);
    let before = app.controller.config().clone();
    run_frame(&ctx, &mut app, 0.05, vec![pointer_button(pos, true)]);
    run_frame(&ctx, &mut app, 0.1, vec![pointer_button(pos, false)]);

    assert_eq!(app.controller.history().len(), 1);
    assert_ne!(app.controller.config(), &before);
}

#[test]
fn presentation_reveals_the_controls_panel() {
    let mut app = seeded_app(3);
    app.controller.start(None, 0.0);
    let ctx = egui::Context::default();

    let mut time = 0.0;
    while time < 4.0 {
        run_frame(&ctx, &mut app, time, vec![]);
        time += 0.1;
    }

    assert!(!app.controller.is_presenting());
    assert!(app.controller.controls_visible());
    assert!(!app.controller.history().is_empty());
    assert_eq!(
        app.controller.config().font_family,
        PatternConfig::default().font_family
    );
}

#[test]
fn shared_link_is_drawn_on_the_first_frame() {
    let shared = PatternConfig {
        line_pattern: "xo".into(),
        font_family: FontFamily::Vt323,
        colorize: true,
        repeat_amount: Some(6),
        ..Default::default()
    };
    let mut app = seeded_app(4);
    app.controller
        .start(Some(&share::shareable_url("https://example.com/", &shared)), 0.0);
    let ctx = egui::Context::default();
    run_frame(&ctx, &mut app, 0.0, vec![]);

    let plan = app.controller.surface().plan().unwrap();
    assert_eq!(plan.container.font_family, FontFamily::Vt323);
    assert_eq!(plan.recolor_count(), 12);
    assert!(app.controller.surface().active_timers() > 0);
}

#[test]
fn space_bar_randomizes() {
    let mut app = seeded_app(5);
    let ctx = egui::Context::default();
    run_frame(&ctx, &mut app, 0.0, vec![key_press(egui::Key::Space)]);
    assert_eq!(app.controller.history().len(), 1);
}

#[test]
fn settled_form_edits_are_committed() {
    let mut app = seeded_app(6);
    let ctx = egui::Context::default();
    run_frame(&ctx, &mut app, 0.0, vec![]);

    app.controller.edit(0.0, |config| config.rotation = 155);
    app.pending_commit = true;
    run_frame(&ctx, &mut app, 0.1, vec![]);

    assert!(!app.pending_commit);
    assert_eq!(app.controller.history().len(), 1);
    assert_eq!(app.controller.history().entries()[0].rotation, 155);
}

#[test]
fn history_tab_draws_previews_without_the_newest_entry() {
    let mut app = seeded_app(7);
    for _ in 0..4 {
        app.controller.randomize(RandomizeOptions::default());
    }
    let len = app.controller.history().len();
    app.controller.set_controls_visible(true);
    app.settings.menu = Menu::History;

    let ctx = egui::Context::default();
    run_frame(&ctx, &mut app, 0.0, vec![]);

    assert_eq!(app.previews.len(), len - 1);
    assert_eq!(app.previews[0].index, len - 2);
    for tile in &app.previews {
        assert!(tile.surface.plan().is_some());
        assert!(!tile.config.satisfy);
    }
    // Thumbnails never touch the main audio channel.
    assert!(!app.controller.audio().is_playing());

    app.controller.set_controls_visible(false);
    run_frame(&ctx, &mut app, 0.1, vec![]);
    assert!(app.previews.is_empty());
}

#[test]
fn save_persists_history_and_settings() {
    let mut app = seeded_app(8);
    app.controller.randomize(RandomizeOptions::default());
    app.settings.controls_panel_width = 333.0;

    let mut storage = MemoryStorage::default();
    eframe::App::save(&mut app, &mut storage);

    let settings = UiSettings::from_json(&storage.0[APP_STATE_KEY]).unwrap();
    assert_eq!(settings.controls_panel_width, 333.0);
    let history = HistoryStore::recover(Some(&storage.0[HISTORY_STORAGE_KEY])).unwrap();
    assert_eq!(history.entries(), app.controller.history().entries());
}
