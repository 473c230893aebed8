//! Application controller.
//!
//! The controller owns the single current [`PatternConfig`] and everything
//! that reacts to it: the history log, the main [`Surface`], the audio channel
//! and the app-level timers (edit debounce, startup presentation, controls
//! reveal). It knows nothing about the UI toolkit; the shell feeds it events,
//! the clock and surface metrics.

use crate::constants::{
    EDIT_DEBOUNCE_MS, PRESENTATION_INTERVAL_MS, PRESENTATION_ITERATIONS, PRESENTATION_REVEAL_MS,
    SHARED_REVEAL_MS,
};
use crate::error::{Error, Result};
use crate::history::HistoryStore;
use crate::layout::{self, SurfaceMetrics};
use crate::random::PatternRng;
use crate::randomizer::{randomize, DeviceClass, DeviceRanges, RandomizeOptions};
use crate::share;
use crate::surface::{AudioChannel, Surface};
use crate::timers::{TimerId, TimerQueue};
use crate::types::PatternConfig;

/// Payloads of the controller's own timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTimer {
    /// Debounced re-render after field edits
    Render,
    /// One step of the startup presentation
    Presentation,
    /// Reveal the controls panel
    RevealControls,
}

#[derive(Debug, Clone, Copy)]
struct Presentation {
    timer: TimerId,
    count: u32,
}

/// Owner of the current config and its side effects.
pub struct Controller {
    config: PatternConfig,
    history: HistoryStore,
    rng: PatternRng,
    surface: Surface,
    audio: Box<dyn AudioChannel>,
    timers: TimerQueue<AppTimer>,
    debounce: Option<TimerId>,
    presentation: Option<Presentation>,
    device: DeviceClass,
    needs_render: bool,
    history_dirty: bool,
    controls_visible: bool,
    last_error: Option<Error>,
}

impl Controller {
    /// Creates a controller around an existing history.
    pub fn new(history: HistoryStore, audio: Box<dyn AudioChannel>, rng: PatternRng) -> Self {
        Self {
            config: PatternConfig::default(),
            history,
            rng,
            surface: Surface::new(),
            audio,
            timers: TimerQueue::new(),
            debounce: None,
            presentation: None,
            device: DeviceClass::Desktop,
            needs_render: true,
            history_dirty: false,
            controls_visible: false,
            last_error: None,
        }
    }

    /// Creates a controller from persisted history, falling back to an empty
    /// history when the data is unreadable.
    pub fn restore(
        persisted_history: Option<&str>,
        audio: Box<dyn AudioChannel>,
        rng: PatternRng,
    ) -> Self {
        match HistoryStore::recover(persisted_history) {
            Ok(history) => Self::new(history, audio, rng),
            Err(err) => {
                log::warn!("{err}; starting with an empty history");
                let mut controller = Self::new(HistoryStore::new(), audio, rng);
                controller.last_error = Some(err);
                controller
            }
        }
    }

    /// Decides the first screen: a shared config when `link` carries a valid
    /// one, otherwise the randomized presentation.
    pub fn start(&mut self, link: Option<&str>, now: f64) {
        match link.and_then(share::fragment_of) {
            Some(fragment) => {
                if let Err(err) = self.consume_link(fragment, now) {
                    log::warn!("{err}; showing the presentation instead");
                    self.last_error = Some(err);
                    self.begin_presentation(now);
                }
            }
            None => self.begin_presentation(now),
        }
    }

    /// Applies a shared config string, renders it and commits it.
    pub fn consume_link(&mut self, encoded: &str, now: f64) -> Result<()> {
        let config = share::deserialize(encoded)?;
        log::info!("Loaded shared pattern {:?}", config.line_pattern);
        self.config = config;
        self.needs_render = true;
        self.commit();
        self.timers
            .set_timeout(now, SHARED_REVEAL_MS, AppTimer::RevealControls);
        Ok(())
    }

    /// Starts the startup presentation: repeated randomization at a fixed cadence.
    pub fn begin_presentation(&mut self, now: f64) {
        if let Some(previous) = self.presentation.take() {
            self.timers.cancel(previous.timer);
        }
        let timer = self
            .timers
            .set_interval(now, PRESENTATION_INTERVAL_MS, AppTimer::Presentation);
        self.presentation = Some(Presentation { timer, count: 0 });
    }

    /// Whether the presentation is still running.
    pub fn is_presenting(&self) -> bool {
        self.presentation.is_some()
    }

    /// Replaces the config with a randomized one, then commits it.
    pub fn randomize(&mut self, options: RandomizeOptions) {
        let ranges = self.ranges();
        self.config = randomize(&self.config, &ranges, options, &mut self.rng);
        self.needs_render = true;
        self.commit();
    }

    /// Mutates the config in place and schedules a debounced re-render.
    ///
    /// Edits are not committed; call [`Controller::commit`] once the edit is
    /// finished.
    pub fn edit(&mut self, now: f64, apply: impl FnOnce(&mut PatternConfig)) {
        apply(&mut self.config);
        if let Some(previous) = self.debounce.take() {
            self.timers.cancel(previous);
        }
        self.debounce = Some(
            self.timers
                .set_timeout(now, EDIT_DEBOUNCE_MS, AppTimer::Render),
        );
    }

    /// Records the current config in the history. Returns whether it was new.
    pub fn commit(&mut self) -> bool {
        let appended = self.history.commit(&self.config);
        if appended {
            self.history_dirty = true;
        }
        appended
    }

    /// Switches the character pack and draws a fresh pattern from it.
    pub fn select_pack(&mut self, name: &str) {
        self.config.active_pack = Some(name.to_string());
        self.randomize(RandomizeOptions::default());
    }

    /// Shows the history entry at `index` without committing it again.
    pub fn show_history_entry(&mut self, index: usize) {
        if let Some(entry) = self.history.go_to(index) {
            self.config = entry.clone();
            self.needs_render = true;
        }
    }

    /// Steps back in history and shows that entry.
    pub fn history_back(&mut self) {
        let index = self.history.cursor().saturating_sub(1);
        self.show_history_entry(index);
    }

    /// Steps forward in history and shows that entry.
    pub fn history_forward(&mut self) {
        let index = self.history.cursor().saturating_add(1);
        self.show_history_entry(index);
    }

    /// Reports the viewport width; switches device ranges at the breakpoint.
    pub fn set_viewport_width(&mut self, width: f32) {
        let device = DeviceClass::from_viewport_width(width);
        if device != self.device {
            log::debug!("Device class is now {device:?}");
            self.device = device;
        }
    }

    /// Requests a re-render on the next frame (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.needs_render = true;
    }

    /// Advances every timer to `now`.
    pub fn tick(&mut self, now: f64) {
        for timer in self.timers.poll(now) {
            match timer {
                AppTimer::Render => {
                    self.debounce = None;
                    self.needs_render = true;
                }
                AppTimer::Presentation => self.presentation_step(now),
                AppTimer::RevealControls => self.controls_visible = true,
            }
        }
        self.surface.tick(now, &mut self.rng);
    }

    fn presentation_step(&mut self, now: f64) {
        let Some(mut presentation) = self.presentation else {
            return;
        };
        presentation.count += 1;
        self.randomize(RandomizeOptions {
            skip_font_rand: true,
        });
        if presentation.count > PRESENTATION_ITERATIONS {
            self.timers.cancel(presentation.timer);
            self.presentation = None;
            self.timers
                .set_timeout(now, PRESENTATION_REVEAL_MS, AppTimer::RevealControls);
        } else {
            self.presentation = Some(presentation);
        }
    }

    /// Renders the current config onto the main surface.
    pub fn render(&mut self, metrics: &impl SurfaceMetrics, now: f64) {
        let plan = layout::render(&self.config, metrics, &mut self.rng);
        self.surface.apply(plan, now, Some(&mut *self.audio));
        self.needs_render = false;
    }

    /// Renders only if something changed since the last render.
    pub fn render_if_needed(&mut self, metrics: &impl SurfaceMetrics, now: f64) -> bool {
        if !self.needs_render {
            return false;
        }
        self.render(metrics, now);
        true
    }

    /// Whether a render is pending.
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Earliest time at which a timer wants attention.
    pub fn next_wakeup(&self) -> Option<f64> {
        match (self.timers.next_due(), self.surface.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Returns the persisted form of the history if it changed since the last call.
    pub fn take_history_json(&mut self) -> Option<String> {
        if !self.history_dirty {
            return None;
        }
        self.history_dirty = false;
        match self.history.to_json() {
            Ok(json) => Some(json),
            Err(err) => {
                log::error!("Failed to serialize history: {err}");
                None
            }
        }
    }

    /// Serialized history, regardless of whether it changed.
    pub fn history_json(&self) -> Option<String> {
        self.history.to_json().ok()
    }

    /// Link to the current config.
    pub fn shareable_url(&self, base: &str) -> String {
        share::shareable_url(base, &self.config)
    }

    /// Transport string of the current config.
    pub fn encoded_config(&self) -> String {
        share::serialize(&self.config)
    }

    /// The current config.
    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    /// The history log.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// The main surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The audio channel.
    pub fn audio(&self) -> &dyn AudioChannel {
        self.audio.as_ref()
    }

    /// Shared random source, for adapters that render extra surfaces.
    pub fn rng_mut(&mut self) -> &mut PatternRng {
        &mut self.rng
    }

    /// Active device class.
    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// Bounds for the active device class.
    pub fn ranges(&self) -> DeviceRanges {
        self.device.ranges()
    }

    /// Whether the controls panel is shown.
    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Shows or hides the controls panel.
    pub fn set_controls_visible(&mut self, visible: bool) {
        self.controls_visible = visible;
    }

    /// Most recent recovered error, for a status line.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Forgets the last recovered error.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}
