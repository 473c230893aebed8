//! Live state of one render target.
//!
//! A [`Surface`] holds the plan it last applied together with everything
//! that plan started: one recolor interval per colorized glyph and the audio
//! request. Applying a new plan always disposes the previous plan's timers
//! first, so toggling decorations never leaks intervals.

use crate::color::parse_hex;
use crate::layout::{AudioRequest, RenderBody, RenderPlan};
use crate::random::{Lightness, PatternRng};
use crate::timers::{TimerId, TimerQueue};

/// Play/pause side channel driven by the `satisfy` flag.
pub trait AudioChannel {
    /// Starts (or keeps) playing at `volume`.
    fn play(&mut self, volume: f32);
    /// Stops playback.
    fn pause(&mut self);
    /// Whether playback is running.
    fn is_playing(&self) -> bool;
}

/// Audio channel without an output device; it only tracks and logs state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SilentAudio {
    playing: bool,
    volume: f32,
}

impl SilentAudio {
    /// Last requested volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl AudioChannel for SilentAudio {
    fn play(&mut self, volume: f32) {
        if !self.playing {
            log::debug!("Audio play requested at volume {volume}");
        }
        self.playing = true;
        self.volume = volume;
    }

    fn pause(&mut self) {
        if self.playing {
            log::debug!("Audio paused");
        }
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Color of a colorized glyph, transitioning linearly towards its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellColor {
    from: [u8; 3],
    to: [u8; 3],
    since: f64,
    duration: f64,
}

impl CellColor {
    fn new(color: [u8; 3], now: f64, duration: f64) -> Self {
        Self {
            from: color,
            to: color,
            since: now,
            duration,
        }
    }

    fn retarget(&mut self, color: [u8; 3], now: f64) {
        self.from = self.at(now);
        self.to = color;
        self.since = now;
    }

    /// Target color of the current transition.
    pub fn target(&self) -> [u8; 3] {
        self.to
    }

    /// Interpolated color at `now`.
    pub fn at(&self, now: f64) -> [u8; 3] {
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            ((now - self.since) / self.duration).clamp(0.0, 1.0)
        };
        let mut out = [0u8; 3];
        for (i, channel) in out.iter_mut().enumerate() {
            let a = self.from[i] as f64;
            let b = self.to[i] as f64;
            *channel = (a + (b - a) * t).round() as u8;
        }
        out
    }
}

/// A render target and the timers its current plan owns.
#[derive(Debug, Default)]
pub struct Surface {
    plan: Option<RenderPlan>,
    colors: Vec<Option<CellColor>>,
    recolor: TimerQueue<usize>,
    handles: Vec<TimerId>,
}

impl Surface {
    /// Creates a surface with nothing drawn.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current plan.
    ///
    /// Previous recolor timers are cancelled before new ones are scheduled.
    /// When `audio` is given, the plan's audio request is applied to it on
    /// every call, whether or not the flag changed.
    pub fn apply(&mut self, plan: RenderPlan, now: f64, audio: Option<&mut dyn AudioChannel>) {
        self.dispose_timers();

        self.colors = match &plan.body {
            RenderBody::Decorated(cells) => cells
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    let colorize = cell.colorize.as_ref()?;
                    let rgb = parse_hex(&colorize.color)?;
                    let handle = self.recolor.set_interval(now, colorize.interval_ms, index);
                    self.handles.push(handle);
                    Some(CellColor::new(rgb, now, colorize.interval_ms as f64 / 1000.0))
                })
                .collect(),
            _ => Vec::new(),
        };

        if let Some(audio) = audio {
            match plan.audio {
                AudioRequest::Play { volume } => audio.play(volume),
                AudioRequest::Pause => audio.pause(),
            }
        }

        self.plan = Some(plan);
    }

    /// The queue only ever holds this surface's recolor timers.
    fn dispose_timers(&mut self) {
        self.recolor.cancel_all();
        self.handles.clear();
    }

    /// Tears the surface down: no plan, no timers.
    pub fn clear(&mut self) {
        self.dispose_timers();
        self.colors.clear();
        self.plan = None;
    }

    /// Fires due recolor timers. Returns the number of glyphs recolored.
    pub fn tick(&mut self, now: f64, rng: &mut PatternRng) -> usize {
        let due = self.recolor.poll(now);
        for &index in &due {
            if let Some(Some(color)) = self.colors.get_mut(index) {
                if let Some(rgb) = parse_hex(&rng.random_color(Lightness::Light)) {
                    color.retarget(rgb, now);
                }
            }
        }
        due.len()
    }

    /// The plan currently applied.
    pub fn plan(&self) -> Option<&RenderPlan> {
        self.plan.as_ref()
    }

    /// Live color of the glyph cell at `index`, if it is colorized.
    pub fn cell_color(&self, index: usize) -> Option<&CellColor> {
        self.colors.get(index).and_then(Option::as_ref)
    }

    /// Number of live recolor timers.
    pub fn active_timers(&self) -> usize {
        self.recolor.len()
    }

    /// Time of the next recolor, if any.
    pub fn next_due(&self) -> Option<f64> {
        self.recolor.next_due()
    }

    /// Whether the current plan animates without further input.
    pub fn is_animated(&self) -> bool {
        self.plan
            .as_ref()
            .is_some_and(|plan| plan.container.satisfy || plan.recolor_count() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{render, SurfaceMetrics};
    use crate::types::{FontFamily, PatternConfig};

    struct Square(f32);

    impl SurfaceMetrics for Square {
        fn pixel_width(&self) -> f32 {
            self.0
        }
        fn pixel_height(&self) -> f32 {
            self.0
        }
        fn measure_glyph_width(&self, _: char, font_size: u32, _: FontFamily) -> f32 {
            font_size as f32 * 0.6
        }
    }

    fn config(colorize: bool, satisfy: bool) -> PatternConfig {
        PatternConfig {
            line_pattern: "ab".into(),
            spicy: false,
            colorize,
            satisfy,
            repeat_amount: Some(5),
            ..Default::default()
        }
    }

    fn plan_for(config: &PatternConfig, seed: u64) -> RenderPlan {
        render(config, &Square(100.0), &mut PatternRng::seeded(seed))
    }

    #[test]
    fn colorize_schedules_one_timer_per_glyph() {
        let mut surface = Surface::new();
        surface.apply(plan_for(&config(true, false), 1), 0.0, None);
        assert_eq!(surface.active_timers(), 10);
        assert!(surface.cell_color(0).is_some());
        assert!(surface.is_animated());
    }

    #[test]
    fn disabling_colorize_cancels_recolor_timers() {
        let mut surface = Surface::new();
        let mut rng = PatternRng::seeded(5);
        surface.apply(plan_for(&config(true, false), 1), 0.0, None);
        assert!(surface.tick(1.3, &mut rng) > 0);

        surface.apply(plan_for(&config(false, false), 2), 1.4, None);
        assert_eq!(surface.active_timers(), 0);
        assert!(surface.cell_color(0).is_none());
        for step in 1..50 {
            assert_eq!(surface.tick(1.4 + step as f64, &mut rng), 0);
        }
    }

    #[test]
    fn rerendering_never_accumulates_timers() {
        let mut surface = Surface::new();
        for seed in 0..20 {
            surface.apply(plan_for(&config(true, false), seed), seed as f64, None);
            assert_eq!(surface.active_timers(), 10);
        }
        surface.clear();
        assert_eq!(surface.active_timers(), 0);
        assert!(surface.plan().is_none());
    }

    #[test]
    fn clearing_a_large_colorized_plan_stops_every_timer() {
        let mut surface = Surface::new();
        let mut rng = PatternRng::seeded(8);
        let big = PatternConfig {
            repeat_amount: Some(2_000),
            ..config(true, false)
        };
        surface.apply(plan_for(&big, 4), 0.0, None);
        assert_eq!(surface.active_timers(), 4_000);

        surface.clear();
        assert_eq!(surface.active_timers(), 0);
        assert!(surface.next_due().is_none());
        assert_eq!(surface.tick(60.0, &mut rng), 0);
    }

    #[test]
    fn recolor_retargets_with_transition() {
        let mut surface = Surface::new();
        let mut rng = PatternRng::seeded(21);
        surface.apply(plan_for(&config(true, false), 3), 0.0, None);
        let before = *surface.cell_color(0).unwrap();
        let due = surface.next_due().unwrap();
        surface.tick(due, &mut rng);
        let after = *surface.cell_color(0).unwrap();
        // Whether or not this cell fired, the transition starts from the old color.
        assert_eq!(after.at(due), before.target());
    }

    #[test]
    fn audio_is_level_triggered() {
        let mut surface = Surface::new();
        let mut audio = SilentAudio::default();

        surface.apply(plan_for(&config(false, true), 1), 0.0, Some(&mut audio));
        assert!(audio.is_playing());
        assert!((audio.volume() - crate::constants::SATISFY_VOLUME).abs() < f32::EPSILON);

        // Undecorated plans still pause playback.
        surface.apply(plan_for(&config(false, false), 2), 0.1, Some(&mut audio));
        assert!(!audio.is_playing());
    }

    #[test]
    fn surfaces_without_audio_leave_it_alone() {
        let mut surface = Surface::new();
        let mut audio = SilentAudio::default();
        audio.play(0.4);
        surface.apply(plan_for(&config(false, false), 1), 0.0, None);
        assert!(audio.is_playing());
    }

    #[test]
    fn cell_color_interpolates() {
        let mut color = CellColor::new([0, 0, 0], 0.0, 1.0);
        color.retarget([200, 100, 0], 0.0);
        assert_eq!(color.at(0.5), [100, 50, 0]);
        assert_eq!(color.at(2.0), [200, 100, 0]);
    }
}
