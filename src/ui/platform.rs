//! Host integration: the page URL and the audio element on the web, plain
//! defaults on native.

use crate::surface::{AudioChannel, SilentAudio};

#[cfg(target_arch = "wasm32")]
use eframe::wasm_bindgen::JsCast;

/// Link the app was opened with, if any.
///
/// On the web this is the page's own fragment. Native builds receive it from
/// the command line instead, so there is nothing to read here.
pub fn initial_link() -> Option<String> {
    #[cfg(target_arch = "wasm32")]
    {
        let hash = web_sys::window()?.location().hash().ok()?;
        (!hash.trim_start_matches('#').is_empty()).then_some(hash)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Base URL that shareable links are built on.
pub fn share_base() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.location().href().ok())
            .unwrap_or_else(|| crate::constants::DEFAULT_SHARE_BASE.to_string())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        crate::constants::DEFAULT_SHARE_BASE.to_string()
    }
}

/// Mirrors the committed config into the page fragment.
pub fn publish_fragment(encoded: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().set_hash(encoded) {
                log::warn!("Failed to update location hash: {err:?}");
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::trace!("Committed config {encoded}");
    }
}

/// The part of a media element the audio channel drives.
pub trait MediaElement {
    /// Whether playback is currently stopped.
    fn is_paused(&self) -> bool;
    /// Asks the element to start playing. Refusal may also arrive later,
    /// leaving the element paused.
    fn request_play(&self) -> Result<(), String>;
    /// Asks the element to stop playing.
    fn request_pause(&self) -> Result<(), String>;
    /// Sets the playback volume in `0.0..=1.0`.
    fn set_volume(&self, volume: f64);
}

/// Audio channel playing a media element, such as the page's `#audio`.
///
/// Playback state is read from the element itself: a refused `play()` only
/// rejects its promise later, so the element stays paused and the next
/// render asks again.
pub struct MediaAudio<E> {
    element: E,
}

impl<E: MediaElement> MediaAudio<E> {
    /// Wraps a media element.
    pub fn new(element: E) -> Self {
        Self { element }
    }
}

impl<E: MediaElement> AudioChannel for MediaAudio<E> {
    fn play(&mut self, volume: f32) {
        self.element.set_volume(volume as f64);
        if self.element.is_paused() {
            if let Err(err) = self.element.request_play() {
                log::warn!("Audio playback was refused: {err}");
            }
        }
    }

    fn pause(&mut self) {
        if !self.element.is_paused() {
            if let Err(err) = self.element.request_pause() {
                log::warn!("Failed to pause audio: {err}");
            }
        }
    }

    fn is_playing(&self) -> bool {
        !self.element.is_paused()
    }
}

#[cfg(target_arch = "wasm32")]
impl MediaElement for web_sys::HtmlAudioElement {
    fn is_paused(&self) -> bool {
        self.paused()
    }

    fn request_play(&self) -> Result<(), String> {
        // Autoplay policies reject the returned promise, not this call.
        self.play().map(|_| ()).map_err(|err| format!("{err:?}"))
    }

    fn request_pause(&self) -> Result<(), String> {
        self.pause().map_err(|err| format!("{err:?}"))
    }

    fn set_volume(&self, volume: f64) {
        web_sys::HtmlMediaElement::set_volume(self, volume);
    }
}

#[cfg(target_arch = "wasm32")]
fn find_audio_element() -> Option<web_sys::HtmlAudioElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id("audio")?
        .dyn_into::<web_sys::HtmlAudioElement>()
        .ok()
}

/// The best audio channel the host offers.
pub fn audio_channel() -> Box<dyn AudioChannel> {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(element) = find_audio_element() {
            return Box::new(MediaAudio::new(element));
        }
        log::info!("No #audio element on the page; audio is disabled");
    }
    Box::new(SilentAudio::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Element whose `play()` is accepted but may be refused afterwards.
    #[derive(Default)]
    struct FakeElement {
        paused: Cell<bool>,
        allow_playback: Cell<bool>,
        play_requests: Cell<u32>,
        volume: Cell<f64>,
    }

    impl MediaElement for &FakeElement {
        fn is_paused(&self) -> bool {
            self.paused.get()
        }

        fn request_play(&self) -> Result<(), String> {
            self.play_requests.set(self.play_requests.get() + 1);
            self.paused.set(!self.allow_playback.get());
            Ok(())
        }

        fn request_pause(&self) -> Result<(), String> {
            self.paused.set(true);
            Ok(())
        }

        fn set_volume(&self, volume: f64) {
            self.volume.set(volume);
        }
    }

    #[test]
    fn refused_playback_is_retried_on_the_next_render() {
        let element = FakeElement::default();
        element.paused.set(true);
        let mut audio = MediaAudio::new(&element);

        audio.play(0.4);
        assert!(!audio.is_playing());
        audio.play(0.4);
        assert_eq!(element.play_requests.get(), 2);

        element.allow_playback.set(true);
        audio.play(0.4);
        assert!(audio.is_playing());
        assert_eq!(element.play_requests.get(), 3);
        assert!((element.volume.get() - 0.4).abs() < 1e-6);

        // Already playing: no extra request.
        audio.play(0.4);
        assert_eq!(element.play_requests.get(), 3);

        audio.pause();
        assert!(!audio.is_playing());
    }
}
