//! Audio cues
//!
//! The simulation reports [`GameEvent`]s; this module decides which of them
//! make a sound and plays the game's sample files in the browser.

use crate::consts::{BRICK_SOUND_PATH, NEW_WAVE_SOUND_PATH, PADDLE_SOUND_PATH, WALL_SOUND_PATH};
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Brick destroyed
    BrickHit,
    /// Grid refilled for a new wave
    NewWave,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::PaddleHit,
        SoundEffect::WallHit,
        SoundEffect::BrickHit,
        SoundEffect::NewWave,
    ];

    /// Sample file for this effect
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundEffect::PaddleHit => PADDLE_SOUND_PATH,
            SoundEffect::WallHit => WALL_SOUND_PATH,
            SoundEffect::BrickHit => BRICK_SOUND_PATH,
            SoundEffect::NewWave => NEW_WAVE_SOUND_PATH,
        }
    }

    /// Which effect, if any, an event triggers
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::WallHit => Some(SoundEffect::WallHit),
            GameEvent::PaddleHit => Some(SoundEffect::PaddleHit),
            GameEvent::BrickDestroyed { .. } => Some(SoundEffect::BrickHit),
            GameEvent::WaveCleared { .. } => Some(SoundEffect::NewWave),
            GameEvent::BallLost | GameEvent::MusicStart | GameEvent::MusicStop => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use js_sys::Promise;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::SoundEffect;
    use crate::consts::MUSIC_PATH;
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Audio manager backed by `<audio>` elements
    pub struct AudioManager {
        music: Option<HtmlAudioElement>,
        effects: Vec<(SoundEffect, HtmlAudioElement)>,
        music_playing: bool,
        /// A music `play()` promise has not settled yet
        music_pending: Rc<Cell<bool>>,
        /// The browser refused the last music `play()`; no retries until
        /// music is started again
        music_blocked: Rc<Cell<bool>>,
        /// An effect rejection has already been logged
        effects_warned: Rc<Cell<bool>>,
    }

    /// Run `on_done` once a `play()` call settles
    ///
    /// Browsers report refusals (autoplay policy, missing file) through the
    /// returned promise, not the `Err` side.
    fn watch_play(
        result: Result<Promise, JsValue>,
        on_done: impl FnOnce(Result<(), JsValue>) + 'static,
    ) {
        match result {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                on_done(JsFuture::from(promise).await.map(|_| ()));
            }),
            Err(e) => on_done(Err(e)),
        }
    }

    /// Drop the element's source so the browser frees the stream
    fn release(el: &HtmlAudioElement) {
        let _ = el.pause();
        let _ = el.remove_attribute("src");
        el.load();
    }

    impl AudioManager {
        /// Load the music stream and every effect; failures disable only
        /// the sound that failed
        pub fn new(settings: &Settings) -> Self {
            let music = match HtmlAudioElement::new_with_src(MUSIC_PATH) {
                Ok(el) => {
                    el.set_loop(true);
                    el.set_volume(settings.effective_music_volume() as f64);
                    Some(el)
                }
                Err(e) => {
                    log::warn!("Failed to load {}: {:?} - music disabled", MUSIC_PATH, e);
                    None
                }
            };

            let mut effects = Vec::with_capacity(SoundEffect::ALL.len());
            for effect in SoundEffect::ALL {
                match HtmlAudioElement::new_with_src(effect.asset_path()) {
                    Ok(el) => {
                        el.set_volume(settings.effective_sfx_volume() as f64);
                        effects.push((effect, el));
                    }
                    Err(e) => log::warn!("Failed to load {}: {:?}", effect.asset_path(), e),
                }
            }

            log::info!("Audio loaded ({} effects)", effects.len());
            Self {
                music,
                effects,
                music_playing: false,
                music_pending: Rc::new(Cell::new(false)),
                music_blocked: Rc::new(Cell::new(false)),
                effects_warned: Rc::new(Cell::new(false)),
            }
        }

        /// React to a simulation event
        pub fn handle(&mut self, event: &GameEvent) {
            match event {
                GameEvent::MusicStart => self.play_music(),
                GameEvent::MusicStop => self.stop_music(),
                other => {
                    if let Some(effect) = SoundEffect::for_event(other) {
                        self.play(effect);
                    }
                }
            }
        }

        /// Fire-and-forget: restart the effect from the beginning
        pub fn play(&self, effect: SoundEffect) {
            let Some((_, el)) = self.effects.iter().find(|(e, _)| *e == effect) else {
                return;
            };
            el.set_current_time(0.0);

            let warned = self.effects_warned.clone();
            watch_play(el.play(), move |result| {
                if let Err(e) = result {
                    if !warned.replace(true) {
                        log::warn!("Could not play {:?}: {:?}", effect, e);
                    }
                }
            });
        }

        pub fn play_music(&mut self) {
            self.music_playing = true;
            self.music_blocked.set(false);
            if let Some(music) = &self.music {
                music.set_current_time(0.0);
                self.resume_music(music);
            }
        }

        fn resume_music(&self, music: &HtmlAudioElement) {
            self.music_pending.set(true);
            let pending = self.music_pending.clone();
            let blocked = self.music_blocked.clone();
            watch_play(music.play(), move |result| {
                pending.set(false);
                if let Err(e) = result {
                    if !blocked.replace(true) {
                        log::warn!("Could not start music: {:?}", e);
                    }
                }
            });
        }

        pub fn stop_music(&mut self) {
            self.music_playing = false;
            if let Some(music) = &self.music {
                if let Err(e) = music.pause() {
                    log::warn!("Could not stop music: {:?}", e);
                }
                music.set_current_time(0.0);
            }
        }

        /// Per-frame stream upkeep: resume music the browser paused
        /// (tab switch) while it should be playing
        pub fn update(&mut self) {
            if !self.music_playing || self.music_pending.get() || self.music_blocked.get() {
                return;
            }
            if let Some(music) = &self.music {
                if music.paused() {
                    self.resume_music(music);
                }
            }
        }

        /// Stop everything and release every stream
        pub fn unload(&mut self) {
            self.stop_music();
            if let Some(music) = self.music.take() {
                release(&music);
            }
            for (_, el) in self.effects.drain(..) {
                release(&el);
            }
            log::info!("Audio unloaded");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::SoundEffect;
    use crate::settings::Settings;
    use crate::sim::GameEvent;

    /// Silent audio manager for headless runs; logs the cues it would play
    pub struct AudioManager {
        music_playing: bool,
        loaded: bool,
        /// Effects triggered since creation
        pub played: Vec<SoundEffect>,
    }

    impl AudioManager {
        pub fn new(_settings: &Settings) -> Self {
            Self {
                music_playing: false,
                loaded: true,
                played: Vec::new(),
            }
        }

        pub fn handle(&mut self, event: &GameEvent) {
            match event {
                GameEvent::MusicStart => self.play_music(),
                GameEvent::MusicStop => self.stop_music(),
                other => {
                    if let Some(effect) = SoundEffect::for_event(other) {
                        self.play(effect);
                    }
                }
            }
        }

        pub fn play(&mut self, effect: SoundEffect) {
            if !self.loaded {
                return;
            }
            log::debug!("Sound: {:?} ({})", effect, effect.asset_path());
            self.played.push(effect);
        }

        pub fn play_music(&mut self) {
            self.music_playing = self.loaded;
        }

        pub fn stop_music(&mut self) {
            self.music_playing = false;
        }

        pub fn is_music_playing(&self) -> bool {
            self.music_playing
        }

        pub fn is_loaded(&self) -> bool {
            self.loaded
        }

        pub fn update(&mut self) {}

        pub fn unload(&mut self) {
            self.stop_music();
            self.loaded = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_to_effect() {
        assert_eq!(SoundEffect::for_event(&GameEvent::WallHit), Some(SoundEffect::WallHit));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PaddleHit),
            Some(SoundEffect::PaddleHit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BrickDestroyed { row: 2, points: 300 }),
            Some(SoundEffect::BrickHit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::WaveCleared { multiplier: 2 }),
            Some(SoundEffect::NewWave)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::BallLost), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::MusicStart), None);
    }

    #[test]
    fn test_asset_paths() {
        assert_eq!(SoundEffect::PaddleHit.asset_path(), "res/paddle.wav");
        assert_eq!(SoundEffect::NewWave.asset_path(), "res/new_blocks.mp3");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_manager_tracks_cues() {
        let mut audio = AudioManager::new(&crate::Settings::default());
        audio.handle(&GameEvent::MusicStart);
        audio.handle(&GameEvent::BrickDestroyed { row: 0, points: 500 });
        audio.handle(&GameEvent::BallLost);
        assert!(audio.is_music_playing());
        assert_eq!(audio.played, vec![SoundEffect::BrickHit]);

        audio.handle(&GameEvent::MusicStop);
        assert!(!audio.is_music_playing());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_unload_silences_manager() {
        let mut audio = AudioManager::new(&crate::Settings::default());
        audio.handle(&GameEvent::MusicStart);
        audio.unload();
        assert!(!audio.is_loaded());
        assert!(!audio.is_music_playing());

        audio.handle(&GameEvent::MusicStart);
        audio.handle(&GameEvent::WallHit);
        assert!(!audio.is_music_playing());
        assert!(audio.played.is_empty());
    }
}
