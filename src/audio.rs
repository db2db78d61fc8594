//! Audio playback through HTMLAudio elements
//!
//! Effects are fire-and-forget: each trigger plays on a fresh clone of the
//! loaded element so rapid repeats overlap instead of cutting each other
//! off. Autoplay rejections are swallowed for effects; for the background
//! music the first rejection surfaces a one-time hint, since it usually
//! means the browser wants a user gesture first.

use std::cell::Cell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

use crate::assets::web::WebAssets;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    /// Player left the ground
    Jump,
    /// Coin collected
    Coin,
    /// Life lost
    Hurt,
    /// Out of lives
    GameOver,
}

/// Playable sounds for one session. Missing entries stay silent.
pub struct AudioBank {
    jump: Option<HtmlAudioElement>,
    coin: Option<HtmlAudioElement>,
    hurt: Option<HtmlAudioElement>,
    game_over: Option<HtmlAudioElement>,
    music: Option<HtmlAudioElement>,
    /// Shared rejection handler for effect playback
    swallow: Function,
    /// Rejection handler for the music, hints once then goes quiet
    music_blocked: Function,
}

impl AudioBank {
    pub fn new(assets: &WebAssets) -> Self {
        let music = assets.sound("background").cloned();
        if let Some(music) = &music {
            music.set_loop(true);
            music.set_volume(0.5);
        }

        let swallow = Closure::<dyn FnMut(JsValue)>::new(|_: JsValue| {})
            .into_js_value()
            .unchecked_into();

        let hinted = Rc::new(Cell::new(false));
        let music_blocked = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| {
            if !hinted.replace(true) {
                log::warn!("background music blocked until a user gesture");
                crate::ui::show_sound_hint();
            }
        })
        .into_js_value()
        .unchecked_into();

        Self {
            jump: assets.sound("jump").cloned(),
            coin: assets.sound("coin").cloned(),
            hurt: assets.sound("hurt").cloned(),
            game_over: assets.sound("game_over").cloned(),
            music,
            swallow,
            music_blocked,
        }
    }

    /// Play one effect, tolerating every failure silently.
    pub fn play(&self, sfx: Sfx) {
        let sound = match sfx {
            Sfx::Jump => &self.jump,
            Sfx::Coin => &self.coin,
            Sfx::Hurt => &self.hurt,
            Sfx::GameOver => &self.game_over,
        };
        let Some(sound) = sound else { return };

        // Fresh node per trigger so overlapping plays don't restart each other
        let Ok(node) = sound.clone_node() else { return };
        let Ok(clone) = node.dyn_into::<HtmlAudioElement>() else {
            return;
        };
        if let Ok(promise) = clone.play() {
            let _ = promise.catch(&self.swallow);
        }
    }

    /// Start the looping background track. Safe to call again after a
    /// restart: playing an already-playing element is a no-op.
    pub fn start_music(&self) {
        let Some(music) = &self.music else { return };
        if let Ok(promise) = music.play() {
            let _ = promise.catch(&self.music_blocked);
        }
    }
}
