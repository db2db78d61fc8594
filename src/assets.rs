//! Asset loading
//!
//! A manifest names every image and sound the game wants. Loading resolves
//! each entry independently: a failed fetch becomes an absent entry, never
//! an aborted batch. Downstream code treats every lookup as optional, with
//! flat-color rendering and silence as the fallbacks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named image and sound sources.
///
/// Ordered maps keep load order (and therefore progress reporting)
/// deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub images: BTreeMap<String, String>,
    #[serde(default)]
    pub sounds: BTreeMap<String, String>,
}

impl AssetManifest {
    /// Manifest for the bundled art and sounds.
    pub fn standard() -> Self {
        let mut images = BTreeMap::new();
        images.insert("player".to_string(), "assets/sprites/player.png".to_string());
        images.insert("enemy".to_string(), "assets/sprites/enemy.png".to_string());
        images.insert("coin".to_string(), "assets/sprites/coin.png".to_string());
        images.insert(
            "platform".to_string(),
            "assets/sprites/platform.png".to_string(),
        );

        let mut sounds = BTreeMap::new();
        sounds.insert("jump".to_string(), "assets/sounds/jump.wav".to_string());
        sounds.insert("coin".to_string(), "assets/sounds/coin.wav".to_string());
        sounds.insert("hurt".to_string(), "assets/sounds/hurt.wav".to_string());
        sounds.insert(
            "game_over".to_string(),
            "assets/sounds/gameover.wav".to_string(),
        );
        sounds.insert(
            "background".to_string(),
            "assets/sounds/background.wav".to_string(),
        );

        Self { images, sounds }
    }

    pub fn total(&self) -> usize {
        self.images.len() + self.sounds.len()
    }
}

/// Snapshot of batch progress, reported after every individual resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub completed: usize,
    pub total: usize,
}

impl LoadProgress {
    /// Completion in [0, 1]. An empty batch is already done.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f32 / self.total as f32
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

/// Counts resolutions as the batch settles.
#[derive(Debug)]
pub struct AssetTally {
    total: usize,
    completed: usize,
    failed: usize,
}

impl AssetTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            failed: 0,
        }
    }

    /// Record one settled entry and return the progress to report.
    pub fn resolve(&mut self, ok: bool) -> LoadProgress {
        self.completed += 1;
        if !ok {
            self.failed += 1;
        }
        LoadProgress {
            completed: self.completed,
            total: self.total,
        }
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}

/// Loaded handles by name.
///
/// Generic over the handle types so the store works against browser
/// elements in the game and plain values in tests.
#[derive(Clone, Debug)]
pub struct LoadedAssets<I, S> {
    images: BTreeMap<String, I>,
    sounds: BTreeMap<String, S>,
}

impl<I, S> Default for LoadedAssets<I, S> {
    fn default() -> Self {
        Self {
            images: BTreeMap::new(),
            sounds: BTreeMap::new(),
        }
    }
}

impl<I, S> LoadedAssets<I, S> {
    pub fn insert_image(&mut self, name: &str, handle: I) {
        self.images.insert(name.to_string(), handle);
    }

    pub fn insert_sound(&mut self, name: &str, handle: S) {
        self.sounds.insert(name.to_string(), handle);
    }

    /// Absent when the manifest never named it or its load failed.
    pub fn image(&self, name: &str) -> Option<&I> {
        self.images.get(name)
    }

    pub fn sound(&self, name: &str) -> Option<&S> {
        self.sounds.get(name)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }
}

#[cfg(target_arch = "wasm32")]
pub mod web {
    //! Browser loader: one `HtmlImageElement`/`HtmlAudioElement` per entry,
    //! readiness observed through a promise per element.

    use js_sys::Promise;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlAudioElement, HtmlImageElement};

    use super::{AssetManifest, AssetTally, LoadProgress, LoadedAssets};

    pub type WebAssets = LoadedAssets<HtmlImageElement, HtmlAudioElement>;

    /// Load everything in the manifest, calling `on_progress` after each
    /// entry settles. Failed entries are logged and left absent.
    pub async fn load_all(
        manifest: &AssetManifest,
        mut on_progress: impl FnMut(LoadProgress),
    ) -> WebAssets {
        let mut assets = WebAssets::default();
        let mut tally = AssetTally::new(manifest.total());

        // Start every request before awaiting any, so the fetches overlap.
        // Awaiting then happens in manifest order, which keeps progress
        // deterministic even though the network is not.
        let images: Vec<_> = manifest
            .images
            .iter()
            .map(|(name, src)| (name, start_image(src)))
            .collect();
        let sounds: Vec<_> = manifest
            .sounds
            .iter()
            .map(|(name, src)| (name, start_sound(src)))
            .collect();

        for (name, started) in images {
            let ok = match started {
                Ok((element, ready)) => match JsFuture::from(ready).await {
                    Ok(_) => {
                        assets.insert_image(name, element);
                        true
                    }
                    Err(_) => false,
                },
                Err(_) => false,
            };
            if !ok {
                log::warn!("image '{name}' failed to load, falling back to flat color");
            }
            on_progress(tally.resolve(ok));
        }

        for (name, started) in sounds {
            let ok = match started {
                Ok((element, ready)) => match JsFuture::from(ready).await {
                    Ok(_) => {
                        assets.insert_sound(name, element);
                        true
                    }
                    Err(_) => false,
                },
                Err(_) => false,
            };
            if !ok {
                log::warn!("sound '{name}' failed to load, it will stay silent");
            }
            on_progress(tally.resolve(ok));
        }

        log::info!(
            "assets loaded: {} images, {} sounds, {} missing",
            assets.image_count(),
            assets.sound_count(),
            tally.failed()
        );
        assets
    }

    /// Create the element and kick off its fetch. The returned promise
    /// resolves on load and rejects on error.
    fn start_image(src: &str) -> Result<(HtmlImageElement, Promise), JsValue> {
        let element = HtmlImageElement::new()?;
        let ready = Promise::new(&mut |resolve, reject| {
            let on_load = Closure::once_into_js(move |_: web_sys::Event| {
                let _ = resolve.call0(&JsValue::NULL);
            });
            element.set_onload(Some(on_load.unchecked_ref()));
            let on_error = Closure::once_into_js(move |_: web_sys::Event| {
                let _ = reject.call0(&JsValue::NULL);
            });
            element.set_onerror(Some(on_error.unchecked_ref()));
        });
        element.set_src(src);
        Ok((element, ready))
    }

    /// Audio readiness means `canplaythrough`: enough is buffered that the
    /// clip can play without stalling.
    fn start_sound(src: &str) -> Result<(HtmlAudioElement, Promise), JsValue> {
        let element = HtmlAudioElement::new_with_src(src)?;
        let ready = Promise::new(&mut |resolve, reject| {
            let on_ready = Closure::once_into_js(move |_: web_sys::Event| {
                let _ = resolve.call0(&JsValue::NULL);
            });
            element.set_oncanplaythrough(Some(on_ready.unchecked_ref()));
            let on_error = Closure::once_into_js(move |_: web_sys::Event| {
                let _ = reject.call0(&JsValue::NULL);
            });
            element.set_onerror(Some(on_error.unchecked_ref()));
        });
        element.load();
        Ok((element, ready))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_manifest_is_complete() {
        let manifest = AssetManifest::standard();
        assert_eq!(manifest.total(), 9);
        assert!(manifest.images.contains_key("player"));
        assert!(manifest.images.contains_key("platform"));
        assert!(manifest.sounds.contains_key("background"));
        assert!(manifest.sounds.contains_key("game_over"));
    }

    #[test]
    fn test_manifest_parses_with_missing_sections() {
        let manifest: AssetManifest =
            serde_json::from_str(r#"{"images": {"player": "p.png"}}"#).unwrap();
        assert_eq!(manifest.images.len(), 1);
        assert!(manifest.sounds.is_empty());
        assert_eq!(manifest.total(), 1);
    }

    #[test]
    fn test_tally_reports_progress_per_resolution() {
        let mut tally = AssetTally::new(3);
        let p = tally.resolve(true);
        assert_eq!(p, LoadProgress { completed: 1, total: 3 });
        assert!(!p.is_done());

        let p = tally.resolve(false);
        assert!((p.fraction() - 2.0 / 3.0).abs() < 1e-6);

        let p = tally.resolve(true);
        assert!(p.is_done());
        assert_eq!(p.fraction(), 1.0);
        assert_eq!(tally.failed(), 1);
    }

    #[test]
    fn test_empty_batch_is_already_done() {
        let p = LoadProgress { completed: 0, total: 0 };
        assert_eq!(p.fraction(), 1.0);
        assert!(p.is_done());
    }

    #[test]
    fn test_missing_assets_stay_absent() {
        let mut assets: LoadedAssets<String, String> = LoadedAssets::default();
        assets.insert_image("player", "player-image".to_string());

        assert_eq!(assets.image("player"), Some(&"player-image".to_string()));
        assert_eq!(assets.image("enemy"), None);
        assert_eq!(assets.sound("jump"), None);
        assert_eq!(assets.image_count(), 1);
        assert_eq!(assets.sound_count(), 0);
    }
}
