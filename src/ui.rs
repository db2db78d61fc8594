//! DOM overlay and HUD wiring
//!
//! The page carries one div per phase overlay plus two HUD counters. All
//! lookups go by element id and silently skip anything the page left out,
//! so a stripped-down host document still runs the game itself.

use web_sys::Document;

use crate::assets::LoadProgress;
use crate::sim::GamePhase;

/// Overlay ids paired with the phase that reveals them.
const OVERLAYS: [(&str, GamePhase); 5] = [
    ("start-screen", GamePhase::NotStarted),
    ("loading-screen", GamePhase::Loading),
    ("pause-screen", GamePhase::Paused),
    ("game-over-screen", GamePhase::GameOver),
    ("win-screen", GamePhase::Won),
];

#[derive(Clone)]
pub struct Hud {
    document: Document,
}

impl Hud {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.document.get_element_by_id(id) {
            element.set_text_content(Some(text));
        }
    }

    pub fn set_score(&self, score: u32) {
        self.set_text("score", &format!("Coins: {score}"));
    }

    pub fn set_lives(&self, lives: u32) {
        self.set_text("lives", &format!("Lives: {lives}"));
    }

    /// Fill in the summary line of whichever terminal screen applies.
    pub fn set_final_score(&self, score: u32, won: bool) {
        if won {
            self.set_text("win-score", &format!("You won! You collected {score} coins"));
        } else {
            self.set_text("final-score", &format!("You collected {score} coins"));
        }
    }

    pub fn set_loading_progress(&self, progress: LoadProgress) {
        if let Some(bar) = self.document.get_element_by_id("loading-bar") {
            let width = format!("width: {:.0}%", progress.fraction() * 100.0);
            let _ = bar.set_attribute("style", &width);
        }
    }

    /// Show the overlay matching `phase` and hide the rest.
    pub fn sync_phase(&self, phase: GamePhase) {
        for (id, shown_in) in OVERLAYS {
            let Some(overlay) = self.document.get_element_by_id(id) else {
                continue;
            };
            if phase == shown_in {
                overlay.set_class_name("overlay");
            } else {
                overlay.set_class_name("overlay hidden");
            }
        }
    }
}

/// Reveal the click-to-enable-sound hint. Called from the audio layer the
/// first time playback is rejected.
pub fn show_sound_hint() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(hint) = document.get_element_by_id("sound-hint") {
        hint.set_class_name("hint");
    }
}
