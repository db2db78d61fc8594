//! Ledge Hopper entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    use ledge_hopper::assets::web::{self, WebAssets};
    use ledge_hopper::assets::AssetManifest;
    use ledge_hopper::audio::{AudioBank, Sfx};
    use ledge_hopper::clock::FrameClock;
    use ledge_hopper::consts::*;
    use ledge_hopper::render::{draw_frame, CanvasSurface, SpriteBank};
    use ledge_hopper::sim::{tick, GameEvent, LevelConfig, TickInput};
    use ledge_hopper::ui::Hud;
    use ledge_hopper::{GamePhase, Session, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        clock: FrameClock,
        input: TickInput,
        surface: CanvasSurface,
        sprites: SpriteBank<HtmlImageElement>,
        /// Populated once the asset batch settles
        audio: Option<AudioBank>,
        hud: Hud,
    }

    impl Game {
        fn new(session: Session, surface: CanvasSurface, hud: Hud) -> Self {
            let clock = FrameClock::new(&session.tuning);
            let enemy_count = session.enemies.len();
            Self {
                session,
                clock,
                input: TickInput::default(),
                surface,
                sprites: SpriteBank::standard(None, None, None, None, enemy_count),
                audio: None,
                hud,
            }
        }

        /// Run simulation sub-steps for one animation frame
        fn update(&mut self, time: f64) {
            let Some(plan) = self.clock.advance(time) else {
                return;
            };

            let input = self.input;
            for _ in 0..plan.count {
                let events = tick(&mut self.session, &input, plan.dt);
                self.handle_events(&events);
                if self.session.phase != GamePhase::Playing {
                    break;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            draw_frame(&mut self.surface, &self.session, &mut self.sprites);
        }

        fn handle_events(&mut self, events: &[GameEvent]) {
            for event in events {
                match *event {
                    GameEvent::Jumped => self.play(Sfx::Jump),
                    GameEvent::CoinCollected => {
                        self.play(Sfx::Coin);
                        self.hud.set_score(self.session.score);
                    }
                    GameEvent::Hurt { lives_left } => {
                        self.play(Sfx::Hurt);
                        self.hud.set_lives(lives_left);
                    }
                    GameEvent::GameOver => {
                        self.play(Sfx::GameOver);
                        self.hud.set_final_score(self.session.score, false);
                        self.hud.sync_phase(self.session.phase);
                    }
                    GameEvent::Won => {
                        self.hud.set_final_score(self.session.score, true);
                        self.hud.sync_phase(self.session.phase);
                    }
                }
            }
        }

        fn play(&self, sfx: Sfx) {
            if let Some(audio) = &self.audio {
                audio.play(sfx);
            }
        }

        fn toggle_pause(&mut self) {
            if self.session.toggle_pause() {
                self.clock.reset();
                self.hud.sync_phase(self.session.phase);
                log::info!("pause toggled, now {:?}", self.session.phase);
            }
        }

        fn auto_pause(&mut self, why: &str) {
            if self.session.auto_pause() {
                self.clock.reset();
                self.hud.sync_phase(self.session.phase);
                log::info!("auto-paused ({why})");
            }
        }

        /// Rebuild the session for another run, reusing loaded assets
        fn restart(&mut self) {
            self.session.reset();
            self.session.begin_loading();
            self.session.finish_loading();
            self.clock.reset();
            self.input = TickInput::default();
            self.hud.set_score(0);
            self.hud.set_lives(self.session.player.lives);
            self.hud.sync_phase(self.session.phase);
            if let Some(audio) = &self.audio {
                audio.start_music();
            }
            log::info!("session restarted");
        }
    }

    /// Optional inline JSON config embedded in the host page
    fn embedded_json<T: serde::de::DeserializeOwned>(
        document: &web_sys::Document,
        id: &str,
    ) -> Option<T> {
        let text = document.get_element_by_id(id)?.text_content()?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("ignoring malformed #{id} config: {err}");
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ledge Hopper starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(VIEWPORT_W as u32);
        canvas.set_height(VIEWPORT_H as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("context lookup failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");
        let surface = CanvasSurface::new(ctx, f64::from(VIEWPORT_W), f64::from(VIEWPORT_H));

        // The page may override the built-in level or tuning
        let level = embedded_json(&document, "level-data").unwrap_or_else(LevelConfig::classic);
        let tuning: Tuning = embedded_json(&document, "tuning-data").unwrap_or_default();

        let session = Session::new(level, tuning);
        let hud = Hud::new(document.clone());
        hud.set_score(0);
        hud.set_lives(session.player.lives);
        hud.sync_phase(session.phase);

        let game = Rc::new(RefCell::new(Game::new(session, surface, hud)));

        // Set up input handlers
        setup_keyboard(&document, game.clone());

        // Set up overlay buttons
        setup_buttons(&document, game.clone());

        // Set up auto-pause on visibility change
        setup_auto_pause(&window, &document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Ledge Hopper running!");
    }

    fn setup_keyboard(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" => {
                        event.prevent_default();
                        g.input.move_right = true;
                    }
                    "ArrowLeft" => {
                        event.prevent_default();
                        g.input.move_left = true;
                    }
                    "ArrowUp" | " " => {
                        event.prevent_default();
                        g.input.jump = true;
                    }
                    "p" | "P" | "Escape" => {
                        event.prevent_default();
                        g.toggle_pause();
                    }
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowRight" => g.input.move_right = false,
                    "ArrowLeft" => g.input.move_left = false,
                    "ArrowUp" | " " => g.input.jump = false,
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        // Start button kicks off the async asset load
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                if game.borrow().session.phase != GamePhase::NotStarted {
                    return;
                }
                wasm_bindgen_futures::spawn_local(load_and_start(game.clone()));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Both terminal screens restart with the cached assets
        for id in ["restart-btn", "play-again-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().restart();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
    ) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    async fn load_and_start(game: Rc<RefCell<Game>>) {
        let hud = {
            let mut g = game.borrow_mut();
            g.session.begin_loading();
            g.hud.sync_phase(g.session.phase);
            g.hud.clone()
        };

        let manifest = AssetManifest::standard();
        let assets: WebAssets = web::load_all(&manifest, |progress| {
            hud.set_loading_progress(progress);
        })
        .await;

        let mut g = game.borrow_mut();
        let enemy_count = g.session.enemies.len();
        g.sprites = SpriteBank::standard(
            assets.image("player").cloned(),
            assets.image("enemy").cloned(),
            assets.image("coin").cloned(),
            assets.image("platform").cloned(),
            enemy_count,
        );
        let audio = AudioBank::new(&assets);
        audio.start_music();
        g.audio = Some(audio);

        g.session.finish_loading();
        g.clock.reset();
        g.hud.sync_phase(g.session.phase);
        log::info!(
            "level start: {} coins, {} enemies, {} lives",
            g.session.coins.len(),
            enemy_count,
            g.session.player.lives
        );
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            // Outside Playing the loop keeps scheduling but touches nothing,
            // so the last drawn frame stays up behind the overlays
            if g.session.phase == GamePhase::Playing {
                g.update(time);
                g.render();
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ledge_hopper::render::{draw_frame, RecordingSurface, SpriteBank};
    use ledge_hopper::sim::{tick, LevelConfig, TickInput};
    use ledge_hopper::{Session, Tuning};

    env_logger::init();
    log::info!("Ledge Hopper (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the playable build");

    let mut session = Session::new(LevelConfig::classic(), Tuning::default());
    session.begin_loading();
    session.finish_loading();

    // Scripted run: hold right and hop every two thirds of a second
    let dt = 1.0 / 60.0;
    for frame in 0..600u32 {
        let input = TickInput {
            move_right: true,
            move_left: false,
            jump: frame % 40 < 2,
        };
        for event in tick(&mut session, &input, dt) {
            log::info!("tick {frame}: {event:?}");
        }
    }

    let mut surface = RecordingSurface::new();
    let mut sprites = SpriteBank::<String>::standard(None, None, None, None, session.enemies.len());
    draw_frame(&mut surface, &session, &mut sprites);

    log::info!(
        "after 10s: phase {:?}, score {}, lives {}, x {:.0}, {} draw ops",
        session.phase,
        session.score,
        session.player.lives,
        session.player.body.pos.x,
        surface.ops.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
