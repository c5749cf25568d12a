//! Nexus Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlInputElement, TouchEvent};

    use nexus_runner::audio::{AudioManager, SoundEffect};
    use nexus_runner::persistence::LocalStorage;
    use nexus_runner::platform::{self, TouchTracker};
    use nexus_runner::profiles::format_last_played;
    use nexus_runner::renderer::CanvasRenderer;
    use nexus_runner::sim::{GamePhase, Intent};
    use nexus_runner::{Hud, Session};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorage>,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        touch: TouchTracker,
        // Track phase to refresh screens only on change
        last_phase: Option<GamePhase>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let session = Session::new(LocalStorage::new(), seed);
            let audio = AudioManager::new(session.settings());
            Self {
                session,
                renderer: None,
                audio,
                touch: TouchTracker::new(),
                last_phase: None,
            }
        }

        /// Run simulation ticks and play the resulting sounds
        fn update(&mut self, time: f64) {
            self.session.frame(time);
            for event in self.session.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Render the current frame
        fn render(&self, time: f64) {
            if let Some(renderer) = &self.renderer {
                renderer.render(self.session.state(), self.session.settings(), time);
            }
        }

        fn intent(&mut self, intent: Intent) {
            // Touch on the menu starts a run, as the start button does
            if self.session.phase() == GamePhase::Menu && intent == Intent::Jump {
                self.session.start(platform::run_seed());
                return;
            }
            self.session.push_intent(intent);
        }

        fn toggle_audio(&mut self) {
            let mut settings = self.session.settings().clone();
            settings.audio_enabled = !settings.audio_enabled;
            self.audio.apply_settings(&settings);
            log::info!("Audio: {}", settings.audio_enabled);
            self.session.update_settings(settings);
        }

        /// Step through the quality presets; applies the particle budget at once
        fn cycle_quality(&mut self) {
            let mut settings = self.session.settings().clone();
            settings.quality = settings.quality.next();
            log::info!("Quality: {}", settings.quality.as_str());
            if let Some(document) = current_document() {
                set_text(&document, "quality-btn", settings.quality.as_str());
            }
            self.session.update_settings(settings);
        }

        /// Update HUD elements and screens in the DOM
        fn update_hud(&mut self) {
            let Some(document) = current_document() else { return };
            let hud = self.session.hud();

            set_text(&document, "hud-score", &hud.score.to_string());
            set_text(&document, "hud-best", &hud.best_score.to_string());
            set_text(&document, "hud-theme", hud.theme_name);
            if self.session.settings().show_fps {
                set_text(&document, "hud-fps", &hud.fps.to_string());
            }
            set_width(&document, "speed-bar", hud.speed_fraction);
            update_power_up(&document, &hud);

            if self.last_phase != Some(hud.phase) {
                self.last_phase = Some(hud.phase);
                self.show_screens(&document, &hud);
            }
        }

        fn show_screens(&self, document: &Document, hud: &Hud) {
            let phase = hud.phase;
            set_visible(document, "login-screen", phase == GamePhase::Login);
            set_visible(document, "menu-screen", phase == GamePhase::Menu);
            set_visible(document, "pause-menu", phase == GamePhase::Paused);
            set_visible(document, "game-over", phase == GamePhase::GameOver);
            set_visible(
                document,
                "hud",
                matches!(phase, GamePhase::Playing | GamePhase::Paused),
            );
            set_visible(
                document,
                "fps-counter",
                self.session.settings().show_fps,
            );

            if let Some(name) = &hud.profile_name {
                set_text(document, "profile-name", name);
            }

            match phase {
                GamePhase::Login => self.fill_profile_list(document),
                GamePhase::GameOver => {
                    if let Some(result) = self.session.last_result() {
                        set_text(document, "final-score", &result.score.to_string());
                        set_text(document, "final-best", &result.best_score.to_string());
                        set_visible(document, "new-record", result.new_best);
                    }
                }
                _ => {}
            }
        }

        /// One list entry per profile; clicking an entry signs in
        fn fill_profile_list(&self, document: &Document) {
            let Some(list) = document.get_element_by_id("profile-list") else {
                return;
            };
            list.set_inner_html("");
            let now = platform::now_ms();
            for profile in self.session.profiles().list() {
                let Ok(item) = document.create_element("li") else {
                    continue;
                };
                let _ = item.set_attribute("data-name", &profile.name);
                item.set_text_content(Some(&format!(
                    "{} - best {} - {}",
                    profile.name,
                    profile.best_score,
                    format_last_played(profile.last_played, now)
                )));
                let _ = list.append_child(&item);
            }
        }
    }

    fn current_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if visible {
                el.class_list().remove_1("hidden")
            } else {
                el.class_list().add_1("hidden")
            };
        }
    }

    fn set_width(document: &Document, id: &str, fraction: f32) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("style", &format!("width: {:.1}%", fraction * 100.0));
        }
    }

    fn update_power_up(document: &Document, hud: &Hud) {
        match hud.power_up {
            Some((kind, left)) => {
                set_visible(document, "power-up-indicator", true);
                set_text(document, "power-up-name", kind.label());
                set_width(document, "power-up-timer", left);
            }
            None => set_visible(document, "power-up-indicator", false),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Nexus Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        canvas.set_width((canvas.client_width() as f64 * dpr) as u32);
        canvas.set_height((canvas.client_height() as f64 * dpr) as u32);

        let seed = platform::run_seed();
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        match CanvasRenderer::new(&canvas) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::warn!("2D canvas unavailable, drawing disabled: {:?}", e),
        }

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_resize(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_profile_list(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        // Hide loading indicator
        set_visible(&document, "loading", false);

        // Start game loop
        request_animation_frame(game);

        log::info!("Nexus Runner running!");
        Ok(())
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Don't steal keys from the name field
                if event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some()
                {
                    return;
                }
                let code = event.code();
                if platform::is_game_key(&code) {
                    event.prevent_default();
                }
                if pressed && code == "KeyI" {
                    let mut g = game.borrow_mut();
                    let on = !g.session.autopilot();
                    g.session.set_autopilot(on);
                    return;
                }
                if let Some(intent) = platform::key_intent(&code, pressed, event.repeat()) {
                    game.borrow_mut().intent(intent);
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start (jump)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    if let Some(intent) = g.touch.start(touch.client_y() as f32) {
                        g.intent(intent);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move (swipe down to slide)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    if let Some(intent) = g.touch.moved(touch.client_y() as f32) {
                        g.intent(intent);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end (stop sliding)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if let Some(intent) = g.touch.end() {
                    g.intent(intent);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(renderer) = game.borrow_mut().renderer.as_mut() {
                renderer.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Login with the typed name
        {
            let game = game.clone();
            on_click(document, "login-btn", move || {
                let Some(document) = current_document() else { return };
                let Some(input) = document
                    .get_element_by_id("username-input")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                if game.borrow_mut().session.login(&input.value()) {
                    input.set_value("");
                }
            });
        }

        for id in ["start-btn", "restart-btn", "play-again-btn"] {
            let game = game.clone();
            on_click(document, id, move || {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.session.start(platform::run_seed());
            });
        }

        {
            let game = game.clone();
            on_click(document, "resume-btn", move || {
                game.borrow_mut().session.push_intent(Intent::PauseToggle);
            });
        }

        {
            let game = game.clone();
            on_click(document, "menu-btn", move || {
                game.borrow_mut().session.back_to_menu();
            });
        }

        {
            let game = game.clone();
            on_click(document, "logout-btn", move || {
                game.borrow_mut().session.logout();
            });
        }

        {
            let game = game.clone();
            on_click(document, "audio-toggle", move || {
                game.borrow_mut().toggle_audio();
            });
        }

        set_text(document, "quality-btn", game.borrow().session.settings().quality.as_str());
        on_click(document, "quality-btn", move || {
            game.borrow_mut().cycle_quality();
        });
    }

    fn setup_profile_list(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(list) = document.get_element_by_id("profile-list") else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let name = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("data-name"));
            if let Some(name) = name {
                game.borrow_mut().session.login(&name);
            }
        });
        let _ = list.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.phase() == GamePhase::Playing {
                        g.session.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.session.phase() == GamePhase::Playing {
                    g.session.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Failed to start: {:?}", e);
    }
}

/// Headless demo: the autopilot plays runs and the results go to an
/// in-memory profile
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use nexus_runner::Session;
    use nexus_runner::persistence::MemoryStorage;
    use nexus_runner::platform;
    use nexus_runner::sim::GamePhase;

    env_logger::init();
    log::info!("Nexus Runner (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the web version");

    const RUNS: u64 = 3;
    // About ten minutes of play per run at 60 Hz
    const MAX_TICKS: u32 = 36_000;

    let mut session = Session::new(MemoryStorage::new(), 0);
    session.login("demo");
    session.set_autopilot(true);

    let base_seed = platform::run_seed();
    for run in 0..RUNS {
        let seed = base_seed.wrapping_add(run);
        session.start(seed);
        let mut ticks = 0;
        while session.phase() == GamePhase::Playing && ticks < MAX_TICKS {
            session.step();
            ticks += 1;
        }
        session.drain_events();

        let state = session.state();
        match session.last_result() {
            Some(result) => println!(
                "Run {} (seed {}): score {} in {} ticks, theme {}{}",
                run + 1,
                seed,
                result.score,
                ticks,
                state.theme().name,
                if result.new_best { " - new record!" } else { "" }
            ),
            None => println!(
                "Run {} (seed {}): still going after {} ticks with score {}",
                run + 1,
                seed,
                ticks,
                state.score
            ),
        }
    }

    if let Some(profile) = session.current_profile() {
        println!(
            "\n{}: best {}, {} games, average {}",
            profile.name,
            profile.best_score,
            profile.total_games,
            profile.average_score()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
