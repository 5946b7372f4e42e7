//! Planet Defense entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use glam::Vec2;
    use planet_defense::ArenaConfig;
    use planet_defense::renderer::CanvasRenderer;
    use planet_defense::sim::{GameEvent, GamePhase, GameState, TickInput, advance};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, config: ArenaConfig) -> Self {
            Self {
                state: GameState::new(seed, config),
                renderer: None,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run one simulation step for this animation frame
        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let events = advance(&mut self.state, &self.input, elapsed);

            // Clear one-shot inputs after processing
            self.input.fire = false;

            for event in events {
                if let GameEvent::GameOver { final_score } = event {
                    show_game_over(final_score);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref renderer) = self.renderer {
                if let Err(e) = renderer.render(&self.state, time) {
                    log::warn!("Render error: {:?}", e);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let document = web_sys::window().unwrap().document().unwrap();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("planetHealth") {
                let health = self.state.health.max(0.0).round();
                el.set_text_content(Some(&health.to_string()));
            }
            if let Some(el) = document.get_element_by_id("pauseBtn") {
                let label = if self.state.phase == GamePhase::Paused {
                    "Resume"
                } else {
                    "Pause"
                };
                el.set_text_content(Some(label));
            }
        }

        /// Keep the playfield in sync with the canvas element size
        fn sync_size(&mut self, canvas: &HtmlCanvasElement) {
            let w = canvas.client_width().max(0) as u32;
            let h = canvas.client_height().max(0) as u32;
            if let Some(ref mut renderer) = self.renderer {
                renderer.resize(w, h);
            }
            if (w as f32, h as f32) != (self.state.playfield.width, self.state.playfield.height) {
                self.state.resize(w as f32, h as f32);
            }
        }

        /// Fresh match from the menu
        fn start(&mut self) {
            self.state.start();
            self.last_time = 0.0;
            self.input.fire = false;
        }
    }

    /// Toggle only the `hidden` class so overlay styling stays on
    fn set_visible(id: &str, visible: bool) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(el) = document.get_element_by_id(id) {
            el.set_class_name(&super::with_hidden(&el.class_name(), !visible));
        }
    }

    /// Game over: show the final score and bring the menu back
    fn show_game_over(final_score: u64) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(el) = document.get_element_by_id("final-score") {
            el.set_text_content(Some(&final_score.to_string()));
        }
        set_visible("game-over", true);
        set_visible("opening", true);
    }

    /// Optional balance overrides from `<canvas data-config='{...}'>`
    fn load_config(canvas: &HtmlCanvasElement) -> ArenaConfig {
        match canvas.get_attribute("data-config") {
            Some(json) => match ArenaConfig::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config overrides from data-config");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring data-config: {}", e);
                    ArenaConfig::default()
                }
            },
            None => ArenaConfig::default(),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Planet Defense starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let seed = js_sys::Date::now() as u64;
        let config = load_config(&canvas);
        let game = Rc::new(RefCell::new(Game::new(seed, config)));
        log::info!("Game initialized with seed: {}", seed);

        match CanvasRenderer::new(canvas.clone(), seed) {
            Ok(renderer) => game.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Canvas 2D unavailable: {:?}", e),
        }
        game.borrow_mut().sync_size(&canvas);

        setup_input_handlers(&canvas, game.clone());
        setup_menu(game.clone());
        setup_auto_pause(game.clone());

        // Start loop immediately; the sim idles until Play
        request_animation_frame(game, canvas);

        log::info!("Planet Defense running!");
    }

    /// Convert a client-space point to canvas pixels
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - aim
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().input.aim = Some(point);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.fire = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - aim
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let point = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().input.aim = Some(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - aim and fire
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if let Some(touch) = event.touches().get(0) {
                    let point = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    g.input.aim = Some(point);
                }
                g.input.fire = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        g.input.fire = true;
                    }
                    "KeyP" | "Escape" => g.state.toggle_pause(),
                    "KeyI" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        let document = web_sys::window().unwrap().document().unwrap();
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("playBtn", move |_| {
                set_visible("opening", false);
                set_visible("game-over", false);
                game.borrow_mut().start();
            });
        }
        on_click("creditsBtn", |_| {
            set_visible("opening", false);
            set_visible("credits", true);
        });
        on_click("backBtn", |_| {
            set_visible("credits", false);
            set_visible("opening", true);
        });
        {
            let game = game.clone();
            on_click("pauseBtn", move |_| game.borrow_mut().state.toggle_pause());
        }
        on_click("restartBtn", move |_| {
            let mut g = game.borrow_mut();
            g.state.reset();
            g.start();
            set_visible("game-over", false);
            log::info!("Game restarted");
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Running {
                        g.state.toggle_pause();
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
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Running {
                    g.state.toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, canvas, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.sync_size(&canvas);
            // Pausing stops the clock too, so resuming doesn't dump a huge frame
            if g.state.phase != GamePhase::Running {
                g.last_time = 0.0;
            }
            g.update(time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game, canvas);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Class list with the `hidden` token added or removed, other classes untouched
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn with_hidden(classes: &str, hidden: bool) -> String {
    let mut tokens: Vec<&str> = classes
        .split_whitespace()
        .filter(|&c| c != "hidden")
        .collect();
    if hidden {
        tokens.push("hidden");
    }
    tokens.join(" ")
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use planet_defense::ArenaConfig;

    env_logger::init();
    log::info!("Planet Defense (native) starting...");
    log::info!("Native mode runs a headless autopilot match - run with `trunk serve` for the web version");

    // Usage: planet-defense [seed] [config.json]
    let mut args = std::env::args().skip(1);
    let seed = args.next().map(|s| s.parse::<u64>()).transpose()?.unwrap_or(1);
    let config = match args.next() {
        Some(path) => ArenaConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ArenaConfig::default(),
    };

    headless_match(seed, config);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one match on autopilot and print a summary
#[cfg(not(target_arch = "wasm32"))]
fn headless_match(seed: u64, config: planet_defense::ArenaConfig) {
    use planet_defense::sim::{GameEvent, GameState, TickInput, advance};

    /// Ten minutes at 60 fps
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    const FRAME_MS: f32 = 1000.0 / 60.0;

    let mut state = GameState::new(seed, config);
    state.resize(800.0, 600.0);
    state.start();

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let (mut spawned, mut fired, mut destroyed, mut impacts) = (0u32, 0u32, 0u32, 0u32);
    let mut frames = 0;
    let mut final_score = None;
    while frames < MAX_FRAMES && final_score.is_none() {
        for event in advance(&mut state, &input, FRAME_MS) {
            match event {
                GameEvent::AsteroidSpawned { .. } => spawned += 1,
                GameEvent::RocketFired { .. } => fired += 1,
                GameEvent::AsteroidDestroyed { .. } => destroyed += 1,
                GameEvent::PlanetImpact { .. } => impacts += 1,
                GameEvent::GameOver { final_score: score } => final_score = Some(score),
                GameEvent::AsteroidHit { .. } => {}
            }
        }
        frames += 1;
        if frames % 3600 == 0 {
            log::info!(
                "t={}s score={} health={:.0} asteroids={} interval={}ms",
                frames / 60,
                state.score,
                state.health,
                state.asteroids.len(),
                state.spawner.interval_ms
            );
        }
    }

    println!("\nHeadless match (seed {seed}, {frames} frames)");
    println!("  asteroids spawned:   {spawned}");
    println!("  rockets fired:       {fired}");
    println!("  asteroids destroyed: {destroyed}");
    println!("  planet impacts:      {impacts}");
    match final_score {
        Some(score) => println!("  game over, final score {score}"),
        None => println!(
            "  survived with score {} and {:.0} health",
            state.score, state.health
        ),
    }
}
