//! Brickwave entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use brickwave::audio::AudioManager;
    use brickwave::consts::*;
    use brickwave::palette;
    use brickwave::renderer::{RenderState, VertexCanvas, draw_frame};
    use brickwave::sim::{FrameInput, Game};
    use brickwave::ui::{Align, HudText};
    use brickwave::Settings;

    /// Browser-side wrapper: simulation plus its collaborators
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        canvas: VertexCanvas,
        audio: AudioManager,
        input: FrameInput,
        last_time: f64,
        /// Text currently in the overlay (rebuilt only on change)
        shown_texts: Vec<HudText>,
        /// CSS pixels per game pixel
        overlay_scale: f32,
    }

    impl App {
        fn new(settings: Settings, seed: u64) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                game: Game::new(settings, seed),
                render_state: None,
                canvas: VertexCanvas::new(),
                audio,
                input: FrameInput::default(),
                last_time: 0.0,
                shown_texts: Vec::new(),
                overlay_scale: 1.0,
            }
        }

        /// Poll input, step the game, dispatch sound cues
        fn update(&mut self, dt: f32) {
            self.audio.update();

            let events = self.game.frame(&self.input, dt);
            for event in &events {
                self.audio.handle(event);
            }

            // Presses are consumed by exactly one frame
            self.input.confirm = false;
            self.input.cancel = false;
        }

        /// Render the current frame
        fn render(&mut self) {
            draw_frame(&self.game, &mut self.canvas);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.canvas.vertices, self.canvas.clear_color) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Mirror the frame's text into the DOM overlay
        fn update_hud(&mut self) {
            if self.canvas.texts == self.shown_texts {
                return;
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let Some(overlay) = document.get_element_by_id("hud") else {
                return;
            };
            overlay.set_inner_html("");

            for text in &self.canvas.texts {
                let Ok(el) = document.create_element("div") else {
                    continue;
                };
                let Ok(el) = el.dyn_into::<HtmlElement>() else {
                    continue;
                };
                el.set_text_content(Some(&text.text));

                let s = self.overlay_scale;
                let style = el.style();
                let _ = style.set_property("position", "absolute");
                let _ = style.set_property("white-space", "nowrap");
                let _ = style.set_property("top", &format!("{}px", text.y * s));
                let _ = style.set_property("left", &format!("{}px", text.x * s));
                let _ = style.set_property("font-size", &format!("{}px", text.size * s));
                let _ = style.set_property("color", &palette::to_css(text.color));
                if text.align == Align::Center {
                    let _ = style.set_property("transform", "translateX(-50%)");
                }
                let _ = overlay.append_child(&el);
            }

            self.shown_texts = self.canvas.texts.clone();
        }

        fn shutdown(&mut self) {
            self.audio.unload();
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("hud"))
            {
                el.set_inner_html("");
            }
            log::info!("Exited after {} sessions", self.game.sessions);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("{} starting...", TITLE);

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        document.set_title(TITLE);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fixed game resolution, scaled by the device pixel ratio
        let dpr = window.device_pixel_ratio();
        let width = (SCREEN_WIDTH as f64 * dpr) as u32;
        let height = (SCREEN_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(settings, seed)));
        {
            let client_w = canvas.client_width().max(1) as f32;
            app.borrow_mut().overlay_scale = client_w / SCREEN_WIDTH;
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {} - rendering disabled", e),
        }

        setup_input_handlers(app.clone());

        request_animation_frame(app);

        log::info!("{} running!", TITLE);
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Key down: held movement keys and latched presses
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => a.input.left = true,
                    "ArrowRight" | "KeyD" => a.input.right = true,
                    "Enter" | "NumpadEnter" if !event.repeat() => a.input.confirm = true,
                    "Escape" if !event.repeat() => a.input.cancel = true,
                    _ => return,
                }
                event.prevent_default();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up: release held keys
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" | "KeyA" => a.input.left = false,
                    "ArrowRight" | "KeyD" => a.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page going away counts as a window close
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().input.close_requested = true;
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                1.0 / TARGET_FPS as f32
            };
            a.last_time = time;

            a.update(dt);
            if !a.game.is_running() {
                a.shutdown();
                return;
            }
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brickwave (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the playable web version");

    let seconds: f32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(60.0);
    autopilot(seconds);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play headless for `seconds` of game time with the paddle chasing the ball
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(seconds: f32) {
    use brickwave::Settings;
    use brickwave::audio::AudioManager;
    use brickwave::consts::TARGET_FPS;
    use brickwave::sim::{FrameInput, Game, GameEvent, Phase};

    let settings = Settings::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut game = Game::new(settings, seed);
    let mut audio = AudioManager::new(&game.settings);

    let dt = 1.0 / TARGET_FPS as f32;
    let frames = (seconds.max(0.0) * TARGET_FPS as f32) as u64;
    let mut best = 0u64;
    let mut waves = 0u32;

    for _ in 0..frames {
        let mut input = FrameInput::default();
        match game.phase {
            Phase::Start | Phase::GameOver => input.confirm = true,
            Phase::Playing => {
                let target = game.ball.pos.x;
                let center = game.paddle.rect.x + game.paddle.rect.width / 2.0;
                input.left = target < center - 10.0;
                input.right = target > center + 10.0;
            }
            Phase::Exit => break,
        }

        for event in game.frame(&input, dt) {
            audio.handle(&event);
            match event {
                GameEvent::WaveCleared { .. } => waves += 1,
                GameEvent::BallLost => best = best.max(game.state.score),
                _ => {}
            }
        }
        audio.update();
    }
    best = best.max(game.state.score);

    game.frame(
        &FrameInput {
            close_requested: true,
            ..Default::default()
        },
        dt,
    );
    let sounds = audio.played.len();
    audio.unload();

    log::info!(
        "Autopilot done: {} sessions, best score {}, {} waves cleared, {} sounds, ball speed {}",
        game.sessions,
        best,
        waves,
        sounds,
        game.difficulty.ball_speed
    );
    println!(
        "sessions={} best_score={} waves={} multiplier=x{}",
        game.sessions, best, waves, game.difficulty.wave_multiplier
    );
}
