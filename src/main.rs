//! Treasure Dive entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent, Window};

    use treasure_dive::consts::MAX_FRAME_DT;
    use treasure_dive::hud::{FpsCounter, INSTRUCTIONS, hud_item_class};
    use treasure_dive::renderer::SdfRenderState;
    use treasure_dive::sim::{GameEvent, Session, TouchJoystick, tick};
    use treasure_dive::{HudView, Settings};

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        last_time: f64,
        fps: FpsCounter,
        joystick: TouchJoystick,
        /// Identifier of the touch currently driving the joystick
        joystick_touch: Option<i32>,
        /// Last HUD pushed to the DOM
        hud: Option<HudView>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                session: Session::with_treasures(seed, settings.treasure_count),
                settings,
                render_state: None,
                last_time: 0.0,
                fps: FpsCounter::new(),
                joystick: TouchJoystick::default(),
                joystick_touch: None,
                hud: None,
            }
        }

        /// Advance one rendered frame
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.clamp(0.0, MAX_FRAME_DT);
            for event in tick(&mut self.session, dt) {
                if let GameEvent::TreasureCollected { id, .. } = &event {
                    pop_element("hud-treasures");
                    log::debug!("HUD pop for {}", id);
                }
            }
            self.fps.record(time);
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.session, &self.settings, time) {
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

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            if self.settings.show_fps {
                set_text(document, "#hud-fps .hud-value", &self.fps.fps().to_string());
            }

            let changes = self.session.state.take_changes();
            if !(changes.score || changes.treasures) && self.hud.is_some() {
                return;
            }

            let hud = HudView::from_state(&self.session.state);
            set_text(document, "#hud-score .hud-value", &hud.score);
            set_text(document, "#hud-treasures .hud-value", &hud.treasures);

            if let Some(el) = document.get_element_by_id("win-banner") {
                match &hud.win_message {
                    Some(message) => {
                        let _ = el.set_attribute("class", "");
                        set_text(document, "#final-score", message);
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
            self.hud = Some(hud);
        }

        /// Start a fresh session; whatever is still held keeps steering
        fn restart(&mut self, seed: u64) {
            self.session.restart(seed, self.settings.treasure_count);
            self.hud = None;
            log::info!("Session restarted with seed: {}", seed);
        }

        fn viewport(window: &Window) -> Vec2 {
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            Vec2::new(w as f32, h as f32)
        }

        /// Move the joystick knob overlay to match the current vector
        fn draw_knob(&self, document: &Document, vector: Vec2) {
            if let Some(knob) = document.get_element_by_id("joystick-knob") {
                let offset = Vec2::new(vector.x, -vector.y) * self.joystick.radius;
                let _ = knob.set_attribute(
                    "style",
                    &format!("transform: translate({:.1}px, {:.1}px)", offset.x, offset.y),
                );
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    /// Replay the pop animation, even if the previous one is still attached
    fn pop_element(id: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };
        let _ = el.set_attribute("class", hud_item_class(false));
        // Reading layout flushes the class removal so the animation restarts
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let _ = html.offset_width();
        }
        let _ = el.set_attribute("class", hud_item_class(true));
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Treasure Dive starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let settings = Settings::from_query(&window.location().search().unwrap_or_default());
        if let Ok(json) = serde_json::to_string(&settings) {
            log::info!("Settings: {}", json);
        }

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Cap device pixel ratio; the ray-marcher is fill-rate bound
        let dpr = window.device_pixel_ratio().min(1.5);
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = SdfRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        render_state.set_start_time(js_sys::Date::now());
        game.borrow_mut().render_state = Some(render_state);

        if let Some(el) = document.get_element_by_id("instructions") {
            el.set_text_content(Some(&INSTRUCTIONS.join(" · ")));
        }
        if !game.borrow().settings.show_fps {
            if let Some(el) = document.get_element_by_id("hud-fps") {
                let _ = el.set_attribute("class", "hidden");
            }
        }

        setup_keyboard(&window, game.clone())?;
        setup_touch_joystick(&window, game.clone())?;
        setup_focus_loss(&window, &document, game.clone())?;
        setup_restart_button(&document, game.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Treasure Dive running!");
        Ok(())
    }

    fn setup_keyboard(window: &Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                if g.session.key_down(&code) {
                    event.prevent_default();
                    return;
                }
                // Dump the render projection for debugging
                if code == "Backquote" {
                    match g.session.state.snapshot().to_json() {
                        Ok(json) => log::info!("{}", json),
                        Err(e) => log::warn!("Snapshot failed: {}", e),
                    }
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().session.key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_touch_joystick(window: &Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Touch start inside the joystick zone claims the stick
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let viewport = Game::viewport(&window);
                let mut g = game.borrow_mut();
                if g.joystick_touch.is_some() {
                    return;
                }
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else {
                        continue;
                    };
                    let point = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    if g.joystick.in_zone(point, viewport) {
                        event.prevent_default();
                        g.joystick_touch = Some(touch.identifier());
                        let vector = g.joystick.vector(point, viewport);
                        g.session.touch_move(vector);
                        if let Some(document) = window.document() {
                            g.draw_knob(&document, vector);
                        }
                        break;
                    }
                }
            });
            window.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move updates the vector
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let viewport = Game::viewport(&window);
                let mut g = game.borrow_mut();
                let Some(active) = g.joystick_touch else {
                    return;
                };
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else {
                        continue;
                    };
                    if touch.identifier() != active {
                        continue;
                    }
                    event.prevent_default();
                    let point = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    let vector = g.joystick.vector(point, viewport);
                    g.session.touch_move(vector);
                    if let Some(document) = window.document() {
                        g.draw_knob(&document, vector);
                    }
                }
            });
            window.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end / cancel releases the stick
        for event_name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let Some(active) = g.joystick_touch else {
                    return;
                };
                let touches = event.changed_touches();
                let released = (0..touches.length())
                    .filter_map(|i| touches.get(i))
                    .any(|t| t.identifier() == active);
                if released {
                    g.joystick_touch = None;
                    g.session.touch_end();
                    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                        g.draw_knob(&document, Vec2::ZERO);
                    }
                }
            });
            window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Release held input when the page loses focus so the diver stops
    fn setup_focus_loss(
        window: &Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.joystick_touch = None;
                    g.session.release_all();
                    log::info!("Input released (tab hidden)");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.joystick_touch = None;
                g.session.release_all();
                log::info!("Input released (window blur)");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                // A fixed seed from the URL replays the same layout
                let seed = g
                    .settings
                    .seed
                    .unwrap_or_else(|| js_sys::Date::now() as u64);
                g.restart(seed);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // First frame has no delta
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session: an autopilot swims to each chest in turn
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use treasure_dive::consts::{INPUT_DEAD_ZONE, TREASURE_COUNT};
    use treasure_dive::horizontal_distance;
    use treasure_dive::sim::{Session, tick, view_to_world};
    use treasure_dive::HudView;

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    log::info!("Treasure Dive (native) starting with seed {}", seed);
    log::info!("Rendering requires the web build - run with `trunk serve`");

    let mut session = Session::with_treasures(seed, TREASURE_COUNT);
    let dt = 1.0 / 60.0;
    let max_frames = 60 * 60 * 5;

    // Chests sitting too far below the swim height cannot be reached
    let mut skipped: Vec<String> = Vec::new();

    while session.frame < max_frames && !session.state.all_collected() {
        let diver = session.state.diver().position;
        let target = session
            .state
            .treasures()
            .iter()
            .filter(|t| !t.collected && !skipped.contains(&t.id))
            .min_by(|a, b| {
                horizontal_distance(a.position, diver)
                    .total_cmp(&horizontal_distance(b.position, diver))
            })
            .map(|t| (t.id.clone(), t.position));

        let Some((id, target)) = target else {
            break;
        };

        if horizontal_distance(target, diver) < 0.25 {
            log::warn!("Skipping {} (out of reach at y={:.2})", id, target.y);
            skipped.push(id);
            continue;
        }

        let to_target = glam::Vec2::new(target.x - diver.x, target.z - diver.z);
        // Invert the camera rotation so the stick points at the chest
        let stick = view_to_world(to_target.normalize_or_zero(), -session.camera.yaw());
        if stick.length() > INPUT_DEAD_ZONE {
            session.touch_move(stick);
        } else {
            session.touch_end();
        }

        for event in tick(&mut session, dt) {
            log::debug!("{:?}", event);
        }
    }

    let hud = HudView::from_state(&session.state);
    log::info!(
        "Finished after {} frames: score {}, treasures {}",
        session.frame,
        hud.score,
        hud.treasures
    );
    if let Some(message) = hud.win_message {
        log::info!("All Treasures Found! {}", message);
    }
}
