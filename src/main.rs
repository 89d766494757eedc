//! Spin & Scratch entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::Clamped;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement, ImageData,
        KeyboardEvent, MouseEvent, TouchEvent,
    };

    use spin_scratch::audio::{AudioManager, SoundEffect};
    use spin_scratch::consts::*;
    use spin_scratch::game::{
        AddSegment, GameEvent, GameState, InputChannel, TickInput, segment_degree, tick,
    };
    use spin_scratch::renderer::{WheelRenderer, shapes};
    use spin_scratch::settings::Settings;

    /// App instance holding all state
    struct App {
        state: GameState,
        renderer: Option<WheelRenderer>,
        audio: AudioManager,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        scratch_ctx: Option<CanvasRenderingContext2d>,
        /// Message to alert() once the RefCell borrow is released
        pending_alert: Option<String>,
        /// Hide the "scratch more" warning after this timestamp (ms)
        warning_until: f64,
    }

    impl App {
        fn new(seed: u64, settings: Settings) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                state: GameState::with_settings(seed, settings),
                renderer: None,
                audio,
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                scratch_ctx: None,
                pending_alert: None,
                warning_until: 0.0,
            }
        }

        /// Run fixed-step ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = std::mem::take(&mut self.input);
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// React to game events: sounds, modal, lists
        fn handle_events(&mut self, document: &Document, time: f64) {
            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }

                match event {
                    GameEvent::SpinLanded { .. } => self.open_modal(document),
                    GameEvent::ChallengeCompleted { .. } | GameEvent::ChallengeSkipped { .. } => {
                        set_hidden(document, "modal", true);
                        set_hidden(document, "scratch-warning", true);
                    }
                    GameEvent::CompletionRejected { percent } => {
                        log::debug!("Rejected at {:.1}%", percent);
                        set_hidden(document, "scratch-warning", false);
                        self.warning_until = time + 2500.0;
                    }
                    GameEvent::SegmentAdded { .. } => self.rebuild_segments(document),
                    GameEvent::TargetChanged { target } => {
                        if let Some(input) = input_by_id(document, "target-input") {
                            input.set_value(&target.to_string());
                        }
                    }
                    GameEvent::GiftOpened => {
                        self.pending_alert = Some(self.state.settings().unlock_message.clone());
                    }
                    GameEvent::SpinStarted { .. }
                    | GameEvent::SegmentPassed { .. }
                    | GameEvent::ScratchRevealed
                    | GameEvent::Unlocked => {}
                }
            }

            if self.warning_until > 0.0 && time > self.warning_until {
                set_hidden(document, "scratch-warning", true);
                self.warning_until = 0.0;
            }
        }

        /// Show the reveal modal and size the scratch card to its canvas
        fn open_modal(&mut self, document: &Document) {
            if let Some(el) = document.get_element_by_id("challenge-text") {
                el.set_text_content(self.state.selected_label());
            }
            set_hidden(document, "modal", false);

            let Some(canvas) = canvas_by_id(document, "scratch-canvas") else {
                log::warn!("No #scratch-canvas; card keeps its default size");
                return;
            };
            let w = canvas.client_width().max(1) as u32;
            let h = canvas.client_height().max(1) as u32;
            canvas.set_width(w);
            canvas.set_height(h);
            self.state.prepare_card(w, h);

            self.scratch_ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
            if self.scratch_ctx.is_none() {
                log::warn!("2D context unavailable; scratch card will not be drawn");
            }
        }

        /// Copy the scratch raster to its canvas when it changed
        fn upload_scratch(&mut self) {
            if !self.state.scratch_mut().take_dirty() {
                return;
            }
            let Some(ctx) = &self.scratch_ctx else { return };
            let scratch = self.state.scratch();
            if scratch.width() == 0 || scratch.height() == 0 {
                return;
            }

            let image = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(scratch.pixels()),
                scratch.width(),
                scratch.height(),
            );
            match image {
                Ok(image) => {
                    if let Err(e) = ctx.put_image_data(&image, 0.0, 0.0) {
                        log::warn!("putImageData failed: {:?}", e);
                    }
                }
                Err(e) => log::warn!("ImageData creation failed: {:?}", e),
            }
        }

        /// Render the wheel
        fn render(&mut self, document: &Document) {
            let rotation = self.state.wheel().displayed_rotation();
            let highlight = if self.state.is_spinning() {
                None
            } else {
                self.state.selected_index()
            };

            if let Some(renderer) = self.renderer.as_mut() {
                let vertices = shapes::wheel(self.state.segments().len(), rotation, highlight);
                match renderer.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size.0, renderer.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            // Number labels ride along with the wheel
            if let Some(el) = document.get_element_by_id("wheel-labels") {
                let _ = el.set_attribute("style", &format!("transform: rotate({:.3}deg)", rotation));
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let progress = self.state.progress();

            if let Some(el) = document.get_element_by_id("stars-count") {
                el.set_text_content(Some(&progress.stars().to_string()));
            }
            if let Some(el) = document.get_element_by_id("stars-target") {
                el.set_text_content(Some(&progress.target().to_string()));
            }

            if let Some(btn) = document.get_element_by_id("spin-btn") {
                if self.state.is_spinning() {
                    let _ = btn.set_attribute("disabled", "");
                    btn.set_text_content(Some("Spinning..."));
                } else {
                    let _ = btn.remove_attribute("disabled");
                    btn.set_text_content(Some("Spin"));
                }
            }

            set_hidden(document, "congrats", !self.state.is_unlocked());
        }

        /// Rebuild the segment list panel and wheel number labels
        fn rebuild_segments(&self, document: &Document) {
            let segments = self.state.segments();

            if let Some(el) = document.get_element_by_id("segment-count") {
                el.set_text_content(Some(&segments.len().to_string()));
            }
            if let Some(input) = input_by_id(document, "target-input") {
                input.set_max(&segments.len().to_string());
            }

            if let Some(list) = document.get_element_by_id("segment-list") {
                list.set_text_content(None);
                for label in segments.iter() {
                    if let Ok(row) = document.create_element("div") {
                        let _ = row.set_attribute("class", "segment-row");
                        row.set_text_content(Some(label));
                        let _ = list.append_child(&row);
                    }
                }
            }

            if let Some(labels) = document.get_element_by_id("wheel-labels") {
                labels.set_text_content(None);
                let seg = segment_degree(segments.len());
                for i in 0..segments.len() {
                    let Ok(el) = document.create_element("div") else {
                        continue;
                    };
                    let center = i as f64 * seg + seg / 2.0;
                    let _ = el.set_attribute("class", "wheel-label");
                    let _ = el.set_attribute(
                        "style",
                        &format!("transform: rotate({:.3}deg) translateY(-38%)", center),
                    );
                    el.set_text_content(Some(&(i + 1).to_string()));
                    let _ = labels.append_child(&el);
                }
            }
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn canvas_by_id(document: &Document, id: &str) -> Option<HtmlCanvasElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Client position to scratch-canvas pixel coordinates
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> (f32, f32) {
        let rect = canvas.get_bounding_client_rect();
        let sx = if rect.width() > 0.0 {
            canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        let sy = if rect.height() > 0.0 {
            canvas.height() as f64 / rect.height()
        } else {
            1.0
        };
        (
            ((client_x - rect.left()) * sx) as f32,
            ((client_y - rect.top()) * sy) as f32,
        )
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Spin & Scratch starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, settings)));
        log::info!("Session started with seed: {}", seed);

        if let Some(canvas) = canvas_by_id(&document, "wheel-canvas") {
            let dpr = window.device_pixel_ratio();
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            match init_renderer(canvas, width, height).await {
                Ok(renderer) => app.borrow_mut().renderer = Some(renderer),
                Err(e) => log::error!("Wheel rendering disabled: {}", e),
            }
        } else {
            log::error!("No #wheel-canvas element");
        }

        {
            let a = app.borrow();
            a.rebuild_segments(&document);
            if let Some(input) = input_by_id(&document, "target-input") {
                input.set_value(&a.state.progress().target().to_string());
            }
        }

        setup_controls(&document, app.clone());
        setup_scratch_input(&document, app.clone());

        request_animation_frame(app);

        log::info!("Spin & Scratch running!");
    }

    async fn init_renderer(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<WheelRenderer, String> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|e| format!("create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("request adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        WheelRenderer::new(surface, &adapter, width, height)
            .await
            .map_err(|e| format!("request device: {e}"))
    }

    /// Wire a click handler to a button that sets a `TickInput` flag
    fn on_click(document: &Document, id: &str, app: Rc<RefCell<App>>, f: fn(&mut App)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("No #{} element", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut a = app.borrow_mut();
            a.audio.resume();
            f(&mut *a);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "spin-btn", app.clone(), |a| a.input.spin = true);
        on_click(document, "nudge-btn", app.clone(), |a| a.input.nudge = true);
        on_click(document, "skip-btn", app.clone(), |a| a.input.skip = true);
        on_click(document, "complete-btn", app.clone(), |a| a.input.complete = true);
        on_click(document, "open-gift-btn", app.clone(), |a| a.input.open_gift = true);
        on_click(document, "add-segment-btn", app.clone(), add_segment_from_input);

        // Enter in the text box adds too
        if let Some(input) = document.get_element_by_id("segment-input") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    add_segment_from_input(&mut *app.borrow_mut());
                }
            });
            let _ = input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Unlock target
        if let Some(input) = input_by_id(document, "target-input") {
            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let value = input_clone.value_as_number();
                if !value.is_finite() {
                    return;
                }
                let target = value.round().clamp(0.0, u32::MAX as f64) as u32;
                app.borrow_mut().state.set_target(target);
            });
            let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard: Space / Enter spins when focus is not in a text field
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let typing = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.active_element())
                    .map(|el| el.tag_name().eq_ignore_ascii_case("input"))
                    .unwrap_or(false);
                if typing {
                    return;
                }
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        let mut a = app.borrow_mut();
                        a.audio.resume();
                        a.input.spin = true;
                    }
                    "m" | "M" => {
                        let mut a = app.borrow_mut();
                        let muted = !a.audio.is_muted();
                        a.audio.set_muted(muted);
                        log::info!("Muted: {}", muted);
                    }
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn add_segment_from_input(app: &mut App) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(input) = input_by_id(&document, "segment-input") else {
            return;
        };
        match app.state.add_segment(&input.value()) {
            AddSegment::Added(_) => input.set_value(""),
            AddSegment::Full => log::info!("Wheel is full ({} segments)", MAX_SEGMENTS),
            AddSegment::Blank => {}
        }
    }

    fn setup_scratch_input(document: &Document, app: Rc<RefCell<App>>) {
        let Some(canvas) = canvas_by_id(document, "scratch-canvas") else {
            log::warn!("No #scratch-canvas element");
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse down on the card starts a stroke
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                let (x, y) = canvas_point(&canvas_clone, event.client_x() as f64, event.client_y() as f64);
                app.borrow_mut().state.begin_stroke(InputChannel::Mouse, x, y);
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Moves and releases are tracked on the window so strokes can leave the card
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                if !a.state.scratch().is_stroking(InputChannel::Mouse) {
                    return;
                }
                event.prevent_default();
                let (x, y) = canvas_point(&canvas_clone, event.client_x() as f64, event.client_y() as f64);
                a.state.continue_stroke(InputChannel::Mouse, x, y);
            });
            let _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().state.end_stroke(InputChannel::Mouse);
            });
            let _ = window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let (x, y) = canvas_point(&canvas_clone, touch.client_x() as f64, touch.client_y() as f64);
                    app.borrow_mut().state.begin_stroke(InputChannel::Touch, x, y);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut a = app.borrow_mut();
                if !a.state.scratch().is_stroking(InputChannel::Touch) {
                    return;
                }
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let (x, y) = canvas_point(&canvas_clone, touch.client_x() as f64, touch.client_y() as f64);
                    a.state.continue_stroke(InputChannel::Touch, x, y);
                }
            });
            let _ = window.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().state.end_stroke(InputChannel::Touch);
            });
            let _ = window.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let alert = {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.handle_events(&document, time);
            a.upload_scratch();
            a.render(&document);
            a.update_hud(&document);
            a.pending_alert.take()
        };

        if let Some(message) = alert {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&message);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spin & Scratch (native) starting...");
    log::info!("The UI needs a browser - run with `trunk serve` for the web version");

    println!("\nRunning a scripted session...");
    scripted_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Spin, scratch and complete until the gift unlocks
#[cfg(not(target_arch = "wasm32"))]
fn scripted_session() {
    use spin_scratch::consts::SIM_DT;
    use spin_scratch::game::{GameEvent, GameState, InputChannel, TickInput, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut state = GameState::new(seed);
    state.set_target(3);

    let spin = TickInput {
        spin: true,
        ..Default::default()
    };

    while !state.is_unlocked() {
        tick(&mut state, &spin, SIM_DT);
        while state.is_spinning() {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }

        let label = state.selected_label().unwrap_or_default().to_string();
        let (w, h) = (state.scratch().width() as f32, state.scratch().height() as f32);

        // Zigzag across the card
        state.begin_stroke(InputChannel::Mouse, 0.0, 0.0);
        let mut y = 0.0;
        while y <= h {
            state.continue_stroke(InputChannel::Mouse, w, y);
            state.continue_stroke(InputChannel::Mouse, 0.0, y + 8.0);
            y += 16.0;
        }
        state.end_stroke(InputChannel::Mouse);

        match state.complete_challenge() {
            Ok(stars) => println!("✓ {label} ({stars} star(s))"),
            Err(e) => {
                println!("✗ {label}: {e}");
                state.skip();
            }
        }
    }

    for event in state.drain_events() {
        if event == GameEvent::Unlocked {
            println!("🎁 Gift unlocked!");
        }
    }
}
