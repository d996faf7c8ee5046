//! Dice Tray entry point
//!
//! Handles platform-specific initialization and runs the widget loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_widget {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlButtonElement, HtmlCanvasElement, MouseEvent};

    use dice_tray::renderer::{RenderState, shapes};
    use dice_tray::scene::{Aggregation, DiceScene, DieInstruction, FaceCount, RollPhase, SceneEvent};
    use dice_tray::settings::Settings;

    /// Widget instance holding all state
    struct Widget {
        scene: DiceScene,
        render_state: Option<RenderState>,
        settings: Settings,
        last_time: f64,
    }

    impl Widget {
        fn new(seed: u64, settings: Settings) -> Self {
            let mut scene = DiceScene::new(seed);
            scene.set_style(settings.effective_style());
            Self {
                scene,
                render_state: None,
                settings,
                last_time: 0.0,
            }
        }

        /// Trigger a roll. With reduced motion on, the spin is skipped and
        /// results land immediately.
        fn roll(&mut self) {
            if !self.scene.roll() {
                log::info!("Nothing to roll");
                return;
            }
            if self.settings.reduced_motion {
                for event in self.scene.settle_now() {
                    log::debug!("Settled without animation: {:?}", event);
                }
            }
        }

        /// Render the current frame
        fn draw(&mut self, instructions: &[DieInstruction]) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = shapes::frame(instructions);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
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
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            // Per-kind counters next to the die buttons
            for faces in FaceCount::ALL {
                if let Some(el) = document.get_element_by_id(&format!("count-{}", faces.sides())) {
                    el.set_text_content(Some(&self.scene.tray().count(faces).to_string()));
                }
            }

            // The roll button only works when a roll could start
            if let Some(el) = document.get_element_by_id("roll-button") {
                if let Ok(button) = el.dyn_into::<HtmlButtonElement>() {
                    let blocked =
                        self.scene.is_rolling() || self.scene.tray().live_count() == 0;
                    button.set_disabled(blocked);
                }
            }

            if let Some(el) = document.get_element_by_id("roll-total") {
                el.set_text_content(Some(&self.total_readout()));
            }
        }

        /// Text for the total readout, empty until results are showing
        fn total_readout(&self) -> String {
            if !self.settings.show_labels || self.scene.phase() != RollPhase::Settled {
                return String::new();
            }
            let Some(outcome) = self.scene.outcome() else {
                return String::new();
            };
            if outcome.results.len() == 1 {
                return outcome.total.to_string();
            }
            let parts: Vec<String> = outcome.results.iter().map(|r| r.to_string()).collect();
            match outcome.aggregation {
                Aggregation::Sum => format!("{} = {}", parts.join(" + "), outcome.total),
                Aggregation::KeepHighest => {
                    format!("max({}) = {}", parts.join(", "), outcome.total)
                }
                Aggregation::KeepLowest => {
                    format!("min({}) = {}", parts.join(", "), outcome.total)
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Dice Tray starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("dice-canvas")
            .ok_or_else(|| JsValue::from_str("no #dice-canvas element"))?
            .dyn_into()
            .map_err(|_| JsValue::from_str("#dice-canvas is not a canvas"))?;

        // Back the canvas with physical pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let widget = Rc::new(RefCell::new(Widget::new(seed, settings)));
        widget
            .borrow_mut()
            .scene
            .set_container_size(Vec2::new(client_w as f32, client_h as f32));

        log::info!("Widget initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = RenderState::new(surface, &adapter, width, height).await;
        render_state.set_layout_size(client_w as f32, client_h as f32);
        widget.borrow_mut().render_state = Some(render_state);

        setup_dice_buttons(&document, widget.clone());
        setup_roll_controls(&document, widget.clone());
        setup_resize_observer(&canvas, widget.clone());
        setup_visibility_settle(widget.clone());

        // Start widget loop
        request_animation_frame(widget);

        log::info!("Dice Tray running!");
        Ok(())
    }

    /// Wire up every `.die-button`: left click adds a die of its kind,
    /// right click removes the most recently added one.
    fn setup_dice_buttons(document: &web_sys::Document, widget: Rc<RefCell<Widget>>) {
        let buttons = match document.query_selector_all(".die-button") {
            Ok(list) => list,
            Err(_) => return,
        };

        for i in 0..buttons.length() {
            let Some(node) = buttons.get(i) else { continue };
            let Ok(button) = node.dyn_into::<web_sys::Element>() else {
                continue;
            };
            let faces = button
                .get_attribute("data-sides")
                .and_then(|s| s.parse::<u32>().ok())
                .and_then(FaceCount::from_sides);
            let Some(faces) = faces else {
                log::warn!("Die button without a usable data-sides attribute, skipping");
                continue;
            };

            {
                let widget = widget.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut w = widget.borrow_mut();
                    // The tray is frozen while dice are in the air
                    if w.scene.is_rolling() {
                        return;
                    }
                    w.scene.add_die(faces);
                });
                let _ = button
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            {
                let widget = widget.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                    event.prevent_default();
                    let mut w = widget.borrow_mut();
                    if w.scene.is_rolling() {
                        return;
                    }
                    w.scene.remove_die(faces);
                });
                let _ = button.add_event_listener_with_callback(
                    "contextmenu",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }
    }

    fn setup_roll_controls(document: &web_sys::Document, widget: Rc<RefCell<Widget>>) {
        // Roll button
        if let Some(button) = document.get_element_by_id("roll-button") {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                widget.borrow_mut().roll();
            });
            let _ =
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No #roll-button in the page");
        }

        // Keyboard shortcuts
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut w = widget.borrow_mut();
            match event.key().as_str() {
                " " | "Enter" => w.roll(),
                "s" | "S" => {
                    w.settings.style = w.settings.style.toggled();
                    let style = w.settings.effective_style();
                    w.scene.set_style(style);
                    w.settings.save();
                    log::info!("Dice style: {}", w.settings.style.as_str());
                }
                "l" | "L" => {
                    w.settings.show_labels = !w.settings.show_labels;
                    w.settings.save();
                    log::info!("Result labels: {}", w.settings.show_labels);
                }
                "m" | "M" => {
                    w.settings.reduced_motion = !w.settings.reduced_motion;
                    let style = w.settings.effective_style();
                    w.scene.set_style(style);
                    w.settings.save();
                    log::info!("Reduced motion: {}", w.settings.reduced_motion);
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Track the canvas CSS size. The scene reflows dice to the new grid and
    /// the surface is resized to the matching physical pixels.
    fn setup_resize_observer(canvas: &HtmlCanvasElement, widget: Rc<RefCell<Widget>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            let Ok(entry) = entries.get(0).dyn_into::<web_sys::ResizeObserverEntry>() else {
                return;
            };
            let rect = entry.content_rect();
            let css_w = rect.width();
            let css_h = rect.height();

            let dpr = web_sys::window()
                .map(|win| win.device_pixel_ratio())
                .unwrap_or(1.0);
            let px_w = (css_w * dpr) as u32;
            let px_h = (css_h * dpr) as u32;
            canvas_clone.set_width(px_w);
            canvas_clone.set_height(px_h);

            let mut w = widget.borrow_mut();
            w.scene
                .set_container_size(Vec2::new(css_w as f32, css_h as f32));
            if let Some(ref mut render_state) = w.render_state {
                render_state.resize(px_w, px_h);
                render_state.set_layout_size(css_w as f32, css_h as f32);
            }
        });

        match web_sys::ResizeObserver::new(closure.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(canvas);
                closure.forget();
            }
            Err(e) => log::warn!("ResizeObserver unavailable: {:?}", e),
        }
    }

    /// Background tabs stop getting animation frames, so an in-flight roll
    /// is settled the moment the page hides. The finish lands exactly once.
    fn setup_visibility_settle(widget: Rc<RefCell<Widget>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut w = widget.borrow_mut();
                if w.scene.is_rolling() {
                    for event in w.scene.settle_now() {
                        log::info!("Settled on tab hide: {:?}", event);
                    }
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(widget: Rc<RefCell<Widget>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            widget_loop(widget, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn widget_loop(widget: Rc<RefCell<Widget>>, time: f64) {
        {
            let mut w = widget.borrow_mut();

            // First frame has no previous timestamp to diff against
            let dt_ms = if w.last_time > 0.0 {
                (time - w.last_time) as f32
            } else {
                0.0
            };
            w.last_time = time;

            let events = w.scene.update(dt_ms);
            for event in &events {
                match event {
                    SceneEvent::RollFinished => {
                        if let Some(outcome) = w.scene.outcome() {
                            log::info!(
                                "Roll finished: {:?} totals {}",
                                outcome.results,
                                outcome.total
                            );
                        }
                    }
                    SceneEvent::DieRemoved(id) => log::debug!("Die {} left the tray", id),
                }
            }

            let instructions = w.scene.render();
            w.draw(&instructions);
            w.update_hud();
        }

        request_animation_frame(widget);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_widget::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dice Tray (native) starting...");
    log::info!("The widget targets the browser - run with `trunk serve` for the web version");

    // Exercise the scene end to end without a GPU
    println!("\nRunning headless roll demo...");
    headless_roll_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_roll_demo() {
    use dice_tray::consts::{DIE_BASE_SIZE, ROLL_TOTAL_MS};
    use dice_tray::scene::{DiceScene, FaceCount, RollPhase, SceneEvent};
    use glam::Vec2;

    let mut scene = DiceScene::new(0xD1CE);
    scene.set_container_size(Vec2::new(DIE_BASE_SIZE * 16.0, DIE_BASE_SIZE * 12.0));
    scene.add_die(FaceCount::D6);
    scene.add_die(FaceCount::D6);
    scene.add_die(FaceCount::D20);
    scene.update(0.0);

    assert!(scene.roll(), "Roll should start with dice on the tray");

    // Step at 60 Hz until the roll settles
    let dt_ms = 1000.0 / 60.0;
    let mut frames = 0u32;
    while scene.phase() != RollPhase::Settled {
        let events = scene.update(dt_ms);
        frames += 1;
        if events.contains(&SceneEvent::RollFinished) {
            break;
        }
        assert!(frames < 1000, "Roll never settled");
    }

    let outcome = scene.outcome().expect("Roll should produce an outcome");
    assert!(frames as f32 * dt_ms >= ROLL_TOTAL_MS);
    println!(
        "✓ Rolled 2d6 + 1d20 over {} frames: {:?} = {}",
        frames, outcome.results, outcome.total
    );
}
