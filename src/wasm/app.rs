//! Wires the stopwatch, the visualization and the page together.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window};

use super::audio::{Audio, Cue};
use super::render::Renderer;
use super::ui::{Button, Ui};
use crate::config::SceneConfig;
use crate::schedule::{FrameClock, TaskHandle, TickSource};
use crate::timer::TimerState;
use crate::visual::VisualizationState;

struct App {
    timer: TimerState,
    visual: VisualizationState,
    renderer: Renderer,
    ui: Ui,
    audio: Audio,
    clock: FrameClock,
}

impl App {
    fn frame(&mut self, now_ms: f64) {
        let delta = self.clock.delta(now_ms);
        let report = self.visual.advance(delta, &mut self.timer);
        if report.reset_finalized {
            self.ui.clear_laps();
            self.ui.show_time(&self.timer.display(0));
            self.sync_controls();
            log::info!("stopwatch reset");
        }
        self.renderer.render(&self.visual);
    }

    fn sync_controls(&self) {
        if let Err(err) = self.ui.apply_controls(self.timer.controls()) {
            log::error!("failed to update controls: {:?}", err);
        }
    }
}

fn wall_clock_ms() -> u64 {
    js_sys::Date::now() as u64
}

fn random_rng() -> fastrand::Rng {
    fastrand::Rng::with_seed((js_sys::Math::random() * u64::MAX as f64) as u64)
}

/// Configuration from the canvas `data-config` attribute, defaults otherwise.
pub fn read_config(canvas: &HtmlCanvasElement) -> SceneConfig {
    match canvas.get_attribute("data-config") {
        Some(json) => SceneConfig::from_json(&json).unwrap_or_else(|err| {
            log::warn!("ignoring invalid data-config: {err}");
            SceneConfig::default()
        }),
        None => SceneConfig::default(),
    }
}

fn viewport(window: &Window) -> Result<(f64, f64), JsValue> {
    let w = window
        .inner_width()?
        .as_f64()
        .ok_or("innerWidth is not a number")?;
    let h = window
        .inner_height()?
        .as_f64()
        .ok_or("innerHeight is not a number")?;
    Ok((w, h))
}

pub fn start(window: Window, document: Document, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let config = read_config(&canvas);

    let timer = TimerState::new(config.rewind_duration);
    let visual = VisualizationState::new(&config, random_rng());
    let mut renderer = Renderer::new(canvas, &config, &visual, &mut random_rng())?;
    let (w, h) = viewport(&window)?;
    renderer.resize(w, h, window.device_pixel_ratio())?;

    let ui = Ui::from_document(&document)?;
    ui.show_time(&timer.display(0));
    ui.apply_controls(timer.controls())?;

    let app = Rc::new(RefCell::new(App {
        timer,
        visual,
        renderer,
        ui,
        audio: Audio::load()?,
        clock: FrameClock::new(),
    }));

    let interval = Rc::new(RefCell::new(TickSource::new()));
    let display = {
        let app = app.clone();
        interval.borrow_mut().register(false, move |now| {
            let app = app.borrow();
            if let Some(text) = app.timer.tick(now as u64) {
                app.ui.show_time(&text);
            }
        })
    };

    wire_buttons(&app, &display)?;
    wire_unlock(&document, &app)?;
    wire_resize(&window, &app)?;
    wire_loader(&window, &document);

    let tick = Closure::wrap(Box::new(move || {
        interval.borrow_mut().fire(js_sys::Date::now());
    }) as Box<dyn FnMut()>);
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        config.tick_interval_ms.max(1),
    )?;
    tick.forget();

    let frames = Rc::new(RefCell::new(TickSource::new()));
    frames
        .borrow_mut()
        .register(true, move |now| app.borrow_mut().frame(now));

    log::info!("stopwatch ready");
    animate(window, frames)
}

fn wire_buttons(app: &Rc<RefCell<App>>, display: &TaskHandle) -> Result<(), JsValue> {
    let shared = app.borrow();
    let ui = &shared.ui;

    {
        let app = app.clone();
        let display = display.clone();
        ui.on_click(Button::Start, move || {
            let mut guard = app.borrow_mut();
            let app = &mut *guard;
            if app.timer.start(wall_clock_ms()) {
                app.audio.play(Cue::Resume);
                display.set_active(true);
                app.sync_controls();
            }
        })?;
    }
    {
        let app = app.clone();
        let display = display.clone();
        ui.on_click(Button::Pause, move || {
            let mut guard = app.borrow_mut();
            let app = &mut *guard;
            let now = wall_clock_ms();
            if app.timer.pause(now) {
                app.audio.play(Cue::Pause);
                display.set_active(false);
                app.ui.show_time(&app.timer.display(now));
                app.sync_controls();
            }
        })?;
    }
    {
        let app = app.clone();
        let display = display.clone();
        ui.on_click(Button::Reset, move || {
            let mut guard = app.borrow_mut();
            let app = &mut *guard;
            if app.timer.reset_request() {
                app.audio.play(Cue::Reset);
                display.set_active(false);
                app.ui.show_time(&app.timer.display(wall_clock_ms()));
                app.sync_controls();
            }
        })?;
    }
    {
        let app = app.clone();
        ui.on_click(Button::Lap, move || {
            let mut guard = app.borrow_mut();
            let app = &mut *guard;
            if let Some(lap) = app.timer.lap(wall_clock_ms()) {
                if let Err(err) = app.ui.push_lap(lap) {
                    log::error!("failed to add lap: {:?}", err);
                }
            }
        })?;
    }
    Ok(())
}

fn wire_unlock(document: &Document, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let Some(overlay) = document.get_element_by_id("audio-unlock-overlay") else {
        return Ok(());
    };
    let overlay: HtmlElement = overlay.dyn_into()?;
    let target = overlay.clone();
    let app = app.clone();
    let mut unlocked = false;
    let closure = Closure::wrap(Box::new(move || {
        if unlocked {
            return;
        }
        unlocked = true;
        app.borrow().audio.unlock();
        if let Err(err) = target.style().set_property("display", "none") {
            log::warn!("failed to hide unlock overlay: {:?}", err);
        }
    }) as Box<dyn FnMut()>);
    overlay.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_resize(window: &Window, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let win = window.clone();
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move || {
        let resized = viewport(&win)
            .and_then(|(w, h)| app.borrow_mut().renderer.resize(w, h, win.device_pixel_ratio()));
        if let Err(err) = resized {
            log::warn!("resize failed: {:?}", err);
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn hide_loader(document: &Document) {
    if let Some(loader) = document.get_element_by_id("loader") {
        if let Err(err) = loader.class_list().add_1("loader-hidden") {
            log::warn!("failed to hide loader: {:?}", err);
        }
    }
}

fn wire_loader(window: &Window, document: &Document) {
    // The wasm module may finish loading after the page did.
    if document.ready_state() == "complete" {
        hide_loader(document);
        return;
    }
    let document = document.clone();
    let closure = Closure::wrap(Box::new(move || hide_loader(&document)) as Box<dyn FnMut()>);
    window.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();
}

fn animate(window: Window, frames: Rc<RefCell<TickSource>>) -> Result<(), JsValue> {
    // `f` holds the animation-frame closure so that it can keep calling
    // `request_animation_frame` with itself; the `Option` lets the closure be
    // created before it refers to its own slot.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let win = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        frames.borrow_mut().fire(now);

        // schedule next
        if let Some(next) = f.borrow().as_ref() {
            if let Err(err) = win.request_animation_frame(next.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", err);
            }
        }
    }) as Box<dyn FnMut(f64)>));

    let slot = g.borrow();
    let first = slot.as_ref().ok_or("animation loop not initialised")?;
    window.request_animation_frame(first.as_ref().unchecked_ref())?;
    Ok(())
}
