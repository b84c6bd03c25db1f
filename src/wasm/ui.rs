//! DOM side of the stopwatch: readout, buttons and lap list.

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

use crate::timer::{Controls, LapRecord};

pub const TIME_STOPPED_CLASS: &str = "time-stopped";
const HIDDEN_CLASS: &str = "hidden";

#[derive(Clone, Copy, Debug)]
pub enum Button {
    Start,
    Pause,
    Reset,
    Lap,
}

pub struct Ui {
    document: Document,
    body: HtmlElement,
    time_display: Element,
    start: HtmlButtonElement,
    pause: HtmlButtonElement,
    reset: HtmlButtonElement,
    lap: HtmlButtonElement,
    laps: Element,
}

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} not found")))
}

fn button(document: &Document, id: &str) -> Result<HtmlButtonElement, JsValue> {
    Ok(by_id(document, id)?.dyn_into::<HtmlButtonElement>()?)
}

fn set_class(el: &Element, class: &str, on: bool) -> Result<(), JsValue> {
    el.class_list().toggle_with_force(class, on)?;
    Ok(())
}

/// Readout markup; centiseconds get their own span for styling.
pub fn readout_html(text: &str) -> String {
    match text.split_once('.') {
        Some((clock, centis)) => format!("{clock}<span class=\"milliseconds\">.{centis}</span>"),
        None => text.to_string(),
    }
}

/// `div.lap-item` holding the lap label and its captured time.
pub fn lap_element(document: &Document, lap: &LapRecord) -> Result<Element, JsValue> {
    let item = document.create_element("div")?;
    item.set_class_name("lap-item");

    let number = document.create_element("span")?;
    number.set_class_name("lap-number");
    number.set_text_content(Some(&lap.label()));

    let time = document.create_element("span")?;
    time.set_class_name("lap-time-value");
    time.set_text_content(Some(&lap.display_time));

    item.append_child(&number)?;
    item.append_child(&time)?;
    Ok(item)
}

impl Ui {
    pub fn from_document(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            document: document.clone(),
            body: document.body().ok_or("no body")?,
            time_display: by_id(document, "time-display")?,
            start: button(document, "start-btn")?,
            pause: button(document, "pause-btn")?,
            reset: button(document, "reset-btn")?,
            lap: button(document, "lap-btn")?,
            laps: by_id(document, "laps-container")?,
        })
    }

    pub fn show_time(&self, text: &str) {
        self.time_display.set_inner_html(&readout_html(text));
    }

    pub fn apply_controls(&self, controls: Controls) -> Result<(), JsValue> {
        set_class(&self.start, HIDDEN_CLASS, !controls.start_visible)?;
        set_class(&self.pause, HIDDEN_CLASS, !controls.pause_visible)?;
        self.start.set_disabled(!controls.start_enabled);
        self.pause.set_disabled(!controls.pause_enabled);
        self.lap.set_disabled(!controls.lap_enabled);
        self.reset.set_disabled(!controls.reset_enabled);
        set_class(&self.body, TIME_STOPPED_CLASS, controls.time_stopped)
    }

    /// Newest lap goes on top.
    pub fn push_lap(&self, lap: &LapRecord) -> Result<(), JsValue> {
        let item = lap_element(&self.document, lap)?;
        self.laps.prepend_with_node_1(&item)
    }

    pub fn clear_laps(&self) {
        self.laps.set_inner_html("");
    }

    pub fn on_click(&self, which: Button, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
        let target = match which {
            Button::Start => &self.start,
            Button::Pause => &self.pause,
            Button::Reset => &self.reset,
            Button::Lap => &self.lap,
        };
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}
