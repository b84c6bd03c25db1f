use wasm_bindgen::{closure::Closure, JsValue};
use web_sys::HtmlAudioElement;

#[derive(Clone, Copy, Debug)]
pub enum Cue {
    Pause,
    Resume,
    Reset,
}

/// Button sound effects. Playback is fire-and-forget: autoplay rejections
/// are logged and otherwise ignored.
pub struct Audio {
    pause: HtmlAudioElement,
    resume: HtmlAudioElement,
    reset: HtmlAudioElement,
    on_rejected: Closure<dyn FnMut(JsValue)>,
    on_ignored: Closure<dyn FnMut(JsValue)>,
}

fn load(src: &str) -> Result<HtmlAudioElement, JsValue> {
    let el = HtmlAudioElement::new_with_src(src)?;
    el.set_preload("auto");
    Ok(el)
}

impl Audio {
    pub fn load() -> Result<Self, JsValue> {
        Ok(Self {
            pause: load("stop.mp3")?,
            resume: load("resume.mp3")?,
            reset: load("Reset.mp3")?,
            on_rejected: Closure::wrap(Box::new(|err: JsValue| {
                log::warn!("audio playback failed: {:?}", err);
            }) as Box<dyn FnMut(JsValue)>),
            on_ignored: Closure::wrap(Box::new(|_: JsValue| {}) as Box<dyn FnMut(JsValue)>),
        })
    }

    fn element(&self, cue: Cue) -> &HtmlAudioElement {
        match cue {
            Cue::Pause => &self.pause,
            Cue::Resume => &self.resume,
            Cue::Reset => &self.reset,
        }
    }

    pub fn play(&self, cue: Cue) {
        let el = self.element(cue);
        el.set_current_time(0.0);
        match el.play() {
            Ok(promise) => {
                let _ = promise.catch(&self.on_rejected);
            }
            Err(err) => log::warn!("audio playback failed: {:?}", err),
        }
    }

    /// Plays and immediately pauses every cue inside a user gesture so the
    /// browser lets later, gesture-less playback through.
    pub fn unlock(&self) {
        for cue in [Cue::Pause, Cue::Resume, Cue::Reset] {
            let el = self.element(cue);
            if let Ok(promise) = el.play() {
                let _ = promise.catch(&self.on_ignored);
            }
            let _ = el.pause();
        }
        log::debug!("audio unlocked");
    }
}
