//! WebAssembly wish draw engine for the roll-call wish page.
//!
//! The page keeps rendering, video and translations; this crate owns the
//! weighted draw, the history ledger and its statistics, and the reveal state
//! machine. On `wasm32` a `WishApp` class is exported through wasm-bindgen.
//! Natively the same engine is used directly through `WishEngine`.

pub mod clock;
pub mod config;
pub mod error;
pub mod history;
pub mod present;
pub mod reveal;
pub mod rng;
pub mod roster;
pub mod sampler;
pub mod schedule;
pub mod settings;
pub mod stats;
pub mod store;
pub mod types;

pub use config::WishConfig;
pub use error::WishError;
pub use reveal::{DrawSession, RevealPhase, WishEngine};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use crate::clock::Clock;
    use crate::config::WishConfig;
    use crate::error::{StoreError, StoreOp};
    use crate::present::{AnimationStart, ConfirmPrompt, Presenter};
    use crate::reveal::WishEngine;
    use crate::store::HistoryStore;
    use crate::types::DrawMode;
    use js_sys::{Date, Function, Object, Reflect};
    use std::fmt::Display;
    use std::time::Duration;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    fn to_js(e: impl Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Cookie jar (or any JS object) exposing `get(key)`,
    /// `set(key, value, days)` and `delete(key)`.
    struct JsStore {
        inner: Object,
    }

    impl JsStore {
        fn method(&self, op: StoreOp, key: &str) -> Result<Function, StoreError> {
            let name = match op {
                StoreOp::Get => "get",
                StoreOp::Set => "set",
                StoreOp::Delete => "delete",
            };
            Reflect::get(&self.inner, &JsValue::from_str(name))
                .and_then(|f| f.dyn_into::<Function>())
                .map_err(|e| StoreError::backend(op, key, format!("no {name}() on store: {e:?}")))
        }
    }

    impl HistoryStore for JsStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let f = self.method(StoreOp::Get, key)?;
            let value = f
                .call1(&self.inner, &JsValue::from_str(key))
                .map_err(|e| StoreError::backend(StoreOp::Get, key, format!("{e:?}")))?;
            Ok(value.as_string())
        }

        fn set(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
            let f = self.method(StoreOp::Set, key)?;
            let days = ttl.as_secs_f64() / 86_400.0;
            f.call3(
                &self.inner,
                &JsValue::from_str(key),
                &JsValue::from_str(value),
                &JsValue::from_f64(days),
            )
            .map(|_| ())
            .map_err(|e| StoreError::backend(StoreOp::Set, key, format!("{e:?}")))
        }

        fn delete(&mut self, key: &str) -> Result<(), StoreError> {
            let f = self.method(StoreOp::Delete, key)?;
            f.call1(&self.inner, &JsValue::from_str(key))
                .map(|_| ())
                .map_err(|e| StoreError::backend(StoreOp::Delete, key, format!("{e:?}")))
        }
    }

    /// Browser clock; timestamps match the page's `zh-CN` locale format.
    struct JsClock;

    impl Clock for JsClock {
        fn now_ms(&self) -> u64 {
            Date::now() as u64
        }

        fn timestamp(&self) -> String {
            let opts = Object::new();
            for (k, v) in [
                ("year", "numeric"),
                ("month", "2-digit"),
                ("day", "2-digit"),
                ("hour", "2-digit"),
                ("minute", "2-digit"),
                ("second", "2-digit"),
            ] {
                let _ = Reflect::set(&opts, &k.into(), &v.into());
            }
            Date::new_0().to_locale_string("zh-CN", &opts).into()
        }
    }

    /// Wraps the page's `playAnimation(mode)` callback. It may return a
    /// boolean or one of `"started"`, `"failed"`, `"none"`. A promise
    /// rejection that happens later is reported through `videoFailed()`.
    struct JsPresenter {
        play: Function,
    }

    impl Presenter for JsPresenter {
        fn request_animation(&mut self, mode: DrawMode) -> AnimationStart {
            let mode = match mode {
                DrawMode::Batch => "batch",
                DrawMode::Single | DrawMode::Idle => "single",
            };
            match self.play.call1(&JsValue::NULL, &JsValue::from_str(mode)) {
                Ok(v) if v.is_undefined() || v.is_null() => AnimationStart::NoMediaAvailable,
                Ok(v) => match (v.as_bool(), v.as_string().as_deref()) {
                    (Some(true), _) | (_, Some("started")) => AnimationStart::Started,
                    (_, Some("none")) => AnimationStart::NoMediaAvailable,
                    _ => AnimationStart::FailedToStart,
                },
                Err(_) => AnimationStart::FailedToStart,
            }
        }
    }

    fn js_confirm(confirm: &Function) -> impl FnMut(ConfirmPrompt) -> bool + '_ {
        move |prompt| {
            let what = match prompt {
                ConfirmPrompt::ClearHistory => "clearHistory",
                ConfirmPrompt::ClearSettings => "clearSettings",
            };
            confirm
                .call1(&JsValue::NULL, &JsValue::from_str(what))
                .map(|v| v.is_truthy())
                .unwrap_or(false)
        }
    }

    #[wasm_bindgen]
    pub struct WishApp {
        engine: WishEngine<JsStore, JsClock, JsPresenter>,
    }

    #[wasm_bindgen]
    impl WishApp {
        /// `config_json` is a `WishConfig`; every field is optional.
        #[wasm_bindgen(constructor)]
        pub fn new(config_json: &str, store: Object, play_animation: Function) -> Result<WishApp, JsValue> {
            let config = WishConfig::from_json(config_json).map_err(to_js)?;
            let engine = WishEngine::new(
                config,
                JsStore { inner: store },
                JsClock,
                JsPresenter { play: play_animation },
            );
            Ok(WishApp { engine })
        }

        /// Single draw. Without an argument the saved preference decides.
        #[wasm_bindgen(js_name = "handleDraw")]
        pub fn handle_draw(&mut self, skip_animation: Option<bool>) -> Result<(), JsValue> {
            let skip = skip_animation.unwrap_or(self.engine.settings().skip_animation);
            self.engine.handle_draw(skip).map_err(to_js)
        }

        #[wasm_bindgen(js_name = "handleTenDraw")]
        pub fn handle_ten_draw(&mut self, skip_animation: Option<bool>) -> Result<(), JsValue> {
            let skip = skip_animation.unwrap_or(self.engine.settings().skip_animation);
            self.engine.handle_batch_draw(skip).map_err(to_js)
        }

        #[wasm_bindgen(js_name = "videoEnd")]
        pub fn video_end(&mut self) -> Result<(), JsValue> {
            self.engine.on_animation_end().map_err(to_js)
        }

        #[wasm_bindgen(js_name = "videoFailed")]
        pub fn video_failed(&mut self) -> Result<(), JsValue> {
            log::info!("video playback failed, revealing immediately");
            self.engine.on_animation_end().map_err(to_js)
        }

        #[wasm_bindgen(js_name = "showNext")]
        pub fn show_next(&mut self) {
            self.engine.show_next();
        }

        pub fn reset(&mut self) {
            self.engine.reset();
        }

        #[wasm_bindgen(js_name = "drawAgain")]
        pub fn draw_again(&mut self) -> Result<(), JsValue> {
            self.engine.draw_again().map_err(to_js)
        }

        pub fn tick(&mut self) {
            self.engine.tick();
        }

        /// Milliseconds timestamp of the next timer, or `undefined`.
        #[wasm_bindgen(js_name = "nextDeadline")]
        pub fn next_deadline(&self) -> Option<f64> {
            self.engine.next_deadline().map(|t| t as f64)
        }

        pub fn flush(&mut self) {
            self.engine.flush();
        }

        pub fn state(&self) -> Result<JsValue, JsValue> {
            serde_wasm_bindgen::to_value(self.engine.session()).map_err(JsValue::from)
        }

        pub fn history(&self) -> Result<JsValue, JsValue> {
            serde_wasm_bindgen::to_value(self.engine.history()).map_err(JsValue::from)
        }

        pub fn stats(&self) -> Result<JsValue, JsValue> {
            serde_wasm_bindgen::to_value(&self.engine.stats()).map_err(JsValue::from)
        }

        #[wasm_bindgen(js_name = "topEntry")]
        pub fn top_entry(&self) -> Result<JsValue, JsValue> {
            serde_wasm_bindgen::to_value(&self.engine.top_entry()).map_err(JsValue::from)
        }

        pub fn settings(&self) -> Result<JsValue, JsValue> {
            serde_wasm_bindgen::to_value(self.engine.settings()).map_err(JsValue::from)
        }

        /// `confirm(prompt)` is asked first; returns whether history was cleared.
        #[wasm_bindgen(js_name = "clearHistory")]
        pub fn clear_history(&mut self, confirm: &Function) -> bool {
            self.engine.clear_history(&mut js_confirm(confirm))
        }

        #[wasm_bindgen(js_name = "clearSettings")]
        pub fn clear_settings(&mut self, confirm: &Function) -> bool {
            self.engine.clear_settings(&mut js_confirm(confirm))
        }

        #[wasm_bindgen(js_name = "setLanguage")]
        pub fn set_language(&mut self, lang: &str) {
            self.engine.set_language(lang);
        }

        #[wasm_bindgen(js_name = "setSkipAnimation")]
        pub fn set_skip_animation(&mut self, skip: bool) {
            self.engine.set_skip_animation(skip);
        }

        #[wasm_bindgen(js_name = "setSoundEnabled")]
        pub fn set_sound_enabled(&mut self, on: bool) {
            self.engine.set_sound_enabled(on);
        }
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM wish engine ready".to_string()
    }
}
