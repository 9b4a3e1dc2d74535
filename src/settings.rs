//! User preferences persisted next to the history: language, whether to
//! skip the draw animation, and whether sound is on.
//!
//! The engine never interprets the language code; it only stores it for the
//! page. Each setter writes through to the store immediately.

use crate::present::{Confirm, ConfirmPrompt};
use crate::store::HistoryStore;
use log::{info, warn};
use serde::Serialize;
use std::time::Duration;

pub const LANGUAGE_KEY: &str = "currentLanguage";
pub const SKIP_ANIMATION_KEY: &str = "skipAnimation";
pub const SOUND_ENABLED_KEY: &str = "soundEnabled";

pub const DEFAULT_LANGUAGE: &str = "zh";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: String,
    pub skip_animation: bool,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            skip_animation: false,
            sound_enabled: true,
        }
    }
}

fn read_value<S: HistoryStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("could not read setting {key}: {e}");
            None
        }
    }
}

fn read_flag<S: HistoryStore>(store: &S, key: &str, default: bool) -> bool {
    match read_value(store, key).as_deref() {
        Some("true") => true,
        Some("false") => false,
        Some(other) => {
            warn!("ignoring unexpected value {other:?} for {key}");
            default
        }
        None => default,
    }
}

fn write_value<S: HistoryStore>(store: &mut S, key: &str, value: &str, ttl: Duration) {
    if let Err(e) = store.set(key, value, ttl) {
        warn!("could not save setting {key}: {e}");
    }
}

impl Settings {
    /// Read saved settings, falling back to defaults field by field.
    pub fn load<S: HistoryStore>(store: &S) -> Self {
        let defaults = Self::default();
        Self {
            language: read_value(store, LANGUAGE_KEY)
                .filter(|lang| !lang.is_empty())
                .unwrap_or(defaults.language),
            skip_animation: read_flag(store, SKIP_ANIMATION_KEY, defaults.skip_animation),
            sound_enabled: read_flag(store, SOUND_ENABLED_KEY, defaults.sound_enabled),
        }
    }

    pub fn set_language<S: HistoryStore>(&mut self, lang: &str, store: &mut S, ttl: Duration) {
        self.language = lang.to_string();
        write_value(store, LANGUAGE_KEY, lang, ttl);
    }

    pub fn set_skip_animation<S: HistoryStore>(&mut self, skip: bool, store: &mut S, ttl: Duration) {
        self.skip_animation = skip;
        write_value(store, SKIP_ANIMATION_KEY, if skip { "true" } else { "false" }, ttl);
    }

    pub fn set_sound_enabled<S: HistoryStore>(&mut self, on: bool, store: &mut S, ttl: Duration) {
        self.sound_enabled = on;
        write_value(store, SOUND_ENABLED_KEY, if on { "true" } else { "false" }, ttl);
    }

    /// Delete saved settings and go back to defaults, if the user confirms.
    pub fn clear<S, K>(&mut self, confirm: &mut K, store: &mut S) -> bool
    where
        S: HistoryStore,
        K: Confirm + ?Sized,
    {
        if !confirm.confirm(ConfirmPrompt::ClearSettings) {
            return false;
        }
        for key in [LANGUAGE_KEY, SKIP_ANIMATION_KEY, SOUND_ENABLED_KEY] {
            if let Err(e) = store.delete(key) {
                warn!("could not delete setting {key}: {e}");
            }
        }
        *self = Self::default();
        info!("settings reset to defaults");
        true
    }
}
