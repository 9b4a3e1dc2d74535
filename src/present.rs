//! Presentation-side collaborators: animation playback and confirmation
//! prompts. The engine calls these; it never renders anything itself.

use crate::types::DrawMode;

/// Outcome of asking the presenter to play the draw animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationStart {
    /// Playback began; the engine waits for `on_animation_end`.
    Started,
    /// Playback was refused (e.g. autoplay blocked).
    FailedToStart,
    /// There is no media element to play.
    NoMediaAvailable,
}

impl AnimationStart {
    pub fn started(self) -> bool {
        self == AnimationStart::Started
    }
}

pub trait Presenter {
    fn request_animation(&mut self, mode: DrawMode) -> AnimationStart;
}

impl<F> Presenter for F
where
    F: FnMut(DrawMode) -> AnimationStart,
{
    fn request_animation(&mut self, mode: DrawMode) -> AnimationStart {
        self(mode)
    }
}

/// A presenter with nothing to play. Every draw reveals immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMedia;

impl Presenter for NoMedia {
    fn request_animation(&mut self, _mode: DrawMode) -> AnimationStart {
        AnimationStart::NoMediaAvailable
    }
}

/// What the user is being asked to confirm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmPrompt {
    ClearHistory,
    ClearSettings,
}

pub trait Confirm {
    fn confirm(&mut self, prompt: ConfirmPrompt) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(ConfirmPrompt) -> bool,
{
    fn confirm(&mut self, prompt: ConfirmPrompt) -> bool {
        self(prompt)
    }
}
