//! Reveal state machine and the engine that owns a draw session.
//!
//! `WishEngine` is the single owner of all mutable state: the weighted
//! roster, RNG, history ledger, settings and the `DrawSession` value that the
//! page renders. Every transition is a method call driven by one external
//! event (a button press, an animation ending, a `tick`).
//!
//! Phases:
//! - `Idle`: nothing drawn.
//! - `AwaitingAnimation`: the presenter is playing the wish animation; the
//!   result has not been computed yet.
//! - `SingleRevealed`: one name is shown.
//! - `BatchRevealing`: ten names drawn, being stepped through one by one.
//! - `BatchComplete`: every name of the batch has been shown.
//!
//! Two things happen "later": the ledger's debounced write and the short
//! re-show delay between batch steps. Both are `ScheduledTask`s fired from
//! `tick`. The re-show also carries the session epoch it was scheduled in, so
//! one that outlives a `reset` is dropped.

use crate::clock::Clock;
use crate::config::WishConfig;
use crate::error::WishError;
use crate::history::HistoryLedger;
use crate::present::{Confirm, Presenter};
use crate::rng::DrawRng;
use crate::roster::WeightedRoster;
use crate::sampler::{draw_one, draw_ten};
use crate::schedule::ScheduledTask;
use crate::settings::Settings;
use crate::stats::{compute_stats, top_entry};
use crate::store::HistoryStore;
use crate::types::{Candidate, DrawMode, DrawRecord, StatsEntry};
use log::{debug, info};
use serde::Serialize;

// ─── Session state ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RevealPhase {
    #[default]
    Idle,
    AwaitingAnimation,
    SingleRevealed,
    BatchRevealing,
    BatchComplete,
}

/// What the page needs to render the current draw.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawSession {
    pub mode: DrawMode,
    pub phase: RevealPhase,
    /// Name currently on screen.
    pub current_name: Option<Candidate>,
    /// The ten names of a batch draw in reveal order, empty otherwise.
    pub batch_results: Vec<Candidate>,
    /// Index of the next batch result to reveal.
    pub batch_cursor: usize,
    pub all_revealed: bool,
    /// Cleared while a batch step waits to re-show the name.
    pub name_shown: bool,
    /// Bumped on every reveal step so the page can retrigger its flash effect.
    pub flash_key: u64,
    #[serde(skip)]
    epoch: u64,
}

impl DrawSession {
    pub fn is_idle(&self) -> bool {
        self.phase == RevealPhase::Idle
    }
}

// ─── Engine ─────────────────────────────────────────────────────────────────

pub struct WishEngine<S, C, P> {
    config: WishConfig,
    roster: WeightedRoster,
    rng: DrawRng,
    ledger: HistoryLedger,
    settings: Settings,
    session: DrawSession,
    reshow: ScheduledTask<u64>,
    store: S,
    clock: C,
    presenter: P,
}

impl<S, C, P> WishEngine<S, C, P>
where
    S: HistoryStore,
    C: Clock,
    P: Presenter,
{
    /// Start a session with an entropy-seeded RNG.
    pub fn new(config: WishConfig, store: S, clock: C, presenter: P) -> Self {
        Self::with_rng(config, store, clock, presenter, DrawRng::new())
    }

    /// Start a session with a caller-supplied RNG (seeded replays, tests).
    ///
    /// Loads history and settings from `store` once, here.
    pub fn with_rng(config: WishConfig, store: S, clock: C, presenter: P, rng: DrawRng) -> Self {
        let roster = WeightedRoster::build(&config.roster, config.boosted_candidate.as_deref());
        let ledger = HistoryLedger::load(&store, &config);
        let settings = Settings::load(&store);
        debug!(
            "wish session started: {} candidates ({} weighted slots), {} history records",
            config.roster.len(),
            roster.len(),
            ledger.len()
        );
        Self {
            config,
            roster,
            rng,
            ledger,
            settings,
            session: DrawSession::default(),
            reshow: ScheduledTask::new(),
            store,
            clock,
            presenter,
        }
    }

    pub fn session(&self) -> &DrawSession {
        &self.session
    }

    pub fn history(&self) -> &[DrawRecord] {
        self.ledger.records()
    }

    pub fn stats(&self) -> Vec<StatsEntry> {
        compute_stats(self.ledger.records())
    }

    pub fn top_entry(&self) -> StatsEntry {
        top_entry(&self.stats())
    }

    pub fn roster(&self) -> &WeightedRoster {
        &self.roster
    }

    pub fn config(&self) -> &WishConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ─── Draw transitions ───────────────────────────────────────────────────

    /// Single draw. With `skip_animation` the name is revealed at once,
    /// otherwise the presenter is asked to play the animation first.
    pub fn handle_draw(&mut self, skip_animation: bool) -> Result<(), WishError> {
        self.begin(DrawMode::Single, skip_animation)
    }

    /// Ten-name draw, revealed one step at a time.
    pub fn handle_batch_draw(&mut self, skip_animation: bool) -> Result<(), WishError> {
        self.begin(DrawMode::Batch, skip_animation)
    }

    /// Single draw honouring the saved skip-animation preference.
    pub fn draw(&mut self) -> Result<(), WishError> {
        self.handle_draw(self.settings.skip_animation)
    }

    /// Batch draw honouring the saved skip-animation preference.
    pub fn batch_draw(&mut self) -> Result<(), WishError> {
        self.handle_batch_draw(self.settings.skip_animation)
    }

    fn begin(&mut self, mode: DrawMode, skip_animation: bool) -> Result<(), WishError> {
        if self.session.phase == RevealPhase::AwaitingAnimation {
            debug!("draw ignored, an animation is already playing");
            return Ok(());
        }
        if self.roster.is_empty() {
            return Err(WishError::InvalidRoster);
        }

        self.discard_reveal();
        // Set before anything else so a failed animation still resolves as
        // this mode.
        self.session.mode = mode;

        if skip_animation {
            return self.reveal();
        }

        self.session.phase = RevealPhase::AwaitingAnimation;
        let outcome = self.presenter.request_animation(mode);
        if outcome.started() {
            debug!("{mode:?} draw waiting for animation");
            return Ok(());
        }
        info!("animation did not start ({outcome:?}), revealing immediately");
        self.reveal()
    }

    /// The presenter finished (or gave up on) the animation.
    pub fn on_animation_end(&mut self) -> Result<(), WishError> {
        if self.session.phase != RevealPhase::AwaitingAnimation {
            debug!("animation end ignored in {:?}", self.session.phase);
            return Ok(());
        }
        self.reveal()
    }

    /// Draw again in the last active mode, skipping both `Idle` and the
    /// animation.
    pub fn draw_again(&mut self) -> Result<(), WishError> {
        if self.session.phase == RevealPhase::AwaitingAnimation {
            debug!("draw again ignored, an animation is already playing");
            return Ok(());
        }
        if self.roster.is_empty() {
            return Err(WishError::InvalidRoster);
        }
        let mode = match self.session.mode {
            DrawMode::Batch => DrawMode::Batch,
            DrawMode::Single | DrawMode::Idle => DrawMode::Single,
        };
        self.discard_reveal();
        self.session.mode = mode;
        self.reveal()?;
        self.session.flash_key += 1;
        Ok(())
    }

    fn reveal(&mut self) -> Result<(), WishError> {
        match self.session.mode {
            DrawMode::Batch => self.reveal_batch(),
            DrawMode::Single | DrawMode::Idle => self.reveal_single(),
        }
    }

    fn reveal_single(&mut self) -> Result<(), WishError> {
        let name = draw_one(&self.roster, &mut self.rng)?;
        let record = DrawRecord::new(name.clone(), self.clock.timestamp());

        self.session.mode = DrawMode::Single;
        self.session.current_name = Some(name);
        self.session.name_shown = true;
        self.session.phase = RevealPhase::SingleRevealed;
        debug!("single draw revealed {:?}", self.session.current_name);

        self.record(vec![record]);
        Ok(())
    }

    fn reveal_batch(&mut self) -> Result<(), WishError> {
        let results = draw_ten(&self.roster, &mut self.rng)?;
        // A batch is instantaneous: one timestamp for all ten records.
        let time = self.clock.timestamp();
        let records: Vec<DrawRecord> = results
            .iter()
            .map(|name| DrawRecord::new(name.clone(), time.clone()))
            .collect();

        self.session.current_name = results.first().cloned();
        self.session.batch_results = results;
        self.session.batch_cursor = 1;
        self.session.all_revealed = false;
        self.session.name_shown = true;
        self.session.phase = RevealPhase::BatchRevealing;
        debug!("batch draw revealed {:?}", self.session.batch_results);

        self.record(records);
        Ok(())
    }

    fn record(&mut self, records: Vec<DrawRecord>) {
        self.ledger.append(records);
        self.ledger.request_persist(self.clock.now_ms());
    }

    // ─── Stepping and reset ─────────────────────────────────────────────────

    /// Reveal the next name of a batch. No-op outside `BatchRevealing`.
    pub fn show_next(&mut self) {
        if self.session.phase != RevealPhase::BatchRevealing {
            return;
        }
        let cursor = self.session.batch_cursor;
        if let Some(name) = self.session.batch_results.get(cursor).cloned() {
            self.session.current_name = Some(name);
            self.session.batch_cursor = cursor + 1;
            self.session.name_shown = false;
            let due = self
                .clock
                .now_ms()
                .saturating_add(self.config.reveal_step_delay_ms);
            self.reshow.schedule(due, self.session.epoch);
        }
        if self.session.batch_cursor >= self.session.batch_results.len() {
            self.session.all_revealed = true;
            self.session.phase = RevealPhase::BatchComplete;
            debug!("batch fully revealed");
        }
    }

    /// Back to `Idle`. Calling it while already idle changes nothing.
    pub fn reset(&mut self) {
        if self.session.is_idle() {
            return;
        }
        self.discard_reveal();
        self.session.mode = DrawMode::Idle;
        self.session.phase = RevealPhase::Idle;
        debug!("session reset");
    }

    /// Forget the displayed result and invalidate any pending re-show.
    fn discard_reveal(&mut self) {
        self.reshow.cancel();
        self.session.epoch += 1;
        self.session.current_name = None;
        self.session.batch_results.clear();
        self.session.batch_cursor = 0;
        self.session.all_revealed = false;
        self.session.name_shown = false;
    }

    // ─── Timers ─────────────────────────────────────────────────────────────

    /// Fire whatever is due: the batch re-show and the history write.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        if let Some(epoch) = self.reshow.take_due(now) {
            if epoch == self.session.epoch {
                self.session.name_shown = true;
                self.session.flash_key += 1;
            } else {
                debug!("dropping re-show from a reset session");
            }
        }
        self.ledger.flush_due(now, &mut self.store);
    }

    /// Earliest pending timer deadline, so the host knows when to `tick`.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.reshow.due_at(), self.ledger.pending_write_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Write pending history now (page unload).
    pub fn flush(&mut self) {
        self.ledger.flush(&mut self.store);
    }

    // ─── History and settings ───────────────────────────────────────────────

    pub fn clear_history<K: Confirm + ?Sized>(&mut self, confirm: &mut K) -> bool {
        self.ledger.clear(confirm, &mut self.store)
    }

    pub fn clear_settings<K: Confirm + ?Sized>(&mut self, confirm: &mut K) -> bool {
        self.settings.clear(confirm, &mut self.store)
    }

    pub fn set_language(&mut self, lang: &str) {
        let ttl = self.config.history_ttl();
        self.settings.set_language(lang, &mut self.store, ttl);
    }

    pub fn set_skip_animation(&mut self, skip: bool) {
        let ttl = self.config.history_ttl();
        self.settings.set_skip_animation(skip, &mut self.store, ttl);
    }

    pub fn set_sound_enabled(&mut self, on: bool) {
        let ttl = self.config.history_ttl();
        self.settings.set_sound_enabled(on, &mut self.store, ttl);
    }
}
