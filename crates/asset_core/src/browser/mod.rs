//! Browser store
//!
//! Owns the single [`ViewState`] and everything that feeds it:
//!
//! ```text
//! presentation ──dispatch──► urgent lane ─────┐
//!                                              ├─► reduce ─► ViewState ─► model slot
//! scheduler ─► compression job ─► background ──┘
//! ```
//!
//! `flush` always empties the urgent lane before running a background item,
//! so selection and filter edits are never held up behind a job commit or a
//! model load.

mod model_slot;

pub use model_slot::ModelView;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use model_slot::ModelSlot;

use crate::assets::{Asset, CatalogError, CatalogLoader, ModelLoader, QualityLevel};
use crate::config::BrowserConfig;
use crate::jobs::{CompressionSimulator, Generation, JobEvent, TaskScheduler};
use crate::query::{self, SortDirection, SortKey};
use crate::state::{reduce, Action, ViewState};

/// Which queue an action travels through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Direct user input: selection, filter text
    Urgent,
    /// Deferred work: quality and compression commits
    Background,
}

impl Lane {
    /// Default lane for an action
    pub fn of(action: &Action) -> Self {
        match action {
            Action::Select(_) | Action::ClearSelection | Action::SetFilter(_) => Self::Urgent,
            Action::SetQuality(_) | Action::Compress(_) => Self::Background,
        }
    }
}

#[derive(Debug)]
enum BackgroundTask {
    Commit(Action),
    ResolveModel(u64),
}

/// Everything the render surface needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Resolved selection
    pub asset: Option<&'a Asset>,
    /// Active quality tier
    pub quality: QualityLevel,
    /// Selected model, normalized, or its loading state
    pub model: &'a ModelView,
    /// Cosmetic job progress
    pub progress: Option<u8>,
    /// A compression job is in flight
    pub pending: bool,
}

/// State owner for one browsing session
pub struct AssetBrowser<L> {
    initial: Arc<ViewState>,
    state: Arc<ViewState>,
    urgent: VecDeque<Action>,
    background: VecDeque<BackgroundTask>,
    scheduler: TaskScheduler<JobEvent>,
    simulator: CompressionSimulator,
    loader: L,
    model: ModelSlot,
    sort_key: SortKey,
    sort_direction: SortDirection,
    applied: Option<Vec<Action>>,
}

impl<L: ModelLoader> AssetBrowser<L> {
    /// Session over `assets`
    pub fn new(assets: Vec<Asset>, config: &BrowserConfig, loader: L) -> Self {
        let initial = Arc::new(ViewState::new(assets).with_quality(config.view.initial_quality));
        log::info!("Asset browser started with {} asset(s)", initial.assets().len());

        Self {
            state: Arc::clone(&initial),
            initial,
            urgent: VecDeque::new(),
            background: VecDeque::new(),
            scheduler: TaskScheduler::new(),
            simulator: CompressionSimulator::new(&config.scheduler),
            loader,
            model: ModelSlot::new(config.normalization.target_size),
            sort_key: config.view.sort_key,
            sort_direction: config.view.sort_direction,
            applied: None,
        }
    }

    /// Session seeded from a catalog collaborator
    pub fn from_catalog<C: CatalogLoader>(
        catalog: &C,
        config: &BrowserConfig,
        loader: L,
    ) -> Result<Self, CatalogError> {
        Ok(Self::new(catalog.load()?, config, loader))
    }

    /// Current state
    pub fn state(&self) -> &Arc<ViewState> {
        &self.state
    }

    /// Start recording applied actions, replacing any earlier recording
    ///
    /// The current state becomes [`initial_state`](Self::initial_state).
    /// Recording is off by default since the log grows with every keystroke.
    pub fn record_actions(&mut self) {
        self.initial = Arc::clone(&self.state);
        self.applied = Some(Vec::new());
    }

    /// State the recording started from
    pub fn initial_state(&self) -> &Arc<ViewState> {
        &self.initial
    }

    /// Actions applied since [`record_actions`](Self::record_actions), in
    /// order; replaying them over [`initial_state`](Self::initial_state)
    /// reproduces [`state`](Self::state). Empty when not recording.
    pub fn applied_actions(&self) -> &[Action] {
        self.applied.as_deref().unwrap_or_default()
    }

    /// Queue an action on its default lane
    pub fn dispatch(&mut self, action: Action) {
        let lane = Lane::of(&action);
        self.dispatch_on(lane, action);
    }

    /// Queue an action on an explicit lane
    pub fn dispatch_on(&mut self, lane: Lane, action: Action) {
        log::debug!("dispatch {} on {lane:?} lane", action.kind());
        match lane {
            Lane::Urgent => self.urgent.push_back(action),
            Lane::Background => self.background.push_back(BackgroundTask::Commit(action)),
        }
    }

    /// Queue a selection change
    pub fn select(&mut self, id: impl Into<String>) {
        self.dispatch(Action::Select(id.into()));
    }

    /// Queue a filter edit
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.dispatch(Action::SetFilter(query.into()));
    }

    /// Start a compression run towards `level`, superseding any run in flight
    pub fn request_quality(&mut self, level: QualityLevel) -> Generation {
        self.simulator.run(level, &mut self.scheduler)
    }

    /// Change how the visible list is ordered
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort_key = key;
        self.sort_direction = direction;
    }

    /// Current sort key and direction
    pub fn sort(&self) -> (SortKey, SortDirection) {
        (self.sort_key, self.sort_direction)
    }

    /// Apply only the urgent lane, leaving background work queued
    pub fn flush_urgent(&mut self) {
        while let Some(action) = self.urgent.pop_front() {
            self.apply(action);
        }
    }

    /// Apply queued work: all urgent actions before each background item
    pub fn flush(&mut self) {
        loop {
            self.flush_urgent();
            match self.background.pop_front() {
                Some(BackgroundTask::Commit(action)) => self.apply(action),
                Some(BackgroundTask::ResolveModel(request)) => {
                    self.model.resolve(request, &self.loader);
                }
                None => break,
            }
        }
    }

    /// Move virtual time forward, firing job timers, then flush
    pub fn advance(&mut self, delta: Duration) {
        let until = self.scheduler.now() + delta;
        while let Some(fired) = self.scheduler.pop_due(until) {
            if let Some(completion) = self.simulator.handle(fired.task, &mut self.scheduler) {
                for action in completion.actions() {
                    self.dispatch_on(Lane::Background, action);
                }
            }
        }
        self.scheduler.settle(until);
        log::trace!(
            "advanced to {until:?}, {} timer(s) armed",
            self.scheduler.pending_count()
        );
        self.flush();
    }

    fn apply(&mut self, action: Action) {
        let next = reduce(&self.state, &action);
        if let Some(log) = &mut self.applied {
            log.push(action);
        }
        if Arc::ptr_eq(&next, &self.state) {
            return;
        }
        self.state = next;

        if let Some(request) = self.model.sync(self.state.selected_asset()) {
            self.background.push_back(BackgroundTask::ResolveModel(request));
        }
    }

    /// Filtered and sorted view of the current assets
    pub fn visible_assets(&self) -> Vec<&Asset> {
        query::visible_assets(
            self.state.assets(),
            self.state.filter_query(),
            self.sort_key,
            self.sort_direction,
        )
    }

    /// Selected model state
    pub fn model(&self) -> &ModelView {
        self.model.view()
    }

    /// Cosmetic progress of the job in flight
    pub fn progress(&self) -> Option<u8> {
        self.simulator.progress()
    }

    /// Whether a compression job is in flight
    pub fn is_pending(&self) -> bool {
        self.simulator.is_pending()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Snapshot for the render surface
    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            asset: self.state.selected_asset(),
            quality: self.state.active_quality(),
            model: self.model.view(),
            progress: self.simulator.progress(),
            pending: self.simulator.is_pending(),
        }
    }
}

#[cfg(test)]
mod tests;
