//! Simulated compression job
//!
//! A run has two independent timers: a repeating ticker that only feeds the
//! progress bar, and a one-shot completion that commits the result. Starting
//! a new run bumps the generation and cancels the old timers; any event that
//! still arrives with an old generation is dropped.

use std::fmt;
use std::time::Duration;

use super::scheduler::{TaskScheduler, TimerId};
use crate::assets::QualityLevel;
use crate::config::SchedulerSettings;
use crate::state::Action;

/// Token identifying one run; newer runs have larger tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Timer payloads produced by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobEvent {
    /// Cosmetic progress step
    Tick(Generation),
    /// Simulated latency elapsed
    Complete(Generation),
}

impl JobEvent {
    /// Run the event belongs to
    pub fn generation(self) -> Generation {
        match self {
            Self::Tick(generation) | Self::Complete(generation) => generation,
        }
    }
}

/// Result of a finished run, to be committed by the state owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobCompletion {
    /// Run that finished
    pub generation: Generation,
    /// Tier the run was started with
    pub target: QualityLevel,
}

impl JobCompletion {
    /// The two transitions to commit, in order
    ///
    /// `Compress` resolves the selection when it is applied, not when the job
    /// started.
    pub fn actions(&self) -> [Action; 2] {
        [Action::SetQuality(self.target), Action::Compress(self.target)]
    }
}

#[derive(Debug)]
struct Job {
    generation: Generation,
    target: QualityLevel,
    progress: u8,
    ticker: Option<TimerId>,
    completion: TimerId,
    started_at: Duration,
}

/// Runs at most one simulated compression job at a time
#[derive(Debug)]
pub struct CompressionSimulator {
    tick_interval: Duration,
    progress_step: u8,
    latency: Duration,
    last_generation: u64,
    job: Option<Job>,
}

impl CompressionSimulator {
    /// Simulator using the configured cadence, step and latency
    pub fn new(settings: &SchedulerSettings) -> Self {
        Self {
            tick_interval: settings.tick_interval(),
            progress_step: settings.progress_step,
            latency: settings.job_latency(),
            last_generation: 0,
            job: None,
        }
    }

    /// Start a run towards `target`, superseding any run in flight
    pub fn run(&mut self, target: QualityLevel, scheduler: &mut TaskScheduler<JobEvent>) -> Generation {
        if let Some(old) = self.job.take() {
            log::info!(
                "Compression job {} ({}) superseded at {}%",
                old.generation,
                old.target,
                old.progress
            );
            Self::cancel_timers(&old, scheduler);
        }

        self.last_generation += 1;
        let generation = Generation(self.last_generation);
        let ticker = scheduler.schedule_repeating(self.tick_interval, JobEvent::Tick(generation));
        let completion = scheduler.schedule_once(self.latency, JobEvent::Complete(generation));

        log::info!("Compression job {generation} started towards {target}");
        self.job = Some(Job {
            generation,
            target,
            progress: 0,
            ticker: Some(ticker),
            completion,
            started_at: scheduler.now(),
        });
        generation
    }

    /// Feed a fired timer event; returns the completion when the live run finishes
    pub fn handle(
        &mut self,
        event: JobEvent,
        scheduler: &mut TaskScheduler<JobEvent>,
    ) -> Option<JobCompletion> {
        let live = self
            .job
            .as_ref()
            .is_some_and(|job| job.generation == event.generation());
        if !live {
            log::debug!("Dropping stale {event:?}");
            return None;
        }

        match event {
            JobEvent::Tick(_) => {
                let job = self.job.as_mut()?;
                job.progress = job.progress.saturating_add(self.progress_step).min(100);
                if job.progress == 100 {
                    if let Some(ticker) = job.ticker.take() {
                        scheduler.cancel(ticker);
                    }
                }
                None
            }
            JobEvent::Complete(generation) => {
                let job = self.job.take()?;
                Self::cancel_timers(&job, scheduler);
                log::info!(
                    "Compression job {generation} finished towards {} after {:?}",
                    job.target,
                    scheduler.now().saturating_sub(job.started_at)
                );
                Some(JobCompletion {
                    generation,
                    target: job.target,
                })
            }
        }
    }

    /// Abandon the run in flight without committing anything
    pub fn cancel(&mut self, scheduler: &mut TaskScheduler<JobEvent>) -> bool {
        match self.job.take() {
            Some(job) => {
                log::info!("Compression job {} cancelled", job.generation);
                Self::cancel_timers(&job, scheduler);
                true
            }
            None => false,
        }
    }

    fn cancel_timers(job: &Job, scheduler: &mut TaskScheduler<JobEvent>) {
        if let Some(ticker) = job.ticker {
            scheduler.cancel(ticker);
        }
        scheduler.cancel(job.completion);
    }

    /// Cosmetic progress of the run in flight, `None` when idle
    pub fn progress(&self) -> Option<u8> {
        self.job.as_ref().map(|job| job.progress)
    }

    /// True from `run` until the completion is handed out
    pub fn is_pending(&self) -> bool {
        self.job.is_some()
    }

    /// Tier of the run in flight
    pub fn target(&self) -> Option<QualityLevel> {
        self.job.as_ref().map(|job| job.target)
    }

    /// Generation of the run in flight
    pub fn generation(&self) -> Option<Generation> {
        self.job.as_ref().map(|job| job.generation)
    }
}
