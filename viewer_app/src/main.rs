//! Asset browser session driver
//!
//! Runs a scripted browsing session against the configured catalog (the
//! built-in sample when none is set) and logs what the render surface would
//! show each time it changes. Pass a `.toml`
//! or `.ron` config path as the first argument to override the defaults.

use std::time::Duration;

use asset_core::foundation::logging;
use asset_core::prelude::*;

type Loader = CachedLoader<FileModelLoader>;

/// One scripted input, fired once the session clock reaches `at`
struct Step {
    at: Duration,
    input: Input,
}

enum Input {
    Select(&'static str),
    Filter(&'static str),
    Sort(SortKey, SortDirection),
    Quality(QualityLevel),
}

fn script() -> Vec<Step> {
    let step = |ms, input| Step {
        at: Duration::from_millis(ms),
        input,
    };
    vec![
        step(0, Input::Select("crate-01")),
        step(200, Input::Sort(SortKey::PolyCount, SortDirection::Descending)),
        step(400, Input::Quality(QualityLevel::Low)),
        // Selection moves while the job runs; the result lands on the knot
        step(1000, Input::Select("knot-01")),
        step(2500, Input::Quality(QualityLevel::Med)),
        step(2800, Input::Quality(QualityLevel::High)),
        step(3000, Input::Filter("hero")),
        step(4500, Input::Select("knight-01")),
        step(5000, Input::Filter("")),
    ]
}

struct ViewerApp {
    browser: AssetBrowser<Loader>,
    timer: Timer,
    script: std::vec::IntoIter<Step>,
    next: Option<Step>,
    end: Duration,
    last_frame: Option<String>,
}

impl ViewerApp {
    fn new(config: &BrowserConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let loader = CachedLoader::new(FileModelLoader::new(config.assets.search_paths.clone()));
        let mut browser = match &config.assets.catalog {
            Some(path) => AssetBrowser::from_catalog(&FileCatalog::new(path), config, loader)?,
            None => AssetBrowser::from_catalog(&SampleCatalog, config, loader)?,
        };
        browser.record_actions();

        let mut script = script().into_iter();
        let next = script.next();
        Ok(Self {
            browser,
            timer: Timer::new(),
            script,
            next,
            end: Duration::from_millis(6000),
            last_frame: None,
        })
    }

    fn run(&mut self) {
        log::info!("Running scripted session for {:?}", self.end);

        while self.browser.now() < self.end {
            self.timer.update();
            self.feed_input();
            self.browser.advance(self.timer.delta());
            self.report();
            std::thread::sleep(Duration::from_millis(16));
        }

        self.summary();
    }

    fn feed_input(&mut self) {
        while let Some(step) = self.next.take() {
            if step.at > self.browser.now() {
                self.next = Some(step);
                return;
            }
            match step.input {
                Input::Select(id) => self.browser.select(id),
                Input::Filter(text) => self.browser.set_filter(text),
                Input::Sort(key, direction) => {
                    log::info!("Sorting by {key} {direction}");
                    self.browser.set_sort(key, direction);
                }
                Input::Quality(level) => {
                    let generation = self.browser.request_quality(level);
                    log::info!("Requested {level} as job {generation}");
                }
            }
            self.next = self.script.next();
        }
    }

    fn report(&mut self) {
        let frame = self.browser.frame();
        let model = match frame.model {
            ModelView::Empty => "no model".to_string(),
            ModelView::Loading { .. } => "loading".to_string(),
            ModelView::Ready { normalized, .. } => format!("ready, scale {:.3}", normalized.scale),
            ModelView::Failed { message, .. } => format!("failed: {message}"),
        };
        let asset = frame.asset.map_or_else(
            || "nothing selected".to_string(),
            |asset| format!("{} ({} polys, {} MB)", asset.name, asset.poly_count, asset.size_mb),
        );
        let line = match frame.progress {
            Some(progress) => format!("{asset} | {} | {model} | compressing {progress}%", frame.quality),
            None => format!("{asset} | {} | {model}", frame.quality),
        };

        if self.last_frame.as_deref() != Some(line.as_str()) {
            log::info!("[{:>5}ms] {line}", self.browser.now().as_millis());
            self.last_frame = Some(line);
        }
    }

    fn summary(&self) {
        log::info!(
            "Session ended after {} frame(s), {} action(s) applied",
            self.timer.frame_count(),
            self.browser.applied_actions().len()
        );
        for asset in self.browser.visible_assets() {
            log::info!("  {:<24} {:>8} polys {:>6} MB", asset.name, asset.poly_count, asset.size_mb);
        }

        let replayed = replay(self.browser.initial_state(), self.browser.applied_actions());
        if *replayed != **self.browser.state() {
            log::error!("Replaying the action log did not reproduce the final state");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => BrowserConfig::load_validated(&path)?,
        None => BrowserConfig::default(),
    };
    logging::init(&config.logging.filter);

    log::info!("Starting asset browser session");
    let mut app = ViewerApp::new(&config)?;
    app.run();
    log::info!("Asset browser session finished");
    Ok(())
}
