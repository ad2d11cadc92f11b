use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;

use super::*;
use crate::assets::{LoadError, ProceduralLoader, SampleCatalog, ShapeDescriptor};
use crate::foundation::math::Vec3;
use crate::scene::SceneGraph;
use crate::state::replay;

struct CountingLoader {
    calls: Rc<Cell<usize>>,
}

impl ModelLoader for CountingLoader {
    fn load(&self, shape: &ShapeDescriptor) -> Result<Arc<SceneGraph>, LoadError> {
        self.calls.set(self.calls.get() + 1);
        ProceduralLoader.load(shape)
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn browser() -> (AssetBrowser<CountingLoader>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let loader = CountingLoader {
        calls: Rc::clone(&calls),
    };
    let mut browser =
        AssetBrowser::from_catalog(&SampleCatalog, &BrowserConfig::default(), loader).unwrap();
    browser.record_actions();
    (browser, calls)
}

#[test]
fn test_selection_shows_placeholder_until_background_runs() {
    let (mut browser, calls) = browser();
    assert_eq!(*browser.model(), ModelView::Empty);

    browser.select("crate-01");
    browser.flush_urgent();
    assert_eq!(browser.state().selected_id(), Some("crate-01"));
    assert!(matches!(browser.model(), ModelView::Loading { .. }));
    assert_eq!(calls.get(), 0);

    browser.flush();
    assert_eq!(calls.get(), 1);

    let ModelView::Ready { graph, normalized, .. } = browser.model() else {
        panic!("expected a ready model, got {:?}", browser.model());
    };
    // unit cube: largest extent 1
    assert_relative_eq!(normalized.scale, 1.5, epsilon = 1e-6);
    assert!(normalized.bounds_valid);
    let bounds = graph.bounds().unwrap();
    assert_relative_eq!(bounds.center(), Vec3::zeros(), epsilon = 1e-5);
    assert_relative_eq!(bounds.max_size(), 1.5, epsilon = 1e-5);
}

#[test]
fn test_superseded_load_is_skipped() {
    let (mut browser, calls) = browser();

    browser.select("crate-01");
    browser.flush_urgent();
    browser.select("knot-01");
    browser.flush_urgent();
    browser.flush();

    assert_eq!(calls.get(), 1);
    assert_eq!(
        browser.model().source(),
        Some(&SampleCatalog::assets()[3].shape)
    );
}

#[test]
fn test_dangling_selection_is_empty_model() {
    let (mut browser, calls) = browser();
    browser.select("crate-01");
    browser.flush();

    browser.select("ghost");
    browser.flush();

    assert_eq!(browser.state().selected_id(), Some("ghost"));
    assert!(browser.state().selected_asset().is_none());
    assert_eq!(*browser.model(), ModelView::Empty);
    assert!(browser.frame().asset.is_none());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_model_failure_leaves_state_alone() {
    let (mut browser, _) = browser();
    browser.select("knight-01");
    browser.flush();

    assert!(matches!(browser.model(), ModelView::Failed { .. }));
    assert_eq!(browser.state().selected_asset().unwrap().id, "knight-01");
    assert_eq!(browser.state().assets(), SampleCatalog::assets().as_slice());
}

#[test]
fn test_job_commits_quality_then_compression() {
    let (mut browser, calls) = browser();
    browser.select("crate-01");
    browser.flush();

    browser.request_quality(QualityLevel::Med);
    assert!(browser.is_pending());
    assert_eq!(browser.progress(), Some(0));

    browser.advance(ms(500));
    assert_eq!(browser.progress(), Some(50));
    assert_eq!(browser.state().active_quality(), QualityLevel::High);

    browser.advance(ms(1000));
    assert!(!browser.is_pending());
    assert_eq!(browser.progress(), None);
    assert_eq!(browser.state().active_quality(), QualityLevel::Med);

    let compressed = browser.state().asset("crate-01").unwrap();
    assert_eq!(compressed.poly_count, 48_000);
    assert_eq!(compressed.size_mb, 43.0);

    let tail = &browser.applied_actions()[browser.applied_actions().len() - 2..];
    assert_eq!(
        tail,
        [Action::SetQuality(QualityLevel::Med), Action::Compress(QualityLevel::Med)]
    );
    // Shape did not change, so nothing reloads
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_selection_change_mid_job_redirects_result() {
    let (mut browser, _) = browser();
    browser.select("crate-01");
    browser.flush();

    browser.request_quality(QualityLevel::Low);
    browser.advance(ms(1000));
    browser.select("knot-01");
    browser.advance(ms(500));

    assert_eq!(browser.state().asset("crate-01").unwrap().poly_count, 120_000);
    let knot = browser.state().asset("knot-01").unwrap();
    assert_eq!(knot.poly_count, 60_000);
    assert_eq!(knot.size_mb, 38.0);
}

#[test]
fn test_urgent_input_lands_before_queued_commit() {
    let (mut browser, _) = browser();
    browser.select("crate-01");
    browser.flush();

    browser.dispatch(Action::Compress(QualityLevel::High));
    browser.select("rock-01");
    browser.flush();

    assert_eq!(browser.state().asset("crate-01").unwrap().poly_count, 120_000);
    assert_eq!(browser.state().asset("rock-01").unwrap().poly_count, 31_500);
}

#[test]
fn test_newer_job_supersedes_older() {
    let (mut browser, _) = browser();
    browser.select("knight-01");
    browser.flush();

    browser.request_quality(QualityLevel::Low);
    browser.advance(ms(1000));
    browser.request_quality(QualityLevel::Med);

    // First job's deadline passes without effect
    browser.advance(ms(1000));
    assert_eq!(browser.state().active_quality(), QualityLevel::High);
    assert_eq!(browser.state().asset("knight-01").unwrap().poly_count, 850_000);
    assert!(browser.is_pending());

    browser.advance(ms(500));
    assert_eq!(browser.state().active_quality(), QualityLevel::Med);
    let knight = browser.state().asset("knight-01").unwrap();
    assert_eq!(knight.poly_count, 340_000);
    assert_eq!(knight.size_mb, 210.0);

    let compressions = browser
        .applied_actions()
        .iter()
        .filter(|action| matches!(action, Action::Compress(_)))
        .count();
    assert_eq!(compressions, 1);
}

#[test]
fn test_job_without_selection_only_sets_quality() {
    let (mut browser, _) = browser();
    browser.select("ghost");
    browser.flush();
    let before = Arc::clone(browser.state());

    browser.request_quality(QualityLevel::Low);
    browser.advance(ms(1500));

    assert_eq!(browser.state().active_quality(), QualityLevel::Low);
    assert!(std::ptr::eq(before.assets(), browser.state().assets()));
}

#[test]
fn test_visible_assets_follow_filter_and_sort() {
    let (mut browser, _) = browser();
    browser.set_sort(SortKey::PolyCount, SortDirection::Descending);

    let ids: Vec<_> = browser.visible_assets().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["knight-01", "knot-01", "crate-01", "rock-01"]);

    browser.set_filter(" HERO");
    browser.flush();
    let ids: Vec<_> = browser.visible_assets().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["knight-01"]);
    assert_eq!(browser.state().filter_query(), " HERO");
}

#[test]
fn test_session_replays_to_same_state() {
    let (mut browser, _) = browser();
    browser.select("knot-01");
    browser.set_filter("art");
    browser.request_quality(QualityLevel::Low);
    browser.advance(ms(1500));
    browser.request_quality(QualityLevel::Low);
    browser.advance(ms(1500));
    browser.select("rock-01");
    browser.dispatch(Action::Compress(QualityLevel::High));
    browser.flush();

    let replayed = replay(browser.initial_state(), browser.applied_actions());
    assert_eq!(*replayed, **browser.state());
    assert_eq!(browser.state().asset("knot-01").unwrap().poly_count, 12_000);
}

#[test]
fn test_frame_reflects_session() {
    let (mut browser, _) = browser();
    browser.select("rock-01");
    browser.flush();
    browser.request_quality(QualityLevel::High);
    browser.advance(ms(200));

    let frame = browser.frame();
    assert_eq!(frame.asset.map(|a| a.id.as_str()), Some("rock-01"));
    assert_eq!(frame.quality, QualityLevel::High);
    assert_eq!(frame.progress, Some(20));
    assert!(frame.pending);
    assert!(frame.model.normalized().is_some());
}

#[test]
fn test_initial_quality_from_config() {
    let mut config = BrowserConfig::default();
    config.view.initial_quality = QualityLevel::Low;
    let browser = AssetBrowser::new(SampleCatalog::assets(), &config, ProceduralLoader);

    assert_eq!(browser.state().active_quality(), QualityLevel::Low);
    assert_eq!(browser.now(), Duration::ZERO);
}

#[test]
fn test_action_log_is_opt_in() {
    let mut browser =
        AssetBrowser::new(SampleCatalog::assets(), &BrowserConfig::default(), ProceduralLoader);
    browser.select("crate-01");
    browser.set_filter("c");
    browser.flush();
    assert!(browser.applied_actions().is_empty());

    browser.record_actions();
    assert!(Arc::ptr_eq(browser.initial_state(), browser.state()));
    browser.set_filter("cr");
    browser.dispatch(Action::Compress(QualityLevel::Low));
    browser.flush();

    assert_eq!(browser.applied_actions().len(), 2);
    let replayed = replay(browser.initial_state(), browser.applied_actions());
    assert_eq!(*replayed, **browser.state());
    assert_eq!(browser.state().asset("crate-01").unwrap().poly_count, 24_000);
}
