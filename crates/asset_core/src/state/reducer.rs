//! The transition function

use std::sync::Arc;

use super::action::Action;
use super::compression::compress_asset;
use super::view_state::ViewState;

/// Compute the state that follows `action`
///
/// Pure and deterministic: `state` is never modified and equal inputs give
/// equal outputs. `Compress` with a selection that does not resolve returns
/// `state` itself (same allocation).
pub fn reduce(state: &Arc<ViewState>, action: &Action) -> Arc<ViewState> {
    match action {
        Action::Select(id) => Arc::new(ViewState {
            selected_id: Some(id.clone()),
            ..ViewState::clone(state)
        }),
        Action::ClearSelection => Arc::new(ViewState {
            selected_id: None,
            ..ViewState::clone(state)
        }),
        Action::SetFilter(query) => Arc::new(ViewState {
            filter_query: query.clone(),
            ..ViewState::clone(state)
        }),
        Action::SetQuality(level) => Arc::new(ViewState {
            active_quality: *level,
            ..ViewState::clone(state)
        }),
        Action::Compress(level) => {
            let Some(index) = state.selected_index() else {
                log::debug!("compress({level}) ignored: selection does not resolve");
                return Arc::clone(state);
            };

            let mut assets = Vec::clone(&state.assets);
            let compressed = compress_asset(&assets[index], *level);
            log::debug!(
                "compress({level}) on '{}': {} -> {} polys, {} -> {} MB",
                compressed.id,
                assets[index].poly_count,
                compressed.poly_count,
                assets[index].size_mb,
                compressed.size_mb
            );
            assets[index] = compressed;

            Arc::new(ViewState {
                assets: Arc::new(assets),
                ..ViewState::clone(state)
            })
        }
    }
}

/// Fold `actions` over `initial`
pub fn replay<'a, I>(initial: &Arc<ViewState>, actions: I) -> Arc<ViewState>
where
    I: IntoIterator<Item = &'a Action>,
{
    actions
        .into_iter()
        .fold(Arc::clone(initial), |state, action| reduce(&state, action))
}
