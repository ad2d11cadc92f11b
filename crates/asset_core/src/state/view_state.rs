//! Browser state owned by the state machine

use std::sync::Arc;

use crate::assets::{Asset, QualityLevel};

/// Catalog, selection, filter text and active quality tier
///
/// Fields are only written by [`reduce`](super::reduce). The selection is a
/// weak reference: it may name an id that no longer exists, so every reader
/// goes through [`selected_asset`](Self::selected_asset).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub(super) assets: Arc<Vec<Asset>>,
    pub(super) selected_id: Option<String>,
    pub(super) filter_query: String,
    pub(super) active_quality: QualityLevel,
}

impl ViewState {
    /// Fresh state seeded with `assets`, nothing selected, empty filter
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets: Arc::new(assets),
            selected_id: None,
            filter_query: String::new(),
            active_quality: QualityLevel::default(),
        }
    }

    /// Builder-style initial quality tier
    pub fn with_quality(mut self, quality: QualityLevel) -> Self {
        self.active_quality = quality;
        self
    }

    /// All assets in catalog order
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Raw selection, resolved or not
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Current filter text, exactly as typed
    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    /// Active quality tier
    pub fn active_quality(&self) -> QualityLevel {
        self.active_quality
    }

    /// Look up an asset by id
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    /// Resolve the selection against the current assets
    pub fn selected_asset(&self) -> Option<&Asset> {
        self.selected_id.as_deref().and_then(|id| self.asset(id))
    }

    /// Position of the selected asset in the catalog
    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected_id.as_deref()?;
        self.assets.iter().position(|asset| asset.id == id)
    }
}
