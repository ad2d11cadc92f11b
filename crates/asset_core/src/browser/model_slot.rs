//! The selected model and its loading state

use std::sync::Arc;

use crate::assets::{Asset, ModelLoader, ShapeDescriptor};
use crate::scene::{normalize, NormalizedModel, SceneGraph};

/// What the viewer can show for the current selection
#[derive(Debug, Clone, PartialEq)]
pub enum ModelView {
    /// Nothing selected, or the selection does not resolve
    Empty,
    /// Waiting for the loader; show a placeholder
    Loading {
        /// Descriptor being resolved
        source: ShapeDescriptor,
    },
    /// Normalized graph ready to draw
    Ready {
        /// Descriptor the graph came from
        source: ShapeDescriptor,
        /// Normalized copy of the loaded graph
        graph: Arc<SceneGraph>,
        /// Translation and scale that were applied
        normalized: NormalizedModel,
    },
    /// The loader gave up
    Failed {
        /// Descriptor that failed
        source: ShapeDescriptor,
        /// Loader error text
        message: String,
    },
}

impl ModelView {
    /// Descriptor this view belongs to
    pub fn source(&self) -> Option<&ShapeDescriptor> {
        match self {
            Self::Empty => None,
            Self::Loading { source } | Self::Ready { source, .. } | Self::Failed { source, .. } => {
                Some(source)
            }
        }
    }

    /// Normalization result, once loaded
    pub fn normalized(&self) -> Option<&NormalizedModel> {
        match self {
            Self::Ready { normalized, .. } => Some(normalized),
            _ => None,
        }
    }
}

/// Tracks which descriptor is selected and invalidates stale loads
#[derive(Debug)]
pub(super) struct ModelSlot {
    target_size: f32,
    source: Option<ShapeDescriptor>,
    request: u64,
    view: ModelView,
}

impl ModelSlot {
    pub(super) fn new(target_size: f32) -> Self {
        Self {
            target_size,
            source: None,
            request: 0,
            view: ModelView::Empty,
        }
    }

    pub(super) fn view(&self) -> &ModelView {
        &self.view
    }

    /// Follow the selection; returns a request number when a load must be queued
    pub(super) fn sync(&mut self, selected: Option<&Asset>) -> Option<u64> {
        let source = selected.map(|asset| &asset.shape);
        if source == self.source.as_ref() {
            return None;
        }

        // Any resolution still queued for the old source is now stale
        self.request += 1;
        self.source = source.cloned();
        match &self.source {
            None => {
                self.view = ModelView::Empty;
                None
            }
            Some(source) => {
                log::debug!("Model source changed to {source:?}");
                self.view = ModelView::Loading {
                    source: source.clone(),
                };
                Some(self.request)
            }
        }
    }

    /// Load and normalize the current source if `request` is still current
    pub(super) fn resolve<L: ModelLoader>(&mut self, request: u64, loader: &L) {
        if request != self.request {
            log::debug!("Skipping stale model request {request}");
            return;
        }
        let Some(source) = self.source.clone() else {
            return;
        };

        self.view = match loader.load(&source) {
            Ok(graph) => {
                let (graph, normalized) = normalize(&graph, self.target_size);
                ModelView::Ready {
                    source,
                    graph: Arc::new(graph),
                    normalized,
                }
            }
            Err(err) => {
                log::warn!("Failed to load {source:?}: {err}");
                ModelView::Failed {
                    source,
                    message: err.to_string(),
                }
            }
        };
    }
}
