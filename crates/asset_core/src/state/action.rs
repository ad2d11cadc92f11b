//! Transitions understood by the state machine

use crate::assets::QualityLevel;

/// Everything that can change a [`ViewState`](super::ViewState)
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Point the selection at an id; the id does not have to exist
    Select(String),
    /// Drop the selection
    ClearSelection,
    /// Replace the filter text verbatim
    SetFilter(String),
    /// Switch the active quality tier
    SetQuality(QualityLevel),
    /// Compress the selected asset, if the selection resolves
    Compress(QualityLevel),
}

impl Action {
    /// Short name for logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::ClearSelection => "clear_selection",
            Self::SetFilter(_) => "set_filter",
            Self::SetQuality(_) => "set_quality",
            Self::Compress(_) => "compress",
        }
    }
}
