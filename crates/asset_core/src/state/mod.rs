//! Asset state machine
//!
//! [`ViewState`] is only ever replaced, never edited: [`reduce`] maps the
//! current state and an [`Action`] to the next state. Unchanged parts are
//! shared through `Arc`, and a transition that changes nothing hands back the
//! very same allocation.

mod action;
mod compression;
mod reducer;
mod view_state;

pub use action::Action;
pub use compression::{compress_asset, MIN_POLY_COUNT, MIN_SIZE_MB};
pub use reducer::{reduce, replay};
pub use view_state::ViewState;
