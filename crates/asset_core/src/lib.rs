//! # Asset Core
//!
//! State and scheduling core for a 3D asset browser.
//!
//! ## Features
//!
//! - **Pure State**: Every change goes through [`state::reduce`] and can be replayed
//! - **Compression Jobs**: Simulated quality changes on a virtual-time scheduler
//! - **Filtering**: Case-insensitive search with stable sorting
//! - **Normalization**: Loaded models are centered and scaled to a common size
//! - **Lanes**: Selection and search never wait behind background work
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use asset_core::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BrowserConfig::default();
//!     let mut browser = AssetBrowser::from_catalog(&SampleCatalog, &config, ProceduralLoader)?;
//!
//!     browser.select("crate-01");
//!     browser.request_quality(QualityLevel::Low);
//!     browser.advance(Duration::from_millis(1500));
//!
//!     let frame = browser.frame();
//!     println!("{:?} at {}", frame.asset.map(|a| &a.name), frame.quality);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod scene;
pub mod state;
pub mod query;
pub mod jobs;
pub mod browser;

/// Common imports for browser users
pub mod prelude {
    pub use crate::{
        assets::{
            Asset, CachedLoader, CatalogLoader, FileCatalog, FileModelLoader, ModelLoader,
            ProceduralLoader, QualityLevel, SampleCatalog, ShapeDescriptor,
        },
        browser::{AssetBrowser, Lane, ModelView, RenderFrame},
        config::{BrowserConfig, Config, ConfigError},
        foundation::{
            math::{Transform, Vec3},
            time::Timer,
        },
        jobs::{CompressionSimulator, TaskScheduler},
        query::{SortDirection, SortKey},
        scene::{normalize, NormalizedModel, SceneGraph},
        state::{reduce, replay, Action, ViewState},
    };
}
