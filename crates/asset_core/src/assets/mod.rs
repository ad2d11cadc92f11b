//! Asset catalog, quality tiers and model loading

pub mod asset;
pub mod catalog;
pub mod model_loader;
pub mod obj_loader;
pub mod quality;

pub use asset::{parse_timestamp, Asset, ModelRef, ProceduralShape, ShapeDescriptor};
pub use catalog::{CatalogError, CatalogLoader, FileCatalog, SampleCatalog};
pub use model_loader::{CachedLoader, FileModelLoader, LoadError, ModelLoader, ProceduralLoader};
pub use obj_loader::{ObjError, ObjLoader};
pub use quality::{ParseQualityError, QualityLevel};
