#![allow(async_fn_in_trait)]

pub mod error;
pub mod models;
pub mod mosaic;
pub mod pipeline;
pub mod retry;
pub mod store;

pub use error::MosaicError;
pub use models::{
    ArtifactKeying, ArtifactRole, BoundingBox, MosaicOutcome, MosaicStyle, UserPreference,
};
pub use pipeline::ArtifactPipeline;
pub use retry::RetryPolicy;
pub use store::{
    FaceDetector, FsObjectStore, ObjectStore, PreferenceRepository, SidecarDetector,
    SqlitePreferenceStore, ensure_user,
};
