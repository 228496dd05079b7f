use std::path::PathBuf;

use anyhow::{Context, Result};

use super::FaceDetector;
use crate::models::BoundingBox;

/// Detector stand-in that reads detections from a JSON sidecar file: a
/// plain array of fractional bounding boxes.
///
/// Lets the pipeline run locally against pre-computed detector output.
/// The storage key is ignored because the sidecar already names one
/// specific image's faces.
#[derive(Debug, Clone)]
pub struct SidecarDetector {
    path: PathBuf,
}

impl SidecarDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FaceDetector for SidecarDetector {
    async fn detect_faces(&self, _key: &str) -> Result<Vec<BoundingBox>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading detections from `{}`", self.path.display()))?;
        let boxes = serde_json::from_str(&raw)
            .with_context(|| format!("parsing detections in `{}`", self.path.display()))?;
        Ok(boxes)
    }
}
