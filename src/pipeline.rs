use image::{ImageFormat, RgbImage};
use tempfile::NamedTempFile;

use crate::error::MosaicError;
use crate::models::{ArtifactKeying, ArtifactRole, MosaicOutcome, MosaicStyle};
use crate::mosaic;
use crate::retry::RetryPolicy;
use crate::store::{FaceDetector, ObjectStore};

/// Orchestrates one image request end to end: persist the original,
/// detect faces, mask, transform, composite, persist the work image and
/// (when large enough) a preview.
///
/// Holds no per-request state, so a single pipeline value can serve
/// concurrent invocations. External capabilities are injected at
/// construction.
pub struct ArtifactPipeline<D, S> {
    detector: D,
    store: S,
    retry: RetryPolicy,
    preview_max_dim: u32,
    verbose: bool,
}

impl<D: FaceDetector, S: ObjectStore> ArtifactPipeline<D, S> {
    pub fn new(detector: D, store: S) -> Self {
        Self {
            detector,
            store,
            retry: RetryPolicy::default(),
            preview_max_dim: mosaic::PREVIEW_MAX_DIM,
            verbose: false,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_preview_max_dim(mut self, max_dim: u32) -> Self {
        self.preview_max_dim = max_dim;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run the pipeline for one inbound image.
    ///
    /// Returns the no-faces outcome when the detector reports nothing;
    /// every other shortfall is a fatal [`MosaicError`]. Artifacts
    /// persisted before a later failure stay in storage: keys are
    /// request-unique, so they are harmless orphans.
    pub async fn run(
        &self,
        image_bytes: &[u8],
        style: MosaicStyle,
        keying: &ArtifactKeying,
    ) -> Result<MosaicOutcome, MosaicError> {
        let original = image::load_from_memory(image_bytes)?.to_rgb8();
        let (width, height) = original.dimensions();
        if self.verbose {
            println!("Decoded image: {}x{}", width, height);
        }

        // The detector addresses the stored object, not our buffer, so
        // the original upload must land before detection starts.
        let original_key = keying.key(ArtifactRole::Original);
        self.persist(&original, &original_key).await?;

        if self.verbose {
            println!("Detecting faces on {}...", original_key);
        }
        let boxes = self
            .detector
            .detect_faces(&original_key)
            .await
            .map_err(MosaicError::Detection)?;

        let Some(mask) = mosaic::build_mask(height, width, &boxes) else {
            if self.verbose {
                println!("No faces found");
            }
            return Ok(MosaicOutcome::no_faces());
        };
        if self.verbose {
            println!("Masked {} face box(es)", boxes.len());
        }

        let transformed = mosaic::mosaic_image(&original, style);
        let work = mosaic::composite(&original, &transformed, &mask);

        let work_key = keying.key(ArtifactRole::Work);
        self.persist(&work, &work_key).await?;
        let work_address = self.store.public_address(&work_key);

        let preview_address = if width.max(height) > self.preview_max_dim {
            let preview = mosaic::shrink_to_fit(&work, self.preview_max_dim);
            let preview_key = keying.key(ArtifactRole::Preview);
            self.persist(&preview, &preview_key).await?;
            self.store.public_address(&preview_key)
        } else {
            // Small enough to display directly; the work image doubles
            // as its own preview.
            work_address.clone()
        };

        Ok(MosaicOutcome {
            found: true,
            work_address: Some(work_address),
            preview_address: Some(preview_address),
        })
    }

    /// Encode `image` as JPEG into a scratch file and upload it under
    /// `key` with retries. The scratch file is removed when the handle
    /// drops, on success and failure alike.
    async fn persist(&self, image: &RgbImage, key: &str) -> Result<(), MosaicError> {
        let scratch = NamedTempFile::new()?;
        image
            .save_with_format(scratch.path(), ImageFormat::Jpeg)
            .map_err(MosaicError::Encode)?;

        self.retry
            .run(|| self.store.put(scratch.path(), key))
            .await
            .map_err(|cause| MosaicError::Storage {
                key: key.to_string(),
                attempts: self.retry.max_attempts,
                cause,
            })?;

        if self.verbose {
            println!("Stored {}", key);
        }
        Ok(())
    }
}
