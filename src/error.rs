use thiserror::Error;

/// Fatal error classes of the mosaic pipeline.
///
/// "No faces detected" is deliberately absent: it is an expected
/// outcome surfaced through [`crate::MosaicOutcome`], not an error.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// Malformed or empty image bytes. Not retried.
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Writing an artifact to the local scratch file failed.
    #[error("could not encode artifact: {0}")]
    Encode(image::ImageError),

    /// Style identifier outside the known set. Not retried.
    #[error("unsupported mosaic style `{0}`")]
    UnsupportedStyle(String),

    /// The face-detection capability failed. Not retried; malformed or
    /// unreachable detectors are not a transient storage condition.
    #[error("face detection failed: {0}")]
    Detection(anyhow::Error),

    /// Writing an artifact to object storage kept failing after the
    /// retry budget was spent.
    #[error("storing `{key}` failed after {attempts} attempts: {cause}")]
    Storage {
        key: String,
        attempts: u32,
        cause: anyhow::Error,
    },

    /// Reading or writing a user preference record kept failing after
    /// the retry budget was spent.
    #[error("preference store failed after {attempts} attempts: {cause}")]
    Preference { attempts: u32, cause: anyhow::Error },

    /// Local scratch-file handling failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
