mod fs;
mod sidecar;
mod sqlite;

pub use fs::FsObjectStore;
pub use sidecar::SidecarDetector;
pub use sqlite::SqlitePreferenceStore;

use std::path::Path;

use anyhow::Result;

use crate::error::MosaicError;
use crate::models::{BoundingBox, MosaicStyle, UserPreference};
use crate::retry::RetryPolicy;

/// Face-detection capability.
///
/// The detector addresses images by their storage key, so the original
/// must be persisted before detection runs. An empty result is a valid,
/// non-error response.
pub trait FaceDetector {
    async fn detect_faces(&self, key: &str) -> Result<Vec<BoundingBox>>;
}

/// Binary object store for image artifacts.
pub trait ObjectStore {
    /// Upload the local file at `local` under `key`. Failures are
    /// treated as transient and retried by the caller.
    async fn put(&self, local: &Path, key: &str) -> Result<()>;

    /// Public address serving `key`: the store base joined with the
    /// key.
    fn public_address(&self, key: &str) -> String;
}

/// Durable per-user style preference records.
pub trait PreferenceRepository {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserPreference>>;

    /// Create (or refresh) the profile record. No style is set here; it
    /// resolves to the default until the user picks one.
    async fn put_user(
        &self,
        user_id: &str,
        display_name: &str,
        picture_url: Option<&str>,
    ) -> Result<()>;

    async fn update_style(&self, user_id: &str, style: MosaicStyle) -> Result<()>;
}

/// Fetch the user's record, creating it on first contact.
///
/// Every store call runs under `retry`; exhaustion surfaces as
/// [`MosaicError::Preference`].
pub async fn ensure_user<P: PreferenceRepository>(
    prefs: &P,
    retry: &RetryPolicy,
    user_id: &str,
    display_name: &str,
    picture_url: Option<&str>,
) -> Result<UserPreference, MosaicError> {
    let existing = retry
        .run(|| prefs.get_user(user_id))
        .await
        .map_err(|cause| MosaicError::Preference {
            attempts: retry.max_attempts,
            cause,
        })?;
    if let Some(user) = existing {
        return Ok(user);
    }

    retry
        .run(|| prefs.put_user(user_id, display_name, picture_url))
        .await
        .map_err(|cause| MosaicError::Preference {
            attempts: retry.max_attempts,
            cause,
        })?;

    // Read back rather than synthesizing locally, so callers observe
    // exactly what the store now holds.
    let created = retry
        .run(|| prefs.get_user(user_id))
        .await
        .map_err(|cause| MosaicError::Preference {
            attempts: retry.max_attempts,
            cause,
        })?;
    created.ok_or_else(|| MosaicError::Preference {
        attempts: retry.max_attempts,
        cause: anyhow::anyhow!("user `{user_id}` missing right after creation"),
    })
}
