use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use image::{Rgb, RgbImage};
use time::OffsetDateTime;

use facemosaic::{
    ArtifactKeying, BoundingBox, FaceDetector, MosaicStyle, ObjectStore, PreferenceRepository,
    UserPreference,
};

/// Deterministic image with per-pixel variation, so blur and tiling
/// visibly change pixel values.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Black/white checkerboard with the given cell edge, for tests that
/// need high-frequency content.
pub fn checker_image(width: u32, height: u32, cell: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    })
}

pub fn full_frame_box() -> BoundingBox {
    BoundingBox::new(0.0, 0.0, 1.0, 1.0)
}

/// Encode an image to JPEG bytes for feeding the pipeline.
pub fn jpeg_bytes(image: &RgbImage) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .expect("Failed to encode test image");
    buf.into_inner()
}

/// Keying with fixed namespace/user/message/timestamp so tests can
/// assert exact keys (stamp: 2020-09-13 12:26:40 UTC → 200913122640).
pub fn test_keying() -> ArtifactKeying {
    let now = OffsetDateTime::from_unix_timestamp(1_600_000_000).expect("valid timestamp");
    ArtifactKeying::new("test", "U1", "M1", now).expect("valid keying")
}

pub const TEST_ORG_KEY: &str = "test/U1/200913122640_org_M1.jpg";
pub const TEST_WORK_KEY: &str = "test/U1/200913122640_work_M1.jpg";
pub const TEST_PREV_KEY: &str = "test/U1/200913122640_prev_M1.jpg";

/// Object store keeping uploaded file bytes in a shared map.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

impl ObjectStore for MemoryObjectStore {
    async fn put(&self, local: &Path, key: &str) -> Result<()> {
        let bytes = std::fs::read(local)?;
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(())
    }

    fn public_address(&self, key: &str) -> String {
        format!("https://store.test/{key}")
    }
}

/// Wraps a [`MemoryObjectStore`] and fails the first `failures` puts
/// whose key contains `fail_substring`.
#[derive(Clone)]
pub struct FlakyObjectStore {
    inner: MemoryObjectStore,
    fail_substring: String,
    failures: Arc<AtomicU32>,
}

impl FlakyObjectStore {
    pub fn new(inner: MemoryObjectStore, fail_substring: &str, failures: u32) -> Self {
        Self {
            inner,
            fail_substring: fail_substring.to_string(),
            failures: Arc::new(AtomicU32::new(failures)),
        }
    }
}

impl ObjectStore for FlakyObjectStore {
    async fn put(&self, local: &Path, key: &str) -> Result<()> {
        if key.contains(&self.fail_substring) && self.failures.load(Ordering::SeqCst) > 0 {
            self.failures.fetch_sub(1, Ordering::SeqCst);
            return Err(anyhow!("injected transient failure for {key}"));
        }
        self.inner.put(local, key).await
    }

    fn public_address(&self, key: &str) -> String {
        self.inner.public_address(key)
    }
}

/// Detector returning a fixed box list, but only once the original has
/// actually been persisted — mirroring a real detector that reads the
/// stored object rather than an in-memory buffer.
#[derive(Clone)]
pub struct StubDetector {
    boxes: Vec<BoundingBox>,
    store: MemoryObjectStore,
}

impl StubDetector {
    pub fn new(boxes: Vec<BoundingBox>, store: MemoryObjectStore) -> Self {
        Self { boxes, store }
    }
}

impl FaceDetector for StubDetector {
    async fn detect_faces(&self, key: &str) -> Result<Vec<BoundingBox>> {
        if !self.store.contains(key) {
            return Err(anyhow!("object `{key}` has not been stored yet"));
        }
        Ok(self.boxes.clone())
    }
}

/// Preference store over a plain map.
#[derive(Clone, Default)]
pub struct MemoryPreferenceStore {
    users: Arc<Mutex<HashMap<String, UserPreference>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceRepository for MemoryPreferenceStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserPreference>> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn put_user(
        &self,
        user_id: &str,
        display_name: &str,
        picture_url: Option<&str>,
    ) -> Result<()> {
        self.users.lock().unwrap().insert(
            user_id.to_string(),
            UserPreference {
                user_id: user_id.to_string(),
                display_name: display_name.to_string(),
                picture_url: picture_url.map(str::to_string),
                selected_style: None,
            },
        );
        Ok(())
    }

    async fn update_style(&self, user_id: &str, style: MosaicStyle) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| anyhow!("no such user `{user_id}`"))?;
        user.selected_style = Some(style);
        Ok(())
    }
}
