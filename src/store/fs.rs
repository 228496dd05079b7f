use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::ObjectStore;

/// Object store rooted in a local directory tree.
///
/// Keys map directly to relative paths under the root; the public
/// address joins the configured base address with the key.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
    base_address: String,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>, base_address: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_address: base_address.into(),
        }
    }
}

impl ObjectStore for FsObjectStore {
    async fn put(&self, local: &Path, key: &str) -> Result<()> {
        let dest = self.root.join(key);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(local, &dest)
            .await
            .with_context(|| format!("copying upload into `{}`", dest.display()))?;
        Ok(())
    }

    fn public_address(&self, key: &str) -> String {
        format!("{}/{}", self.base_address.trim_end_matches('/'), key)
    }
}
