use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;

/// Storage seam for uploaded images, injected through `AppState` so
/// handlers never touch the filesystem directly.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn put(&self, name: &str, body: Bytes) -> anyhow::Result<()>;
    async fn remove(&self, name: &str) -> anyhow::Result<()>;
}

/// Local-disk store. Files are addressed by generated filename only;
/// the serving layer exposes the same directory under /static/uploads.
#[derive(Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub async fn new(root: impl AsRef<Path>) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }
}

#[async_trait]
impl ImageStore for DiskStore {
    async fn put(&self, name: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.root.join(name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write image {}", path.display()))?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> anyhow::Result<()> {
        let path = self.root.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove image {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn scratch_dir() -> PathBuf {
        let mut token = [0u8; 8];
        rand::rngs::OsRng.fill_bytes(&mut token);
        let suffix: String = token.iter().map(|b| format!("{b:02x}")).collect();
        std::env::temp_dir().join(format!("flock-store-{suffix}"))
    }

    #[tokio::test]
    async fn put_then_remove_round_trip() {
        let dir = scratch_dir();
        let store = DiskStore::new(&dir).await.expect("create store");

        store
            .put("abc123.png", Bytes::from_static(b"not really a png"))
            .await
            .expect("put");
        let on_disk = tokio::fs::read(dir.join("abc123.png")).await.expect("read back");
        assert_eq!(on_disk, b"not really a png");

        store.remove("abc123.png").await.expect("remove");
        assert!(!dir.join("abc123.png").exists());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn remove_missing_file_is_a_no_op() {
        let dir = scratch_dir();
        let store = DiskStore::new(&dir).await.expect("create store");
        store.remove("never-existed.jpg").await.expect("remove absent");
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
