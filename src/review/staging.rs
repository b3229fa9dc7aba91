//! Transient on-disk copies of uploaded files.
//!
//! Each review gets its own `<root>/<uuid>` directory so concurrent requests
//! carrying the same file name never share a path.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub async fn create(root: &Path) -> io::Result<Self> {
        let dir = root.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write `contents` under `name`, which must already be a bare file name.
    pub async fn stage(&self, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }

    pub async fn discard(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    /// Remove the directory and anything a failed run left in it.
    pub async fn cleanup(self) {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "Failed to remove staging directory"
                );
            }
        }
    }
}

/// Reduce a client-supplied name to its final path component.
///
/// Returns `None` when nothing usable remains (`""`, `"."`, `".."`, `"dir/"`).
pub fn sanitize_file_name(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next()?;
    match base {
        "" | "." | ".." => None,
        _ => Some(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_file_name("main.py"), Some("main.py"));
        assert_eq!(sanitize_file_name(".env.example"), Some(".env.example"));
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("src/lib.rs"), Some("lib.rs"));
        assert_eq!(sanitize_file_name("../../etc/passwd"), Some("passwd"));
        assert_eq!(sanitize_file_name("C:\\Users\\me\\app.js"), Some("app.js"));
    }

    #[test]
    fn sanitize_rejects_empty_results() {
        assert_eq!(sanitize_file_name(""), None);
        assert_eq!(sanitize_file_name(".."), None);
        assert_eq!(sanitize_file_name("dir/"), None);
        assert_eq!(sanitize_file_name("a/."), None);
    }

    #[tokio::test]
    async fn stage_discard_cleanup() {
        let root = TempDir::new().unwrap();
        let staging = StagingArea::create(root.path()).await.unwrap();
        assert!(staging.path().starts_with(root.path()));

        let path = staging.stage("a.txt", b"hello").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");

        staging.discard(&path).await.unwrap();
        assert!(!path.exists());

        let leftover = staging.stage("b.txt", b"left behind").await.unwrap();
        let dir = staging.path().to_path_buf();
        staging.cleanup().await;
        assert!(!leftover.exists());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn separate_areas_do_not_collide() {
        let root = TempDir::new().unwrap();
        let first = StagingArea::create(root.path()).await.unwrap();
        let second = StagingArea::create(root.path()).await.unwrap();

        let a = first.stage("same.py", b"one").await.unwrap();
        let b = second.stage("same.py", b"two").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(std::fs::read(&a).unwrap(), b"one");
        assert_eq!(std::fs::read(&b).unwrap(), b"two");
    }
}
