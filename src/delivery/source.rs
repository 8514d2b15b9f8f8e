//! Filesystem access used by file delivery

use std::future::Future;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::io::AsyncRead;

/// Metadata recorded before streaming starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub size: u64,
    /// Last modification time, when the platform reports one
    pub modified: Option<SystemTime>,
}

/// Where file bytes come from
pub trait FileSource: Send + Sync {
    type Reader: AsyncRead + Unpin + Send;

    fn stat(&self, path: &Path) -> impl Future<Output = io::Result<FileMeta>> + Send;

    fn open(&self, path: &Path) -> impl Future<Output = io::Result<Self::Reader>> + Send;
}

/// Local filesystem through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSource for LocalFs {
    type Reader = tokio::fs::File;

    async fn stat(&self, path: &Path) -> io::Result<FileMeta> {
        let metadata = tokio::fs::metadata(path).await?;
        if metadata.is_dir() {
            return Err(io::Error::new(io::ErrorKind::IsADirectory, "is a directory"));
        }
        Ok(FileMeta {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    async fn open(&self, path: &Path) -> io::Result<Self::Reader> {
        tokio::fs::File::open(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stat_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world\n").unwrap();

        let meta = LocalFs.stat(&path).await.unwrap();
        assert_eq!(meta.size, 12);
        assert!(meta.modified.is_some());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = LocalFs.stat(Path::new("/no/such/file")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(LocalFs.open(Path::new("/no/such/file")).await.is_err());
    }

    #[tokio::test]
    async fn test_stat_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = LocalFs.stat(dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::IsADirectory);
    }
}
