use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;

use super::LocalReader;

/// Reads files with `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

#[async_trait]
impl LocalReader for FsReader {
    async fn read_file(&self, path: &Path) -> std::io::Result<Bytes> {
        let data = tokio::fs::read(path).await?;
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_raw_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.bin");
        fs::write(&path, [0u8, 159, 146, 150]).unwrap();

        let content = FsReader.read_file(&path).await.unwrap();
        assert_eq!(content.as_ref(), &[0u8, 159, 146, 150]);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = FsReader
            .read_file(&temp_dir.path().join("missing"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
