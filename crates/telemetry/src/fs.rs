//! Filesystem predicates used by the file sink and the bootstrap.

use std::path::Path;

/// True when `path` exists and is a regular file.
pub async fn is_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Could not stat path while checking for a file");
            false
        }
    }
}

/// True when `path` exists and is a directory.
pub async fn is_directory(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.is_dir(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Could not stat path while checking for a directory");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_is_not_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.log");
        std::fs::write(&file, "x").unwrap();

        assert!(is_file(&file).await);
        assert!(!is_directory(&file).await);
    }

    #[tokio::test]
    async fn directory_is_not_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_directory(dir.path()).await);
        assert!(!is_file(dir.path()).await);
    }

    #[tokio::test]
    async fn missing_path_is_neither() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(!is_file(&missing).await);
        assert!(!is_directory(&missing).await);
    }
}
