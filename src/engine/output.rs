use std::{
    ffi::OsString,
    future::Future,
    io,
    path::{Path, PathBuf},
};

use tokio::fs;

use super::errors::GenerationError;

/// Picks the lexicographically last entry of `dir`, the tool names its files so
/// that the newest sorts last.
pub async fn select_output(dir: &Path) -> io::Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir).await?;
    let mut latest: Option<OsString> = None;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if latest.as_ref().map_or(true, |current| name > *current) {
            latest = Some(name);
        }
    }

    Ok(latest.map(|name| dir.join(name)))
}

/// Reads the selected output and deletes it. A failed delete is only logged,
/// the image has already been read at that point.
pub async fn take_output(dir: &Path) -> Result<Vec<u8>, GenerationError> {
    take_output_with(dir, |path| async move { fs::remove_file(path).await }).await
}

async fn take_output_with<F, Fut>(dir: &Path, remove: F) -> Result<Vec<u8>, GenerationError>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let Some(path) = select_output(dir).await? else {
        return Err(GenerationError::NoOutputProduced {
            dir: dir.to_path_buf(),
        });
    };

    tracing::debug!("reading generated image {}", path.display());
    let bytes = fs::read(&path).await?;

    if let Err(e) = remove(path.clone()).await {
        tracing::warn!("failed to remove {}: {}", path.display(), e);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn selects_lexicographic_last_and_removes_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["b.png", "c.png", "a.png"] {
            std::fs::write(dir.path().join(name), name).expect("write");
        }

        let selected = select_output(dir.path()).await.expect("select");
        assert_eq!(selected, Some(dir.path().join("c.png")));

        let bytes = take_output(dir.path()).await.expect("take");
        assert_eq!(bytes, b"c.png");
        assert!(!dir.path().join("c.png").exists());
        assert!(dir.path().join("a.png").exists());
        assert!(dir.path().join("b.png").exists());
    }

    #[tokio::test]
    async fn failed_delete_still_returns_the_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("out.png"), "pixels").expect("write");

        let bytes = take_output_with(dir.path(), |_| async {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"))
        })
        .await
        .expect("take");

        assert_eq!(bytes, b"pixels");
        assert!(dir.path().join("out.png").exists());
    }

    #[tokio::test]
    async fn empty_directory_is_no_output() {
        let dir = tempfile::tempdir().expect("tempdir");

        assert_eq!(select_output(dir.path()).await.expect("select"), None);
        assert!(matches!(
            take_output(dir.path()).await,
            Err(GenerationError::NoOutputProduced { .. })
        ));
    }

    #[tokio::test]
    async fn missing_directory_is_an_io_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope");

        assert!(matches!(
            take_output(&missing).await,
            Err(GenerationError::IoFailure(_))
        ));
    }
}
