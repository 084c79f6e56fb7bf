//! JSON documents on disk.

use inkwell_core::NormalizedScript;
use inkwell_error::{InkwellResult, JsonError, StorageError, StorageErrorKind};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

fn temp_path(path: &Path) -> Option<PathBuf> {
    let mut name = OsString::from(".");
    name.push(path.file_name()?);
    name.push(".tmp");
    Some(path.with_file_name(name))
}

/// Write `data` to `path` so that readers see either the old file or the
/// complete new one.
///
/// Parent directories are created. The bytes go to a hidden sibling temp
/// file which is then renamed over `path`; on failure the temp file is
/// removed and `path` is untouched.
#[instrument(skip_all, fields(path = %path.as_ref().display(), size = data.len()))]
pub async fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
    let path = path.as_ref();
    let temp = temp_path(path).ok_or_else(|| {
        StorageError::new(StorageErrorKind::InvalidPath(format!(
            "{}: no file name",
            path.display()
        )))
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    if let Err(e) = tokio::fs::write(&temp, data).await {
        discard(&temp).await;
        return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp.display(),
            e
        ))));
    }

    if let Err(e) = tokio::fs::rename(&temp, path).await {
        discard(&temp).await;
        return Err(StorageError::new(StorageErrorKind::Rename(format!(
            "{} to {}: {}",
            temp.display(),
            path.display(),
            e
        ))));
    }

    info!("Wrote file");
    Ok(())
}

async fn discard(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => debug!(path = %temp.display(), "Removed temp file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %temp.display(), error = %e, "Could not remove temp file"),
    }
}

/// Serialize `value` as pretty JSON and write it atomically.
pub async fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> InkwellResult<()> {
    let mut json = serde_json::to_vec_pretty(value).map_err(|e| JsonError::new(e.to_string()))?;
    json.push(b'\n');
    write_atomic(path, &json).await?;
    Ok(())
}

/// Read and deserialize a JSON document.
pub async fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> InkwellResult<T> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    })?;
    let value = serde_json::from_str(&text)
        .map_err(|e| JsonError::new(format!("{}: {}", path.display(), e)))?;
    Ok(value)
}

/// Read a normalized script.
pub async fn read_script(path: impl AsRef<Path>) -> InkwellResult<NormalizedScript> {
    let script: NormalizedScript = read_json(path).await?;
    debug!(pages = script.pages.len(), "Loaded script");
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        assert_eq!(
            temp_path(Path::new("out/parsed/storyboard.json")),
            Some(PathBuf::from("out/parsed/.storyboard.json.tmp"))
        );
        assert_eq!(temp_path(Path::new("/")), None);
    }
}
