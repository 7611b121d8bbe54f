use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::types::DocIndex;

pub const DEFAULT_CACHE_PATH: &str = "kluster_docs.json";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to serialize doc index: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache file {path} is not a valid doc index: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// What a successful cache write produced.
#[derive(Debug, Clone)]
pub struct CacheWrite {
    pub bytes: usize,
    /// blake3 hex digest of the written bytes.
    pub digest: String,
}

static WRITE_LOCK: Mutex<()> = Mutex::const_new(());

/// Temp file used for the atomic replace: `.<name>.tmp` beside the target.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_CACHE_PATH.to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write `bytes` to `path` and flush them to disk before returning.
async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

/// Serialize `index` and replace the cache file wholesale.
///
/// The bytes go to a temp file first, are synced, and are renamed over the
/// target, so a failed write leaves the previous cache untouched.
pub async fn write_index(path: &Path, index: &DocIndex) -> Result<CacheWrite, CacheError> {
    let mut bytes = serde_json::to_vec_pretty(index).map_err(CacheError::Serialize)?;
    bytes.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| CacheError::Write {
                path: path.to_path_buf(),
                source,
            })?;
    }

    // Writers in this process share one temp name per target; take turns.
    let _writing = WRITE_LOCK.lock().await;

    let tmp = temp_path(path);
    let result = match write_synced(&tmp, &bytes).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };

    if let Err(source) = result {
        if let Err(e) = tokio::fs::remove_file(&tmp).await {
            debug!(path = %tmp.display(), "temp cache cleanup skipped: {}", e);
        }
        return Err(CacheError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    let digest = blake3::hash(&bytes).to_hex().to_string();
    debug!(path = %path.display(), bytes = bytes.len(), %digest, "cache written");
    Ok(CacheWrite {
        bytes: bytes.len(),
        digest,
    })
}

/// Load the cache file. A missing file is an empty index.
pub async fn load_index(path: &Path) -> Result<DocIndex, CacheError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "doc cache not found, no context available");
            return Ok(DocIndex::default());
        }
        Err(source) => {
            return Err(CacheError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| CacheError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
