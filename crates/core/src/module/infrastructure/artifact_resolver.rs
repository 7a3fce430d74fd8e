use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::ARTIFACT_CACHE_DIR_NAME;

#[derive(Error, Debug)]
pub enum ArtifactResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write artifact to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("artifact resolution task did not complete: {0}")]
    Task(#[source] tokio::task::JoinError),
}

/// A file a processing module needs at load time (model weights, native
/// library, ...) and where to get it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// File name inside the cache or bundled directory.
    pub name: String,
    pub url: String,
    /// Pre-packaged location checked after the cache, before downloading.
    #[serde(default)]
    pub bundled_dir: Option<PathBuf>,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Finds module artifacts on disk, downloading them into the cache when
/// neither the cache nor the bundled directory has them.
///
/// Resolution order:
/// 1. Cache directory
/// 2. The artifact's bundled directory (development / pre-packaged installs)
/// 3. Download from the artifact URL into the cache
#[derive(Clone)]
pub struct ArtifactResolver {
    cache_dir: PathBuf,
    progress: Option<ProgressFn>,
}

impl ArtifactResolver {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            progress: None,
        }
    }

    /// Resolver rooted at the platform cache directory.
    pub fn with_default_cache() -> Result<Self, ArtifactResolveError> {
        Ok(Self::new(artifact_cache_dir()?))
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Runs resolution on the blocking pool so disk probes and downloads
    /// never stall the async executor.
    pub async fn resolve(&self, spec: &ArtifactSpec) -> Result<PathBuf, ArtifactResolveError> {
        let resolver = self.clone();
        let spec = spec.clone();
        tokio::task::spawn_blocking(move || resolver.resolve_blocking(&spec))
            .await
            .map_err(ArtifactResolveError::Task)?
    }

    pub fn resolve_blocking(&self, spec: &ArtifactSpec) -> Result<PathBuf, ArtifactResolveError> {
        let cached_path = self.cache_dir.join(&spec.name);
        if cached_path.exists() {
            log::debug!("Artifact {} found in cache", spec.name);
            return Ok(cached_path);
        }

        if let Some(dir) = &spec.bundled_dir {
            let bundled_path = dir.join(&spec.name);
            if bundled_path.exists() {
                log::debug!("Artifact {} found in bundled dir {}", spec.name, dir.display());
                return Ok(bundled_path);
            }
        }

        log::info!("Downloading artifact {} from {}", spec.name, spec.url);
        fs::create_dir_all(&self.cache_dir).map_err(ArtifactResolveError::CacheDir)?;
        download(&spec.url, &cached_path, self.progress.as_ref())?;
        Ok(cached_path)
    }
}

/// Platform-specific artifact cache directory.
///
/// - macOS: `~/Library/Application Support/UltraFace/models/`
/// - Linux: `$XDG_CACHE_HOME/UltraFace/models/` or `~/.cache/UltraFace/models/`
/// - Windows: `%LOCALAPPDATA%/UltraFace/models/`
pub fn artifact_cache_dir() -> Result<PathBuf, ArtifactResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join(ARTIFACT_CACHE_DIR_NAME).join("models"))
            .ok_or(ArtifactResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join(ARTIFACT_CACHE_DIR_NAME).join("models"))
            .ok_or(ArtifactResolveError::NoCacheDir)
    }
}

fn download(
    url: &str,
    dest: &Path,
    progress: Option<&ProgressFn>,
) -> Result<(), ArtifactResolveError> {
    let temp_path = dest.with_extension("part");

    let result = download_inner(url, dest, &temp_path, progress);

    // Clean up .part file on any error
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn download_inner(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<&ProgressFn>,
) -> Result<(), ArtifactResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ArtifactResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let write_err = |e| ArtifactResolveError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    };

    let mut file = fs::File::create(temp_path).map_err(write_err)?;

    let mut reader = response;
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = reader.read(&mut buf).map_err(write_err)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err)?;
        downloaded += n as u64;
        if let Some(cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|e| ArtifactResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
