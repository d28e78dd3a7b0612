//! On-disk cache of raw API payloads.
//!
//! Each design list is stored verbatim under the data directory. How long a
//! file stays valid depends on the [CachePolicy]: some lists are reused for as
//! long as the file exists, others are written into a half-day bucket whose
//! file name embeds the date and AM/PM, so rolling into a new bucket misses the
//! cache and triggers a download without any timestamp bookkeeping.
//!
//! A failed download is returned to the caller as-is; nothing is retried.
//! Files are replaced through `write_atomic`, so a crash mid-write never
//! leaves a truncated payload behind to be reused.
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::api::{DesignKind, Fetcher};
use super::errors::PssResult;
use crate::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Reuse `<stem>-raw.xml` whenever it exists.
    ReuseIfExists,
    /// One file per calendar day and half-day: `<stem>-YYYYMMDD-AM.xml`.
    HalfDay,
}

impl CachePolicy {
    pub fn for_kind(kind: DesignKind) -> Self {
        match kind {
            DesignKind::Items => CachePolicy::HalfDay,
            _ => CachePolicy::ReuseIfExists,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawCache {
    dir: PathBuf,
}

impl RawCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Bucket label for a point in time, e.g. `20240131-PM`.
    pub fn bucket_label(now: &DateTime<Local>) -> String {
        now.format("%Y%m%d-%p").to_string()
    }

    pub fn path_for(&self, stem: &str, policy: CachePolicy, now: &DateTime<Local>) -> PathBuf {
        match policy {
            CachePolicy::ReuseIfExists => self.dir.join(format!("{}-raw.xml", stem)),
            CachePolicy::HalfDay => self
                .dir
                .join(format!("{}-{}.xml", stem, Self::bucket_label(now))),
        }
    }

    /// Cached payload for `stem`, downloading from `url` on a miss or when
    /// `refresh` is set.
    pub async fn load<F: Fetcher>(
        &self,
        fetcher: &F,
        stem: &str,
        url: &str,
        policy: CachePolicy,
        refresh: bool,
    ) -> PssResult<String> {
        self.load_at(fetcher, stem, url, policy, refresh, &Local::now())
            .await
    }

    pub async fn load_at<F: Fetcher>(
        &self,
        fetcher: &F,
        stem: &str,
        url: &str,
        policy: CachePolicy,
        refresh: bool,
        now: &DateTime<Local>,
    ) -> PssResult<String> {
        let path = self.path_for(stem, policy, now);
        if !refresh {
            match fs::read_to_string(&path).await {
                Ok(raw) => {
                    debug!("cache hit {}", path.display());
                    metrics::inc_cache_hits();
                    return Ok(raw);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        let raw = fetcher.fetch(url).await?;
        metrics::inc_cache_fetches();
        write_atomic(&path, &raw).await?;
        info!("cached {} ({} bytes)", path.display(), raw.len());

        if policy == CachePolicy::HalfDay {
            self.prune_buckets(stem, &path).await;
        }
        Ok(raw)
    }

    /// Remove older half-day files for `stem`, keeping `keep`.
    async fn prune_buckets(&self, stem: &str, keep: &Path) {
        let prefix = format!("{}-", stem);
        let raw_name = format!("{}-raw.xml", stem);
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot list {}: {}", self.dir.display(), e);
                return;
            }
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if path == keep || name == raw_name {
                continue;
            }
            if name.starts_with(&prefix) && name.ends_with(".xml") {
                match fs::remove_file(&path).await {
                    Ok(()) => debug!("pruned stale bucket {}", name),
                    Err(e) => warn!("failed to prune {}: {}", name, e),
                }
            }
        }
    }
}

/// Replace `path` with `contents` by writing a hidden sibling and renaming
/// it into place. Each call gets its own temporary name, so concurrent
/// writers of the same file do not clobber each other's partial output.
pub(crate) async fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> PssResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = dir.join(format!(".{}.tmp-{}", name, uuid::Uuid::new_v4().simple()));
    fs::create_dir_all(dir).await?;

    let written = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(contents.as_ref()).await?;
        file.flush().await?;
        file.sync_all().await?;
        fs::rename(&tmp, path).await
    }
    .await;
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp).await {
            debug!("leftover {}: {}", tmp.display(), cleanup);
        }
        return Err(e.into());
    }
    Ok(())
}
