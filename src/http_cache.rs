use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{
    ACCEPT, ETAG, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CACHE_VERSION: u32 = 2;
const CACHE_DIR: &str = "mlb_watchability";
const CACHE_FILE: &str = "http_cache.json";
const DEFAULT_FRESH_SECS: u64 = 60;
// Schedule URLs are keyed by date, so old days are dropped instead of piling up.
const RETAIN_SECS: u64 = 14 * 24 * 60 * 60;

static CACHE: Mutex<Option<StatsCache>> = Mutex::new(None);

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StatsCache {
    version: u32,
    entries: HashMap<String, CachedResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

impl CachedResponse {
    fn age_secs(&self, now: u64) -> u64 {
        now.saturating_sub(self.fetched_at)
    }
}

/// GET a JSON document from the stats API through the on-disk cache.
///
/// Entries younger than `HTTP_CACHE_FRESH_SECS` (default 60) are served without a request.
/// Older ones are revalidated with ETag / Last-Modified, and a 304 reuses the cached body.
pub fn fetch_json_cached(client: &Client, url: &str) -> Result<String> {
    let now = now_secs();
    let cached = with_cache(|cache| cache.entries.get(url).cloned());

    if let Some(entry) = cached.as_ref()
        && entry.age_secs(now) < fresh_secs()
    {
        debug!(url, age = entry.age_secs(now), "serving stats api response from cache");
        return Ok(entry.body.clone());
    }

    let mut req = client.get(url).header(ACCEPT, "application/json");
    if let Some(entry) = cached.as_ref() {
        if let Some(etag) = entry.etag.as_deref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_deref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        let Some(mut entry) = cached else {
            return Err(anyhow!("received 304 without cache body for {url}"));
        };
        debug!(url, "stats api returned 304, using cached body");
        entry.fetched_at = now;
        let body = entry.body.clone();
        store_entry(url, entry, now);
        return Ok(body);
    }

    let header_text = |name: HeaderName| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let etag = header_text(ETAG);
    let last_modified = header_text(LAST_MODIFIED);

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status} from {url}: {body}"));
    }

    store_entry(
        url,
        CachedResponse {
            body: body.clone(),
            etag,
            last_modified,
            fetched_at: now,
        },
        now,
    );
    Ok(body)
}

/// Per-user cache directory: `$XDG_CACHE_HOME/mlb_watchability`, else `~/.cache/mlb_watchability`.
pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn with_cache<T>(action: impl FnOnce(&mut StatsCache) -> T) -> T {
    let mut guard = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    let cache = guard.get_or_insert_with(load_cache_file);
    action(cache)
}

fn store_entry(url: &str, entry: CachedResponse, now: u64) {
    with_cache(|cache| {
        cache.version = CACHE_VERSION;
        cache.entries.insert(url.to_string(), entry);
        prune_stale(&mut cache.entries, now);
        if let Err(err) = save_cache_file(cache) {
            debug!("http cache not persisted: {err:#}");
        }
    });
}

fn prune_stale(entries: &mut HashMap<String, CachedResponse>, now: u64) {
    entries.retain(|_, entry| entry.age_secs(now) <= RETAIN_SECS);
}

fn fresh_secs() -> u64 {
    std::env::var("HTTP_CACHE_FRESH_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(DEFAULT_FRESH_SECS)
}

fn load_cache_file() -> StatsCache {
    let Some(path) = cache_path() else {
        return StatsCache::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return StatsCache::default();
    };
    match serde_json::from_str::<StatsCache>(&raw) {
        Ok(cache) if cache.version == CACHE_VERSION => cache,
        _ => StatsCache::default(),
    }
}

fn save_cache_file(cache: &StatsCache) -> Result<()> {
    let Some(path) = cache_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("create http cache dir")?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, &path).context("swap http cache")?;
    Ok(())
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
