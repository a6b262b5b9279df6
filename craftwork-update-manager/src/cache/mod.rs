mod store;
pub use store::*;

use crate::api::{Category, ManifestFetcher, ManifestRecord};
use crate::config::UpdateManagerConfig;
use crate::diagnostics::DiagnosticsSender;
use crate::product::short_display_name;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds a cached manifest stays fresh.
pub const MANIFEST_TTL_SECS: u64 = 86_400;

/// Time source for TTL decisions, injectable so tests can move the clock.
pub trait Clock {
    fn unix_now(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

/// Per-category manifest cache with a time-based refresh policy.
///
/// Each category has its own entry and its own TTL clock; refreshing one
/// never touches the other.
pub struct ManifestCache<F, S, C = SystemClock> {
    fetcher: F,
    store: S,
    clock: C,
    brand_title_prefix: String,
    diagnostics: Option<DiagnosticsSender>,
}

impl<F, S, C> ManifestCache<F, S, C>
where
    F: ManifestFetcher,
    S: CacheStore,
    C: Clock,
{
    pub fn new(fetcher: F, store: S, clock: C, config: &UpdateManagerConfig) -> Self {
        Self {
            fetcher,
            store,
            clock,
            brand_title_prefix: config.brand_title_prefix(),
            diagnostics: None,
        }
    }

    /// Report fetch failures through `sender` instead of dropping them.
    pub fn with_diagnostics(mut self, sender: DiagnosticsSender) -> Self {
        self.diagnostics = Some(sender);
        self
    }

    /// Return the category's manifest, refreshing it first when the cache
    /// is empty, `force` is set, or the entry is older than
    /// [`MANIFEST_TTL_SECS`].
    ///
    /// A failed refresh keeps the previous records and reports the error
    /// through the diagnostics sender; the caller always gets a manifest,
    /// possibly stale, possibly empty. The fetch timestamp advances on
    /// every attempt, so once a manifest exists an unreachable server is
    /// retried at most once per TTL window.
    #[tracing::instrument(skip(self))]
    pub async fn get_manifest(&self, category: Category, force: bool) -> Vec<ManifestRecord> {
        let mut entry = self.store.load(category).unwrap_or_default();
        let now = self.clock.unix_now();

        let due =
            entry.records.is_empty() || force || now > entry.fetched_at + MANIFEST_TTL_SECS;
        if !due {
            return entry.records;
        }

        match self.fetcher.fetch_manifest(category).await {
            Ok(mut records) => {
                if category == Category::Addons {
                    sort_addons(&mut records, &self.brand_title_prefix);
                }

                tracing::debug!("refreshed {} manifest: {} records", category, records.len());
                entry.records = records;
            }
            Err(error) => {
                tracing::warn!("serving stale {} manifest: {}", category, error);
                if let Some(diagnostics) = &self.diagnostics {
                    diagnostics.send_fetch_problem(category, error);
                }
            }
        }

        entry.fetched_at = now;
        self.store.store(category, &entry);

        entry.records
    }
}

/// Sort ascending, case-insensitive and stable, by short display name.
fn sort_addons(records: &mut [ManifestRecord], brand_title_prefix: &str) {
    records.sort_by_cached_key(|record| {
        short_display_name(&record.title, brand_title_prefix).to_lowercase()
    });
}
