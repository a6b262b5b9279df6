//! Facade wiring configuration, fetcher and cache into the query surface
//! the host platform's hook points consume.

use crate::api::{Category, LicenseServerClient, ManifestFetcher, ManifestRecord};
use crate::cache::{CacheStore, Clock, ManifestCache, MemoryStore, SystemClock};
use crate::config::UpdateManagerConfig;
use crate::decision::{self, InstalledProduct, ThemeUpdate, UpdateCheckReport};
use crate::diagnostics::DiagnosticsSender;
use crate::error::FetchError;
use crate::license::{LicenseValidator, StandaloneValidator};
use crate::product::{ProductInfo, normalize};
use crate::translations::{self, TranslationProject};

pub struct UpdateManager<F, S, C = SystemClock, V = StandaloneValidator> {
    config: UpdateManagerConfig,
    cache: ManifestCache<F, S, C>,
    validator: V,
}

impl UpdateManager<LicenseServerClient, MemoryStore> {
    /// Default stack: real license server client, process-local store,
    /// system clock, stand-alone (always-invalid) license validator.
    pub fn new(config: UpdateManagerConfig) -> Result<Self, FetchError> {
        let fetcher = LicenseServerClient::new(&config)?;

        Ok(Self::with_parts(
            config,
            fetcher,
            MemoryStore::new(),
            SystemClock,
            StandaloneValidator,
        ))
    }
}

impl<F, S, C, V> UpdateManager<F, S, C, V>
where
    F: ManifestFetcher,
    S: CacheStore,
    C: Clock,
    V: LicenseValidator,
{
    pub fn with_parts(
        config: UpdateManagerConfig,
        fetcher: F,
        store: S,
        clock: C,
        validator: V,
    ) -> Self {
        let cache = ManifestCache::new(fetcher, store, clock, &config);

        Self {
            config,
            cache,
            validator,
        }
    }

    /// Report manifest fetch failures through `sender`.
    pub fn with_diagnostics(mut self, sender: DiagnosticsSender) -> Self {
        self.cache = self.cache.with_diagnostics(sender);
        self
    }

    pub fn config(&self) -> &UpdateManagerConfig {
        &self.config
    }

    /// Cached add-on manifest, alphabetized by short display name.
    pub async fn addons(&self, force: bool) -> Vec<ManifestRecord> {
        self.cache.get_manifest(Category::Addons, force).await
    }

    /// Cached theme manifest, in server order.
    pub async fn themes(&self, force: bool) -> Vec<ManifestRecord> {
        self.cache.get_manifest(Category::Themes, force).await
    }

    pub async fn addon_by_slug(&self, slug: &str) -> Option<ManifestRecord> {
        self.addons(false)
            .await
            .into_iter()
            .find(|record| record.slug == slug)
    }

    /// Metadata payload for the host's "plugin information" hook. `None`
    /// for unknown slugs and for catalog-hosted records, which the host
    /// resolves through the public catalog instead.
    pub async fn plugin_information(&self, slug: &str) -> Option<ProductInfo> {
        if slug.is_empty() {
            return None;
        }

        let record = self.addon_by_slug(slug).await?;
        if decision::is_externally_managed(&record) {
            return None;
        }

        Some(normalize(&record, &self.config, &self.validator))
    }

    /// One update-check pass over all installed plugins.
    #[tracing::instrument(skip_all, fields(installed = installed.len(), force))]
    pub async fn check_plugin_updates(
        &self,
        installed: &[InstalledProduct],
        force: bool,
    ) -> UpdateCheckReport {
        let records = self.addons(force).await;

        decision::check_plugins(&records, installed, &self.config, &self.validator)
    }

    /// One update-check pass against the single active theme.
    #[tracing::instrument(skip_all, fields(force))]
    pub async fn check_theme_updates(
        &self,
        active_theme: Option<&InstalledProduct>,
        force: bool,
    ) -> Option<ThemeUpdate> {
        let records = self.themes(force).await;

        decision::check_themes(&records, active_theme, &self.config, &self.validator)
    }

    /// Translation-feed registrations for every active product in the
    /// combined add-on and theme manifests.
    pub async fn translation_projects(
        &self,
        installed_plugins: &[InstalledProduct],
        active_theme: Option<&InstalledProduct>,
    ) -> Vec<TranslationProject> {
        let (addons, themes) = futures::join!(self.addons(false), self.themes(false));

        translations::translation_projects(
            &addons,
            &themes,
            installed_plugins,
            active_theme,
            &self.config.translate_host,
        )
    }
}
