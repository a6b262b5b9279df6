use std::time::Duration;
use url::Url;

/// Default license server; override before constructing any component.
pub const DEFAULT_LICENSE_SERVER: &str = "https://license.craftwork.dev/v2/";

/// Host of the translation aggregation service.
pub const DEFAULT_TRANSLATE_HOST: &str = "translate.craftwork.dev";

/// Base URL add-on icons are resolved under, as `<base>/<slug>.png`.
pub const DEFAULT_ICON_BASE: &str = "https://www.craftwork.dev/images/add-ons/";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_BRAND: &str = "Craftwork";

/// Process-wide configuration, resolved once at startup and injected into
/// every component that needs it. Nothing in this crate reads ambient
/// state.
#[derive(Debug, Clone)]
pub struct UpdateManagerConfig {
    pub license_server: Url,
    pub timeout: Duration,
    /// License key forwarded on download links; externally stored.
    pub license_key: Option<String>,
    /// Brand name used in product titles and upgrade notices.
    pub brand: String,
    pub translate_host: String,
    /// `None` disables icon resolution for update entries.
    pub icon_base: Option<Url>,
}

impl Default for UpdateManagerConfig {
    fn default() -> Self {
        Self {
            license_server: Url::parse(DEFAULT_LICENSE_SERVER).unwrap(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            license_key: None,
            brand: DEFAULT_BRAND.to_owned(),
            translate_host: DEFAULT_TRANSLATE_HOST.to_owned(),
            icon_base: Some(Url::parse(DEFAULT_ICON_BASE).unwrap()),
        }
    }
}

impl UpdateManagerConfig {
    /// The configured key, treating an empty string as unset.
    pub fn license_key(&self) -> Option<&str> {
        self.license_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Prefix stripped from product titles when deriving the short display
    /// name used for sort ordering.
    pub fn brand_title_prefix(&self) -> String {
        format!("{} - ", self.brand)
    }

    pub fn addon_icon_url(&self, slug: &str) -> Option<String> {
        if slug.is_empty() {
            return None;
        }

        let mut url = self.icon_base.clone()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push(&format!("{slug}.png"));

        Some(url.to_string())
    }
}
