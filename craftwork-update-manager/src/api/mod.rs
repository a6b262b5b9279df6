mod models;
pub use models::*;

use crate::config::UpdateManagerConfig;
use crate::error::FetchError;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Capability seam over the license server, so the cache can be driven by
/// a scripted fetcher in tests or by an alternate transport in a host.
#[allow(async_fn_in_trait)]
pub trait ManifestFetcher {
    async fn fetch_manifest(&self, category: Category) -> Result<Vec<ManifestRecord>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct LicenseServerClient {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl LicenseServerClient {
    /// Prepare the API client.
    pub fn new(config: &UpdateManagerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .redirect(Policy::limited(10))
            .hickory_dns(true)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self {
            client,
            base: config.license_server.clone(),
            timeout: config.timeout,
        })
    }

    /// `<base>/<category>/` with the trailing slash the server expects.
    fn category_url(&self, category: Category) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .unwrap()
            .pop_if_empty()
            .extend([category.as_str(), ""]);

        url
    }
}

impl ManifestFetcher for LicenseServerClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_manifest(&self, category: Category) -> Result<Vec<ManifestRecord>, FetchError> {
        let response = self
            .client
            .get(self.category_url(category))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Http(status));
        }

        let data = response.bytes().await.map_err(FetchError::Network)?;

        serde_json::from_slice(&data).map_err(FetchError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_urls_keep_the_base_path() {
        let config = UpdateManagerConfig::default();
        let client = LicenseServerClient::new(&config).unwrap();

        assert_eq!(
            client.category_url(Category::Addons).as_str(),
            "https://license.craftwork.dev/v2/addons/"
        );
        assert_eq!(
            client.category_url(Category::Themes).as_str(),
            "https://license.craftwork.dev/v2/themes/"
        );
    }

    #[test]
    fn category_urls_tolerate_a_base_without_trailing_slash() {
        let config = UpdateManagerConfig {
            license_server: Url::parse("https://license.craftwork.dev/v2").unwrap(),
            ..UpdateManagerConfig::default()
        };
        let client = LicenseServerClient::new(&config).unwrap();

        assert_eq!(
            client.category_url(Category::Addons).as_str(),
            "https://license.craftwork.dev/v2/addons/"
        );
    }

    #[test]
    fn non_array_body_is_a_parse_error() {
        let err = serde_json::from_slice::<Vec<ManifestRecord>>(br#"{"error":"nope"}"#)
            .map_err(FetchError::from)
            .unwrap_err();

        assert!(matches!(err, FetchError::Parse(_)));
    }
}
