//! Normalization from raw manifest records into the product-info shape
//! the host platform's metadata hooks expect.

use crate::api::ManifestRecord;
use crate::config::UpdateManagerConfig;
use crate::license::{self, LicenseValidator};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Canonical product metadata derived from one [`ManifestRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInfo {
    pub name: String,
    pub slug: String,
    pub plugin: String,
    pub version: String,
    pub author: String,
    pub author_profile: String,
    pub requires: String,
    pub tested: String,
    pub last_updated: String,
    pub homepage: String,
    pub download_link: String,
    pub package: String,
    /// Only the non-empty sections of the record; an absent section has no
    /// key here rather than an empty value.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sections: BTreeMap<&'static str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_notice: Option<String>,
    /// Raw license tier from the manifest; consulted by the decision
    /// engine, not part of the host-facing payload.
    #[serde(skip)]
    pub license: String,
}

/// Convert a raw record into a [`ProductInfo`].
///
/// Pure: identical record, key and validator state yield an identical
/// result. Download and package links carry `key=<license key>` whenever a
/// non-empty key is configured; the upgrade notice is set exactly when the
/// tier is premium and the configured key does not validate for it.
pub fn normalize(
    record: &ManifestRecord,
    config: &UpdateManagerConfig,
    validator: &dyn LicenseValidator,
) -> ProductInfo {
    let mut sections = BTreeMap::new();
    for (key, text) in [
        ("description", &record.description),
        ("installation", &record.installation),
        ("faq", &record.faq),
        ("changelog", &record.changelog),
    ] {
        if !text.is_empty() {
            sections.insert(key, text.clone());
        }
    }

    let key = config.license_key();
    let download_link = augment_with_key(&record.download, key);
    let package = augment_with_key(&record.download, key);

    let upgrade_notice = if license::is_premium(&record.license)
        && !validator.is_valid(key, &record.license)
    {
        Some(format!(
            "Important: This plugin requires a valid {} {} license key to update.",
            config.brand,
            title_case(&record.license)
        ))
    } else {
        None
    };

    ProductInfo {
        name: record.title.clone(),
        slug: record.slug.clone(),
        plugin: record.plugin.clone(),
        version: record.version.clone(),
        author: record.author.clone(),
        author_profile: record.author_uri.clone(),
        requires: record.requires.clone(),
        tested: record.tested.clone(),
        last_updated: record.last_updated.clone(),
        homepage: record.uri.clone(),
        download_link,
        package,
        sections,
        upgrade_notice,
        license: record.license.clone(),
    }
}

/// Short display name used as the add-on sort key: the title with the
/// "Add On" suffix and the brand prefix stripped.
pub fn short_display_name(title: &str, brand_title_prefix: &str) -> String {
    title
        .replace("Add On", "")
        .replace(brand_title_prefix, "")
        .trim()
        .to_owned()
}

/// Append `key=<key>` to a link, replacing any existing `key` parameter.
/// Links that are not parseable URLs pass through untouched.
fn augment_with_key(link: &str, key: Option<&str>) -> String {
    let Some(key) = key else {
        return link.to_owned();
    };
    if link.is_empty() {
        return link.to_owned();
    }

    let Ok(mut url) = Url::parse(link) else {
        return link.to_owned();
    };

    let keep: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != "key")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.extend_pairs(&keep);
        pairs.append_pair("key", key);
    }

    url.to_string()
}

/// Uppercase the first letter of each whitespace-separated word.
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::StandaloneValidator;

    fn record() -> ManifestRecord {
        ManifestRecord {
            slug: "widget-pro".to_owned(),
            title: "Craftwork - Widget Pro Add On".to_owned(),
            version: "3.0".to_owned(),
            author: "Craftwork".to_owned(),
            author_uri: "https://www.craftwork.dev".to_owned(),
            uri: "https://www.craftwork.dev/add-ons/widget-pro/".to_owned(),
            download: "https://x/pkg.zip".to_owned(),
            description: "A widget.".to_owned(),
            license: "standard".to_owned(),
            plugin: "widget-pro/widget-pro.php".to_owned(),
            ..ManifestRecord::default()
        }
    }

    fn config_with_key(key: &str) -> UpdateManagerConfig {
        UpdateManagerConfig {
            license_key: Some(key.to_owned()),
            ..UpdateManagerConfig::default()
        }
    }

    #[test]
    fn links_pass_through_without_a_key() {
        let product = normalize(&record(), &UpdateManagerConfig::default(), &StandaloneValidator);

        assert_eq!(product.download_link, "https://x/pkg.zip");
        assert_eq!(product.package, "https://x/pkg.zip");
    }

    #[test]
    fn configured_key_is_appended_to_both_links() {
        let product = normalize(&record(), &config_with_key("ABC123"), &StandaloneValidator);

        assert_eq!(product.package, "https://x/pkg.zip?key=ABC123");
        assert_eq!(product.download_link, "https://x/pkg.zip?key=ABC123");
    }

    #[test]
    fn key_is_url_encoded_and_not_duplicated() {
        let mut record = record();
        record.download = "https://x/pkg.zip?key=old&channel=stable".to_owned();

        let product = normalize(&record, &config_with_key("a b+c"), &StandaloneValidator);

        assert_eq!(product.package, "https://x/pkg.zip?channel=stable&key=a+b%2Bc");
    }

    #[test]
    fn empty_key_leaves_links_alone() {
        let product = normalize(&record(), &config_with_key(""), &StandaloneValidator);
        assert_eq!(product.package, "https://x/pkg.zip");
    }

    #[test]
    fn normalize_is_idempotent() {
        let config = config_with_key("ABC123");
        let first = normalize(&record(), &config, &StandaloneValidator);
        let second = normalize(&record(), &config, &StandaloneValidator);
        assert_eq!(first, second);
    }

    #[test]
    fn only_non_empty_sections_are_present() {
        let mut record = record();
        record.changelog = "3.0: rewrite".to_owned();

        let product = normalize(&record, &UpdateManagerConfig::default(), &StandaloneValidator);

        assert_eq!(
            product.sections.keys().copied().collect::<Vec<_>>(),
            ["changelog", "description"]
        );
        assert!(!product.sections.contains_key("faq"));
        assert!(!product.sections.contains_key("installation"));
    }

    #[test]
    fn premium_without_valid_key_gets_an_upgrade_notice() {
        let product = normalize(&record(), &UpdateManagerConfig::default(), &StandaloneValidator);

        let notice = product.upgrade_notice.expect("notice expected");
        assert!(notice.contains("Standard"), "notice was: {notice}");
        assert!(notice.contains("Craftwork"));
    }

    #[test]
    fn non_premium_record_has_no_notice() {
        let mut record = record();
        record.license = "wordpress.org".to_owned();

        let product = normalize(&record, &UpdateManagerConfig::default(), &StandaloneValidator);
        assert_eq!(product.upgrade_notice, None);
    }

    #[test]
    fn name_keeps_the_full_title() {
        let product = normalize(&record(), &UpdateManagerConfig::default(), &StandaloneValidator);
        assert_eq!(product.name, "Craftwork - Widget Pro Add On");
    }

    #[test]
    fn absent_fields_become_empty_strings() {
        let record = ManifestRecord {
            slug: "bare".to_owned(),
            ..ManifestRecord::default()
        };

        let product = normalize(&record, &UpdateManagerConfig::default(), &StandaloneValidator);

        assert_eq!(product.version, "");
        assert_eq!(product.homepage, "");
        assert_eq!(product.download_link, "");
        assert!(product.sections.is_empty());
    }

    #[test]
    fn short_name_strips_brand_and_suffix() {
        let config = UpdateManagerConfig::default();
        assert_eq!(
            short_display_name("Craftwork - Widget Pro Add On", &config.brand_title_prefix()),
            "Widget Pro"
        );
        assert_eq!(
            short_display_name("Standalone Tool", &config.brand_title_prefix()),
            "Standalone Tool"
        );
    }
}
