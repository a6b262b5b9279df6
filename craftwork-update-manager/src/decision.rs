//! Update decision engine: classify each manifest product against the
//! locally installed products and assemble the payloads the host's update
//! hooks expect.

use crate::api::ManifestRecord;
use crate::config::UpdateManagerConfig;
use crate::license::LicenseValidator;
use crate::product::{ProductInfo, normalize};
use crate::version;
use serde::Serialize;
use std::cmp::Ordering;

/// License value the public catalog uses for records this system must not
/// manage; such products update through the catalog instead.
pub const CATALOG_HOSTED_LICENSE: &str = "wordpress.org";

/// A locally installed product, supplied by the host. Read-only input.
#[derive(Debug, Clone)]
pub struct InstalledProduct {
    pub slug: String,
    /// Install-path identifier; empty when the host addresses the product
    /// by slug alone (themes).
    pub plugin: String,
    pub version: String,
}

impl InstalledProduct {
    pub fn new(
        slug: impl Into<String>,
        plugin: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            plugin: plugin.into(),
            version: version.into(),
        }
    }
}

/// Terminal classification of one product; no further transitions.
#[derive(Debug, Clone)]
pub enum Decision {
    /// Hosted on the public catalog (or unlicensed); never managed here.
    SkippedUnmanaged,
    /// No matching installed product; nothing to report.
    NotInstalled,
    /// Installed version is current. The full metadata rides along so the
    /// host can still render it.
    UpToDate(Box<ProductInfo>),
    UpdateAvailable(UpdateEntry),
}

/// Entry the host's update transient consumes for one outdated plugin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateEntry {
    /// Install-path identifier the host uses to address the product.
    pub identifier: String,
    pub slug: String,
    pub new_version: String,
    pub url: String,
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateCheckReport {
    pub updates: Vec<UpdateEntry>,
    pub no_update: Vec<ProductInfo>,
}

/// Update entry for the single active theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeUpdate {
    pub theme: String,
    pub new_version: String,
    pub url: String,
    pub package: String,
}

pub fn is_externally_managed(record: &ManifestRecord) -> bool {
    record.license.is_empty() || record.license == CATALOG_HOSTED_LICENSE
}

/// Classify one normalized product against the matching installed product.
pub fn decide(
    product: &ProductInfo,
    installed: Option<&InstalledProduct>,
    config: &UpdateManagerConfig,
) -> Decision {
    if product.license.is_empty() || product.license == CATALOG_HOSTED_LICENSE {
        return Decision::SkippedUnmanaged;
    }

    let Some(installed) = installed else {
        return Decision::NotInstalled;
    };

    if version::compare(&installed.version, &product.version) == Ordering::Less {
        Decision::UpdateAvailable(UpdateEntry {
            identifier: product_identifier(product),
            slug: product.slug.clone(),
            new_version: product.version.clone(),
            url: product.homepage.clone(),
            package: product.package.clone(),
            icon: config.addon_icon_url(&product.slug),
        })
    } else {
        Decision::UpToDate(Box::new(product.clone()))
    }
}

/// Scan the add-on manifest against all installed plugins, bucketing each
/// managed product into updates or no-update metadata.
pub fn check_plugins(
    records: &[ManifestRecord],
    installed: &[InstalledProduct],
    config: &UpdateManagerConfig,
    validator: &dyn LicenseValidator,
) -> UpdateCheckReport {
    let mut report = UpdateCheckReport::default();

    for record in records {
        let product = normalize(record, config, validator);
        let matching = installed.iter().find(|candidate| {
            candidate.slug == record.slug
                || (!record.plugin.is_empty() && candidate.plugin == record.plugin)
        });

        match decide(&product, matching, config) {
            Decision::UpdateAvailable(entry) => report.updates.push(entry),
            Decision::UpToDate(product) => report.no_update.push(*product),
            Decision::SkippedUnmanaged | Decision::NotInstalled => {}
        }
    }

    report
}

/// Compare the theme manifest against the single active theme. Installed
/// but inactive themes are ignored even when their slug matches.
pub fn check_themes(
    records: &[ManifestRecord],
    active_theme: Option<&InstalledProduct>,
    config: &UpdateManagerConfig,
    validator: &dyn LicenseValidator,
) -> Option<ThemeUpdate> {
    let active = active_theme?;

    for record in records {
        if record.slug.is_empty() || record.slug != active.slug {
            continue;
        }

        let product = normalize(record, config, validator);
        if let Decision::UpdateAvailable(entry) = decide(&product, Some(active), config) {
            let url = if record.theme_uri.is_empty() {
                product.homepage
            } else {
                record.theme_uri.clone()
            };

            return Some(ThemeUpdate {
                theme: record.slug.clone(),
                new_version: entry.new_version,
                url,
                package: entry.package,
            });
        }
    }

    None
}

fn product_identifier(product: &ProductInfo) -> String {
    if product.plugin.is_empty() {
        product.slug.clone()
    } else {
        product.plugin.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::StandaloneValidator;

    fn record(slug: &str, version: &str, license: &str) -> ManifestRecord {
        ManifestRecord {
            slug: slug.to_owned(),
            title: format!("Craftwork - {slug} Add On"),
            version: version.to_owned(),
            license: license.to_owned(),
            uri: format!("https://www.craftwork.dev/add-ons/{slug}/"),
            download: format!("https://license.craftwork.dev/downloads/{slug}.zip"),
            plugin: format!("{slug}/{slug}.php"),
            ..ManifestRecord::default()
        }
    }

    fn installed(slug: &str, version: &str) -> InstalledProduct {
        InstalledProduct::new(slug, format!("{slug}/{slug}.php"), version)
    }

    fn product(record: &ManifestRecord) -> ProductInfo {
        normalize(record, &UpdateManagerConfig::default(), &StandaloneValidator)
    }

    #[test]
    fn outdated_install_yields_an_update_entry() {
        let record = record("widget-pro", "3.0", "standard");
        let config = UpdateManagerConfig::default();

        let decision = decide(&product(&record), Some(&installed("widget-pro", "2.5")), &config);

        let Decision::UpdateAvailable(entry) = decision else {
            panic!("expected UpdateAvailable, got {decision:?}");
        };
        assert_eq!(entry.identifier, "widget-pro/widget-pro.php");
        assert_eq!(entry.new_version, "3.0");
        assert_eq!(entry.url, "https://www.craftwork.dev/add-ons/widget-pro/");
        assert_eq!(
            entry.package,
            "https://license.craftwork.dev/downloads/widget-pro.zip"
        );
        assert_eq!(
            entry.icon.as_deref(),
            Some("https://www.craftwork.dev/images/add-ons/widget-pro.png")
        );
    }

    #[test]
    fn current_install_lands_in_the_no_update_bucket() {
        let record = record("widget-pro", "2.0", "standard");
        let config = UpdateManagerConfig::default();

        for installed_version in ["2.0", "2.0.1"] {
            let decision = decide(
                &product(&record),
                Some(&installed("widget-pro", installed_version)),
                &config,
            );
            let Decision::UpToDate(info) = decision else {
                panic!("expected UpToDate for {installed_version}");
            };
            assert_eq!(info.slug, "widget-pro");
        }
    }

    #[test]
    fn catalog_hosted_records_are_skipped_regardless_of_version() {
        let config = UpdateManagerConfig::default();

        for license in ["", "wordpress.org"] {
            let record = record("widget-pro", "9.9", license);
            let decision = decide(&product(&record), Some(&installed("widget-pro", "0.1")), &config);
            assert!(matches!(decision, Decision::SkippedUnmanaged));
        }
    }

    #[test]
    fn missing_install_is_not_an_error() {
        let record = record("widget-pro", "3.0", "standard");
        let decision = decide(&product(&record), None, &UpdateManagerConfig::default());
        assert!(matches!(decision, Decision::NotInstalled));
    }

    #[test]
    fn check_plugins_matches_by_slug_or_identifier() {
        let records = vec![
            record("widget-pro", "3.0", "standard"),
            record("member-directory", "1.2", "plus"),
            record("catalog-thing", "9.0", "wordpress.org"),
            record("not-installed", "1.0", "standard"),
        ];
        let installed = vec![
            installed("widget-pro", "2.5"),
            // Matches member-directory by identifier despite the odd slug.
            InstalledProduct::new("renamed-dir", "member-directory/member-directory.php", "1.2"),
        ];

        let report = check_plugins(
            &records,
            &installed,
            &UpdateManagerConfig::default(),
            &StandaloneValidator,
        );

        assert_eq!(report.updates.len(), 1);
        assert_eq!(report.updates[0].slug, "widget-pro");
        assert_eq!(report.no_update.len(), 1);
        assert_eq!(report.no_update[0].slug, "member-directory");
    }

    #[test]
    fn active_theme_update_uses_theme_uri() {
        let mut theme = record("memberlite", "4.0", "standard");
        theme.theme_uri = "https://www.craftwork.dev/themes/memberlite/".to_owned();

        let update = check_themes(
            &[theme],
            Some(&InstalledProduct::new("memberlite", "", "3.5")),
            &UpdateManagerConfig::default(),
            &StandaloneValidator,
        )
        .expect("update expected");

        assert_eq!(update.theme, "memberlite");
        assert_eq!(update.new_version, "4.0");
        assert_eq!(update.url, "https://www.craftwork.dev/themes/memberlite/");
        assert_eq!(
            update.package,
            "https://license.craftwork.dev/downloads/memberlite.zip"
        );
    }

    #[test]
    fn inactive_theme_is_ignored() {
        // Deliberate asymmetry with the plugin pass: only the active theme
        // is compared, however many installed themes match the manifest.
        let theme = record("memberlite", "4.0", "standard");

        let update = check_themes(
            &[theme.clone()],
            Some(&InstalledProduct::new("other-theme", "", "1.0")),
            &UpdateManagerConfig::default(),
            &StandaloneValidator,
        );
        assert!(update.is_none());

        let update = check_themes(
            &[theme],
            None,
            &UpdateManagerConfig::default(),
            &StandaloneValidator,
        );
        assert!(update.is_none());
    }

    #[test]
    fn up_to_date_active_theme_yields_nothing() {
        let theme = record("memberlite", "4.0", "standard");

        let update = check_themes(
            &[theme],
            Some(&InstalledProduct::new("memberlite", "", "4.0")),
            &UpdateManagerConfig::default(),
            &StandaloneValidator,
        );
        assert!(update.is_none());
    }
}
