//! Translation-feed registration: which (kind, slug, feed URL) triples the
//! host should register with the translation aggregation service for the
//! products that are actually in use.

use crate::api::ManifestRecord;
use crate::decision::InstalledProduct;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Plugin,
    Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationProject {
    pub kind: ProductKind,
    pub slug: String,
    pub api_url: String,
}

/// One registration per active product found in the combined manifests:
/// every installed plugin with a manifest record, plus the active theme if
/// the theme manifest knows it. The host performs the registration itself.
pub fn translation_projects(
    addons: &[ManifestRecord],
    themes: &[ManifestRecord],
    installed_plugins: &[InstalledProduct],
    active_theme: Option<&InstalledProduct>,
    translate_host: &str,
) -> Vec<TranslationProject> {
    let mut projects = Vec::new();

    for record in addons {
        if record.slug.is_empty() {
            continue;
        }

        let active = installed_plugins.iter().any(|candidate| {
            candidate.slug == record.slug
                || (!record.plugin.is_empty() && candidate.plugin == record.plugin)
        });
        if active {
            projects.push(TranslationProject {
                kind: ProductKind::Plugin,
                slug: record.slug.clone(),
                api_url: translation_api_url(translate_host, &record.slug),
            });
        }
    }

    if let Some(active) = active_theme {
        let known = themes
            .iter()
            .any(|record| !record.slug.is_empty() && record.slug == active.slug);
        if known {
            projects.push(TranslationProject {
                kind: ProductKind::Theme,
                slug: active.slug.clone(),
                api_url: translation_api_url(translate_host, &active.slug),
            });
        }
    }

    projects
}

pub fn translation_api_url(translate_host: &str, slug: &str) -> String {
    format!("https://{translate_host}/api/translations/{slug}")
}
