use serde::{Deserialize, Serialize};

/// Product category served by the license server. Each category has its
/// own manifest resource and its own cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Addons,
    Themes,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Addons, Category::Themes];

    /// Resource path segment under the license server base.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Addons => "addons",
            Category::Themes => "themes",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw manifest record as published by the license server.
///
/// Every field is optional on the wire and decodes to an empty string when
/// absent, which keeps all downstream comparisons total. Records are
/// identified by `slug`, are immutable once fetched and get replaced
/// wholesale on refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ManifestRecord {
    pub slug: String,
    pub title: String,
    pub version: String,
    pub author: String,
    #[serde(rename = "AuthorURI")]
    pub author_uri: String,
    pub requires: String,
    pub tested: String,
    pub last_updated: String,
    #[serde(rename = "URI")]
    pub uri: String,
    pub download: String,
    pub description: String,
    pub installation: String,
    #[serde(rename = "FAQ")]
    pub faq: String,
    pub changelog: String,
    /// License tier label; empty or `wordpress.org` records are managed by
    /// the public catalog, not by this system.
    pub license: String,
    /// Install-path identifier inside the host platform.
    #[serde(rename = "plugin")]
    pub plugin: String,
    #[serde(rename = "ThemeURI")]
    pub theme_uri: String,
}
