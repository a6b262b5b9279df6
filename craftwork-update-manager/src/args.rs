use clap::Parser;
use craftwork_update_manager::InstalledProduct;
use craftwork_update_manager::config::UpdateManagerConfig;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Parser)]
pub struct UpdateManagerArgs {
    /// License server base URL.
    #[arg(long, env = "CW_LICENSE_SERVER")]
    pub license_server: Option<Url>,

    /// License key forwarded on download links.
    #[arg(short, long, env = "CW_LICENSE_KEY")]
    pub key: Option<String>,

    /// Manifest fetch timeout in seconds.
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Refresh manifests even when the cached copies are fresh.
    #[arg(long, default_value_t = false)]
    pub force: bool,

    /// Where cached manifests are persisted between runs.
    #[arg(
        long,
        default_value = "update-manager-cache.json",
        env = "CW_UPDATE_CACHE"
    )]
    pub cache_file: PathBuf,

    /// Installed plugin as SLUG[/IDENTIFIER]=VERSION. Repeatable.
    #[arg(long = "plugin", value_name = "SLUG[/IDENT]=VERSION", value_parser = parse_installed_plugin)]
    pub plugins: Vec<InstalledProduct>,

    /// The active theme as SLUG=VERSION.
    #[arg(long, value_name = "SLUG=VERSION", value_parser = parse_installed_theme)]
    pub active_theme: Option<InstalledProduct>,
}

impl UpdateManagerArgs {
    pub fn to_config(&self) -> UpdateManagerConfig {
        let mut config = UpdateManagerConfig::default();

        if let Some(server) = &self.license_server {
            config.license_server = server.clone();
        }
        config.timeout = Duration::from_secs(self.timeout);
        config.license_key = self.key.clone();

        config
    }
}

fn parse_installed_plugin(value: &str) -> Result<InstalledProduct, String> {
    let (product, version) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SLUG[/IDENT]=VERSION, got '{value}'"))?;

    let (slug, identifier) = match product.split_once('/') {
        Some((slug, rest)) => (slug, format!("{slug}/{rest}")),
        None => (product, String::new()),
    };

    if slug.is_empty() || version.is_empty() {
        return Err(format!("expected SLUG[/IDENT]=VERSION, got '{value}'"));
    }

    Ok(InstalledProduct::new(slug, identifier, version))
}

fn parse_installed_theme(value: &str) -> Result<InstalledProduct, String> {
    let (slug, version) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SLUG=VERSION, got '{value}'"))?;

    if slug.is_empty() || version.is_empty() {
        return Err(format!("expected SLUG=VERSION, got '{value}'"));
    }

    Ok(InstalledProduct::new(slug, "", version))
}
