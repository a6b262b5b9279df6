mod args;

use crate::args::UpdateManagerArgs;
use clap::Parser as _;
use craftwork_update_manager::cache::{JsonFileStore, SystemClock};
use craftwork_update_manager::api::LicenseServerClient;
use craftwork_update_manager::diagnostics::DiagnosticsCollector;
use craftwork_update_manager::error::UpdateManagerError;
use craftwork_update_manager::license::StandaloneValidator;
use craftwork_update_manager::UpdateManager;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_env("CW_UPDATE_MANAGER_LOG"))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = UpdateManagerArgs::parse();

    let result = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(v) => v.block_on(async_main(args)),
        Err(err) => {
            tracing::error!("Failed to create tokio runtime: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        tracing::error!("Error: {:?}", err);
        std::process::exit(1);
    }
}

async fn async_main(args: UpdateManagerArgs) -> Result<(), UpdateManagerError> {
    tracing::trace!("args = {:#?}", args);

    let config = args.to_config();
    let store = JsonFileStore::open(&args.cache_file)?;
    let fetcher = LicenseServerClient::new(&config)?;

    let mut diagnostics = DiagnosticsCollector::new();
    let manager =
        UpdateManager::with_parts(config, fetcher, store, SystemClock, StandaloneValidator)
            .with_diagnostics(diagnostics.sender());

    tracing::info!("Checking {} installed plugins for updates...", args.plugins.len());
    let report = manager.check_plugin_updates(&args.plugins, args.force).await;

    for entry in &report.updates {
        tracing::info!(
            "update available: {} -> {} ({})",
            entry.slug,
            entry.new_version,
            entry.package
        );
    }
    tracing::info!("Plugins with an update: {}", report.updates.len());
    tracing::info!("Plugins up to date: {}", report.no_update.len());

    if args.active_theme.is_some() {
        match manager
            .check_theme_updates(args.active_theme.as_ref(), args.force)
            .await
        {
            Some(update) => tracing::info!(
                "theme update available: {} -> {} ({})",
                update.theme,
                update.new_version,
                update.package
            ),
            None => tracing::info!("Active theme is up to date."),
        }
    }

    let projects = manager
        .translation_projects(&args.plugins, args.active_theme.as_ref())
        .await;
    for project in &projects {
        tracing::debug!("translation feed: {}", project.api_url);
    }
    tracing::info!("Translation feeds to register: {}", projects.len());

    let problems = diagnostics.drain();
    if !problems.is_empty() {
        tracing::warn!("Problems encountered:");
        for problem in &problems {
            tracing::warn!("- {}: {}", problem.category, problem.error);
        }
    }

    tracing::info!("Done.");

    Ok(())
}
