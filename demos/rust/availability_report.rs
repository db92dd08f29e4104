/// Availability report over every billboard in the catalog.
///
/// Run with:
///   cargo run --example availability_report -p skyview-demos
///
/// Output: demos/output/available_billboards.pdf
use std::path::PathBuf;

use anyhow::Context;
use skyview_core::{AdminActions, CatalogRepository, FsAssetStore, Settings, SqliteCatalog};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = std::env::var_os("SKYVIEW_CONFIG").map(PathBuf::from);
    let settings = Settings::load(config.as_deref()).context("loading settings")?;
    let catalog = SqliteCatalog::open(&settings.database_path)
        .with_context(|| format!("opening {}", settings.database_path.display()))?;
    let assets = FsAssetStore::new(&settings.media_root);

    let ids: Vec<i64> = catalog.billboards()?.iter().map(|b| b.id).collect();
    let actions = AdminActions::new(&catalog, &assets, &settings);
    let today = chrono::Local::now().date_naive();
    let download = actions.download_availability_pdf(&ids, today)?;

    std::fs::create_dir_all("demos/output")?;
    let path = format!("demos/output/{}", download.filename);
    std::fs::write(&path, &download.bytes).with_context(|| format!("writing {}", path))?;
    println!("Written to {}", path);
    Ok(())
}
