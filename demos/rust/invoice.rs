/// Tax invoice for one or more bookings; only the first is rendered.
///
/// Run with:
///   cargo run --example invoice -p skyview-demos -- 1
///
/// Output: demos/output/invoice_<id>.pdf
use std::path::PathBuf;

use anyhow::Context;
use skyview_core::{AdminActions, FsAssetStore, Settings, SqliteCatalog};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let ids = std::env::args()
        .skip(1)
        .map(|a| a.parse::<i64>().with_context(|| format!("bad booking id {:?}", a)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let config = std::env::var_os("SKYVIEW_CONFIG").map(PathBuf::from);
    let settings = Settings::load(config.as_deref()).context("loading settings")?;
    let catalog = SqliteCatalog::open(&settings.database_path)
        .with_context(|| format!("opening {}", settings.database_path.display()))?;
    let assets = FsAssetStore::new(&settings.media_root);
    let actions = AdminActions::new(&catalog, &assets, &settings);

    let outcome = actions.download_invoice_pdf(&ids)?;
    for notice in &outcome.notices {
        println!("{}", notice);
    }
    let Some(download) = outcome.value else {
        println!("No booking selected.");
        return Ok(());
    };

    std::fs::create_dir_all("demos/output")?;
    let path = format!("demos/output/{}", download.filename);
    std::fs::write(&path, &download.bytes).with_context(|| format!("writing {}", path))?;
    println!("Written to {}", path);
    Ok(())
}
