/// Email the short invoice to the customers of the given bookings, or of
/// every booking when none are named.
///
/// Run with:
///   SMTP_HOST=smtp.example.com SMTP_USER=... SMTP_PASSWORD=... \
///   cargo run --example email_invoices -p skyview-demos -- 1 2
use std::path::PathBuf;

use anyhow::Context;
use skyview_core::{
    AdminActions, CatalogRepository, FsAssetStore, Settings, SmtpMailer, SqliteCatalog,
};
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
    let mailer = SmtpMailer::from_settings(&settings.mail).context("building SMTP transport")?;

    let mut ids = std::env::args()
        .skip(1)
        .map(|a| a.parse::<i64>().with_context(|| format!("bad booking id {:?}", a)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if ids.is_empty() {
        ids = catalog.bookings()?.iter().map(|d| d.booking.id).collect();
    }

    let actions = AdminActions::new(&catalog, &assets, &settings).with_mailer(&mailer);
    let report = actions.send_invoice_email(&ids)?;
    for notice in report.notices() {
        println!("{}", notice);
    }
    Ok(())
}
