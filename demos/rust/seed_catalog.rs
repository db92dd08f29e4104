/// Seed a catalog with a few billboards and bookings.
///
/// Run with:
///   cargo run --example seed_catalog -p skyview-demos
///
/// The database path comes from `SKYVIEW_DATABASE` (default `skyview.db`).
/// A settings file can be named with `SKYVIEW_CONFIG`.
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use skyview_core::{
    AdminActions, CatalogRepository, Money, NewBillboard, NewBooking, NoAssets, Settings,
    SqliteCatalog,
};
use tracing_subscriber::EnvFilter;

fn billboard(
    title: &str,
    location: &str,
    size: &str,
    sqft: i64,
    rupees: i64,
    available: bool,
) -> NewBillboard {
    NewBillboard {
        title: title.to_string(),
        image: None,
        sqft,
        size: size.to_string(),
        description: format!("{} hoarding at {}, lit from dusk till midnight.", size, location),
        location: location.to_string(),
        map_url: None,
        is_available: available,
        price_per_month: Money::from_rupees(rupees),
    }
}

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

    let boards = [
        billboard("MG Road Junction", "Kottayam", "20x10", 200, 15000, true),
        billboard("Baker Junction", "Kottayam", "30x15", 450, 22000, true),
        billboard("Railway Station Gate", "Changanassery", "40x20", 800, 35000, false),
        billboard("KSRTC Stand", "Ettumanoor", "20x10", 200, 12000, true),
    ];
    let mut ids = Vec::new();
    for new in &boards {
        ids.push(catalog.insert_billboard(new)?.id);
    }

    let start = NaiveDate::from_ymd_opt(2025, 1, 1).context("start date")?;
    let bookings = [
        (ids[0], "Asha Menon", "asha@example.com", 3, 53_100),
        (ids[2], "Ravi Kumar", "ravi@example.com", 6, 2_47_800),
    ];
    for (billboard_id, name, email, months, total) in bookings {
        catalog.insert_booking(&NewBooking {
            billboard_id,
            customer_name: name.to_string(),
            customer_email: email.to_string(),
            customer_phone: "9847000000".to_string(),
            start_date: start,
            duration_months: months,
            total_amount: Money::from_rupees(total),
        })?;
    }

    let actions = AdminActions::new(&catalog, &NoAssets, &settings);
    for row in actions.billboard_rows(None)? {
        println!(
            "{:>3}  {:<24} {:<14} {:>5} sqft  {:>10}  {}",
            row.id,
            row.title,
            row.location,
            row.sqft,
            row.price_per_month.to_string(),
            if row.is_available { "available" } else { "booked" }
        );
    }
    for row in actions.booking_rows()? {
        println!(
            "#{:<3} {:<12} {:<36} {:>10}  {}",
            row.id,
            row.customer_name,
            row.billboard,
            row.total_amount.to_string(),
            row.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}
