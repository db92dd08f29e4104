//! Billboard inventory and the bookings made against it.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::money::Money;

/// Booked periods are billed in 30-day months.
pub const DAYS_PER_BOOKED_MONTH: u64 = 30;

/// A billboard site in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billboard {
    pub id: i64,
    pub title: String,
    /// Asset reference resolved through an `AssetStore`, e.g.
    /// `billboards/mg-road.jpg`.
    pub image: Option<String>,
    pub sqft: i64,
    /// Dimensions such as `20x10`.
    pub size: String,
    pub description: String,
    pub location: String,
    pub map_url: Option<String>,
    pub is_available: bool,
    pub price_per_month: Money,
}

impl Billboard {
    /// The image reference, treating an empty string as no image.
    pub fn image_ref(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.trim().is_empty())
    }
}

impl fmt::Display for Billboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.location)
    }
}

/// Fields for a billboard that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBillboard {
    pub title: String,
    pub image: Option<String>,
    pub sqft: i64,
    pub size: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub map_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub price_per_month: Money,
}

fn default_available() -> bool {
    true
}

impl NewBillboard {
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_billboard(&self.title, self.price_per_month)
    }
}

pub(crate) fn validate_billboard(title: &str, price: Money) -> Result<(), CatalogError> {
    if title.trim().is_empty() {
        return Err(CatalogError::invalid("title", "must not be blank"));
    }
    if price.is_negative() {
        return Err(CatalogError::invalid(
            "price_per_month",
            format!("must not be negative (got {})", price),
        ));
    }
    Ok(())
}

/// A customer reservation of one billboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub billboard_id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub start_date: NaiveDate,
    pub duration_months: u32,
    /// Tax-inclusive amount.
    pub total_amount: Money,
    /// Stamped by the store on insert and never changed afterwards.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// `start_date + 30 * duration_months` days.
    pub fn end_date(&self) -> NaiveDate {
        booking_end_date(self.start_date, self.duration_months)
    }

    pub fn invoice_filename(&self) -> String {
        format!("invoice_{}.pdf", self.id)
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Booking #{} - {}", self.id, self.customer_name)
    }
}

pub fn booking_end_date(start: NaiveDate, duration_months: u32) -> NaiveDate {
    let days = DAYS_PER_BOOKED_MONTH * duration_months as u64;
    start.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Fields for a booking that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub billboard_id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub start_date: NaiveDate,
    #[serde(default = "default_duration")]
    pub duration_months: u32,
    pub total_amount: Money,
}

fn default_duration() -> u32 {
    1
}

impl NewBooking {
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_booking(self.duration_months, self.total_amount)
    }
}

pub(crate) fn validate_booking(duration_months: u32, total: Money) -> Result<(), CatalogError> {
    if duration_months < 1 {
        return Err(CatalogError::invalid(
            "duration_months",
            "must be at least 1",
        ));
    }
    if total.is_negative() {
        return Err(CatalogError::invalid(
            "total_amount",
            format!("must not be negative (got {})", total),
        ));
    }
    Ok(())
}

/// A booking together with the billboard it reserves, which is what
/// every invoice needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetail {
    pub booking: Booking,
    pub billboard: Billboard,
}
