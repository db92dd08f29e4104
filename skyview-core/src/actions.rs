//! Operator actions over a selection of records.
//!
//! Each action takes the ids the operator ticked, pulls the records from
//! the catalog and produces a download, a batch of emails, or list rows.
//! Operator feedback is returned as [`Notice`]s.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::assets::AssetStore;
use crate::catalog::CatalogRepository;
use crate::config::Settings;
use crate::emailer::{self, BatchReport};
use crate::error::{CatalogError, RenderError};
use crate::layout::Renderer;
use crate::mailer::Mailer;
use crate::money::Money;
use crate::selector;

pub const AVAILABILITY_FILENAME: &str = "available_billboards.pdf";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("mail is not configured")]
    MailNotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// A message shown to the operator after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// A finished PDF ready to hand back as a file download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl PdfDownload {
    pub fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// The result of an action together with what the operator should be told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome<T> {
    pub value: T,
    pub notices: Vec<Notice>,
}

impl<T> ActionOutcome<T> {
    fn quiet(value: T) -> Self {
        ActionOutcome {
            value,
            notices: Vec::new(),
        }
    }
}

/// Billboard list row: title, location, availability, area, price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillboardRow {
    pub id: i64,
    pub title: String,
    pub location: String,
    pub is_available: bool,
    pub sqft: i64,
    pub price_per_month: Money,
}

/// Booking list row: customer, billboard, total, creation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRow {
    pub id: i64,
    pub customer_name: String,
    pub billboard: String,
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
}

/// Wires the catalog, assets, settings and (optionally) a mailer into
/// the operator actions.
pub struct AdminActions<'a> {
    catalog: &'a dyn CatalogRepository,
    assets: &'a dyn AssetStore,
    settings: &'a Settings,
    mailer: Option<&'a dyn Mailer>,
}

impl<'a> AdminActions<'a> {
    pub fn new(
        catalog: &'a dyn CatalogRepository,
        assets: &'a dyn AssetStore,
        settings: &'a Settings,
    ) -> Self {
        AdminActions {
            catalog,
            assets,
            settings,
            mailer: None,
        }
    }

    pub fn with_mailer(mut self, mailer: &'a dyn Mailer) -> Self {
        self.mailer = Some(mailer);
        self
    }

    fn renderer(&self) -> Renderer<'a> {
        Renderer::new(self.assets, &self.settings.issuer, self.settings.tax)
            .with_compression(self.settings.compress)
    }

    /// Report on the selected billboards that are available. Unavailable
    /// ones are dropped; if none remain the report says so.
    pub fn download_availability_pdf(
        &self,
        ids: &[i64],
        date: NaiveDate,
    ) -> Result<PdfDownload, ActionError> {
        let selected = self.catalog.billboards_by_ids(ids)?;
        let boards = selector::available(&selected);
        info!(
            selected = selected.len(),
            available = boards.len(),
            "rendering availability report"
        );
        let bytes = self.renderer().render_availability(&boards, date)?;
        Ok(PdfDownload {
            filename: AVAILABILITY_FILENAME.to_string(),
            bytes,
        })
    }

    /// Tax invoice for the first selected booking. `None` when nothing is
    /// selected; extra selections are named in a warning.
    pub fn download_invoice_pdf(
        &self,
        ids: &[i64],
    ) -> Result<ActionOutcome<Option<PdfDownload>>, ActionError> {
        let details = self.catalog.bookings_by_ids(ids)?;
        let Some((first, rest)) = details.split_first() else {
            return Ok(ActionOutcome::quiet(None));
        };

        let bytes = self.renderer().render_invoice(first)?;
        let download = PdfDownload {
            filename: first.booking.invoice_filename(),
            bytes,
        };

        let mut notices = Vec::new();
        if !rest.is_empty() {
            let ignored: Vec<String> = rest.iter().map(|d| format!("#{}", d.booking.id)).collect();
            warn!(
                booking_id = first.booking.id,
                ignored = rest.len(),
                "invoice download covers one booking only"
            );
            notices.push(Notice::warning(format!(
                "Only booking #{} was downloaded; select one booking at a time (ignored {}).",
                first.booking.id,
                ignored.join(", ")
            )));
        }
        Ok(ActionOutcome {
            value: Some(download),
            notices,
        })
    }

    /// Email the short invoice to every selected booking's customer.
    pub fn send_invoice_email(&self, ids: &[i64]) -> Result<BatchReport, ActionError> {
        let details = self.catalog.bookings_by_ids(ids)?;
        if details.is_empty() {
            return Ok(BatchReport::default());
        }
        let mailer = self.mailer.ok_or(ActionError::MailNotConfigured)?;
        Ok(emailer::send_invoices(
            &self.renderer(),
            mailer,
            &self.settings.mail.from_address,
            &details,
        ))
    }

    /// Billboard list, optionally filtered by availability.
    pub fn billboard_rows(&self, available: Option<bool>) -> Result<Vec<BillboardRow>, ActionError> {
        let boards = self.catalog.billboards()?;
        Ok(boards
            .into_iter()
            .filter(|b| available.map_or(true, |want| b.is_available == want))
            .map(|b| BillboardRow {
                id: b.id,
                title: b.title,
                location: b.location,
                is_available: b.is_available,
                sqft: b.sqft,
                price_per_month: b.price_per_month,
            })
            .collect())
    }

    /// Booking list, newest first.
    pub fn booking_rows(&self) -> Result<Vec<BookingRow>, ActionError> {
        let details = self.catalog.bookings()?;
        Ok(details
            .into_iter()
            .map(|d| BookingRow {
                id: d.booking.id,
                billboard: d.billboard.to_string(),
                customer_name: d.booking.customer_name,
                total_amount: d.booking.total_amount,
                created_at: d.booking.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_headers() {
        let download = PdfDownload {
            filename: "invoice_7.pdf".to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(download.content_type(), "application/pdf");
        assert_eq!(
            download.content_disposition(),
            "attachment; filename=\"invoice_7.pdf\""
        );
    }

    #[test]
    fn notice_display() {
        assert_eq!(
            Notice::warning("check the selection").to_string(),
            "[warning] check the selection"
        );
        assert_eq!(Notice::info("ok").level, NoticeLevel::Info);
    }
}
