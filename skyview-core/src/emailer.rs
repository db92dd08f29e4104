//! Bulk invoice delivery.
//!
//! Each booking gets its own message carrying the short invoice. A
//! failure for one recipient is recorded and the loop moves on.

use tracing::{error, info};

use crate::actions::Notice;
use crate::layout::Renderer;
use crate::mailer::{Attachment, Mailer, OutgoingEmail};
use crate::models::BookingDetail;

pub const INVOICE_EMAIL_BODY: &str = "Please find attached your invoice from Skyview Billboards.";

/// One booking whose invoice did not go out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub booking_id: i64,
    pub recipient: String,
    pub reason: String,
}

/// Outcome of a batch: how many went out and what failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub sent: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.sent + self.failures.len()
    }

    /// Operator messages: one error per failure, then the success count.
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices: Vec<Notice> = self
            .failures
            .iter()
            .map(|f| Notice::error(format!("Failed to send to {}: {}", f.recipient, f.reason)))
            .collect();
        notices.push(Notice::info(format!(
            "{} emails sent successfully.",
            self.sent
        )));
        notices
    }
}

pub fn invoice_email(detail: &BookingDetail, from: &str, pdf: Vec<u8>) -> OutgoingEmail {
    let booking = &detail.booking;
    OutgoingEmail {
        subject: format!("Invoice for Booking #{}", booking.id),
        body: INVOICE_EMAIL_BODY.to_string(),
        from: from.to_string(),
        to: vec![booking.customer_email.clone()],
        attachments: vec![Attachment::pdf(booking.invoice_filename(), pdf)],
    }
}

/// Render and send one short invoice per booking, in order.
pub fn send_invoices(
    renderer: &Renderer<'_>,
    mailer: &dyn Mailer,
    from: &str,
    bookings: &[BookingDetail],
) -> BatchReport {
    let mut report = BatchReport::default();
    for detail in bookings {
        let booking = &detail.booking;
        let result = renderer
            .render_invoice_summary(detail)
            .map_err(|e| e.to_string())
            .and_then(|pdf| {
                mailer
                    .send(&invoice_email(detail, from, pdf))
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => report.sent += 1,
            Err(reason) => {
                error!(
                    booking_id = booking.id,
                    recipient = %booking.customer_email,
                    error = %reason,
                    "invoice email failed"
                );
                report.failures.push(DeliveryFailure {
                    booking_id: booking.id,
                    recipient: booking.customer_email.clone(),
                    reason,
                });
            }
        }
    }
    info!(
        sent = report.sent,
        failed = report.failures.len(),
        "invoice batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::NoticeLevel;

    #[test]
    fn notices_list_failures_then_count() {
        let report = BatchReport {
            sent: 2,
            failures: vec![DeliveryFailure {
                booking_id: 5,
                recipient: "bad@example.com".to_string(),
                reason: "mailbox unavailable".to_string(),
            }],
        };
        let notices = report.notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(
            notices[0].message,
            "Failed to send to bad@example.com: mailbox unavailable"
        );
        assert_eq!(notices[1].level, NoticeLevel::Info);
        assert_eq!(notices[1].message, "2 emails sent successfully.");
        assert_eq!(report.attempted(), 3);
    }

    #[test]
    fn empty_batch_reports_zero() {
        let notices = BatchReport::default().notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "0 emails sent successfully.");
    }
}
