mod common;

use common::{date, new_billboard, new_booking, pdf_text, RecordingMailer};
use skyview_core::{
    ActionError, AdminActions, CatalogRepository, NoAssets, NoticeLevel, Settings, SqliteCatalog,
};

fn uncompressed() -> Settings {
    Settings {
        compress: false,
        ..Settings::default()
    }
}

/// Three bookings on one billboard, for asha, ravi and meera.
fn seeded() -> (SqliteCatalog, Vec<i64>) {
    let catalog = SqliteCatalog::open_in_memory().unwrap();
    let board = catalog
        .insert_billboard(&new_billboard("MG Road Junction", true))
        .unwrap();
    let ids = ["asha", "ravi", "meera"]
        .iter()
        .map(|name| {
            catalog
                .insert_booking(&new_booking(board.id, name, &format!("{}@example.com", name)))
                .unwrap()
                .id
        })
        .collect();
    (catalog, ids)
}

#[test]
fn availability_download_skips_unavailable() {
    let catalog = SqliteCatalog::open_in_memory().unwrap();
    let a = catalog.insert_billboard(&new_billboard("Alpha", true)).unwrap();
    let b = catalog.insert_billboard(&new_billboard("Bravo", false)).unwrap();
    let c = catalog.insert_billboard(&new_billboard("Charlie", true)).unwrap();
    let settings = uncompressed();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings);

    let download = actions
        .download_availability_pdf(&[a.id, b.id, c.id], date(2025, 3, 7))
        .unwrap();
    assert_eq!(download.filename, "available_billboards.pdf");
    assert_eq!(
        download.content_disposition(),
        "attachment; filename=\"available_billboards.pdf\""
    );
    let output = pdf_text(&download.bytes);
    assert!(output.contains("50 740 Td\n(Alpha) Tj"));
    assert!(output.contains("50 570 Td\n(Charlie) Tj"));
    assert!(!output.contains("(Bravo) Tj"));
}

#[test]
fn availability_download_with_nothing_available() {
    let catalog = SqliteCatalog::open_in_memory().unwrap();
    let b = catalog.insert_billboard(&new_billboard("Bravo", false)).unwrap();
    let settings = uncompressed();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings);

    let download = actions
        .download_availability_pdf(&[b.id], date(2025, 3, 7))
        .unwrap();
    let output = pdf_text(&download.bytes);
    assert!(output.contains("(No available billboards found at this time.) Tj"));
}

#[test]
fn invoice_download_without_selection_is_noop() {
    let (catalog, _) = seeded();
    let settings = uncompressed();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings);

    let outcome = actions.download_invoice_pdf(&[]).unwrap();
    assert!(outcome.value.is_none());
    assert!(outcome.notices.is_empty());
}

#[test]
fn invoice_download_for_one_booking() {
    let (catalog, ids) = seeded();
    let settings = uncompressed();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings);

    let outcome = actions.download_invoice_pdf(&ids[1..2]).unwrap();
    let download = outcome.value.unwrap();
    assert_eq!(download.filename, format!("invoice_{}.pdf", ids[1]));
    assert_eq!(download.content_type(), "application/pdf");
    assert!(outcome.notices.is_empty());
    let output = pdf_text(&download.bytes);
    assert!(output.contains("40 708 Td\n(ravi) Tj"));
    assert!(output.contains("(One Hundred Eighteen Rupees Only) Tj"));
}

#[test]
fn invoice_download_with_several_selected_warns() {
    let (catalog, ids) = seeded();
    let settings = uncompressed();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings);

    let outcome = actions.download_invoice_pdf(&ids).unwrap();
    let download = outcome.value.unwrap();
    assert_eq!(download.filename, format!("invoice_{}.pdf", ids[0]));
    assert_eq!(outcome.notices.len(), 1);
    let notice = &outcome.notices[0];
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains(&format!("#{}", ids[1])));
    assert!(notice.message.contains(&format!("#{}", ids[2])));
}

#[test]
fn batch_email_isolates_failures() {
    let (catalog, ids) = seeded();
    let settings = uncompressed();
    let mailer = RecordingMailer::rejecting(&["ravi@example.com"]);
    let actions = AdminActions::new(&catalog, &NoAssets, &settings).with_mailer(&mailer);

    let report = actions.send_invoice_email(&ids).unwrap();
    assert_eq!(report.sent, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].booking_id, ids[1]);
    assert_eq!(report.failures[0].recipient, "ravi@example.com");

    // the third booking is still attempted after the failure
    let attempts = mailer.attempts.borrow();
    assert_eq!(attempts.len(), 3);
    assert_eq!(attempts[2].to, vec!["meera@example.com".to_string()]);

    let notices = report.notices();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0]
        .message
        .starts_with("Failed to send to ravi@example.com: "));
    assert_eq!(notices[1].message, "2 emails sent successfully.");
}

#[test]
fn batch_email_message_shape() {
    let (catalog, ids) = seeded();
    let settings = uncompressed();
    let mailer = RecordingMailer::default();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings).with_mailer(&mailer);

    actions.send_invoice_email(&ids[..1]).unwrap();
    let attempts = mailer.attempts.borrow();
    let email = &attempts[0];
    assert_eq!(email.subject, format!("Invoice for Booking #{}", ids[0]));
    assert_eq!(
        email.body,
        "Please find attached your invoice from Skyview Billboards."
    );
    assert_eq!(email.from, "skyview230@gmail.com");
    assert_eq!(email.to, vec!["asha@example.com".to_string()]);
    assert_eq!(email.attachments.len(), 1);
    let attachment = &email.attachments[0];
    assert_eq!(attachment.filename, format!("invoice_{}.pdf", ids[0]));
    assert_eq!(attachment.content_type, "application/pdf");
    let output = pdf_text(&attachment.data);
    assert!(output.contains(&format!("(INVOICE #{}) Tj", ids[0])));
    assert!(output.contains("(Total: 118.00) Tj"));
}

#[test]
fn batch_email_without_mailer() {
    let (catalog, ids) = seeded();
    let settings = uncompressed();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings);
    assert!(matches!(
        actions.send_invoice_email(&ids),
        Err(ActionError::MailNotConfigured)
    ));
}

#[test]
fn batch_email_with_nothing_selected_needs_no_mailer() {
    let (catalog, _) = seeded();
    let settings = uncompressed();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings);
    let report = actions.send_invoice_email(&[]).unwrap();
    assert_eq!(report.sent, 0);
    assert!(report.failures.is_empty());
    let notices = report.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert_eq!(notices[0].message, "0 emails sent successfully.");
}

#[test]
fn list_rows() {
    let (catalog, ids) = seeded();
    catalog
        .insert_billboard(&new_billboard("Bravo", false))
        .unwrap();
    let settings = uncompressed();
    let actions = AdminActions::new(&catalog, &NoAssets, &settings);

    assert_eq!(actions.billboard_rows(None).unwrap().len(), 2);
    let available = actions.billboard_rows(Some(true)).unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].title, "MG Road Junction");
    let taken = actions.billboard_rows(Some(false)).unwrap();
    assert_eq!(taken[0].title, "Bravo");

    let rows = actions.booking_rows().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].id, ids[2]);
    assert_eq!(rows[0].billboard, "MG Road Junction - Kottayam");
}
