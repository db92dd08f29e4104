#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use chrono::{NaiveDate, TimeZone, Utc};
use skyview_core::{
    Billboard, Booking, BookingDetail, MailError, Mailer, Money, NewBillboard, NewBooking,
    OutgoingEmail,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn pdf_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        let pixels = vec![0x40u8; (width * height * 3) as usize];
        writer.write_image_data(&pixels).unwrap();
    }
    out
}

/// Write a small PNG under `root/rel`, creating parent directories.
pub fn write_png(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, png_bytes(4, 2)).unwrap();
}

pub fn billboard(id: i64, title: &str, available: bool) -> Billboard {
    Billboard {
        id,
        title: title.to_string(),
        image: None,
        sqft: 200,
        size: "20x10".to_string(),
        description: "Facing the bus stand".to_string(),
        location: "Kottayam".to_string(),
        map_url: None,
        is_available: available,
        price_per_month: Money::from_rupees(1500),
    }
}

pub fn new_billboard(title: &str, available: bool) -> NewBillboard {
    NewBillboard {
        title: title.to_string(),
        image: None,
        sqft: 200,
        size: "20x10".to_string(),
        description: "Facing the bus stand".to_string(),
        location: "Kottayam".to_string(),
        map_url: None,
        is_available: available,
        price_per_month: Money::from_rupees(1500),
    }
}

pub fn new_booking(billboard_id: i64, name: &str, email: &str) -> NewBooking {
    NewBooking {
        billboard_id,
        customer_name: name.to_string(),
        customer_email: email.to_string(),
        customer_phone: "9847000000".to_string(),
        start_date: date(2025, 1, 1),
        duration_months: 3,
        total_amount: Money::from_rupees(118),
    }
}

pub fn detail(id: i64, total: Money) -> BookingDetail {
    BookingDetail {
        booking: Booking {
            id,
            billboard_id: 1,
            customer_name: "Asha Menon".to_string(),
            customer_email: "asha@example.com".to_string(),
            customer_phone: "9847000000".to_string(),
            start_date: date(2025, 1, 1),
            duration_months: 3,
            total_amount: total,
            created_at: Utc.with_ymd_and_hms(2025, 1, 2, 10, 30, 0).unwrap(),
        },
        billboard: billboard(1, "MG Road Junction", true),
    }
}

/// Records every message it is handed and rejects the listed recipients.
#[derive(Default)]
pub struct RecordingMailer {
    pub attempts: RefCell<Vec<OutgoingEmail>>,
    pub reject: Vec<String>,
}

impl RecordingMailer {
    pub fn rejecting(addresses: &[&str]) -> Self {
        RecordingMailer {
            attempts: RefCell::new(Vec::new()),
            reject: addresses.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.attempts.borrow_mut().push(email.clone());
        if email.to.iter().any(|to| self.reject.contains(to)) {
            return Err(MailError::Build("550 mailbox unavailable".to_string()));
        }
        Ok(())
    }
}
