//! Single-page tax invoice for one booking.
//!
//! The form is fixed: issuer header, bill-to block, reference bar, a
//! particulars table with one line item, the GST charges block and the
//! amount in words. Only the billboard image is optional.

use pdf_canvas::{BuiltinFont, Canvas, Color, A4_WIDTH};
use tracing::{debug, warn};

use super::{Renderer, LOGO_RED};
use crate::config::Issuer;
use crate::error::RenderError;
use crate::money::SplitAmount;
use crate::models::BookingDetail;
use crate::tax::TaxBreakdown;
use crate::words::amount_in_words;

pub const INVOICE_TITLE: &str = "Skyview Tax Invoice";

const TABLE_LEFT: f64 = 30.0;
const TABLE_RIGHT: f64 = 565.0;
const LABEL_X: f64 = 455.0;
const RUPEES_X: f64 = 505.0;
const PAISE_X: f64 = 560.0;

impl Renderer<'_> {
    /// Render the full tax invoice. Amounts are back-calculated from the
    /// booking's tax-inclusive total.
    pub fn render_invoice(&self, detail: &BookingDetail) -> Result<Vec<u8>, RenderError> {
        let booking = &detail.booking;
        let board = &detail.billboard;
        let tax = TaxBreakdown::from_total(booking.total_amount, self.rates);

        let mut canvas = self.canvas(INVOICE_TITLE);
        draw_issuer(&mut canvas, self.issuer);

        // bill to
        canvas.set_font(BuiltinFont::HelveticaBold, 9.0);
        canvas.draw_string(40.0, 720.0, "BILL TO PARTY");
        canvas.set_font(BuiltinFont::Helvetica, 9.0);
        canvas.draw_string(40.0, 708.0, &booking.customer_name);
        canvas.draw_string(40.0, 696.0, &booking.customer_email);
        canvas.draw_string(40.0, 684.0, &format!("Ph: {}", booking.customer_phone));

        // reference bar
        canvas.rect(TABLE_LEFT, 660.0, 535.0, 20.0);
        canvas.set_font(BuiltinFont::HelveticaBold, 9.0);
        canvas.draw_string(
            40.0,
            666.0,
            &format!(
                "Your Order/Ref No: {}/{}",
                self.issuer.order_prefix, booking.id
            ),
        );
        canvas.draw_string(250.0, 666.0, &format!("Invoice No: {}", booking.id));
        canvas.draw_string(
            450.0,
            666.0,
            &format!("Date: {}", booking.created_at.format("%d/%m/%Y")),
        );

        draw_table_frame(&mut canvas);

        // line item
        let y_row = 620.0;
        canvas.set_font(BuiltinFont::Helvetica, 9.0);
        canvas.draw_string(35.0, y_row, "1.");
        canvas.set_font(BuiltinFont::HelveticaBold, 9.0);
        canvas.draw_string(70.0, y_row, "Advertisement of the Hoarding");

        canvas.set_font(BuiltinFont::Helvetica, 9.0);
        let details = [
            ("Location", board.location.clone()),
            ("Display", booking.customer_name.clone()),
            ("Hoarding Size", board.size.clone()),
            ("Total Area", format!("{} Sq. Ft", board.sqft)),
            ("Duration", format!("{} Months", booking.duration_months)),
        ];
        let mut y = y_row - 15.0;
        for (label, value) in &details {
            canvas.draw_string(70.0, y, label);
            canvas.draw_string(200.0, y, &format!(": {}", value));
            y -= 12.0;
        }
        y -= 8.0;
        canvas.draw_string(
            70.0,
            y,
            &format!(
                "({} to {})",
                booking.start_date.format("%d-%m-%Y"),
                booking.end_date().format("%d-%m-%Y")
            ),
        );

        draw_charges(&mut canvas, &tax, booking.duration_months);

        // amount in words
        canvas.rect(TABLE_LEFT, 275.0, 535.0, 25.0);
        canvas.set_font(BuiltinFont::HelveticaBold, 9.0);
        canvas.draw_string(40.0, 282.0, "Rupees in word:");
        canvas.set_font(BuiltinFont::Helvetica, 9.0);
        canvas.draw_string(130.0, 282.0, &amount_in_words(tax.total));

        if let Some(reference) = board.image_ref() {
            if self
                .place_image(&mut canvas, reference, 350.0, 480.0, 100.0, 80.0)
                .is_err()
            {
                debug!(booking = booking.id, "invoice rendered without image");
            }
        }

        // footer
        canvas.set_font(BuiltinFont::Helvetica, 7.0);
        canvas.draw_string(
            40.0,
            250.0,
            &format!(
                "All payment should be strictly made by cash/draft/cheque favoring '{}'.",
                self.issuer.name
            ),
        );
        canvas.set_font(BuiltinFont::HelveticaBold, 9.0);
        canvas.draw_string(400.0, 240.0, "Authorised Signatory");
        canvas.draw_string(400.0, 230.0, &format!("For {}", self.issuer.payee));

        if tax.fallback {
            warn!(booking = booking.id, "invoice amounts printed as zero");
        }
        Ok(canvas.save()?)
    }
}

fn draw_issuer(canvas: &mut Canvas, issuer: &Issuer) {
    canvas.set_font(BuiltinFont::HelveticaBold, 16.0);
    canvas.set_fill_color(LOGO_RED);
    canvas.draw_string(40.0, 800.0, &issuer.name);

    canvas.set_font(BuiltinFont::Helvetica, 8.0);
    canvas.set_fill_color(Color::BLACK);
    let mut y = 785.0;
    for line in &issuer.address_lines {
        canvas.draw_string(40.0, y, line);
        y -= 10.0;
    }
    canvas.set_font(BuiltinFont::HelveticaBold, 9.0);
    canvas.draw_string(40.0, 760.0, &issuer.phone);

    canvas.set_font(BuiltinFont::Helvetica, 8.0);
    canvas.draw_string(350.0, 800.0, &format!("HSN: {}", issuer.hsn));
    canvas.draw_string(350.0, 790.0, &format!("GSTIN: {}", issuer.gstin));
    canvas.draw_string(350.0, 780.0, &format!("PAN: {}", issuer.pan));
    canvas.draw_string(350.0, 770.0, &format!("GST-REG: {}", issuer.gst_reg));

    canvas.set_font(BuiltinFont::HelveticaBold, 10.0);
    canvas.draw_centred_string(A4_WIDTH / 2.0, 750.0, "TAX-INVOICE");
}

fn draw_table_frame(canvas: &mut Canvas) {
    canvas.rect(TABLE_LEFT, 300.0, 535.0, 360.0);
    canvas.line(TABLE_LEFT, 630.0, TABLE_RIGHT, 630.0);
    canvas.line(TABLE_LEFT, 640.0, TABLE_RIGHT, 640.0);
    canvas.line(60.0, 660.0, 60.0, 350.0);
    canvas.line(460.0, 660.0, 460.0, 300.0);
    canvas.line(510.0, 640.0, 510.0, 300.0);

    canvas.set_font(BuiltinFont::HelveticaBold, 9.0);
    canvas.draw_string(35.0, 645.0, "Sl No");
    canvas.draw_centred_string(260.0, 645.0, "PARTICULARS");
    canvas.draw_centred_string(500.0, 650.0, "Amount");
    canvas.draw_string(480.0, 632.0, "Rs");
    canvas.draw_string(530.0, 632.0, "Ps");
}

fn draw_charges(canvas: &mut Canvas, tax: &TaxBreakdown, duration_months: u32) {
    let rows = [
        (400.0, format!("{} months Amount", duration_months), tax.base_split()),
        (380.0, tax.rates.cgst_label(), tax.cgst_split()),
        (365.0, tax.rates.sgst_label(), tax.sgst_split()),
    ];
    for (y, label, amount) in &rows {
        canvas.set_font(BuiltinFont::HelveticaBold, 9.0);
        canvas.draw_right_string(LABEL_X, *y, label);
        canvas.set_font(BuiltinFont::Helvetica, 9.0);
        draw_split(canvas, *y, amount);
    }

    canvas.line(TABLE_LEFT, 350.0, TABLE_RIGHT, 350.0);
    canvas.set_font(BuiltinFont::HelveticaBold, 10.0);
    canvas.draw_right_string(LABEL_X, 335.0, "GRAND TOTAL");
    draw_split(canvas, 335.0, &tax.total_split());
}

fn draw_split(canvas: &mut Canvas, y: f64, amount: &SplitAmount) {
    canvas.draw_right_string(RUPEES_X, y, &amount.rupees);
    canvas.draw_right_string(PAISE_X, y, &amount.paise);
}
