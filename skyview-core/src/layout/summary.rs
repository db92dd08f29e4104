//! The short invoice sent as an email attachment: booking number,
//! customer, billboard, picture and total.

use pdf_canvas::BuiltinFont;
use tracing::debug;

use super::Renderer;
use crate::error::RenderError;
use crate::models::BookingDetail;

impl Renderer<'_> {
    pub fn render_invoice_summary(&self, detail: &BookingDetail) -> Result<Vec<u8>, RenderError> {
        let booking = &detail.booking;
        let mut canvas = self.canvas(&format!("Invoice #{}", booking.id));
        canvas.set_font(BuiltinFont::Helvetica, 12.0);

        canvas.draw_string(100.0, 800.0, &format!("INVOICE #{}", booking.id));
        canvas.draw_string(100.0, 780.0, &format!("Customer: {}", booking.customer_name));
        canvas.draw_string(
            100.0,
            760.0,
            &format!("Billboard: {}", detail.billboard.title),
        );

        if let Some(reference) = detail.billboard.image_ref() {
            // missing pictures are left out, the attachment still goes
            if self
                .place_image(&mut canvas, reference, 100.0, 500.0, 200.0, 150.0)
                .is_err()
            {
                debug!(booking = booking.id, "summary invoice rendered without image");
            }
        }

        canvas.draw_string(100.0, 400.0, &format!("Total: {}", booking.total_amount));
        Ok(canvas.save()?)
    }
}
