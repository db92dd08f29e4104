//! Fixed-coordinate page layouts for the availability report and the
//! invoices.
//!
//! Every render builds a fresh [`Canvas`], walks its template top to
//! bottom and returns finished PDF bytes. Nothing is kept between
//! renders.

pub mod invoice;
pub mod report;
pub mod summary;

use std::borrow::Cow;

use pdf_canvas::{Canvas, Color};
use tracing::warn;

use crate::assets::{AssetError, AssetStore};
use crate::config::Issuer;
use crate::tax::GstRates;

pub(crate) const NAVY: Color = Color::rgb(0.04, 0.14, 0.25);
pub(crate) const CYAN: Color = Color::rgb(0.0, 0.83, 1.0);
pub(crate) const LOGO_RED: Color = Color::rgb(0.8, 0.0, 0.0);
pub(crate) const SUBTLE: Color = Color::gray(0.4);
pub(crate) const MUTED: Color = Color::gray(0.3);
pub(crate) const RULE: Color = Color::gray(0.9);

/// Longest description a report block prints before cutting it off.
pub const DESCRIPTION_LIMIT: usize = 100;

/// Renders documents for the admin actions.
///
/// Holds only borrowed configuration; each `render_*` call starts from
/// an empty canvas.
pub struct Renderer<'a> {
    assets: &'a dyn AssetStore,
    issuer: &'a Issuer,
    rates: GstRates,
    compress: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(assets: &'a dyn AssetStore, issuer: &'a Issuer, rates: GstRates) -> Self {
        Renderer {
            assets,
            issuer,
            rates,
            compress: false,
        }
    }

    /// Flate-compress page content. Off by default.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn rates(&self) -> GstRates {
        self.rates
    }

    fn canvas(&self, title: &str) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.set_title(title).set_compression(self.compress);
        canvas
    }

    /// Load `reference` and fit it into the box. Failures are logged and
    /// reported to the caller, which decides on a placeholder.
    fn place_image(
        &self,
        canvas: &mut Canvas,
        reference: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), AssetError> {
        let result = self
            .assets
            .load(reference)
            .and_then(|bytes| Ok(canvas.draw_image_bytes(bytes, x, y, width, height)?));
        if let Err(e) = &result {
            warn!(image = reference, error = %e, "image skipped");
        }
        result.map(|_| ())
    }
}

/// Cut a description to [`DESCRIPTION_LIMIT`] characters, marking the cut
/// with "...".
pub fn truncate_description(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
