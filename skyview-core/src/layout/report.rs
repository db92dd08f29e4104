//! Availability report: a header followed by one fixed-height block per
//! available billboard, breaking pages when the cursor runs low.

use chrono::NaiveDate;
use pdf_canvas::{BuiltinFont, Canvas, Color};
use tracing::info;

use super::{truncate_description, Renderer, CYAN, MUTED, NAVY, RULE, SUBTLE};
use crate::error::RenderError;
use crate::models::Billboard;

pub const REPORT_TITLE: &str = "Skyview Availability Report";
pub const EMPTY_MESSAGE: &str = "No available billboards found at this time.";

const LEFT: f64 = 50.0;
const RIGHT: f64 = 545.0;

/// First block baseline on page one, below the full header.
pub const FIRST_PAGE_TOP: f64 = 740.0;
/// First block baseline on continuation pages.
pub const CONTINUATION_TOP: f64 = 800.0;
/// A block never starts below this line.
pub const MIN_BLOCK_Y: f64 = 180.0;
/// Vertical space each block consumes, whatever its content.
pub const BLOCK_HEIGHT: f64 = 170.0;

const IMAGE_WIDTH: f64 = 150.0;
const IMAGE_HEIGHT: f64 = 80.0;

/// Pages the report needs for `blocks` billboards.
pub fn page_count(blocks: usize) -> usize {
    let first = blocks_per_page(FIRST_PAGE_TOP);
    if blocks <= first {
        return 1;
    }
    let rest = blocks - first;
    1 + rest.div_ceil(blocks_per_page(CONTINUATION_TOP))
}

fn blocks_per_page(top: f64) -> usize {
    (((top - MIN_BLOCK_Y) / BLOCK_HEIGHT).floor() as usize) + 1
}

impl Renderer<'_> {
    /// Render the report for already-selected billboards. An empty slice
    /// yields a single page carrying [`EMPTY_MESSAGE`].
    pub fn render_availability(
        &self,
        boards: &[&Billboard],
        date: NaiveDate,
    ) -> Result<Vec<u8>, RenderError> {
        let mut canvas = self.canvas(REPORT_TITLE);
        draw_header(&mut canvas, date);

        let mut y = FIRST_PAGE_TOP;
        if boards.is_empty() {
            canvas.set_font(BuiltinFont::Helvetica, 12.0);
            canvas.set_fill_color(Color::BLACK);
            canvas.draw_string(LEFT, y, EMPTY_MESSAGE);
        }
        for board in boards {
            if y < MIN_BLOCK_Y {
                canvas.show_page()?;
                y = CONTINUATION_TOP;
                draw_continuation_header(&mut canvas);
            }
            self.draw_block(&mut canvas, board, y);
            y -= BLOCK_HEIGHT - 10.0;
            canvas.set_stroke_color(RULE);
            canvas.line(LEFT, y + 15.0, RIGHT, y + 15.0);
            y -= 10.0;
        }

        let pages = canvas.page_number();
        let pdf = canvas.save()?;
        info!(boards = boards.len(), pages, "availability report rendered");
        Ok(pdf)
    }

    fn draw_block(&self, canvas: &mut Canvas, board: &Billboard, y: f64) {
        canvas.set_font(BuiltinFont::HelveticaBold, 14.0);
        canvas.set_fill_color(NAVY);
        canvas.draw_string(LEFT, y, &board.title);

        canvas.set_font(BuiltinFont::HelveticaBold, 12.0);
        canvas.set_fill_color(CYAN);
        canvas.draw_right_string(RIGHT, y, &format!("\u{20b9}{}/mo", board.price_per_month));

        canvas.set_font(BuiltinFont::Helvetica, 10.0);
        canvas.set_fill_color(Color::BLACK);
        canvas.draw_string(LEFT, y - 15.0, &format!("Location: {}", board.location));
        canvas.draw_string(
            LEFT,
            y - 28.0,
            &format!("Size: {} | Total Area: {} sqft", board.size, board.sqft),
        );

        canvas.set_font(BuiltinFont::HelveticaOblique, 9.0);
        canvas.set_fill_color(MUTED);
        canvas.draw_string(LEFT, y - 42.0, &truncate_description(&board.description));

        if let Some(reference) = board.image_ref() {
            let placed =
                self.place_image(canvas, reference, LEFT, y - 130.0, IMAGE_WIDTH, IMAGE_HEIGHT);
            if placed.is_err() {
                canvas.set_font(BuiltinFont::Helvetica, 8.0);
                canvas.draw_string(LEFT, y - 60.0, "[Image load error]");
            }
        }
    }
}

fn draw_header(canvas: &mut Canvas, date: NaiveDate) {
    canvas.set_font(BuiltinFont::HelveticaBold, 20.0);
    canvas.set_fill_color(NAVY);
    canvas.draw_string(LEFT, 800.0, "SKYVIEW BILLBOARDS");

    canvas.set_font(BuiltinFont::Helvetica, 12.0);
    canvas.set_fill_color(SUBTLE);
    canvas.draw_string(
        LEFT,
        780.0,
        &format!("Availability Report - {}", date.format("%d %B %Y")),
    );

    canvas.set_stroke_color(CYAN);
    canvas.line(LEFT, 770.0, RIGHT, 770.0);
}

fn draw_continuation_header(canvas: &mut Canvas) {
    canvas.set_font(BuiltinFont::HelveticaBold, 10.0);
    canvas.set_fill_color(CYAN);
    canvas.draw_string(LEFT, 820.0, "SKYVIEW BILLBOARDS (cont.)");
    canvas.line(LEFT, 815.0, RIGHT, 815.0);
}
