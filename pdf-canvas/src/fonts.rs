/// The standard-14 fonts the canvas can select. They need no
/// embedding; every viewer ships them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 3] = [
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
    ];

    /// Resource name used in content streams (e.g. "F1").
    pub fn pdf_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
            BuiltinFont::HelveticaOblique => "F3",
        }
    }

    /// PDF BaseFont name.
    pub fn pdf_base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    pub fn from_name(name: &str) -> Option<BuiltinFont> {
        BuiltinFont::ALL
            .into_iter()
            .find(|f| f.pdf_base_name() == name)
    }
}

/// Helvetica widths for ASCII 32..=126 in 1/1000 em (Adobe AFM).
/// Helvetica-Oblique shares these metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333,
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 278, 278, 584, 584,
    584, 556, 1015, 667, 667, 722, 722, 667, 611, 778,
    722, 278, 500, 667, 556, 833, 722, 778, 667, 778,
    722, 667, 611, 722, 667, 944, 667, 667, 611, 278,
    278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500,
    500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for ASCII 32..=126 in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333,
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 333, 333, 584, 584,
    584, 611, 975, 722, 722, 722, 722, 667, 611, 778,
    722, 278, 556, 722, 611, 833, 722, 778, 667, 778,
    722, 667, 611, 722, 667, 944, 667, 667, 611, 333,
    278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556,
    500, 389, 280, 389, 584,
];

/// Helvetica widths for WinAnsi 128..=255. Zero marks codes the
/// encoding leaves undefined.
#[rustfmt::skip]
const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556,   0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000,   0, 611,   0,
      0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944,   0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold widths for WinAnsi 128..=255.
#[rustfmt::skip]
const HELVETICA_BOLD_HIGH_WIDTHS: [u16; 128] = [
    556,   0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000,   0, 611,   0,
      0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944,   0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Width used for control codes and undefined WinAnsi slots (1/1000 em).
const DEFAULT_WIDTH: u16 = 556;

/// Metrics for the builtin fonts, used to right-align and centre text.
pub struct FontMetrics;

impl FontMetrics {
    /// Width of a single WinAnsi code in 1/1000 em.
    pub fn code_width(font: BuiltinFont, code: u8) -> u16 {
        let bold = font == BuiltinFont::HelveticaBold;
        let width = match code {
            32..=126 if bold => HELVETICA_BOLD_WIDTHS[(code - 32) as usize],
            32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
            128..=255 if bold => HELVETICA_BOLD_HIGH_WIDTHS[(code - 128) as usize],
            128..=255 => HELVETICA_HIGH_WIDTHS[(code - 128) as usize],
            _ => 0,
        };
        if width == 0 {
            DEFAULT_WIDTH
        } else {
            width
        }
    }

    /// Width of `text` in points, measured on the bytes that will
    /// actually be written (after WinAnsi substitution).
    pub fn measure_text(text: &str, font: BuiltinFont, font_size: f64) -> f64 {
        let total: u32 = winansi_bytes(text)
            .into_iter()
            .map(|code| Self::code_width(font, code) as u32)
            .sum();
        total as f64 * font_size / 1000.0
    }
}

/// Encode text for a WinAnsiEncoding simple font.
///
/// Latin-1 passes through, the common typographic punctuation maps to
/// its WinAnsi slot, and the rupee sign becomes "Rs." since none of the
/// standard fonts carry it. Anything else prints as '?'.
pub fn winansi_bytes(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ' '..='~' => out.push(ch as u8),
            '\u{a0}'..='\u{ff}' => out.push(ch as u32 as u8),
            '\u{20b9}' => out.extend_from_slice(b"Rs."),
            '\u{20ac}' => out.push(0x80),
            '\u{2026}' => out.push(0x85),
            '\u{2018}' => out.push(0x91),
            '\u{2019}' => out.push(0x92),
            '\u{201c}' => out.push(0x93),
            '\u{201d}' => out.push(0x94),
            '\u{2022}' => out.push(0x95),
            '\u{2013}' => out.push(0x96),
            '\u{2014}' => out.push(0x97),
            '\t' => out.push(b' '),
            _ => out.push(b'?'),
        }
    }
    out
}
