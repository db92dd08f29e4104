use std::io::{self, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::fonts::{winansi_bytes, BuiltinFont, FontMetrics};
use crate::graphics::Color;
use crate::images::{ImageBox, ImageData, ImageError, ImageFormat};
use crate::objects::{ObjId, PdfObject};
use crate::writer::{escape_literal, format_number, PdfWriter};

/// A4 in points, the canvas default.
pub const A4_WIDTH: f64 = 595.27;
pub const A4_HEIGHT: f64 = 841.89;

const CATALOG_OBJ: ObjId = ObjId(1);
const PAGES_OBJ: ObjId = ObjId(2);
const FIRST_FONT_OBJ_NUM: u32 = 3;
const FIRST_FREE_OBJ_NUM: u32 = FIRST_FONT_OBJ_NUM + BuiltinFont::ALL.len() as u32;

const DEFAULT_FONT: BuiltinFont = BuiltinFont::Helvetica;
const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Absolute-coordinate drawing surface producing a PDF in memory.
///
/// Coordinates are PDF points with the origin at the bottom-left of
/// the page. Drawing calls append operators to the current page;
/// `show_page` flushes that page into the file and starts a fresh
/// one with the default graphics state (Helvetica 12, black).
///
/// ```
/// use pdf_canvas::{BuiltinFont, Canvas};
///
/// let mut c = Canvas::new();
/// c.set_font(BuiltinFont::HelveticaBold, 20.0);
/// c.draw_string(50.0, 800.0, "Hello");
/// let pdf = c.save().unwrap();
/// assert!(pdf.starts_with(b"%PDF-1.7"));
/// ```
pub struct Canvas {
    writer: PdfWriter,
    width: f64,
    height: f64,
    title: Option<String>,
    compress: bool,
    page_ids: Vec<ObjId>,
    page: PageState,
    next_obj_num: u32,
    image_count: usize,
}

/// Per-page accumulator. Replaced wholesale on every page break.
struct PageState {
    ops: Vec<u8>,
    xobjects: Vec<(String, ObjId)>,
    font: BuiltinFont,
    font_size: f64,
}

impl PageState {
    fn fresh() -> Self {
        PageState {
            ops: Vec::new(),
            xobjects: Vec::new(),
            font: DEFAULT_FONT,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Canvas {
    /// An A4 canvas.
    pub fn new() -> Self {
        Self::with_page_size(A4_WIDTH, A4_HEIGHT)
    }

    pub fn with_page_size(width: f64, height: f64) -> Self {
        let mut writer = PdfWriter::new();
        for (i, font) in BuiltinFont::ALL.iter().enumerate() {
            let dict = PdfObject::dict(vec![
                ("Type", PdfObject::name("Font")),
                ("Subtype", PdfObject::name("Type1")),
                ("BaseFont", PdfObject::name(font.pdf_base_name())),
                ("Encoding", PdfObject::name("WinAnsiEncoding")),
            ]);
            writer.write_object(ObjId(FIRST_FONT_OBJ_NUM + i as u32), &dict);
        }
        Canvas {
            writer,
            width,
            height,
            title: None,
            compress: false,
            page_ids: Vec::new(),
            page: PageState::fresh(),
            next_obj_num: FIRST_FREE_OBJ_NUM,
            image_count: 0,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    /// Flate-compress page content streams. Off by default so the
    /// operators stay readable.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    pub fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// 1-based number of the page currently being drawn.
    pub fn page_number(&self) -> usize {
        self.page_ids.len() + 1
    }

    /// Select the font for subsequent text.
    pub fn set_font(&mut self, font: BuiltinFont, size: f64) -> &mut Self {
        self.page.font = font;
        self.page.font_size = size;
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.push_op(format!(
            "{} {} {} rg\n",
            format_number(color.r),
            format_number(color.g),
            format_number(color.b)
        ))
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.push_op(format!(
            "{} {} {} RG\n",
            format_number(color.r),
            format_number(color.g),
            format_number(color.b)
        ))
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.push_op(format!("{} w\n", format_number(width)))
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.push_op("q\n".to_string())
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.push_op("Q\n".to_string())
    }

    /// Text with its baseline starting at (x, y).
    pub fn draw_string(&mut self, x: f64, y: f64, text: &str) -> &mut Self {
        let font = self.page.font;
        let size = self.page.font_size;
        let ops = &mut self.page.ops;
        ops.extend_from_slice(
            format!(
                "BT\n/{} {} Tf\n{} {} Td\n(",
                font.pdf_name(),
                format_number(size),
                format_number(x),
                format_number(y)
            )
            .as_bytes(),
        );
        ops.extend_from_slice(&escape_literal(&winansi_bytes(text)));
        ops.extend_from_slice(b") Tj\nET\n");
        self
    }

    /// Text whose right edge ends at x.
    pub fn draw_right_string(&mut self, x: f64, y: f64, text: &str) -> &mut Self {
        let w = self.string_width(text);
        self.draw_string(x - w, y, text)
    }

    /// Text horizontally centred on x.
    pub fn draw_centred_string(&mut self, x: f64, y: f64, text: &str) -> &mut Self {
        let w = self.string_width(text);
        self.draw_string(x - w / 2.0, y, text)
    }

    /// Width of `text` in the current font, in points.
    pub fn string_width(&self, text: &str) -> f64 {
        FontMetrics::measure_text(text, self.page.font, self.page.font_size)
    }

    /// Stroke a straight line.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        self.push_op(format!(
            "{} {} m\n{} {} l\nS\n",
            format_number(x1),
            format_number(y1),
            format_number(x2),
            format_number(y2)
        ))
    }

    /// Stroke a rectangle outline with its lower-left corner at (x, y).
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.push_op(format!(
            "{} {} {} {} re\nS\n",
            format_number(x),
            format_number(y),
            format_number(width),
            format_number(height)
        ))
    }

    /// Fill a rectangle with the current fill color.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.push_op(format!(
            "{} {} {} {} re\nf\n",
            format_number(x),
            format_number(y),
            format_number(width),
            format_number(height)
        ))
    }

    /// Draw an image inside the box at (x, y) of size width x height,
    /// scaled to fit with its aspect ratio preserved.
    pub fn draw_image(
        &mut self,
        image: &ImageData,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<ImageBox, ImageError> {
        let name = self.embed_image(image)?;
        let placed = ImageBox::fit(image.width, image.height, x, y, width, height);
        self.push_op(format!(
            "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
            format_number(placed.width),
            format_number(placed.height),
            format_number(placed.x),
            format_number(placed.y),
            name
        ));
        Ok(placed)
    }

    /// Decode raw JPEG/PNG bytes and draw them. Nothing is written to
    /// the page when decoding fails.
    pub fn draw_image_bytes(
        &mut self,
        data: Vec<u8>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<ImageBox, ImageError> {
        let image = ImageData::from_bytes(data)?;
        self.draw_image(&image, x, y, width, height)
    }

    pub fn draw_image_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<ImageBox, ImageError> {
        let data = std::fs::read(path)?;
        self.draw_image_bytes(data, x, y, width, height)
    }

    /// Finish the current page and start a new one.
    pub fn show_page(&mut self) -> io::Result<()> {
        let page = std::mem::replace(&mut self.page, PageState::fresh());
        self.write_page(page)
    }

    /// Finish the document. A page with pending content is closed
    /// first; a canvas nobody drew on still yields one blank page.
    pub fn save(mut self) -> io::Result<Vec<u8>> {
        if !self.page.ops.is_empty() || self.page_ids.is_empty() {
            self.show_page()?;
        }

        let mut info = vec![("Producer", PdfObject::text("pdf-canvas"))];
        if let Some(title) = &self.title {
            info.push(("Title", PdfObject::text(title)));
        }
        let info_id = self.alloc();
        self.writer.write_object(info_id, &PdfObject::dict(info));

        let kids: Vec<PdfObject> = self
            .page_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages);

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog);

        Ok(self.writer.finish(CATALOG_OBJ, Some(info_id)))
    }

    fn push_op(&mut self, op: String) -> &mut Self {
        self.page.ops.extend_from_slice(op.as_bytes());
        self
    }

    fn alloc(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num);
        self.next_obj_num += 1;
        id
    }

    fn write_page(&mut self, page: PageState) -> io::Result<()> {
        let content_id = self.alloc();
        let page_id = self.alloc();

        let content = if self.compress {
            PdfObject::stream(
                vec![("Filter", PdfObject::name("FlateDecode"))],
                deflate(&page.ops)?,
            )
        } else {
            PdfObject::stream(vec![], page.ops)
        };
        self.writer.write_object(content_id, &content);

        let fonts: Vec<(&str, PdfObject)> = BuiltinFont::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| {
                (
                    f.pdf_name(),
                    PdfObject::Reference(ObjId(FIRST_FONT_OBJ_NUM + i as u32)),
                )
            })
            .collect();
        let mut resources = vec![("Font", PdfObject::dict(fonts))];
        if !page.xobjects.is_empty() {
            let xobjects: Vec<(&str, PdfObject)> = page
                .xobjects
                .iter()
                .map(|(name, id)| (name.as_str(), PdfObject::Reference(*id)))
                .collect();
            resources.push(("XObject", PdfObject::dict(xobjects)));
        }

        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            ("MediaBox", PdfObject::rect(0.0, 0.0, self.width, self.height)),
            ("Contents", PdfObject::Reference(content_id)),
            ("Resources", PdfObject::dict(resources)),
        ]);
        self.writer.write_object(page_id, &page_dict);
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Write the image (and its soft mask) as XObjects and register
    /// it on the current page. Returns the resource name.
    fn embed_image(&mut self, image: &ImageData) -> Result<String, ImageError> {
        let smask_id = match &image.alpha {
            Some(alpha) => {
                let id = self.alloc();
                let smask = PdfObject::stream(
                    vec![
                        ("Type", PdfObject::name("XObject")),
                        ("Subtype", PdfObject::name("Image")),
                        ("Width", PdfObject::Integer(image.width as i64)),
                        ("Height", PdfObject::Integer(image.height as i64)),
                        ("ColorSpace", PdfObject::name("DeviceGray")),
                        ("BitsPerComponent", PdfObject::Integer(8)),
                        ("Filter", PdfObject::name("FlateDecode")),
                    ],
                    deflate(alpha)?,
                );
                self.writer.write_object(id, &smask);
                Some(id)
            }
            None => None,
        };

        let (filter, data) = match image.format {
            ImageFormat::Jpeg => ("DCTDecode", image.data.clone()),
            ImageFormat::Png => ("FlateDecode", deflate(&image.data)?),
        };
        let mut dict = vec![
            ("Type", PdfObject::name("XObject")),
            ("Subtype", PdfObject::name("Image")),
            ("Width", PdfObject::Integer(image.width as i64)),
            ("Height", PdfObject::Integer(image.height as i64)),
            ("ColorSpace", PdfObject::name(image.color_space())),
            ("BitsPerComponent", PdfObject::Integer(8)),
            ("Filter", PdfObject::name(filter)),
        ];
        if let Some(decode) = image.decode() {
            let values = decode.iter().map(|&v| PdfObject::Integer(v)).collect();
            dict.push(("Decode", PdfObject::Array(values)));
        }
        if let Some(id) = smask_id {
            dict.push(("SMask", PdfObject::Reference(id)));
        }

        let id = self.alloc();
        self.writer.write_object(id, &PdfObject::stream(dict, data));

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        self.page.xobjects.push((name.clone(), id));
        Ok(name)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_page_resets_font() {
        let mut c = Canvas::new();
        c.set_font(BuiltinFont::HelveticaBold, 20.0);
        c.show_page().unwrap();
        assert_eq!(c.page.font, DEFAULT_FONT);
        assert_eq!(c.page.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(c.page_number(), 2);
    }

    #[test]
    fn right_string_ends_at_x() {
        let mut c = Canvas::new();
        c.set_font(BuiltinFont::Helvetica, 10.0);
        // "Rs" is 12.22pt wide at 10pt.
        c.draw_right_string(100.0, 50.0, "Rs");
        let ops = String::from_utf8_lossy(&c.page.ops).into_owned();
        assert!(ops.contains("87.78 50 Td"), "{}", ops);
    }

    #[test]
    fn centred_string_straddles_x() {
        let mut c = Canvas::new();
        c.set_font(BuiltinFont::Helvetica, 10.0);
        c.draw_centred_string(100.0, 50.0, "Rs");
        let ops = String::from_utf8_lossy(&c.page.ops).into_owned();
        assert!(ops.contains("93.89 50 Td"), "{}", ops);
    }

    #[test]
    fn deflate_round_trips() {
        use flate2::read::ZlibDecoder;
        use std::io::Read;

        let packed = deflate(b"0 0 m 10 10 l S").unwrap();
        let mut out = String::new();
        ZlibDecoder::new(packed.as_slice())
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "0 0 m 10 10 l S");
    }
}
