use thiserror::Error;

/// Reasons an image cannot be embedded.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image data too short to detect format")]
    TooShort,
    #[error("unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
    #[error("JPEG has no SOF marker")]
    MissingFrame,
    #[error("JPEG SOF marker truncated")]
    TruncatedFrame,
    #[error("unsupported JPEG component count: {0} (expected 1, 3 or 4)")]
    JpegComponents(u8),
    #[error("PNG decode error: {0}")]
    Png(#[from] png::DecodingError),
    #[error("unsupported PNG color type: {0:?}")]
    PngColorType(png::ColorType),
    #[error("image has zero width or height")]
    Empty,
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// Decoded image ready to become an XObject.
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub space: ColorSpace,
    /// CMYK samples stored inverted, as Adobe applications write them.
    pub inverted: bool,
    /// Raw 8-bit samples for PNG; the untouched file for JPEG
    /// (embedded with DCTDecode).
    pub data: Vec<u8>,
    /// 8-bit alpha plane, written as a soft mask.
    pub alpha: Option<Vec<u8>>,
}

impl ImageData {
    /// Sniff the format from magic bytes and parse accordingly.
    pub fn from_bytes(data: Vec<u8>) -> Result<ImageData, ImageError> {
        let image = match detect_format(&data)? {
            ImageFormat::Jpeg => parse_jpeg(data)?,
            ImageFormat::Png => parse_png(&data)?,
        };
        if image.width == 0 || image.height == 0 {
            return Err(ImageError::Empty);
        }
        Ok(image)
    }

    pub fn color_space(&self) -> &'static str {
        self.space.pdf_name()
    }

    /// `/Decode` array flipping inverted CMYK samples back.
    pub fn decode(&self) -> Option<[i64; 8]> {
        match (self.space, self.inverted) {
            (ColorSpace::Cmyk, true) => Some([1, 0, 1, 0, 1, 0, 1, 0]),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::Gray => "DeviceGray",
            ColorSpace::Rgb => "DeviceRGB",
            ColorSpace::Cmyk => "DeviceCMYK",
        }
    }
}

pub fn detect_format(data: &[u8]) -> Result<ImageFormat, ImageError> {
    match data {
        [0xFF, 0xD8, _, _, ..] => Ok(ImageFormat::Jpeg),
        [0x89, b'P', b'N', b'G', ..] => Ok(ImageFormat::Png),
        _ if data.len() < 4 => Err(ImageError::TooShort),
        _ => Err(ImageError::UnsupportedFormat),
    }
}

fn parse_jpeg(data: Vec<u8>) -> Result<ImageData, ImageError> {
    let frame = jpeg_frame(&data)?;
    let space = match frame.components {
        1 => ColorSpace::Gray,
        3 => ColorSpace::Rgb,
        4 => ColorSpace::Cmyk,
        n => return Err(ImageError::JpegComponents(n)),
    };
    Ok(ImageData {
        width: frame.width,
        height: frame.height,
        format: ImageFormat::Jpeg,
        space,
        inverted: space == ColorSpace::Cmyk && frame.adobe,
        data,
        alpha: None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JpegFrame {
    width: u32,
    height: u32,
    components: u8,
    /// An APP14 "Adobe" segment preceded the frame.
    adobe: bool,
}

/// Walk JPEG segments until a SOF0..SOF3 frame header. Pixel data is
/// never decoded.
fn jpeg_frame(data: &[u8]) -> Result<JpegFrame, ImageError> {
    let mut adobe = false;
    let mut i = 2; // past SOI
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        match marker {
            0xC0..=0xC3 => {
                let frame = data.get(i + 5..i + 10).ok_or(ImageError::TruncatedFrame)?;
                return Ok(JpegFrame {
                    height: u16::from_be_bytes([frame[0], frame[1]]) as u32,
                    width: u16::from_be_bytes([frame[2], frame[3]]) as u32,
                    components: frame[4],
                    adobe,
                });
            }
            // Fill bytes and stuffed zeros.
            0xFF | 0x00 => i += 1,
            // Markers without a length field.
            0xD0..=0xD9 => i += 2,
            _ => {
                let Some(len) = data.get(i + 2..i + 4) else {
                    break;
                };
                if marker == 0xEE && data.get(i + 4..i + 9) == Some(&b"Adobe"[..]) {
                    adobe = true;
                }
                i += 2 + u16::from_be_bytes([len[0], len[1]]) as usize;
            }
        }
    }
    Err(ImageError::MissingFrame)
}

fn parse_png(data: &[u8]) -> Result<ImageData, ImageError> {
    let mut decoder = png::Decoder::new(data);
    // Palette, sub-byte and 16-bit images all come out as 8-bit samples.
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    buf.truncate(frame.buffer_size());

    let (space, data, alpha) = match frame.color_type {
        png::ColorType::Rgb => (ColorSpace::Rgb, buf, None),
        png::ColorType::Grayscale => (ColorSpace::Gray, buf, None),
        png::ColorType::Rgba => {
            let (rgb, alpha) = split_alpha(&buf, 3);
            (ColorSpace::Rgb, rgb, Some(alpha))
        }
        png::ColorType::GrayscaleAlpha => {
            let (gray, alpha) = split_alpha(&buf, 1);
            (ColorSpace::Gray, gray, Some(alpha))
        }
        other => return Err(ImageError::PngColorType(other)),
    };

    Ok(ImageData {
        width: frame.width,
        height: frame.height,
        format: ImageFormat::Png,
        space,
        inverted: false,
        data,
        alpha,
    })
}

/// Separate interleaved samples into color and alpha planes.
fn split_alpha(buf: &[u8], color_channels: usize) -> (Vec<u8>, Vec<u8>) {
    let stride = color_channels + 1;
    let pixels = buf.len() / stride;
    let mut color = Vec::with_capacity(pixels * color_channels);
    let mut alpha = Vec::with_capacity(pixels);
    for px in buf.chunks_exact(stride) {
        color.extend_from_slice(&px[..color_channels]);
        alpha.push(px[color_channels]);
    }
    (color, alpha)
}

/// Where an image lands on the page, in PDF points with a
/// bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ImageBox {
    /// Scale an `img_w` x `img_h` image into the box at (x, y) of size
    /// width x height, keeping its aspect ratio and centring it.
    pub fn fit(img_w: u32, img_h: u32, x: f64, y: f64, width: f64, height: f64) -> ImageBox {
        let iw = img_w as f64;
        let ih = img_h as f64;
        let scale = (width / iw).min(height / ih);
        let w = iw * scale;
        let h = ih * scale;
        ImageBox {
            x: x + (width - w) / 2.0,
            y: y + (height - h) / 2.0,
            width: w,
            height: h,
        }
    }
}
