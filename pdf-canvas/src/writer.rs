use crate::objects::{ObjId, PdfObject};

/// In-memory PDF serializer. Objects are appended to a byte buffer
/// while their offsets are recorded for the cross-reference table.
pub struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(u32, usize)>,
}

impl PdfWriter {
    /// Start a new file. The PDF 1.7 header is written immediately.
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(8 * 1024);
        buf.extend_from_slice(b"%PDF-1.7\n");
        // Four bytes >= 128 mark the file as binary for transfer tools.
        buf.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");
        PdfWriter {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Append an indirect object and remember where it starts.
    pub fn write_object(&mut self, id: ObjId, obj: &PdfObject) {
        self.offsets.push((id.0, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{} 0 obj\n", id.0).as_bytes());
        obj.encode(&mut self.buf);
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write the xref table and trailer, returning the finished file.
    pub fn finish(mut self, root: ObjId, info: Option<ObjId>) -> Vec<u8> {
        let xref_offset = self.buf.len();
        self.offsets.sort_by_key(|&(num, _)| num);
        let size = self.offsets.last().map(|&(num, _)| num).unwrap_or(0) + 1;

        self.buf
            .extend_from_slice(format!("xref\n0 {}\n", size).as_bytes());
        // Each entry is exactly 20 bytes including the CRLF.
        self.buf.extend_from_slice(b"0000000000 65535 f\r\n");
        let mut recorded = self.offsets.iter().peekable();
        for num in 1..size {
            match recorded.peek() {
                Some(&&(n, off)) if n == num => {
                    self.buf
                        .extend_from_slice(format!("{:010} 00000 n\r\n", off).as_bytes());
                    recorded.next();
                }
                _ => self.buf.extend_from_slice(b"0000000000 00000 f\r\n"),
            }
        }

        let mut trailer = format!("trailer\n<< /Size {} /Root {} 0 R", size, root.0);
        if let Some(info) = info {
            trailer.push_str(&format!(" /Info {} 0 R", info.0));
        }
        trailer.push_str(&format!(" >>\nstartxref\n{}\n%%EOF\n", xref_offset));
        self.buf.extend_from_slice(trailer.as_bytes());
        self.buf
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape the delimiters of a PDF literal string.
pub fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' | b'(' | b')' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(b),
        }
    }
    out
}

/// Format a number for PDF output: integers print bare, everything
/// else with at most four decimals and no trailing zeros.
pub fn format_number(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}
