use crate::writer::{escape_literal, format_number};

/// Indirect object number. Every object this crate emits uses
/// generation 0, so only the number is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32);

/// The subset of PDF object types (PDF 32000-1:2008 Section 7.3)
/// needed to describe pages, fonts, images and the document info.
#[derive(Debug, Clone)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// Name object, stored without the leading `/`.
    Name(String),
    /// Literal string as raw WinAnsi bytes, stored without the parens.
    Literal(Vec<u8>),
    Array(Vec<PdfObject>),
    /// Key order is preserved so output is byte-for-byte reproducible.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: impl Into<String>) -> Self {
        PdfObject::Name(s.into())
    }

    pub fn text(s: &str) -> Self {
        PdfObject::Literal(crate::fonts::winansi_bytes(s))
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(owned_keys(entries))
    }

    pub fn stream(entries: Vec<(&str, PdfObject)>, data: Vec<u8>) -> Self {
        PdfObject::Stream {
            dict: owned_keys(entries),
            data,
        }
    }

    /// A `[x0 y0 x1 y1]` rectangle array, used for MediaBox.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        PdfObject::Array(vec![
            PdfObject::Real(x0),
            PdfObject::Real(y0),
            PdfObject::Real(x1),
            PdfObject::Real(y1),
        ])
    }

    /// Append the PDF syntax for this object to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            PdfObject::Integer(n) => out.extend_from_slice(n.to_string().as_bytes()),
            PdfObject::Real(f) => out.extend_from_slice(format_number(*f).as_bytes()),
            PdfObject::Name(name) => {
                out.push(b'/');
                out.extend_from_slice(name.as_bytes());
            }
            PdfObject::Literal(bytes) => {
                out.push(b'(');
                out.extend_from_slice(&escape_literal(bytes));
                out.push(b')');
            }
            PdfObject::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.encode(out);
                }
                out.push(b']');
            }
            PdfObject::Dictionary(entries) => {
                encode_entries(entries, out);
                out.extend_from_slice(b" >>");
            }
            PdfObject::Stream { dict, data } => {
                encode_entries(dict, out);
                out.extend_from_slice(format!(" /Length {} >>\nstream\n", data.len()).as_bytes());
                out.extend_from_slice(data);
                out.extend_from_slice(b"\nendstream");
            }
            PdfObject::Reference(id) => {
                out.extend_from_slice(format!("{} 0 R", id.0).as_bytes());
            }
        }
    }
}

fn owned_keys(entries: Vec<(&str, PdfObject)>) -> Vec<(String, PdfObject)> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Writes `<< /K v /K v` without the closing delimiter so streams can
/// append `/Length` first.
fn encode_entries(entries: &[(String, PdfObject)], out: &mut Vec<u8>) {
    out.extend_from_slice(b"<<");
    for (key, val) in entries {
        out.extend_from_slice(b" /");
        out.extend_from_slice(key.as_bytes());
        out.push(b' ');
        val.encode(out);
    }
}
