//! PDF 1.4 serialisation of a laid-out document
//!
//! Only the standard Type 1 Courier faces are referenced, so nothing is
//! embedded. No timestamps are written: the same document always produces
//! the same bytes.

use std::fmt::Write as _;

use crate::schema::layout::{Font, Op, Page, PagedDocument};

const PRODUCER: &str = "vehicle-sale-deed";

/// Serialise pages to a complete PDF file
pub fn write_pdf(doc: &PagedDocument) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();

    // Fixed object numbers: 1 catalog, 2 page tree, 3 info, then fonts,
    // then a (page, content) pair per page
    let font_base = 4;
    let page_base = font_base + Font::all().len();
    let page_ids: Vec<usize> = (0..doc.pages.len()).map(|i| page_base + 2 * i).collect();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids,
        page_ids.len()
    ));

    objects.push(format!(
        "<< /Title {} /Producer {} >>",
        literal(&doc.title),
        literal(PRODUCER)
    ));

    for font in Font::all() {
        objects.push(format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            font.base_name()
        ));
    }

    let fonts = Font::all()
        .iter()
        .enumerate()
        .map(|(i, f)| format!("/{} {} 0 R", f.resource(), font_base + i))
        .collect::<Vec<_>>()
        .join(" ");

    for (page, id) in doc.pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << {} >> >> /Contents {} 0 R >>",
            num(doc.width),
            num(doc.height),
            fonts,
            id + 1
        ));
        let content = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body.as_bytes());
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = write!(xref, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R /Info 3 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

fn content_stream(page: &Page) -> String {
    let mut s = String::new();
    for op in &page.ops {
        match op {
            Op::Text {
                x,
                y,
                size,
                font,
                text,
            } => {
                let _ = writeln!(
                    s,
                    "BT /{} {} Tf {} {} Td {} Tj ET",
                    font.resource(),
                    num(*size),
                    num(*x),
                    num(*y),
                    literal(text)
                );
            }
            Op::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                dotted,
            } => {
                let dash = if *dotted { "[1 2] 0 d " } else { "" };
                let _ = writeln!(
                    s,
                    "q {} w {}{} {} m {} {} l S Q",
                    num(*width),
                    dash,
                    num(*x1),
                    num(*y1),
                    num(*x2),
                    num(*y2)
                );
            }
            Op::Rect { x, y, w, h, width } => {
                let _ = writeln!(
                    s,
                    "q {} w {} {} {} {} re S Q",
                    num(*width),
                    num(*x),
                    num(*y),
                    num(*w),
                    num(*h)
                );
            }
        }
    }
    s.truncate(s.trim_end().len());
    s
}

/// Fixed two-decimal number, trailing zeros dropped
fn num(value: f32) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// PDF literal string in WinAnsi encoding, written with ASCII escapes only
fn literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let code = win_ansi(c).unwrap_or(b'?');
                if code.is_ascii() {
                    out.push(code as char);
                } else {
                    let _ = write!(out, "\\{:03o}", code);
                }
            }
        }
    }
    out.push(')');
    out
}

/// WinAnsiEncoding code for characters outside printable ASCII
fn win_ansi(c: char) -> Option<u8> {
    let code = match c {
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\u{20ac}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\t' => b' ',
        _ => return None,
    };
    Some(code)
}
