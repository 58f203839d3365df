//! Line wrapping and A4 pagination of the deed
//!
//! Layout produces positioned drawing operations in PDF points, origin at the
//! bottom-left of the page. Serialisation lives in [`crate::schema::pdf`].
//! The standard Courier faces have a fixed advance of 0.6 em, so widths are
//! computed from character counts and wrapping is deterministic.

use crate::schema::document::{DeedDocument, SignatureBlock, Span, SpanStyle};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 15.0;

const CHAR_ADVANCE_EM: f32 = 0.6;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const SIGNATURE_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 9.0;
const LEADING: f32 = 1.45;

const SIGNATURE_BOX_MM: f32 = 42.0;
const SIGNATURE_PAD_MM: f32 = 4.0;
/// Drop between wrapped lines of one signature value
const SIGNATURE_LINE_MM: f32 = 6.0;

/// Millimetres to points
pub fn mm(value: f32) -> f32 {
    value * 72.0 / 25.4
}

/// Width of a string set in Courier at the given size
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * CHAR_ADVANCE_EM * size
}

/// Characters that fit on a line of the given width
pub fn chars_per_line(width: f32, size: f32) -> usize {
    ((width / (CHAR_ADVANCE_EM * size)).floor() as usize).max(1)
}

/// The four standard Courier faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl Font {
    pub fn all() -> &'static [Font] {
        &[Font::Regular, Font::Bold, Font::Oblique, Font::BoldOblique]
    }

    pub fn base_name(&self) -> &'static str {
        match self {
            Font::Regular => "Courier",
            Font::Bold => "Courier-Bold",
            Font::Oblique => "Courier-Oblique",
            Font::BoldOblique => "Courier-BoldOblique",
        }
    }

    /// Resource name used inside page content streams
    pub fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Oblique => "F3",
            Font::BoldOblique => "F4",
        }
    }

    pub fn for_style(style: SpanStyle) -> Self {
        match (style.is_bold(), style.is_italic()) {
            (true, true) => Font::BoldOblique,
            (true, false) => Font::Bold,
            (false, true) => Font::Oblique,
            (false, false) => Font::Regular,
        }
    }
}

/// A positioned drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        dotted: bool,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        width: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<Op>,
}

impl Page {
    /// Text drawn on this page, one entry per text operation
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            Op::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// The laid-out deed, ready for serialisation
#[derive(Debug, Clone, PartialEq)]
pub struct PagedDocument {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

/// A styled fragment of one wrapped line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: SpanStyle,
}

fn push_run(runs: &mut Vec<Run>, text: &str, style: SpanStyle) {
    match runs.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => runs.push(Run {
            text: text.to_string(),
            style,
        }),
    }
}

fn run_len(runs: &[Run]) -> usize {
    runs.iter().map(|r| r.text.chars().count()).sum()
}

/// Split styled spans into whitespace-separated words, keeping style runs
fn words(spans: &[Span]) -> Vec<Vec<Run>> {
    let mut words = Vec::new();
    let mut current: Vec<Run> = Vec::new();
    let mut buf = [0u8; 4];
    for span in spans {
        for c in span.text.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                push_run(&mut current, c.encode_utf8(&mut buf), span.style);
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Break a word longer than a line into line-sized pieces
fn split_word(word: Vec<Run>, max: usize) -> Vec<Vec<Run>> {
    if run_len(&word) <= max {
        return vec![word];
    }
    let mut pieces = Vec::new();
    let mut current = Vec::new();
    let mut count = 0;
    let mut buf = [0u8; 4];
    for run in word {
        for c in run.text.chars() {
            if count == max {
                pieces.push(std::mem::take(&mut current));
                count = 0;
            }
            push_run(&mut current, c.encode_utf8(&mut buf), run.style);
            count += 1;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Greedy word wrap of styled spans to at most `max` characters per line
///
/// Whitespace collapses to single spaces. A space between two words of the
/// same style takes that style, so underlines stay continuous.
pub fn wrap_spans(spans: &[Span], max: usize) -> Vec<Vec<Run>> {
    let max = max.max(1);
    let mut lines = Vec::new();
    let mut line: Vec<Run> = Vec::new();
    let mut len = 0;

    for word in words(spans).into_iter().flat_map(|w| split_word(w, max)) {
        let wlen = run_len(&word);
        if len > 0 && len + 1 + wlen > max {
            lines.push(std::mem::take(&mut line));
            len = 0;
        }
        if len > 0 {
            let before = line.last().map(|r| r.style);
            let after = word.first().map(|r| r.style);
            let style = match (before, after) {
                (Some(a), Some(b)) if a == b => a,
                _ => SpanStyle::Plain,
            };
            push_run(&mut line, " ", style);
            len += 1;
        }
        for run in word {
            push_run(&mut line, &run.text, run.style);
        }
        len += wlen;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Word wrap of unstyled text
pub fn wrap_text(text: &str, max: usize) -> Vec<String> {
    let span = Span {
        text: text.to_string(),
        style: SpanStyle::Plain,
    };
    wrap_spans(std::slice::from_ref(&span), max)
        .iter()
        .map(|runs| runs.iter().map(|r| r.text.as_str()).collect())
        .collect()
}

/// Label plus one character of space before a signature value
fn label_width(label: &str, size: f32) -> f32 {
    text_width(label, size) + CHAR_ADVANCE_EM * size
}

/// Name and CID sub-fields of a signature box, values wrapped to the box
fn signature_rows(block: &SignatureBlock, w: f32) -> [(&'static str, Vec<String>); 2] {
    let size = SIGNATURE_SIZE;
    let inner = w - 2.0 * mm(SIGNATURE_PAD_MM);
    let row = |label: &'static str, value: &str| {
        let room = chars_per_line(inner - label_width(label, size), size);
        let mut lines = wrap_text(value, room);
        if lines.is_empty() {
            lines.push(String::new());
        }
        (label, lines)
    };
    [
        row(block.name_label, &block.name),
        row(block.cid_label, &block.cid),
    ]
}

/// Box height, growing one line step for each wrapped value line
fn signature_height(block: &SignatureBlock, w: f32) -> f32 {
    let extra: usize = signature_rows(block, w)
        .iter()
        .map(|(_, lines)| lines.len() - 1)
        .sum();
    mm(SIGNATURE_BOX_MM) + extra as f32 * mm(SIGNATURE_LINE_MM)
}

/// Places operations top to bottom, starting new pages as needed
struct Composer {
    width: f32,
    height: f32,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
    footer: String,
    pages: Vec<Page>,
    ops: Vec<Op>,
    y: f32,
}

impl Composer {
    fn new(footer: &str) -> Self {
        let width = mm(PAGE_WIDTH_MM);
        let height = mm(PAGE_HEIGHT_MM);
        let margin = mm(MARGIN_MM);
        Self {
            width,
            height,
            left: margin,
            right: width - margin,
            top: height - margin,
            // Room above the bottom margin for the footer line
            bottom: margin + mm(8.0),
            footer: footer.to_string(),
            pages: Vec::new(),
            ops: Vec::new(),
            y: height - margin,
        }
    }

    fn content_width(&self) -> f32 {
        self.right - self.left
    }

    fn remaining(&self) -> f32 {
        self.y - self.bottom
    }

    fn break_page(&mut self) {
        let text = self.footer.clone();
        let x = (self.width - text_width(&text, FOOTER_SIZE)) / 2.0;
        self.ops.push(Op::Text {
            x,
            y: mm(MARGIN_MM),
            size: FOOTER_SIZE,
            font: Font::Regular,
            text,
        });
        self.pages.push(Page {
            ops: std::mem::take(&mut self.ops),
        });
        self.y = self.top;
    }

    fn ensure(&mut self, needed: f32) {
        if self.remaining() < needed && self.y < self.top {
            self.break_page();
        }
    }

    fn gap(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn text(&mut self, x: f32, y: f32, size: f32, style: SpanStyle, text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(Op::Text {
            x,
            y,
            size,
            font: Font::for_style(style),
            text: text.to_string(),
        });
        if style.is_underlined() {
            self.ops.push(Op::Line {
                x1: x,
                y1: y - 1.5,
                x2: x + text_width(text, size),
                y2: y - 1.5,
                width: 0.6,
                dotted: false,
            });
        }
    }

    /// One line of plain text at a fixed horizontal position
    fn line_at(&mut self, x: f32, size: f32, style: SpanStyle, text: &str) {
        let leading = size * LEADING;
        self.ensure(leading);
        self.y -= leading;
        let y = self.y;
        self.text(x, y, size, style, text);
    }

    /// Wrapped styled paragraph between `indent` and the right margin
    fn paragraph(&mut self, spans: &[Span], size: f32, indent: f32, label: Option<&str>) {
        let leading = size * LEADING;
        let x0 = self.left + indent;
        let max = chars_per_line(self.right - x0, size);
        for (i, line) in wrap_spans(spans, max).into_iter().enumerate() {
            self.ensure(leading);
            self.y -= leading;
            let y = self.y;
            if i == 0 {
                if let Some(label) = label {
                    let left = self.left;
                    self.text(left, y, size, SpanStyle::Plain, label);
                }
            }
            let mut x = x0;
            for run in line {
                self.text(x, y, size, run.style, &run.text);
                x += text_width(&run.text, size);
            }
        }
    }

    fn signature_box(&mut self, block: &SignatureBlock, x: f32, top: f32, w: f32, h: f32) {
        let pad = mm(SIGNATURE_PAD_MM);
        let size = SIGNATURE_SIZE;
        self.ops.push(Op::Rect {
            x,
            y: top - h,
            w,
            h,
            width: 0.8,
        });
        self.text(x + pad, top - pad - size, size, SpanStyle::Strong, block.role);

        let mut y = top - mm(26.0);
        for (i, (label, lines)) in signature_rows(block, w).into_iter().enumerate() {
            if i > 0 {
                y -= mm(10.0);
            }
            let value_x = x + pad + label_width(label, size);
            self.text(x + pad, y, size, SpanStyle::Plain, label);
            for (j, line) in lines.iter().enumerate() {
                if j > 0 {
                    y -= mm(SIGNATURE_LINE_MM);
                }
                self.ops.push(Op::Line {
                    x1: value_x,
                    y1: y - 2.0,
                    x2: x + w - pad,
                    y2: y - 2.0,
                    width: 0.5,
                    dotted: true,
                });
                self.text(value_x, y, size, SpanStyle::Plain, line);
            }
        }
    }

    /// Two-column grid of signature boxes, kept together on one page
    fn signatures(&mut self, blocks: &[SignatureBlock]) {
        let col_gap = mm(8.0);
        let row_gap = mm(8.0);
        let box_w = (self.content_width() - col_gap) / 2.0;
        let heights: Vec<f32> = blocks
            .chunks(2)
            .map(|row| {
                row.iter()
                    .map(|block| signature_height(block, box_w))
                    .fold(0.0, f32::max)
            })
            .collect();
        let needed =
            heights.iter().sum::<f32>() + heights.len().saturating_sub(1) as f32 * row_gap;
        self.ensure(needed);

        for (row, box_h) in blocks.chunks(2).zip(heights) {
            let top = self.y;
            for (i, block) in row.iter().enumerate() {
                let x = self.left + i as f32 * (box_w + col_gap);
                self.signature_box(block, x, top, box_w, box_h);
            }
            self.y = top - box_h - row_gap;
        }
    }

    fn finish(mut self, title: &str) -> PagedDocument {
        self.break_page();
        PagedDocument {
            title: title.to_string(),
            width: self.width,
            height: self.height,
            pages: self.pages,
        }
    }
}

/// Lay the deed out on A4 pages
pub fn layout(doc: &DeedDocument) -> PagedDocument {
    let mut c = Composer::new(doc.footer);

    let title_w = text_width(doc.title, TITLE_SIZE);
    let x = (c.width - title_w) / 2.0;
    c.line_at(x, TITLE_SIZE, SpanStyle::Strong, doc.title);
    c.gap(mm(6.0));

    let x = c.right - text_width(&doc.date_line, BODY_SIZE);
    c.line_at(x, BODY_SIZE, SpanStyle::Plain, &doc.date_line);
    c.gap(mm(4.0));

    c.paragraph(&doc.narrative, BODY_SIZE, 0.0, None);
    c.gap(mm(4.0));

    for clause in &doc.covenants {
        let label = format!("{}.", clause.number);
        c.paragraph(&clause.spans, BODY_SIZE, mm(8.0), Some(&label));
        c.gap(mm(1.5));
    }
    c.gap(mm(2.5));

    let closing = [Span {
        text: doc.closing.to_string(),
        style: SpanStyle::Plain,
    }];
    c.paragraph(&closing, BODY_SIZE, 0.0, None);
    c.gap(mm(12.0));

    c.signatures(&doc.signatures);
    c.finish("Vehicle Sale Deed")
}
