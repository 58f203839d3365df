//! Plain-text rendering of the deed for terminal preview

use console::style;

use crate::schema::document::{DeedDocument, SpanStyle};
use crate::schema::layout::{wrap_spans, wrap_text, Run};

/// Narrowest width the preview is laid out at
pub const MIN_WIDTH: usize = 40;
/// Widest width the preview is laid out at, even on wide terminals
pub const MAX_WIDTH: usize = 100;

const CLAUSE_INDENT: usize = 4;

fn paint(run: &Run, styled: bool) -> String {
    if !styled || run.style == SpanStyle::Plain {
        return run.text.clone();
    }
    let mut s = style(run.text.as_str()).force_styling(true);
    if run.style.is_bold() {
        s = s.bold();
    }
    if run.style.is_underlined() {
        s = s.underlined();
    }
    if run.style.is_italic() {
        s = s.italic();
    }
    s.to_string()
}

fn centered(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let pad = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn right_aligned(text: &str, width: usize) -> String {
    format!("{:>width$}", text, width = width)
}

/// Render the deed wrapped to `width` columns
///
/// With `styled`, emphasis is drawn with terminal attributes. Line breaks
/// are the same either way.
pub fn render_text(doc: &DeedDocument, width: usize, styled: bool) -> String {
    let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
    let mut out: Vec<String> = Vec::new();

    let title = centered(doc.title, width);
    out.push(if styled {
        style(title).bold().force_styling(true).to_string()
    } else {
        title
    });
    out.push(String::new());
    out.push(right_aligned(&doc.date_line, width));
    out.push(String::new());

    for line in wrap_spans(&doc.narrative, width) {
        out.push(line.iter().map(|r| paint(r, styled)).collect());
    }
    out.push(String::new());

    for clause in &doc.covenants {
        let label = format!("{:>2}. ", clause.number);
        let hang = " ".repeat(CLAUSE_INDENT);
        for (i, line) in wrap_spans(&clause.spans, width - CLAUSE_INDENT)
            .iter()
            .enumerate()
        {
            let body: String = line.iter().map(|r| paint(r, styled)).collect();
            let lead = if i == 0 { label.as_str() } else { hang.as_str() };
            out.push(format!("{}{}", lead, body));
        }
    }
    out.push(String::new());

    out.extend(wrap_text(doc.closing, width));
    out.push(String::new());
    out.push("-".repeat(width));

    for block in &doc.signatures {
        out.push(String::new());
        out.push(if styled {
            style(block.role).bold().force_styling(true).to_string()
        } else {
            block.role.to_string()
        });
        out.push(format!("  {} {}", block.name_label, block.name));
        out.push(format!("  {} {}", block.cid_label, block.cid));
    }

    out.push(String::new());
    out.push(centered(doc.footer, width));

    let mut text = out.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::deed::{DeedModel, Title};
    use chrono::NaiveDate;

    fn doc() -> DeedDocument {
        let mut model = DeedModel::dated(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        model.seller.title = Title::Mr;
        model.seller.full_name = "Karma Dorji".to_string();
        model.seller.cid_number = "10705001234".to_string();
        model.buyer.full_name = "Pema Wangmo".to_string();
        model.witness.full_name = "Ugyen Tenzin".to_string();
        model.sale.price = "450000".to_string();
        DeedDocument::build(&model)
    }

    #[test]
    fn test_lines_fit_width() {
        for width in [40, 60, 80] {
            let text = render_text(&doc(), width, false);
            for line in text.lines() {
                assert!(line.chars().count() <= width, "{:?} wider than {}", line, width);
            }
        }
    }

    #[test]
    fn test_width_is_clamped() {
        let text = render_text(&doc(), 5, false);
        assert!(text.lines().any(|l| l.chars().count() > 5));
        let wide = render_text(&doc(), 500, false);
        assert!(wide.lines().all(|l| l.chars().count() <= MAX_WIDTH));
    }

    #[test]
    fn test_contains_sections_in_order() {
        let text = render_text(&doc(), 80, false);
        let order = [
            "SALE DEED",
            "Date: January 15, 2024",
            "I, Mr. Karma Dorji",
            " 1. ",
            " 6. ",
            "I request you to kindly process",
            "Seller",
            "Buyer Witness",
            "Vehicle Sale and Transfer Agreement",
        ];
        let mut at = 0;
        for needle in order {
            let found = text[at..].find(needle).unwrap_or_else(|| panic!("missing {}", needle));
            at += found + needle.len();
        }
    }

    #[test]
    fn test_amount_in_unstyled_preview() {
        let text = render_text(&doc(), 100, false);
        let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(flat.contains("Nu. 450,000 (four lakh fifty thousand only)"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_styled_preview_uses_attributes() {
        let text = render_text(&doc(), 80, true);
        assert!(text.contains('\u{1b}'));
        assert!(console::strip_ansi_codes(&text).contains("SALE DEED"));
    }

    #[test]
    fn test_signature_blocks_listed() {
        let text = render_text(&doc(), 80, false);
        assert!(text.contains("  Mr./Ms. Ugyen Tenzin"));
        assert!(text.contains("  CID No: 10705001234"));
        assert!(text.contains("  Mr./Ms. _________________________"));
    }
}
