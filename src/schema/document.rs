//! The sale deed template, defined once as data
//!
//! [`DeedDocument::build`] interpolates a [`DeedModel`] into the fixed legal
//! text. Every output target (markup, plain text, paginated file) walks the
//! resulting structure instead of carrying its own copy of the wording.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::words::amount_in_words;
use crate::entities::deed::DeedModel;

pub const DOCUMENT_TITLE: &str = "SALE DEED";
pub const FOOTER_LABEL: &str = "Vehicle Sale and Transfer Agreement";
pub const NAME_LABEL: &str = "Mr./Ms.";
pub const CID_LABEL: &str = "CID No:";
/// Placeholder printed where a signatory is filled in by hand
pub const BLANK_LINE: &str = "_________________________";

const CLOSING: &str = "I request you to kindly process the sale deed accordingly, change the vehicle ownership as per rule of Bhutan Construction and Transport Authority and acknowledge receipt of this application.";

/// The six covenants as (text, emphasised) segments
const COVENANTS: [&[(&str, bool)]; 6] = [
    &[
        ("Ownership transfer", true),
        (" shall be completed by the buyer within fifteen (15) days from the date of this agreement.", false),
    ],
    &[
        ("There is ", false),
        ("no outstanding loan", true),
        (" or any legal issue related to the vehicle mentioned above.", false),
    ],
    &[
        ("The transaction has been carried out ", false),
        ("mutually and willingly", true),
        (" by both parties at an agreed price.", false),
    ],
    &[
        ("The vehicle has been sold on a ", false),
        ("non-refundable basis", true),
        (", and the full risk and responsibility is transferred to the buyer from the day of execution.", false),
    ],
    &[
        ("At the time of signing this agreement, ", false),
        ("both parties are mentally sound", true),
        (" and ", false),
        ("not under the influence of alcohol", true),
        (".", false),
    ],
    &[
        ("Any breach of this agreement shall be dealt with in accordance with the ", false),
        ("laws of the Kingdom of Bhutan", true),
        (".", false),
    ],
];

/// How a run of text is emphasised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanStyle {
    Plain,
    Strong,
    /// Strong and underlined (identifiers and the amount)
    Marked,
    Italic,
}

impl SpanStyle {
    pub fn is_bold(&self) -> bool {
        matches!(self, SpanStyle::Strong | SpanStyle::Marked)
    }

    pub fn is_underlined(&self) -> bool {
        matches!(self, SpanStyle::Marked)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, SpanStyle::Italic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

impl Span {
    fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::Plain)
    }

    fn strong(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::Strong)
    }

    fn marked(text: impl Into<String>) -> Self {
        Self::new(text, SpanStyle::Marked)
    }
}

/// Concatenate spans into unstyled text
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// A numbered covenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub number: usize,
    pub spans: Vec<Span>,
}

/// A boxed signature area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureBlock {
    pub role: &'static str,
    pub name_label: &'static str,
    pub name: String,
    pub cid_label: &'static str,
    pub cid: String,
}

impl SignatureBlock {
    fn filled(role: &'static str, name: &str, cid: &str) -> Self {
        Self {
            role,
            name_label: NAME_LABEL,
            name: name.to_string(),
            cid_label: CID_LABEL,
            cid: cid.to_string(),
        }
    }

    /// Signatory with no field in the deed, completed by hand
    fn blank(role: &'static str) -> Self {
        Self::filled(role, BLANK_LINE, BLANK_LINE)
    }
}

/// The rendered deed, independent of any output target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeedDocument {
    pub title: &'static str,
    pub date_line: String,
    pub narrative: Vec<Span>,
    pub covenants: Vec<Clause>,
    pub closing: &'static str,
    pub signatures: Vec<SignatureBlock>,
    pub footer: &'static str,
}

impl DeedDocument {
    pub fn build(model: &DeedModel) -> Self {
        let date = format_long_date(model.date);
        Self {
            title: DOCUMENT_TITLE,
            date_line: format!("Date: {}", date),
            narrative: narrative(model),
            covenants: covenants(),
            closing: CLOSING,
            signatures: vec![
                SignatureBlock::filled("Seller", &model.seller.full_name, &model.seller.cid_number),
                SignatureBlock::filled("Buyer", &model.buyer.full_name, &model.buyer.cid_number),
                SignatureBlock::filled(
                    "Seller Witness",
                    &model.witness.full_name,
                    &model.witness.cid_number,
                ),
                SignatureBlock::blank("Buyer Witness"),
            ],
            footer: FOOTER_LABEL,
        }
    }

    /// Narrative paragraph without styling
    pub fn narrative_text(&self) -> String {
        plain_text(&self.narrative)
    }
}

fn narrative(model: &DeedModel) -> Vec<Span> {
    let seller = &model.seller;
    let buyer = &model.buyer;
    let vehicle = &model.vehicle;
    let amount = format_amount(model.sale.amount().unwrap_or(0));
    let words = amount_in_words(&model.sale.price);

    vec![
        Span::plain("I, "),
        Span::strong(seller.display_name()),
        Span::plain(", holding CID No. "),
        Span::marked(&seller.cid_number),
        Span::plain(format!(
            " from {}, {}, hereby undersigned, hereby apply for the sale deed of the following vehicle model ",
            seller.gewog, seller.dzongkhag
        )),
        Span::strong(&vehicle.model),
        Span::plain(" with vehicle registration number "),
        Span::marked(&vehicle.registration_number),
        Span::plain(" to the buyer "),
        Span::strong(buyer.display_name()),
        Span::plain(" holding CID No. "),
        Span::marked(&buyer.cid_number),
        Span::plain(format!(
            " of {} (Gewog), {} (Dzongkhag). The above-mentioned vehicle Chassis No. ",
            buyer.gewog, buyer.dzongkhag
        )),
        Span::strong(&vehicle.chassis_number),
        Span::plain(" and Engine number "),
        Span::strong(&vehicle.engine_number),
        Span::plain(" simultaneously. I agree to sell the above-mentioned vehicle to you for the sum of "),
        Span::marked(format!("Nu. {}", amount)),
        Span::plain(" ("),
        Span::new(words, SpanStyle::Italic),
        Span::plain(" only)."),
    ]
}

fn covenants() -> Vec<Clause> {
    COVENANTS
        .iter()
        .enumerate()
        .map(|(i, segments)| Clause {
            number: i + 1,
            spans: segments
                .iter()
                .map(|(text, strong)| {
                    if *strong {
                        Span::strong(*text)
                    } else {
                        Span::plain(*text)
                    }
                })
                .collect(),
        })
        .collect()
}

/// Long-form date, e.g. "January 15, 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Integer with comma thousands separators, e.g. "450,000"
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
