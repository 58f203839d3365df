//! Deed data model - the document under construction

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Honorific placed before a party's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Title {
    #[default]
    #[serde(rename = "Mr.")]
    Mr,
    #[serde(rename = "Ms.")]
    Ms,
    #[serde(rename = "Mrs.")]
    Mrs,
    #[serde(rename = "Dr.")]
    Dr,
}

impl Title {
    pub fn all() -> &'static [Title] {
        &[Title::Mr, Title::Ms, Title::Mrs, Title::Dr]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Title::Mr => "Mr.",
            Title::Ms => "Ms.",
            Title::Mrs => "Mrs.",
            Title::Dr => "Dr.",
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown title '{0}' (expected Mr., Ms., Mrs. or Dr.)")]
pub struct TitleParseError(pub String);

impl FromStr for Title {
    type Err = TitleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches('.').to_ascii_lowercase().as_str() {
            "mr" => Ok(Title::Mr),
            "ms" => Ok(Title::Ms),
            "mrs" => Ok(Title::Mrs),
            "dr" => Ok(Title::Dr),
            _ => Err(TitleParseError(s.to_string())),
        }
    }
}

/// Seller or buyer details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Party {
    pub title: Title,
    pub full_name: String,
    /// 11-digit citizenship identity card number, or empty
    pub cid_number: String,
    /// Sub-district
    pub gewog: String,
    /// District
    pub dzongkhag: String,
}

impl Party {
    /// Title and name as printed on the deed, e.g. "Mr. Karma Dorji"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.title, self.full_name)
    }
}

/// Vehicle identification as it appears in the registration book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vehicle {
    pub model: String,
    /// Stored upper-cased
    pub registration_number: String,
    /// Stored upper-cased
    pub chassis_number: String,
    /// Stored upper-cased
    pub engine_number: String,
}

/// The single attesting witness
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Witness {
    pub title: Title,
    pub full_name: String,
    pub cid_number: String,
}

/// Sale terms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sale {
    /// Positive integer amount in Ngultrum without separators, or empty
    pub price: String,
    pub is_non_refundable: bool,
}

impl Sale {
    /// Price as an integer, when one has been entered
    pub fn amount(&self) -> Option<u64> {
        self.price.parse().ok()
    }
}

/// The complete deed under construction
///
/// Field groups are replaced wholesale on edit; see
/// [`DeedSession`](crate::core::session::DeedSession) for the single
/// mutation entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeedModel {
    pub seller: Party,
    pub buyer: Party,
    pub vehicle: Vehicle,
    pub witness: Witness,
    pub sale: Sale,
    /// Execution date, `YYYY-MM-DD` on the wire
    pub date: NaiveDate,
}

impl Default for DeedModel {
    fn default() -> Self {
        Self::dated(Local::now().date_naive())
    }
}

impl DeedModel {
    /// An empty deed dated on the given day
    pub fn dated(date: NaiveDate) -> Self {
        Self {
            seller: Party::default(),
            buyer: Party::default(),
            vehicle: Vehicle::default(),
            witness: Witness::default(),
            sale: Sale::default(),
            date,
        }
    }

    /// True when nothing but the date has been filled in
    pub fn is_blank(&self) -> bool {
        *self == Self::dated(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let model = DeedModel::default();
        assert_eq!(model.seller.title, Title::Mr);
        assert_eq!(model.buyer.title, Title::Mr);
        assert_eq!(model.witness.title, Title::Mr);
        assert!(model.seller.full_name.is_empty());
        assert!(model.vehicle.registration_number.is_empty());
        assert!(model.sale.price.is_empty());
        assert!(!model.sale.is_non_refundable);
        assert_eq!(model.date, Local::now().date_naive());
        assert!(model.is_blank());
    }

    #[test]
    fn test_json_uses_camel_case_and_iso_date() {
        let mut model = DeedModel::dated(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        model.seller.full_name = "Karma Dorji".to_string();
        model.sale.is_non_refundable = true;

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["seller"]["fullName"], "Karma Dorji");
        assert_eq!(json["seller"]["title"], "Mr.");
        assert_eq!(json["sale"]["isNonRefundable"], true);
        assert_eq!(json["vehicle"]["registrationNumber"], "");
        assert_eq!(json["date"], "2024-01-15");
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let json = r#"{"seller": {"fullName": "Karma Dorji", "title": "Dr."}, "date": "2024-01-15"}"#;
        let model: DeedModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.seller.full_name, "Karma Dorji");
        assert_eq!(model.seller.title, Title::Dr);
        assert!(model.seller.cid_number.is_empty());
        assert_eq!(model.buyer, Party::default());
        assert!(!model.is_blank());
    }

    #[test]
    fn test_title_parsing() {
        assert_eq!("Mrs.".parse::<Title>().unwrap(), Title::Mrs);
        assert_eq!("ms".parse::<Title>().unwrap(), Title::Ms);
        assert_eq!(" DR ".parse::<Title>().unwrap(), Title::Dr);
        assert!("Sir".parse::<Title>().is_err());
    }

    #[test]
    fn test_display_name() {
        let party = Party {
            title: Title::Ms,
            full_name: "Pema Wangmo".to_string(),
            ..Default::default()
        };
        assert_eq!(party.display_name(), "Ms. Pema Wangmo");
    }

    #[test]
    fn test_sale_amount() {
        let sale = Sale {
            price: "450000".to_string(),
            is_non_refundable: false,
        };
        assert_eq!(sale.amount(), Some(450_000));
        assert_eq!(Sale::default().amount(), None);
    }
}
