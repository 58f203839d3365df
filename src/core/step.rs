//! Wizard steps in their fixed order

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One stage of the deed wizard
///
/// The declaration order is the navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormStep {
    Hero,
    SellerName,
    SellerCid,
    SellerLocation,
    BuyerName,
    BuyerCid,
    BuyerLocation,
    VehicleDetails,
    SalePrice,
    Witness,
    Review,
    Success,
}

/// Prefix shared by every step anchor
pub const ANCHOR_PREFIX: &str = "section-";

impl FormStep {
    /// Get all steps in navigation order
    pub fn all() -> &'static [FormStep] {
        &[
            FormStep::Hero,
            FormStep::SellerName,
            FormStep::SellerCid,
            FormStep::SellerLocation,
            FormStep::BuyerName,
            FormStep::BuyerCid,
            FormStep::BuyerLocation,
            FormStep::VehicleDetails,
            FormStep::SalePrice,
            FormStep::Witness,
            FormStep::Review,
            FormStep::Success,
        ]
    }

    /// Steps shown on the progress rail (the data-entry steps)
    pub fn data_entry() -> &'static [FormStep] {
        &FormStep::all()[1..10]
    }

    pub fn first() -> FormStep {
        FormStep::Hero
    }

    pub fn last() -> FormStep {
        FormStep::Success
    }

    /// Position of this step in the fixed order
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<FormStep> {
        FormStep::all().get(index).copied()
    }

    /// The step after this one, if any
    pub fn successor(&self) -> Option<FormStep> {
        FormStep::from_index(self.index() + 1)
    }

    /// The step before this one, if any
    pub fn predecessor(&self) -> Option<FormStep> {
        self.index().checked_sub(1).and_then(FormStep::from_index)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormStep::Hero => "hero",
            FormStep::SellerName => "seller-name",
            FormStep::SellerCid => "seller-cid",
            FormStep::SellerLocation => "seller-location",
            FormStep::BuyerName => "buyer-name",
            FormStep::BuyerCid => "buyer-cid",
            FormStep::BuyerLocation => "buyer-location",
            FormStep::VehicleDetails => "vehicle-details",
            FormStep::SalePrice => "sale-price",
            FormStep::Witness => "witness",
            FormStep::Review => "review",
            FormStep::Success => "success",
        }
    }

    /// Human-readable label for prompts and the progress rail
    pub fn label(&self) -> &'static str {
        match self {
            FormStep::Hero => "Welcome",
            FormStep::SellerName => "Seller name",
            FormStep::SellerCid => "Seller CID",
            FormStep::SellerLocation => "Seller location",
            FormStep::BuyerName => "Buyer name",
            FormStep::BuyerCid => "Buyer CID",
            FormStep::BuyerLocation => "Buyer location",
            FormStep::VehicleDetails => "Vehicle details",
            FormStep::SalePrice => "Sale price",
            FormStep::Witness => "Witness",
            FormStep::Review => "Review",
            FormStep::Success => "Done",
        }
    }

    /// Deterministic anchor identifier, `section-<step>`
    pub fn anchor(&self) -> String {
        format!("{}{}", ANCHOR_PREFIX, self.as_str())
    }

    pub fn from_anchor(anchor: &str) -> Option<FormStep> {
        anchor
            .strip_prefix(ANCHOR_PREFIX)
            .and_then(|s| s.parse().ok())
    }

    /// Entry and exit stages carry no fields and no validation
    pub fn is_terminal(&self) -> bool {
        matches!(self, FormStep::Hero | FormStep::Success)
    }
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown step '{0}' (expected one of: hero, seller-name, seller-cid, seller-location, buyer-name, buyer-cid, buyer-location, vehicle-details, sale-price, witness, review, success)")]
pub struct StepParseError(pub String);

impl FromStr for FormStep {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        FormStep::all()
            .iter()
            .copied()
            .find(|step| step.as_str() == wanted)
            .ok_or_else(|| StepParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_steps_in_order() {
        let all = FormStep::all();
        assert_eq!(all.len(), 12);
        for (i, step) in all.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
        assert_eq!(all.first(), Some(&FormStep::Hero));
        assert_eq!(all.last(), Some(&FormStep::Success));
    }

    #[test]
    fn test_successor_and_predecessor() {
        assert_eq!(FormStep::Hero.successor(), Some(FormStep::SellerName));
        assert_eq!(FormStep::Review.successor(), Some(FormStep::Success));
        assert_eq!(FormStep::Success.successor(), None);
        assert_eq!(FormStep::SellerName.predecessor(), Some(FormStep::Hero));
        assert_eq!(FormStep::Hero.predecessor(), None);
    }

    #[test]
    fn test_string_roundtrip() {
        for step in FormStep::all() {
            assert_eq!(step.as_str().parse::<FormStep>().unwrap(), *step);
        }
        assert_eq!("SALE_PRICE".parse::<FormStep>().unwrap(), FormStep::SalePrice);
        assert!("checkout".parse::<FormStep>().is_err());
    }

    #[test]
    fn test_anchor() {
        assert_eq!(FormStep::VehicleDetails.anchor(), "section-vehicle-details");
        assert_eq!(FormStep::from_anchor("section-witness"), Some(FormStep::Witness));
        assert_eq!(FormStep::from_anchor("witness"), None);
    }

    #[test]
    fn test_data_entry_steps() {
        let steps = FormStep::data_entry();
        assert_eq!(steps.len(), 9);
        assert_eq!(steps[0], FormStep::SellerName);
        assert_eq!(steps[8], FormStep::Witness);
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&FormStep::BuyerLocation).unwrap();
        assert_eq!(json, "\"buyer-location\"");
    }
}
