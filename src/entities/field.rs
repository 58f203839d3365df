//! Field identifiers and entry sanitisation
//!
//! Every editable leaf of [`DeedModel`] has a [`FieldId`]. Raw user input
//! passes through [`FieldId::sanitize`] before it may reach the model, which
//! is what keeps CID and price values clean on every entry path.

use miette::Diagnostic;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::step::FormStep;
use crate::entities::deed::{DeedModel, Title};

/// Length of a citizenship identity card number
pub const CID_LENGTH: usize = 11;

/// Field group a field belongs to; edits replace a whole group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Seller,
    Buyer,
    Vehicle,
    Witness,
    Sale,
}

impl FieldGroup {
    pub fn label(&self) -> &'static str {
        match self {
            FieldGroup::Seller => "Seller",
            FieldGroup::Buyer => "Buyer",
            FieldGroup::Vehicle => "Vehicle",
            FieldGroup::Witness => "Witness",
            FieldGroup::Sale => "Sale",
        }
    }
}

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Text,
    UpperText,
    Cid,
    Price,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    SellerTitle,
    SellerFullName,
    SellerCid,
    SellerGewog,
    SellerDzongkhag,
    BuyerTitle,
    BuyerFullName,
    BuyerCid,
    BuyerGewog,
    BuyerDzongkhag,
    VehicleModel,
    VehicleRegistration,
    VehicleChassis,
    VehicleEngine,
    SalePrice,
    SaleNonRefundable,
    WitnessTitle,
    WitnessFullName,
    WitnessCid,
}

/// Rejected field input
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field}: Please enter a valid 11-digit CID number")]
    #[diagnostic(code(deed::field::cid), help("CID numbers are exactly 11 digits, e.g. 10705001234"))]
    InvalidCid { field: FieldId },

    #[error("{field}: Please enter a valid amount")]
    #[diagnostic(code(deed::field::price), help("Enter a whole number of Ngultrum greater than zero, e.g. 450000"))]
    InvalidAmount { field: FieldId },

    #[error("{field}: Unknown title '{value}'")]
    #[diagnostic(code(deed::field::title), help("Use one of: Mr., Ms., Mrs., Dr."))]
    InvalidTitle { field: FieldId, value: String },

    #[error("{field}: Expected yes or no, got '{value}'")]
    #[diagnostic(code(deed::field::flag))]
    InvalidFlag { field: FieldId, value: String },

    #[error("Unknown field '{0}'")]
    #[diagnostic(code(deed::field::unknown), help("Run `deed set --help` to list the field keys"))]
    UnknownField(String),
}

impl FieldError {
    /// The message shown inline next to the offending field
    pub fn inline_message(&self) -> String {
        match self {
            FieldError::InvalidCid { .. } => "Please enter a valid 11-digit CID number".to_string(),
            FieldError::InvalidAmount { .. } => "Please enter a valid amount".to_string(),
            FieldError::InvalidTitle { .. } => "Please choose Mr., Ms., Mrs. or Dr.".to_string(),
            FieldError::InvalidFlag { .. } => "Please answer yes or no".to_string(),
            FieldError::UnknownField(name) => format!("Unknown field '{}'", name),
        }
    }
}

impl FieldId {
    pub fn all() -> &'static [FieldId] {
        &[
            FieldId::SellerTitle,
            FieldId::SellerFullName,
            FieldId::SellerCid,
            FieldId::SellerGewog,
            FieldId::SellerDzongkhag,
            FieldId::BuyerTitle,
            FieldId::BuyerFullName,
            FieldId::BuyerCid,
            FieldId::BuyerGewog,
            FieldId::BuyerDzongkhag,
            FieldId::VehicleModel,
            FieldId::VehicleRegistration,
            FieldId::VehicleChassis,
            FieldId::VehicleEngine,
            FieldId::SalePrice,
            FieldId::SaleNonRefundable,
            FieldId::WitnessTitle,
            FieldId::WitnessFullName,
            FieldId::WitnessCid,
        ]
    }

    /// Dotted key, e.g. `seller.fullName`
    pub fn key(&self) -> &'static str {
        match self {
            FieldId::SellerTitle => "seller.title",
            FieldId::SellerFullName => "seller.fullName",
            FieldId::SellerCid => "seller.cidNumber",
            FieldId::SellerGewog => "seller.gewog",
            FieldId::SellerDzongkhag => "seller.dzongkhag",
            FieldId::BuyerTitle => "buyer.title",
            FieldId::BuyerFullName => "buyer.fullName",
            FieldId::BuyerCid => "buyer.cidNumber",
            FieldId::BuyerGewog => "buyer.gewog",
            FieldId::BuyerDzongkhag => "buyer.dzongkhag",
            FieldId::VehicleModel => "vehicle.model",
            FieldId::VehicleRegistration => "vehicle.registrationNumber",
            FieldId::VehicleChassis => "vehicle.chassisNumber",
            FieldId::VehicleEngine => "vehicle.engineNumber",
            FieldId::SalePrice => "sale.price",
            FieldId::SaleNonRefundable => "sale.isNonRefundable",
            FieldId::WitnessTitle => "witness.title",
            FieldId::WitnessFullName => "witness.fullName",
            FieldId::WitnessCid => "witness.cidNumber",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldId::SellerTitle | FieldId::BuyerTitle | FieldId::WitnessTitle => "Title",
            FieldId::SellerFullName | FieldId::BuyerFullName | FieldId::WitnessFullName => {
                "Full name"
            }
            FieldId::SellerCid | FieldId::BuyerCid | FieldId::WitnessCid => {
                "Citizenship ID (CID)"
            }
            FieldId::SellerGewog | FieldId::BuyerGewog => "Gewog",
            FieldId::SellerDzongkhag | FieldId::BuyerDzongkhag => "Dzongkhag",
            FieldId::VehicleModel => "Vehicle model",
            FieldId::VehicleRegistration => "Registration number",
            FieldId::VehicleChassis => "Chassis number",
            FieldId::VehicleEngine => "Engine number",
            FieldId::SalePrice => "Sale price (Nu.)",
            FieldId::SaleNonRefundable => "Sale is final and non-refundable",
        }
    }

    /// Message reported when a required field is left empty
    pub fn required_message(&self) -> &'static str {
        match self {
            FieldId::SellerFullName => "Please enter the seller's full name",
            FieldId::SellerCid => "Please enter the seller's CID number",
            FieldId::BuyerFullName => "Please enter the buyer's full name",
            FieldId::BuyerCid => "Please enter the buyer's CID number",
            FieldId::SellerGewog | FieldId::BuyerGewog => "Please enter the Gewog",
            FieldId::SellerDzongkhag | FieldId::BuyerDzongkhag => "Please enter the Dzongkhag",
            FieldId::VehicleModel => "Please enter the vehicle model",
            FieldId::VehicleRegistration => "Please enter the registration number",
            FieldId::VehicleChassis => "Please enter the chassis number",
            FieldId::VehicleEngine => "Please enter the engine number",
            FieldId::SalePrice => "Please enter the sale price",
            FieldId::WitnessFullName => "Please enter the witness's full name",
            FieldId::WitnessCid => "Please enter the witness's CID number",
            FieldId::SellerTitle
            | FieldId::BuyerTitle
            | FieldId::WitnessTitle
            | FieldId::SaleNonRefundable => "This field is required",
        }
    }

    /// Example value shown as a hint
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            FieldId::SellerCid | FieldId::BuyerCid | FieldId::WitnessCid => Some("10705001234"),
            FieldId::VehicleModel => Some("Hyundai Creta"),
            FieldId::VehicleRegistration => Some("BP-1-A1234"),
            FieldId::VehicleChassis => Some("MALBB51BLDM123456"),
            FieldId::VehicleEngine => Some("G4FG1234567"),
            FieldId::SalePrice => Some("450000"),
            _ => None,
        }
    }

    pub fn group(&self) -> FieldGroup {
        match self {
            FieldId::SellerTitle
            | FieldId::SellerFullName
            | FieldId::SellerCid
            | FieldId::SellerGewog
            | FieldId::SellerDzongkhag => FieldGroup::Seller,
            FieldId::BuyerTitle
            | FieldId::BuyerFullName
            | FieldId::BuyerCid
            | FieldId::BuyerGewog
            | FieldId::BuyerDzongkhag => FieldGroup::Buyer,
            FieldId::VehicleModel
            | FieldId::VehicleRegistration
            | FieldId::VehicleChassis
            | FieldId::VehicleEngine => FieldGroup::Vehicle,
            FieldId::SalePrice | FieldId::SaleNonRefundable => FieldGroup::Sale,
            FieldId::WitnessTitle | FieldId::WitnessFullName | FieldId::WitnessCid => {
                FieldGroup::Witness
            }
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldId::SellerTitle | FieldId::BuyerTitle | FieldId::WitnessTitle => FieldKind::Title,
            FieldId::SellerCid | FieldId::BuyerCid | FieldId::WitnessCid => FieldKind::Cid,
            FieldId::VehicleRegistration | FieldId::VehicleChassis | FieldId::VehicleEngine => {
                FieldKind::UpperText
            }
            FieldId::SalePrice => FieldKind::Price,
            FieldId::SaleNonRefundable => FieldKind::Flag,
            _ => FieldKind::Text,
        }
    }

    /// Fields edited on a given wizard step, in prompt order
    pub fn for_step(step: FormStep) -> &'static [FieldId] {
        match step {
            FormStep::SellerName => &[FieldId::SellerTitle, FieldId::SellerFullName],
            FormStep::SellerCid => &[FieldId::SellerCid],
            FormStep::SellerLocation => &[FieldId::SellerGewog, FieldId::SellerDzongkhag],
            FormStep::BuyerName => &[FieldId::BuyerTitle, FieldId::BuyerFullName],
            FormStep::BuyerCid => &[FieldId::BuyerCid],
            FormStep::BuyerLocation => &[FieldId::BuyerGewog, FieldId::BuyerDzongkhag],
            FormStep::VehicleDetails => &[
                FieldId::VehicleModel,
                FieldId::VehicleRegistration,
                FieldId::VehicleChassis,
                FieldId::VehicleEngine,
            ],
            FormStep::SalePrice => &[FieldId::SalePrice, FieldId::SaleNonRefundable],
            FormStep::Witness => &[
                FieldId::WitnessTitle,
                FieldId::WitnessFullName,
                FieldId::WitnessCid,
            ],
            FormStep::Hero | FormStep::Review | FormStep::Success => &[],
        }
    }

    /// Step on which this field is edited
    pub fn step(&self) -> FormStep {
        FormStep::all()
            .iter()
            .copied()
            .find(|step| FieldId::for_step(*step).contains(self))
            .unwrap_or(FormStep::Review)
    }

    /// Current value of this field as text
    pub fn get(&self, model: &DeedModel) -> String {
        match self {
            FieldId::SellerTitle => model.seller.title.to_string(),
            FieldId::SellerFullName => model.seller.full_name.clone(),
            FieldId::SellerCid => model.seller.cid_number.clone(),
            FieldId::SellerGewog => model.seller.gewog.clone(),
            FieldId::SellerDzongkhag => model.seller.dzongkhag.clone(),
            FieldId::BuyerTitle => model.buyer.title.to_string(),
            FieldId::BuyerFullName => model.buyer.full_name.clone(),
            FieldId::BuyerCid => model.buyer.cid_number.clone(),
            FieldId::BuyerGewog => model.buyer.gewog.clone(),
            FieldId::BuyerDzongkhag => model.buyer.dzongkhag.clone(),
            FieldId::VehicleModel => model.vehicle.model.clone(),
            FieldId::VehicleRegistration => model.vehicle.registration_number.clone(),
            FieldId::VehicleChassis => model.vehicle.chassis_number.clone(),
            FieldId::VehicleEngine => model.vehicle.engine_number.clone(),
            FieldId::SalePrice => model.sale.price.clone(),
            FieldId::SaleNonRefundable => {
                (if model.sale.is_non_refundable { "yes" } else { "no" }).to_string()
            }
            FieldId::WitnessTitle => model.witness.title.to_string(),
            FieldId::WitnessFullName => model.witness.full_name.clone(),
            FieldId::WitnessCid => model.witness.cid_number.clone(),
        }
    }

    /// Normalise raw input into the form stored in the model
    pub fn sanitize(&self, raw: &str) -> Result<String, FieldError> {
        let field = *self;
        match self.kind() {
            FieldKind::Text => Ok(raw.trim().to_string()),
            FieldKind::UpperText => Ok(raw.trim().to_uppercase()),
            FieldKind::Title => raw
                .parse::<Title>()
                .map(|t| t.to_string())
                .map_err(|_| FieldError::InvalidTitle {
                    field,
                    value: raw.to_string(),
                }),
            FieldKind::Flag => parse_flag(raw)
                .map(|b| (if b { "yes" } else { "no" }).to_string())
                .ok_or_else(|| FieldError::InvalidFlag {
                    field,
                    value: raw.to_string(),
                }),
            FieldKind::Cid => {
                let digits: String = raw
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '-')
                    .collect();
                if digits.is_empty()
                    || (digits.len() == CID_LENGTH && digits.bytes().all(|b| b.is_ascii_digit()))
                {
                    Ok(digits)
                } else {
                    Err(FieldError::InvalidCid { field })
                }
            }
            FieldKind::Price => {
                let digits: String = raw
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != ',')
                    .collect();
                if digits.is_empty() {
                    return Ok(digits);
                }
                if !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(FieldError::InvalidAmount { field });
                }
                match digits.parse::<u64>() {
                    Ok(amount) if amount > 0 => Ok(amount.to_string()),
                    _ => Err(FieldError::InvalidAmount { field }),
                }
            }
        }
    }

    /// Re-sanitise the value already stored in `model`
    ///
    /// A rejected value is left in place.
    pub fn normalise(&self, model: &mut DeedModel) -> Result<(), FieldError> {
        let current = self.get(model);
        let clean = self.sanitize(&current)?;
        if clean != current {
            self.write(model, clean);
        }
        Ok(())
    }

    /// Write an already sanitised value into a copy of the model
    pub(crate) fn write(&self, model: &mut DeedModel, value: String) {
        match self {
            FieldId::SellerTitle => model.seller.title = value.parse().unwrap_or_default(),
            FieldId::SellerFullName => model.seller.full_name = value,
            FieldId::SellerCid => model.seller.cid_number = value,
            FieldId::SellerGewog => model.seller.gewog = value,
            FieldId::SellerDzongkhag => model.seller.dzongkhag = value,
            FieldId::BuyerTitle => model.buyer.title = value.parse().unwrap_or_default(),
            FieldId::BuyerFullName => model.buyer.full_name = value,
            FieldId::BuyerCid => model.buyer.cid_number = value,
            FieldId::BuyerGewog => model.buyer.gewog = value,
            FieldId::BuyerDzongkhag => model.buyer.dzongkhag = value,
            FieldId::VehicleModel => model.vehicle.model = value,
            FieldId::VehicleRegistration => model.vehicle.registration_number = value,
            FieldId::VehicleChassis => model.vehicle.chassis_number = value,
            FieldId::VehicleEngine => model.vehicle.engine_number = value,
            FieldId::SalePrice => model.sale.price = value,
            FieldId::SaleNonRefundable => {
                model.sale.is_non_refundable = parse_flag(&value).unwrap_or(false)
            }
            FieldId::WitnessTitle => model.witness.title = value.parse().unwrap_or_default(),
            FieldId::WitnessFullName => model.witness.full_name = value,
            FieldId::WitnessCid => model.witness.cid_number = value,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => Some(true),
        "n" | "no" | "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for FieldId {
    type Err = FieldError;

    /// Accepts the dotted key in any case, with `-` or `_` separators
    /// (`seller.fullName`, `seller.full-name`, `SELLER.FULL_NAME`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalise = |k: &str| -> String {
            k.chars()
                .filter(|c| *c != '-' && *c != '_')
                .flat_map(char::to_lowercase)
                .collect()
        };
        let wanted = normalise(s.trim());
        FieldId::all()
            .iter()
            .copied()
            .find(|f| normalise(f.key()) == wanted)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}
