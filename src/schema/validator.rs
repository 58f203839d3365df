//! Field and step validation with aggregated error reporting

use miette::Diagnostic;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::step::FormStep;
use crate::entities::deed::DeedModel;
use crate::entities::field::{FieldId, CID_LENGTH};

/// A named validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty after trimming
    Required,
    /// Exactly 11 decimal digits
    Cid,
    /// All digits, strictly positive, within `u64`
    Price,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Cid => "cid",
            Rule::Price => "price",
        }
    }

    /// Generic failure message for this rule
    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required => "This field is required",
            Rule::Cid => "Please enter a valid 11-digit CID number",
            Rule::Price => "Please enter a valid amount",
        }
    }

    pub fn check(&self, value: &str) -> bool {
        match self {
            Rule::Required => !value.trim().is_empty(),
            Rule::Cid => {
                value.len() == CID_LENGTH && value.bytes().all(|b| b.is_ascii_digit())
            }
            Rule::Price => {
                !value.is_empty()
                    && value.bytes().all(|b| b.is_ascii_digit())
                    && matches!(value.parse::<u64>(), Ok(amount) if amount > 0)
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown validation rule '{0}'")]
pub struct RuleParseError(pub String);

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(Rule::Required),
            "cid" => Ok(Rule::Cid),
            "price" => Ok(Rule::Price),
            _ => Err(RuleParseError(s.to_string())),
        }
    }
}

/// Field-to-message map of current validation failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<FieldId, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn insert(&mut self, field: FieldId, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FieldId) -> Option<String> {
        self.errors.remove(&field)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Merge another set in, replacing messages for fields present in both
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Failures in field order
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Stateful field validator holding the current error set
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate rules in order, recording the first failure for `field`
    ///
    /// When every rule passes, any existing error for the field is cleared.
    pub fn validate_field(&mut self, field: FieldId, value: &str, rules: &[Rule]) -> bool {
        match first_failure(value, rules) {
            Some(rule) => {
                self.errors.insert(field, rule.message());
                false
            }
            None => {
                self.errors.remove(field);
                true
            }
        }
    }

    /// Record a failure found outside the rule table (rejected input)
    pub fn record_error(&mut self, field: FieldId, message: impl Into<String>) {
        self.errors.insert(field, message);
    }

    pub fn clear_error(&mut self, field: FieldId) {
        self.errors.remove(field);
    }

    pub fn clear_all(&mut self) {
        self.errors.clear();
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Record the outcome of a step gate
    ///
    /// Errors for the step's fields are replaced by `failures`; errors on
    /// other steps are left alone.
    pub fn apply_step_result(&mut self, step: FormStep, failures: &ValidationErrors) {
        for (field, _) in step_rules(step) {
            self.errors.remove(*field);
        }
        self.errors.extend(failures.clone());
    }
}

fn first_failure(value: &str, rules: &[Rule]) -> Option<Rule> {
    rules.iter().copied().find(|rule| !rule.check(value))
}

/// Required fields and their rules for each step
pub fn step_rules(step: FormStep) -> &'static [(FieldId, &'static [Rule])] {
    const NAME: &[Rule] = &[Rule::Required];
    const CID: &[Rule] = &[Rule::Required, Rule::Cid];
    const PRICE: &[Rule] = &[Rule::Required, Rule::Price];

    match step {
        FormStep::SellerName => &[(FieldId::SellerFullName, NAME)],
        FormStep::SellerCid => &[(FieldId::SellerCid, CID)],
        FormStep::SellerLocation => &[
            (FieldId::SellerGewog, NAME),
            (FieldId::SellerDzongkhag, NAME),
        ],
        FormStep::BuyerName => &[(FieldId::BuyerFullName, NAME)],
        FormStep::BuyerCid => &[(FieldId::BuyerCid, CID)],
        FormStep::BuyerLocation => &[
            (FieldId::BuyerGewog, NAME),
            (FieldId::BuyerDzongkhag, NAME),
        ],
        FormStep::VehicleDetails => &[
            (FieldId::VehicleModel, NAME),
            (FieldId::VehicleRegistration, NAME),
            (FieldId::VehicleChassis, NAME),
            (FieldId::VehicleEngine, NAME),
        ],
        FormStep::SalePrice => &[(FieldId::SalePrice, PRICE)],
        FormStep::Witness => &[(FieldId::WitnessFullName, NAME), (FieldId::WitnessCid, CID)],
        FormStep::Hero | FormStep::Review | FormStep::Success => &[],
    }
}

/// Evaluate every field of a step, collecting all failures
pub fn validate_step(step: FormStep, model: &DeedModel) -> ValidationErrors {
    let mut failures = ValidationErrors::new();
    for (field, rules) in step_rules(step) {
        let value = field.get(model);
        if let Some(rule) = first_failure(&value, rules) {
            let message = match rule {
                Rule::Required => field.required_message(),
                other => other.message(),
            };
            failures.insert(*field, message);
        }
    }
    failures
}

/// Evaluate every step of the wizard
pub fn validate_all(model: &DeedModel) -> ValidationErrors {
    let mut failures = ValidationErrors::new();
    for step in FormStep::all() {
        failures.extend(validate_step(*step, model));
    }
    failures
}

/// A single failing field inside a [`StepGateError`]
#[derive(Debug, Error, Diagnostic)]
#[error("{field}: {message}")]
pub struct FieldViolation {
    pub field: FieldId,
    pub message: String,

    #[help]
    help: Option<String>,
}

impl FieldViolation {
    pub fn new(field: FieldId, message: impl Into<String>) -> Self {
        let help = field.placeholder().map(|p| format!("e.g. {}", p));
        Self {
            field,
            message: message.into(),
            help,
        }
    }
}

/// Forward navigation blocked by one or more field failures
#[derive(Debug, Error, Diagnostic)]
#[error("Cannot leave '{step}': {summary}")]
#[diagnostic(
    code(deed::validation::step_gate),
    help("Fix the fields listed below, then try again")
)]
pub struct StepGateError {
    pub step: FormStep,
    summary: String,

    #[related]
    violations: Vec<FieldViolation>,
}

impl StepGateError {
    pub fn new(step: FormStep, failures: &ValidationErrors) -> Self {
        let count = failures.len();
        let summary = if count == 1 {
            "1 field needs attention".to_string()
        } else {
            format!("{} fields need attention", count)
        };
        let violations = failures
            .iter()
            .map(|(field, message)| FieldViolation::new(field, message))
            .collect();
        Self {
            step,
            summary,
            violations,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::deed::DeedModel;

    fn complete_model() -> DeedModel {
        let mut model = DeedModel::default();
        model.seller.full_name = "Karma Dorji".to_string();
        model.seller.cid_number = "10705001234".to_string();
        model.seller.gewog = "Bumthang".to_string();
        model.seller.dzongkhag = "Bumthang".to_string();
        model.buyer.full_name = "Pema Wangmo".to_string();
        model.buyer.cid_number = "10804005678".to_string();
        model.buyer.gewog = "Thimphu".to_string();
        model.buyer.dzongkhag = "Thimphu".to_string();
        model.vehicle.model = "Hyundai Creta".to_string();
        model.vehicle.registration_number = "BP-1-A1234".to_string();
        model.vehicle.chassis_number = "MALBB51BLDM123456".to_string();
        model.vehicle.engine_number = "G4FG1234567".to_string();
        model.sale.price = "450000".to_string();
        model.witness.full_name = "Ugyen Tenzin".to_string();
        model.witness.cid_number = "10603004567".to_string();
        model
    }

    #[test]
    fn test_required_rule() {
        let mut v = Validator::new();
        assert!(!v.validate_field(FieldId::SellerFullName, "", &[Rule::Required]));
        assert_eq!(v.errors().get(FieldId::SellerFullName), Some("This field is required"));
        assert!(!v.validate_field(FieldId::SellerFullName, "   ", &[Rule::Required]));
    }

    #[test]
    fn test_cid_rule() {
        let mut v = Validator::new();
        assert!(!v.validate_field(FieldId::SellerCid, "1234567890", &[Rule::Cid]));
        assert_eq!(
            v.errors().get(FieldId::SellerCid),
            Some("Please enter a valid 11-digit CID number")
        );
        assert!(v.validate_field(FieldId::SellerCid, "12345678901", &[Rule::Cid]));
        assert!(v.errors().is_empty());
        assert!(!v.validate_field(FieldId::SellerCid, " 12345678901", &[Rule::Cid]));
        assert!(!v.validate_field(FieldId::SellerCid, "123456789012", &[Rule::Cid]));
    }

    #[test]
    fn test_price_rule() {
        let mut v = Validator::new();
        assert!(!v.validate_field(FieldId::SalePrice, "0", &[Rule::Price]));
        assert!(!v.validate_field(FieldId::SalePrice, "000", &[Rule::Price]));
        assert!(!v.validate_field(FieldId::SalePrice, "-5", &[Rule::Price]));
        assert!(!v.validate_field(FieldId::SalePrice, "1.5", &[Rule::Price]));
        assert!(!v.validate_field(FieldId::SalePrice, "1,000", &[Rule::Price]));
        assert!(!v.validate_field(FieldId::SalePrice, "+5", &[Rule::Price]));
        assert!(!v.validate_field(FieldId::SalePrice, "99999999999999999999", &[Rule::Price]));
        assert!(v.validate_field(FieldId::SalePrice, "100", &[Rule::Price]));
        assert!(v.validate_field(FieldId::SalePrice, "18446744073709551615", &[Rule::Price]));
    }

    #[test]
    fn test_rules_evaluated_in_order() {
        let mut v = Validator::new();
        v.validate_field(FieldId::WitnessCid, "", &[Rule::Required, Rule::Cid]);
        assert_eq!(v.errors().get(FieldId::WitnessCid), Some("This field is required"));
        v.validate_field(FieldId::WitnessCid, "12", &[Rule::Required, Rule::Cid]);
        assert_eq!(
            v.errors().get(FieldId::WitnessCid),
            Some("Please enter a valid 11-digit CID number")
        );
    }

    #[test]
    fn test_rule_parsing() {
        assert_eq!("required".parse::<Rule>().unwrap(), Rule::Required);
        assert_eq!("CID".parse::<Rule>().unwrap(), Rule::Cid);
        assert_eq!("price".parse::<Rule>().unwrap(), Rule::Price);
        assert!("email".parse::<Rule>().is_err());
    }

    #[test]
    fn test_step_collects_every_failure() {
        let model = DeedModel::default();
        let failures = validate_step(FormStep::VehicleDetails, &model);
        assert_eq!(failures.len(), 4);
        assert_eq!(
            failures.get(FieldId::VehicleChassis),
            Some("Please enter the chassis number")
        );

        let failures = validate_step(FormStep::SellerLocation, &model);
        assert!(failures.contains(FieldId::SellerGewog));
        assert!(failures.contains(FieldId::SellerDzongkhag));
    }

    #[test]
    fn test_witness_step_reports_both_fields() {
        let mut model = DeedModel::default();
        model.witness.cid_number = "123".to_string();
        let failures = validate_step(FormStep::Witness, &model);
        assert_eq!(
            failures.get(FieldId::WitnessFullName),
            Some("Please enter the witness's full name")
        );
        assert_eq!(
            failures.get(FieldId::WitnessCid),
            Some("Please enter a valid 11-digit CID number")
        );
    }

    #[test]
    fn test_pass_through_steps() {
        let model = DeedModel::default();
        for step in [FormStep::Hero, FormStep::Review, FormStep::Success] {
            assert!(validate_step(step, &model).is_empty());
        }
    }

    #[test]
    fn test_title_never_blocks() {
        let mut model = DeedModel::default();
        model.seller.full_name = "Karma Dorji".to_string();
        assert!(validate_step(FormStep::SellerName, &model).is_empty());
    }

    #[test]
    fn test_validate_all() {
        assert!(validate_all(&complete_model()).is_empty());
        // 15 required fields across the data-entry steps
        assert_eq!(validate_all(&DeedModel::default()).len(), 15);
    }

    #[test]
    fn test_apply_step_result_keeps_other_steps() {
        let mut v = Validator::new();
        v.validate_field(FieldId::SalePrice, "", &[Rule::Required]);
        let mut model = complete_model();
        model.vehicle.model.clear();
        let failures = validate_step(FormStep::VehicleDetails, &model);
        v.apply_step_result(FormStep::VehicleDetails, &failures);
        assert!(v.errors().contains(FieldId::SalePrice));
        assert!(v.errors().contains(FieldId::VehicleModel));

        v.apply_step_result(FormStep::VehicleDetails, &ValidationErrors::new());
        assert!(!v.errors().contains(FieldId::VehicleModel));
    }

    #[test]
    fn test_step_gate_error() {
        let failures = validate_step(FormStep::Witness, &DeedModel::default());
        let err = StepGateError::new(FormStep::Witness, &failures);
        assert_eq!(err.violation_count(), 2);
        assert!(err.to_string().contains("witness"));
        assert!(err.to_string().contains("2 fields"));
    }
}
