//! Owned deed session - the single mutation entry point
//!
//! A [`DeedSession`] owns the deed, the wizard position, the current field
//! errors and the draft store. Everything that changes any of them goes
//! through [`DeedSession::dispatch`].

use chrono::NaiveDate;
use std::time::Instant;
use tracing::{debug, warn};

use crate::core::draft::DraftStore;
use crate::core::step::FormStep;
use crate::core::wizard::WizardController;
use crate::entities::deed::{DeedModel, Party, Sale, Vehicle, Witness};
use crate::entities::field::{FieldError, FieldGroup, FieldId};
use crate::schema::validator::{validate_step, StepGateError, ValidationErrors, Validator};

/// Everything that can change a session
#[derive(Debug, Clone)]
pub enum DeedAction {
    UpdateSeller(Party),
    UpdateBuyer(Party),
    UpdateVehicle(Vehicle),
    UpdateWitness(Witness),
    UpdateSale(Sale),
    SetDate(NaiveDate),
    /// Advance if the current step passes validation
    Next,
    Back,
    GoTo(FormStep),
    /// Step reported by a passive observer (viewport tracking)
    Observe(FormStep, Instant),
    SaveDraft,
    Reset,
}

/// Outcome of the most recent draft write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saved,
    Failed,
}

pub struct DeedSession<S: DraftStore> {
    model: DeedModel,
    wizard: WizardController,
    validator: Validator,
    store: S,
    save_status: SaveStatus,
}

impl<S: DraftStore> DeedSession<S> {
    /// Open a session, resuming the stored draft when there is one
    ///
    /// A draft that cannot be read is logged and replaced by an empty deed.
    pub fn open(store: S) -> Self {
        let model = match store.load() {
            Ok(Some(model)) => {
                debug!("resumed stored draft");
                sanitised(model)
            }
            Ok(None) => DeedModel::default(),
            Err(e) => {
                warn!(error = %e, "failed to load draft, starting from an empty deed");
                DeedModel::default()
            }
        };
        Self {
            model,
            wizard: WizardController::new(),
            validator: Validator::new(),
            store,
            save_status: SaveStatus::Idle,
        }
    }

    pub fn model(&self) -> &DeedModel {
        &self.model
    }

    pub fn current_step(&self) -> FormStep {
        self.wizard.current()
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn errors(&self) -> &ValidationErrors {
        self.validator.errors()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one action
    ///
    /// Only [`DeedAction::Next`] can fail, and only with a step gate error.
    /// Persistence failures are logged and reflected in [`save_status`],
    /// never returned.
    ///
    /// [`save_status`]: DeedSession::save_status
    pub fn dispatch(&mut self, action: DeedAction) -> Result<(), StepGateError> {
        match action {
            DeedAction::UpdateSeller(party) => {
                self.mutate(FieldGroup::Seller, |m| m.seller = party);
            }
            DeedAction::UpdateBuyer(party) => {
                self.mutate(FieldGroup::Buyer, |m| m.buyer = party);
            }
            DeedAction::UpdateVehicle(vehicle) => {
                self.mutate(FieldGroup::Vehicle, |m| m.vehicle = vehicle);
            }
            DeedAction::UpdateWitness(witness) => {
                self.mutate(FieldGroup::Witness, |m| m.witness = witness);
            }
            DeedAction::UpdateSale(sale) => {
                self.mutate(FieldGroup::Sale, |m| m.sale = sale);
            }
            DeedAction::SetDate(date) => {
                if self.model.date != date {
                    self.model.date = date;
                    self.persist();
                }
            }
            DeedAction::Next => return self.next(),
            DeedAction::Back => {
                self.wizard.back();
            }
            DeedAction::GoTo(step) => self.wizard.go_to(step),
            DeedAction::Observe(step, now) => {
                self.wizard.observe(step, now);
            }
            DeedAction::SaveDraft => self.persist(),
            DeedAction::Reset => self.reset(),
        }
        Ok(())
    }

    /// Edit one field from raw input
    ///
    /// The input is sanitised first; rejected input leaves the deed
    /// untouched and records the field error.
    pub fn edit(&mut self, field: FieldId, raw: &str) -> Result<(), FieldError> {
        let value = match field.sanitize(raw) {
            Ok(v) => v,
            Err(e) => {
                self.validator.record_error(field, e.inline_message());
                return Err(e);
            }
        };
        let mut next = self.model.clone();
        field.write(&mut next, value);
        let action = match field.group() {
            FieldGroup::Seller => DeedAction::UpdateSeller(next.seller),
            FieldGroup::Buyer => DeedAction::UpdateBuyer(next.buyer),
            FieldGroup::Vehicle => DeedAction::UpdateVehicle(next.vehicle),
            FieldGroup::Witness => DeedAction::UpdateWitness(next.witness),
            FieldGroup::Sale => DeedAction::UpdateSale(next.sale),
        };
        // Field-group updates never fail
        let _ = self.dispatch(action);
        self.validator.clear_error(field);
        Ok(())
    }

    /// Run the aggregate validation for a step without moving
    pub fn check_step(&mut self, step: FormStep) -> ValidationErrors {
        let failures = validate_step(step, &self.model);
        self.validator.apply_step_result(step, &failures);
        failures
    }

    /// First step that does not validate, or `Review` when all do
    pub fn first_incomplete_step(&self) -> FormStep {
        FormStep::data_entry()
            .iter()
            .copied()
            .find(|step| !validate_step(*step, &self.model).is_empty())
            .unwrap_or(FormStep::Review)
    }

    fn next(&mut self) -> Result<(), StepGateError> {
        let step = self.wizard.current();
        let failures = self.check_step(step);
        if !failures.is_empty() {
            debug!(step = %step, failures = failures.len(), "step gate blocked");
            return Err(StepGateError::new(step, &failures));
        }
        self.wizard.advance();
        Ok(())
    }

    fn reset(&mut self) {
        self.model = DeedModel::default();
        self.wizard.reset();
        self.validator.clear_all();
        self.save_status = SaveStatus::Idle;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored draft");
        }
        debug!("session reset");
    }

    fn mutate(&mut self, group: FieldGroup, apply: impl FnOnce(&mut DeedModel)) {
        let before = self.model.clone();
        apply(&mut self.model);
        for field in FieldId::all().iter().filter(|f| f.group() == group) {
            if let Err(e) = field.normalise(&mut self.model) {
                debug!(field = %field, error = %e, "rejected value in group update");
                field.write(&mut self.model, field.get(&before));
                self.validator.record_error(*field, e.inline_message());
            }
        }
        if self.model == before {
            return;
        }
        for field in FieldId::all().iter().filter(|f| f.group() == group) {
            if field.get(&before) != field.get(&self.model) {
                debug!(field = %field, "field edited");
                self.validator.clear_error(*field);
            }
        }
        self.persist();
    }

    /// Write-through save; failures are logged and swallowed
    ///
    /// The draft is loaded in [`open`](DeedSession::open) before any
    /// mutation can run, so a save never clobbers an unread draft.
    fn persist(&mut self) {
        match self.store.save(&self.model) {
            Ok(()) => self.save_status = SaveStatus::Saved,
            Err(e) => {
                warn!(error = %e, "failed to save draft");
                self.save_status = SaveStatus::Failed;
            }
        }
    }
}

/// Stored draft with every field passed through its entry sanitiser
///
/// Values the sanitiser rejects are dropped.
fn sanitised(mut model: DeedModel) -> DeedModel {
    for field in FieldId::all() {
        if let Err(e) = field.normalise(&mut model) {
            warn!(field = %field, error = %e, "discarding invalid stored value");
            field.write(&mut model, String::new());
        }
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::draft::MemoryDraftStore;
    use crate::entities::deed::Title;

    fn session() -> DeedSession<MemoryDraftStore> {
        DeedSession::open(MemoryDraftStore::new())
    }

    fn fill(session: &mut DeedSession<MemoryDraftStore>) {
        let entries = [
            (FieldId::SellerTitle, "Mr."),
            (FieldId::SellerFullName, "Karma Dorji"),
            (FieldId::SellerCid, "10705001234"),
            (FieldId::SellerGewog, "Bumthang"),
            (FieldId::SellerDzongkhag, "Bumthang"),
            (FieldId::BuyerTitle, "Ms."),
            (FieldId::BuyerFullName, "Pema Wangmo"),
            (FieldId::BuyerCid, "10804005678"),
            (FieldId::BuyerGewog, "Thimphu"),
            (FieldId::BuyerDzongkhag, "Thimphu"),
            (FieldId::VehicleModel, "Hyundai Creta"),
            (FieldId::VehicleRegistration, "bp-1-a1234"),
            (FieldId::VehicleChassis, "MALBB51BLDM123456"),
            (FieldId::VehicleEngine, "G4FG1234567"),
            (FieldId::SalePrice, "450000"),
            (FieldId::WitnessFullName, "Ugyen Tenzin"),
            (FieldId::WitnessCid, "10603004567"),
        ];
        for (field, value) in entries {
            session.edit(field, value).unwrap();
        }
    }

    #[test]
    fn test_open_empty_store() {
        let s = session();
        assert_eq!(s.current_step(), FormStep::Hero);
        assert!(s.model().is_blank());
    }

    #[test]
    fn test_open_corrupt_store_falls_back_to_defaults() {
        let s = DeedSession::open(MemoryDraftStore::with_raw("{broken"));
        assert!(s.model().is_blank());
    }

    #[test]
    fn test_edit_writes_through() {
        let mut s = session();
        s.edit(FieldId::SellerFullName, "Karma Dorji").unwrap();
        assert_eq!(s.save_status(), SaveStatus::Saved);
        let stored = s.store().load().unwrap().unwrap();
        assert_eq!(stored.seller.full_name, "Karma Dorji");
    }

    #[test]
    fn test_rejected_edit_leaves_model_untouched() {
        let mut s = session();
        s.edit(FieldId::SalePrice, "450000").unwrap();
        assert!(s.edit(FieldId::SalePrice, "12.50").is_err());
        assert_eq!(s.model().sale.price, "450000");
        assert_eq!(s.errors().get(FieldId::SalePrice), Some("Please enter a valid amount"));

        s.edit(FieldId::SalePrice, "500000").unwrap();
        assert!(!s.errors().contains(FieldId::SalePrice));
    }

    #[test]
    fn test_next_blocked_collects_all_failures() {
        let mut s = session();
        s.dispatch(DeedAction::GoTo(FormStep::VehicleDetails)).unwrap();
        s.edit(FieldId::VehicleModel, "Hyundai Creta").unwrap();
        let err = s.dispatch(DeedAction::Next).unwrap_err();
        assert_eq!(err.violation_count(), 3);
        assert_eq!(s.current_step(), FormStep::VehicleDetails);
        assert_eq!(s.errors().len(), 3);
    }

    #[test]
    fn test_editing_clears_field_error_optimistically() {
        let mut s = session();
        s.dispatch(DeedAction::GoTo(FormStep::SellerLocation)).unwrap();
        assert!(s.dispatch(DeedAction::Next).is_err());
        assert!(s.errors().contains(FieldId::SellerGewog));

        s.edit(FieldId::SellerGewog, "Chumey").unwrap();
        assert!(!s.errors().contains(FieldId::SellerGewog));
        assert!(s.errors().contains(FieldId::SellerDzongkhag));
    }

    #[test]
    fn test_back_never_blocked() {
        let mut s = session();
        s.dispatch(DeedAction::GoTo(FormStep::SellerCid)).unwrap();
        assert!(s.dispatch(DeedAction::Next).is_err());
        s.dispatch(DeedAction::Back).unwrap();
        assert_eq!(s.current_step(), FormStep::SellerName);
    }

    #[test]
    fn test_full_walk_reaches_success() {
        let mut s = session();
        fill(&mut s);
        assert_eq!(s.model().vehicle.registration_number, "BP-1-A1234");
        while s.current_step() != FormStep::Success {
            s.dispatch(DeedAction::Next).unwrap();
        }
        s.dispatch(DeedAction::Next).unwrap();
        assert_eq!(s.current_step(), FormStep::Success);
        assert!(s.errors().is_empty());
    }

    #[test]
    fn test_go_to_bypasses_gate() {
        let mut s = session();
        s.dispatch(DeedAction::GoTo(FormStep::Review)).unwrap();
        assert_eq!(s.current_step(), FormStep::Review);
    }

    #[test]
    fn test_group_update_replaces_wholesale() {
        let mut s = session();
        let witness = Witness {
            title: Title::Dr,
            full_name: "Ugyen Tenzin".to_string(),
            cid_number: "10603004567".to_string(),
        };
        s.dispatch(DeedAction::UpdateWitness(witness.clone())).unwrap();
        assert_eq!(s.model().witness, witness);
    }

    #[test]
    fn test_group_update_is_sanitised() {
        let mut s = session();
        s.edit(FieldId::SalePrice, "450000").unwrap();

        let mut sale = s.model().sale.clone();
        sale.price = "12.50abc".to_string();
        sale.is_non_refundable = true;
        s.dispatch(DeedAction::UpdateSale(sale)).unwrap();
        assert_eq!(s.model().sale.price, "450000");
        assert!(s.model().sale.is_non_refundable);
        assert_eq!(s.errors().get(FieldId::SalePrice), Some("Please enter a valid amount"));

        let mut vehicle = s.model().vehicle.clone();
        vehicle.registration_number = "bp-1-a1234".to_string();
        s.dispatch(DeedAction::UpdateVehicle(vehicle)).unwrap();
        assert_eq!(s.model().vehicle.registration_number, "BP-1-A1234");

        let stored = s.store().load().unwrap().unwrap();
        assert_eq!(stored.sale.price, "450000");
        assert_eq!(stored.vehicle.registration_number, "BP-1-A1234");
    }

    #[test]
    fn test_open_sanitises_stored_draft() {
        let raw = r#"{
            "seller": { "fullName": "  Karma Dorji ", "cidNumber": "107-0500-1234" },
            "buyer": { "cidNumber": "12345" },
            "vehicle": { "registrationNumber": "bp-1-a1234" },
            "sale": { "price": "99999999999999999999" }
        }"#;
        let s = DeedSession::open(MemoryDraftStore::with_raw(raw));
        let model = s.model();
        assert_eq!(model.seller.full_name, "Karma Dorji");
        assert_eq!(model.seller.cid_number, "10705001234");
        assert_eq!(model.buyer.cid_number, "");
        assert_eq!(model.vehicle.registration_number, "BP-1-A1234");
        assert_eq!(model.sale.price, "");
    }

    #[test]
    fn test_reset_restores_defaults_and_clears_store() {
        let mut s = session();
        fill(&mut s);
        s.dispatch(DeedAction::GoTo(FormStep::Review)).unwrap();
        s.dispatch(DeedAction::Reset).unwrap();
        assert_eq!(s.model(), &DeedModel::default());
        assert_eq!(s.current_step(), FormStep::Hero);
        assert!(s.errors().is_empty());
        assert!(s.store().raw().is_none());
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let mut store = MemoryDraftStore::new();
        store.set_fail_writes(true);
        let mut s = DeedSession::open(store);
        s.edit(FieldId::BuyerFullName, "Pema Wangmo").unwrap();
        assert_eq!(s.model().buyer.full_name, "Pema Wangmo");
        assert_eq!(s.save_status(), SaveStatus::Failed);
        s.dispatch(DeedAction::SaveDraft).unwrap();
        s.dispatch(DeedAction::Reset).unwrap();
        assert!(s.model().is_blank());
    }

    #[test]
    fn test_draft_roundtrip_through_fresh_session() {
        let mut s = session();
        fill(&mut s);
        s.dispatch(DeedAction::SaveDraft).unwrap();
        let raw = s.store().raw().unwrap().to_string();

        let resumed = DeedSession::open(MemoryDraftStore::with_raw(raw));
        assert_eq!(resumed.model(), s.model());
    }

    #[test]
    fn test_first_incomplete_step() {
        let mut s = session();
        assert_eq!(s.first_incomplete_step(), FormStep::SellerName);
        s.edit(FieldId::SellerFullName, "Karma Dorji").unwrap();
        assert_eq!(s.first_incomplete_step(), FormStep::SellerCid);
        fill(&mut s);
        assert_eq!(s.first_incomplete_step(), FormStep::Review);
    }

    #[test]
    fn test_observer_cannot_override_fresh_navigation() {
        let mut s = session();
        s.dispatch(DeedAction::GoTo(FormStep::Witness)).unwrap();
        s.dispatch(DeedAction::Observe(FormStep::Hero, Instant::now())).unwrap();
        assert_eq!(s.current_step(), FormStep::Witness);
    }
}
