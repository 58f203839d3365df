//! Step state machine for the deed wizard
//!
//! The controller only tracks the current step. It never inspects the deed:
//! callers run the step gate (see [`crate::schema::validator::validate_step`])
//! before asking it to [`advance`](WizardController::advance).
//!
//! Two writers may move the current step: explicit navigation (next, back,
//! jump) and a passive observer reporting which step is in view. Explicit
//! navigation wins; observations arriving within a cooldown window after it
//! are ignored.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::core::step::FormStep;

/// How long the passive observer is muted after explicit navigation
pub const DEFAULT_OBSERVER_COOLDOWN: Duration = Duration::from_millis(800);

#[derive(Debug, Clone)]
pub struct WizardController {
    current: FormStep,
    last_explicit: Option<Instant>,
    cooldown: Duration,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self::with_cooldown(DEFAULT_OBSERVER_COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            current: FormStep::first(),
            last_explicit: None,
            cooldown,
        }
    }

    pub fn current(&self) -> FormStep {
        self.current
    }

    pub fn is_first(&self) -> bool {
        self.current == FormStep::first()
    }

    pub fn is_last(&self) -> bool {
        self.current == FormStep::last()
    }

    /// Move to the immediate successor
    ///
    /// Returns the new step, or `None` when already at the last step.
    pub fn advance(&mut self) -> Option<FormStep> {
        let next = self.current.successor()?;
        self.move_to(next, "advance");
        Some(next)
    }

    /// Move to the immediate predecessor in the fixed order
    ///
    /// There is no history: after a jump this is still the step just before
    /// the current one, not the step the user came from.
    pub fn back(&mut self) -> Option<FormStep> {
        let prev = self.current.predecessor()?;
        self.move_to(prev, "back");
        Some(prev)
    }

    /// Jump to any step without checking that earlier steps are complete
    ///
    /// Used for "edit details", for resuming a draft, and for restoring the
    /// position from an anchor. Skipping ahead past incomplete steps is
    /// allowed; the export path validates the whole deed again.
    pub fn go_to(&mut self, step: FormStep) {
        self.move_to(step, "go_to");
    }

    /// Return to the entry step
    pub fn reset(&mut self) {
        self.current = FormStep::first();
        self.last_explicit = Some(Instant::now());
        debug!(step = %self.current, "wizard reset");
    }

    /// Report the step currently in view from a passive observer
    ///
    /// Returns true when the observation moved the current step.
    pub fn observe(&mut self, step: FormStep, now: Instant) -> bool {
        if step == self.current {
            return false;
        }
        if let Some(at) = self.last_explicit {
            if now.saturating_duration_since(at) < self.cooldown {
                debug!(observed = %step, current = %self.current, "observation ignored during cooldown");
                return false;
            }
        }
        debug!(from = %self.current, to = %step, "observer moved step");
        self.current = step;
        true
    }

    /// 1-based position among the data-entry steps, with their count
    pub fn progress(&self) -> Option<(usize, usize)> {
        let steps = FormStep::data_entry();
        steps
            .iter()
            .position(|s| *s == self.current)
            .map(|i| (i + 1, steps.len()))
    }

    fn move_to(&mut self, step: FormStep, via: &'static str) {
        debug!(from = %self.current, to = %step, via, "wizard transition");
        self.current = step;
        self.last_explicit = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_hero() {
        let wizard = WizardController::new();
        assert_eq!(wizard.current(), FormStep::Hero);
        assert!(wizard.is_first());
    }

    #[test]
    fn test_advance_through_every_step() {
        let mut wizard = WizardController::new();
        let mut visited = vec![wizard.current()];
        while let Some(step) = wizard.advance() {
            visited.push(step);
        }
        assert_eq!(visited, FormStep::all());
        assert_eq!(wizard.current(), FormStep::Success);
        assert!(wizard.is_last());
        assert_eq!(wizard.advance(), None);
        assert_eq!(wizard.current(), FormStep::Success);
    }

    #[test]
    fn test_back() {
        let mut wizard = WizardController::new();
        wizard.go_to(FormStep::SellerName);
        assert_eq!(wizard.back(), Some(FormStep::Hero));
        assert_eq!(wizard.back(), None);
        assert_eq!(wizard.current(), FormStep::Hero);
    }

    #[test]
    fn test_back_after_jump_uses_fixed_order() {
        let mut wizard = WizardController::new();
        wizard.go_to(FormStep::Review);
        assert_eq!(wizard.back(), Some(FormStep::Witness));
    }

    #[test]
    fn test_go_to_jumps_anywhere() {
        let mut wizard = WizardController::new();
        wizard.go_to(FormStep::Review);
        assert_eq!(wizard.current(), FormStep::Review);
        wizard.go_to(FormStep::SellerCid);
        assert_eq!(wizard.current(), FormStep::SellerCid);
    }

    #[test]
    fn test_reset() {
        let mut wizard = WizardController::new();
        wizard.go_to(FormStep::Success);
        wizard.reset();
        assert_eq!(wizard.current(), FormStep::Hero);
    }

    #[test]
    fn test_observer_moves_step_when_idle() {
        let mut wizard = WizardController::new();
        assert!(wizard.observe(FormStep::BuyerCid, Instant::now()));
        assert_eq!(wizard.current(), FormStep::BuyerCid);
        assert!(!wizard.observe(FormStep::BuyerCid, Instant::now()));
    }

    #[test]
    fn test_explicit_navigation_preempts_observer() {
        let cooldown = Duration::from_millis(500);
        let mut wizard = WizardController::with_cooldown(cooldown);
        wizard.go_to(FormStep::Witness);
        let same_tick = Instant::now();
        assert!(!wizard.observe(FormStep::SalePrice, same_tick));
        assert_eq!(wizard.current(), FormStep::Witness);

        let later = same_tick + cooldown + Duration::from_millis(1);
        assert!(wizard.observe(FormStep::SalePrice, later));
        assert_eq!(wizard.current(), FormStep::SalePrice);
    }

    #[test]
    fn test_progress() {
        let mut wizard = WizardController::new();
        assert_eq!(wizard.progress(), None);
        wizard.go_to(FormStep::SellerName);
        assert_eq!(wizard.progress(), Some((1, 9)));
        wizard.go_to(FormStep::Witness);
        assert_eq!(wizard.progress(), Some((9, 9)));
        wizard.go_to(FormStep::Review);
        assert_eq!(wizard.progress(), None);
    }
}
