//! Model selection state for the placement UI.
//!
//! The UI never writes selection fields directly; every change goes through
//! one of three intents (pick, cancel, confirm). A confirmation is handed to
//! the placement surface through a [`ConfirmationMailbox`] that it drains.

pub mod mailbox;

pub use mailbox::ConfirmationMailbox;

use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing to pick from.
    Idle,
    Browsing,
    PlacementArmed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Browsing => "browsing",
            Phase::PlacementArmed => "placement armed",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent<A> {
    Pick(A),
    Cancel,
    Confirm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("cannot {intent} while {phase}")]
pub struct TransitionError {
    pub phase: Phase,
    pub intent: &'static str,
}

#[derive(Debug)]
pub struct SelectionState<A> {
    phase: Phase,
    selected: Option<A>,
    confirmed: ConfirmationMailbox<A>,
}

impl<A> Default for SelectionState<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> SelectionState<A> {
    /// Starts in [`Phase::Browsing`].
    pub fn new() -> Self {
        Self {
            phase: Phase::Browsing,
            selected: None,
            confirmed: ConfirmationMailbox::new(),
        }
    }

    /// Browsing when there is something to browse, idle otherwise.
    pub fn for_catalog_len(len: usize) -> Self {
        let mut state = Self::new();
        if len == 0 {
            state.phase = Phase::Idle;
        }
        state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_placement_armed(&self) -> bool {
        self.phase == Phase::PlacementArmed
    }

    pub fn selected(&self) -> Option<&A> {
        self.selected.as_ref()
    }

    pub fn has_pending_confirmation(&self) -> bool {
        !self.confirmed.is_empty()
    }

    /// Moves between idle and browsing as the catalog gains or loses models.
    /// An armed placement is left alone.
    pub fn sync_catalog_len(&mut self, len: usize) {
        self.phase = match (self.phase, len) {
            (Phase::Idle, n) if n > 0 => Phase::Browsing,
            (Phase::Browsing, 0) => Phase::Idle,
            (phase, _) => phase,
        };
    }

    pub fn pick(&mut self, asset: A) -> Result<(), TransitionError> {
        self.require_phase(Phase::Browsing, "pick")?;
        self.selected = Some(asset);
        self.phase = Phase::PlacementArmed;
        log::debug!("placement armed");
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.require_phase(Phase::PlacementArmed, "cancel")?;
        self.selected = None;
        self.phase = Phase::Browsing;
        log::debug!("placement cancelled");
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<(), TransitionError> {
        self.require_phase(Phase::PlacementArmed, "confirm")?;
        self.phase = Phase::Browsing;
        if let Some(asset) = self.selected.take() {
            if self.confirmed.post(asset).is_some() {
                log::warn!("replacing a confirmation that was never placed");
            }
            log::debug!("placement confirmed");
        }
        Ok(())
    }

    pub fn apply(&mut self, intent: Intent<A>) -> Result<(), TransitionError> {
        match intent {
            Intent::Pick(asset) => self.pick(asset),
            Intent::Cancel => self.cancel(),
            Intent::Confirm => self.confirm(),
        }
    }

    /// Reads and clears the confirmation slot in one step.
    pub fn take_confirmed(&mut self) -> Option<A> {
        self.confirmed.take()
    }

    fn require_phase(&self, phase: Phase, intent: &'static str) -> Result<(), TransitionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(TransitionError {
                phase: self.phase,
                intent,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_browsing_with_nothing_selected() {
        let state = SelectionState::<u32>::new();
        assert_eq!(state.phase(), Phase::Browsing);
        assert!(state.selected().is_none());
        assert!(!state.has_pending_confirmation());
    }

    #[test]
    fn pick_then_cancel_returns_to_browsing() {
        let mut state = SelectionState::new();
        state.pick("chair").unwrap();
        assert!(state.is_placement_armed());
        assert_eq!(state.selected(), Some(&"chair"));

        state.cancel().unwrap();
        assert_eq!(state.phase(), Phase::Browsing);
        assert!(state.selected().is_none());
        assert_eq!(state.take_confirmed(), None);
    }

    #[test]
    fn pick_then_confirm_hands_off_the_asset() {
        let mut state = SelectionState::new();
        state.pick("chair").unwrap();
        state.confirm().unwrap();

        assert_eq!(state.phase(), Phase::Browsing);
        assert!(state.selected().is_none());
        assert_eq!(state.take_confirmed(), Some("chair"));
        assert_eq!(state.take_confirmed(), None);
    }

    #[test]
    fn each_confirm_cycle_yields_one_handoff() {
        let mut state = SelectionState::new();
        for _ in 0..2 {
            state.apply(Intent::Pick(1)).unwrap();
            state.apply(Intent::Confirm).unwrap();
            assert_eq!(state.take_confirmed(), Some(1));
            assert_eq!(state.take_confirmed(), None);
        }
    }

    #[test]
    fn unconsumed_confirmation_is_replaced() {
        let mut state = SelectionState::new();
        state.pick(1).unwrap();
        state.confirm().unwrap();
        state.pick(2).unwrap();
        state.confirm().unwrap();

        assert_eq!(state.take_confirmed(), Some(2));
        assert_eq!(state.take_confirmed(), None);
    }

    #[test]
    fn out_of_phase_intents_are_rejected_without_change() {
        let mut state = SelectionState::new();
        assert_eq!(
            state.cancel(),
            Err(TransitionError {
                phase: Phase::Browsing,
                intent: "cancel"
            })
        );
        assert!(state.confirm().is_err());

        state.pick(1).unwrap();
        let err = state.pick(2).unwrap_err();
        assert_eq!(err.to_string(), "cannot pick while placement armed");
        assert_eq!(state.selected(), Some(&1));
    }

    #[test]
    fn empty_catalog_is_idle() {
        let mut state = SelectionState::for_catalog_len(0);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.pick(0).is_err());

        state.sync_catalog_len(3);
        assert_eq!(state.phase(), Phase::Browsing);
        state.sync_catalog_len(0);
        assert_eq!(state.phase(), Phase::Idle);
    }
}
