/// Take-once handoff cell between the UI (writer) and the placement surface
/// (reader). Reading empties the slot, so a posted value is observed once.
#[derive(Debug)]
pub struct ConfirmationMailbox<T> {
    slot: Option<T>,
}

impl<T> Default for ConfirmationMailbox<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> ConfirmationMailbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, replacing (and returning) any confirmation nobody has
    /// taken yet.
    pub fn post(&mut self, value: T) -> Option<T> {
        self.slot.replace(value)
    }

    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
