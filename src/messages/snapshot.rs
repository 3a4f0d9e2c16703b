//! Session snapshot - data structure published by the engine for rendering

use crate::models::{FinancialPlan, Receipt, User};

/// Complete session state needed by the presentation layer.
///
/// A fresh snapshot is published after every message the engine processes,
/// so paired changes (a new receipt plus its owner's updated projection)
/// are always observed together.
#[derive(Clone, Debug, Default)]
pub struct SessionSnapshot {
    pub current_user: Option<User>,
    pub users: Vec<User>,
    pub receipts: Vec<Receipt>,
    pub financial_plans: Vec<FinancialPlan>,
    pub loading: bool,
}

impl SessionSnapshot {
    /// True after a session fetch failed: authenticated-looking but with no
    /// data loaded and no fetch pending. The presentation layer is expected
    /// to check for this and surface it.
    pub fn is_inconsistent(&self) -> bool {
        self.current_user.is_some()
            && !self.loading
            && self.users.is_empty()
            && self.receipts.is_empty()
            && self.financial_plans.is_empty()
    }
}
