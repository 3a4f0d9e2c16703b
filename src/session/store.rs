//! Session store - pure data structure with no I/O logic

use crate::messages::SessionSnapshot;
use crate::models::{FinancialPlan, Receipt, SessionData, User};

/// In-memory view of one authenticated session.
///
/// The current user is denormalized: it exists both as `current_user` and as
/// an entry in `users`. Every write path that touches a user goes through
/// [`SessionStore::apply_user_update`] so the two copies cannot diverge.
#[derive(Debug, Default)]
pub struct SessionStore {
    current_user: Option<User>,
    users: Vec<User>,
    receipts: Vec<Receipt>,
    financial_plans: Vec<FinancialPlan>,
    loading: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the live session, if any
    pub fn session_identity(&self) -> Option<i64> {
        self.current_user.as_ref().map(|user| user.id)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a session optimistically, before any remote confirmation.
    ///
    /// Previously loaded collections are left in place; the session fetch
    /// replaces them wholesale when it completes.
    pub fn begin_session(&mut self, user: User) {
        self.current_user = Some(user);
        self.loading = true;
    }

    /// Apply a completed session fetch.
    ///
    /// The fetched copy of the current user supersedes the optimistic one;
    /// if the fetched set has no matching entry the optimistic copy stays.
    pub fn complete_session(&mut self, data: SessionData) {
        self.users = data.users;
        self.receipts = data.receipts;
        self.financial_plans = data.financial_plans;

        if let Some(identity) = self.session_identity() {
            if let Some(fresh) = self.users.iter().find(|u| u.id == identity) {
                self.current_user = Some(fresh.clone());
            }
        }

        self.loading = false;
    }

    /// Clear the loading flag without touching anything else.
    ///
    /// Used when a session fetch fails: the session stays authenticated and
    /// the collections keep whatever they held (typically nothing).
    pub fn clear_loading(&mut self) {
        self.loading = false;
    }

    /// Return to the anonymous state
    pub fn end_session(&mut self) {
        self.current_user = None;
        self.users.clear();
        self.receipts.clear();
        self.financial_plans.clear();
        self.loading = false;
    }

    /// Replace a user projection wherever it is held.
    ///
    /// Replaces the matching `users` entry wholesale and, when the current
    /// user shares the identity, replaces that copy in the same call. An
    /// identity not present in `users` is a no-op: neither copy is touched.
    pub fn apply_user_update(&mut self, updated: User) {
        let Some(entry) = self.users.iter_mut().find(|u| u.id == updated.id) else {
            return;
        };
        *entry = updated.clone();

        if self.session_identity() == Some(updated.id) {
            self.current_user = Some(updated);
        }
    }

    pub fn append_receipt(&mut self, receipt: Receipt) {
        self.receipts.push(receipt);
    }

    pub fn append_plan(&mut self, plan: FinancialPlan) {
        self.financial_plans.push(plan);
    }

    /// Clone the full state for publication to the presentation layer
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_user: self.current_user.clone(),
            users: self.users.clone(),
            receipts: self.receipts.clone(),
            financial_plans: self.financial_plans.clone(),
            loading: self.loading,
        }
    }
}
