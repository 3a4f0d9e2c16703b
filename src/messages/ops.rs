//! Session operations - messages from the presentation layer to the sync engine

use std::collections::HashMap;

use crate::models::{PlanDraft, ReceiptDraft, User, UserStatus};

/// Operations the presentation layer can invoke on the sync engine
#[derive(Debug, Clone)]
pub enum SessionOp {
    /// Start a session for an authenticated user
    Login(User),
    /// End the current session and return to the anonymous state
    Logout,
    /// Change a user's availability status
    RefreshStatus { user_id: i64, status: UserStatus },
    /// Record a new receipt for the current user
    SubmitReceipt(ReceiptDraft),
    /// Record a new financial plan for the current user
    SubmitPlan(PlanDraft),
    /// Replace the current user's budget mapping
    UpdateBudgets(HashMap<String, f64>),
    /// Stop the engine and the gateway actor
    Shutdown,
}
