//! Gateway messages - communication between the sync engine and the gateway actor
//!
//! The command/response pair below is the whole request/response contract the
//! engine consumes; the remote service is only ever reached through it.

use std::collections::HashMap;

use crate::models::{FinancialPlan, PlanDraft, Receipt, ReceiptDraft, SessionData, User, UserRole, UserStatus};

/// Commands sent from the sync engine to the gateway actor
#[derive(Debug, Clone)]
pub enum GatewayCommand {
    /// Fetch the full-session data bundle for an identity
    FetchSessionData {
        id: u64,
        user_id: i64,
        role: UserRole,
    },
    /// Update a user's availability status
    UpdateStatus {
        id: u64,
        user_id: i64,
        status: UserStatus,
    },
    /// Create a receipt owned by the given user
    AddReceipt {
        id: u64,
        user_id: i64,
        draft: ReceiptDraft,
    },
    /// Create a financial plan owned by the given user
    AddPlan {
        id: u64,
        user_id: i64,
        draft: PlanDraft,
    },
    /// Replace a user's budget mapping wholesale
    UpdateBudgets {
        id: u64,
        user_id: i64,
        budgets: HashMap<String, f64>,
    },
    /// Shutdown the gateway actor
    Shutdown,
}

/// Completions sent from the gateway actor back to the sync engine.
///
/// Mutation targets the service does not know are reported as an absent
/// user, not as a failure. Transport and decode problems are always a
/// `Failed` completion so the engine handles every outcome explicitly.
#[derive(Debug, Clone)]
pub enum GatewayResponse {
    /// Session fetch completed; tagged with the identity that initiated it
    SessionData {
        id: u64,
        user_id: i64,
        data: SessionData,
    },
    /// Status mutation completed; `None` means the target was not found
    StatusUpdated { id: u64, user: Option<User> },
    /// Receipt creation completed
    ReceiptAdded {
        id: u64,
        receipt: Receipt,
        updated_user: Option<User>,
    },
    /// Plan creation completed
    PlanAdded {
        id: u64,
        plan: FinancialPlan,
        updated_user: Option<User>,
    },
    /// Budget mutation completed; `None` means the target was not found
    BudgetsUpdated { id: u64, user: Option<User> },
    /// The operation failed at the transport or decode level
    Failed { id: u64, message: String },
}

impl GatewayResponse {
    /// Get the operation ID from the completion
    pub fn id(&self) -> u64 {
        match self {
            GatewayResponse::SessionData { id, .. } => *id,
            GatewayResponse::StatusUpdated { id, .. } => *id,
            GatewayResponse::ReceiptAdded { id, .. } => *id,
            GatewayResponse::PlanAdded { id, .. } => *id,
            GatewayResponse::BudgetsUpdated { id, .. } => *id,
            GatewayResponse::Failed { id, .. } => *id,
        }
    }
}
