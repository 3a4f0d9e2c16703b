//! # FinWell Client
//!
//! Session-state synchronization client for the FinWell financial wellness
//! service. Maintains a consistent in-memory view of one authenticated
//! session's data (profile, receipts, financial plans) against the remote
//! source of truth.
//!
//! ## Features
//! - Optimistic login with a full-session fetch keyed to the session identity
//! - Stale fetch results for abandoned identities are discarded, never applied
//! - Server-confirmed mutations: status, receipts, financial plans, budgets
//! - Paired completions (new entity + updated user projection) applied
//!   atomically from the observer's point of view
//! - Snapshot publication over a `watch` channel for the presentation layer
//!
//! ## Architecture
//! Actor-based with channels:
//! - Presentation layer (external) - invokes operations, renders snapshots
//! - Session layer (state machine) - owns the store, applies all changes
//! - Gateway layer (Tokio + reqwest) - async remote service calls

pub mod config;
pub mod constants;
pub mod gateway;
pub mod handle;
pub mod logging;
pub mod messages;
pub mod models;
pub mod session;

// Re-export commonly used types
pub use config::ClientConfig;
pub use gateway::GatewayActor;
pub use handle::SessionClient;
pub use messages::{GatewayCommand, GatewayResponse, SessionOp, SessionSnapshot};
pub use models::{
    FinancialPlan, PlanDraft, Receipt, ReceiptDraft, ReceiptItem, SessionData, User, UserRole,
    UserStatus,
};
pub use session::{SessionStore, SyncEngine};
