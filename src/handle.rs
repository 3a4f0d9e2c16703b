//! Session client - the handle the presentation layer owns
//!
//! Wires the gateway and engine actors together and exposes the invokable
//! operation set plus the readable session snapshot.

use std::collections::HashMap;

use tokio::sync::{mpsc, watch};

use crate::config::ClientConfig;
use crate::gateway::GatewayActor;
use crate::messages::{SessionOp, SessionSnapshot};
use crate::models::{PlanDraft, ReceiptDraft, User, UserStatus};
use crate::session::SyncEngine;

/// Cheap cloneable handle to a running session-sync engine
#[derive(Clone)]
pub struct SessionClient {
    op_tx: mpsc::UnboundedSender<SessionOp>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionClient {
    /// Create the channels, spawn the gateway and engine actors, and return
    /// the handle. Must be called from within a Tokio runtime.
    pub fn spawn(config: ClientConfig) -> Self {
        let (op_tx, op_rx) = mpsc::unbounded_channel::<SessionOp>();
        let (gateway_cmd_tx, gateway_cmd_rx) = mpsc::unbounded_channel();
        let (gateway_resp_tx, gateway_resp_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());

        let gateway = GatewayActor::new(&config, gateway_resp_tx);
        tokio::spawn(gateway.run(gateway_cmd_rx));

        let engine = SyncEngine::new(gateway_cmd_tx, snapshot_tx);
        tokio::spawn(engine.run(op_rx, gateway_resp_rx));

        SessionClient { op_tx, snapshot_rx }
    }

    /// Start a session for an authenticated user
    pub fn login(&self, user: User) {
        let _ = self.op_tx.send(SessionOp::Login(user));
    }

    /// End the current session
    pub fn logout(&self) {
        let _ = self.op_tx.send(SessionOp::Logout);
    }

    /// Change a user's availability status
    pub fn refresh_status(&self, user_id: i64, status: UserStatus) {
        let _ = self.op_tx.send(SessionOp::RefreshStatus { user_id, status });
    }

    /// Record a new receipt for the current user
    pub fn submit_receipt(&self, draft: ReceiptDraft) {
        let _ = self.op_tx.send(SessionOp::SubmitReceipt(draft));
    }

    /// Record a new financial plan for the current user
    pub fn submit_plan(&self, draft: PlanDraft) {
        let _ = self.op_tx.send(SessionOp::SubmitPlan(draft));
    }

    /// Replace the current user's budget mapping
    pub fn update_budgets(&self, budgets: HashMap<String, f64>) {
        let _ = self.op_tx.send(SessionOp::UpdateBudgets(budgets));
    }

    /// Stop the engine and gateway actors
    pub fn shutdown(&self) {
        let _ = self.op_tx.send(SessionOp::Shutdown);
    }

    /// Latest published session snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver for change-aware consumers (e.g. a render loop awaiting
    /// `changed()`)
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }
}
