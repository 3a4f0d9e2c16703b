//! Operation handlers - business logic for session flows

use std::collections::HashMap;

use crate::messages::{GatewayCommand, GatewayResponse, SessionOp};
use crate::models::{PlanDraft, ReceiptDraft, User, UserStatus};
use crate::session::actor::SyncEngine;

impl SyncEngine {
    // ========================
    // Operation dispatch
    // ========================

    /// Handle one invoked operation, returns true if shutdown was requested
    pub fn handle_op(&mut self, op: SessionOp) -> bool {
        match op {
            SessionOp::Login(user) => self.login(user),
            SessionOp::Logout => self.logout(),
            SessionOp::RefreshStatus { user_id, status } => self.refresh_status(user_id, status),
            SessionOp::SubmitReceipt(draft) => self.submit_receipt(draft),
            SessionOp::SubmitPlan(draft) => self.submit_plan(draft),
            SessionOp::UpdateBudgets(budgets) => self.update_budgets(budgets),
            SessionOp::Shutdown => return true,
        }
        false
    }

    // ========================
    // Session lifecycle
    // ========================

    fn login(&mut self, user: User) {
        let previous = self.store.session_identity();
        let user_id = user.id;
        let role = user.role;
        self.store.begin_session(user);

        // The fetch is keyed to the session identity: exactly one fetch per
        // identity change, tagged with the identity that initiated it.
        if previous != Some(user_id) {
            let id = self.next_id();
            self.pending_fetch = Some(id);
            tracing::info!(id, user_id, role = role.as_str(), "starting session fetch");
            let _ = self.gateway_tx.send(GatewayCommand::FetchSessionData { id, user_id, role });
        }
    }

    fn logout(&mut self) {
        self.pending_fetch = None;
        self.store.end_session();
    }

    // ========================
    // Mutations
    // ========================

    fn refresh_status(&mut self, user_id: i64, status: UserStatus) {
        let id = self.next_id();
        tracing::info!(id, user_id, status = status.as_str(), "sending status update");
        let _ = self.gateway_tx.send(GatewayCommand::UpdateStatus { id, user_id, status });
    }

    fn submit_receipt(&mut self, draft: ReceiptDraft) {
        let Some(user_id) = self.store.session_identity() else {
            tracing::warn!("ignoring receipt submission with no active session");
            return;
        };

        let id = self.next_id();
        tracing::info!(id, user_id, category = %draft.category, "sending receipt");
        let _ = self.gateway_tx.send(GatewayCommand::AddReceipt { id, user_id, draft });
    }

    fn submit_plan(&mut self, draft: PlanDraft) {
        let Some(user_id) = self.store.session_identity() else {
            tracing::warn!("ignoring plan submission with no active session");
            return;
        };

        let id = self.next_id();
        tracing::info!(id, user_id, "sending financial plan");
        let _ = self.gateway_tx.send(GatewayCommand::AddPlan { id, user_id, draft });
    }

    fn update_budgets(&mut self, budgets: HashMap<String, f64>) {
        let Some(user_id) = self.store.session_identity() else {
            tracing::warn!("ignoring budget update with no active session");
            return;
        };

        let id = self.next_id();
        tracing::info!(id, user_id, categories = budgets.len(), "sending budget replacement");
        let _ = self.gateway_tx.send(GatewayCommand::UpdateBudgets { id, user_id, budgets });
    }

    // ========================
    // Completion handling
    // ========================

    /// Apply one gateway completion.
    ///
    /// Completions arrive in resolution order, not issue order. Updates to
    /// the same user are applied as they arrive, so the last-resolved one
    /// wins. The session fetch is the exception: its payload carries the
    /// identity that initiated it and is discarded when that identity is no
    /// longer the live one.
    pub fn handle_response(&mut self, response: GatewayResponse) {
        match response {
            GatewayResponse::SessionData { id, user_id, data } => {
                if self.pending_fetch == Some(id) {
                    self.pending_fetch = None;
                }
                if self.store.session_identity() == Some(user_id) {
                    tracing::info!(
                        id,
                        user_id,
                        users = data.users.len(),
                        receipts = data.receipts.len(),
                        plans = data.financial_plans.len(),
                        "session fetch completed"
                    );
                    self.store.complete_session(data);
                } else {
                    tracing::debug!(id, user_id, "discarding session data for abandoned identity");
                }
            }
            GatewayResponse::StatusUpdated { id, user } => match user {
                Some(user) => self.store.apply_user_update(user),
                None => tracing::warn!(id, "status update target not found"),
            },
            GatewayResponse::ReceiptAdded { id, receipt, updated_user } => {
                tracing::info!(id, receipt_id = receipt.id, "receipt recorded");
                self.store.append_receipt(receipt);
                // Applied in the same step as the append; the next snapshot
                // carries both or neither.
                if let Some(user) = updated_user {
                    self.store.apply_user_update(user);
                }
            }
            GatewayResponse::PlanAdded { id, plan, updated_user } => {
                tracing::info!(id, plan_id = plan.id, "financial plan recorded");
                self.store.append_plan(plan);
                if let Some(user) = updated_user {
                    self.store.apply_user_update(user);
                }
            }
            GatewayResponse::BudgetsUpdated { id, user } => match user {
                Some(user) => self.store.apply_user_update(user),
                None => tracing::warn!(id, "budget update target not found"),
            },
            GatewayResponse::Failed { id, message } => {
                if self.pending_fetch == Some(id) {
                    // The session stays authenticated with whatever the
                    // collections held; the snapshot reads as
                    // authenticated-but-empty and the presentation layer
                    // surfaces it.
                    self.pending_fetch = None;
                    self.store.clear_loading();
                    tracing::error!(id, %message, "session fetch failed");
                } else {
                    tracing::warn!(id, %message, "gateway operation failed, state unchanged");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::SessionSnapshot;
    use crate::models::{FinancialPlan, Receipt, ReceiptItem, SessionData, UserRole};
    use tokio::sync::{mpsc, watch};

    fn engine() -> (
        SyncEngine,
        mpsc::UnboundedReceiver<GatewayCommand>,
        watch::Receiver<SessionSnapshot>,
    ) {
        let (gateway_tx, gateway_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());
        (SyncEngine::new(gateway_tx, snapshot_tx), gateway_rx, snapshot_rx)
    }

    fn user(id: i64, score: u32) -> User {
        User {
            id,
            username: format!("user{id}"),
            role: UserRole::User,
            status: UserStatus::Active,
            first_name: "Test".into(),
            last_name: format!("User{id}"),
            avatar_url: String::new(),
            financial_wellness_score: score,
            monthly_expense_limit: None,
            budgets: None,
        }
    }

    fn user_with_status(id: i64, status: UserStatus) -> User {
        User {
            status,
            ..user(id, 50)
        }
    }

    fn receipt(id: i64, user_id: i64) -> Receipt {
        Receipt {
            id,
            user_id,
            merchant: None,
            items: vec![ReceiptItem::new("Coffee", 3.5)],
            total: Some(3.5),
            date: None,
            category: "Food".into(),
            image: String::new(),
        }
    }

    fn session_data(users: Vec<User>) -> SessionData {
        SessionData {
            users,
            receipts: vec![],
            financial_plans: vec![],
        }
    }

    /// Drive a login and answer its fetch, leaving a settled session
    fn settled_session(
        eng: &mut SyncEngine,
        gateway_rx: &mut mpsc::UnboundedReceiver<GatewayCommand>,
        u: User,
    ) {
        eng.handle_op(SessionOp::Login(u.clone()));
        let fetch_id = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::FetchSessionData { id, .. } => id,
            other => panic!("expected fetch, got {other:?}"),
        };
        eng.handle_response(GatewayResponse::SessionData {
            id: fetch_id,
            user_id: u.id,
            data: session_data(vec![u]),
        });
    }

    #[test]
    fn test_login_is_synchronous_and_issues_one_fetch() {
        let (mut eng, mut gateway_rx, _snap) = engine();

        eng.handle_op(SessionOp::Login(user(1, 50)));

        // State changes before any completion is observed
        let snap = eng.store.snapshot();
        assert!(snap.loading);
        assert_eq!(snap.current_user.as_ref().unwrap().id, 1);

        match gateway_rx.try_recv().unwrap() {
            GatewayCommand::FetchSessionData { user_id, role, .. } => {
                assert_eq!(user_id, 1);
                assert_eq!(role, UserRole::User);
            }
            other => panic!("expected fetch, got {other:?}"),
        }

        // Same identity again: no second fetch
        eng.handle_op(SessionOp::Login(user(1, 50)));
        assert!(gateway_rx.try_recv().is_err());
    }

    #[test]
    fn test_login_fetch_completion_reconciles_current_user() {
        let (mut eng, mut gateway_rx, _snap) = engine();

        eng.handle_op(SessionOp::Login(user(1, 50)));
        let fetch_id = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::FetchSessionData { id, .. } => id,
            other => panic!("expected fetch, got {other:?}"),
        };

        eng.handle_response(GatewayResponse::SessionData {
            id: fetch_id,
            user_id: 1,
            data: session_data(vec![user(1, 75)]),
        });

        let snap = eng.store.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.current_user.unwrap().financial_wellness_score, 75);
        assert_eq!(snap.users.len(), 1);
    }

    #[test]
    fn test_stale_fetch_for_abandoned_identity_is_discarded() {
        let (mut eng, mut gateway_rx, _snap) = engine();

        eng.handle_op(SessionOp::Login(user(1, 50)));
        let first_fetch = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::FetchSessionData { id, .. } => id,
            other => panic!("expected fetch, got {other:?}"),
        };

        eng.handle_op(SessionOp::Logout);
        eng.handle_op(SessionOp::Login(user(2, 60)));
        let second_fetch = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::FetchSessionData { id, .. } => id,
            other => panic!("expected fetch, got {other:?}"),
        };

        // The abandoned identity's fetch resolves late and must not land
        eng.handle_response(GatewayResponse::SessionData {
            id: first_fetch,
            user_id: 1,
            data: session_data(vec![user(1, 99)]),
        });

        let snap = eng.store.snapshot();
        assert_eq!(snap.current_user.as_ref().unwrap().id, 2);
        assert!(snap.users.is_empty());

        // The live identity's fetch still applies
        eng.handle_response(GatewayResponse::SessionData {
            id: second_fetch,
            user_id: 2,
            data: session_data(vec![user(2, 61)]),
        });
        let snap = eng.store.snapshot();
        assert_eq!(snap.current_user.unwrap().financial_wellness_score, 61);
    }

    #[test]
    fn test_receipt_completion_applies_receipt_and_projection_together() {
        let (mut eng, mut gateway_rx, _snap) = engine();
        settled_session(&mut eng, &mut gateway_rx, user(1, 50));

        eng.handle_op(SessionOp::SubmitReceipt(ReceiptDraft::new(
            "Food",
            vec![ReceiptItem::new("Coffee", 3.5)],
        )));
        let op_id = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::AddReceipt { id, user_id, .. } => {
                assert_eq!(user_id, 1);
                id
            }
            other => panic!("expected receipt creation, got {other:?}"),
        };

        eng.handle_response(GatewayResponse::ReceiptAdded {
            id: op_id,
            receipt: receipt(7, 1),
            updated_user: Some(user(1, 81)),
        });

        let snap = eng.store.snapshot();
        assert_eq!(snap.receipts.last().unwrap().id, 7);
        assert_eq!(snap.current_user.as_ref().unwrap().financial_wellness_score, 81);
        assert_eq!(
            snap.users.iter().find(|u| u.id == 1).unwrap().financial_wellness_score,
            81
        );
    }

    #[test]
    fn test_plan_completion_appends_in_order() {
        let (mut eng, mut gateway_rx, _snap) = engine();
        settled_session(&mut eng, &mut gateway_rx, user(1, 50));

        eng.handle_op(SessionOp::SubmitPlan(PlanDraft::new("retire at 50?", "save more")));
        let op_id = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::AddPlan { id, .. } => id,
            other => panic!("expected plan creation, got {other:?}"),
        };

        let plan = FinancialPlan {
            id: 3,
            user_id: 1,
            query: "retire at 50?".into(),
            result: "save more".into(),
            created_at: chrono::Utc::now(),
        };
        eng.handle_response(GatewayResponse::PlanAdded {
            id: op_id,
            plan,
            updated_user: None,
        });

        let snap = eng.store.snapshot();
        assert_eq!(snap.financial_plans.len(), 1);
        assert_eq!(snap.financial_plans.last().unwrap().id, 3);
    }

    #[test]
    fn test_out_of_order_status_completions_last_applied_wins() {
        let (mut eng, mut gateway_rx, _snap) = engine();
        settled_session(&mut eng, &mut gateway_rx, user(1, 50));

        // Issued in order: A (Inactive) then B (On Vacation)
        eng.handle_op(SessionOp::RefreshStatus {
            user_id: 1,
            status: UserStatus::Inactive,
        });
        eng.handle_op(SessionOp::RefreshStatus {
            user_id: 1,
            status: UserStatus::OnVacation,
        });
        let op_a = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::UpdateStatus { id, .. } => id,
            other => panic!("expected status update, got {other:?}"),
        };
        let op_b = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::UpdateStatus { id, .. } => id,
            other => panic!("expected status update, got {other:?}"),
        };
        assert!(op_a < op_b);

        // B resolves first, A resolves last: A's value stands
        eng.handle_response(GatewayResponse::StatusUpdated {
            id: op_b,
            user: Some(user_with_status(1, UserStatus::OnVacation)),
        });
        eng.handle_response(GatewayResponse::StatusUpdated {
            id: op_a,
            user: Some(user_with_status(1, UserStatus::Inactive)),
        });

        let snap = eng.store.snapshot();
        assert_eq!(snap.current_user.unwrap().status, UserStatus::Inactive);
    }

    #[test]
    fn test_budget_completion_replaces_projection() {
        let (mut eng, mut gateway_rx, _snap) = engine();
        settled_session(&mut eng, &mut gateway_rx, user(1, 50));

        let budgets: HashMap<String, f64> =
            [("Food".to_string(), 300.0), ("Travel".to_string(), 120.0)].into();
        eng.handle_op(SessionOp::UpdateBudgets(budgets.clone()));
        let op_id = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::UpdateBudgets { id, budgets: sent, .. } => {
                assert_eq!(sent, budgets);
                id
            }
            other => panic!("expected budget update, got {other:?}"),
        };

        let updated = User {
            budgets: Some(budgets.clone()),
            ..user(1, 50)
        };
        eng.handle_response(GatewayResponse::BudgetsUpdated {
            id: op_id,
            user: Some(updated),
        });

        let snap = eng.store.snapshot();
        assert_eq!(snap.current_user.unwrap().budgets.unwrap(), budgets);
    }

    #[test]
    fn test_fetch_failure_leaves_authenticated_empty_state() {
        let (mut eng, mut gateway_rx, _snap) = engine();

        eng.handle_op(SessionOp::Login(user(1, 50)));
        let fetch_id = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::FetchSessionData { id, .. } => id,
            other => panic!("expected fetch, got {other:?}"),
        };

        eng.handle_response(GatewayResponse::Failed {
            id: fetch_id,
            message: "Connection failed: connection refused".into(),
        });

        let snap = eng.store.snapshot();
        assert!(snap.current_user.is_some());
        assert!(!snap.loading);
        assert!(snap.users.is_empty());
        assert!(snap.is_inconsistent());
    }

    #[test]
    fn test_mutation_failure_leaves_state_unchanged() {
        let (mut eng, mut gateway_rx, _snap) = engine();
        settled_session(&mut eng, &mut gateway_rx, user(1, 50));
        let before = eng.store.snapshot();

        eng.handle_op(SessionOp::SubmitReceipt(ReceiptDraft::new(
            "Food",
            vec![ReceiptItem::new("Coffee", 3.5)],
        )));
        let op_id = match gateway_rx.try_recv().unwrap() {
            GatewayCommand::AddReceipt { id, .. } => id,
            other => panic!("expected receipt creation, got {other:?}"),
        };

        eng.handle_response(GatewayResponse::Failed {
            id: op_id,
            message: "Request timed out".into(),
        });

        let after = eng.store.snapshot();
        assert_eq!(after.receipts, before.receipts);
        assert_eq!(after.current_user, before.current_user);
        assert!(!after.loading);
    }

    #[test]
    fn test_mutations_require_a_session() {
        let (mut eng, mut gateway_rx, _snap) = engine();

        eng.handle_op(SessionOp::SubmitReceipt(ReceiptDraft::new("Food", vec![])));
        eng.handle_op(SessionOp::SubmitPlan(PlanDraft::new("q", "r")));
        eng.handle_op(SessionOp::UpdateBudgets(HashMap::new()));

        assert!(gateway_rx.try_recv().is_err());
    }

    #[test]
    fn test_logout_returns_to_anonymous_state() {
        let (mut eng, mut gateway_rx, _snap) = engine();
        settled_session(&mut eng, &mut gateway_rx, user(1, 50));

        eng.handle_op(SessionOp::Logout);

        let snap = eng.store.snapshot();
        assert!(snap.current_user.is_none());
        assert!(snap.users.is_empty());
        assert!(snap.receipts.is_empty());
        assert!(snap.financial_plans.is_empty());
    }

    #[test]
    fn test_shutdown_op_requests_stop() {
        let (mut eng, _gateway_rx, _snap) = engine();
        assert!(eng.handle_op(SessionOp::Shutdown));
    }
}
