//! HTTP gateway calls - executes remote service requests and shapes completions
//!
//! Every function resolves to a [`GatewayResponse`], never an error: failures
//! are folded into `Failed` completions so the engine sees one explicit
//! outcome per issued operation.

use std::collections::HashMap;
use std::time::Duration;

use crate::messages::GatewayResponse;
use crate::models::{
    PlanCreated, PlanDraft, ReceiptCreated, ReceiptDraft, SessionData, User, UserRole, UserStatus,
};

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Fold a transport error into a failure completion
fn transport_failure(id: u64, err: reqwest::Error) -> GatewayResponse {
    let message = if err.is_timeout() {
        String::from("Request timed out")
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else {
        format!("Request failed: {}", err)
    };
    GatewayResponse::Failed { id, message }
}

fn status_failure(id: u64, status: reqwest::StatusCode, url: &str) -> GatewayResponse {
    GatewayResponse::Failed {
        id,
        message: format!("Service returned {} for {}", status, url),
    }
}

fn decode_failure(id: u64, what: &str, err: reqwest::Error) -> GatewayResponse {
    GatewayResponse::Failed {
        id,
        message: format!("Error decoding {}: {}", what, err),
    }
}

/// Fetch the full-session data bundle for an identity.
///
/// The service scopes the bundle by role: admins receive every user, plain
/// users only themselves.
pub async fn fetch_session_data(
    client: &reqwest::Client,
    base_url: &str,
    id: u64,
    user_id: i64,
    role: UserRole,
) -> GatewayResponse {
    let url = format!("{}/users/{}/data", base_url, user_id);
    let result = client
        .get(&url)
        .query(&[("role", role.as_str())])
        .send()
        .await;

    match result {
        Ok(resp) => {
            let status = resp.status();
            if !status.is_success() {
                return status_failure(id, status, &url);
            }
            match resp.json::<SessionData>().await {
                Ok(data) => GatewayResponse::SessionData { id, user_id, data },
                Err(e) => decode_failure(id, "session data", e),
            }
        }
        Err(e) => transport_failure(id, e),
    }
}

/// Update a user's availability status. A 404 from the service is an absent
/// result, not a failure.
pub async fn update_user_status(
    client: &reqwest::Client,
    base_url: &str,
    id: u64,
    user_id: i64,
    status: UserStatus,
) -> GatewayResponse {
    let url = format!("{}/users/{}/status", base_url, user_id);
    let result = client
        .put(&url)
        .json(&serde_json::json!({ "status": status }))
        .send()
        .await;

    match result {
        Ok(resp) => {
            let http_status = resp.status();
            if http_status == reqwest::StatusCode::NOT_FOUND {
                return GatewayResponse::StatusUpdated { id, user: None };
            }
            if !http_status.is_success() {
                return status_failure(id, http_status, &url);
            }
            match resp.json::<User>().await {
                Ok(user) => GatewayResponse::StatusUpdated {
                    id,
                    user: Some(user),
                },
                Err(e) => decode_failure(id, "user", e),
            }
        }
        Err(e) => transport_failure(id, e),
    }
}

/// Create a receipt owned by the given user
pub async fn add_receipt(
    client: &reqwest::Client,
    base_url: &str,
    id: u64,
    user_id: i64,
    draft: ReceiptDraft,
) -> GatewayResponse {
    let url = format!("{}/users/{}/receipts", base_url, user_id);
    let result = client.post(&url).json(&draft).send().await;

    match result {
        Ok(resp) => {
            let status = resp.status();
            if !status.is_success() {
                return status_failure(id, status, &url);
            }
            match resp.json::<ReceiptCreated>().await {
                Ok(created) => GatewayResponse::ReceiptAdded {
                    id,
                    receipt: created.new_receipt,
                    updated_user: created.updated_user,
                },
                Err(e) => decode_failure(id, "receipt creation", e),
            }
        }
        Err(e) => transport_failure(id, e),
    }
}

/// Create a financial plan owned by the given user
pub async fn add_financial_plan(
    client: &reqwest::Client,
    base_url: &str,
    id: u64,
    user_id: i64,
    draft: PlanDraft,
) -> GatewayResponse {
    let url = format!("{}/users/{}/plans", base_url, user_id);
    let result = client.post(&url).json(&draft).send().await;

    match result {
        Ok(resp) => {
            let status = resp.status();
            if !status.is_success() {
                return status_failure(id, status, &url);
            }
            match resp.json::<PlanCreated>().await {
                Ok(created) => GatewayResponse::PlanAdded {
                    id,
                    plan: created.new_plan,
                    updated_user: created.updated_user,
                },
                Err(e) => decode_failure(id, "plan creation", e),
            }
        }
        Err(e) => transport_failure(id, e),
    }
}

/// Replace a user's budget mapping wholesale. A 404 from the service is an
/// absent result, not a failure.
pub async fn update_user_budgets(
    client: &reqwest::Client,
    base_url: &str,
    id: u64,
    user_id: i64,
    budgets: HashMap<String, f64>,
) -> GatewayResponse {
    let url = format!("{}/users/{}/budgets", base_url, user_id);
    let result = client.put(&url).json(&budgets).send().await;

    match result {
        Ok(resp) => {
            let http_status = resp.status();
            if http_status == reqwest::StatusCode::NOT_FOUND {
                return GatewayResponse::BudgetsUpdated { id, user: None };
            }
            if !http_status.is_success() {
                return status_failure(id, http_status, &url);
            }
            match resp.json::<User>().await {
                Ok(user) => GatewayResponse::BudgetsUpdated {
                    id,
                    user: Some(user),
                },
                Err(e) => decode_failure(id, "user", e),
            }
        }
        Err(e) => transport_failure(id, e),
    }
}
