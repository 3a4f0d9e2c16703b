use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of an authenticated user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// Availability status of a user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
    #[serde(rename = "On Vacation")]
    OnVacation,
}

impl UserStatus {
    pub fn as_str(&self) -> &str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::OnVacation => "On Vacation",
        }
    }
}

/// A user account as served by the remote service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: String,
    pub financial_wellness_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_expense_limit: Option<f64>,
    /// Category name -> spending limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budgets: Option<HashMap<String, f64>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// A single line item on a receipt
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub price: f64,
}

impl ReceiptItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        ReceiptItem {
            name: name.into(),
            price,
        }
    }
}

/// A scanned expense receipt
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: i64,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    pub items: Vec<ReceiptItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub category: String,
    /// Base64-encoded image payload
    pub image: String,
}

/// A saved financial planning query and its result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPlan {
    pub id: i64,
    pub user_id: i64,
    pub query: String,
    pub result: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Receipt fields submitted by the client; the service assigns id and owner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    pub items: Vec<ReceiptItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub category: String,
    pub image: String,
}

impl ReceiptDraft {
    pub fn new(category: impl Into<String>, items: Vec<ReceiptItem>) -> Self {
        ReceiptDraft {
            merchant: None,
            items,
            total: None,
            date: None,
            category: category.into(),
            image: String::new(),
        }
    }

    /// Attach a captured image, encoding the raw bytes for the wire
    pub fn with_image_bytes(mut self, bytes: &[u8]) -> Self {
        self.image = base64::engine::general_purpose::STANDARD.encode(bytes);
        self
    }

    /// Sum of line item prices
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|item| item.price).sum()
    }
}

/// Plan fields submitted by the client; the service assigns id and owner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    pub query: String,
    pub result: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl PlanDraft {
    pub fn new(query: impl Into<String>, result: impl Into<String>) -> Self {
        PlanDraft {
            query: query.into(),
            result: result.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Full-session data bundle returned by the session fetch.
///
/// `users` holds all users when the requesting session is an admin, or just
/// the requesting user otherwise.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub users: Vec<User>,
    pub receipts: Vec<Receipt>,
    pub financial_plans: Vec<FinancialPlan>,
}

/// Service response to a receipt creation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptCreated {
    pub new_receipt: Receipt,
    /// Present when adding the receipt also changed the owner's projection
    /// (e.g. a recomputed wellness score)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_user: Option<User>,
}

/// Service response to a plan creation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCreated {
    pub new_plan: FinancialPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_user: Option<User>,
}
