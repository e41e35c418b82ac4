//! Budget domain types
//!
//! A budget is one priced job offer to a client: service description,
//! print geometry, payment terms, derived costs and the approval /
//! production lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Budget lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    PendingApproval,
    Approved,
    Rejected,
    InProduction,
    Completed,
}

impl Default for BudgetStatus {
    fn default() -> Self {
        Self::PendingApproval
    }
}

impl BudgetStatus {
    /// Lifecycle transition table. Statuses only move forward; Rejected
    /// and Completed are terminal.
    pub fn can_transition_to(self, next: BudgetStatus) -> bool {
        matches!(
            (self, next),
            (Self::PendingApproval, Self::Approved)
                | (Self::PendingApproval, Self::Rejected)
                | (Self::Approved, Self::InProduction)
                | (Self::InProduction, Self::Completed)
        )
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Pix,
    Boleto30,
    Boleto28,
    Boleto3060,
    Installments,
}

/// Coarse pricing bucket for the suggested-price heuristic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DimensionUnit {
    #[default]
    M,
    Cm,
}

/// Print geometry. Calculations assume meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: DimensionUnit,
}

/// Budget entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub client_name: String,
    pub client_phone: String,
    pub service_type: String,
    pub dimensions: Dimensions,
    pub material: String,
    pub technique: String,
    pub complexity: Complexity,
    #[serde(default)]
    pub production_date: Option<NaiveDate>,
    #[serde(default)]
    pub observations: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub installments: Option<u32>,

    // Derived at creation from the pricing calculator, never recomputed
    pub ink_consumption_ml: f64,
    pub ink_cost: f64,
    pub estimated_total_cost: f64,
    pub final_price: f64,

    pub status: BudgetStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    // Boleto tracking
    #[serde(default)]
    pub boleto_issued: bool,
    #[serde(default)]
    pub boleto_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub boleto_paid: bool,
}

/// Request DTO for creating a budget
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudgetRequest {
    pub client_name: String,
    pub client_phone: String,
    pub service_type: String,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub technique: String,
    pub complexity: Complexity,
    #[serde(default)]
    pub production_date: Option<NaiveDate>,
    #[serde(default)]
    pub observations: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub installments: Option<u32>,
    /// Manually added labor / material costs
    #[serde(default)]
    pub additional_cost: f64,
    /// When positive, overrides the suggested price
    #[serde(default)]
    pub final_price_override: Option<f64>,
}

/// Request DTO for a status transition
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BudgetStatus,
}

/// Request DTO for issuing a boleto
#[derive(Debug, Clone, Deserialize)]
pub struct IssueBoletoRequest {
    pub due_date: NaiveDate,
}
