//! Dashboard metrics
//!
//! Read-only aggregates over a budget snapshot. Everything here is
//! recomputed from scratch on each call; there is no cached or
//! incremental state.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::budgets::{Budget, BudgetStatus};

/// One unpaid boleto approaching its due date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpcomingBoleto {
    pub budget_id: Uuid,
    pub client_name: String,
    pub final_price: f64,
    pub due_date: NaiveDate,
}

/// Count of budgets sharing a service-type label.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceTypeCount {
    pub service_type: String,
    pub count: usize,
}

/// Derived dashboard view over the current budget snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardMetrics {
    pub pending_count: usize,
    pub approved_count: usize,
    pub in_production_count: usize,
    /// Sum of final prices for non-rejected budgets created this calendar month
    pub monthly_revenue: f64,
    /// Sum of final prices not yet confirmed paid (non-rejected, boleto unpaid)
    pub total_receivable: f64,
    /// At most 5 unpaid boletos, ascending by due date
    pub upcoming_due_dates: Vec<UpcomingBoleto>,
    pub service_type_breakdown: Vec<ServiceTypeCount>,
}

const UPCOMING_DUE_DATES_LIMIT: usize = 5;

/// Compute all dashboard metrics for a snapshot, with `now` supplying the
/// current calendar month for the revenue window.
pub fn compute(budgets: &[Budget], now: DateTime<Utc>) -> DashboardMetrics {
    let pending_count = count_by_status(budgets, BudgetStatus::PendingApproval);
    let approved_count = count_by_status(budgets, BudgetStatus::Approved);
    let in_production_count = count_by_status(budgets, BudgetStatus::InProduction);

    let monthly_revenue = budgets
        .iter()
        .filter(|b| {
            b.status != BudgetStatus::Rejected
                && b.created_at.year() == now.year()
                && b.created_at.month() == now.month()
        })
        .map(|b| b.final_price)
        .sum();

    // "Receivable" means not confirmed paid, which includes budgets that
    // never had a boleto issued at all.
    let total_receivable = budgets
        .iter()
        .filter(|b| b.status != BudgetStatus::Rejected && !b.boleto_paid)
        .map(|b| b.final_price)
        .sum();

    let mut upcoming: Vec<UpcomingBoleto> = budgets
        .iter()
        .filter(|b| b.boleto_issued && !b.boleto_paid)
        .filter_map(|b| {
            b.boleto_due_date.map(|due_date| UpcomingBoleto {
                budget_id: b.id,
                client_name: b.client_name.clone(),
                final_price: b.final_price,
                due_date,
            })
        })
        .collect();
    upcoming.sort_by_key(|b| b.due_date);
    upcoming.truncate(UPCOMING_DUE_DATES_LIMIT);

    let mut breakdown: Vec<ServiceTypeCount> = Vec::new();
    for budget in budgets {
        match breakdown
            .iter_mut()
            .find(|entry| entry.service_type == budget.service_type)
        {
            Some(entry) => entry.count += 1,
            None => breakdown.push(ServiceTypeCount {
                service_type: budget.service_type.clone(),
                count: 1,
            }),
        }
    }

    DashboardMetrics {
        pending_count,
        approved_count,
        in_production_count,
        monthly_revenue,
        total_receivable,
        upcoming_due_dates: upcoming,
        service_type_breakdown: breakdown,
    }
}

fn count_by_status(budgets: &[Budget], status: BudgetStatus) -> usize {
    budgets.iter().filter(|b| b.status == status).count()
}
