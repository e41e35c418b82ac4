//! Budget and settings stores
//!
//! The budget store owns the authoritative budget list and is the only
//! writer of lifecycle state. Every successful mutation re-serializes the
//! full collection through the key-value backend, mirroring the original
//! persist-on-change behavior.

pub mod kv;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::budgets::{Budget, BudgetStatus, CreateBudgetRequest};
use crate::domain::pricing;
use crate::domain::settings::{AppSettings, UpdateSettingsRequest};
use kv::{KvStorage, StorageError};

/// Fixed document keys, kept from the original localStorage layout.
pub const BUDGETS_KEY: &str = "spamidia_budgets";
pub const SETTINGS_KEY: &str = "spamidia_settings";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("budget {0} not found")]
    NotFound(Uuid),

    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: BudgetStatus,
        to: BudgetStatus,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("corrupt persisted document: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owns the budget collection. Insertion order is most-recent-first.
pub struct BudgetStore {
    storage: Arc<dyn KvStorage>,
    budgets: RwLock<Vec<Budget>>,
}

impl BudgetStore {
    /// Load the persisted collection, or start empty when the key is
    /// absent.
    pub fn load(storage: Arc<dyn KvStorage>) -> StoreResult<Self> {
        let budgets: Vec<Budget> = match storage.get(BUDGETS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Vec::new(),
        };
        tracing::info!(count = budgets.len(), "Budget store loaded");
        Ok(Self {
            storage,
            budgets: RwLock::new(budgets),
        })
    }

    /// Create a budget: fresh id, now-timestamp, derived fields from the
    /// pricing calculator, status pending, boleto flags cleared.
    pub fn add(
        &self,
        input: CreateBudgetRequest,
        settings: &AppSettings,
    ) -> StoreResult<Budget> {
        let costs = pricing::quote_costs(
            &input.dimensions,
            settings,
            input.complexity,
            input.additional_cost,
            input.final_price_override,
        );

        let budget = Budget {
            id: Uuid::new_v4(),
            client_name: input.client_name,
            client_phone: input.client_phone,
            service_type: input.service_type,
            dimensions: input.dimensions,
            material: input.material,
            technique: input.technique,
            complexity: input.complexity,
            production_date: input.production_date,
            observations: input.observations,
            payment_method: input.payment_method,
            installments: input.installments,
            ink_consumption_ml: costs.ink_consumption_ml,
            ink_cost: costs.ink_cost,
            estimated_total_cost: costs.estimated_total_cost,
            final_price: costs.final_price,
            status: BudgetStatus::PendingApproval,
            created_at: Utc::now(),
            approved_at: None,
            completed_at: None,
            boleto_issued: false,
            boleto_due_date: None,
            boleto_paid: false,
        };

        let mut budgets = self.budgets.write();
        budgets.insert(0, budget.clone());
        self.persist(&budgets)?;
        Ok(budget)
    }

    /// Apply a lifecycle transition. Re-asserting the current status is an
    /// accepted no-op; any edge outside the transition table is rejected.
    /// Entering Approved/Completed stamps the matching timestamp once.
    pub fn transition_status(&self, id: Uuid, status: BudgetStatus) -> StoreResult<Budget> {
        let mut budgets = self.budgets.write();
        let budget = find_mut(&mut budgets, id)?;

        if budget.status != status {
            if !budget.status.can_transition_to(status) {
                return Err(StoreError::InvalidTransition {
                    from: budget.status,
                    to: status,
                });
            }
            budget.status = status;
        }

        if status == BudgetStatus::Approved && budget.approved_at.is_none() {
            budget.approved_at = Some(Utc::now());
        }
        if status == BudgetStatus::Completed && budget.completed_at.is_none() {
            budget.completed_at = Some(Utc::now());
        }

        let updated = budget.clone();
        self.persist(&budgets)?;
        Ok(updated)
    }

    /// Mark a boleto as issued with a due date. Calling again overwrites
    /// the due date.
    pub fn issue_boleto(&self, id: Uuid, due_date: NaiveDate) -> StoreResult<Budget> {
        let mut budgets = self.budgets.write();
        let budget = find_mut(&mut budgets, id)?;
        budget.boleto_issued = true;
        budget.boleto_due_date = Some(due_date);
        let updated = budget.clone();
        self.persist(&budgets)?;
        Ok(updated)
    }

    /// Mark the boleto as paid. Idempotent.
    pub fn mark_boleto_paid(&self, id: Uuid) -> StoreResult<Budget> {
        let mut budgets = self.budgets.write();
        let budget = find_mut(&mut budgets, id)?;
        budget.boleto_paid = true;
        let updated = budget.clone();
        self.persist(&budgets)?;
        Ok(updated)
    }

    /// Permanently remove a budget.
    pub fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut budgets = self.budgets.write();
        let len_before = budgets.len();
        budgets.retain(|b| b.id != id);
        if budgets.len() == len_before {
            return Err(StoreError::NotFound(id));
        }
        self.persist(&budgets)?;
        Ok(())
    }

    /// Full snapshot in insertion order (most-recent-first).
    pub fn list(&self) -> Vec<Budget> {
        self.budgets.read().clone()
    }

    fn persist(&self, budgets: &[Budget]) -> StoreResult<()> {
        let raw = serde_json::to_string(budgets)?;
        self.storage.set(BUDGETS_KEY, &raw)?;
        Ok(())
    }
}

fn find_mut(budgets: &mut [Budget], id: Uuid) -> StoreResult<&mut Budget> {
    budgets
        .iter_mut()
        .find(|b| b.id == id)
        .ok_or(StoreError::NotFound(id))
}

/// Owns the single process-wide settings record.
pub struct SettingsStore {
    storage: Arc<dyn KvStorage>,
    settings: RwLock<AppSettings>,
}

impl SettingsStore {
    /// Load persisted settings, or defaults when the key is absent.
    pub fn load(storage: Arc<dyn KvStorage>) -> StoreResult<Self> {
        let settings = match storage.get(SETTINGS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => AppSettings::default(),
        };
        Ok(Self {
            storage,
            settings: RwLock::new(settings),
        })
    }

    pub fn get(&self) -> AppSettings {
        self.settings.read().clone()
    }

    /// Merge supplied fields into the record and persist.
    pub fn update(&self, patch: UpdateSettingsRequest) -> StoreResult<AppSettings> {
        let mut settings = self.settings.write();
        settings.apply(patch);
        let raw = serde_json::to_string(&*settings)?;
        self.storage.set(SETTINGS_KEY, &raw)?;
        Ok(settings.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::domain::budgets::{Complexity, DimensionUnit, Dimensions, PaymentMethod};
    use kv::MemoryStorage;

    fn create_request() -> CreateBudgetRequest {
        CreateBudgetRequest {
            client_name: "Acme Signs".to_string(),
            client_phone: "11 99999-0000".to_string(),
            service_type: "banner".to_string(),
            dimensions: Dimensions {
                width: 2.0,
                height: 1.5,
                unit: DimensionUnit::M,
            },
            material: "vinyl".to_string(),
            technique: "print".to_string(),
            complexity: Complexity::Medium,
            production_date: None,
            observations: String::new(),
            payment_method: PaymentMethod::Boleto30,
            installments: None,
            additional_cost: 0.0,
            final_price_override: None,
        }
    }

    fn store() -> BudgetStore {
        BudgetStore::load(Arc::new(MemoryStorage::default())).unwrap()
    }

    #[test]
    fn add_derives_costs_and_starts_pending() {
        let store = store();
        let budget = store.add(create_request(), &AppSettings::default()).unwrap();

        assert_eq!(budget.status, BudgetStatus::PendingApproval);
        assert_eq!(budget.ink_consumption_ml, 30.0);
        assert_eq!(budget.ink_cost, 19.5);
        assert_eq!(budget.final_price, 48.75);
        assert!(!budget.boleto_issued);
        assert!(!budget.boleto_paid);
        assert!(budget.approved_at.is_none());
    }

    #[test]
    fn newest_budget_is_listed_first() {
        let store = store();
        let settings = AppSettings::default();
        let first = store.add(create_request(), &settings).unwrap();
        let second = store.add(create_request(), &settings).unwrap();

        let ids: Vec<Uuid> = store.list().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn approval_stamps_approved_at_exactly_once() {
        let store = store();
        let budget = store.add(create_request(), &AppSettings::default()).unwrap();

        let approved = store
            .transition_status(budget.id, BudgetStatus::Approved)
            .unwrap();
        let stamp = approved.approved_at;
        assert!(stamp.is_some());

        // Re-asserting Approved is a no-op and keeps the original stamp
        let again = store
            .transition_status(budget.id, BudgetStatus::Approved)
            .unwrap();
        assert_eq!(again.approved_at, stamp);
    }

    #[test]
    fn completion_stamps_completed_at_exactly_once() {
        let store = store();
        let budget = store.add(create_request(), &AppSettings::default()).unwrap();

        store
            .transition_status(budget.id, BudgetStatus::Approved)
            .unwrap();
        store
            .transition_status(budget.id, BudgetStatus::InProduction)
            .unwrap();
        let done = store
            .transition_status(budget.id, BudgetStatus::Completed)
            .unwrap();
        let stamp = done.completed_at;
        assert!(stamp.is_some());

        let again = store
            .transition_status(budget.id, BudgetStatus::Completed)
            .unwrap();
        assert_eq!(again.completed_at, stamp);
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let store = store();
        let budget = store.add(create_request(), &AppSettings::default()).unwrap();

        let err = store
            .transition_status(budget.id, BudgetStatus::Completed)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidTransition {
                from: BudgetStatus::PendingApproval,
                to: BudgetStatus::Completed,
            }
        ));
        // The budget is untouched
        assert_eq!(store.list()[0].status, BudgetStatus::PendingApproval);
    }

    #[test]
    fn rejected_is_terminal() {
        let store = store();
        let budget = store.add(create_request(), &AppSettings::default()).unwrap();
        store
            .transition_status(budget.id, BudgetStatus::Rejected)
            .unwrap();

        let err = store
            .transition_status(budget.id, BudgetStatus::Approved)
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }

    #[test]
    fn boleto_flow_is_idempotent_and_leaves_status_alone() {
        let store = store();
        let budget = store.add(create_request(), &AppSettings::default()).unwrap();
        store
            .transition_status(budget.id, BudgetStatus::Approved)
            .unwrap();

        let due = NaiveDate::from_ymd_opt(2026, 4, 30).unwrap();
        let issued = store.issue_boleto(budget.id, due).unwrap();
        assert!(issued.boleto_issued);
        assert_eq!(issued.boleto_due_date, Some(due));

        // Re-issuing overwrites the due date
        let later = NaiveDate::from_ymd_opt(2026, 5, 15).unwrap();
        let reissued = store.issue_boleto(budget.id, later).unwrap();
        assert_eq!(reissued.boleto_due_date, Some(later));

        let paid = store.mark_boleto_paid(budget.id).unwrap();
        assert!(paid.boleto_paid);
        let paid_again = store.mark_boleto_paid(budget.id).unwrap();
        assert!(paid_again.boleto_paid);

        assert_eq!(paid_again.status, BudgetStatus::Approved);
    }

    #[test]
    fn missing_ids_fail_with_not_found() {
        let store = store();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.transition_status(id, BudgetStatus::Approved),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.mark_boleto_paid(id),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete(id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn delete_removes_permanently() {
        let store = store();
        let budget = store.add(create_request(), &AppSettings::default()).unwrap();
        store.delete(budget.id).unwrap();
        assert!(store.list().is_empty());
        assert!(matches!(
            store.delete(budget.id),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn budgets_survive_a_reload() {
        let storage: Arc<dyn KvStorage> = Arc::new(MemoryStorage::default());

        let store = BudgetStore::load(Arc::clone(&storage)).unwrap();
        let budget = store.add(create_request(), &AppSettings::default()).unwrap();
        store
            .transition_status(budget.id, BudgetStatus::Approved)
            .unwrap();
        store
            .issue_boleto(budget.id, NaiveDate::from_ymd_opt(2026, 4, 30).unwrap())
            .unwrap();
        let before = store.list();
        drop(store);

        let reloaded = BudgetStore::load(storage).unwrap();
        assert_eq!(reloaded.list(), before);
    }

    #[test]
    fn settings_survive_a_reload() {
        let storage: Arc<dyn KvStorage> = Arc::new(MemoryStorage::default());

        let store = SettingsStore::load(Arc::clone(&storage)).unwrap();
        assert_eq!(store.get(), AppSettings::default());

        store
            .update(UpdateSettingsRequest {
                ink_cost_per_ml: Some(0.9),
                api_key: Some("key-123".to_string()),
                ..Default::default()
            })
            .unwrap();
        let before = store.get();
        drop(store);

        let reloaded = SettingsStore::load(storage).unwrap();
        assert_eq!(reloaded.get(), before);
        assert_eq!(reloaded.get().ink_consumption_factor, 10.0);
    }
}
