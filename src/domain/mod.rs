//! Domain types and pure business logic
//!
//! Budgets, settings, the pricing calculator and the dashboard
//! aggregates. Nothing in here touches storage or the network.

pub mod budgets;
pub mod metrics;
pub mod pricing;
pub mod settings;
