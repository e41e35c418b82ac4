//! Shop settings domain types
//!
//! Tunable calculation parameters and the Gemini credential. A single
//! process-wide record, merged field-by-field on update.

use serde::{Deserialize, Serialize};

pub const DEFAULT_INK_COST_PER_ML: f64 = 0.65;
pub const DEFAULT_INK_CONSUMPTION_FACTOR: f64 = 10.0;

/// Shop settings entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    /// Ink cost in currency units per mL
    #[serde(default = "default_ink_cost_per_ml")]
    pub ink_cost_per_ml: f64,
    /// Ink consumption in mL per m² of print area
    #[serde(default = "default_ink_consumption_factor")]
    pub ink_consumption_factor: f64,
    /// Gemini API key; empty disables the advisory feature
    #[serde(default)]
    pub api_key: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ink_cost_per_ml: DEFAULT_INK_COST_PER_ML,
            ink_consumption_factor: DEFAULT_INK_CONSUMPTION_FACTOR,
            api_key: String::new(),
        }
    }
}

fn default_ink_cost_per_ml() -> f64 {
    DEFAULT_INK_COST_PER_ML
}

fn default_ink_consumption_factor() -> f64 {
    DEFAULT_INK_CONSUMPTION_FACTOR
}

/// Request DTO for a partial settings update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub ink_cost_per_ml: Option<f64>,
    #[serde(default)]
    pub ink_consumption_factor: Option<f64>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl AppSettings {
    /// Merge supplied fields into the current record. No range validation;
    /// the settings form is trusted to send sane numbers.
    pub fn apply(&mut self, patch: UpdateSettingsRequest) {
        if let Some(cost) = patch.ink_cost_per_ml {
            self.ink_cost_per_ml = cost;
        }
        if let Some(factor) = patch.ink_consumption_factor {
            self.ink_consumption_factor = factor;
        }
        if let Some(key) = patch.api_key {
            self.api_key = key;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn defaults_match_the_shop_baseline() {
        let settings = AppSettings::default();
        assert_eq!(settings.ink_cost_per_ml, 0.65);
        assert_eq!(settings.ink_consumption_factor, 10.0);
        assert!(settings.api_key.is_empty());
    }

    #[test]
    fn apply_merges_only_supplied_fields() {
        let mut settings = AppSettings::default();
        settings.apply(UpdateSettingsRequest {
            ink_cost_per_ml: Some(0.8),
            ..Default::default()
        });
        assert_eq!(settings.ink_cost_per_ml, 0.8);
        assert_eq!(settings.ink_consumption_factor, 10.0);

        settings.apply(UpdateSettingsRequest {
            api_key: Some("key-123".to_string()),
            ..Default::default()
        });
        assert_eq!(settings.ink_cost_per_ml, 0.8);
        assert_eq!(settings.api_key, "key-123");
    }
}
