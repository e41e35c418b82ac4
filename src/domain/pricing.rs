//! Pricing calculator
//!
//! Pure functions turning raw budget inputs (geometry, shop settings,
//! complexity, manual costs) into the derived financial fields stored on a
//! budget at creation time. Performs no validation; degenerate inputs
//! (zero or negative dimensions) yield zero-valued fields.

use crate::domain::budgets::{Complexity, Dimensions};
use crate::domain::settings::AppSettings;

impl Complexity {
    /// Heuristic markup over estimated cost for the suggested price.
    pub fn price_multiplier(self) -> f64 {
        match self {
            Complexity::High => 3.0,
            Complexity::Medium => 2.5,
            Complexity::Low => 2.0,
        }
    }
}

/// Derived financial fields for one budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteCosts {
    pub area_m2: f64,
    pub ink_consumption_ml: f64,
    pub ink_cost: f64,
    pub estimated_total_cost: f64,
    pub suggested_price: f64,
    pub final_price: f64,
}

/// Compute the derived cost/price fields for a budget.
///
/// `final_price` is the manual override when it is a positive number,
/// otherwise the suggested price. The suggested price is floored at zero
/// so a negative additional cost can never produce a negative price.
pub fn quote_costs(
    dimensions: &Dimensions,
    settings: &AppSettings,
    complexity: Complexity,
    additional_cost: f64,
    final_price_override: Option<f64>,
) -> QuoteCosts {
    let area_m2 = if dimensions.width > 0.0 && dimensions.height > 0.0 {
        dimensions.width * dimensions.height
    } else {
        0.0
    };

    let ink_consumption_ml = area_m2 * settings.ink_consumption_factor;
    let ink_cost = ink_consumption_ml * settings.ink_cost_per_ml;
    let estimated_total_cost = ink_cost + additional_cost;
    let suggested_price = (estimated_total_cost * complexity.price_multiplier()).max(0.0);

    let final_price = match final_price_override {
        Some(price) if price > 0.0 => price,
        _ => suggested_price,
    };

    QuoteCosts {
        area_m2,
        ink_consumption_ml,
        ink_cost,
        estimated_total_cost,
        suggested_price,
        final_price,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::domain::budgets::DimensionUnit;

    fn dims(width: f64, height: f64) -> Dimensions {
        Dimensions {
            width,
            height,
            unit: DimensionUnit::M,
        }
    }

    #[test]
    fn banner_two_by_one_and_a_half_meters() {
        // 2m x 1.5m, factor 10 mL/m², ink 0.65/mL, medium complexity
        let costs = quote_costs(
            &dims(2.0, 1.5),
            &AppSettings::default(),
            Complexity::Medium,
            0.0,
            None,
        );

        assert_eq!(costs.area_m2, 3.0);
        assert_eq!(costs.ink_consumption_ml, 30.0);
        assert_eq!(costs.ink_cost, 19.5);
        assert_eq!(costs.estimated_total_cost, 19.5);
        assert_eq!(costs.suggested_price, 48.75);
        assert_eq!(costs.final_price, 48.75);
    }

    #[test]
    fn multiplier_per_complexity_tier() {
        let settings = AppSettings {
            ink_cost_per_ml: 1.0,
            ink_consumption_factor: 1.0,
            ..Default::default()
        };
        // 1 m² at 1 mL/m² and 1.0/mL gives an estimated cost of exactly 1.0
        for (complexity, expected) in [
            (Complexity::Low, 2.0),
            (Complexity::Medium, 2.5),
            (Complexity::High, 3.0),
        ] {
            let costs = quote_costs(&dims(1.0, 1.0), &settings, complexity, 0.0, None);
            assert_eq!(costs.suggested_price, expected);
        }
    }

    #[test]
    fn positive_override_wins_over_suggested_price() {
        let costs = quote_costs(
            &dims(2.0, 1.5),
            &AppSettings::default(),
            Complexity::Medium,
            0.0,
            Some(120.0),
        );
        assert_eq!(costs.suggested_price, 48.75);
        assert_eq!(costs.final_price, 120.0);
    }

    #[test]
    fn non_positive_override_falls_back_to_suggested_price() {
        for override_price in [Some(0.0), Some(-10.0), None] {
            let costs = quote_costs(
                &dims(2.0, 1.5),
                &AppSettings::default(),
                Complexity::Medium,
                0.0,
                override_price,
            );
            assert_eq!(costs.final_price, 48.75);
        }
    }

    #[test]
    fn degenerate_dimensions_yield_zero_fields() {
        for (width, height) in [(0.0, 1.5), (2.0, 0.0), (-2.0, 1.5), (-2.0, -1.5)] {
            let costs = quote_costs(
                &dims(width, height),
                &AppSettings::default(),
                Complexity::Low,
                0.0,
                None,
            );
            assert_eq!(costs.area_m2, 0.0);
            assert_eq!(costs.ink_consumption_ml, 0.0);
            assert_eq!(costs.ink_cost, 0.0);
            assert_eq!(costs.final_price, 0.0);
        }
    }

    #[test]
    fn additional_cost_feeds_estimated_total_and_price() {
        let costs = quote_costs(
            &dims(2.0, 1.5),
            &AppSettings::default(),
            Complexity::Low,
            50.0,
            None,
        );
        assert_eq!(costs.estimated_total_cost, 69.5);
        assert_eq!(costs.suggested_price, 139.0);
    }

    #[test]
    fn suggested_price_never_goes_negative() {
        let costs = quote_costs(
            &dims(1.0, 1.0),
            &AppSettings::default(),
            Complexity::Low,
            -100.0,
            None,
        );
        assert_eq!(costs.suggested_price, 0.0);
        assert_eq!(costs.final_price, 0.0);
    }
}
