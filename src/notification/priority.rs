//! Base priority weights for event categories
//!
//! The weight is the ceiling of an event's relevance score:
//! - 0.9 payment_failed: blocks a purchase, user must act
//! - 0.8 order_delayed / 0.7 low_balance: user should know
//! - 0.5 inventory_back / 0.3 marketing_offer: optional
//!
//! Unknown categories get `DEFAULT_WEIGHT`.

use std::collections::HashMap;

use super::event::Category;
use crate::error::OptimizerError;

/// Weight for categories missing from the table
pub const DEFAULT_WEIGHT: f64 = 0.1;

/// Built-in weight of a category, `None` for `Other`
fn builtin_weight(category: &Category) -> Option<f64> {
    match category {
        Category::PaymentFailed => Some(0.9),
        Category::OrderDelayed => Some(0.8),
        Category::LowBalance => Some(0.7),
        Category::MarketingOffer => Some(0.3),
        Category::InventoryBack => Some(0.5),
        Category::Other(_) => None,
    }
}

/// Category → base weight, immutable once built
#[derive(Debug, Clone, Default)]
pub struct PriorityTable {
    overrides: HashMap<String, f64>,
}

impl PriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table with weight overrides keyed by category tag.
    ///
    /// Overrides may also introduce weights for categories outside the built-in set.
    pub fn with_overrides(overrides: HashMap<String, f64>) -> Result<Self, OptimizerError> {
        for (tag, weight) in &overrides {
            validate_weight(tag, *weight)?;
        }
        Ok(Self { overrides })
    }

    pub fn lookup(&self, category: &Category) -> f64 {
        self.overrides
            .get(category.as_str())
            .copied()
            .or_else(|| builtin_weight(category))
            .unwrap_or(DEFAULT_WEIGHT)
    }
}

fn validate_weight(tag: &str, weight: f64) -> Result<(), OptimizerError> {
    if weight.is_finite() && (0.0..=1.0).contains(&weight) {
        Ok(())
    } else {
        Err(OptimizerError::InvalidConfig(format!(
            "priority weight for '{}' must be within [0.0, 1.0], got {}",
            tag, weight
        )))
    }
}
