//! Price Monitoring Engine
//!
//! One monitoring pass walks every published product, computes its margin
//! against the governing price rule, persists an immutable price check row,
//! and counts alerts. Per-product failures are collected and the pass
//! continues; only a failure to load the population aborts early.

use std::sync::Arc;

use metrics::counter;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use sea_orm::{DatabaseConnection, Set};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::models::price_check::ActiveModel as PriceCheckActiveModel;
use crate::models::price_rule::Model as PriceRuleModel;
use crate::models::product::Model as ProductModel;
use crate::repositories::{PriceCheckRepository, PriceRuleRepository, ProductRepository};

/// Margin deviations beyond this many percentage points raise an alert.
const DELTA_ALERT_THRESHOLD_PCT: i64 = 10;

/// Outcome of one monitoring pass.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct MonitoringSummary {
    /// Products successfully checked
    pub checked: u32,
    /// Checks that raised a margin alert
    pub alerts: u32,
    /// Per-product and pass-level error messages
    pub errors: Vec<String>,
}

/// Service running margin monitoring passes.
#[derive(Clone)]
pub struct PriceMonitor {
    products: ProductRepository,
    rules: PriceRuleRepository,
    checks: PriceCheckRepository,
    clock: Arc<dyn Clock>,
}

impl PriceMonitor {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            rules: PriceRuleRepository::new(db.clone()),
            checks: PriceCheckRepository::new(db),
            clock,
        }
    }

    /// Run one monitoring pass over all published products.
    #[instrument(skip(self))]
    pub async fn run_monitoring(&self) -> MonitoringSummary {
        let mut summary = MonitoringSummary::default();

        let products = match self.products.list_published().await {
            Ok(products) => products,
            Err(e) => {
                summary
                    .errors
                    .push(format!("failed to load published products: {}", e));
                return summary;
            }
        };

        let rules = match self.rules.list_active().await {
            Ok(rules) => rules,
            Err(e) => {
                summary
                    .errors
                    .push(format!("failed to load price rules: {}", e));
                return summary;
            }
        };

        let Some(rule) = rules.into_iter().next() else {
            summary
                .errors
                .push("no active price rule configured".to_string());
            return summary;
        };

        info!(
            rule = %rule.rule_name,
            target_margin_pct = rule.target_margin_pct,
            products = products.len(),
            "starting monitoring pass"
        );

        for product in products {
            match self.check_product(&product, &rule).await {
                Ok(Some(alerted)) => {
                    summary.checked += 1;
                    if alerted {
                        summary.alerts += 1;
                    }
                }
                Ok(None) => {
                    // Unpriceable product (missing or non-positive amounts)
                }
                Err(e) => {
                    warn!(product_id = %product.id, "price check failed: {}", e);
                    summary
                        .errors
                        .push(format!("product {}: {}", product.id, e));
                }
            }
        }

        counter!("monitoring_passes_total").increment(1);
        counter!("monitoring_alerts_total").increment(summary.alerts as u64);
        info!(
            checked = summary.checked,
            alerts = summary.alerts,
            errors = summary.errors.len(),
            "monitoring pass finished"
        );

        summary
    }

    /// Check one product against the governing rule.
    ///
    /// Returns `Ok(None)` when the product cannot be priced, `Ok(Some(true))`
    /// when the persisted check raised an alert.
    async fn check_product(
        &self,
        product: &ProductModel,
        rule: &PriceRuleModel,
    ) -> Result<Option<bool>, MonitorError> {
        let (Some(cost), Some(price)) = (product.cost_amount, product.selling_price_amount) else {
            return Ok(None);
        };
        if cost <= 0 || price <= 0 {
            return Ok(None);
        }

        // Exact decimal arithmetic for the margin; floats only at the edges.
        let margin = Decimal::from(price - cost) / Decimal::from(cost) * Decimal::from(100);
        let target = Decimal::from_f64(rule.target_margin_pct)
            .ok_or_else(|| MonitorError::BadRule(rule.target_margin_pct))?;
        let delta = margin - target;

        let mut alert = delta.abs() > Decimal::from(DELTA_ALERT_THRESHOLD_PCT);
        if let Some(min_margin) = rule.min_margin_pct {
            let min_margin =
                Decimal::from_f64(min_margin).ok_or(MonitorError::BadRule(min_margin))?;
            if margin < min_margin {
                alert = true;
            }
        }

        let check = PriceCheckActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product.id),
            supplier_price_amount: Set(cost),
            supplier_currency: Set(product.currency_code.clone()),
            selling_price_amount: Set(price),
            selling_currency: Set(product.currency_code.clone()),
            margin_pct: Set(margin.to_f64().unwrap_or_default()),
            delta_pct: Set(delta.to_f64()),
            observed_at: Set(self.clock.now().fixed_offset()),
        };

        self.checks
            .insert(check)
            .await
            .map_err(|e| MonitorError::Persist(e.to_string()))?;

        if alert {
            warn!(
                product_id = %product.id,
                margin_pct = %margin,
                delta_pct = %delta,
                "margin alert"
            );
        }

        Ok(Some(alert))
    }
}

#[derive(Debug, thiserror::Error)]
enum MonitorError {
    #[error("rule margin {0} is not a valid number")]
    BadRule(f64),
    #[error("failed to persist price check: {0}")]
    Persist(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn margin_arithmetic_is_exact() {
        // cost 10.00, price 15.00 in minor units
        let margin = Decimal::from(1500 - 1000) / Decimal::from(1000) * Decimal::from(100);
        assert_eq!(margin, dec!(50));

        let target = Decimal::from_f64(50.0).unwrap();
        assert_eq!(margin - target, Decimal::ZERO);
    }
}
