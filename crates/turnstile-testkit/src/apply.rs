//! Region-based authorization applier.
//!
//! Models the document's gated regions without a DOM: each region holds a
//! visibility expression and a hide marker, and applying a response
//! evaluates every expression through the real evaluator. Regions marked as
//! templated re-render before their hide marker is toggled, mirroring the
//! attribute contract.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use turnstile_core::effects::{ApplyEffects, ApplyError};
use turnstile_core::expr;

#[derive(Debug, Clone)]
struct Region {
    expression: String,
    hidden: bool,
    templated: bool,
    renders: usize,
}

/// Applier over a fixed set of expression-gated regions.
#[derive(Default)]
pub struct RegionApplier {
    regions: Mutex<Vec<Region>>,
    applied: Mutex<Vec<Value>>,
}

impl RegionApplier {
    /// Applier with no regions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region gated by a visibility expression. Regions start hidden.
    pub fn with_region(self, expression: impl Into<String>) -> Self {
        self.push_region(expression, false);
        self
    }

    /// Add a templated region: it re-renders on every application before its
    /// hide marker is toggled.
    pub fn with_templated_region(self, expression: impl Into<String>) -> Self {
        self.push_region(expression, true);
        self
    }

    fn push_region(&self, expression: impl Into<String>, templated: bool) {
        self.regions.lock().push(Region {
            expression: expression.into(),
            hidden: true,
            templated,
            renders: 0,
        });
    }

    /// Whether the hide marker is currently set on region `index`.
    pub fn region_hidden(&self, index: usize) -> bool {
        self.regions.lock()[index].hidden
    }

    /// How many times region `index` has re-rendered.
    pub fn region_renders(&self, index: usize) -> usize {
        self.regions.lock()[index].renders
    }

    /// Every response applied so far, in order.
    pub fn applied(&self) -> Vec<Value> {
        self.applied.lock().clone()
    }
}

#[async_trait]
impl ApplyEffects for RegionApplier {
    async fn apply(&self, authdata: &Value) -> Result<(), ApplyError> {
        let mut regions = self.regions.lock();
        for region in regions.iter_mut() {
            let visible = expr::evaluate(&region.expression, authdata).map_err(|err| {
                ApplyError::Failed {
                    reason: err.to_string(),
                }
            })?;
            if region.templated {
                region.renders += 1;
            }
            region.hidden = !visible;
        }
        drop(regions);
        self.applied.lock().push(authdata.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn hide_marker_follows_expression() {
        let applier = RegionApplier::new()
            .with_region("subscriber")
            .with_region("NOT subscriber");

        applier.apply(&json!({ "subscriber": true })).await.unwrap();
        assert!(!applier.region_hidden(0));
        assert!(applier.region_hidden(1));

        applier.apply(&json!({ "subscriber": false })).await.unwrap();
        assert!(applier.region_hidden(0));
        assert!(!applier.region_hidden(1));
    }

    #[tokio::test]
    async fn templated_region_renders_before_unhiding() {
        let applier = RegionApplier::new().with_templated_region("subscriber");
        applier.apply(&json!({ "subscriber": true })).await.unwrap();
        assert_eq!(applier.region_renders(0), 1);
        assert!(!applier.region_hidden(0));
    }

    #[tokio::test]
    async fn malformed_expression_fails_application() {
        let applier = RegionApplier::new().with_region("subscriber = ");
        let result = applier.apply(&json!({ "subscriber": true })).await;
        assert!(result.is_err());
    }
}
