use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Labour, equipment or material.
    #[default]
    Resource,
    /// Any other cost line.
    Other,
}

/// A cost line attached to a task. Carried through import and export; the
/// engine never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ResourceKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    /// Subtotal. Filled from `quantity * unit_price` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
}

impl Resource {
    pub fn new(id: impl Into<String>, kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            quantity: None,
            unit_price: None,
            total_cost: None,
        }
    }

    pub fn with_pricing(mut self, quantity: f64, unit_price: f64) -> Self {
        self.quantity = Some(quantity);
        self.unit_price = Some(unit_price);
        self.total_cost = self.computed_cost();
        self
    }

    fn computed_cost(&self) -> Option<f64> {
        Some(self.quantity? * self.unit_price?)
    }

    /// Stated total, or the product of quantity and unit price.
    pub fn cost(&self) -> Option<f64> {
        self.total_cost.or_else(|| self.computed_cost())
    }

    /// Fills a missing total from quantity and unit price.
    pub fn fill_total_cost(&mut self) {
        if self.total_cost.is_none() {
            self.total_cost = self.computed_cost();
        }
    }
}

/// Sum of [`Resource::cost`] over every resource that has one.
pub fn total_resource_cost(resources: &[Resource]) -> f64 {
    resources.iter().filter_map(Resource::cost).sum()
}
