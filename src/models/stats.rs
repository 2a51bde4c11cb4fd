//! Dashboard statistics models

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::{enums::EquipmentStatus, equipment::Equipment};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatEntry {
    pub label: String,
    pub value: i64,
}

/// Counts in the four fixed status buckets; absent statuses count zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusBreakdown(IndexMap<EquipmentStatus, i64>);

impl StatusBreakdown {
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (EquipmentStatus, i64)>,
    {
        let mut buckets: IndexMap<EquipmentStatus, i64> =
            EquipmentStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for (status, count) in counts {
            *buckets.entry(status).or_insert(0) += count;
        }
        Self(buckets)
    }

    pub fn get(&self, status: EquipmentStatus) -> i64 {
        self.0.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }
}

/// Dashboard figures for one scope
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Department the figures are limited to; `None` means every department
    pub department_id: Option<String>,
    pub total_equipment: i64,
    #[schema(value_type = Object)]
    pub by_status: StatusBreakdown,
    /// Equipment counts per type, largest first
    pub by_type: Vec<StatEntry>,
    pub recent_equipment: Vec<Equipment>,
    #[schema(value_type = String)]
    pub total_maintenance_cost: Decimal,
    /// Department record counts per schema kind
    pub records_by_kind: Vec<StatEntry>,
}
