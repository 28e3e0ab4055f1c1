//! In-memory inventory collection with derived statistics.
//!
//! Mutations are serialized behind one lock so statistics always reflect a
//! consistent snapshot; queries clone state out and never mutate it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::allocator::{CodeAllocator, CounterTable};
use super::entities::{InventoryRecord, ItemStatus};

/// Derived, read-only view over the whole inventory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InventoryStats {
    pub total_items: usize,
    pub counts_by_status: BTreeMap<ItemStatus, usize>,
    /// Sum of purchase prices across all records.
    pub total_investment: f64,
    /// Sum of realized profit over sold items.
    pub total_realized_profit: f64,
    /// Mean ROI over sold items with positive ROI; items at or below zero
    /// are excluded from the average, not counted as zero.
    pub average_roi_percent: f64,
    pub category_breakdown: BTreeMap<String, usize>,
    pub brand_performance: Vec<BrandPerformance>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BrandPerformance {
    pub brand: String,
    pub average_estimated_roi_percent: f64,
    pub items: usize,
}

#[derive(Debug, Default)]
struct StoreInner {
    records: Vec<InventoryRecord>,
    next_item_number: u64,
}

/// Owns the record collection; insertion assigns item numbers and, when
/// absent, inventory codes via the shared allocator.
#[derive(Debug)]
pub struct InventoryStore {
    inner: Mutex<StoreInner>,
    allocator: Arc<CodeAllocator>,
}

impl InventoryStore {
    pub fn new(allocator: Arc<CodeAllocator>) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            allocator,
        }
    }

    /// Restores records handed back by the external store on startup.
    /// Counters are raised to max(persisted, rebuilt-from-records) so the
    /// allocator can never re-issue an existing code.
    pub async fn restore(allocator: Arc<CodeAllocator>, persisted: PersistedState) -> Self {
        let rebuilt = CounterTable::rebuild_from_records(&persisted.records);
        allocator.absorb(&persisted.counters).await;
        allocator.absorb(&rebuilt).await;

        let next_item_number = persisted
            .records
            .iter()
            .map(|record| record.item_number)
            .max()
            .unwrap_or(0);

        Self {
            inner: Mutex::new(StoreInner {
                records: persisted.records,
                next_item_number,
            }),
            allocator,
        }
    }

    /// Inserts a record, assigning the next item number and an inventory
    /// code when the draft carries none. Returns the stored record.
    pub async fn insert(&self, mut record: InventoryRecord) -> InventoryRecord {
        if record.code.is_empty() {
            record.code = self.allocator.allocate(&record.category).await;
        }
        let mut inner = self.inner.lock().await;
        inner.next_item_number += 1;
        record.item_number = inner.next_item_number;
        inner.records.push(record.clone());
        record
    }

    /// Replaces the record with the same item number. The stored code is
    /// immutable once non-empty: an update cannot clear or change it.
    pub async fn update(&self, mut record: InventoryRecord) -> bool {
        let mut inner = self.inner.lock().await;
        match inner
            .records
            .iter_mut()
            .find(|existing| existing.item_number == record.item_number)
        {
            Some(existing) => {
                if !existing.code.is_empty() {
                    record.code = existing.code.clone();
                }
                *existing = record;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, item_number: u64) -> bool {
        let mut inner = self.inner.lock().await;
        let before = inner.records.len();
        inner.records.retain(|record| record.item_number != item_number);
        inner.records.len() != before
    }

    pub async fn get(&self, item_number: u64) -> Option<InventoryRecord> {
        let inner = self.inner.lock().await;
        inner
            .records
            .iter()
            .find(|record| record.item_number == item_number)
            .cloned()
    }

    pub async fn find_by_code(&self, code: &str) -> Option<InventoryRecord> {
        let inner = self.inner.lock().await;
        inner
            .records
            .iter()
            .find(|record| record.code == code)
            .cloned()
    }

    pub async fn by_status(&self, status: ItemStatus) -> Vec<InventoryRecord> {
        let inner = self.inner.lock().await;
        inner
            .records
            .iter()
            .filter(|record| record.status == status)
            .cloned()
            .collect()
    }

    pub async fn snapshot(&self) -> Vec<InventoryRecord> {
        self.inner.lock().await.records.clone()
    }

    pub async fn stats(&self) -> InventoryStats {
        let records = self.snapshot().await;
        compute_stats(&records)
    }

    pub async fn to_persisted(&self) -> PersistedState {
        PersistedState {
            records: self.snapshot().await,
            counters: self.allocator.snapshot().await,
        }
    }
}

/// Pure projection; shared with tests and diagnostics.
pub fn compute_stats(records: &[InventoryRecord]) -> InventoryStats {
    let mut counts_by_status = BTreeMap::new();
    let mut category_breakdown = BTreeMap::new();
    let mut total_investment = 0.0;
    let mut total_realized_profit = 0.0;
    let mut positive_rois = Vec::new();
    let mut brand_rois: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for record in records {
        *counts_by_status.entry(record.status).or_insert(0) += 1;
        *category_breakdown
            .entry(record.category.clone())
            .or_insert(0) += 1;
        total_investment += record.purchase_price;

        if record.status == ItemStatus::Sold {
            if let Some(profit) = record.profit() {
                total_realized_profit += profit;
            }
            if let Some(roi) = record.roi_percent() {
                if roi > 0.0 {
                    positive_rois.push(roi);
                }
            }
        }

        if let Some(brand) = record.brand.as_deref() {
            let brand = brand.trim();
            if !brand.is_empty() {
                brand_rois
                    .entry(brand.to_string())
                    .or_default()
                    .push(record.estimated_roi_percent());
            }
        }
    }

    let average_roi_percent = if positive_rois.is_empty() {
        0.0
    } else {
        positive_rois.iter().sum::<f64>() / positive_rois.len() as f64
    };

    let brand_performance = brand_rois
        .into_iter()
        .map(|(brand, rois)| BrandPerformance {
            average_estimated_roi_percent: rois.iter().sum::<f64>() / rois.len() as f64,
            items: rois.len(),
            brand,
        })
        .collect();

    InventoryStats {
        total_items: records.len(),
        counts_by_status,
        total_investment,
        total_realized_profit,
        average_roi_percent,
        category_breakdown,
        brand_performance,
    }
}

/// State handed to the external store, and back on startup.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub records: Vec<InventoryRecord>,
    #[serde(default)]
    pub counters: CounterTable,
}
