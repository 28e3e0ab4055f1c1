use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Opaque handle to a captured photo. Image bytes live outside the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub Uuid);

impl ImageRef {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageRef {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of a physical item being resold.
///
/// Status advances through the fixed progression below; any state may jump
/// directly to `Listed` or `Sold`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ItemStatus {
    #[default]
    Analyzed,
    ToList,
    Listed,
    Sold,
}

impl ItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Analyzed => "Analyzed",
            ItemStatus::ToList => "To list",
            ItemStatus::Listed => "Listed",
            ItemStatus::Sold => "Sold",
        }
    }

    /// Forward-only progression; `Listed` and `Sold` are reachable from
    /// any state.
    pub fn can_advance_to(&self, next: ItemStatus) -> bool {
        matches!(next, ItemStatus::Listed | ItemStatus::Sold) || next > *self
    }
}

/// One physical item being resold.
///
/// `item_number` is unique and monotonic; `code` is assigned once and never
/// reassigned after it is non-empty. Profit and ROI are derived on read,
/// never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub item_number: u64,
    /// Inventory code, e.g. "A-001". Empty until assigned at insertion.
    #[serde(default)]
    pub code: String,
    pub name: String,
    pub category: String,
    pub condition_label: String,
    pub condition_score: f64,
    pub purchase_price: f64,
    pub suggested_price: f64,
    pub realized_price: Option<f64>,
    pub status: ItemStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub listed_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub sold_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub colorway: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub storage_location: Option<String>,
    #[serde(default)]
    pub storage_bin: Option<String>,
    #[serde(default)]
    pub packaged: bool,
}

impl InventoryRecord {
    /// Realized profit, available once the item sold.
    pub fn profit(&self) -> Option<f64> {
        self.realized_price.map(|sold| sold - self.purchase_price)
    }

    /// Realized ROI in percent. `None` until sold or when the purchase
    /// price is zero.
    pub fn roi_percent(&self) -> Option<f64> {
        let profit = self.profit()?;
        if self.purchase_price > 0.0 {
            Some(profit / self.purchase_price * 100.0)
        } else {
            None
        }
    }

    pub fn estimated_profit(&self) -> f64 {
        self.suggested_price - self.purchase_price
    }

    pub fn estimated_roi_percent(&self) -> f64 {
        if self.purchase_price > 0.0 {
            self.estimated_profit() / self.purchase_price * 100.0
        } else {
            0.0
        }
    }
}

/// One external data point about an item's achievable sale price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketObservation {
    pub price: f64,
    /// How much the originating source trusts this observation, 0..=1.
    pub source_confidence: f32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub observed_at: Option<OffsetDateTime>,
}

impl MarketObservation {
    pub fn new(price: f64, source_confidence: f32) -> Self {
        Self {
            price,
            source_confidence,
            observed_at: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTrend {
    Increasing,
    Stable,
    Decreasing,
}

impl PriceTrend {
    pub fn label(&self) -> &'static str {
        match self {
            PriceTrend::Increasing => "Increasing",
            PriceTrend::Stable => "Stable",
            PriceTrend::Decreasing => "Decreasing",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

impl DemandLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DemandLevel::High => "High",
            DemandLevel::Medium => "Medium",
            DemandLevel::Low => "Low",
        }
    }
}

/// Aggregated view over all market observations for one item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    pub average_price: f64,
    pub price_low: f64,
    pub price_high: f64,
    pub trend: PriceTrend,
    /// 0..=1, monotonic non-decreasing in sample count.
    pub confidence: f32,
    /// Sliding window of the most recent observed prices, capped.
    pub recent_prices: Vec<f64>,
    pub sample_count: usize,
}

/// Discrete condition label derived from a continuous 0-100 score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConditionTier {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
    LikeNew,
}

impl ConditionTier {
    pub fn label(&self) -> &'static str {
        match self {
            ConditionTier::LikeNew => "Like New",
            ConditionTier::Excellent => "Excellent",
            ConditionTier::VeryGood => "Very Good",
            ConditionTier::Good => "Good",
            ConditionTier::Fair => "Fair",
            ConditionTier::Poor => "Poor",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionAssessment {
    pub tier: ConditionTier,
    /// Tier multiplier with category-specific defect penalties applied,
    /// clamped to 0.3..=1.0.
    pub multiplier: f64,
    pub defects: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub realistic: f64,
    pub quick_sale: f64,
    pub max_profit: f64,
    pub range_low: f64,
    pub range_high: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub marketplace_fee: f64,
    pub payment_fee: f64,
    pub shipping_cost: f64,
    pub listing_fee: f64,
}

impl FeeBreakdown {
    pub fn total(&self) -> f64 {
        self.marketplace_fee + self.payment_fee + self.shipping_cost + self.listing_fee
    }
}

/// Fee-adjusted profit at each price point of a quote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfitMargins {
    pub realistic: f64,
    pub quick_sale: f64,
    pub max_profit: f64,
}

/// What the item was identified as, merged from label, vision, and barcode
/// signals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category_name: String,
    pub category_letter: char,
}

/// Immutable computed bundle for one analysis pass. Produced once, never
/// mutated; consumed to build an [`InventoryRecord`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub identification: Identification,
    pub condition: ConditionAssessment,
    pub quote: PriceQuote,
    pub market: MarketSummary,
    pub demand: DemandLevel,
    pub competitor_count: usize,
    /// Fees computed at the realistic price point.
    pub fees: FeeBreakdown,
    pub margins: ProfitMargins,
    pub listing_text: String,
    /// Overall confidence, 0..=1. Check this before trusting any price
    /// field; degraded analyses carry reasons and near-zero confidence.
    pub confidence: f32,
    pub reasons: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub analyzed_at: OffsetDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Buy,
    Investigate,
}

impl Recommendation {
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::Buy => "Buy",
            Recommendation::Investigate => "Investigate",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Pre-purchase evaluation of a not-yet-bought item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProspectAnalysis {
    pub estimated_sell_price: f64,
    pub max_buy_price: f64,
    pub target_buy_price: f64,
    pub potential_profit: f64,
    pub expected_roi_percent: f64,
    pub recommendation: Recommendation,
    pub reasons: Vec<String>,
    pub risk: RiskLevel,
}

/// Text artifacts extracted on-device from item photos. Lists arrive
/// deduplicated; the core treats them as opaque free text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionExtraction {
    pub images: Vec<ImageRef>,
    pub brand_mentions: Vec<String>,
    pub model_candidates: Vec<String>,
    pub size_mentions: Vec<String>,
    pub barcode_candidates: Vec<String>,
    pub price_texts: Vec<String>,
    pub confidence: f32,
}

/// Successful barcode database lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarcodeMatch {
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub colorway: Option<String>,
    pub retail_price: Option<f64>,
    pub release_year: Option<i32>,
    #[serde(default)]
    pub specifications: HashMap<String, String>,
    pub confidence: f32,
}
