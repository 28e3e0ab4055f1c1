//! Domain logic for the valuation pipeline lives here.

pub mod allocator;
pub mod analysis;
pub mod condition;
pub mod entities;
pub mod market;
pub mod pricing;
pub mod prospect;
pub mod store;
pub mod taxonomy;

pub use allocator::{CodeAllocator, CounterTable};
pub use analysis::{AnalysisInput, Analyzer};
pub use entities::{
    AnalysisResult, BarcodeMatch, ConditionAssessment, ConditionTier, DemandLevel, FeeBreakdown,
    Identification, ImageRef, InventoryRecord, ItemStatus, MarketObservation, MarketSummary,
    PriceQuote, PriceTrend, ProfitMargins, ProspectAnalysis, Recommendation, RiskLevel,
    VisionExtraction,
};
pub use pricing::{BrandTier, PricingConfig, ProductFacts};
pub use prospect::{ProspectInputs, ProspectPolicy};
pub use store::{BrandPerformance, InventoryStats, InventoryStore, PersistedState};
pub use taxonomy::{classify, CategoryRule, TAXONOMY};
