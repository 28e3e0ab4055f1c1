//! Assembles one analysis pass: classification, condition, market
//! aggregation, pricing, and the prospect read derived from it.
//!
//! Each stage is a pure function of its inputs; the only async work
//! (market fetches) happens upstream in `infra` and arrives here as plain
//! observations plus any failure reasons.

use time::OffsetDateTime;
use uuid::Uuid;

use super::condition;
use super::entities::{
    AnalysisResult, BarcodeMatch, ConditionAssessment, Identification, MarketObservation,
    PriceQuote, ProspectAnalysis, VisionExtraction,
};
use super::market;
use super::pricing::{PricingConfig, ProductFacts};
use super::prospect::{ProspectInputs, ProspectPolicy};
use super::taxonomy;

/// Everything one analysis pass consumes. Market data is already fetched;
/// `source_failures` carries reasons from sources that errored or timed
/// out so the result can be tagged instead of silently defaulted.
#[derive(Clone, Debug, Default)]
pub struct AnalysisInput {
    pub label: String,
    /// Free-text category hint; falls back to the label when empty.
    pub category_hint: String,
    pub condition_score: f64,
    pub defects: Vec<String>,
    pub vision: VisionExtraction,
    pub barcode: Option<BarcodeMatch>,
    pub observations: Vec<MarketObservation>,
    pub fallback_retail_price: f64,
    pub size: Option<String>,
    pub source_failures: Vec<String>,
}

/// Stateless pipeline front: owns the pricing and prospect policy tables.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    pub pricing: PricingConfig,
    pub policy: ProspectPolicy,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policies(pricing: PricingConfig, policy: ProspectPolicy) -> Self {
        Self { pricing, policy }
    }

    /// Runs the full pass for one item. Total: missing market data and
    /// failed sources degrade confidence and populate reasons, they never
    /// fail the analysis.
    pub fn analyze(&self, input: AnalysisInput, now: OffsetDateTime) -> AnalysisResult {
        let identification = identify(&input);
        let assessment = condition::assess(
            input.condition_score,
            identification.category_letter,
            &input.defects,
        );

        let summary = market::aggregate(&input.observations, input.fallback_retail_price);
        let demand = market::demand_level(&summary);

        let facts = ProductFacts {
            brand: identification.brand.as_deref(),
            size: input.size.as_deref(),
            category_letter: identification.category_letter,
        };
        let quote = self
            .pricing
            .quote(&summary, &assessment, facts, demand, now.month());
        let fees = self.pricing.fees(quote.realistic);
        let margins = self.pricing.margins(&quote);

        let mut reasons = input.source_failures.clone();
        if input.observations.is_empty() {
            reasons.push("No market observations; priced from discounted retail".to_string());
        }

        let confidence = overall_confidence(
            summary.confidence,
            input.vision.confidence,
            input.barcode.as_ref().map(|b| b.confidence),
            &reasons,
        );

        let listing_text = listing_text(&identification, &assessment, &quote, input.size.as_deref());

        AnalysisResult {
            id: Uuid::new_v4(),
            identification,
            condition: assessment,
            quote,
            market: summary,
            demand,
            competitor_count: input.observations.len(),
            fees,
            margins,
            listing_text,
            confidence,
            reasons,
            analyzed_at: now,
        }
    }

    /// Derives the pre-purchase read from a finished analysis.
    pub fn prospect(&self, analysis: &AnalysisResult) -> ProspectAnalysis {
        self.policy.evaluate(ProspectInputs {
            estimated_sell_price: analysis.quote.realistic,
            condition_multiplier: analysis.condition.multiplier,
            competitor_count: analysis.competitor_count,
            confidence: analysis.confidence,
        })
    }

    /// Convenience for callers pricing against the current calendar month.
    pub fn analyze_now(&self, input: AnalysisInput) -> AnalysisResult {
        self.analyze(input, OffsetDateTime::now_utc())
    }
}

/// Merges label, barcode, and vision signals. Barcode wins where present
/// (it is the strongest identity signal), vision mentions fill the gaps.
fn identify(input: &AnalysisInput) -> Identification {
    let barcode = input.barcode.as_ref();

    let name = barcode
        .map(|b| b.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| input.label.clone());

    let brand = barcode
        .and_then(|b| b.brand.clone())
        .or_else(|| input.vision.brand_mentions.first().cloned());

    let model = barcode
        .and_then(|b| b.model.clone())
        .or_else(|| input.vision.model_candidates.first().cloned());

    let category_label = if input.category_hint.trim().is_empty() {
        &name
    } else {
        &input.category_hint
    };
    let rule = taxonomy::classify(category_label);

    Identification {
        name,
        brand,
        model,
        category_name: rule.name.to_string(),
        category_letter: rule.letter,
    }
}

/// Blends stage confidences; hard failures drag the result toward zero so
/// downstream code sees a clearly tagged low-trust analysis.
fn overall_confidence(
    market: f32,
    vision: f32,
    barcode: Option<f32>,
    reasons: &[String],
) -> f32 {
    let mut weights = vec![(market, 0.5), (vision.clamp(0.0, 1.0), 0.3)];
    if let Some(barcode) = barcode {
        weights.push((barcode.clamp(0.0, 1.0), 0.2));
    }

    let total_weight: f32 = weights.iter().map(|(_, w)| w).sum();
    let blended: f32 =
        weights.iter().map(|(value, weight)| value * weight).sum::<f32>() / total_weight;

    // Each failed source halves the remaining trust.
    let penalized = blended * 0.5_f32.powi(reasons.len() as i32);
    penalized.clamp(0.0, 1.0)
}

fn listing_text(
    identification: &Identification,
    assessment: &ConditionAssessment,
    quote: &PriceQuote,
    size: Option<&str>,
) -> String {
    let mut title = String::new();
    if let Some(brand) = identification.brand.as_deref() {
        if !identification
            .name
            .to_lowercase()
            .contains(&brand.to_lowercase())
        {
            title.push_str(brand);
            title.push(' ');
        }
    }
    title.push_str(&identification.name);
    if let Some(size) = size {
        title.push_str(&format!(" (Size {size})"));
    }

    let mut lines = vec![
        title,
        format!("Condition: {}", assessment.tier.label()),
        format!("Asking {:.2}", quote.realistic),
    ];
    if !assessment.defects.is_empty() {
        lines.push(format!("Noted flaws: {}", assessment.defects.join(", ")));
    }
    lines.join("\n")
}
