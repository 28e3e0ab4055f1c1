//! Pricing engine: base market price times condition, size, brand, demand,
//! and seasonal multipliers, plus fee-adjusted margins.
//!
//! Every multiplier and fee rate lives on [`PricingConfig`] so the model is
//! auditable and testable in isolation. Multipliers are scalars combined
//! multiplicatively; order does not matter.

use serde::{Deserialize, Serialize};
use time::Month;

use super::entities::{
    ConditionAssessment, DemandLevel, FeeBreakdown, MarketSummary, PriceQuote, PriceTrend,
    ProfitMargins,
};

/// All tunable pricing policy in one place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// A quote is never zero or negative; realistic is floored here.
    pub min_price_floor: f64,
    pub quick_sale_ratio: f64,
    pub max_profit_ratio: f64,
    /// Premium for a high-demand size in a size-sensitive category.
    pub size_premium: f64,
    pub brand_luxury: f64,
    pub brand_hype: f64,
    pub brand_premium: f64,
    pub demand_high: f64,
    pub demand_low: f64,
    /// Secondary nudge on top of the demand multiplier.
    pub trend_increasing: f64,
    pub trend_decreasing: f64,
    /// Boost for seasonally-relevant categories in their peak months.
    pub seasonal_boost: f64,
    /// Marketplace final-value fee, fraction of sale price.
    pub marketplace_fee_rate: f64,
    /// Payment processing: fraction of sale price plus a fixed amount.
    pub payment_fee_rate: f64,
    pub payment_fee_fixed: f64,
    pub shipping_cost: f64,
    pub listing_fee: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            min_price_floor: 5.0,
            quick_sale_ratio: 0.85,
            max_profit_ratio: 1.15,
            size_premium: 1.10,
            brand_luxury: 1.40,
            brand_hype: 1.25,
            brand_premium: 1.12,
            demand_high: 1.08,
            demand_low: 0.92,
            trend_increasing: 1.05,
            trend_decreasing: 0.95,
            seasonal_boost: 1.10,
            marketplace_fee_rate: 0.1325,
            payment_fee_rate: 0.029,
            payment_fee_fixed: 0.30,
            shipping_cost: 8.50,
            listing_fee: 0.35,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrandTier {
    Luxury,
    Hype,
    Premium,
    Standard,
}

/// Known brands by tier, matched case-insensitively by substring so
/// "Nike Sportswear" still hits "nike". Unrecognized brands are Standard.
pub static BRAND_TIERS: &[(&str, BrandTier)] = &[
    ("louis vuitton", BrandTier::Luxury),
    ("gucci", BrandTier::Luxury),
    ("prada", BrandTier::Luxury),
    ("chanel", BrandTier::Luxury),
    ("hermes", BrandTier::Luxury),
    ("burberry", BrandTier::Luxury),
    ("supreme", BrandTier::Hype),
    ("off-white", BrandTier::Hype),
    ("palace", BrandTier::Hype),
    ("bape", BrandTier::Hype),
    ("fear of god", BrandTier::Hype),
    ("yeezy", BrandTier::Hype),
    ("jordan", BrandTier::Hype),
    ("nike", BrandTier::Premium),
    ("adidas", BrandTier::Premium),
    ("new balance", BrandTier::Premium),
    ("patagonia", BrandTier::Premium),
    ("north face", BrandTier::Premium),
    ("lululemon", BrandTier::Premium),
    ("carhartt", BrandTier::Premium),
    ("levi", BrandTier::Premium),
    ("sony", BrandTier::Premium),
    ("apple", BrandTier::Premium),
];

pub fn brand_tier(brand: &str) -> BrandTier {
    let needle = brand.trim().to_lowercase();
    BRAND_TIERS
        .iter()
        .find(|(name, _)| needle.contains(name))
        .map(|&(_, tier)| tier)
        .unwrap_or(BrandTier::Standard)
}

/// High-demand sizes per size-sensitive category letter. Categories absent
/// here price size-neutral.
static HIGH_DEMAND_SIZES: &[(char, &[&str])] = &[
    ('A', &["9", "9.5", "10", "10.5", "11"]),
    ('B', &["m", "l", "xl"]),
    ('C', &["m", "l", "xl"]),
    ('D', &["30", "32", "34", "m", "l"]),
];

/// Peak sale months per category letter.
static SEASONAL_PEAKS: &[(char, &[Month])] = &[
    (
        'B',
        &[
            Month::October,
            Month::November,
            Month::December,
            Month::January,
            Month::February,
        ],
    ),
    ('A', &[Month::August, Month::September]),
    ('J', &[Month::May, Month::June, Month::July, Month::August]),
    ('H', &[Month::November, Month::December]),
];

/// Item facts the multipliers key off.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductFacts<'a> {
    pub brand: Option<&'a str>,
    pub size: Option<&'a str>,
    pub category_letter: char,
}

impl PricingConfig {
    /// Produces the three price points from market base price and the
    /// multiplier stack. Invariant: quick_sale <= realistic <= max_profit.
    pub fn quote(
        &self,
        summary: &MarketSummary,
        condition: &ConditionAssessment,
        product: ProductFacts<'_>,
        demand: DemandLevel,
        month: Month,
    ) -> PriceQuote {
        let adjusted = summary.average_price
            * condition.multiplier
            * self.size_multiplier(product)
            * self.brand_multiplier(product.brand)
            * self.demand_multiplier(demand, summary.trend)
            * self.seasonal_multiplier(product.category_letter, month);

        let realistic = adjusted.max(self.min_price_floor);
        let quick_sale = realistic * self.quick_sale_ratio;
        let max_profit = realistic * self.max_profit_ratio;

        PriceQuote {
            realistic,
            quick_sale,
            max_profit,
            range_low: quick_sale,
            range_high: max_profit,
        }
    }

    pub fn size_multiplier(&self, product: ProductFacts<'_>) -> f64 {
        let Some(size) = product.size else {
            return 1.0;
        };
        let size = size.trim().to_lowercase();
        let letter = product.category_letter.to_ascii_uppercase();

        HIGH_DEMAND_SIZES
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, sizes)| {
                if sizes.contains(&size.as_str()) {
                    self.size_premium
                } else {
                    1.0
                }
            })
            .unwrap_or(1.0)
    }

    pub fn brand_multiplier(&self, brand: Option<&str>) -> f64 {
        match brand.map(brand_tier) {
            Some(BrandTier::Luxury) => self.brand_luxury,
            Some(BrandTier::Hype) => self.brand_hype,
            Some(BrandTier::Premium) => self.brand_premium,
            Some(BrandTier::Standard) | None => 1.0,
        }
    }

    pub fn demand_multiplier(&self, demand: DemandLevel, trend: PriceTrend) -> f64 {
        let base = match demand {
            DemandLevel::High => self.demand_high,
            DemandLevel::Medium => 1.0,
            DemandLevel::Low => self.demand_low,
        };
        let nudge = match trend {
            PriceTrend::Increasing => self.trend_increasing,
            PriceTrend::Stable => 1.0,
            PriceTrend::Decreasing => self.trend_decreasing,
        };
        base * nudge
    }

    pub fn seasonal_multiplier(&self, category_letter: char, month: Month) -> f64 {
        let letter = category_letter.to_ascii_uppercase();
        SEASONAL_PEAKS
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, months)| {
                if months.contains(&month) {
                    self.seasonal_boost
                } else {
                    1.0
                }
            })
            .unwrap_or(1.0)
    }

    /// Marketplace, payment, shipping, and listing fees at a given sale
    /// price.
    pub fn fees(&self, price: f64) -> FeeBreakdown {
        FeeBreakdown {
            marketplace_fee: price * self.marketplace_fee_rate,
            payment_fee: price * self.payment_fee_rate + self.payment_fee_fixed,
            shipping_cost: self.shipping_cost,
            listing_fee: self.listing_fee,
        }
    }

    /// Profit at one price point after all fees computed at that point.
    pub fn margin(&self, price: f64) -> f64 {
        price - self.fees(price).total()
    }

    pub fn margins(&self, quote: &PriceQuote) -> ProfitMargins {
        ProfitMargins {
            realistic: self.margin(quote.realistic),
            quick_sale: self.margin(quote.quick_sale),
            max_profit: self.margin(quote.max_profit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::condition;
    use crate::domain::market;

    fn summary(average: f64) -> MarketSummary {
        MarketSummary {
            average_price: average,
            price_low: average,
            price_high: average,
            trend: PriceTrend::Stable,
            confidence: 0.8,
            recent_prices: vec![average],
            sample_count: 5,
        }
    }

    fn neutral_facts() -> ProductFacts<'static> {
        ProductFacts {
            brand: None,
            size: None,
            category_letter: 'Z',
        }
    }

    #[test]
    fn quote_orders_price_points() {
        let config = PricingConfig::default();
        let condition = condition::assess(90.0, 'Z', &[]);
        let quote = config.quote(
            &summary(100.0),
            &condition,
            neutral_facts(),
            DemandLevel::Medium,
            Month::April,
        );

        assert!(quote.quick_sale <= quote.realistic);
        assert!(quote.realistic <= quote.max_profit);
        assert_eq!(quote.range_low, quote.quick_sale);
        assert_eq!(quote.range_high, quote.max_profit);
    }

    #[test]
    fn floor_keeps_prices_positive() {
        let config = PricingConfig::default();
        let condition = condition::assess(10.0, 'Z', &[]);
        let quote = config.quote(
            &summary(0.5),
            &condition,
            neutral_facts(),
            DemandLevel::Low,
            Month::April,
        );
        assert_eq!(quote.realistic, config.min_price_floor);
        assert!(quote.quick_sale > 0.0);
    }

    #[test]
    fn multipliers_combine_multiplicatively() {
        let config = PricingConfig::default();
        // Like New hoodie from a premium brand: both factors must show up
        // as a product, not a sum.
        let condition = condition::assess(96.0, 'B', &[]);
        let facts = ProductFacts {
            brand: Some("Nike"),
            size: None,
            category_letter: 'B',
        };
        let quote = config.quote(
            &summary(100.0),
            &condition,
            facts,
            DemandLevel::Medium,
            Month::April,
        );

        let expected = 100.0 * 1.0 * config.brand_premium;
        assert!((quote.realistic - expected).abs() < 1e-9);
    }

    #[test]
    fn brand_tiers_resolve_by_substring() {
        assert_eq!(brand_tier("Nike Sportswear"), BrandTier::Premium);
        assert_eq!(brand_tier("GUCCI"), BrandTier::Luxury);
        assert_eq!(brand_tier("Supreme NYC"), BrandTier::Hype);
        assert_eq!(brand_tier("Shein"), BrandTier::Standard);
    }

    #[test]
    fn size_premium_only_in_size_sensitive_categories() {
        let config = PricingConfig::default();
        let shoes = ProductFacts {
            brand: None,
            size: Some("10"),
            category_letter: 'A',
        };
        let media = ProductFacts {
            brand: None,
            size: Some("10"),
            category_letter: 'I',
        };
        let odd_size = ProductFacts {
            brand: None,
            size: Some("15"),
            category_letter: 'A',
        };

        assert_eq!(config.size_multiplier(shoes), config.size_premium);
        assert_eq!(config.size_multiplier(media), 1.0);
        assert_eq!(config.size_multiplier(odd_size), 1.0);
    }

    #[test]
    fn demand_multiplier_includes_trend_nudge() {
        let config = PricingConfig::default();
        assert!(
            config.demand_multiplier(DemandLevel::High, PriceTrend::Increasing)
                > config.demand_multiplier(DemandLevel::High, PriceTrend::Stable)
        );
        assert!(
            config.demand_multiplier(DemandLevel::Low, PriceTrend::Decreasing)
                < config.demand_multiplier(DemandLevel::Low, PriceTrend::Stable)
        );
        assert_eq!(
            config.demand_multiplier(DemandLevel::Medium, PriceTrend::Stable),
            1.0
        );
    }

    #[test]
    fn seasonal_boost_applies_in_peak_months_only() {
        let config = PricingConfig::default();
        assert_eq!(
            config.seasonal_multiplier('B', Month::December),
            config.seasonal_boost
        );
        assert_eq!(config.seasonal_multiplier('B', Month::June), 1.0);
        assert_eq!(config.seasonal_multiplier('I', Month::December), 1.0);
    }

    #[test]
    fn fees_break_down_and_total() {
        let config = PricingConfig::default();
        let fees = config.fees(100.0);
        assert!((fees.marketplace_fee - 13.25).abs() < 1e-9);
        assert!((fees.payment_fee - 3.20).abs() < 1e-9);
        assert!(
            (fees.total() - (13.25 + 3.20 + config.shipping_cost + config.listing_fee)).abs()
                < 1e-9
        );
    }

    #[test]
    fn margins_subtract_fees_at_each_price_point() {
        let config = PricingConfig::default();
        let condition = condition::assess(90.0, 'Z', &[]);
        let quote = config.quote(
            &summary(80.0),
            &condition,
            neutral_facts(),
            DemandLevel::Medium,
            Month::April,
        );
        let margins = config.margins(&quote);

        assert!((margins.realistic - config.margin(quote.realistic)).abs() < 1e-9);
        assert!(margins.quick_sale < margins.realistic);
        assert!(margins.realistic < margins.max_profit);
    }

    #[test]
    fn quote_from_aggregated_market_keeps_ordering() {
        let config = PricingConfig::default();
        let observations: Vec<_> = [40.0, 45.0, 50.0]
            .iter()
            .map(|&p| crate::domain::entities::MarketObservation::new(p, 0.9))
            .collect();
        let summary = market::aggregate(&observations, 0.0);
        let condition = condition::assess(70.0, 'C', &["stain".to_string()]);
        let quote = config.quote(
            &summary,
            &condition,
            neutral_facts(),
            market::demand_level(&summary),
            Month::April,
        );
        assert!(quote.quick_sale <= quote.realistic && quote.realistic <= quote.max_profit);
    }
}
