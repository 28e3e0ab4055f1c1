//! Merges price observations from multiple market sources into one
//! average, trend, and confidence score.

use super::entities::{DemandLevel, MarketObservation, MarketSummary, PriceTrend};

/// Heuristic markdown applied to retail price when no market data exists.
pub const FALLBACK_RETAIL_MARKDOWN: f64 = 0.6;
/// Half-width of the synthesized price band in the fallback path.
pub const FALLBACK_BAND_SPREAD: f64 = 0.15;
/// Confidence assigned to the retail-heuristic fallback.
pub const FALLBACK_CONFIDENCE: f32 = 0.5;

/// Cap on the recent-price window exposed to downstream consumers.
pub const RECENT_WINDOW: usize = 10;
/// Slice size compared for trend detection.
pub const TREND_SLICE: usize = 5;
/// Recent mean above `older * 1.10` reads as increasing, below `* 0.90`
/// as decreasing.
pub const TREND_UP_RATIO: f64 = 1.10;
pub const TREND_DOWN_RATIO: f64 = 0.90;

/// Folds observations into a [`MarketSummary`]. Total: an empty set falls
/// back to a discounted retail estimate at reduced confidence instead of
/// failing.
pub fn aggregate(observations: &[MarketObservation], fallback_retail: f64) -> MarketSummary {
    if observations.is_empty() {
        let average = fallback_retail * FALLBACK_RETAIL_MARKDOWN;
        return MarketSummary {
            average_price: average,
            price_low: average * (1.0 - FALLBACK_BAND_SPREAD),
            price_high: average * (1.0 + FALLBACK_BAND_SPREAD),
            trend: PriceTrend::Stable,
            confidence: FALLBACK_CONFIDENCE,
            recent_prices: Vec::new(),
            sample_count: 0,
        };
    }

    let prices: Vec<f64> = observations.iter().map(|obs| obs.price).collect();
    let average = prices.iter().sum::<f64>() / prices.len() as f64;

    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let recent_prices: Vec<f64> = prices
        .iter()
        .rev()
        .take(RECENT_WINDOW)
        .rev()
        .copied()
        .collect();

    MarketSummary {
        average_price: average,
        price_low: low,
        price_high: high,
        trend: detect_trend(&prices),
        confidence: confidence_for(observations),
        recent_prices,
        sample_count: prices.len(),
    }
}

/// Compares the mean of the most recent slice (supplied order) against the
/// earliest slice.
fn detect_trend(prices: &[f64]) -> PriceTrend {
    let older: Vec<f64> = prices.iter().take(TREND_SLICE).copied().collect();
    let recent: Vec<f64> = prices
        .iter()
        .rev()
        .take(TREND_SLICE)
        .rev()
        .copied()
        .collect();

    let older_mean = older.iter().sum::<f64>() / older.len() as f64;
    let recent_mean = recent.iter().sum::<f64>() / recent.len() as f64;

    if older_mean <= 0.0 {
        return PriceTrend::Stable;
    }

    if recent_mean > older_mean * TREND_UP_RATIO {
        PriceTrend::Increasing
    } else if recent_mean < older_mean * TREND_DOWN_RATIO {
        PriceTrend::Decreasing
    } else {
        PriceTrend::Stable
    }
}

/// Confidence scales with sample count (monotonic non-decreasing), weighted
/// by how much the sources themselves trusted their observations.
fn confidence_for(observations: &[MarketObservation]) -> f32 {
    let count_score = match observations.len() {
        0 => return FALLBACK_CONFIDENCE,
        1..=2 => 0.55,
        3..=4 => 0.65,
        5..=9 => 0.80,
        _ => 0.90,
    };

    let source_avg = observations
        .iter()
        .map(|obs| obs.source_confidence)
        .sum::<f32>()
        / observations.len() as f32;

    (count_score * (0.5 + 0.5 * source_avg.clamp(0.0, 1.0))).clamp(0.0, 1.0)
}

/// Demand read used by the pricing engine, derived from sample volume and
/// direction.
pub fn demand_level(summary: &MarketSummary) -> DemandLevel {
    if summary.sample_count == 0 {
        return DemandLevel::Low;
    }
    if summary.sample_count >= TREND_SLICE && summary.trend == PriceTrend::Increasing {
        return DemandLevel::High;
    }
    if summary.trend == PriceTrend::Decreasing {
        DemandLevel::Low
    } else {
        DemandLevel::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(prices: &[f64]) -> Vec<MarketObservation> {
        prices
            .iter()
            .map(|&price| MarketObservation::new(price, 1.0))
            .collect()
    }

    #[test]
    fn empty_observations_use_retail_heuristic() {
        let summary = aggregate(&[], 170.0);
        assert!((summary.average_price - 102.0).abs() < 1e-9);
        assert!(summary.confidence <= 0.6);
        assert_eq!(summary.sample_count, 0);
        assert!(summary.price_low < summary.average_price);
        assert!(summary.price_high > summary.average_price);
        assert!(
            (summary.average_price - summary.price_low
                - (summary.price_high - summary.average_price))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn average_is_arithmetic_mean() {
        let summary = aggregate(&obs(&[10.0, 20.0, 30.0]), 0.0);
        assert!((summary.average_price - 20.0).abs() < 1e-9);
        assert_eq!(summary.sample_count, 3);
    }

    #[test]
    fn trend_increasing_when_recent_mean_outruns_older() {
        let prices = [10.0, 10.0, 10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 20.0, 20.0];
        assert_eq!(aggregate(&obs(&prices), 0.0).trend, PriceTrend::Increasing);
    }

    #[test]
    fn trend_decreasing_when_recent_mean_drops() {
        let prices = [20.0, 20.0, 20.0, 20.0, 20.0, 10.0, 10.0, 10.0, 10.0, 10.0];
        assert_eq!(aggregate(&obs(&prices), 0.0).trend, PriceTrend::Decreasing);
    }

    #[test]
    fn trend_stable_inside_the_band() {
        let prices = [20.0, 20.0, 20.0, 20.0, 20.0, 21.0, 21.0, 21.0, 21.0, 21.0];
        assert_eq!(aggregate(&obs(&prices), 0.0).trend, PriceTrend::Stable);
    }

    #[test]
    fn short_histories_read_as_stable() {
        assert_eq!(aggregate(&obs(&[15.0]), 0.0).trend, PriceTrend::Stable);
        assert_eq!(aggregate(&obs(&[15.0, 16.0]), 0.0).trend, PriceTrend::Stable);
    }

    #[test]
    fn confidence_monotonic_in_sample_count() {
        let mut last = 0.0_f32;
        for n in [1, 2, 3, 5, 8, 12, 20] {
            let prices: Vec<f64> = (0..n).map(|_| 25.0).collect();
            let confidence = aggregate(&obs(&prices), 0.0).confidence;
            assert!(
                confidence >= last,
                "n={n} gave {confidence} < {last}"
            );
            last = confidence;
        }
    }

    #[test]
    fn recent_prices_window_is_capped() {
        let prices: Vec<f64> = (1..=25).map(|i| i as f64).collect();
        let summary = aggregate(&obs(&prices), 0.0);
        assert_eq!(summary.recent_prices.len(), RECENT_WINDOW);
        assert_eq!(summary.recent_prices[0], 16.0);
        assert_eq!(*summary.recent_prices.last().unwrap(), 25.0);
    }

    #[test]
    fn demand_follows_volume_and_direction() {
        assert_eq!(demand_level(&aggregate(&[], 100.0)), DemandLevel::Low);

        let rising = [10.0, 10.0, 10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 20.0, 20.0];
        assert_eq!(
            demand_level(&aggregate(&obs(&rising), 0.0)),
            DemandLevel::High
        );

        let flat = [15.0, 15.0, 15.0];
        assert_eq!(
            demand_level(&aggregate(&obs(&flat), 0.0)),
            DemandLevel::Medium
        );
    }
}
