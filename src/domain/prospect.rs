//! Pre-purchase evaluation: max justified buy price and a buy/investigate
//! call with itemized reasons.
//!
//! Pure decision function over its inputs; all thresholds sit on
//! [`ProspectPolicy`] rather than being scattered across call sites.

use serde::{Deserialize, Serialize};

use super::entities::{ProspectAnalysis, Recommendation, RiskLevel};

/// Buy-side cost assumptions and decision thresholds in one table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProspectPolicy {
    /// Fraction of condition-adjusted sell price a buyer should pay at most.
    pub base_buy_ratio: f64,
    /// Target price as a fraction of the max buy price.
    pub target_buy_ratio: f64,
    /// Flat estimate of selling fees as a fraction of sell price.
    pub fee_rate_estimate: f64,
    /// Below this many competing listings, pay up to 10% more.
    pub low_competition_max: usize,
    /// Above this many competing listings, pay 10% less.
    pub high_competition_min: usize,
    pub competition_adjustment: f64,
    /// Rule 1: strong buy.
    pub strong_roi_pct: f64,
    pub strong_profit_min: f64,
    pub strong_confidence_min: f32,
    pub strong_condition_min: f64,
    /// Rule 2: fair buy.
    pub fair_roi_pct: f64,
    pub fair_profit_min: f64,
    pub fair_confidence_min: f32,
    pub fair_condition_min: f64,
    /// Condition multiplier at or above which a rule-2 buy is still
    /// low-risk rather than medium.
    pub low_risk_condition_min: f64,
}

impl Default for ProspectPolicy {
    fn default() -> Self {
        Self {
            base_buy_ratio: 0.5,
            target_buy_ratio: 0.75,
            fee_rate_estimate: 0.15,
            low_competition_max: 50,
            high_competition_min: 200,
            competition_adjustment: 0.10,
            strong_roi_pct: 100.0,
            strong_profit_min: 20.0,
            strong_confidence_min: 0.7,
            strong_condition_min: 0.75,
            fair_roi_pct: 50.0,
            fair_profit_min: 10.0,
            fair_confidence_min: 0.6,
            fair_condition_min: 0.65,
            low_risk_condition_min: 0.84,
        }
    }
}

/// Everything the decision depends on.
#[derive(Clone, Copy, Debug)]
pub struct ProspectInputs {
    pub estimated_sell_price: f64,
    pub condition_multiplier: f64,
    pub competitor_count: usize,
    pub confidence: f32,
}

impl ProspectPolicy {
    /// Deterministic evaluation; no I/O. ROI is 0, never NaN or infinite,
    /// when the max buy price works out to 0.
    pub fn evaluate(&self, inputs: ProspectInputs) -> ProspectAnalysis {
        let ProspectInputs {
            estimated_sell_price,
            condition_multiplier,
            competitor_count,
            confidence,
        } = inputs;

        let mut max_buy = estimated_sell_price * condition_multiplier * self.base_buy_ratio;
        if competitor_count < self.low_competition_max {
            max_buy *= 1.0 + self.competition_adjustment;
        } else if competitor_count > self.high_competition_min {
            max_buy *= 1.0 - self.competition_adjustment;
        }

        let target_buy = max_buy * self.target_buy_ratio;
        let potential_profit =
            estimated_sell_price - max_buy - estimated_sell_price * self.fee_rate_estimate;
        let expected_roi = if max_buy > 0.0 {
            potential_profit / max_buy * 100.0
        } else {
            0.0
        };

        let (recommendation, risk, reasons) = self.decide(
            expected_roi,
            potential_profit,
            condition_multiplier,
            confidence,
        );

        ProspectAnalysis {
            estimated_sell_price,
            max_buy_price: max_buy,
            target_buy_price: target_buy,
            potential_profit,
            expected_roi_percent: expected_roi,
            recommendation,
            reasons,
            risk,
        }
    }

    /// Ordered rules, first match wins. The fall-through lists only the
    /// criteria actually violated.
    fn decide(
        &self,
        roi: f64,
        profit: f64,
        condition: f64,
        confidence: f32,
    ) -> (Recommendation, RiskLevel, Vec<String>) {
        if roi >= self.strong_roi_pct
            && profit >= self.strong_profit_min
            && confidence >= self.strong_confidence_min
            && condition >= self.strong_condition_min
        {
            return (
                Recommendation::Buy,
                RiskLevel::Low,
                vec![format!(
                    "Expected ROI {roi:.0}% with solid margin and market confidence"
                )],
            );
        }

        if roi >= self.fair_roi_pct
            && profit >= self.fair_profit_min
            && condition >= self.fair_condition_min
            && confidence >= self.fair_confidence_min
        {
            let risk = if condition >= self.low_risk_condition_min {
                RiskLevel::Low
            } else {
                RiskLevel::Medium
            };
            return (
                Recommendation::Buy,
                risk,
                vec![format!("Expected ROI {roi:.0}% clears the buy threshold")],
            );
        }

        let mut reasons = Vec::new();
        if roi < self.fair_roi_pct {
            reasons.push(format!(
                "Expected ROI {roi:.0}% below the {:.0}% threshold",
                self.fair_roi_pct
            ));
        }
        if profit < self.fair_profit_min {
            reasons.push(format!(
                "Potential profit {profit:.2} below the {:.2} minimum",
                self.fair_profit_min
            ));
        }
        if condition < self.fair_condition_min {
            reasons.push("Condition below the resale threshold".to_string());
        }
        if confidence < self.fair_confidence_min {
            reasons.push(format!(
                "Market confidence {confidence:.2} too low to trust the estimate"
            ));
        }

        (Recommendation::Investigate, RiskLevel::High, reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(sell: f64, condition: f64, competitors: usize, confidence: f32) -> ProspectInputs {
        ProspectInputs {
            estimated_sell_price: sell,
            condition_multiplier: condition,
            competitor_count: competitors,
            confidence,
        }
    }

    #[test]
    fn strong_prospect_is_a_low_risk_buy() {
        let policy = ProspectPolicy::default();
        // max_buy 126, profit 300 - 126 - 45 = 129, roi 102%.
        let analysis = policy.evaluate(inputs(300.0, 0.84, 100, 0.9));
        assert_eq!(analysis.recommendation, Recommendation::Buy);
        assert_eq!(analysis.risk, RiskLevel::Low);
        assert!(analysis.expected_roi_percent >= policy.strong_roi_pct);
    }

    #[test]
    fn fair_prospect_with_worn_condition_is_medium_risk() {
        let policy = ProspectPolicy::default();
        // Confidence 0.65 keeps rule 1 out; rule 2 accepts but the worn
        // condition downgrades the risk.
        let analysis = policy.evaluate(inputs(200.0, 0.65, 100, 0.65));
        assert_eq!(analysis.recommendation, Recommendation::Buy);
        assert_eq!(analysis.risk, RiskLevel::Medium);
    }

    #[test]
    fn max_buy_adjusts_for_competition_bands() {
        let policy = ProspectPolicy::default();
        let sparse = policy.evaluate(inputs(100.0, 1.0, 10, 0.9));
        let crowded = policy.evaluate(inputs(100.0, 1.0, 300, 0.9));
        let neutral = policy.evaluate(inputs(100.0, 1.0, 100, 0.9));

        assert!((sparse.max_buy_price - 55.0).abs() < 1e-9);
        assert!((neutral.max_buy_price - 50.0).abs() < 1e-9);
        assert!((crowded.max_buy_price - 45.0).abs() < 1e-9);
    }

    #[test]
    fn target_buy_is_a_fraction_of_max() {
        let policy = ProspectPolicy::default();
        let analysis = policy.evaluate(inputs(100.0, 1.0, 100, 0.9));
        assert!(
            (analysis.target_buy_price - analysis.max_buy_price * policy.target_buy_ratio).abs()
                < 1e-9
        );
    }

    #[test]
    fn zero_sell_price_yields_zero_roi_not_nan() {
        let policy = ProspectPolicy::default();
        let analysis = policy.evaluate(inputs(0.0, 1.0, 100, 0.9));
        assert_eq!(analysis.max_buy_price, 0.0);
        assert_eq!(analysis.expected_roi_percent, 0.0);
        assert!(analysis.expected_roi_percent.is_finite());
    }

    #[test]
    fn investigate_itemizes_only_violated_criteria() {
        let policy = ProspectPolicy::default();
        // Healthy ROI and profit, acceptable condition, but weak market
        // confidence: exactly one reason.
        let analysis = policy.evaluate(inputs(300.0, 0.84, 100, 0.4));
        assert_eq!(analysis.recommendation, Recommendation::Investigate);
        assert_eq!(analysis.risk, RiskLevel::High);
        assert_eq!(analysis.reasons.len(), 1);
        assert!(analysis.reasons[0].contains("confidence"));
    }

    #[test]
    fn investigate_lists_every_failed_criterion() {
        let policy = ProspectPolicy::default();
        // Thin sell price keeps profit under the bar while condition and
        // confidence miss their thresholds too.
        let analysis = policy.evaluate(inputs(15.0, 0.45, 300, 0.3));
        assert_eq!(analysis.recommendation, Recommendation::Investigate);
        assert_eq!(analysis.reasons.len(), 3);
    }
}
