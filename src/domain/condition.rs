//! Condition scoring: raw 0-100 assessment into a discrete tier plus a
//! price multiplier, with category-specific defect penalties.

use super::entities::{ConditionAssessment, ConditionTier};

/// Tier thresholds (inclusive lower bound) and their base multipliers,
/// highest first. Scores below the last threshold are Poor.
pub static TIER_TABLE: &[(f64, ConditionTier, f64)] = &[
    (95.0, ConditionTier::LikeNew, 1.0),
    (85.0, ConditionTier::Excellent, 0.92),
    (75.0, ConditionTier::VeryGood, 0.84),
    (65.0, ConditionTier::Good, 0.75),
    (50.0, ConditionTier::Fair, 0.65),
];

pub const POOR_MULTIPLIER: f64 = 0.45;

/// Final multiplier bounds after defect penalties compound.
pub const MULTIPLIER_FLOOR: f64 = 0.3;
pub const MULTIPLIER_CEILING: f64 = 1.0;

/// Penalty applied when a defect tag matches no table entry.
pub const GENERIC_DEFECT_FACTOR: f64 = 0.95;

/// One defect penalty rule. `letter: None` applies to every category;
/// category-specific rows are checked first.
#[derive(Debug)]
pub struct DefectPenalty {
    pub letter: Option<char>,
    pub keyword: &'static str,
    pub factor: f64,
}

/// Multiplicative defect penalties. A defect tag matches a row when it
/// contains the row's keyword, case-insensitive; multiple defects compound.
pub static DEFECT_PENALTIES: &[DefectPenalty] = &[
    // Shoes
    DefectPenalty { letter: Some('A'), keyword: "sole", factor: 0.85 },
    DefectPenalty { letter: Some('A'), keyword: "scuff", factor: 0.92 },
    DefectPenalty { letter: Some('A'), keyword: "insole", factor: 0.90 },
    DefectPenalty { letter: Some('A'), keyword: "yellowing", factor: 0.88 },
    // Electronics
    DefectPenalty { letter: Some('E'), keyword: "screen", factor: 0.70 },
    DefectPenalty { letter: Some('E'), keyword: "battery", factor: 0.80 },
    DefectPenalty { letter: Some('E'), keyword: "port", factor: 0.85 },
    DefectPenalty { letter: Some('E'), keyword: "crack", factor: 0.72 },
    // Any category
    DefectPenalty { letter: None, keyword: "stain", factor: 0.85 },
    DefectPenalty { letter: None, keyword: "hole", factor: 0.80 },
    DefectPenalty { letter: None, keyword: "tear", factor: 0.82 },
    DefectPenalty { letter: None, keyword: "fade", factor: 0.90 },
    DefectPenalty { letter: None, keyword: "pilling", factor: 0.92 },
    DefectPenalty { letter: None, keyword: "zipper", factor: 0.88 },
    DefectPenalty { letter: None, keyword: "odor", factor: 0.85 },
    DefectPenalty { letter: None, keyword: "missing", factor: 0.80 },
];

/// Converts a raw condition score and detected defect tags into a tier and
/// multiplier. Total over its domain: out-of-range scores are clamped, not
/// rejected.
pub fn assess(raw_score: f64, category_letter: char, defects: &[String]) -> ConditionAssessment {
    let score = if raw_score.is_finite() {
        raw_score.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let (tier, base) = tier_for_score(score);

    let mut multiplier = base;
    for defect in defects {
        multiplier *= defect_factor(category_letter, defect);
    }

    ConditionAssessment {
        tier,
        multiplier: multiplier.clamp(MULTIPLIER_FLOOR, MULTIPLIER_CEILING),
        defects: defects.to_vec(),
    }
}

pub fn tier_for_score(score: f64) -> (ConditionTier, f64) {
    for &(threshold, tier, multiplier) in TIER_TABLE {
        if score >= threshold {
            return (tier, multiplier);
        }
    }
    (ConditionTier::Poor, POOR_MULTIPLIER)
}

fn defect_factor(category_letter: char, defect: &str) -> f64 {
    let needle = defect.trim().to_lowercase();
    let letter = category_letter.to_ascii_uppercase();

    // Category-specific rows win over generic ones.
    let specific = DEFECT_PENALTIES
        .iter()
        .filter(|rule| rule.letter == Some(letter))
        .find(|rule| needle.contains(rule.keyword));
    if let Some(rule) = specific {
        return rule.factor;
    }

    DEFECT_PENALTIES
        .iter()
        .filter(|rule| rule.letter.is_none())
        .find(|rule| needle.contains(rule.keyword))
        .map(|rule| rule.factor)
        .unwrap_or(GENERIC_DEFECT_FACTOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tier_thresholds_are_inclusive() {
        assert_eq!(tier_for_score(95.0).0, ConditionTier::LikeNew);
        assert_eq!(tier_for_score(94.9).0, ConditionTier::Excellent);
        assert_eq!(tier_for_score(85.0).0, ConditionTier::Excellent);
        assert_eq!(tier_for_score(75.0).0, ConditionTier::VeryGood);
        assert_eq!(tier_for_score(65.0).0, ConditionTier::Good);
        assert_eq!(tier_for_score(50.0).0, ConditionTier::Fair);
        assert_eq!(tier_for_score(49.9).0, ConditionTier::Poor);
    }

    #[test]
    fn no_defects_keeps_tier_multiplier() {
        let assessment = assess(90.0, 'A', &[]);
        assert_eq!(assessment.tier, ConditionTier::Excellent);
        assert_eq!(assessment.multiplier, 0.92);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        assert_eq!(assess(140.0, 'A', &[]).tier, ConditionTier::LikeNew);
        assert_eq!(assess(-20.0, 'A', &[]).tier, ConditionTier::Poor);
        assert_eq!(assess(f64::NAN, 'A', &[]).tier, ConditionTier::Poor);
    }

    #[test]
    fn category_specific_defects_apply() {
        let shoe = assess(100.0, 'A', &tags(&["worn sole"]));
        assert!((shoe.multiplier - 0.85).abs() < 1e-9);

        let phone = assess(100.0, 'E', &tags(&["cracked screen"]));
        // "cracked screen" hits the electronics "screen" row first.
        assert!((phone.multiplier - 0.70).abs() < 1e-9);
    }

    #[test]
    fn defects_compound_multiplicatively() {
        let assessment = assess(100.0, 'A', &tags(&["worn sole", "scuff marks"]));
        assert!((assessment.multiplier - 0.85 * 0.92).abs() < 1e-9);
    }

    #[test]
    fn unknown_defects_get_the_generic_penalty() {
        let assessment = assess(100.0, 'G', &tags(&["weird smudge"]));
        assert!((assessment.multiplier - GENERIC_DEFECT_FACTOR).abs() < 1e-9);
    }

    #[test]
    fn multiplier_is_clamped_to_floor() {
        let many: Vec<String> = (0..10).map(|_| "hole".to_string()).collect();
        let assessment = assess(40.0, 'C', &many);
        assert_eq!(assessment.multiplier, MULTIPLIER_FLOOR);
    }

    #[test]
    fn multiplier_monotonic_in_score_for_fixed_defects() {
        let defects = tags(&["stain"]);
        let mut last = 0.0;
        for score in [0.0, 40.0, 55.0, 70.0, 80.0, 90.0, 100.0] {
            let m = assess(score, 'C', &defects).multiplier;
            assert!(m >= last, "score {score} gave {m} < {last}");
            assert!((MULTIPLIER_FLOOR..=MULTIPLIER_CEILING).contains(&m));
            last = m;
        }
    }

    #[test]
    fn multiplier_non_increasing_in_defect_count() {
        let mut defects = Vec::new();
        let mut last = f64::MAX;
        for tag in ["stain", "hole", "fade", "odor"] {
            defects.push(tag.to_string());
            let m = assess(80.0, 'C', &defects).multiplier;
            assert!(m <= last);
            last = m;
        }
    }
}
