use crate::error::MetricsError;
use crate::normalize::{negnorm, neunorm, normalize, posnorm};
use crate::sentiment::{DayBucket, SentimentLabel};

/// Score of a day with no lean in either direction.
pub const NEUTRAL_SCORE: f64 = 50.0;

const POSITIVE_SKEW_BOUND: f64 = 65.0;
const NEGATIVE_SKEW_BOUND: f64 = 35.0;
const NEUTRAL_PENALTY: f64 = 2.0 / 3.0;

/// The daily scoring formulas, kept side by side for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoringVariant {
    /// Branch on the dominant label and rescale its count.
    Og,
    /// Label ordinal weighted by count.
    Sum,
    /// Like `Og`, but the competing labels are subtracted before rescaling.
    OgWithSubtraction,
}

impl ScoringVariant {
    /// Every variant, in the column order of the metrics CSV.
    pub const ALL: [ScoringVariant; 3] = [
        ScoringVariant::Og,
        ScoringVariant::Sum,
        ScoringVariant::OgWithSubtraction,
    ];

    /// Scores one day under this variant.
    pub fn score(self, bucket: &DayBucket) -> Result<f64, MetricsError> {
        match self {
            ScoringVariant::Og => daily_score_og(bucket),
            ScoringVariant::Sum => daily_score_sum(bucket),
            ScoringVariant::OgWithSubtraction => daily_score_og_with_subtraction(bucket),
        }
    }
}

impl std::fmt::Display for ScoringVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScoringVariant::Og => "og",
            ScoringVariant::Sum => "sum",
            ScoringVariant::OgWithSubtraction => "og-with-subtraction",
        };
        f.write_str(name)
    }
}

/// Picks the label with the highest count.
///
/// Equal positive and negative counts force `Neutral`, even when neutral has
/// fewer records than either. Otherwise the first label in ordinal order with
/// the strictly highest count wins.
pub fn max_label(bucket: &DayBucket) -> SentimentLabel {
    if bucket.count(SentimentLabel::Positive) == bucket.count(SentimentLabel::Negative) {
        return SentimentLabel::Neutral;
    }

    let mut best = SentimentLabel::Positive;
    let mut max_count = 0;
    for label in SentimentLabel::ALL {
        let count = bucket.count(label);
        if count > max_count {
            max_count = count;
            best = label;
        }
    }
    best
}

fn checked_total(bucket: &DayBucket) -> Result<f64, MetricsError> {
    match bucket.total() {
        0 => Err(MetricsError::EmptyBucket),
        total => Ok(total as f64),
    }
}

/// Neutral-dominant days stay near 50 and lean toward whichever side
/// carries more total confidence.
fn neutral_branch(bucket: &DayBucket, total: f64) -> f64 {
    let pos = bucket.count(SentimentLabel::Positive) as f64;
    let neu = bucket.count(SentimentLabel::Neutral) as f64;
    let neg = bucket.count(SentimentLabel::Negative) as f64;
    let pos_conf = bucket.confidence_sum(SentimentLabel::Positive);
    let neg_conf = bucket.confidence_sum(SentimentLabel::Negative);

    if pos_conf > neg_conf {
        neunorm(neu - pos + neg, 0.0, total, POSITIVE_SKEW_BOUND, NEUTRAL_SCORE)
    } else if pos_conf < neg_conf {
        neunorm(neu - neg + pos, 0.0, total, NEGATIVE_SKEW_BOUND, NEUTRAL_SCORE)
    } else {
        NEUTRAL_SCORE
    }
}

/// Scores a day from the count of its dominant label.
///
/// # Errors
/// * `EmptyBucket` if the bucket holds no records.
pub fn daily_score_og(bucket: &DayBucket) -> Result<f64, MetricsError> {
    let total = checked_total(bucket)?;
    let score = match max_label(bucket) {
        SentimentLabel::Positive => {
            posnorm(bucket.count(SentimentLabel::Positive) as f64, 0.0, total)
        }
        SentimentLabel::Neutral => neutral_branch(bucket, total),
        SentimentLabel::Negative => {
            negnorm(bucket.count(SentimentLabel::Negative) as f64, total, 0.0)
        }
    };
    Ok(score)
}

/// Same branches as [`daily_score_og`], but a polar day is penalised by the
/// opposing count and two thirds of the neutral count before rescaling.
///
/// # Errors
/// * `EmptyBucket` if the bucket holds no records.
pub fn daily_score_og_with_subtraction(bucket: &DayBucket) -> Result<f64, MetricsError> {
    let total = checked_total(bucket)?;
    let pos = bucket.count(SentimentLabel::Positive) as f64;
    let neu = bucket.count(SentimentLabel::Neutral) as f64;
    let neg = bucket.count(SentimentLabel::Negative) as f64;

    let score = match max_label(bucket) {
        SentimentLabel::Positive => posnorm(pos - neu * NEUTRAL_PENALTY - neg, 0.0, total),
        SentimentLabel::Neutral => neutral_branch(bucket, total),
        SentimentLabel::Negative => negnorm(neg - neu * NEUTRAL_PENALTY - pos, total, 0.0),
    };
    Ok(score)
}

/// Scores a day as the count-weighted sum of label ordinals over its maximum.
///
/// With `Positive = 0` and `Negative = 2`, an all-positive day scores 0 and an
/// all-negative day scores 100.
///
/// # Errors
/// * `EmptyBucket` if the bucket holds no records.
pub fn daily_score_sum(bucket: &DayBucket) -> Result<f64, MetricsError> {
    let total = checked_total(bucket)?;
    let weighted_sum: f64 = SentimentLabel::ALL
        .iter()
        .map(|&label| label.ordinal() as f64 * bucket.count(label) as f64)
        .sum();
    Ok(normalize(weighted_sum, total * 2.0, 0.0, 0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bucket(pos: (u64, f64), neu: (u64, f64), neg: (u64, f64)) -> DayBucket {
        DayBucket::from_tallies(pos, neu, neg)
    }

    #[test]
    fn all_positive_day_scores_full_marks() {
        let b = bucket((10, 8.5), (0, 0.0), (0, 0.0));
        assert_relative_eq!(daily_score_og(&b).unwrap(), 100.0);
        assert_relative_eq!(daily_score_og_with_subtraction(&b).unwrap(), 100.0);
        assert_relative_eq!(daily_score_sum(&b).unwrap(), 0.0);
    }

    #[test]
    fn all_negative_day_scores_zero() {
        let b = bucket((0, 0.0), (0, 0.0), (4, 3.1));
        assert_relative_eq!(daily_score_og(&b).unwrap(), 0.0);
        assert_relative_eq!(daily_score_og_with_subtraction(&b).unwrap(), 0.0);
        assert_relative_eq!(daily_score_sum(&b).unwrap(), 100.0);
    }

    #[test]
    fn positive_negative_tie_forces_neutral() {
        for (pos, neu, neg) in [(0, 0, 0), (5, 0, 5), (3, 1, 3), (2, 9, 2), (7, 7, 7)] {
            let b = bucket((pos, 0.0), (neu, 0.0), (neg, 0.0));
            assert_eq!(max_label(&b), SentimentLabel::Neutral, "{pos}/{neu}/{neg}");
        }
    }

    #[test]
    fn count_ties_resolve_in_ordinal_order() {
        let b = bucket((4, 0.0), (4, 0.0), (1, 0.0));
        assert_eq!(max_label(&b), SentimentLabel::Positive);
        let b = bucket((1, 0.0), (4, 0.0), (4, 0.0));
        assert_eq!(max_label(&b), SentimentLabel::Neutral);
        let b = bucket((1, 0.0), (2, 0.0), (6, 0.0));
        assert_eq!(max_label(&b), SentimentLabel::Negative);
    }

    #[test]
    fn forced_neutral_skews_by_confidence() {
        let leaning_up = bucket((5, 4.5), (0, 0.0), (5, 2.0));
        assert_relative_eq!(daily_score_og(&leaning_up).unwrap(), 65.0);

        let leaning_down = bucket((5, 2.0), (0, 0.0), (5, 4.5));
        assert_relative_eq!(daily_score_og(&leaning_down).unwrap(), 35.0);

        let even = bucket((5, 3.0), (0, 0.0), (5, 3.0));
        assert_eq!(daily_score_og(&even).unwrap(), NEUTRAL_SCORE);
    }

    #[test]
    fn pure_neutral_day_is_exactly_fifty() {
        let b = bucket((0, 0.0), (10, 7.2), (0, 0.0));
        assert_eq!(daily_score_og(&b).unwrap(), 50.0);
        assert_eq!(daily_score_og_with_subtraction(&b).unwrap(), 50.0);
        assert_relative_eq!(daily_score_sum(&b).unwrap(), 50.0);
    }

    #[test]
    fn neutral_dominant_day_leans_toward_confident_side() {
        // neu 6, pos 3, neg 1, positive carries more confidence:
        // neunorm(6 - 3 + 1, 0, 10, 65, 50) = 65 - 4/10 * 15
        let b = bucket((3, 2.4), (6, 4.0), (1, 0.9));
        assert_relative_eq!(daily_score_og(&b).unwrap(), 59.0, epsilon = 1e-9);
    }

    #[test]
    fn og_variants_agree_on_neutral_branch() {
        let buckets = [
            bucket((3, 2.4), (6, 4.0), (1, 0.9)),
            bucket((1, 0.2), (8, 6.0), (2, 1.7)),
            bucket((4, 3.0), (1, 0.5), (4, 1.0)),
            bucket((0, 0.0), (3, 2.0), (0, 0.0)),
        ];
        for b in &buckets {
            assert_eq!(max_label(b), SentimentLabel::Neutral);
            assert_eq!(
                daily_score_og(b).unwrap(),
                daily_score_og_with_subtraction(b).unwrap()
            );
        }
    }

    #[test]
    fn subtraction_pulls_mixed_positive_day_down() {
        // pos 6, neu 3, neg 1 over 10: posnorm(6 - 2 - 1, 0, 10) = 65
        let b = bucket((6, 5.0), (3, 2.0), (1, 0.5));
        assert_relative_eq!(daily_score_og(&b).unwrap(), 80.0, epsilon = 1e-9);
        assert_relative_eq!(daily_score_og_with_subtraction(&b).unwrap(), 65.0, epsilon = 1e-9);
    }

    #[test]
    fn subtraction_pulls_mixed_negative_day_up() {
        // neg 6, neu 3, pos 1 over 10: negnorm(6 - 2 - 1, 10, 0) = 35
        let b = bucket((1, 0.5), (3, 2.0), (6, 5.0));
        assert_relative_eq!(daily_score_og(&b).unwrap(), 20.0, epsilon = 1e-9);
        assert_relative_eq!(daily_score_og_with_subtraction(&b).unwrap(), 35.0, epsilon = 1e-9);
    }

    #[test]
    fn sum_variant_is_weighted_ordinal_mean() {
        // (0*2 + 1*3 + 2*5) / (10 * 2) * 100
        let b = bucket((2, 1.0), (3, 1.0), (5, 1.0));
        assert_relative_eq!(daily_score_sum(&b).unwrap(), 65.0);
    }

    #[test]
    fn empty_bucket_is_rejected_by_every_variant() {
        let b = DayBucket::new();
        for variant in ScoringVariant::ALL {
            assert_eq!(variant.score(&b), Err(MetricsError::EmptyBucket), "{variant}");
        }
    }

    #[test]
    fn scores_stay_within_bounds() {
        for pos in 0..6u64 {
            for neu in 0..6u64 {
                for neg in 0..6u64 {
                    if pos + neu + neg == 0 {
                        continue;
                    }
                    for (pos_conf, neg_conf) in [(0.5, 0.1), (0.1, 0.5), (0.3, 0.3)] {
                        let b = bucket(
                            (pos, pos as f64 * pos_conf),
                            (neu, neu as f64 * 0.5),
                            (neg, neg as f64 * neg_conf),
                        );
                        for variant in ScoringVariant::ALL {
                            let score = variant.score(&b).unwrap();
                            assert!(
                                (0.0..=100.0).contains(&score),
                                "{variant} scored {score} for {pos}/{neu}/{neg}"
                            );
                        }
                    }
                }
            }
        }
    }
}
