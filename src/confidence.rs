//! Confidence scoring from guideline evidence grades.

use crate::guideline::EvidenceGrade;

/// Score assigned when a grade label falls outside the closed set.
pub const DEFAULT_CONFIDENCE: f64 = 0.50;

/// Numeric confidence for an evidence grade.
pub fn score(grade: EvidenceGrade) -> f64 {
    match grade {
        EvidenceGrade::A => 0.95,
        EvidenceGrade::B => 0.85,
        EvidenceGrade::C => 0.70,
    }
}

/// Numeric confidence for a grade label, with the defensive default for
/// unrecognized labels. The closed [`EvidenceGrade`] set cannot reach
/// the default; this entry point exists for callers holding grades as
/// free-form text.
pub fn score_label(label: &str) -> f64 {
    EvidenceGrade::from_label(label)
        .map(score)
        .unwrap_or(DEFAULT_CONFIDENCE)
}
