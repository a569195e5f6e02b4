use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{
    NEAR_IDENTICAL_THRESHOLD, STRONG_PARAPHRASE_THRESHOLD, THEMATIC_SIMILARITY_THRESHOLD,
    WEIGHT_CROSS_ENCODER, WEIGHT_LEVENSHTEIN, WEIGHT_NGRAM_JACCARD, WEIGHT_TOKEN_JACCARD,
};
use crate::lexical::LexicalMetrics;

use super::error::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Categorical suspicion label derived from the composite score.
pub enum Verdict {
    /// `composite >= 0.85`.
    NearIdentical,
    /// `0.70 <= composite < 0.85`.
    StrongParaphrase,
    /// `0.60 <= composite < 0.70`.
    ThematicSimilarity,
    /// Anything else, including non-finite scores.
    NotSuspect,
}

impl Verdict {
    /// All verdicts, most severe first.
    pub const ALL: [Verdict; 4] = [
        Verdict::NearIdentical,
        Verdict::StrongParaphrase,
        Verdict::ThematicSimilarity,
        Verdict::NotSuspect,
    ];

    /// Report label (the wire representation).
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::NearIdentical => "Texte très similaire / Copié-collé",
            Verdict::StrongParaphrase => "Forte suspicion de paraphrase",
            Verdict::ThematicSimilarity => "Similarité thématique, potentiellement paraphrasé",
            Verdict::NotSuspect => "Non suspect",
        }
    }

    /// Parses a report label back into a verdict.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.label() == label)
    }

    /// Returns a short debug string.
    pub fn debug_status(&self) -> &'static str {
        match self {
            Verdict::NearIdentical => "NEAR_IDENTICAL",
            Verdict::StrongParaphrase => "STRONG_PARAPHRASE",
            Verdict::ThematicSimilarity => "THEMATIC_SIMILARITY",
            Verdict::NotSuspect => "NOT_SUSPECT",
        }
    }

    /// Returns `true` for every verdict except [`Verdict::NotSuspect`].
    pub fn is_suspect(&self) -> bool {
        !matches!(self, Verdict::NotSuspect)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Verdict::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown verdict label: {label}")))
    }
}

/// Maps a composite score to its verdict band (lower bounds inclusive).
pub fn classify(composite: f32) -> Verdict {
    if !composite.is_finite() {
        return Verdict::NotSuspect;
    }

    if composite >= NEAR_IDENTICAL_THRESHOLD {
        Verdict::NearIdentical
    } else if composite >= STRONG_PARAPHRASE_THRESHOLD {
        Verdict::StrongParaphrase
    } else if composite >= THEMATIC_SIMILARITY_THRESHOLD {
        Verdict::ThematicSimilarity
    } else {
        Verdict::NotSuspect
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Per-signal weights of the composite score.
pub struct ScoringWeights {
    pub cross_encoder: f32,
    pub levenshtein: f32,
    pub token_jaccard: f32,
    pub ngram_jaccard: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            cross_encoder: WEIGHT_CROSS_ENCODER,
            levenshtein: WEIGHT_LEVENSHTEIN,
            token_jaccard: WEIGHT_TOKEN_JACCARD,
            ngram_jaccard: WEIGHT_NGRAM_JACCARD,
        }
    }
}

impl ScoringWeights {
    /// Sum of the four weights (1.10 for the defaults).
    pub fn total(&self) -> f32 {
        self.cross_encoder + self.levenshtein + self.token_jaccard + self.ngram_jaccard
    }

    /// Weights must be finite and non-negative so the composite stays monotonic.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let named = [
            ("cross_encoder", self.cross_encoder),
            ("levenshtein", self.levenshtein),
            ("token_jaccard", self.token_jaccard),
            ("ngram_jaccard", self.ngram_jaccard),
        ];

        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringError::InvalidWeights {
                    reason: format!("{name} must be finite and >= 0, got {weight}"),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Composite score with the signals it was computed from.
pub struct CompositeScore {
    /// Weighted sum of the four signals.
    pub value: f32,
    /// Verdict band of `value`.
    pub verdict: Verdict,
    /// Cross-encoder score of the best hit.
    pub cross_score: f32,
    /// Lexical metrics against the best hit.
    pub lexical: LexicalMetrics,
}

impl CompositeScore {
    /// Returns `true` if `value >= min_score`.
    pub fn meets(&self, min_score: f32) -> bool {
        self.value >= min_score
    }
}

impl std::fmt::Display for CompositeScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (composite: {:.4}, cross: {:.4})",
            self.verdict.debug_status(),
            self.value,
            self.cross_score
        )
    }
}
