// ABOUTME: Complexity criterion weights for functionality scoring
// ABOUTME: Closed criterion set with weights validated to sum to 1.0

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// The closed set of complexity criteria scored by the estimation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityCriterion {
    TechnicalDifficulty,
    IntegrationSurface,
    Uncertainty,
    TestingBurden,
}

impl ComplexityCriterion {
    pub const ALL: [ComplexityCriterion; 4] = [
        ComplexityCriterion::TechnicalDifficulty,
        ComplexityCriterion::IntegrationSurface,
        ComplexityCriterion::Uncertainty,
        ComplexityCriterion::TestingBurden,
    ];
}

/// Per-criterion sub-scores on the 0-10 scale, as returned by estimation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CriterionScores {
    pub technical_difficulty: f64,
    pub integration_surface: f64,
    pub uncertainty: f64,
    pub testing_burden: f64,
}

/// Weight table over the criterion set. Weights must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComplexityWeights {
    technical_difficulty: f64,
    integration_surface: f64,
    uncertainty: f64,
    testing_burden: f64,
}

impl ComplexityWeights {
    /// Construct a weight table, rejecting weights that do not sum to 1.0
    pub fn new(
        technical_difficulty: f64,
        integration_surface: f64,
        uncertainty: f64,
        testing_burden: f64,
    ) -> Result<Self> {
        let weights = Self {
            technical_difficulty,
            integration_surface,
            uncertainty,
            testing_burden,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// The standard weighting used by the estimation pass
    pub fn standard() -> Self {
        Self {
            technical_difficulty: 0.35,
            integration_surface: 0.25,
            uncertainty: 0.25,
            testing_burden: 0.15,
        }
    }

    /// Check that every weight is non-negative and the table sums to 1.0
    pub fn validate(&self) -> Result<()> {
        for criterion in ComplexityCriterion::ALL {
            let w = self.weight(criterion);
            if !(0.0..=1.0).contains(&w) {
                return Err(PlannerError::InvalidWeights(format!(
                    "weight for {:?} out of range: {}",
                    criterion, w
                )));
            }
        }
        let sum: f64 = ComplexityCriterion::ALL
            .iter()
            .map(|c| self.weight(*c))
            .sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PlannerError::InvalidWeights(format!(
                "weights sum to {}, expected 1.0",
                sum
            )));
        }
        Ok(())
    }

    pub fn weight(&self, criterion: ComplexityCriterion) -> f64 {
        match criterion {
            ComplexityCriterion::TechnicalDifficulty => self.technical_difficulty,
            ComplexityCriterion::IntegrationSurface => self.integration_surface,
            ComplexityCriterion::Uncertainty => self.uncertainty,
            ComplexityCriterion::TestingBurden => self.testing_burden,
        }
    }

    /// Weighted average of the sub-scores, clamped to 0-10 and rounded to
    /// 2 decimal places
    pub fn score(&self, scores: &CriterionScores) -> f64 {
        let weighted = self.technical_difficulty * scores.technical_difficulty
            + self.integration_surface * scores.integration_surface
            + self.uncertainty * scores.uncertainty
            + self.testing_burden * scores.testing_burden;
        round2(weighted.clamp(0.0, 10.0))
    }
}

/// Round to 2 decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_weights_validate() {
        assert!(ComplexityWeights::standard().validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let result = ComplexityWeights::new(0.5, 0.5, 0.5, 0.5);
        assert!(matches!(result, Err(PlannerError::InvalidWeights(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let result = ComplexityWeights::new(1.2, -0.2, 0.0, 0.0);
        assert!(matches!(result, Err(PlannerError::InvalidWeights(_))));
    }

    #[test]
    fn test_weighted_score() {
        let weights = ComplexityWeights::standard();
        let scores = CriterionScores {
            technical_difficulty: 8.0,
            integration_surface: 4.0,
            uncertainty: 6.0,
            testing_burden: 2.0,
        };
        // 0.35*8 + 0.25*4 + 0.25*6 + 0.15*2 = 2.8 + 1.0 + 1.5 + 0.3 = 5.6
        assert_eq!(weights.score(&scores), 5.6);
    }

    #[test]
    fn test_score_clamped_to_scale() {
        let weights = ComplexityWeights::standard();
        let scores = CriterionScores {
            technical_difficulty: 100.0,
            integration_surface: 100.0,
            uncertainty: 100.0,
            testing_burden: 100.0,
        };
        assert_eq!(weights.score(&scores), 10.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(5.666666), 5.67);
        assert_eq!(round2(5.0), 5.0);
    }
}
