use thiserror::Error;

const SUM_TOLERANCE: f64 = 1e-6;

/// Job-recommendation weights (ranking open jobs for a worker).
/// Freshness only applies in this direction; rating carries no weight.
pub const JOB_RECOMMENDATION_WEIGHTS: Weights = Weights {
    skills: 0.35,
    location: 0.25,
    history: 0.20,
    availability: 0.15,
    freshness: 0.05,
    rating: 0.0,
};

/// Worker-recommendation weights (ranking workers for a job).
/// Rating only applies in this direction; freshness carries no weight.
pub const WORKER_RECOMMENDATION_WEIGHTS: Weights = Weights {
    skills: 0.30,
    location: 0.25,
    history: 0.20,
    availability: 0.10,
    freshness: 0.0,
    rating: 0.15,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub skills: f64,
    pub location: f64,
    pub history: f64,
    pub availability: f64,
    pub freshness: f64,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("weight `{0}` is negative")]
    Negative(&'static str),
    #[error("weights sum to {0}, expected 1.0")]
    BadSum(f64),
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skills + self.location + self.history + self.availability + self.freshness
            + self.rating
    }

    /// Construction-time check: every factor non-negative, total exactly 1.0
    /// (within float tolerance). With that established, any weighted sum of
    /// [0,1] factor scores stays in [0,1] without clamping.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for (name, value) in [
            ("skills", self.skills),
            ("location", self.location),
            ("history", self.history),
            ("availability", self.availability),
            ("freshness", self.freshness),
            ("rating", self.rating),
        ] {
            if value < 0.0 {
                return Err(WeightsError::Negative(name));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(WeightsError::BadSum(sum));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_vectors_sum_to_one() {
        assert!((JOB_RECOMMENDATION_WEIGHTS.sum() - 1.0).abs() < SUM_TOLERANCE);
        assert!((WORKER_RECOMMENDATION_WEIGHTS.sum() - 1.0).abs() < SUM_TOLERANCE);
    }

    #[test]
    fn built_in_vectors_validate() {
        assert!(JOB_RECOMMENDATION_WEIGHTS.validate().is_ok());
        assert!(WORKER_RECOMMENDATION_WEIGHTS.validate().is_ok());
    }

    #[test]
    fn rejects_sums_away_from_one() {
        let weights = Weights {
            skills: 0.5,
            ..JOB_RECOMMENDATION_WEIGHTS
        };
        assert!(matches!(weights.validate(), Err(WeightsError::BadSum(_))));
    }

    #[test]
    fn rejects_negative_entries() {
        let weights = Weights {
            skills: -0.1,
            location: 0.45,
            history: 0.25,
            availability: 0.20,
            freshness: 0.10,
            rating: 0.0,
        };
        assert_eq!(
            weights.validate(),
            Err(WeightsError::Negative("skills"))
        );
    }
}
