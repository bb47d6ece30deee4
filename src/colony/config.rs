//! Colony configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AcoError, Result};

/// How the heuristic scale `d_mean` in `(d_mean / distance)^beta` is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicScale {
    /// Length of the seeding tour divided by the node count.
    #[default]
    InitialTour,
    /// Mean distance over all edges of the graph.
    MeanEdge,
}

/// Parameters of an ant colony run.
///
/// Missing fields take their defaults when deserialized.
///
/// # Examples
///
/// ```
/// use u_antcolony::colony::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_beta(2.0)
///     .with_rho(0.5)
///     .with_n_iterations(100)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.n_ants, 20);
///
/// assert!(AcoConfig::default().with_rho(1.5).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoConfig {
    /// Pheromone exponent.
    pub alpha: f64,
    /// Heuristic (inverse distance) exponent.
    pub beta: f64,
    /// Evaporation rate in `[0, 1]`.
    pub rho: f64,
    /// Ants per iteration.
    pub n_ants: usize,
    /// Number of iterations.
    pub n_iterations: usize,
    /// RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// Source of the heuristic scale factor.
    pub heuristic_scale: HeuristicScale,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            rho: 0.1,
            n_ants: 20,
            n_iterations: 10,
            seed: None,
            heuristic_scale: HeuristicScale::InitialTour,
        }
    }
}

impl AcoConfig {
    /// Sets the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the heuristic exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the evaporation rate.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Sets the colony size.
    pub fn with_n_ants(mut self, n_ants: usize) -> Self {
        self.n_ants = n_ants;
        self
    }

    /// Sets the iteration count.
    pub fn with_n_iterations(mut self, n_iterations: usize) -> Self {
        self.n_iterations = n_iterations;
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Chooses how the heuristic scale is derived.
    pub fn with_heuristic_scale(mut self, scale: HeuristicScale) -> Self {
        self.heuristic_scale = scale;
        self
    }

    /// Checks every parameter against its documented range.
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(invalid(format!("alpha must be finite and >= 0, got {}", self.alpha)));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(invalid(format!("beta must be finite and >= 0, got {}", self.beta)));
        }
        if !(0.0..=1.0).contains(&self.rho) {
            return Err(invalid(format!("rho must lie in [0, 1], got {}", self.rho)));
        }
        if self.n_ants < 1 {
            return Err(invalid("n_ants must be >= 1".to_string()));
        }
        if self.n_iterations < 1 {
            return Err(invalid("n_iterations must be >= 1".to_string()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> AcoError {
    AcoError::InvalidConfig(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AcoConfig::default();
        assert_eq!(c.alpha, 1.0);
        assert_eq!(c.beta, 1.0);
        assert_eq!(c.rho, 0.1);
        assert_eq!(c.n_ants, 20);
        assert_eq!(c.n_iterations, 10);
        assert_eq!(c.seed, None);
        assert_eq!(c.heuristic_scale, HeuristicScale::InitialTour);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let c = AcoConfig::default()
            .with_alpha(0.0)
            .with_beta(3.0)
            .with_rho(1.0)
            .with_n_ants(1)
            .with_n_iterations(5)
            .with_seed(9)
            .with_heuristic_scale(HeuristicScale::MeanEdge);
        assert_eq!(c.alpha, 0.0);
        assert_eq!(c.beta, 3.0);
        assert_eq!(c.rho, 1.0);
        assert_eq!(c.n_ants, 1);
        assert_eq!(c.n_iterations, 5);
        assert_eq!(c.seed, Some(9));
        assert_eq!(c.heuristic_scale, HeuristicScale::MeanEdge);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_invalid_ranges() {
        let bad = [
            AcoConfig::default().with_alpha(-1.0),
            AcoConfig::default().with_alpha(f64::NAN),
            AcoConfig::default().with_beta(-0.5),
            AcoConfig::default().with_beta(f64::INFINITY),
            AcoConfig::default().with_rho(-0.01),
            AcoConfig::default().with_rho(1.01),
            AcoConfig::default().with_rho(f64::NAN),
            AcoConfig::default().with_n_ants(0),
            AcoConfig::default().with_n_iterations(0),
        ];
        for c in &bad {
            assert!(
                matches!(c.validate(), Err(AcoError::InvalidConfig(_))),
                "{c:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_partial() {
        let c: AcoConfig =
            serde_json::from_str(r#"{"rho": 0.5, "n_iterations": 100, "heuristic_scale": "mean_edge"}"#)
                .expect("valid json");
        assert_eq!(c.rho, 0.5);
        assert_eq!(c.n_iterations, 100);
        assert_eq!(c.n_ants, 20);
        assert_eq!(c.heuristic_scale, HeuristicScale::MeanEdge);
    }
}
