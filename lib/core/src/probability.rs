// Edge cost distributions
use crate::{Error, Result};
use rand::distr::weighted::WeightedIndex;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Shape of the distribution a [`ProbabilityModel`] was configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionKind {
    /// No parameters: every sample is 0
    Fixed,
    /// `[c]`: every sample is `c`
    Constant,
    /// `[mean, std_dev]`: normal distribution clamped at 0
    Normal,
    /// `[w0, w1, w2, ...]`: cost `i` drawn with relative weight `wi`
    Empirical,
}

#[derive(Debug, Clone)]
enum Model {
    Fixed,
    Constant(f64),
    Normal(Normal<f64>),
    Empirical(WeightedIndex<f64>),
}

/// Samples the stochastic part of an edge's traversal cost.
///
/// The parameter list decides the distribution family:
/// - `[]` - fixed, always 0
/// - `[c]` - constant `c`
/// - `[mean, std_dev]` - normal
/// - three or more values - empirical histogram over integer costs
///
/// Every model owns its own generator so sampling one edge never
/// perturbs another. Samples are never negative.
#[derive(Debug, Clone)]
pub struct ProbabilityModel {
    model: Model,
    params: Vec<f64>,
    rng: SmallRng,
}

impl ProbabilityModel {
    /// Build a model from raw parameters, seeding its generator with `seed`
    pub fn new(params: &[f64], seed: u64) -> Result<Self> {
        if let Some(bad) = params.iter().find(|p| !p.is_finite()) {
            return Err(Error::InvalidDistribution(format!(
                "non-finite parameter {}",
                bad
            )));
        }

        let model = match params {
            [] => Model::Fixed,
            [c] => Model::Constant(c.max(0.0)),
            [mean, std_dev] => {
                if *std_dev == 0.0 {
                    Model::Constant(mean.max(0.0))
                } else {
                    let normal = Normal::new(*mean, *std_dev)
                        .map_err(|e| Error::InvalidDistribution(e.to_string()))?;
                    Model::Normal(normal)
                }
            }
            weights => {
                let index = WeightedIndex::new(weights.iter().copied())
                    .map_err(|e| Error::InvalidDistribution(e.to_string()))?;
                Model::Empirical(index)
            }
        };

        Ok(Self {
            model,
            params: params.to_vec(),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// A model with no stochastic component
    #[inline]
    #[must_use]
    pub fn fixed() -> Self {
        Self {
            model: Model::Fixed,
            params: Vec::new(),
            rng: SmallRng::seed_from_u64(0),
        }
    }

    /// Draw one cost sample
    #[inline]
    pub fn sample(&mut self) -> f64 {
        match &self.model {
            Model::Fixed => 0.0,
            Model::Constant(c) => *c,
            Model::Normal(normal) => normal.sample(&mut self.rng).max(0.0),
            Model::Empirical(index) => index.sample(&mut self.rng) as f64,
        }
    }

    /// Expected value of the configured distribution (before clamping)
    pub fn mean(&self) -> f64 {
        match &self.model {
            Model::Fixed => 0.0,
            Model::Constant(c) => *c,
            Model::Normal(normal) => normal.mean(),
            Model::Empirical(_) => {
                let total: f64 = self.params.iter().sum();
                self.params
                    .iter()
                    .enumerate()
                    .map(|(i, w)| i as f64 * w)
                    .sum::<f64>()
                    / total
            }
        }
    }

    pub fn kind(&self) -> DistributionKind {
        match self.model {
            Model::Fixed => DistributionKind::Fixed,
            Model::Constant(_) => DistributionKind::Constant,
            Model::Normal(_) => DistributionKind::Normal,
            Model::Empirical(_) => DistributionKind::Empirical,
        }
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        matches!(self.model, Model::Fixed)
    }

    /// Parameters the model was built from
    #[inline]
    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Restart the generator from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }
}

impl Default for ProbabilityModel {
    fn default() -> Self {
        Self::fixed()
    }
}
