//! Step-size adaptation
//!
//! - [`search_path_mutation`]: step-size control from an exponentially fading
//!   record of selected mutation steps, (μ/μ, λ)-ES with search path
//!   (Hansen, Arnold & Auger, Evolution Strategies, Algorithm 4)
//! - [`one_fifth_success`]: Rechenberg's 1/5-th success rule
//!
//! The search path is caller-owned state: each call takes the previous path
//! and returns the updated one. [`SearchPathAdaptation`] bundles a path with
//! its parameters for callers that just want to feed it each generation.

use serde::{Deserialize, Serialize};

use crate::error::{check_dimension, check_finite, OperatorError, OperatorResult};
use crate::genome::real_vector::euclidean_norm;
use crate::operators::mutation::validate_step_sizes;

// ============================================================================
// Search path
// ============================================================================

/// Parameters of search-path step-size adaptation
///
/// Deserialization goes through [`SearchPathParams::try_new`], so a stored
/// configuration cannot bypass validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSearchPathParams")]
pub struct SearchPathParams {
    /// Search space dimension (n)
    pub dimension: usize,
    /// Number of parents (μ)
    pub mu: usize,
    /// Number of offspring (λ)
    pub lambda: usize,
}

impl SearchPathParams {
    /// Create new parameters
    ///
    /// # Panics
    /// Panics if the parameters are invalid, see [`SearchPathParams::try_new`]
    pub fn new(dimension: usize, mu: usize, lambda: usize) -> Self {
        match Self::try_new(dimension, mu, lambda) {
            Ok(params) => params,
            Err(e) => panic!("{}", e),
        }
    }

    /// Create new parameters.
    ///
    /// Requires `dimension >= 1`, `1 <= mu <= lambda` and
    /// `mu <= 4 * (dimension + 4)` so the path learning rate `c` lies in
    /// `(0, 2]` and `sqrt(c (2 - c))` stays real.
    pub fn try_new(dimension: usize, mu: usize, lambda: usize) -> OperatorResult<Self> {
        if dimension == 0 {
            return Err(OperatorError::InvalidConfiguration(
                "search path needs at least one dimension".to_string(),
            ));
        }
        if mu == 0 || mu > lambda {
            return Err(OperatorError::InvalidConfiguration(format!(
                "need 1 <= mu <= lambda, got mu = {}, lambda = {}",
                mu, lambda
            )));
        }
        if mu > 4 * (dimension + 4) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "mu = {} exceeds 4 * (dimension + 4) = {}",
                mu,
                4 * (dimension + 4)
            )));
        }
        Ok(Self {
            dimension,
            mu,
            lambda,
        })
    }

    /// Path learning rate `c = sqrt(mu / (n + 4))`
    pub fn c(&self) -> f64 {
        (self.mu as f64 / (self.dimension as f64 + 4.0)).sqrt()
    }

    /// Global damping `d = 1 + sqrt(mu / n)`
    pub fn d(&self) -> f64 {
        1.0 + (self.mu as f64 / self.dimension as f64).sqrt()
    }

    /// Per-dimension damping `di = 3n`
    pub fn di(&self) -> f64 {
        3.0 * self.dimension as f64
    }
}

#[derive(Deserialize)]
struct RawSearchPathParams {
    dimension: usize,
    mu: usize,
    lambda: usize,
}

impl TryFrom<RawSearchPathParams> for SearchPathParams {
    type Error = OperatorError;

    fn try_from(raw: RawSearchPathParams) -> OperatorResult<Self> {
        Self::try_new(raw.dimension, raw.mu, raw.lambda)
    }
}

/// Exponentially fading record of mutation steps
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchPath {
    values: Vec<f64>,
}

impl SearchPath {
    /// Fresh path of the given dimension
    pub fn zeros(dimension: usize) -> Self {
        Self {
            values: vec![0.0; dimension],
        }
    }

    /// Path with explicit values
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of path components
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Borrow the path components
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Euclidean norm of the path
    pub fn norm(&self) -> f64 {
        euclidean_norm(&self.values)
    }
}

/// Adapted step sizes together with the updated path
#[derive(Clone, Debug, PartialEq)]
pub struct PathAdaptation {
    /// Adapted per-dimension step sizes
    pub sigma: Vec<f64>,
    /// Updated search path, to be passed to the next call
    pub path: SearchPath,
}

/// Search-path step-size adaptation.
///
/// `local_mutations` holds the standard-normal mutation steps of the selected
/// offspring, one row of length n per offspring. With `c`, `d`, `di` from
/// [`SearchPathParams`]:
///
/// - `path' = (1 - c) * path + sqrt(c (2 - c)) * sqrt(mu) / mu * sum(local_mutations)`
/// - `sigma'[i] = sigma[i] * exp((|path'[i]| - 1) / di) * exp((|path'| - 1) * c / d)`
///
/// Passing [`SearchPath::zeros`] every call gives a memoryless update.
pub fn search_path_mutation<M: AsRef<[f64]>>(
    sigma: &[f64],
    local_mutations: &[M],
    path: &SearchPath,
    params: &SearchPathParams,
) -> OperatorResult<PathAdaptation> {
    let n = params.dimension;
    check_dimension(n, sigma.len())?;
    check_dimension(n, path.dimension())?;
    validate_step_sizes(sigma)?;

    let mut step_sum = vec![0.0; n];
    for row in local_mutations {
        let row = row.as_ref();
        check_dimension(n, row.len())?;
        for (acc, &z) in step_sum.iter_mut().zip(row) {
            *acc += z;
        }
    }

    let c = params.c();
    let d = params.d();
    let di = params.di();
    let mu = params.mu as f64;
    let step_weight = (c * (2.0 - c)).sqrt() * mu.sqrt() / mu;

    let values: Vec<f64> = path
        .values
        .iter()
        .zip(&step_sum)
        .map(|(&p, &s)| (1.0 - c) * p + step_weight * s)
        .collect();
    let new_path = SearchPath { values };

    let path_norm = new_path.norm();
    let global_factor = ((path_norm - 1.0) * (c / d)).exp();
    check_finite(
        "search_path_mutation",
        None,
        &[("path_norm", path_norm), ("global_factor", global_factor)],
    )?;

    tracing::debug!(path_norm, global_factor, "search path updated");

    let mut adapted = Vec::with_capacity(n);
    for (i, (&s, &p)) in sigma.iter().zip(&new_path.values).enumerate() {
        let si = s * ((p.abs() - 1.0) / di).exp() * global_factor;
        check_finite("search_path_mutation", Some(i), &[("path", p), ("sigma", si)])?;
        if si <= 0.0 {
            return Err(OperatorError::NumericInstability {
                operator: "search_path_mutation",
                index: Some(i),
                context: format!("sigma underflowed to {}", si),
            });
        }
        adapted.push(si);
    }

    Ok(PathAdaptation {
        sigma: adapted,
        path: new_path,
    })
}

/// Search-path adaptation holding its own path across generations
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchPathAdaptation {
    params: SearchPathParams,
    path: SearchPath,
}

impl SearchPathAdaptation {
    /// Start with a zero path
    pub fn new(params: SearchPathParams) -> Self {
        Self {
            path: SearchPath::zeros(params.dimension),
            params,
        }
    }

    /// Parameters used for every update
    pub fn params(&self) -> &SearchPathParams {
        &self.params
    }

    /// Path accumulated so far
    pub fn path(&self) -> &SearchPath {
        &self.path
    }

    /// Adapt `sigma` and advance the stored path.
    ///
    /// The path is left untouched if the update fails.
    pub fn adapt<M: AsRef<[f64]>>(
        &mut self,
        sigma: &[f64],
        local_mutations: &[M],
    ) -> OperatorResult<Vec<f64>> {
        let PathAdaptation { sigma, path } =
            search_path_mutation(sigma, local_mutations, &self.path, &self.params)?;
        self.path = path;
        Ok(sigma)
    }

    /// Forget the accumulated path
    pub fn reset(&mut self) {
        self.path = SearchPath::zeros(self.params.dimension);
    }
}

// ============================================================================
// 1/5-th success rule
// ============================================================================

/// Multiplicative step-size factor `exp(indicator - 0.2)^inv_dim_sqrt`
fn success_factor(offspring_fitness: f64, parent_fitness: f64, inv_dim_sqrt: f64) -> f64 {
    // bigger is better
    let indicator = if offspring_fitness >= parent_fitness {
        1.0
    } else {
        0.0
    };
    (indicator - 0.2_f64).exp().powf(inv_dim_sqrt)
}

/// Adapt a step size with the 1/5-th success rule.
///
/// A success (`offspring_fitness >= parent_fitness`, bigger is better) scales
/// `sigma` by `exp(0.8)^inv_dim_sqrt`, a failure by `exp(-0.2)^inv_dim_sqrt`, so
/// the log step size rises in expectation when more than one in five
/// mutations succeed.
///
/// References: Rechenberg (1973); Schumer & Steiglitz (1968).
pub fn one_fifth_success(
    sigma: f64,
    offspring_fitness: f64,
    parent_fitness: f64,
    inv_dim_sqrt: f64,
) -> f64 {
    sigma * success_factor(offspring_fitness, parent_fitness, inv_dim_sqrt)
}

/// [`one_fifth_success`] applied to every element of a step-size vector
pub fn one_fifth_success_vec(
    sigma: &[f64],
    offspring_fitness: f64,
    parent_fitness: f64,
    inv_dim_sqrt: f64,
) -> Vec<f64> {
    let factor = success_factor(offspring_fitness, parent_fitness, inv_dim_sqrt);
    sigma.iter().map(|s| s * factor).collect()
}

/// 1/5-th success rule with a fixed exponent
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOneFifthRule")]
pub struct OneFifthRule {
    /// Exponent applied to the success factor, usually `1 / sqrt(n)`
    pub inv_dim_sqrt: f64,
}

impl OneFifthRule {
    /// Create with an explicit exponent
    ///
    /// # Panics
    /// Panics if `inv_dim_sqrt` is not strictly positive
    pub fn new(inv_dim_sqrt: f64) -> Self {
        assert!(inv_dim_sqrt > 0.0, "Exponent must be positive");
        Self { inv_dim_sqrt }
    }

    /// Create with an explicit exponent, rejecting non-finite or
    /// non-positive values
    pub fn try_new(inv_dim_sqrt: f64) -> OperatorResult<Self> {
        if !(inv_dim_sqrt.is_finite() && inv_dim_sqrt > 0.0) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "1/5 rule exponent must be positive and finite, got {}",
                inv_dim_sqrt
            )));
        }
        Ok(Self { inv_dim_sqrt })
    }

    /// Exponent `1 / sqrt(n)` for an n-dimensional search space
    ///
    /// # Panics
    /// Panics if `dimension` is zero
    pub fn for_dimension(dimension: usize) -> Self {
        assert!(dimension > 0, "Dimension must be positive");
        Self::new(1.0 / (dimension as f64).sqrt())
    }

    /// Adapt a scalar step size
    pub fn adapt(&self, sigma: f64, offspring_fitness: f64, parent_fitness: f64) -> f64 {
        one_fifth_success(sigma, offspring_fitness, parent_fitness, self.inv_dim_sqrt)
    }

    /// Adapt every element of a step-size vector
    pub fn adapt_all(&self, sigma: &[f64], offspring_fitness: f64, parent_fitness: f64) -> Vec<f64> {
        one_fifth_success_vec(sigma, offspring_fitness, parent_fitness, self.inv_dim_sqrt)
    }
}

#[derive(Deserialize)]
struct RawOneFifthRule {
    inv_dim_sqrt: f64,
}

impl TryFrom<RawOneFifthRule> for OneFifthRule {
    type Error = OperatorError;

    fn try_from(raw: RawOneFifthRule) -> OperatorResult<Self> {
        Self::try_new(raw.inv_dim_sqrt)
    }
}
