//! Recombination operators
//!
//! Operators combining two parent vectors into offspring:
//!
//! - [`discrete_recombination`]: per-gene coin flip between the parents
//! - [`weighted_recombination`]: halved convex combination of the parents
//! - [`one_point_crossover`]: prefix of one parent, suffix of the other
//! - [`bounded_sbx`]: bounded Simulated Binary Crossover producing two children
//!
//! The free functions work on slices. [`DiscreteRecombination`],
//! [`WeightedRecombination`], [`OnePointCrossover`] and [`SbxCrossover`] wrap
//! them as configured operators implementing the traits in
//! [`crate::operators::traits`].

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{check_dimension, check_finite, OperatorError, OperatorResult};
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;
use crate::operators::traits::{BoundedCrossoverOperator, RecombinationOperator};

/// Default SBX distribution index
pub const DEFAULT_SBX_ETA: f64 = 5.0;

// ============================================================================
// Discrete recombination
// ============================================================================

/// Discrete recombination.
///
/// Each gene is inherited from `x1` or `x2` by an independent fair coin flip.
pub fn discrete_recombination<R: Rng>(
    x1: &[f64],
    x2: &[f64],
    rng: &mut R,
) -> OperatorResult<Vec<f64>> {
    check_dimension(x1.len(), x2.len())?;
    let mask: Vec<bool> = (0..x1.len()).map(|_| rng.gen_bool(0.5)).collect();
    discrete_recombination_with_mask(x1, x2, &mask)
}

/// Discrete recombination with fixed coin outcomes.
///
/// `mask[d] == true` takes `x1[d]`, otherwise `x2[d]`.
pub fn discrete_recombination_with_mask(
    x1: &[f64],
    x2: &[f64],
    mask: &[bool],
) -> OperatorResult<Vec<f64>> {
    check_dimension(x1.len(), x2.len())?;
    check_dimension(x1.len(), mask.len())?;

    Ok(x1
        .iter()
        .zip(x2)
        .zip(mask)
        .map(|((&a, &b), &take_first)| if take_first { a } else { b })
        .collect())
}

// ============================================================================
// Weighted recombination
// ============================================================================

/// Weighted recombination: `(coef * x1 + (1 - coef) * x2) / 2`.
///
/// With `coef = 0.5` this is intermediate recombination. The result is half
/// of the convex combination, not the convex combination itself.
pub fn weighted_recombination(x1: &[f64], x2: &[f64], coef: f64) -> OperatorResult<Vec<f64>> {
    check_dimension(x1.len(), x2.len())?;

    Ok(x1
        .iter()
        .zip(x2)
        .map(|(&a, &b)| (coef * a + (1.0 - coef) * b) / 2.0)
        .collect())
}

// ============================================================================
// One-point crossover
// ============================================================================

/// One-point crossover with a cut index drawn uniformly from `[0, n)`.
///
/// A cut at 0 returns a copy of `x2`.
pub fn one_point_crossover<R: Rng>(
    x1: &[f64],
    x2: &[f64],
    rng: &mut R,
) -> OperatorResult<Vec<f64>> {
    check_dimension(x1.len(), x2.len())?;
    let n = x1.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    one_point_crossover_at(x1, x2, rng.gen_range(0..n))
}

/// One-point crossover at a fixed cut: `x1[..cut] ++ x2[cut..]`.
pub fn one_point_crossover_at(x1: &[f64], x2: &[f64], cut: usize) -> OperatorResult<Vec<f64>> {
    check_dimension(x1.len(), x2.len())?;
    if cut > x1.len() {
        return Err(OperatorError::InvalidConfiguration(format!(
            "cut index {} exceeds dimension {}",
            cut,
            x1.len()
        )));
    }

    let mut offspring = Vec::with_capacity(x1.len());
    offspring.extend_from_slice(&x1[..cut]);
    offspring.extend_from_slice(&x2[cut..]);
    Ok(offspring)
}

// ============================================================================
// Bounded simulated binary crossover
// ============================================================================

/// Exponent used on the inside branch of the SBX inverse CDF.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InverseCdf {
    /// Inside branch `(u * alpha)^-(eta + 1)`, outside branch
    /// `(1 / (2 - alpha * u))^(1 / (eta + 1))`.
    #[default]
    Asymmetric,
    /// `1 / (eta + 1)` on both branches (Deb & Agrawal, NSGA-II).
    Symmetric,
}

impl InverseCdf {
    fn inside_exponent(self, eta: f64) -> f64 {
        match self {
            Self::Asymmetric => -(eta + 1.0),
            Self::Symmetric => 1.0 / (eta + 1.0),
        }
    }
}

/// Bounded Simulated Binary Crossover with the asymmetric inverse CDF.
///
/// See [`bounded_sbx_with`].
pub fn bounded_sbx<R: Rng>(
    parent1: &[f64],
    parent2: &[f64],
    lower: &[f64],
    upper: &[f64],
    eta: f64,
    rng: &mut R,
) -> OperatorResult<(Vec<f64>, Vec<f64>)> {
    bounded_sbx_with(parent1, parent2, lower, upper, eta, InverseCdf::Asymmetric, rng)
}

/// Bounded Simulated Binary Crossover.
///
/// Each dimension is crossed with probability 0.5 when the parents differ
/// there; otherwise the parents' values are copied unchanged. A crossed
/// dimension draws one uniform `u` shared by both children, computes the
/// lower child from the distance to `lower` and the upper child from the
/// distance to `upper`, clips both into bounds and assigns them to the
/// children in random order.
///
/// Reference: Deb, K., & Agrawal, R. B. (1995). Simulated Binary Crossover
/// for Continuous Search Space.
///
/// # Errors
///
/// - [`OperatorError::DimensionMismatch`] if the four slices differ in length
/// - [`OperatorError::InvalidConfiguration`] if `eta < 0` or `lower[i] > upper[i]`
/// - [`OperatorError::NumericInstability`] if any intermediate is non-finite
pub fn bounded_sbx_with<R: Rng>(
    parent1: &[f64],
    parent2: &[f64],
    lower: &[f64],
    upper: &[f64],
    eta: f64,
    inverse_cdf: InverseCdf,
    rng: &mut R,
) -> OperatorResult<(Vec<f64>, Vec<f64>)> {
    let n = parent1.len();
    check_dimension(n, parent2.len())?;
    check_dimension(n, lower.len())?;
    check_dimension(n, upper.len())?;
    validate_eta(eta)?;
    if let Some(i) = (0..n).find(|&i| !(lower[i] <= upper[i])) {
        return Err(OperatorError::InvalidConfiguration(format!(
            "lower bound {} exceeds upper bound {} at index {}",
            lower[i], upper[i], i
        )));
    }

    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();

    for i in 0..n {
        let (x1, x2) = (parent1[i], parent2[i]);
        if rng.gen::<f64>() <= 0.5 && (x2 - x1).abs() > 0.0 {
            let u = rng.gen::<f64>();
            let (c1, c2) = sbx_children(x1, x2, lower[i], upper[i], eta, u, inverse_cdf)
                .map_err(|e| at_dimension(e, i))?;

            tracing::trace!(index = i, u, c1, c2, "sbx crossed dimension");

            if rng.gen::<f64>() <= 0.5 {
                child1[i] = c1;
                child2[i] = c2;
            } else {
                child1[i] = c2;
                child2[i] = c1;
            }
        }
    }

    Ok((child1, child2))
}

/// Lower and upper SBX children for one dimension, clipped into `[lower, upper]`.
///
/// `u` is the uniform draw shared by both children. The parents must differ.
pub fn sbx_children(
    x1: f64,
    x2: f64,
    lower: f64,
    upper: f64,
    eta: f64,
    u: f64,
    inverse_cdf: InverseCdf,
) -> OperatorResult<(f64, f64)> {
    if !(lower <= upper) {
        return Err(OperatorError::InvalidConfiguration(format!(
            "lower bound {} exceeds upper bound {}",
            lower, upper
        )));
    }

    let y1 = x1.min(x2);
    let y2 = x1.max(x2);
    let spread = y2 - y1;

    let (alpha, beta, beta_q) =
        spread_factor(1.0 + 2.0 * (y1 - lower) / spread, eta, u, inverse_cdf)?;
    let c1 = 0.5 * (y1 + y2 - beta_q * spread);
    check_finite(
        "bounded_sbx",
        None,
        &[("alpha", alpha), ("beta", beta), ("beta_cumul", beta_q), ("c1", c1)],
    )?;

    let (alpha, beta, beta_q) =
        spread_factor(1.0 + 2.0 * (upper - y2) / spread, eta, u, inverse_cdf)?;
    let c2 = 0.5 * (y1 + y2 + beta_q * spread);
    check_finite(
        "bounded_sbx",
        None,
        &[("alpha", alpha), ("beta", beta), ("beta_cumul", beta_q), ("c2", c2)],
    )?;

    Ok((c1.clamp(lower, upper), c2.clamp(lower, upper)))
}

/// Spread factor `beta_q` from the bound-aware inverse CDF, returned as
/// `(alpha, beta, beta_q)`
fn spread_factor(
    beta: f64,
    eta: f64,
    u: f64,
    inverse_cdf: InverseCdf,
) -> OperatorResult<(f64, f64, f64)> {
    let alpha = 2.0 - beta.powf(-(eta + 1.0));
    let beta_cumul = if u <= 1.0 / alpha {
        (u * alpha).powf(inverse_cdf.inside_exponent(eta))
    } else {
        (1.0 / (2.0 - alpha * u)).powf(1.0 / (eta + 1.0))
    };

    check_finite(
        "bounded_sbx",
        None,
        &[("alpha", alpha), ("beta", beta), ("beta_cumul", beta_cumul)],
    )?;
    Ok((alpha, beta, beta_cumul))
}

fn at_dimension(err: OperatorError, index: usize) -> OperatorError {
    match err {
        OperatorError::NumericInstability {
            operator, context, ..
        } => OperatorError::NumericInstability {
            operator,
            index: Some(index),
            context,
        },
        other => other,
    }
}

fn validate_eta(eta: f64) -> OperatorResult<()> {
    if !(eta >= 0.0) || !eta.is_finite() {
        return Err(OperatorError::InvalidConfiguration(format!(
            "distribution index must be finite and non-negative, got {}",
            eta
        )));
    }
    Ok(())
}

// ============================================================================
// Configured operators
// ============================================================================

/// Discrete recombination operator
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscreteRecombination;

impl RecombinationOperator for DiscreteRecombination {
    fn recombine<R: Rng>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        rng: &mut R,
    ) -> OperatorResult<RealVector> {
        discrete_recombination(parent1.genes(), parent2.genes(), rng).map(RealVector::new)
    }
}

/// Weighted recombination operator
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeightedRecombination")]
pub struct WeightedRecombination {
    /// Weight of the first parent, in `[0, 1]`
    pub coef: f64,
}

impl WeightedRecombination {
    /// Create with the given weight
    ///
    /// # Panics
    /// Panics if `coef` is outside `[0, 1]`
    pub fn new(coef: f64) -> Self {
        assert!((0.0..=1.0).contains(&coef), "Weight must be in [0, 1]");
        Self { coef }
    }

    /// Create with the given weight, returning an error if it is outside `[0, 1]`
    pub fn try_new(coef: f64) -> OperatorResult<Self> {
        if !(0.0..=1.0).contains(&coef) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "weight must be in [0, 1], got {}",
                coef
            )));
        }
        Ok(Self { coef })
    }

    /// Intermediate recombination (`coef = 0.5`)
    pub fn intermediate() -> Self {
        Self::new(0.5)
    }
}

impl Default for WeightedRecombination {
    fn default() -> Self {
        Self::intermediate()
    }
}

#[derive(Deserialize)]
struct RawWeightedRecombination {
    coef: f64,
}

impl TryFrom<RawWeightedRecombination> for WeightedRecombination {
    type Error = OperatorError;

    fn try_from(raw: RawWeightedRecombination) -> OperatorResult<Self> {
        Self::try_new(raw.coef)
    }
}

impl RecombinationOperator for WeightedRecombination {
    fn recombine<R: Rng>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        _rng: &mut R,
    ) -> OperatorResult<RealVector> {
        weighted_recombination(parent1.genes(), parent2.genes(), self.coef).map(RealVector::new)
    }
}

/// One-point crossover operator
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OnePointCrossover;

impl RecombinationOperator for OnePointCrossover {
    fn recombine<R: Rng>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        rng: &mut R,
    ) -> OperatorResult<RealVector> {
        one_point_crossover(parent1.genes(), parent2.genes(), rng).map(RealVector::new)
    }
}

/// Bounded Simulated Binary Crossover (SBX) operator
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSbxCrossover")]
pub struct SbxCrossover {
    /// Distribution index. Higher values keep offspring closer to parents.
    pub eta: f64,
    /// Inverse-CDF exponent on the inside branch
    #[serde(default)]
    pub inverse_cdf: InverseCdf,
}

impl SbxCrossover {
    /// Create a new SBX crossover with the given distribution index
    ///
    /// # Panics
    /// Panics if `eta` is negative or not finite
    pub fn new(eta: f64) -> Self {
        assert!(
            eta >= 0.0 && eta.is_finite(),
            "Distribution index must be non-negative"
        );
        Self {
            eta,
            inverse_cdf: InverseCdf::default(),
        }
    }

    /// Create with the given distribution index, returning an error if invalid
    pub fn try_new(eta: f64) -> OperatorResult<Self> {
        validate_eta(eta)?;
        Ok(Self {
            eta,
            inverse_cdf: InverseCdf::default(),
        })
    }

    /// Select the inverse-CDF exponent
    pub fn with_inverse_cdf(mut self, inverse_cdf: InverseCdf) -> Self {
        self.inverse_cdf = inverse_cdf;
        self
    }
}

impl Default for SbxCrossover {
    fn default() -> Self {
        Self::new(DEFAULT_SBX_ETA)
    }
}

#[derive(Deserialize)]
struct RawSbxCrossover {
    eta: f64,
    #[serde(default)]
    inverse_cdf: InverseCdf,
}

impl TryFrom<RawSbxCrossover> for SbxCrossover {
    type Error = OperatorError;

    fn try_from(raw: RawSbxCrossover) -> OperatorResult<Self> {
        Ok(Self::try_new(raw.eta)?.with_inverse_cdf(raw.inverse_cdf))
    }
}

impl BoundedCrossoverOperator for SbxCrossover {
    fn crossover_bounded<R: Rng>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> OperatorResult<(RealVector, RealVector)> {
        let (child1, child2) = bounded_sbx_with(
            parent1.genes(),
            parent2.genes(),
            &bounds.lower(),
            &bounds.upper(),
            self.eta,
            self.inverse_cdf,
            rng,
        )?;
        Ok((RealVector::new(child1), RealVector::new(child2)))
    }
}
