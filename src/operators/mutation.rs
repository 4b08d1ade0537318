//! Derandomized mutation
//!
//! Mutation with both a global and a per-dimension step-size component,
//! adapted from the same normal draws that perturb the individual.
//!
//! Reference: Hansen, N., Arnold, D. V., & Auger, A. (2015). Evolution
//! Strategies. Algorithm 3.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::{check_dimension, check_finite, OperatorError, OperatorResult};

/// Learning rate of the global noise component
pub const DERANDOMIZED_TAU: f64 = 1.0 / 3.0;

/// Mutated individual together with its adapted step sizes
#[derive(Clone, Debug, PartialEq)]
pub struct Mutant {
    /// Mutated individual
    pub x: Vec<f64>,
    /// Adapted per-dimension step sizes
    pub sigma: Vec<f64>,
}

/// Derandomized mutation of `x` with per-dimension step sizes `sigma`.
///
/// Draws one global standard-normal scalar and one standard-normal value per
/// dimension, then applies [`derandomized_mutation_with_noise`]. The search
/// space dimension is `x.len()`.
pub fn derandomized_mutation<R: Rng>(
    x: &[f64],
    sigma: &[f64],
    rng: &mut R,
) -> OperatorResult<Mutant> {
    let global: f64 = rng.sample(StandardNormal);
    let z: Vec<f64> = (0..x.len()).map(|_| rng.sample(StandardNormal)).collect();
    derandomized_mutation_with_noise(x, sigma, global, &z)
}

/// Derandomized mutation with given noise.
///
/// With `n = x.len()`, `d = sqrt(n)` and `g = tau * global`:
///
/// - `x'[i] = x[i] + exp(g) * sigma[i] * z[i]`
/// - `sigma'[i] = sigma[i] * exp((|z[i]| - 1) / n) * exp(g / d)`
///
/// # Errors
///
/// - [`OperatorError::DimensionMismatch`] if `sigma` or `z` differ from `x` in length
/// - [`OperatorError::InvalidConfiguration`] if `x` is empty or a step size is not
///   strictly positive
/// - [`OperatorError::NumericInstability`] if a result is non-finite or a step
///   size collapses to zero
pub fn derandomized_mutation_with_noise(
    x: &[f64],
    sigma: &[f64],
    global: f64,
    z: &[f64],
) -> OperatorResult<Mutant> {
    let n = x.len();
    check_dimension(n, sigma.len())?;
    check_dimension(n, z.len())?;
    if n == 0 {
        return Err(OperatorError::InvalidConfiguration(
            "derandomized mutation needs at least one dimension".to_string(),
        ));
    }
    validate_step_sizes(sigma)?;

    let n_f = n as f64;
    let d = n_f.sqrt();
    let global_noise = DERANDOMIZED_TAU * global;
    let step_scale = global_noise.exp();
    let sigma_scale = (global_noise / d).exp();

    let mut mutated = Vec::with_capacity(n);
    let mut adapted = Vec::with_capacity(n);
    for i in 0..n {
        let xi = x[i] + step_scale * sigma[i] * z[i];
        let si = sigma[i] * ((z[i].abs() - 1.0) / n_f).exp() * sigma_scale;

        check_finite(
            "derandomized_mutation",
            Some(i),
            &[("global_noise", global_noise), ("z", z[i]), ("x", xi), ("sigma", si)],
        )?;
        if si <= 0.0 {
            return Err(OperatorError::NumericInstability {
                operator: "derandomized_mutation",
                index: Some(i),
                context: format!("sigma underflowed to {}", si),
            });
        }

        mutated.push(xi);
        adapted.push(si);
    }

    Ok(Mutant {
        x: mutated,
        sigma: adapted,
    })
}

/// Fail unless every step size is finite and strictly positive
pub(crate) fn validate_step_sizes(sigma: &[f64]) -> OperatorResult<()> {
    if let Some((i, s)) = sigma
        .iter()
        .enumerate()
        .find(|(_, s)| !(s.is_finite() && **s > 0.0))
    {
        return Err(OperatorError::InvalidConfiguration(format!(
            "step size must be finite and positive, got {} at index {}",
            s, i
        )));
    }
    Ok(())
}
