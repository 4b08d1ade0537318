//! Property-based tests for evo-variation
//!
//! Uses proptest to verify invariants of the variation operators.

use evo_variation::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Two parents of the same random dimension
fn parent_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..20).prop_flat_map(|dim| {
        (
            prop::collection::vec(-10.0..10.0f64, dim),
            prop::collection::vec(-10.0..10.0f64, dim),
        )
    })
}

proptest! {
    // ==================== Recombination Properties ====================

    #[test]
    fn discrete_takes_values_from_parents((x1, x2) in parent_pair(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let offspring = discrete_recombination(&x1, &x2, &mut rng).unwrap();

        prop_assert_eq!(offspring.len(), x1.len());
        for d in 0..x1.len() {
            prop_assert!(offspring[d] == x1[d] || offspring[d] == x2[d]);
        }
    }

    #[test]
    fn intermediate_recombination_symmetric((x1, x2) in parent_pair()) {
        let a = weighted_recombination(&x1, &x2, 0.5).unwrap();
        let b = weighted_recombination(&x2, &x1, 0.5).unwrap();
        for d in 0..x1.len() {
            prop_assert!((a[d] - b[d]).abs() < 1e-12);
            prop_assert!((a[d] - (x1[d] + x2[d]) / 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn one_point_prefix_and_suffix((x1, x2) in parent_pair(), cut_frac in 0.0..1.0f64) {
        let cut = ((x1.len() as f64) * cut_frac) as usize;
        let offspring = one_point_crossover_at(&x1, &x2, cut).unwrap();

        prop_assert_eq!(offspring.len(), x1.len());
        prop_assert_eq!(&offspring[..cut], &x1[..cut]);
        prop_assert_eq!(&offspring[cut..], &x2[cut..]);
    }

    #[test]
    fn sbx_children_within_bounds(
        (x1, x2) in parent_pair(),
        eta in 0.0..30.0f64,
        symmetric in any::<bool>(),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let lower = vec![-10.0; x1.len()];
        let upper = vec![10.0; x1.len()];
        let inverse_cdf = if symmetric { InverseCdf::Symmetric } else { InverseCdf::Asymmetric };

        match bounded_sbx_with(&x1, &x2, &lower, &upper, eta, inverse_cdf, &mut rng) {
            Ok((c1, c2)) => {
                for i in 0..x1.len() {
                    prop_assert!(c1[i] >= lower[i] && c1[i] <= upper[i]);
                    prop_assert!(c2[i] >= lower[i] && c2[i] <= upper[i]);
                }
            }
            // Overflow for extreme draws is reported, never clipped silently
            Err(e) => prop_assert!(
                matches!(e, OperatorError::NumericInstability { .. }),
                "unexpected error: {:?}",
                e
            ),
        }
    }

    #[test]
    fn sbx_equal_genes_pass_through(
        genes in prop::collection::vec(-5.0..5.0f64, 1..20),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let lower = vec![-5.0; genes.len()];
        let upper = vec![5.0; genes.len()];

        let (c1, c2) = bounded_sbx(&genes, &genes, &lower, &upper, 5.0, &mut rng).unwrap();
        prop_assert_eq!(&c1, &genes);
        prop_assert_eq!(&c2, &genes);
    }

    // ==================== Mutation Properties ====================

    #[test]
    fn derandomized_sigma_stays_positive(
        x in prop::collection::vec(-10.0..10.0f64, 1..20),
        sigma_scale in 1e-3..10.0f64,
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let sigma = vec![sigma_scale; x.len()];

        let mutant = derandomized_mutation(&x, &sigma, &mut rng).unwrap();
        prop_assert_eq!(mutant.x.len(), x.len());
        prop_assert!(mutant.sigma.iter().all(|&s| s > 0.0 && s.is_finite()));
    }

    #[test]
    fn derandomized_zero_noise_is_identity(
        x in prop::collection::vec(-10.0..10.0f64, 1..20),
        sigma_scale in 1e-3..10.0f64
    ) {
        let sigma = vec![sigma_scale; x.len()];
        let z = vec![0.0; x.len()];

        let mutant = derandomized_mutation_with_noise(&x, &sigma, 0.0, &z).unwrap();
        prop_assert_eq!(&mutant.x, &x);
    }

    // ==================== Adaptation Properties ====================

    #[test]
    fn one_fifth_direction(
        sigma in 1e-3..100.0f64,
        parent in -100.0..100.0f64,
        delta in 1e-6..100.0f64,
        inv_dim_sqrt in 1e-3..2.0f64
    ) {
        prop_assert!(one_fifth_success(sigma, parent + delta, parent, inv_dim_sqrt) > sigma);
        prop_assert!(one_fifth_success(sigma, parent, parent, inv_dim_sqrt) > sigma);
        prop_assert!(one_fifth_success(sigma, parent - delta, parent, inv_dim_sqrt) < sigma);
    }

    #[test]
    fn search_path_sigma_stays_positive(
        steps in prop::collection::vec(prop::collection::vec(-3.0..3.0f64, 4), 1..4),
        sigma_scale in 1e-3..10.0f64
    ) {
        let params = SearchPathParams::new(4, steps.len(), 8);
        let sigma = vec![sigma_scale; 4];

        let out = search_path_mutation(&sigma, &steps, &SearchPath::zeros(4), &params).unwrap();
        prop_assert_eq!(out.path.dimension(), 4);
        prop_assert!(out.sigma.iter().all(|&s| s > 0.0 && s.is_finite()));
    }
}

#[test]
fn es_generation_composes_operators() {
    // One (1, 4)-ES style generation: recombine, mutate, adapt
    let mut rng = StdRng::seed_from_u64(2024);
    let bounds = MultiBounds::symmetric(5.0, 3);
    let parent1 = RealVector::new(vec![1.0, -1.0, 0.5]);
    let parent2 = RealVector::new(vec![-0.5, 2.0, 0.0]);

    let (child, _) = SbxCrossover::default()
        .crossover_bounded(&parent1, &parent2, &bounds, &mut rng)
        .unwrap();
    assert!(bounds.contains_vec(child.genes()));

    let mid = WeightedRecombination::intermediate()
        .recombine(&parent1, &parent2, &mut rng)
        .unwrap();
    assert_eq!(mid.dimension(), 3);

    let mutant = derandomized_mutation(child.genes(), &[0.3; 3], &mut rng).unwrap();

    let rule = OneFifthRule::for_dimension(3);
    let fitness = |x: &[f64]| -x.iter().map(|v| v * v).sum::<f64>();
    let sigma = rule.adapt(0.3, fitness(&mutant.x), fitness(child.genes()));
    assert!(sigma > 0.0);

    let mut adaptation = SearchPathAdaptation::new(SearchPathParams::new(3, 1, 4));
    let adapted = adaptation.adapt(&mutant.sigma, &[[0.1, -0.2, 0.3]]).unwrap();
    assert_eq!(adapted.len(), 3);
    assert!(adaptation.path().norm() > 0.0);
}
