use std::f64::consts::PI;

use num_complex::Complex64;
use proptest::prelude::*;
use spectra_core::ErrorKind;
use spectra_pade::{fit, DividedDifferences};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn matsubara(count: usize, beta: f64) -> Vec<Complex64> {
    (0..count)
        .map(|k| c(0.0, (2 * k + 1) as f64 * PI / beta))
        .collect()
}

fn pole_sum(poles: &[(f64, f64)], z: Complex64) -> Complex64 {
    poles
        .iter()
        .map(|&(energy, weight)| c(weight, 0.0) / (z - c(energy, 0.0)))
        .sum()
}

const FIVE_POLES: [(f64, f64); 5] = [
    (-1.3, 0.1),
    (-0.4, 0.3),
    (0.2, 0.2),
    (0.9, 0.25),
    (1.7, 0.15),
];

const TWO_POLES: [(f64, f64); 2] = [(0.5, 1.0), (-1.0, 0.5)];

#[test]
fn reproduces_samples_at_the_nodes() {
    let nodes = matsubara(8, 10.0);
    let values: Vec<Complex64> = nodes.iter().map(|&z| pole_sum(&FIVE_POLES, z)).collect();
    let approximant = fit(&nodes, &values).expect("fit");
    assert_eq!(approximant.order(), 8);
    for (&z, &value) in nodes.iter().zip(&values) {
        assert!((approximant.evaluate(z) - value).norm() < 1e-9);
    }
    let many = approximant.evaluate_many(&nodes);
    for (found, want) in many.iter().zip(&values) {
        assert!((found - want).norm() < 1e-9);
    }
}

#[test]
fn recovers_a_rational_function_of_matching_degree() {
    // Two simple poles give a (1, 2) rational function: four terms suffice.
    let nodes = matsubara(4, 5.0);
    let values: Vec<Complex64> = nodes.iter().map(|&z| pole_sum(&TWO_POLES, z)).collect();
    let approximant = fit(&nodes, &values).expect("fit");

    let z = c(0.3, 0.2);
    assert!((approximant.evaluate(z) - pole_sum(&TWO_POLES, z)).norm() < 1e-8);
    let x = 2.0;
    assert!((approximant.evaluate_real(x) - pole_sum(&TWO_POLES, c(x, 0.0))).norm() < 1e-8);

    let omegas = [-2.0, -0.5, 0.0, 1.0, 2.5];
    let eta = 0.05;
    let broadened = approximant.evaluate_with_broadening(&omegas, eta);
    assert_eq!(broadened.len(), omegas.len());
    for (&omega, found) in omegas.iter().zip(&broadened) {
        let want = pole_sum(&TWO_POLES, c(omega, eta));
        assert!((found - want).norm() < 1e-8 * want.norm().max(1.0));
        // Retarded response: spectral weight is non-negative.
        assert!(found.im <= 0.0);
    }
}

#[test]
fn keeps_the_samples_it_was_fitted_to() {
    let nodes = matsubara(3, 4.0);
    let values = vec![c(0.5, -0.2), c(0.3, -0.1), c(0.2, -0.05)];
    let approximant = fit(&nodes, &values).expect("fit");
    assert_eq!(approximant.nodes(), nodes.as_slice());
    assert_eq!(approximant.values(), values.as_slice());
    assert_eq!(approximant.coefficients()[0], values[0]);

    let table = DividedDifferences::build(&nodes, &values).expect("table");
    assert_eq!(table.coefficients(), approximant.coefficients());

    let json = serde_json::to_value(&approximant).expect("serialize");
    assert_eq!(json["coefficients"].as_array().map(Vec::len), Some(3));
}

#[test]
fn constant_samples_break_the_recursion() {
    let nodes = [c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)];
    let values = [c(1.0, 0.0); 3];
    let err = fit(&nodes, &values).expect_err("degenerate");
    assert_eq!(err.kind(), ErrorKind::Division);
    assert_eq!(err.info().code, "zero-denominator");
    assert_eq!(err.info().context.get("p").map(String::as_str), Some("2"));
    assert_eq!(err.info().context.get("k").map(String::as_str), Some("2"));
}

#[test]
fn zero_sample_after_the_first_breaks_the_recursion() {
    let err = fit(&matsubara(2, 1.0), &[c(1.0, 0.0), c(0.0, 0.0)]).expect_err("zero value");
    assert_eq!(err.kind(), ErrorKind::Division);
    assert_eq!(err.info().context.get("k").map(String::as_str), Some("1"));
}

#[test]
fn malformed_input_is_rejected() {
    let err = fit(&[], &[]).expect_err("empty");
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(err.info().code, "empty-input");

    let err = fit(&matsubara(2, 1.0), &[c(1.0, 0.0)]).expect_err("mismatch");
    assert_eq!(err.kind(), ErrorKind::Input);
    assert_eq!(err.info().code, "dimension-mismatch");
}

proptest! {
    #[test]
    fn interpolates_arbitrary_samples(
        samples in prop::collection::vec((1.0f64..2.0, -1.0f64..-0.1), 1..6),
    ) {
        let nodes = matsubara(samples.len(), 8.0);
        let values: Vec<Complex64> = samples.iter().map(|&(re, im)| c(re, im)).collect();
        let fitted = fit(&nodes, &values);
        prop_assume!(fitted.is_ok());
        let approximant = fitted.unwrap();
        for (&z, &value) in nodes.iter().zip(&values) {
            prop_assert!((approximant.evaluate(z) - value).norm() < 1e-7);
        }
    }
}
