use ccc_core::{UReal, UncertainReal};
use proptest::prelude::*;

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1e-300)
}

#[test]
fn product_of_independent_inputs_adds_relative_variances() {
    let a = UReal::new(4.0, 0.04, 10.0, "a").unwrap();
    let b = UReal::new(2.0, 0.01, 5.0, "b").unwrap();
    let product = &a * &b;
    let expected = 8.0 * ((0.04f64 / 4.0).powi(2) + (0.01f64 / 2.0).powi(2)).sqrt();
    assert_eq!(product.x(), 8.0);
    assert!(close(product.u(), expected, 1e-12));
}

#[test]
fn welch_satterthwaite_for_sum() {
    let a = UReal::new(1.0, 0.3, 4.0, "a").unwrap();
    let b = UReal::new(1.0, 0.4, 9.0, "b").unwrap();
    let sum = &a + &b;
    let expected = 0.5f64.powi(4) / (0.3f64.powi(4) / 4.0 + 0.4f64.powi(4) / 9.0);
    assert!(close(sum.u(), 0.5, 1e-12));
    assert!(close(sum.df(), expected, 1e-12));
}

#[test]
fn reused_input_is_fully_correlated() {
    let a = UReal::new(3.0, 0.1, 20.0, "a").unwrap();
    let doubled = &a + &a;
    assert!(close(doubled.u(), 0.2, 1e-12));
    assert!(close(doubled.df(), 20.0, 1e-12));
}

#[test]
fn budget_reports_each_input() {
    let a = UReal::new(10.0, 0.5, 8.0, "a").unwrap();
    let b = UReal::new(2.0, 0.1, 8.0, "b").unwrap();
    let ratio = &a / &b;
    assert!(close(ratio.component_of(&a), 0.25, 1e-12));
    assert!(close(ratio.component_of(&b), 0.25, 1e-12));
    let labels: Vec<_> = ratio
        .components()
        .filter_map(|(_, component)| component.label.clone())
        .collect();
    assert_eq!(labels, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn constants_carry_no_uncertainty() {
    let c = UReal::constant(1.5);
    assert!(c.is_exact());
    assert_eq!(c.u(), 0.0);
    assert!(c.df().is_infinite());
}

#[test]
fn negative_uncertainty_is_rejected() {
    let err = UReal::new(1.0, -0.1, 3.0, "bad").unwrap_err();
    assert_eq!(err.info().code, "ccc_core.ureal_uncertainty");
}

proptest! {
    #[test]
    fn adding_an_exact_offset_keeps_uncertainty(
        x in -1.0e3f64..1.0e3,
        u in 1.0e-9f64..1.0,
        df in 1.0f64..100.0,
        offset in -1.0e3f64..1.0e3,
    ) {
        let a = UReal::new(x, u, df, "a").unwrap();
        let shifted = &a + offset;
        prop_assert!(close(shifted.x(), x + offset, 1e-12) || (shifted.x() - (x + offset)).abs() < 1e-9);
        prop_assert!(close(shifted.u(), u, 1e-12));
        prop_assert!(close(shifted.df(), df, 1e-9));
    }

    #[test]
    fn scaling_scales_uncertainty(
        x in -1.0e3f64..1.0e3,
        u in 1.0e-9f64..1.0,
        factor in 0.1f64..100.0,
    ) {
        let a = UReal::new(x, u, 10.0, "a").unwrap();
        let scaled = factor * &a;
        prop_assert!(close(scaled.u(), factor * u, 1e-12));
    }

    #[test]
    fn division_undoes_multiplication(
        x in 1.0f64..10.0,
        u in 1.0e-6f64..1.0e-2,
        y in 1.0f64..10.0,
    ) {
        let a = UReal::new(x, u, 12.0, "a").unwrap();
        let round_trip = &(&a * y) / y;
        prop_assert!(close(round_trip.x(), x, 1e-12));
        prop_assert!(close(round_trip.u(), u, 1e-12));
    }
}
