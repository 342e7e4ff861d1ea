//! Property tests for WENO reconstruction.
//!
//! Covers weight normalization, exactness on low-degree polynomials,
//! non-oscillatory behaviour at a step, input validation, non-uniform
//! stencils and the formal order on a smooth function.

use recon_rs::{
    ReconError, SampleKind, SampleSeries, WenoConfig, WenoOrder, WenoReconstructor,
    weno_reconstruct,
};

const OFFSETS: [f64; 9] = [-1.0, -0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75, 1.0];

fn reconstructor(k: usize, kind: SampleKind) -> WenoReconstructor {
    let order = WenoOrder::from_half_width(k).unwrap();
    WenoReconstructor::new(WenoConfig::new(order).with_sample_kind(kind)).unwrap()
}

/// Rough stencil data with a jump somewhere inside.
fn rough_stencil(width: usize, seed: usize) -> Vec<f64> {
    (0..width)
        .map(|i| {
            let t = (i + 3 * seed) as f64;
            (2.1 * t).sin() + if (i + seed) % 4 == 0 { 1.5 } else { 0.0 }
        })
        .collect()
}

#[test]
fn test_nonlinear_weights_sum_to_one() {
    for k in 2..=5 {
        let width = 2 * k - 1;
        let points = reconstructor(k, SampleKind::PointValues);
        let averages = reconstructor(k, SampleKind::CellAverages);

        for seed in 0..6 {
            let values = rough_stencil(width, seed);
            for xi in OFFSETS {
                let w = points.weights(&values, xi).unwrap();
                assert!(
                    (w.weight_sum() - 1.0).abs() < 1e-12,
                    "k={k} xi={xi}: {}",
                    w.weight_sum()
                );
                assert!(w.nonlinear.iter().all(|&v| v >= 0.0));
            }
            // Interface offsets: optimal weights are positive for averages too
            for xi in [-1.0, -0.5, 0.5, 1.0] {
                let w = averages.weights(&values, xi).unwrap();
                assert!(
                    (w.weight_sum() - 1.0).abs() < 1e-12,
                    "averages k={k} xi={xi}: {}",
                    w.weight_sum()
                );
            }
        }
    }
}

#[test]
fn test_low_degree_polynomials_are_exact() {
    // Degree k-1: every candidate is exact, so WENO equals the full stencil fit
    for k in 2..=5 {
        let width = 2 * k - 1;
        let recon = reconstructor(k, SampleKind::PointValues);
        let f = |x: f64| (0..k).map(|m| (m as f64 + 1.0) * 0.3 * x.powi(m as i32)).sum::<f64>();
        let half = (width / 2) as f64;
        let values: Vec<f64> = (0..width).map(|i| f(i as f64 - half)).collect();

        for xi in OFFSETS {
            let w = recon.weights(&values, xi).unwrap();
            let exact = f(xi / 2.0);
            assert!(
                (w.value - exact).abs() < 1e-9 * exact.abs().max(1.0),
                "k={k} xi={xi}: {} vs {exact}",
                w.value
            );
            let full = recon.offset_weights(xi).unwrap().full_value(&values);
            assert!((w.value - full).abs() < 1e-9 * full.abs().max(1.0));
        }
    }
}

#[test]
fn test_constant_data_is_reproduced() {
    for k in 2..=6 {
        for kind in [SampleKind::PointValues, SampleKind::CellAverages] {
            let recon = reconstructor(k, kind);
            let values = vec![-3.25; 2 * k - 1];
            for xi in [-1.0, -0.5, 0.5, 1.0] {
                let v = recon.reconstruct(&values, xi).unwrap();
                assert!((v + 3.25).abs() < 1e-10, "k={k} {kind:?} xi={xi}: {v}");
            }
        }
    }
}

#[test]
fn test_step_prefers_smooth_stencil() {
    let x = [0.0, 1.0, 2.0, 3.0, 4.0];
    let y = [1.0, 1.0, 1.0, 0.0, 0.0];
    let recon = reconstructor(3, SampleKind::PointValues);

    for xi in [-1.0, 1.0] {
        let w = recon.weights(&y, xi).unwrap();
        assert_eq!(w.dominant(), 0, "xi={xi}: {:?}", w.nonlinear);
        assert!(w.smoothness[0] < 1e-12);
        assert!(w.nonlinear[1] < 1e-6 && w.nonlinear[2] < 1e-6);

        let v = weno_reconstruct(&y, &x, 3, xi).unwrap();
        assert!((v - 1.0).abs() < 1e-9, "xi={xi}: {v}");
    }
}

#[test]
fn test_step_does_not_overshoot() {
    // Across a jump the reconstruction stays within the data range
    let recon = reconstructor(3, SampleKind::CellAverages);
    let values: Vec<f64> = (0..40).map(|i| if i < 20 { 1.0 } else { 0.0 }).collect();
    let states = recon.reconstruct_interfaces(&values).unwrap();
    assert!(!states.is_empty());
    for s in &states {
        for v in [s.left, s.right] {
            assert!((-1e-3..=1.0 + 1e-3).contains(&v), "{s:?}");
        }
    }
    // The jump sits at interface 19 + 1/2
    let biggest = states
        .iter()
        .max_by(|a, b| a.jump().abs().total_cmp(&b.jump().abs()))
        .unwrap();
    assert_eq!(biggest.index, 19);
}

#[test]
fn test_input_validation() {
    let x5 = [0.0, 1.0, 2.0, 3.0, 4.0];
    let y5 = [0.0, 1.0, 2.0, 3.0, 4.0];

    assert_eq!(
        weno_reconstruct(&y5[..3], &x5[..3], 3, 0.5).unwrap_err(),
        ReconError::StencilSizeMismatch {
            expected: 5,
            actual: 3
        }
    );
    assert_eq!(
        weno_reconstruct(&y5, &x5, 3, 1.5).unwrap_err(),
        ReconError::OffsetOutOfRange(1.5)
    );
    assert!(matches!(
        weno_reconstruct(&y5, &x5, 3, f64::NAN),
        Err(ReconError::OffsetOutOfRange(_))
    ));
    assert!(matches!(
        weno_reconstruct(&y5, &x5, 0, 0.5),
        Err(ReconError::InvalidOrder(_))
    ));
    assert!(matches!(
        weno_reconstruct(&y5, &[0.0, 1.0, 1.0, 3.0, 4.0], 3, 0.5),
        Err(ReconError::NonIncreasingPositions { index: 2 })
    ));
}

#[test]
fn test_nonuniform_positions() {
    // Quadratic data: candidates are exact on any grid
    let x = [0.0, 0.9, 2.0, 3.2, 4.0];
    let f = |x: f64| 0.5 - x + 0.75 * x * x;
    let y: Vec<f64> = x.iter().map(|&xi| f(xi)).collect();

    // Center cell spans the midpoints [1.45, 2.6]
    for (xi, point) in [(-1.0, 1.45), (0.5, 2.3125), (1.0, 2.6)] {
        let v = weno_reconstruct(&y, &x, 3, xi).unwrap();
        assert!((v - f(point)).abs() < 1e-9, "xi={xi}: {v} vs {}", f(point));
    }

    // The explicit-geometry path agrees with the free function
    let recon = reconstructor(3, SampleKind::PointValues);
    let samples = SampleSeries::new(&x, &y).unwrap();
    let via_series = recon.reconstruct_at(&samples, 1.0).unwrap();
    assert!((via_series - f(2.6)).abs() < 1e-9);
}

#[test]
fn test_scaled_uniform_grid_matches_unit_grid() {
    let x: Vec<f64> = (0..7).map(|i| 10.0 + 0.05 * i as f64).collect();
    let y = [0.2, 0.4, 0.1, 0.9, 1.3, 0.7, 0.6];
    let recon = reconstructor(4, SampleKind::PointValues);
    let unit = recon.reconstruct(&y, 0.3).unwrap();
    let scaled = weno_reconstruct(&y, &x, 4, 0.3).unwrap();
    assert!((unit - scaled).abs() < 1e-12);
}

#[test]
fn test_weno5_convergence_on_smooth_data() {
    let recon = reconstructor(3, SampleKind::PointValues);

    let max_error = |n: usize| -> f64 {
        let h = 1.0 / n as f64;
        let values: Vec<f64> = (0..=n).map(|i| (i as f64 * h).exp()).collect();
        recon
            .reconstruct_interfaces(&values)
            .unwrap()
            .iter()
            .map(|s| (s.left - ((s.index as f64 + 0.5) * h).exp()).abs())
            .fold(0.0, f64::max)
    };

    let resolutions = [20, 40, 80];
    let errors: Vec<f64> = resolutions.iter().map(|&n| max_error(n)).collect();

    println!("WENO5 convergence:");
    for i in 1..errors.len() {
        let order = (errors[i - 1] / errors[i]).log2();
        println!(
            "  n={:3}: error={:.4e}, order={:.2}",
            resolutions[i], errors[i], order
        );
        assert!(order > 4.0, "observed order {order:.2} at n={}", resolutions[i]);
    }
}

#[test]
fn test_order_tokens() {
    assert_eq!("weno5".parse::<WenoOrder>().unwrap(), WenoOrder::WENO5);
    assert_eq!(WenoOrder::from_order(7).unwrap(), WenoOrder::WENO7);
    assert!(matches!(
        WenoOrder::from_order(4),
        Err(ReconError::InvalidOrder(_))
    ));
    assert!(matches!(
        WenoOrder::from_half_width(7),
        Err(ReconError::InvalidOrder(_))
    ));
}
