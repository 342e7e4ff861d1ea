//! Limited and WENO reconstruction of a pulse next to a step.
//!
//! Advances the traffic-flow equation `q_t + (q (1 - q))_x = 0` with a Rusanov
//! flux on minmod interface states and Heun's method (SSP-RK2), then compares
//! the interface states every limiter and WENO5 produce on the final profile.
//!
//! Run with: `RUST_LOG=debug cargo run --example step_reconstruction`

use log::info;
use recon_rs::{
    InterfaceState, LimiterKind, PiecewiseLinear, Result, SampleKind, SampleSeries, WenoConfig,
    WenoOrder, WenoReconstructor, total_variation,
};

/// Cells in [0, 1]; two ghost cells on either side.
const N_CELLS: usize = 100;
const N_GHOST: usize = 2;
const CFL: f64 = 0.4;
const T_FINAL: f64 = 0.5;

fn flux(q: f64) -> f64 {
    q * (1.0 - q)
}

/// Rusanov flux from the states on either side of an interface.
fn rusanov(state: &InterfaceState) -> f64 {
    let alpha = (1.0 - 2.0 * state.left)
        .abs()
        .max((1.0 - 2.0 * state.right).abs());
    0.5 * (flux(state.left) + flux(state.right) - alpha * state.jump())
}

/// Semi-discrete update `-(F_{i+1/2} - F_{i-1/2}) / dx` on interior cells.
fn residual(x: &[f64], q: &[f64], dx: f64, kind: LimiterKind) -> Result<Vec<f64>> {
    let samples = SampleSeries::new(x, q)?;
    let recon = PiecewiseLinear::limited(&samples, kind)?;
    let fluxes: Vec<f64> = recon.interface_states().iter().map(rusanov).collect();

    let mut dq = vec![0.0; q.len()];
    for i in N_GHOST..q.len() - N_GHOST {
        dq[i] = -(fluxes[i] - fluxes[i - 1]) / dx;
    }
    Ok(dq)
}

/// Zero-gradient ghost cells.
fn fill_ghosts(q: &mut [f64]) {
    let n = q.len();
    let (first, last) = (q[N_GHOST], q[n - N_GHOST - 1]);
    q[..N_GHOST].fill(first);
    q[n - N_GHOST..].fill(last);
}

fn main() -> Result<()> {
    env_logger::init();

    let dx = 1.0 / N_CELLS as f64;
    let n = N_CELLS + 2 * N_GHOST;
    let x: Vec<f64> = (0..n)
        .map(|i| (i as f64 - N_GHOST as f64 + 0.5) * dx)
        .collect();
    let mut q: Vec<f64> = x
        .iter()
        .map(|&xi| {
            let pulse = 0.9 * (-100.0 * (xi - 0.5).powi(2)).exp();
            let step = if xi > 0.75 { 0.2 } else { 0.0 };
            pulse + step
        })
        .collect();

    let dt = CFL * dx;
    let n_steps = (T_FINAL / dt).ceil() as usize;
    let dt = T_FINAL / n_steps as f64;
    info!("advancing {} steps of dt = {:.4e}", n_steps, dt);

    println!("Traffic flow, minmod + Rusanov + SSP-RK2");
    println!("  t = 0.000: TV = {:.6}", total_variation(&q));
    for step in 1..=n_steps {
        let k1 = residual(&x, &q, dx, LimiterKind::Minmod)?;
        let mut stage: Vec<f64> = q.iter().zip(&k1).map(|(a, b)| a + dt * b).collect();
        fill_ghosts(&mut stage);

        let k2 = residual(&x, &stage, dx, LimiterKind::Minmod)?;
        for ((qi, si), ki) in q.iter_mut().zip(&stage).zip(&k2) {
            *qi = 0.5 * *qi + 0.5 * (si + dt * ki);
        }
        fill_ghosts(&mut q);

        if step % (n_steps / 5).max(1) == 0 {
            println!(
                "  t = {:.3}: TV = {:.6}",
                step as f64 * dt,
                total_variation(&q)
            );
        }
    }

    let samples = SampleSeries::new(&x, &q)?;
    println!();
    println!("Interface states on the final profile");
    for kind in LimiterKind::ALL {
        let recon = PiecewiseLinear::limited(&samples, kind)?;
        let max_jump = recon
            .interface_states()
            .iter()
            .map(|s| s.jump().abs())
            .fold(0.0, f64::max);
        println!(
            "  {:<9} TV(edges) = {:.6}, max jump = {:.4e}",
            kind.name(),
            recon.total_variation(),
            max_jump
        );
    }

    let weno = WenoReconstructor::new(
        WenoConfig::new(WenoOrder::WENO5).with_sample_kind(SampleKind::CellAverages),
    )?;
    let states = weno.reconstruct_interfaces(&q)?;
    let edges: Vec<f64> = states.iter().flat_map(|s| [s.left, s.right]).collect();
    let max_jump = states.iter().map(|s| s.jump().abs()).fold(0.0, f64::max);
    println!(
        "  {:<9} TV(edges) = {:.6}, max jump = {:.4e}",
        WenoOrder::WENO5.to_string(),
        total_variation(&edges),
        max_jump
    );

    Ok(())
}
