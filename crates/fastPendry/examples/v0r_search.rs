//! fastPendry Parallel R-factor Examples
//!
//! This example demonstrates features specific to `fastPendry`:
//! - Parallel per-beam execution using `rayon`
//! - Sequential fallback
//! - `ndarray` integration
//! - V0r optimization over the shift grid
//! - Symmetry averaging of equivalent beams

use fastPendry::prelude::*;
use ndarray::Array1;
use std::time::Instant;

/// Synthetic I(E) curve: background plus a few Lorentzian-ish peaks.
fn synthetic_curve(e: f64, beam: usize) -> f64 {
    let mut intensity = 1.0 + 0.002 * e;
    for (center, width, height) in [
        (80.0 + 7.0 * beam as f64, 6.0, 2.0),
        (140.0 + 11.0 * beam as f64, 9.0, 1.4),
        (210.0 + 5.0 * beam as f64, 8.0, 1.8),
    ] {
        let d = (e - center) / width;
        intensity += height / (1.0 + d * d);
    }
    intensity
}

fn main() -> Result<(), PendryError> {
    println!("{}", "=".repeat(80));
    println!("fastPendry Parallel R-factor Examples");
    println!("{}", "=".repeat(80));
    println!();

    example_1_fixed_shift_parallel()?;
    example_2_sequential_fallback()?;
    example_3_v0r_search()?;
    example_4_symmetry_averaging()?;

    Ok(())
}

/// Example 1: Parallel Fixed-Shift Evaluation
/// Demonstrates the default parallel execution mode with ndarray inputs.
fn example_1_fixed_shift_parallel() -> Result<(), PendryError> {
    println!("Example 1: Parallel Fixed-Shift Evaluation");
    println!("{}", "-".repeat(80));

    let n_beams = 24;
    let energies = Array1::from_iter((0..501).map(|i| 50.0 + 0.5 * i as f64));
    let mut experiment_data = Vec::with_capacity(501 * n_beams);
    let mut theory_data = Vec::with_capacity(501 * n_beams);
    for b in 0..n_beams {
        experiment_data.extend(energies.iter().map(|&e| synthetic_curve(e, b)));
        theory_data.extend(energies.iter().map(|&e| 0.9 * synthetic_curve(e, b) + 0.05));
    }

    let experiment = beam_set_full(&energies, &experiment_data, n_beams)?;
    let theory = beam_set_full(&energies, &theory_data, n_beams)?;

    let start = Instant::now();
    let model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 501)
        .adapter(FixedShift)
        .parallel(true) // default
        .build()?;
    let report = model.fit(&experiment, &theory)?;
    let duration = start.elapsed();

    println!("Compared {} beams in {:?}", n_beams, duration);
    println!("Aggregate Pendry R: {:.6}", report.r_factor);

    println!();
    Ok(())
}

/// Example 2: Sequential Fallback
/// Demonstrates explicitly disabling parallelism.
fn example_2_sequential_fallback() -> Result<(), PendryError> {
    println!("Example 2: Sequential Fallback");
    println!("{}", "-".repeat(80));

    let energies: Vec<f64> = (0..501).map(|i| 50.0 + 0.5 * i as f64).collect();
    let curve: Vec<f64> = energies.iter().map(|&e| synthetic_curve(e, 0)).collect();

    let experiment = beam_set_full(&energies, &curve, 1)?;
    let theory = beam_set_full(&energies, &curve, 1)?;

    let model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 501)
        .adapter(FixedShift)
        .parallel(false) // disable parallel execution
        .build()?;
    let report = model.fit(&experiment, &theory)?;

    println!("Identical curves score R = {:.2e}", report.r_factor);

    println!();
    Ok(())
}

/// Example 3: V0r Optimization
/// Recovers an inner-potential shift hidden in the theoretical curves.
fn example_3_v0r_search() -> Result<(), PendryError> {
    println!("Example 3: V0r Optimization");
    println!("{}", "-".repeat(80));

    let energies: Vec<f64> = (0..501).map(|i| 50.0 + 0.5 * i as f64).collect();
    let n_beams = 8;
    let mut experiment_data = Vec::new();
    let mut theory_data = Vec::new();
    for b in 0..n_beams {
        experiment_data.extend(energies.iter().map(|&e| synthetic_curve(e, b)));
        // The theory carries a 3.5 energy-unit inner-potential offset.
        theory_data.extend(energies.iter().map(|&e| synthetic_curve(e + 3.5, b)));
    }

    let experiment = beam_set_full(&energies, &experiment_data, n_beams)?;
    let theory = beam_set_full(&energies, &theory_data, n_beams)?;

    let start = Instant::now();
    let model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 501)
        .shift_range(-20, 20)
        .adapter(GridSearch)
        .build()?;
    let report = model.fit(&experiment, &theory)?;
    let duration = start.elapsed();

    println!("Search finished in {:?}", duration);
    println!(
        "Best shift: {} steps ({:.3} energy units) after {} evaluations",
        report.best_shift, report.shift_energy, report.n_evaluations
    );
    println!("{report}");

    println!();
    Ok(())
}

/// Example 4: Symmetry Averaging
/// Folds two equivalent measured beams into one before comparison.
fn example_4_symmetry_averaging() -> Result<(), PendryError> {
    println!("Example 4: Symmetry Averaging");
    println!("{}", "-".repeat(80));

    let energies: Vec<f64> = (0..501).map(|i| 50.0 + 0.5 * i as f64).collect();
    let mut measured = Vec::new();
    for replica in 0..2 {
        measured.extend(
            energies
                .iter()
                .map(|&e| synthetic_curve(e, 0) + 0.05 * (2.1 * e + replica as f64).sin()),
        );
    }
    let truth: Vec<f64> = energies.iter().map(|&e| synthetic_curve(e, 0)).collect();

    let experiment = beam_set_full(&energies, &measured, 2)?;
    let theory = beam_set_full(&energies, &truth, 1)?;

    let model = Pendry::new()
        .v0i(5.0)
        .output_grid(50.0, 0.5, 501)
        .average_experiment(vec![1, 1], 1)
        .adapter(FixedShift)
        .build()?;
    let report = model.fit(&experiment, &theory)?;

    println!("R after averaging two equivalents: {:.6}", report.r_factor);

    println!();
    Ok(())
}
