//! Output types and result structures for R-factor operations.
//!
//! ## Purpose
//!
//! This module defines the `RfactorReport` struct which encapsulates all
//! outputs of an R-factor calculation: the aggregate R, the best shift in
//! grid steps and energy units, the per-beam decomposition, per-group
//! aggregates, and any advisories recorded along the way.
//!
//! ## Design notes
//!
//! * **Memory Efficiency**: Optional outputs use `Option`.
//! * **Generics**: Results are generic over `Float` types.
//! * **Ergonomics**: Implements `Display` for human-readable output.
//!
//! ## Key concepts
//!
//! * **Best shift**: Both the best evaluated grid shift and, when the
//!   parabola refinement converged, the real-valued interpolated shift.
//! * **Advisories**: Informational conditions (dropped beams, fallbacks)
//!   that did not abort the calculation.
//!
//! ## Invariants
//!
//! * `r_beams` and `overlap_counts` have one entry per output beam.
//! * `r_factor` is the aggregate at the best evaluated shift; it is NaN
//!   only when an advisory explains why.
//!
//! ## Non-goals
//!
//! * This module does not perform calculations; it only stores results.
//! * This module does not provide serialization logic.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::{Debug, Display, Formatter, Result};
use num_traits::Float;

// Internal dependencies
use crate::evaluation::grouping::GroupR;
use crate::primitives::errors::Advisory;

// ============================================================================
// Result Structure
// ============================================================================

/// Comprehensive output of an R-factor calculation.
#[derive(Debug, Clone)]
pub struct RfactorReport<T> {
    /// Aggregate Pendry R at the best evaluated shift.
    pub r_factor: T,

    /// Best evaluated shift in output-grid steps.
    pub best_shift: isize,

    /// Interpolated shift when the parabola refinement converged,
    /// otherwise the best grid shift.
    pub best_shift_real: T,

    /// Best shift expressed in energy units (`best_shift_real * step`).
    pub shift_energy: T,

    /// Parabola-interpolated minimum R, when refinement converged.
    pub r_parabola: Option<T>,

    /// Per-beam R values (NaN for beams without overlap).
    pub r_beams: Vec<T>,

    /// Per-beam overlap counts on the output grid.
    pub overlap_counts: Vec<usize>,

    /// Aggregates per beam-type group, when labels were supplied.
    pub group_r: Option<Vec<GroupR<T>>>,

    /// Number of beam-set evaluations performed.
    pub n_evaluations: usize,

    /// Conditions recorded during preparation and search.
    pub advisories: Vec<Advisory>,
}

impl<T: Float> RfactorReport<T> {
    /// Number of beams carried by the report.
    pub fn n_beams(&self) -> usize {
        self.r_beams.len()
    }

    /// Whether any advisory with the given code was recorded.
    pub fn has_advisory(&self, code: u16) -> bool {
        self.advisories.iter().any(|a| a.code() == code)
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl<T: Float + Display + Debug> Display for RfactorReport<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Pendry R:    {:.6}", self.r_factor.to_f64().unwrap_or(f64::NAN))?;
        writeln!(
            f,
            "  Best shift:  {} steps ({:.4} energy units)",
            self.best_shift,
            self.shift_energy.to_f64().unwrap_or(f64::NAN)
        )?;
        if let Some(rp) = self.r_parabola {
            writeln!(
                f,
                "  Parabola:    s* = {:.4}, R* = {:.6}",
                self.best_shift_real.to_f64().unwrap_or(f64::NAN),
                rp.to_f64().unwrap_or(f64::NAN)
            )?;
        }
        writeln!(f, "  Evaluations: {}", self.n_evaluations)?;

        if !self.advisories.is_empty() {
            writeln!(f, "  Advisories:")?;
            for advisory in &self.advisories {
                writeln!(f, "    [{}] {}", advisory.code(), advisory)?;
            }
        }
        writeln!(f)?;

        if let Some(groups) = &self.group_r {
            writeln!(f, "Group Aggregates:")?;
            writeln!(f, "{:>8} {:>12} {:>8}", "Label", "R", "N")?;
            writeln!(f, "{:-<30}", "")?;
            for group in groups {
                writeln!(
                    f,
                    "{:>8} {:>12.6} {:>8}",
                    group.label,
                    group.r.to_f64().unwrap_or(f64::NAN),
                    group.overlap
                )?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Per-Beam R:")?;
        writeln!(f, "{:>8} {:>12} {:>8}", "Beam", "R", "N")?;
        writeln!(f, "{:-<30}", "")?;

        // Data rows (show first 10 and last 10 if more than 20 beams).
        let n = self.r_beams.len();
        let show_all = n <= 20;
        let rows_to_show: Vec<usize> = if show_all {
            (0..n).collect()
        } else {
            (0..10).chain(n - 10..n).collect()
        };

        let mut prev_idx = 0;
        for (i, &idx) in rows_to_show.iter().enumerate() {
            if i > 0 && idx != prev_idx + 1 {
                writeln!(f, "{:>8}", "...")?;
            }
            prev_idx = idx;

            writeln!(
                f,
                "{:>8} {:>12.6} {:>8}",
                idx,
                self.r_beams[idx].to_f64().unwrap_or(f64::NAN),
                self.overlap_counts[idx]
            )?;
        }

        Ok(())
    }
}
