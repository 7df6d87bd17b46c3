//! Input validation for R-factor configuration and data.
//!
//! ## Purpose
//!
//! This module provides validation functions for pipeline configuration
//! and curve data. It checks requirements such as grid ordering, scheme
//! shape, shift ranges, and parameter bounds.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Grid checks**: Strict ordering, finiteness, uniform output step,
//!   and coverage (no extrapolation).
//! * **Scheme checks**: Group indices in range, no empty groups, matching
//!   beam counts when averaging is skipped.
//! * **Optimizer checks**: Range size, guess placement, tolerance bounds.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective mathematical constraints.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform or clip input data.
//! * This module does not provide automatic correction of invalid inputs.
//! * This module does not perform the preparation or optimization itself.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::evaluation::v0r::MIN_STEPS;
use crate::math::spline::DEGREE;
use crate::primitives::errors::PendryError;
use crate::primitives::grid::EnergyGrid;

// ============================================================================
// Averaging Scheme
// ============================================================================

/// Assignment of input beams to averaged output beams.
///
/// `groups[b] = 0` discards beam `b`; equal nonzero values average into
/// the 1-based output beam they name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AveragingScheme {
    /// Per-input-beam group assignment (0 = discard, 1-based otherwise).
    pub groups: Vec<usize>,

    /// Number of output beams.
    pub n_out: usize,
}

impl AveragingScheme {
    /// Scheme mapping every beam onto itself.
    pub fn identity(n_beams: usize) -> Self {
        Self {
            groups: (1..=n_beams).collect(),
            n_out: n_beams,
        }
    }

    /// Input beams assigned to the 1-based output group `g`.
    pub fn members(&self, g: usize) -> impl Iterator<Item = usize> + '_ {
        self.groups
            .iter()
            .enumerate()
            .filter(move |(_, &assigned)| assigned == g)
            .map(|(b, _)| b)
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for R-factor configuration and input data.
///
/// Provides static methods that return `Result<(), PendryError>` and fail
/// fast upon identifying the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Core Input Validation
    // ========================================================================

    /// Validate an ascending input energy vector.
    pub fn validate_energies<T: Float>(energies: &[T]) -> Result<(), PendryError> {
        if energies.is_empty() {
            return Err(PendryError::EmptyInput);
        }
        for (i, w) in energies.windows(2).enumerate() {
            if !w[0].is_finite() || !w[1].is_finite() {
                return Err(PendryError::BadGrid(format!(
                    "non-finite input energy near index {i}"
                )));
            }
            if w[1] <= w[0] {
                return Err(PendryError::BadGrid(format!(
                    "input energies must be strictly increasing at index {i}"
                )));
            }
        }
        Ok(())
    }

    /// Validate the uniform output grid.
    pub fn validate_output_grid<T: Float>(grid: &EnergyGrid<T>) -> Result<(), PendryError> {
        if grid.len < 2 {
            return Err(PendryError::BadGrid(format!(
                "output grid needs at least 2 points, got {}",
                grid.len
            )));
        }
        if !grid.start.is_finite() || !grid.step.is_finite() || grid.step <= T::zero() {
            return Err(PendryError::BadGrid(format!(
                "output grid step must be positive and finite, got {}",
                grid.step.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }

    /// Check that the output grid lies inside the input energy range, so
    /// interpolation never extrapolates.
    pub fn validate_coverage<T: Float>(
        energies: &[T],
        grid: &EnergyGrid<T>,
    ) -> Result<(), PendryError> {
        let slack = grid.step * T::from(1e-6).unwrap();
        let first = energies[0];
        let last = energies[energies.len() - 1];
        if grid.start < first - slack || grid.last_energy() > last + slack {
            return Err(PendryError::BadGrid(format!(
                "output grid [{}, {}] not covered by input energies [{}, {}]",
                grid.start.to_f64().unwrap_or(f64::NAN),
                grid.last_energy().to_f64().unwrap_or(f64::NAN),
                first.to_f64().unwrap_or(f64::NAN),
                last.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the imaginary inner potential.
    pub fn validate_v0i<T: Float>(v0i: T) -> Result<(), PendryError> {
        if !v0i.is_finite() || v0i < T::zero() {
            return Err(PendryError::InvalidV0i(v0i.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    /// Validate the spline degree.
    pub fn validate_degree(degree: usize) -> Result<(), PendryError> {
        if degree != DEGREE {
            return Err(PendryError::InvalidDegree(degree));
        }
        Ok(())
    }

    /// Validate the optimizer tolerance pair.
    pub fn validate_tolerances<T: Float>(tol_good: T, tol_acceptable: T) -> Result<(), PendryError> {
        for &tol in &[tol_good, tol_acceptable] {
            if !tol.is_finite() || tol <= T::zero() || tol > T::one() {
                return Err(PendryError::InvalidTolerance(
                    tol.to_f64().unwrap_or(f64::NAN),
                ));
            }
        }
        if tol_acceptable > tol_good {
            return Err(PendryError::InvalidTolerance(
                tol_acceptable.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the parabola window half-width.
    pub fn validate_fit_range(fit_range: usize) -> Result<(), PendryError> {
        if fit_range == 0 {
            return Err(PendryError::InvalidFitRange(fit_range));
        }
        Ok(())
    }

    // ========================================================================
    // Scheme Validation
    // ========================================================================

    /// Validate an averaging scheme against the input beam count.
    pub fn validate_scheme(scheme: &AveragingScheme, n_beams: usize) -> Result<(), PendryError> {
        if scheme.groups.len() != n_beams {
            return Err(PendryError::MismatchedInputs {
                expected: n_beams,
                got: scheme.groups.len(),
            });
        }
        if scheme.n_out == 0 || scheme.n_out > n_beams {
            return Err(PendryError::SchemeInvalid {
                group: None,
                n_beams,
                n_out: scheme.n_out,
            });
        }
        for &g in &scheme.groups {
            if g > scheme.n_out {
                return Err(PendryError::SchemeInvalid {
                    group: Some(g),
                    n_beams,
                    n_out: scheme.n_out,
                });
            }
        }
        let mut seen = vec![false; scheme.n_out];
        for &g in &scheme.groups {
            if g > 0 {
                seen[g - 1] = true;
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(PendryError::SchemeInvalid {
                group: Some(missing + 1),
                n_beams,
                n_out: scheme.n_out,
            });
        }
        Ok(())
    }

    /// When averaging is skipped, the output beam count must equal the
    /// input beam count.
    pub fn validate_scheme_skipped(n_beams: usize, n_out: usize) -> Result<(), PendryError> {
        if n_beams != n_out {
            return Err(PendryError::SchemeMismatch { n_beams, n_out });
        }
        Ok(())
    }

    // ========================================================================
    // Optimizer Validation
    // ========================================================================

    /// Validate the shift range size.
    pub fn validate_shift_range(s_min: isize, s_max: isize) -> Result<(), PendryError> {
        let n_steps = if s_max >= s_min {
            (s_max - s_min + 1) as usize
        } else {
            0
        };
        if n_steps < MIN_STEPS {
            return Err(PendryError::RangeTooSmall {
                got: n_steps,
                min: MIN_STEPS,
            });
        }
        Ok(())
    }

    /// Validate guess placement: inside the range and pairwise distinct.
    pub fn validate_guesses(
        s_min: isize,
        s_max: isize,
        guesses: [isize; 3],
    ) -> Result<(), PendryError> {
        for (k, &g) in guesses.iter().enumerate() {
            if g < s_min || g > s_max || guesses[..k].contains(&g) {
                return Err(PendryError::GuessOutOfRange {
                    guess: g as i64,
                    lo: s_min as i64,
                    hi: s_max as i64,
                });
            }
        }
        Ok(())
    }

    // ========================================================================
    // Builder Validation
    // ========================================================================

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), PendryError> {
        if let Some(parameter) = duplicate_param {
            return Err(PendryError::DuplicateParameter { parameter });
        }
        Ok(())
    }
}
