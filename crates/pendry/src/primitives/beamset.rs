//! Packed beam-set views and prepared beam storage.
//!
//! ## Purpose
//!
//! This module groups the packed per-beam intensity storage with its index
//! vectors: a borrowed [`BeamSet`] view over caller-owned input arrays, and
//! an owned [`PreparedBeams`] value produced by the preparation pipeline.
//!
//! ## Design notes
//!
//! * **Packed storage**: Beams live in one column-major matrix `I[k, b]`
//!   (`n_energies x n_beams`) shared with per-beam [`Support`] ranges;
//!   samples outside a support are undefined and never read.
//! * **Borrow in, own out**: The pipeline borrows the caller's arrays
//!   immutably and produces new owned matrices on the output grid.
//! * **Fallible construction**: Dimension and support-bound checks happen
//!   when the view is built, so downstream code can index unchecked.
//!
//! ## Invariants
//!
//! * `intensities.len() == energies.len() * n_beams`.
//! * For every beam, `support.end() <= energies.len()`.
//! * Prepared matrices are immutable once returned; downstream stages only
//!   read them.
//!
//! ## Non-goals
//!
//! * This module does not load, smooth, or interpolate data.
//! * This module does not check energy ordering; that is the validator's job.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::{Advisory, PendryError};
use crate::primitives::grid::EnergyGrid;
use crate::primitives::support::Support;

// ============================================================================
// Borrowed Input View
// ============================================================================

/// Immutable view over a caller-owned set of I(E) curves.
#[derive(Debug, Clone)]
pub struct BeamSet<'a, T> {
    /// Shared ascending input energies.
    energies: &'a [T],

    /// Column-major packed intensities, `energies.len() x n_beams`.
    intensities: &'a [T],

    /// Per-beam valid ranges on the input energy axis.
    supports: Vec<Support>,
}

impl<'a, T: Float> BeamSet<'a, T> {
    /// Build a view from packed arrays and `start`/`length` index vectors.
    ///
    /// `starts` are 0-based indices into `energies`; `lengths` count valid
    /// consecutive samples per beam.
    pub fn new(
        energies: &'a [T],
        intensities: &'a [T],
        starts: &[usize],
        lengths: &[usize],
    ) -> Result<Self, PendryError> {
        if energies.is_empty() || starts.is_empty() {
            return Err(PendryError::EmptyInput);
        }
        if starts.len() != lengths.len() {
            return Err(PendryError::MismatchedInputs {
                expected: starts.len(),
                got: lengths.len(),
            });
        }
        let n_e = energies.len();
        let n_beams = starts.len();
        if intensities.len() != n_e * n_beams {
            return Err(PendryError::MismatchedInputs {
                expected: n_e * n_beams,
                got: intensities.len(),
            });
        }
        let mut supports = Vec::with_capacity(n_beams);
        for (&first, &len) in starts.iter().zip(lengths.iter()) {
            if first + len > n_e {
                return Err(PendryError::BadGrid(format!(
                    "beam support [{first}, {}) exceeds {n_e} energies",
                    first + len
                )));
            }
            supports.push(Support::new(first, len));
        }
        Ok(Self {
            energies,
            intensities,
            supports,
        })
    }

    /// Build a view in which every beam spans the full energy range.
    pub fn full(energies: &'a [T], intensities: &'a [T], n_beams: usize) -> Result<Self, PendryError> {
        let n_e = energies.len();
        let starts = vec![0usize; n_beams];
        let lengths = vec![n_e; n_beams];
        Self::new(energies, intensities, &starts, &lengths)
    }

    /// Number of beams in the set.
    #[inline]
    pub fn n_beams(&self) -> usize {
        self.supports.len()
    }

    /// Number of input energies.
    #[inline]
    pub fn n_energies(&self) -> usize {
        self.energies.len()
    }

    /// Shared input energies.
    #[inline]
    pub fn energies(&self) -> &'a [T] {
        self.energies
    }

    /// Valid range of beam `b` on the input energy axis.
    #[inline]
    pub fn support(&self, b: usize) -> Support {
        self.supports[b]
    }

    /// Full intensity column of beam `b` (validity per its support).
    #[inline]
    pub fn column(&self, b: usize) -> &'a [T] {
        let n_e = self.energies.len();
        &self.intensities[b * n_e..(b + 1) * n_e]
    }
}

// ============================================================================
// Prepared Output
// ============================================================================

/// Owned result of the preparation pipeline on the uniform output grid.
///
/// Matrices are column-major with `grid.len` rows; per-beam validity is
/// tracked by `supports`. Beams that did not survive preparation carry an
/// empty support and are skipped by all downstream stages.
#[derive(Debug, Clone)]
pub struct PreparedBeams<T> {
    /// Uniform output grid.
    pub grid: EnergyGrid<T>,

    /// Per-beam valid ranges on the output grid.
    pub supports: Vec<Support>,

    /// Interpolated intensities, column-major `grid.len x n_beams`.
    pub intensity: Vec<T>,

    /// First derivatives of the interpolated intensities.
    pub derivative: Vec<T>,

    /// Pendry Y-function values.
    pub y: Vec<T>,

    /// Conditions recorded during preparation (dropped beams, etc.).
    pub advisories: Vec<Advisory>,
}

impl<T: Float> PreparedBeams<T> {
    /// Allocate zeroed storage for `n_beams` beams on `grid`.
    pub fn zeroed(grid: EnergyGrid<T>, n_beams: usize) -> Self {
        let cells = grid.len * n_beams;
        Self {
            grid,
            supports: vec![Support::new(0, 0); n_beams],
            intensity: vec![T::zero(); cells],
            derivative: vec![T::zero(); cells],
            y: vec![T::zero(); cells],
            advisories: Vec::new(),
        }
    }

    /// Number of beams.
    #[inline]
    pub fn n_beams(&self) -> usize {
        self.supports.len()
    }

    /// Full Y column of beam `b`.
    #[inline]
    pub fn y_column(&self, b: usize) -> &[T] {
        let n = self.grid.len;
        &self.y[b * n..(b + 1) * n]
    }

    /// Full intensity column of beam `b`.
    #[inline]
    pub fn intensity_column(&self, b: usize) -> &[T] {
        let n = self.grid.len;
        &self.intensity[b * n..(b + 1) * n]
    }

    /// Full derivative column of beam `b`.
    #[inline]
    pub fn derivative_column(&self, b: usize) -> &[T] {
        let n = self.grid.len;
        &self.derivative[b * n..(b + 1) * n]
    }
}
