//! Uniform energy grids and grid-correspondence utilities.
//!
//! ## Purpose
//!
//! This module defines the strictly uniform output energy grid on which all
//! Y-functions and R-factor integrals are evaluated, together with the
//! index arithmetic that relates arbitrary ascending input energies to
//! positions on that grid.
//!
//! ## Design notes
//!
//! * **Uniform by construction**: `EnergyGrid` stores `(start, step, len)`;
//!   individual energies are derived, never stored, so the grid cannot
//!   drift out of uniformity.
//! * **Tolerant comparisons**: Correspondence lookups use a small
//!   step-relative tolerance so that input energies that coincide with a
//!   grid point up to rounding land on that point.
//! * **Generics**: All computations are generic over `Float` types.
//!
//! ## Invariants
//!
//! * `step > 0` and finite; `len >= 2`.
//! * `index_at_or_above` and `index_at_or_below` return in-range indices or
//!   `None`; they never clamp silently.
//!
//! ## Non-goals
//!
//! * This module does not validate caller-supplied energy vectors; that is
//!   the validator's job.
//! * This module does not interpolate; it only locates indices.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::support::Support;

// Step-relative tolerance for deciding whether an energy sits on a grid point.
const GRID_EPS: f64 = 1e-6;

// ============================================================================
// Energy Grid
// ============================================================================

/// Strictly uniform energy grid `E_i = start + i * step`, `i < len`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyGrid<T> {
    /// First grid energy.
    pub start: T,

    /// Grid step (positive).
    pub step: T,

    /// Number of grid points.
    pub len: usize,
}

impl<T: Float> EnergyGrid<T> {
    /// Construct a grid from its first energy, step, and point count.
    pub fn new(start: T, step: T, len: usize) -> Self {
        Self { start, step, len }
    }

    /// Energy of grid point `i`.
    #[inline]
    pub fn energy(&self, i: usize) -> T {
        self.start + T::from(i).unwrap() * self.step
    }

    /// Energy of the last grid point.
    #[inline]
    pub fn last_energy(&self) -> T {
        self.energy(self.len.saturating_sub(1))
    }

    /// Step-relative comparison tolerance.
    #[inline]
    fn tol(&self) -> T {
        self.step * T::from(GRID_EPS).unwrap()
    }

    /// Smallest grid index whose energy is at or above `e`.
    ///
    /// Returns `None` when `e` lies above the last grid point.
    pub fn index_at_or_above(&self, e: T) -> Option<usize> {
        let tol = self.tol();
        if e <= self.start + tol {
            return Some(0);
        }
        let raw = ((e - self.start) / self.step).ceil();
        let mut i = raw.to_usize().unwrap_or(self.len);
        // Correct for rounding in the division.
        while i > 0 && self.energy(i - 1) >= e - tol {
            i -= 1;
        }
        while i < self.len && self.energy(i) < e - tol {
            i += 1;
        }
        if i < self.len {
            Some(i)
        } else {
            None
        }
    }

    /// Largest grid index whose energy is at or below `e`.
    ///
    /// Returns `None` when `e` lies below the first grid point.
    pub fn index_at_or_below(&self, e: T) -> Option<usize> {
        let tol = self.tol();
        if e < self.start - tol {
            return None;
        }
        let raw = ((e - self.start) / self.step).floor();
        let mut i = raw.to_usize().unwrap_or(0).min(self.len - 1);
        while i + 1 < self.len && self.energy(i + 1) <= e + tol {
            i += 1;
        }
        while i > 0 && self.energy(i) > e + tol {
            i -= 1;
        }
        if self.energy(i) <= e + tol {
            Some(i)
        } else {
            None
        }
    }

    /// Grid indices contained in the inclusive energy window `[e_lo, e_hi]`.
    pub fn contained_support(&self, e_lo: T, e_hi: T) -> Support {
        match (self.index_at_or_above(e_lo), self.index_at_or_below(e_hi)) {
            (Some(lo), Some(hi)) if hi >= lo => Support::new(lo, hi - lo + 1),
            _ => Support::new(0, 0),
        }
    }

    /// Collect the energies of a support into `out`, reusing its capacity.
    pub fn energies_into(&self, support: Support, out: &mut Vec<T>) {
        out.clear();
        out.reserve(support.len);
        for i in support.first..support.end() {
            out.push(self.energy(i));
        }
    }

    /// Check that an ascending energy slice coincides with this grid
    /// point-for-point within the grid tolerance.
    pub fn matches(&self, energies: &[T]) -> bool {
        if energies.len() != self.len {
            return false;
        }
        let tol = self.tol();
        energies
            .iter()
            .enumerate()
            .all(|(i, &e)| (e - self.energy(i)).abs() <= tol)
    }
}

// ============================================================================
// Input-Grid Correspondence
// ============================================================================

/// First index of an ascending slice whose value is at or above `e`.
#[inline]
pub fn first_at_or_above<T: Float>(xs: &[T], e: T, tol: T) -> Option<usize> {
    xs.iter().position(|&x| x >= e - tol)
}

/// Last index of an ascending slice whose value is at or below `e`.
#[inline]
pub fn last_at_or_below<T: Float>(xs: &[T], e: T, tol: T) -> Option<usize> {
    xs.iter().rposition(|&x| x <= e + tol)
}

/// Window `[i_lo, i_hi]` of an ascending input energy slice covered by the
/// output grid, used by the range-limiting stage.
pub fn covered_window<T: Float>(energies: &[T], grid: &EnergyGrid<T>) -> Option<(usize, usize)> {
    let tol = grid.step * T::from(GRID_EPS).unwrap();
    let lo = first_at_or_above(energies, grid.start, tol)?;
    let hi = last_at_or_below(energies, grid.last_energy(), tol)?;
    if hi >= lo {
        Some((lo, hi))
    } else {
        None
    }
}
