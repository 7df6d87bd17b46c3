//! Banded linear system factorization and solve.
//!
//! ## Purpose
//!
//! This module provides the banded solver behind the spline collocation
//! fit. The collocation matrix of a natural B-spline touches at most
//! `degree` diagonals on each side of the main diagonal, so it is assembled
//! directly in band storage and factorized without ever forming the dense
//! matrix.
//!
//! ## Design notes
//!
//! * **Band storage**: LAPACK-style layout with `2*kl + ku + 1` storage
//!   rows; element `(i, j)` lives at storage row `kl + ku + i - j`. The
//!   top `kl` rows hold fill-in produced by pivoting.
//! * **Partial pivoting**: Row interchanges are confined to the band, so
//!   the factorization stays `O(n * kl * (kl + ku))`.
//! * **Consuming factorization**: `factor` consumes the assembly and
//!   returns a [`FactoredBand`], so a half-factorized matrix cannot be
//!   reused by mistake.
//!
//! ## Invariants
//!
//! * `set` only accepts positions with `i - j` in `[-ku, kl]`.
//! * A zero or non-finite pivot aborts with the singular-spline error and
//!   names the failing column.
//!
//! ## Non-goals
//!
//! * This module does not exploit symmetry; the natural-boundary rows make
//!   the collocation system asymmetric.
//! * This module does not estimate condition numbers.

// Feature-gated imports
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
use crate::primitives::errors::PendryError;

// ============================================================================
// Band Assembly
// ============================================================================

/// Square banded matrix in band storage, ready for assembly.
#[derive(Debug, Clone)]
pub struct BandMatrix<T> {
    /// Matrix dimension.
    n: usize,

    /// Sub-diagonal count.
    kl: usize,

    /// Super-diagonal count.
    ku: usize,

    /// Band storage, `(2*kl + ku + 1) x n`, row-major by storage row.
    data: Vec<T>,
}

impl<T: Float> BandMatrix<T> {
    /// Allocate a zeroed `n x n` band with `kl` sub- and `ku` super-diagonals.
    pub fn new(n: usize, kl: usize, ku: usize) -> Self {
        let rows = 2 * kl + ku + 1;
        Self {
            n,
            kl,
            ku,
            data: vec![T::zero(); rows * n],
        }
    }

    #[inline]
    fn idx(&self, storage_row: usize, col: usize) -> usize {
        storage_row * self.n + col
    }

    /// Set element `(i, j)` of the logical matrix.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.n && j < self.n, "BandMatrix::set: out of range");
        debug_assert!(
            i + self.ku >= j && j + self.kl >= i,
            "BandMatrix::set: position outside the band"
        );
        let row = self.kl + self.ku + i - j;
        let at = self.idx(row, j);
        self.data[at] = value;
    }

    /// Factorize in place with partial pivoting.
    ///
    /// Consumes the assembly; a zero pivot fails with
    /// [`PendryError::SingularSpline`] naming the breakdown column.
    pub fn factor(mut self) -> Result<FactoredBand<T>, PendryError> {
        let n = self.n;
        let kl = self.kl;
        let kv = self.kl + self.ku;
        let mut pivots = vec![0usize; n];
        let mut ju = 0usize;

        for j in 0..n {
            let km = kl.min(n - 1 - j);

            // Pivot search over the diagonal and the km subdiagonal entries.
            let mut jp = 0usize;
            let mut best = self.data[self.idx(kv, j)].abs();
            for t in 1..=km {
                let v = self.data[self.idx(kv + t, j)].abs();
                if v > best {
                    best = v;
                    jp = t;
                }
            }
            pivots[j] = j + jp;

            let pivot = self.data[self.idx(kv + jp, j)];
            if pivot == T::zero() || !pivot.is_finite() {
                return Err(PendryError::SingularSpline { column: j });
            }

            ju = ju.max((j + self.ku + jp).min(n - 1));

            if jp != 0 {
                for c in j..=ju {
                    let r1 = self.idx(kv + j - c, c);
                    let r2 = self.idx(kv + j - c + jp, c);
                    self.data.swap(r1, r2);
                }
            }

            if km > 0 {
                let diag = self.data[self.idx(kv, j)];
                for t in 1..=km {
                    let at = self.idx(kv + t, j);
                    self.data[at] = self.data[at] / diag;
                }
                for c in (j + 1)..=ju {
                    let head = self.data[self.idx(kv + j - c, c)];
                    if head != T::zero() {
                        for t in 1..=km {
                            let mult = self.data[self.idx(kv + t, j)];
                            let at = self.idx(kv + j + t - c, c);
                            self.data[at] = self.data[at] - mult * head;
                        }
                    }
                }
            }
        }

        Ok(FactoredBand {
            n,
            kl,
            ku: self.ku,
            data: self.data,
            pivots,
        })
    }
}

// ============================================================================
// Factored Form
// ============================================================================

/// LU factorization of a banded matrix, ready for repeated solves.
#[derive(Debug, Clone)]
pub struct FactoredBand<T> {
    n: usize,
    kl: usize,
    ku: usize,
    data: Vec<T>,
    pivots: Vec<usize>,
}

impl<T: Float> FactoredBand<T> {
    #[inline]
    fn idx(&self, storage_row: usize, col: usize) -> usize {
        storage_row * self.n + col
    }

    /// Solve `A x = rhs` in place.
    pub fn solve_into(&self, rhs: &mut [T]) {
        debug_assert_eq!(rhs.len(), self.n, "FactoredBand::solve_into: rhs length");
        let n = self.n;
        let kv = self.kl + self.ku;

        // Forward substitution with the stored interchanges; L has a unit
        // diagonal and its multipliers sit below the main diagonal row.
        for j in 0..n {
            let p = self.pivots[j];
            if p != j {
                rhs.swap(j, p);
            }
            let bj = rhs[j];
            if bj != T::zero() {
                let km = self.kl.min(n - 1 - j);
                for t in 1..=km {
                    rhs[j + t] = rhs[j + t] - self.data[self.idx(kv + t, j)] * bj;
                }
            }
        }

        // Back substitution; U carries up to kl + ku superdiagonals after
        // fill-in.
        for j in (0..n).rev() {
            rhs[j] = rhs[j] / self.data[self.idx(kv, j)];
            let bj = rhs[j];
            if bj != T::zero() {
                let i_min = j.saturating_sub(kv);
                for i in i_min..j {
                    rhs[i] = rhs[i] - self.data[self.idx(kv + i - j, j)] * bj;
                }
            }
        }
    }
}
