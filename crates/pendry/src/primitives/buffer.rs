//! Memory management and buffer recycling for R-factor operations.
//!
//! ## Purpose
//!
//! This module provides reusable workspaces that minimize dynamic memory
//! allocations in the two repeated inner loops: per-beam spline evaluation
//! during preparation, and window gathering during V0r refinement.
//!
//! ## Design notes
//!
//! * **Centralized Ownership**: Each buffer struct holds all scratch space
//!   for its loop; callers pass it in rather than allocating per iteration.
//! * **Lazy Expansion**: Buffers grow on demand but never shrink,
//!   stabilizing at the maximum required size for the dataset.
//! * **Per-worker**: Parallel passes carry one buffer per worker thread;
//!   nothing here is shared.
//!
//! ## Invariants
//!
//! * Buffers are only logically cleared between iterations, not deallocated.
//! * Capacity is monotonically increasing.
//!
//! ## Non-goals
//!
//! * Thread-local automatic caching (buffers are explicitly passed).
//! * Dynamic shrinking or aggressive memory reclamation.

// Feature-gated dependencies
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::ops::{Deref, DerefMut};

// ============================================================================
// Slot - Unified Vector Abstraction
// ============================================================================

/// A reusable vector slot with automatic capacity management.
#[derive(Debug, Clone)]
pub struct Slot<T>(Vec<T>);

impl<T> Slot<T> {
    /// Create a new slot with the given initial capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Clear the slot (sets length to 0, preserves capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Get a mutable reference to the underlying vector.
    #[inline]
    pub fn as_vec_mut(&mut self) -> &mut Vec<T> {
        &mut self.0
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for Slot<T> {
    type Target = Vec<T>;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Slot<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> From<Vec<T>> for Slot<T> {
    fn from(v: Vec<T>) -> Self {
        Self(v)
    }
}

// ============================================================================
// PrepareBuffer - Scratch for the Interpolation Pass
// ============================================================================

/// Per-worker scratch for the beam interpolation pass.
///
/// Holds the output-grid energies the current beam's spline is evaluated
/// on. Parallel passes create one buffer per worker thread.
#[derive(Debug, Clone)]
pub struct PrepareBuffer<T> {
    /// Evaluation targets on the output grid.
    pub targets: Slot<T>,
}

impl<T> Default for PrepareBuffer<T> {
    fn default() -> Self {
        Self {
            targets: Slot::default(),
        }
    }
}

impl<T: Clone> PrepareBuffer<T> {
    /// Create a buffer pre-allocated for `n` grid points.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            targets: Slot::new(n),
        }
    }
}

// ============================================================================
// FitBuffer - Scratch for Parabola Window Fits
// ============================================================================

/// Gathered window samples for one parabola refinement fit.
#[derive(Debug, Clone)]
pub struct FitBuffer<T> {
    /// Shift values of the gathered points.
    pub xs: Slot<T>,

    /// Aggregate R values of the gathered points.
    pub ys: Slot<T>,

    /// Fit weights of the gathered points.
    pub ws: Slot<T>,
}

impl<T> Default for FitBuffer<T> {
    fn default() -> Self {
        Self {
            xs: Slot::default(),
            ys: Slot::default(),
            ws: Slot::default(),
        }
    }
}

impl<T> FitBuffer<T> {
    /// Clear all slots (preserves capacity).
    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.ws.clear();
    }

    /// Number of gathered points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Check if no points were gathered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}
