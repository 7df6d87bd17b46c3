#![cfg(feature = "dev")]
//! Tests for support ranges and grid correspondence.
//!
//! These tests verify the low-level index arithmetic everything else
//! builds on: clipping, intersection, shifted overlap, and the mapping
//! between arbitrary ascending energies and the uniform output grid.
//!
//! ## Test Organization
//!
//! 1. **Support Ranges** - Clip, intersect, overlap at a shift
//! 2. **Uniform Grid** - Index lookups and containment
//! 3. **Input Correspondence** - Range-limit window computation

use approx::assert_relative_eq;

use pendry::internals::primitives::grid::{covered_window, EnergyGrid};
use pendry::internals::primitives::support::Support;

// ============================================================================
// Support Range Tests
// ============================================================================

/// Test clipping to an inclusive window.
#[test]
fn test_support_clip() {
    let support = Support::new(10, 30);

    assert_eq!(support.clip(0, 100), Support::new(10, 30));
    assert_eq!(support.clip(15, 100), Support::new(15, 25));
    assert_eq!(support.clip(0, 19), Support::new(10, 10));
    assert_eq!(support.clip(50, 100).len, 0);
}

/// Test intersection of two supports.
#[test]
fn test_support_intersect() {
    let a = Support::new(5, 20);
    let b = Support::new(15, 30);

    assert_eq!(a.intersect(&b), Support::new(15, 10));
    assert_eq!(b.intersect(&a), Support::new(15, 10));
    assert!(a.intersect(&Support::new(40, 5)).is_empty());
}

/// Test the shifted overlap used by the R-factor.
#[test]
fn test_support_overlap_shifted() {
    let a = Support::new(0, 50);
    let b = Support::new(10, 50);

    // No shift: shared indices are [10, 49].
    assert_eq!(a.overlap_shifted(&b, 0), Some((10, 49)));
    // Translating b down by 10 aligns both at [0, 49].
    assert_eq!(a.overlap_shifted(&b, -10), Some((0, 49)));
    // Far shifts kill the overlap.
    assert_eq!(a.overlap_shifted(&b, 60), None);
}

/// Test that a single shared point does not count as overlap.
#[test]
fn test_support_overlap_needs_two_points() {
    let a = Support::new(0, 10);
    let b = Support::new(9, 10);

    assert_eq!(a.overlap_shifted(&b, 0), None);
    // One step closer gives the minimal two-point overlap.
    assert_eq!(a.overlap_shifted(&b, -1), Some((8, 9)));
}

/// Test that empty supports never overlap.
#[test]
fn test_support_empty_never_overlaps() {
    let empty = Support::new(3, 0);
    let full = Support::new(0, 20);

    assert_eq!(empty.overlap_shifted(&full, 0), None);
    assert_eq!(full.overlap_shifted(&empty, 0), None);
    assert!(empty.last().is_none());
}

// ============================================================================
// Uniform Grid Tests
// ============================================================================

/// Test grid energies and endpoint lookup.
#[test]
fn test_grid_energies() {
    let grid = EnergyGrid::new(50.0f64, 0.5, 101);

    assert_relative_eq!(grid.energy(0), 50.0, epsilon = 1e-12);
    assert_relative_eq!(grid.energy(100), 100.0, epsilon = 1e-12);
    assert_relative_eq!(grid.last_energy(), 100.0, epsilon = 1e-12);
}

/// Test index lookups, including values between grid points.
#[test]
fn test_grid_index_lookups() {
    let grid = EnergyGrid::new(50.0f64, 0.5, 101);

    assert_eq!(grid.index_at_or_above(50.0), Some(0));
    assert_eq!(grid.index_at_or_above(50.2), Some(1));
    assert_eq!(grid.index_at_or_above(75.0), Some(50));
    assert_eq!(grid.index_at_or_above(100.2), None);

    assert_eq!(grid.index_at_or_below(100.0), Some(100));
    assert_eq!(grid.index_at_or_below(75.3), Some(50));
    assert_eq!(grid.index_at_or_below(49.7), None);
}

/// Test that on-point lookups tolerate rounding.
#[test]
fn test_grid_lookup_tolerance() {
    let grid = EnergyGrid::new(50.0f64, 0.5, 101);
    let nudged = 72.5 + 1e-9;

    assert_eq!(grid.index_at_or_above(nudged), Some(45));
    assert_eq!(grid.index_at_or_below(72.5 - 1e-9), Some(45));
}

/// Test the contained-support computation.
#[test]
fn test_grid_contained_support() {
    let grid = EnergyGrid::new(50.0f64, 0.5, 101);

    let full = grid.contained_support(50.0, 100.0);
    assert_eq!(full, Support::new(0, 101));

    let inner = grid.contained_support(60.2, 79.9);
    assert_eq!(inner, Support::new(21, 39));

    assert!(grid.contained_support(200.0, 300.0).is_empty());
}

/// Test grid matching against an explicit energy vector.
#[test]
fn test_grid_matches() {
    let grid = EnergyGrid::new(50.0f64, 0.5, 5);
    let exact = vec![50.0, 50.5, 51.0, 51.5, 52.0];
    let off = vec![50.0, 50.5, 51.1, 51.5, 52.0];

    assert!(grid.matches(&exact));
    assert!(!grid.matches(&off));
    assert!(!grid.matches(&exact[..4]));
}

// ============================================================================
// Input Correspondence Tests
// ============================================================================

/// Test the range-limit window on a coarser input grid.
#[test]
fn test_covered_window() {
    let energies: Vec<f64> = (0..51).map(|i| 50.0 + 1.0 * i as f64).collect();

    // Output grid inside the input range.
    let grid = EnergyGrid::new(60.0f64, 0.5, 41);
    assert_eq!(covered_window(&energies, &grid), Some((10, 30)));

    // Output grid outside the input range.
    let grid = EnergyGrid::new(200.0f64, 0.5, 41);
    assert_eq!(covered_window(&energies, &grid), None);
}