//! Beam-type grouping of per-beam R-factors.
//!
//! ## Purpose
//!
//! This module aggregates per-beam R decompositions by an integer label
//! per beam (e.g., integer-order vs. fractional-order beams), using the
//! same overlap-count weighting as the joint total.
//!
//! ## Design notes
//!
//! * **Accumulate then finalize**: One pass gathers weighted sums per
//!   label, a second pass turns them into aggregates.
//! * **First-appearance order**: Groups are reported in the order their
//!   labels first appear in the beam list.
//! * **Poisoning is local**: A NaN on a genuine overlap poisons only its
//!   own group's aggregate.
//!
//! ## Non-goals
//!
//! * This module does not decide the labels; symmetry analysis happens
//!   upstream of the kernel.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::rfactor::BeamR;

// ============================================================================
// Group Aggregates
// ============================================================================

/// Weighted aggregate R of one beam-type group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupR<T> {
    /// Group label.
    pub label: i32,

    /// Overlap-weighted aggregate R of the group's members (NaN when the
    /// group is poisoned or has no overlapping member).
    pub r: T,

    /// Total overlapping grid points across the group's members.
    pub overlap: usize,
}

/// Aggregate per-beam decompositions by label.
///
/// `labels` carries one entry per beam, aligned with `beams`.
pub fn group_aggregates<T: Float>(labels: &[i32], beams: &[BeamR<T>]) -> Vec<GroupR<T>> {
    debug_assert_eq!(labels.len(), beams.len(), "group_aggregates: label count");

    struct Acc<T> {
        label: i32,
        weighted: T,
        weight: T,
        overlap: usize,
        poisoned: bool,
    }

    let mut groups: Vec<Acc<T>> = Vec::new();
    for (b, beam) in beams.iter().enumerate() {
        let label = labels[b];
        let idx = match groups.iter().position(|g| g.label == label) {
            Some(idx) => idx,
            None => {
                groups.push(Acc {
                    label,
                    weighted: T::zero(),
                    weight: T::zero(),
                    overlap: 0,
                    poisoned: false,
                });
                groups.len() - 1
            }
        };
        let slot = &mut groups[idx];

        if !beam.has_overlap() {
            continue;
        }
        if beam.r.is_finite() {
            let w = T::from(beam.overlap).unwrap();
            slot.weighted = slot.weighted + beam.r * w;
            slot.weight = slot.weight + w;
            slot.overlap += beam.overlap;
        } else {
            slot.poisoned = true;
        }
    }

    groups
        .into_iter()
        .map(|g| GroupR {
            label: g.label,
            r: if g.poisoned || g.weight <= T::zero() {
                T::nan()
            } else {
                g.weighted / g.weight
            },
            overlap: g.overlap,
        })
        .collect()
}
