//! Error and advisory types for R-factor operations.
//!
//! ## Purpose
//!
//! This module defines the failure conditions of the R-factor pipeline. It
//! separates conditions that abort a calculation (`PendryError`) from
//! conditions that are recorded on an otherwise valid result (`Advisory`).
//!
//! ## Design notes
//!
//! * **Contextual**: Errors include relevant values (e.g., actual vs. expected lengths).
//! * **Two-tier**: Fatal errors and informational advisories are distinct types,
//!   so callers cannot confuse a dropped beam with a failed calculation.
//! * **Coded**: Both types map onto the integer taxonomy used by the wider
//!   LEED tooling via [`PendryError::code`] and [`Advisory::code`].
//! * **No-std**: Supports `no_std` environments by using `alloc` for dynamic messages.
//!
//! ## Key concepts
//!
//! 1. **Input validation**: Empty arrays, mismatched curve sets, bad grids.
//! 2. **Scheme validation**: Averaging scheme shape and group sizes.
//! 3. **Solver failures**: Singular banded or parabola systems.
//! 4. **Optimizer soft outcomes**: Fallbacks and weak minima are advisories,
//!    not errors; a best shift is still returned.
//!
//! ## Invariants
//!
//! * All variants provide sufficient context for diagnosis.
//! * Advisory codes never overlap fatal codes.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * This module does not decide when an advisory escalates; policy lives
//!   in the engine layer.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::error::Error;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Fatal Errors
// ============================================================================

/// Error type for conditions that abort an R-factor calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum PendryError {
    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },

    /// Energy grid precondition violated (ordering, uniformity, coverage).
    BadGrid(String),

    /// Generic invalid input error with a descriptive message.
    InvalidInput(String),

    /// Input arrays are empty.
    EmptyInput,

    /// Experimental and theoretical curve sets do not line up.
    MismatchedInputs {
        /// Number of beams (or samples) on the experimental side.
        expected: usize,
        /// Number of beams (or samples) on the theoretical side.
        got: usize,
    },

    /// The imaginary inner potential must be non-negative and finite.
    InvalidV0i(f64),

    /// Only cubic splines are supported by the natural-knot closure.
    InvalidDegree(usize),

    /// Optimizer tolerances must lie in (0, 1] with good >= acceptable.
    InvalidTolerance(f64),

    /// Parabola window half-width must be at least 1.
    InvalidFitRange(usize),

    /// A beam carries fewer samples than the spline order requires.
    TooFewPoints {
        /// Number of samples available.
        got: usize,
        /// Minimum required samples (`2 * degree + 1`).
        min: usize,
    },

    /// Averaging scheme is malformed: more output than input beams, an
    /// out-of-range group index, or an empty output group.
    SchemeInvalid {
        /// Output group that is empty or out of range (1-based), if known.
        group: Option<usize>,
        /// Number of input beams.
        n_beams: usize,
        /// Number of output beams requested.
        n_out: usize,
    },

    /// The intersection of a group's supports is shorter than the spline
    /// order allows.
    GroupTooShort {
        /// Output group index (1-based).
        group: usize,
        /// Samples in the intersection.
        got: usize,
        /// Minimum required samples.
        min: usize,
    },

    /// Averaging was skipped but the output beam count differs from the
    /// input beam count.
    SchemeMismatch {
        /// Number of input beams.
        n_beams: usize,
        /// Number of output beams requested.
        n_out: usize,
    },

    /// The banded spline system hit a zero pivot.
    SingularSpline {
        /// Column at which elimination broke down.
        column: usize,
    },

    /// The shift grid carries fewer points than the optimizer needs.
    RangeTooSmall {
        /// Number of grid points in the range.
        got: usize,
        /// Minimum required grid points.
        min: usize,
    },

    /// An initial guess lies outside the shift range, or guesses coincide.
    GuessOutOfRange {
        /// The offending guess.
        guess: i64,
        /// Lower bound of the shift range.
        lo: i64,
        /// Upper bound of the shift range.
        hi: i64,
    },

    /// The 3x3 parabola normal system lost a pivot.
    SingularParabola,
}

impl PendryError {
    /// Integer code in the canonical R-factor taxonomy.
    pub fn code(&self) -> u16 {
        match self {
            Self::DuplicateParameter { .. } => 101,
            Self::BadGrid(_) => 201,
            Self::InvalidInput(_) => 208,
            Self::EmptyInput => 202,
            Self::MismatchedInputs { .. } => 203,
            Self::InvalidV0i(_) => 204,
            Self::InvalidDegree(_) => 205,
            Self::InvalidTolerance(_) => 206,
            Self::InvalidFitRange(_) => 207,
            Self::TooFewPoints { .. } => 210,
            Self::SchemeInvalid { .. } => 220,
            Self::GroupTooShort { .. } => 222,
            Self::SchemeMismatch { .. } => 223,
            Self::SingularSpline { .. } => 230,
            Self::RangeTooSmall { .. } => 851,
            Self::GuessOutOfRange { .. } => 853,
            Self::SingularParabola => 860,
        }
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for PendryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::DuplicateParameter { parameter } => {
                write!(
                    f,
                    "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
                )
            }
            Self::BadGrid(msg) => write!(f, "Invalid energy grid: {msg}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::EmptyInput => write!(f, "Input arrays are empty"),
            Self::MismatchedInputs { expected, got } => {
                write!(f, "Curve sets do not match: expected {expected}, got {got}")
            }
            Self::InvalidV0i(v) => {
                write!(f, "Invalid V0i: {v} (must be >= 0 and finite)")
            }
            Self::InvalidDegree(deg) => {
                write!(f, "Invalid spline degree: {deg} (only 3 is supported)")
            }
            Self::InvalidTolerance(tol) => {
                write!(f, "Invalid tolerance: {tol} (must be in (0, 1])")
            }
            Self::InvalidFitRange(fr) => {
                write!(f, "Invalid fit range: {fr} (must be at least 1)")
            }
            Self::TooFewPoints { got, min } => {
                write!(f, "Too few samples: got {got}, need at least {min}")
            }
            Self::SchemeInvalid {
                group,
                n_beams,
                n_out,
            } => match group {
                Some(g) => write!(
                    f,
                    "Invalid averaging scheme: group {g} is empty or out of range ({n_beams} beams in, {n_out} out)"
                ),
                None => write!(
                    f,
                    "Invalid averaging scheme: {n_out} output beams requested from {n_beams} input beams"
                ),
            },
            Self::GroupTooShort { group, got, min } => {
                write!(
                    f,
                    "Group {group} overlap too short: {got} samples, need at least {min}"
                )
            }
            Self::SchemeMismatch { n_beams, n_out } => {
                write!(
                    f,
                    "Averaging skipped but output beam count {n_out} differs from input beam count {n_beams}"
                )
            }
            Self::SingularSpline { column } => {
                write!(f, "Singular spline system: zero pivot at column {column}")
            }
            Self::RangeTooSmall { got, min } => {
                write!(f, "Shift range too small: {got} grid points, need {min}")
            }
            Self::GuessOutOfRange { guess, lo, hi } => {
                write!(
                    f,
                    "Initial guess {guess} unusable for shift range [{lo}, {hi}]"
                )
            }
            Self::SingularParabola => {
                write!(f, "Parabola least-squares system is singular")
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

#[cfg(feature = "std")]
impl Error for PendryError {}

// ============================================================================
// Advisories
// ============================================================================

/// Informational condition recorded on a valid result.
///
/// Advisories never abort a calculation. Per-beam preparation problems leave
/// the remaining beams intact; optimizer fallbacks still return a best shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// A beam was discarded during range limiting because its clipped
    /// support dropped below `2 * degree + 1` samples.
    BeamTooShort {
        /// Input beam index (0-based).
        beam: usize,
    },

    /// A beam pair shares fewer than two grid points at the evaluated
    /// shift; the beam is excluded from the aggregate.
    NoOverlap {
        /// Output beam index (0-based).
        beam: usize,
    },

    /// A per-beam R on a genuine overlap evaluated to NaN; the aggregate
    /// is NaN so the outer search can reject the candidate.
    BeamNaN {
        /// Output beam index (0-based).
        beam: usize,
    },

    /// The optimizer ran out of unevaluated grid points before converging.
    AllEvaluated,

    /// The parabola refinement window left the shift grid; the optimizer
    /// fell back to brute force.
    OutOfRange,

    /// The parabola fit quality stayed below the acceptable tolerance at
    /// minimum window width; the optimizer fell back to brute force.
    ParabolaPoor,

    /// A minimum was found but the parabola fit is weak; the best grid
    /// point was returned without interpolation.
    WeakMinimum,
}

impl Advisory {
    /// Integer code in the canonical R-factor taxonomy.
    pub fn code(&self) -> u16 {
        match self {
            Self::BeamTooShort { .. } => 211,
            Self::NoOverlap { .. } => 212,
            Self::BeamNaN { .. } => 811,
            Self::AllEvaluated => 852,
            Self::OutOfRange => 854,
            Self::ParabolaPoor => 855,
            Self::WeakMinimum => 856,
        }
    }
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::BeamTooShort { beam } => {
                write!(f, "beam {beam} dropped: support too short after clipping")
            }
            Self::NoOverlap { beam } => {
                write!(f, "beam {beam} excluded: no overlap at this shift")
            }
            Self::BeamNaN { beam } => write!(f, "beam {beam} produced NaN; aggregate is NaN"),
            Self::AllEvaluated => write!(f, "optimizer exhausted the shift grid"),
            Self::OutOfRange => {
                write!(f, "parabola window left the shift grid; brute-force fallback")
            }
            Self::ParabolaPoor => {
                write!(f, "parabola fit below acceptable quality; brute-force fallback")
            }
            Self::WeakMinimum => {
                write!(f, "weak parabola fit; returned best grid point")
            }
        }
    }
}
