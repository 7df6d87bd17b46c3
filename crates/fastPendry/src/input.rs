//! Input abstractions for R-factor calculations.
//!
//! This module provides unified abstractions over curve inputs, allowing
//! beam sets to be built from slices, vectors, or `ndarray` arrays through
//! a single interface. Intensity matrices are column-major: one column per
//! beam, one row per input energy.

// External dependencies
#[cfg(feature = "cpu")]
use ndarray::{ArrayBase, Data, Ix1, Ix2};
use num_traits::Float;

// Export dependencies from pendry crate
use pendry::internals::primitives::beamset::BeamSet;
use pendry::internals::primitives::errors::PendryError;

// Trait for 1-D data usable as an energy vector.
pub trait CurveInput<T: Float> {
    fn as_curve_slice(&self) -> Result<&[T], PendryError>;
}

impl<T: Float> CurveInput<T> for [T] {
    fn as_curve_slice(&self) -> Result<&[T], PendryError> {
        Ok(self)
    }
}

impl<T: Float> CurveInput<T> for Vec<T> {
    fn as_curve_slice(&self) -> Result<&[T], PendryError> {
        Ok(self.as_slice())
    }
}

#[cfg(feature = "cpu")]
impl<T: Float, S> CurveInput<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn as_curve_slice(&self) -> Result<&[T], PendryError> {
        self.as_slice().ok_or_else(|| {
            PendryError::InvalidInput("ndarray input must be contiguous in memory".to_string())
        })
    }
}

// Trait for 2-D data usable as a packed column-major intensity matrix.
pub trait MatrixInput<T: Float> {
    fn as_beam_matrix(&self) -> Result<&[T], PendryError>;
}

impl<T: Float> MatrixInput<T> for [T] {
    fn as_beam_matrix(&self) -> Result<&[T], PendryError> {
        Ok(self)
    }
}

impl<T: Float> MatrixInput<T> for Vec<T> {
    fn as_beam_matrix(&self) -> Result<&[T], PendryError> {
        Ok(self.as_slice())
    }
}

#[cfg(feature = "cpu")]
impl<T: Float, S> MatrixInput<T> for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
{
    fn as_beam_matrix(&self) -> Result<&[T], PendryError> {
        // A single row or column is contiguous either way; a genuine matrix
        // must be Fortran-ordered so columns are the beams.
        let degenerate = self.nrows() <= 1 || self.ncols() <= 1;
        if !degenerate && self.is_standard_layout() {
            return Err(PendryError::InvalidInput(
                "ndarray intensity matrix must be column-major (Fortran order)".to_string(),
            ));
        }
        self.as_slice_memory_order().ok_or_else(|| {
            PendryError::InvalidInput("ndarray input must be contiguous in memory".to_string())
        })
    }
}

/// Build a borrowed beam set from any supported input types.
pub fn beam_set<'a, T, E, M>(
    energies: &'a E,
    intensities: &'a M,
    starts: &[usize],
    lengths: &[usize],
) -> Result<BeamSet<'a, T>, PendryError>
where
    T: Float,
    E: CurveInput<T> + ?Sized,
    M: MatrixInput<T> + ?Sized,
{
    BeamSet::new(
        energies.as_curve_slice()?,
        intensities.as_beam_matrix()?,
        starts,
        lengths,
    )
}

/// Build a borrowed beam set in which every beam spans the full grid.
pub fn beam_set_full<'a, T, E, M>(
    energies: &'a E,
    intensities: &'a M,
    n_beams: usize,
) -> Result<BeamSet<'a, T>, PendryError>
where
    T: Float,
    E: CurveInput<T> + ?Sized,
    M: MatrixInput<T> + ?Sized,
{
    BeamSet::full(
        energies.as_curve_slice()?,
        intensities.as_beam_matrix()?,
        n_beams,
    )
}
