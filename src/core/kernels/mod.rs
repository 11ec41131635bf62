pub mod julia;
pub mod mandelbrot;

use crate::core::data::complex::Complex;
use crate::core::data::fractal_field::{FractalField, FractalFieldError};
use crate::core::data::view_params::ViewParams;
use crate::core::params::definition::{ParameterDefinition, ParameterValue};
use crate::core::params::set::ParameterSet;
use crate::render::cancellation::{CancelToken, Cancelled};
use rayon::prelude::*;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ComputeError {
    Cancelled(Cancelled),
    EmptyGrid { width_px: u32, height_px: u32 },
    Field(FractalFieldError),
}

impl fmt::Display for ComputeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled(c) => write!(f, "{}", c),
            Self::EmptyGrid {
                width_px,
                height_px,
            } => {
                write!(f, "cannot compute a {}x{} grid", width_px, height_px)
            }
            Self::Field(err) => write!(f, "field error: {}", err),
        }
    }
}

impl Error for ComputeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cancelled(c) => Some(c),
            Self::EmptyGrid { .. } => None,
            Self::Field(err) => Some(err),
        }
    }
}

/// Default plane window a kernel wants to be shown in when first selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultView {
    pub center_real: f64,
    pub center_imag: f64,
    pub width: f64,
    pub max_iterations: u32,
}

/// Named bundle of parameter values a kernel ships out of the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelPreset {
    pub name: &'static str,
    pub values: &'static [(&'static str, ParameterValue)],
}

pub trait FractalKernel: Send + Sync {
    fn name(&self) -> &'static str;

    fn parameter_definitions(&self) -> &'static [ParameterDefinition];

    fn default_view(&self) -> DefaultView;

    fn presets(&self) -> &'static [KernelPreset] {
        &[]
    }

    /// Computes the per-pixel escape field for the given window and raster
    /// size. Implementations honour the cancel token at least once per row.
    fn compute(
        &self,
        view: &ViewParams,
        params: &ParameterSet,
        width_px: u32,
        height_px: u32,
        cancel: &dyn CancelToken,
    ) -> Result<FractalField, ComputeError>;
}

/// Result of iterating a single starting point.
pub(crate) struct PointOutcome {
    pub iterations: u32,
    pub final_z: Complex,
    pub final_modulus_sq: f64,
}

/// Runs `iterate` over every grid point, rows in parallel, and assembles the
/// field arrays. The cancel token is polled once per row.
pub(crate) fn compute_grid<F>(
    view: &ViewParams,
    width_px: u32,
    height_px: u32,
    cancel: &dyn CancelToken,
    iterate: F,
) -> Result<FractalField, ComputeError>
where
    F: Fn(Complex) -> PointOutcome + Send + Sync,
{
    if width_px == 0 || height_px == 0 {
        return Err(ComputeError::EmptyGrid {
            width_px,
            height_px,
        });
    }

    let rows: Vec<Vec<PointOutcome>> = (0..height_px)
        .into_par_iter()
        .map(|y| {
            if cancel.is_cancelled() {
                return Err(ComputeError::Cancelled(Cancelled));
            }

            Ok((0..width_px)
                .map(|x| iterate(view.point_at(x, y, width_px, height_px)))
                .collect())
        })
        .collect::<Result<_, _>>()?;

    let pixel_count = width_px as usize * height_px as usize;
    let mut iterations = Vec::with_capacity(pixel_count);
    let mut final_z = Vec::with_capacity(pixel_count);
    let mut final_modulus_sq = Vec::with_capacity(pixel_count);

    for row in rows {
        for point in row {
            iterations.push(point.iterations);
            final_z.push(point.final_z);
            final_modulus_sq.push(point.final_modulus_sq);
        }
    }

    FractalField::new(
        width_px,
        height_px,
        view.max_iterations,
        view.escape_radius,
        iterations,
        final_z,
        final_modulus_sq,
    )
    .map_err(ComputeError::Field)
}

/// Shared escape loop: iterates `step` from `z0` until |z|² exceeds the
/// escape threshold or the budget runs out. Interior points record a zero
/// escape modulus, matching the field contract.
pub(crate) fn escape_iterate<S>(z0: Complex, max_iterations: u32, escape_sq: f64, step: S) -> PointOutcome
where
    S: Fn(Complex) -> Complex,
{
    let mut z = z0;

    for iteration in 0..max_iterations {
        let modulus_sq = z.magnitude_squared();
        if modulus_sq > escape_sq {
            return PointOutcome {
                iterations: iteration,
                final_z: z,
                final_modulus_sq: modulus_sq,
            };
        }
        z = step(z);
    }

    PointOutcome {
        iterations: max_iterations,
        final_z: z,
        final_modulus_sq: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::cancellation::NeverCancel;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn constant_outcome(z: Complex) -> PointOutcome {
        PointOutcome {
            iterations: 1,
            final_z: z,
            final_modulus_sq: z.magnitude_squared(),
        }
    }

    #[test]
    fn test_compute_grid_shape() {
        let view = ViewParams::default();
        let field = compute_grid(&view, 4, 3, &NeverCancel, constant_outcome).unwrap();

        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 3);
        assert_eq!(field.iterations().len(), 12);
        assert_eq!(field.final_z().len(), 12);
        assert_eq!(field.final_modulus_sq().len(), 12);
    }

    #[test]
    fn test_compute_grid_rejects_empty_grid() {
        let view = ViewParams::default();
        let result = compute_grid(&view, 0, 3, &NeverCancel, constant_outcome);

        assert_eq!(
            result.unwrap_err(),
            ComputeError::EmptyGrid {
                width_px: 0,
                height_px: 3
            }
        );
    }

    #[test]
    fn test_compute_grid_observes_cancellation() {
        let view = ViewParams::default();
        let cancelled = AtomicBool::new(true);
        let token = || cancelled.load(Ordering::Relaxed);

        let result = compute_grid(&view, 8, 8, &token, constant_outcome);

        assert_eq!(result.unwrap_err(), ComputeError::Cancelled(Cancelled));
    }

    #[test]
    fn test_compute_grid_is_row_major() {
        let view = ViewParams::default();
        // record each point's real coordinate in the iteration slot
        let field = compute_grid(&view, 3, 2, &NeverCancel, |z| PointOutcome {
            iterations: if z.real < view.center_real { 0 } else { 1 },
            final_z: z,
            final_modulus_sq: 0.0,
        })
        .unwrap();

        // first row left-to-right, then second row
        assert_eq!(field.final_z()[0].real, view.real_at(0, 3));
        assert_eq!(field.final_z()[2].real, view.real_at(2, 3));
        assert_eq!(field.final_z()[3].imag, view.imag_at(1, 2));
    }

    #[test]
    fn test_escape_iterate_interior_point_zeroes_modulus() {
        let outcome = escape_iterate(Complex::ZERO, 25, 4.0, |z| z);

        assert_eq!(outcome.iterations, 25);
        assert_eq!(outcome.final_modulus_sq, 0.0);
    }

    #[test]
    fn test_escape_iterate_records_escape_state() {
        let z0 = Complex {
            real: 3.0,
            imag: 0.0,
        };
        let outcome = escape_iterate(z0, 25, 4.0, |z| z);

        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.final_modulus_sq, 9.0);
        assert_eq!(outcome.final_z, z0);
    }
}
