use crate::core::data::complex::Complex;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FractalFieldError {
    ArrayLengthMismatch {
        expected: usize,
        iterations: usize,
        final_z: usize,
        final_modulus_sq: usize,
    },
}

impl fmt::Display for FractalFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArrayLengthMismatch {
                expected,
                iterations,
                final_z,
                final_modulus_sq,
            } => {
                write!(
                    f,
                    "field arrays must each hold {} entries, got iterations:{}, final_z:{}, final_modulus_sq:{}",
                    expected, iterations, final_z, final_modulus_sq
                )
            }
        }
    }
}

impl Error for FractalFieldError {}

/// Per-pixel output of a fractal kernel, row-major.
///
/// `iterations` holds the escape iteration, or `max_iterations` for points
/// that never escaped. `final_z` keeps the last iterate for every pixel so
/// interior colourings can read it; `final_modulus_sq` is |z|² at escape and
/// 0.0 for interior points.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalField {
    width: u32,
    height: u32,
    max_iterations: u32,
    escape_radius: f64,
    iterations: Vec<u32>,
    final_z: Vec<Complex>,
    final_modulus_sq: Vec<f64>,
}

impl FractalField {
    pub fn new(
        width: u32,
        height: u32,
        max_iterations: u32,
        escape_radius: f64,
        iterations: Vec<u32>,
        final_z: Vec<Complex>,
        final_modulus_sq: Vec<f64>,
    ) -> Result<Self, FractalFieldError> {
        let expected = width as usize * height as usize;

        if iterations.len() != expected
            || final_z.len() != expected
            || final_modulus_sq.len() != expected
        {
            return Err(FractalFieldError::ArrayLengthMismatch {
                expected,
                iterations: iterations.len(),
                final_z: final_z.len(),
                final_modulus_sq: final_modulus_sq.len(),
            });
        }

        Ok(Self {
            width,
            height,
            max_iterations,
            escape_radius,
            iterations,
            final_z,
            final_modulus_sq,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    #[must_use]
    pub fn escape_radius(&self) -> f64 {
        self.escape_radius
    }

    #[must_use]
    pub fn iterations(&self) -> &[u32] {
        &self.iterations
    }

    #[must_use]
    pub fn final_z(&self) -> &[Complex] {
        &self.final_z
    }

    #[must_use]
    pub fn final_modulus_sq(&self) -> &[f64] {
        &self.final_modulus_sq
    }

    /// A pixel diverged when it escaped before the iteration budget ran out.
    #[must_use]
    pub fn diverged(&self, index: usize) -> bool {
        self.iterations[index] < self.max_iterations
    }
}
