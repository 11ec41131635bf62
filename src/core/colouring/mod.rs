pub mod convergence;
pub mod grayscale;
pub mod iteration_bands;
pub mod magnitude;
pub mod potential;
pub mod smooth;

use crate::core::data::fractal_field::FractalField;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::palette::table::ColourTable;
use crate::core::params::definition::ParameterDefinition;
use crate::core::params::set::ParameterSet;
use std::error::Error;
use std::fmt;

/// Which pixels of the field an algorithm is responsible for. The engine
/// composites one raster per target by the diverged mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionTarget {
    Divergent,
    NonDivergent,
}

impl fmt::Display for RegionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Divergent => write!(f, "divergent"),
            Self::NonDivergent => write!(f, "non-divergent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColouringError {
    ShapeMismatch {
        field_width: u32,
        field_height: u32,
        buffer_width: u32,
        buffer_height: u32,
    },
}

impl fmt::Display for ColouringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                field_width,
                field_height,
                buffer_width,
                buffer_height,
            } => {
                write!(
                    f,
                    "output buffer {}x{} does not match field {}x{}",
                    buffer_width, buffer_height, field_width, field_height
                )
            }
        }
    }
}

impl Error for ColouringError {}

/// Maps a computed field to colours for one region target.
///
/// Implementations clamp and degrade rather than fail: malformed parameter
/// combinations and missing palettes produce a defined fallback image. The
/// only error is a field/buffer shape mismatch.
pub trait ColouringAlgorithm: Send + Sync {
    fn name(&self) -> &'static str;

    fn target(&self) -> RegionTarget;

    fn parameter_definitions(&self) -> &'static [ParameterDefinition];

    fn apply(
        &self,
        field: &FractalField,
        params: &ParameterSet,
        palette: Option<&ColourTable>,
        out: &mut RgbaBuffer,
    ) -> Result<(), ColouringError>;
}

/// A palette with fewer than two entries counts as absent.
pub(crate) fn usable_palette<'a>(palette: Option<&'a ColourTable>) -> Option<&'a ColourTable> {
    palette.filter(|table| table.is_usable())
}

pub(crate) fn check_shape(field: &FractalField, out: &RgbaBuffer) -> Result<(), ColouringError> {
    if field.width() != out.width() || field.height() != out.height() {
        return Err(ColouringError::ShapeMismatch {
            field_width: field.width(),
            field_height: field.height(),
            buffer_width: out.width(),
            buffer_height: out.height(),
        });
    }

    Ok(())
}
