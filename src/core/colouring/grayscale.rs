use crate::core::colouring::{ColouringAlgorithm, ColouringError, RegionTarget, check_shape};
use crate::core::data::colour::Colour;
use crate::core::data::fractal_field::FractalField;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::palette::table::ColourTable;
use crate::core::params::definition::ParameterDefinition;
use crate::core::params::set::ParameterSet;

/// Iteration count mapped straight to a grey level; palettes are ignored.
/// Pixels that exhausted the budget stay black.
#[derive(Debug, Default)]
pub struct GrayscaleColouring;

impl ColouringAlgorithm for GrayscaleColouring {
    fn name(&self) -> &'static str {
        "Grayscale"
    }

    fn target(&self) -> RegionTarget {
        RegionTarget::Divergent
    }

    fn parameter_definitions(&self) -> &'static [ParameterDefinition] {
        &[]
    }

    fn apply(
        &self,
        field: &FractalField,
        _params: &ParameterSet,
        _palette: Option<&ColourTable>,
        out: &mut RgbaBuffer,
    ) -> Result<(), ColouringError> {
        check_shape(field, out)?;

        let max = f64::from(field.max_iterations());

        for (index, &iterations) in field.iterations().iter().enumerate() {
            let colour = if field.diverged(index) {
                let level = ((1.0 - f64::from(iterations) / max) * 255.0) as u8;
                Colour::grey(level)
            } else {
                Colour::BLACK
            };

            out.set_index(index, colour);
        }

        Ok(())
    }
}
