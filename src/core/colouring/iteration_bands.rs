use crate::core::colouring::{
    ColouringAlgorithm, ColouringError, RegionTarget, check_shape, usable_palette,
};
use crate::core::data::colour::Colour;
use crate::core::data::fractal_field::FractalField;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::palette::table::ColourTable;
use crate::core::params::definition::ParameterDefinition;
use crate::core::params::set::ParameterSet;

const PARAMETERS: &[ParameterDefinition] = &[ParameterDefinition::Float {
    name: "color_scale",
    label: "Colour scale",
    tooltip: "Stretches the palette across the iteration range",
    default: 1.0,
    min: 0.01,
    max: 100.0,
    step: 0.01,
}];

/// Normalised iteration count mapped onto the palette with modulo wraparound
/// and linear blending between neighbouring entries. Without a usable
/// palette it degrades to the plain grayscale ramp.
#[derive(Debug, Default)]
pub struct IterationBandsColouring;

impl ColouringAlgorithm for IterationBandsColouring {
    fn name(&self) -> &'static str {
        "Iteration Bands"
    }

    fn target(&self) -> RegionTarget {
        RegionTarget::Divergent
    }

    fn parameter_definitions(&self) -> &'static [ParameterDefinition] {
        PARAMETERS
    }

    fn apply(
        &self,
        field: &FractalField,
        params: &ParameterSet,
        palette: Option<&ColourTable>,
        out: &mut RgbaBuffer,
    ) -> Result<(), ColouringError> {
        check_shape(field, out)?;

        let scale = params.float("color_scale").unwrap_or(1.0);
        let max = f64::from(field.max_iterations());
        let palette = usable_palette(palette);

        for (index, &iterations) in field.iterations().iter().enumerate() {
            if !field.diverged(index) {
                out.set_index(index, Colour::BLACK);
                continue;
            }

            let normalised = f64::from(iterations) / max;
            let colour = match palette {
                Some(table) => {
                    let position = (1.0 - normalised) * (table.len() - 1) as f64 * scale;
                    table.sample_wrapped(position)
                }
                None => Colour::grey(((1.0 - normalised) * 255.0).round() as u8),
            };

            out.set_index(index, colour);
        }

        Ok(())
    }
}
