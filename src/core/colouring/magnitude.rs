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
    name: "gamma",
    label: "Gamma",
    tooltip: "Gamma correction applied to the normalised magnitude",
    default: 1.0,
    min: 0.1,
    max: 5.0,
    step: 0.1,
}];

/// Colours interior points by |z| of the final iterate, normalised against
/// the escape radius and gamma-corrected. Palette lookup is nearest-entry,
/// deliberately unblended. Escaped pixels stay black.
#[derive(Debug, Default)]
pub struct FinalMagnitudeColouring;

impl ColouringAlgorithm for FinalMagnitudeColouring {
    fn name(&self) -> &'static str {
        "Final Magnitude"
    }

    fn target(&self) -> RegionTarget {
        RegionTarget::NonDivergent
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
        out.fill(Colour::BLACK);

        let gamma = params.float("gamma").unwrap_or(1.0);
        let radius = field.escape_radius();
        let table = usable_palette(palette);

        for (index, z) in field.final_z().iter().enumerate() {
            if field.diverged(index) {
                continue;
            }

            let norm = (z.magnitude() / radius).clamp(0.0, 1.0);
            let corrected = if norm > 0.0 {
                norm.powf(1.0 / gamma)
            } else {
                0.0
            };

            let colour = match table {
                Some(table) => table.sample_nearest(corrected),
                None => Colour::grey((corrected * 255.0) as u8),
            };

            out.set_index(index, colour);
        }

        Ok(())
    }
}
