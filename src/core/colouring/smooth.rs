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
    tooltip: "Stretches the palette across the smoothed iteration range",
    default: 1.0,
    min: 0.01,
    max: 100.0,
    step: 0.01,
}];

/// Continuous colouring: iters + 1 − ln(ln|z|)/ln 2 removes the banding of
/// the raw iteration count. Falls back to the plain count where the
/// logarithm is undefined (|z| ≤ 1 or a zero escape modulus).
#[derive(Debug, Default)]
pub struct SmoothColouring;

/// Smoothed iteration value for one escaped pixel.
fn smooth_value(iterations: u32, final_modulus_sq: f64) -> f64 {
    let plain = f64::from(iterations);

    if final_modulus_sq <= 0.0 {
        return plain;
    }

    let modulus = final_modulus_sq.sqrt();
    if modulus <= 1.0 {
        return plain;
    }

    plain + 1.0 - modulus.ln().ln() / std::f64::consts::LN_2
}

impl ColouringAlgorithm for SmoothColouring {
    fn name(&self) -> &'static str {
        "Smooth Iterations"
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
        let fallback;
        let table = match usable_palette(palette) {
            Some(table) => table,
            None => {
                fallback = ColourTable::grayscale();
                &fallback
            }
        };

        let modulus_sq = field.final_modulus_sq();

        for (index, &iterations) in field.iterations().iter().enumerate() {
            if !field.diverged(index) {
                out.set_index(index, Colour::BLACK);
                continue;
            }

            let smooth = smooth_value(iterations, modulus_sq[index]);
            out.set_index(index, table.sample_wrapped(smooth * scale));
        }

        Ok(())
    }
}
