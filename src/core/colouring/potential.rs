use crate::core::colouring::{
    ColouringAlgorithm, ColouringError, RegionTarget, check_shape, usable_palette,
};
use crate::core::data::colour::Colour;
use crate::core::data::fractal_field::FractalField;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::palette::table::ColourTable;
use crate::core::params::definition::ParameterDefinition;
use crate::core::params::set::ParameterSet;

const PARAMETERS: &[ParameterDefinition] = &[
    ParameterDefinition::Float {
        name: "color_scale",
        label: "Colour scale",
        tooltip: "Multiplier applied to the normalised potential",
        default: 1.0,
        min: 0.1,
        max: 5.0,
        step: 0.05,
    },
    ParameterDefinition::Float {
        name: "potential_offset",
        label: "Potential offset",
        tooltip: "Added to the raw potential before scaling",
        default: 0.0,
        min: -10.0,
        max: 10.0,
        step: 0.1,
    },
    ParameterDefinition::Float {
        name: "potential_scale",
        label: "Potential scale",
        tooltip: "Multiplier applied to the offset potential",
        default: 1.0,
        min: 0.1,
        max: 10.0,
        step: 0.1,
    },
];

const NEAR_ZERO: f64 = 1e-9;

/// Colours interior points by the logarithmic potential ln|z| of their final
/// iterate, normalised over the frame. Escaped pixels stay black.
#[derive(Debug, Default)]
pub struct ComplexPotentialColouring;

impl ColouringAlgorithm for ComplexPotentialColouring {
    fn name(&self) -> &'static str {
        "Complex Potential"
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

        let colour_scale = params.float("color_scale").unwrap_or(1.0);
        let offset = params.float("potential_offset").unwrap_or(0.0);
        let potential_scale = params.float("potential_scale").unwrap_or(1.0);

        // raw potential ln|z| per interior pixel; final iterates at the
        // origin get −∞ and normalise straight to zero. The normalisation
        // range comes from the raw extremes, so offset and scale shift the
        // pixel values within it instead of cancelling out.
        let mut potentials: Vec<(usize, f64)> = Vec::new();
        let mut finite_min = f64::INFINITY;
        let mut finite_max = f64::NEG_INFINITY;
        let mut any_near_zero = false;

        for (index, z) in field.final_z().iter().enumerate() {
            if field.diverged(index) {
                continue;
            }

            let modulus = z.magnitude();
            let potential = if modulus > NEAR_ZERO {
                let p = modulus.ln();
                finite_min = finite_min.min(p);
                finite_max = finite_max.max(p);
                p
            } else {
                any_near_zero = true;
                f64::NEG_INFINITY
            };

            potentials.push((index, potential));
        }

        if potentials.is_empty() {
            return Ok(());
        }

        let min = if any_near_zero {
            if finite_min.is_finite() {
                finite_min - 1.0
            } else {
                -1.0
            }
        } else {
            finite_min
        };
        let mut max = if finite_max.is_finite() {
            finite_max
        } else {
            0.0
        };
        if max <= min {
            max = min + 1.0;
        }
        let range = max - min;

        let table = usable_palette(palette);

        for (index, potential) in potentials {
            let norm = if potential.is_finite() {
                let adjusted = (potential + offset) * potential_scale;
                (((adjusted - min) / range).clamp(0.0, 1.0) * colour_scale).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let colour = match table {
                Some(table) => table.sample_clamped(norm * (table.len() - 1) as f64),
                None => Colour::grey((norm * 255.0) as u8),
            };

            out.set_index(index, colour);
        }

        Ok(())
    }
}
