use crate::core::colouring::{
    ColouringAlgorithm, ColouringError, RegionTarget, check_shape, usable_palette,
};
use crate::core::data::colour::Colour;
use crate::core::data::fractal_field::FractalField;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::palette::table::ColourTable;
use crate::core::params::definition::ParameterDefinition;
use crate::core::params::set::ParameterSet;

/// Colours interior points by how early they settled: (max − iters) / max.
///
/// For a pure escape-time field every interior pixel records the full
/// iteration budget, so this produces a flat image. The behaviour is kept
/// intentionally; kernels that report early interior convergence get a
/// meaningful gradient from the same mapping.
#[derive(Debug, Default)]
pub struct ConvergenceSpeedColouring;

impl ColouringAlgorithm for ConvergenceSpeedColouring {
    fn name(&self) -> &'static str {
        "Convergence Speed"
    }

    fn target(&self) -> RegionTarget {
        RegionTarget::NonDivergent
    }

    fn parameter_definitions(&self) -> &'static [ParameterDefinition] {
        &[]
    }

    fn apply(
        &self,
        field: &FractalField,
        _params: &ParameterSet,
        palette: Option<&ColourTable>,
        out: &mut RgbaBuffer,
    ) -> Result<(), ColouringError> {
        check_shape(field, out)?;
        out.fill(Colour::BLACK);

        let max = field.max_iterations();
        let table = usable_palette(palette);

        for (index, &iterations) in field.iterations().iter().enumerate() {
            if field.diverged(index) {
                continue;
            }

            let diff = max.saturating_sub(iterations).min(max);
            let value = f64::from(diff) / f64::from(max);

            let colour = match table {
                Some(table) => table.get((value * (table.len() - 1) as f64) as usize),
                None => Colour::grey((value * 255.0).round() as u8),
            };

            out.set_index(index, colour);
        }

        Ok(())
    }
}
