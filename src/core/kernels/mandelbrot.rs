use crate::core::data::complex::Complex;
use crate::core::data::fractal_field::FractalField;
use crate::core::data::view_params::ViewParams;
use crate::core::kernels::{
    ComputeError, DefaultView, FractalKernel, compute_grid, escape_iterate,
};
use crate::core::params::definition::ParameterDefinition;
use crate::core::params::set::ParameterSet;
use crate::render::cancellation::CancelToken;

/// z ← z² + c with z₀ = 0 and c the pixel coordinate.
#[derive(Debug, Default)]
pub struct MandelbrotKernel;

impl FractalKernel for MandelbrotKernel {
    fn name(&self) -> &'static str {
        "Mandelbrot"
    }

    fn parameter_definitions(&self) -> &'static [ParameterDefinition] {
        &[]
    }

    fn default_view(&self) -> DefaultView {
        DefaultView {
            center_real: -0.5,
            center_imag: 0.0,
            width: 3.0,
            max_iterations: 100,
        }
    }

    fn compute(
        &self,
        view: &ViewParams,
        _params: &ParameterSet,
        width_px: u32,
        height_px: u32,
        cancel: &dyn CancelToken,
    ) -> Result<FractalField, ComputeError> {
        let escape_sq = view.escape_radius_squared();
        let max_iterations = view.max_iterations;

        compute_grid(view, width_px, height_px, cancel, |c| {
            escape_iterate(Complex::ZERO, max_iterations, escape_sq, |z| z * z + c)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::cancellation::NeverCancel;

    fn default_setup() -> (ViewParams, ParameterSet) {
        let mut view = ViewParams {
            max_iterations: 50,
            ..ViewParams::default()
        };
        view.update_aspect(4, 3);
        let params = ParameterSet::from_definitions(MandelbrotKernel.parameter_definitions());
        (view, params)
    }

    #[test]
    fn test_output_arrays_match_grid_shape() {
        let (view, params) = default_setup();
        let field = MandelbrotKernel
            .compute(&view, &params, 4, 3, &NeverCancel)
            .unwrap();

        assert_eq!(field.width(), 4);
        assert_eq!(field.height(), 3);
        assert_eq!(field.iterations().len(), 12);
        assert_eq!(field.final_z().len(), 12);
        assert_eq!(field.final_modulus_sq().len(), 12);
    }

    #[test]
    fn test_origin_never_escapes() {
        // the middle sample of a 5x3 grid over the default window lands on
        // (-0.5, 0), which is inside the set
        let (mut view, params) = default_setup();
        view.update_aspect(5, 3);
        let field = MandelbrotKernel
            .compute(&view, &params, 5, 3, &NeverCancel)
            .unwrap();

        let center_index = 1 * 5 + 2;
        assert_eq!(field.final_z().len(), 15);
        assert_eq!(field.iterations()[center_index], 50);
        assert!(!field.diverged(center_index));
        assert_eq!(field.final_modulus_sq()[center_index], 0.0);
    }

    #[test]
    fn test_far_point_escapes_immediately() {
        // widen the window so the left edge sits far outside the set
        let (mut view, params) = default_setup();
        view.center_real = 0.0;
        view.width = 8.0;
        view.update_aspect(3, 3);

        let field = MandelbrotKernel
            .compute(&view, &params, 3, 3, &NeverCancel)
            .unwrap();

        // left-middle pixel is at real = -4.0
        let index = 1 * 3;
        assert!(field.diverged(index));
        assert!(field.iterations()[index] <= 1);
        assert!(field.final_modulus_sq()[index] > view.escape_radius_squared());
    }

    #[test]
    fn test_has_no_parameters_and_standard_default_view() {
        assert!(MandelbrotKernel.parameter_definitions().is_empty());

        let default_view = MandelbrotKernel.default_view();
        assert_eq!(default_view.center_real, -0.5);
        assert_eq!(default_view.width, 3.0);
        assert_eq!(default_view.max_iterations, 100);
    }
}
