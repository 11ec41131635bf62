use crate::core::data::complex::Complex;
use crate::core::data::fractal_field::FractalField;
use crate::core::data::view_params::ViewParams;
use crate::core::kernels::{
    ComputeError, DefaultView, FractalKernel, KernelPreset, compute_grid, escape_iterate,
};
use crate::core::params::definition::{ParameterDefinition, ParameterValue};
use crate::core::params::set::ParameterSet;
use crate::render::cancellation::CancelToken;

const PARAMETERS: &[ParameterDefinition] = &[
    ParameterDefinition::Float {
        name: "c_real",
        label: "c (real)",
        tooltip: "Real part of the Julia constant",
        default: -0.745,
        min: -2.0,
        max: 2.0,
        step: 0.001,
    },
    ParameterDefinition::Float {
        name: "c_imag",
        label: "c (imaginary)",
        tooltip: "Imaginary part of the Julia constant",
        default: 0.113,
        min: -2.0,
        max: 2.0,
        step: 0.001,
    },
    ParameterDefinition::Int {
        name: "power",
        label: "Power",
        tooltip: "Exponent p of the iteration z \u{2190} z^p + c",
        default: 2,
        min: 2,
        max: 8,
        step: 1,
    },
];

const PRESETS: &[KernelPreset] = &[
    KernelPreset {
        name: "Classic Beauty",
        values: &[
            ("c_real", ParameterValue::Float(-0.745)),
            ("c_imag", ParameterValue::Float(0.113)),
        ],
    },
    KernelPreset {
        name: "Feigenbaum Point",
        values: &[
            ("c_real", ParameterValue::Float(-1.401155)),
            ("c_imag", ParameterValue::Float(0.0)),
        ],
    },
    KernelPreset {
        name: "Seahorse Valley",
        values: &[
            ("c_real", ParameterValue::Float(-0.75)),
            ("c_imag", ParameterValue::Float(0.1)),
        ],
    },
    KernelPreset {
        name: "Dragon Tail",
        values: &[
            ("c_real", ParameterValue::Float(-0.8)),
            ("c_imag", ParameterValue::Float(0.156)),
        ],
    },
    KernelPreset {
        name: "Electric Eel",
        values: &[
            ("c_real", ParameterValue::Float(-0.162)),
            ("c_imag", ParameterValue::Float(1.04)),
        ],
    },
    KernelPreset {
        name: "Snowflake",
        values: &[
            ("c_real", ParameterValue::Float(0.285)),
            ("c_imag", ParameterValue::Float(0.01)),
        ],
    },
    KernelPreset {
        name: "Spiral",
        values: &[
            ("c_real", ParameterValue::Float(-0.778)),
            ("c_imag", ParameterValue::Float(-0.136)),
        ],
    },
];

/// z ← zᵖ + c with z₀ the pixel coordinate and c a fixed constant.
#[derive(Debug, Default)]
pub struct JuliaKernel;

impl FractalKernel for JuliaKernel {
    fn name(&self) -> &'static str {
        "Julia"
    }

    fn parameter_definitions(&self) -> &'static [ParameterDefinition] {
        PARAMETERS
    }

    fn default_view(&self) -> DefaultView {
        DefaultView {
            center_real: 0.0,
            center_imag: 0.0,
            width: 3.0,
            max_iterations: 100,
        }
    }

    fn presets(&self) -> &'static [KernelPreset] {
        PRESETS
    }

    fn compute(
        &self,
        view: &ViewParams,
        params: &ParameterSet,
        width_px: u32,
        height_px: u32,
        cancel: &dyn CancelToken,
    ) -> Result<FractalField, ComputeError> {
        let c = Complex {
            real: params.float("c_real").unwrap_or(-0.745),
            imag: params.float("c_imag").unwrap_or(0.113),
        };
        let power = params.int("power").unwrap_or(2);
        let escape_sq = view.escape_radius_squared();
        let max_iterations = view.max_iterations;

        compute_grid(view, width_px, height_px, cancel, |z0| {
            if power == 2 {
                escape_iterate(z0, max_iterations, escape_sq, |z| z * z + c)
            } else {
                escape_iterate(z0, max_iterations, escape_sq, |z| z.powi(power) + c)
            }
        })
    }
}
