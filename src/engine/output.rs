use crate::core::colouring::RegionTarget;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::data::view_params::ViewParams;
use crate::core::kernels::FractalKernel;
use crate::core::params::definition::ParameterValue;
use crate::core::params::set::ParameterSet;
use crate::engine::snapshot::ColouringJob;
use crate::engine::{EngineError, FractalEngine, PaletteSelection, composite, downsample::downsample_box};
use crate::render::cancellation::{CancelToken, Cancelled};
use std::sync::Arc;

/// Per-target overrides of an output render. Unset fields fall back to the
/// engine's current settings.
#[derive(Default)]
pub struct TargetOverride {
    pub algorithm: Option<String>,
    pub params: Vec<(String, ParameterValue)>,
    pub palette: Option<PaletteSelection>,
}

/// Describes a high-resolution output render. Built by callers, resolved
/// against the live engine by [`FractalEngine::prepare_output`].
pub struct OutputRequest {
    pub output_width: u32,
    pub output_height: u32,
    pub supersample: u32,
    pub max_iterations: Option<u32>,
    pub kernel: Option<String>,
    pub kernel_params: Vec<(String, ParameterValue)>,
    pub divergent: TargetOverride,
    pub non_divergent: TargetOverride,
}

impl OutputRequest {
    #[must_use]
    pub fn new(output_width: u32, output_height: u32) -> Self {
        Self {
            output_width,
            output_height,
            supersample: 1,
            max_iterations: None,
            kernel: None,
            kernel_params: Vec::new(),
            divergent: TargetOverride::default(),
            non_divergent: TargetOverride::default(),
        }
    }
}

/// Fully resolved output render: every plugin looked up, every override
/// merged. Self-contained, so it can run on a worker thread.
pub struct OutputJob {
    pub width_px: u32,
    pub height_px: u32,
    pub supersample: u32,
    pub view: ViewParams,
    pub kernel: Arc<dyn FractalKernel>,
    pub kernel_params: ParameterSet,
    pub divergent: ColouringJob,
    pub non_divergent: ColouringJob,
}

impl FractalEngine {
    /// Resolves an output request against the current engine state.
    ///
    /// Override merging: requesting the active kernel or algorithm starts
    /// from its current parameter values; requesting a different one starts
    /// from that plugin's defaults. Individual parameter overrides that fail
    /// validation are logged and skipped.
    pub fn prepare_output(&self, request: &OutputRequest) -> Result<OutputJob, EngineError> {
        if !(1..=4).contains(&request.supersample) {
            return Err(EngineError::InvalidSupersample(request.supersample));
        }
        if request.output_width == 0 || request.output_height == 0 {
            return Err(EngineError::EmptyOutput {
                width: request.output_width,
                height: request.output_height,
            });
        }

        let (kernel, mut kernel_params) = match &request.kernel {
            None => (Arc::clone(&self.kernel), self.kernel_params.clone()),
            Some(name) => {
                let kernel = self
                    .registry
                    .kernel(name)
                    .ok_or_else(|| EngineError::KernelNotFound(name.clone()))?;
                let params = if kernel.name() == self.kernel.name() {
                    self.kernel_params.clone()
                } else {
                    ParameterSet::from_definitions(kernel.parameter_definitions())
                };
                (kernel, params)
            }
        };
        for (name, value) in &request.kernel_params {
            if let Err(err) = kernel_params.set(name, *value) {
                log::warn!("output kernel parameter ignored: {}", err);
            }
        }

        let divergent = self.output_colouring(RegionTarget::Divergent, &request.divergent)?;
        let non_divergent =
            self.output_colouring(RegionTarget::NonDivergent, &request.non_divergent)?;

        let mut view = self.view;
        if let Some(max_iterations) = request.max_iterations {
            if max_iterations > 0 {
                view.max_iterations = max_iterations;
            } else {
                log::warn!("output max_iterations of 0 ignored");
            }
        }
        view.update_aspect(request.output_width, request.output_height);

        Ok(OutputJob {
            width_px: request.output_width,
            height_px: request.output_height,
            supersample: request.supersample,
            view,
            kernel,
            kernel_params,
            divergent,
            non_divergent,
        })
    }

    fn output_colouring(
        &self,
        target: RegionTarget,
        overrides: &TargetOverride,
    ) -> Result<ColouringJob, EngineError> {
        let current = self.colouring_state(target);

        let (algorithm, mut params) = match &overrides.algorithm {
            None => (Arc::clone(&current.algorithm), current.params.clone()),
            Some(name) => {
                let algorithm = self.registry.colouring(target, name).ok_or_else(|| {
                    EngineError::ColouringNotFound {
                        target,
                        name: name.clone(),
                    }
                })?;
                let params = if algorithm.name() == current.algorithm.name() {
                    current.params.clone()
                } else {
                    ParameterSet::from_definitions(algorithm.parameter_definitions())
                };
                (algorithm, params)
            }
        };
        for (name, value) in &overrides.params {
            if let Err(err) = params.set(name, *value) {
                log::warn!("output {} colouring parameter ignored: {}", target, err);
            }
        }

        let selection = overrides.palette.as_ref().or(current.palette.as_ref());
        let table = selection
            .and_then(|s| self.palettes.table(&s.pack, &s.map))
            .cloned();

        Ok(ColouringJob {
            algorithm,
            params,
            table,
        })
    }
}

/// Runs a resolved output job: compute at `supersample` times the requested
/// resolution, colour, composite, then box-filter down to the output size.
/// Cancellation is honoured inside the compute loop and between phases.
pub fn render_output(job: &OutputJob, cancel: &dyn CancelToken) -> Result<RgbaBuffer, EngineError> {
    let ss_width = job.width_px * job.supersample;
    let ss_height = job.height_px * job.supersample;

    let field = job
        .kernel
        .compute(&job.view, &job.kernel_params, ss_width, ss_height, cancel)?;
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled(Cancelled));
    }

    let mut div = RgbaBuffer::new(0, 0);
    let mut non = RgbaBuffer::new(0, 0);
    job.divergent.colour(&field, &mut div);
    job.non_divergent.colour(&field, &mut non);
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled(Cancelled));
    }

    let mut combined = RgbaBuffer::new(0, 0);
    composite(&field, &div, &non, &mut combined).map_err(EngineError::Composite)?;

    Ok(downsample_box(&combined, job.supersample))
}
