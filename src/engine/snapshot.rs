use crate::core::colouring::{ColouringAlgorithm, RegionTarget};
use crate::core::data::fractal_field::FractalField;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::data::view_params::ViewParams;
use crate::core::kernels::{ComputeError, FractalKernel};
use crate::core::palette::table::ColourTable;
use crate::core::params::set::ParameterSet;
use crate::engine::{CompositeError, FractalEngine, apply_colouring, composite};
use crate::render::cancellation::CancelToken;
use std::sync::Arc;

/// One colouring stage of a [`RenderJob`]: the algorithm, its parameter
/// values and the already-resolved palette table.
#[derive(Clone)]
pub struct ColouringJob {
    pub algorithm: Arc<dyn ColouringAlgorithm>,
    pub params: ParameterSet,
    pub table: Option<ColourTable>,
}

impl ColouringJob {
    pub fn colour(&self, field: &FractalField, out: &mut RgbaBuffer) {
        apply_colouring(
            self.algorithm.as_ref(),
            &self.params,
            self.table.as_ref(),
            field,
            out,
        );
    }
}

/// Immutable capture of everything a worker thread needs to render a frame.
///
/// The snapshot shares plugins by `Arc` and clones parameter values, so the
/// engine can keep mutating after `snapshot()` without racing the worker.
#[derive(Clone)]
pub struct RenderJob {
    pub view: ViewParams,
    pub width_px: u32,
    pub height_px: u32,
    pub kernel: Arc<dyn FractalKernel>,
    pub kernel_params: ParameterSet,
    pub divergent: ColouringJob,
    pub non_divergent: ColouringJob,
    cache: Option<Arc<FractalField>>,
}

impl RenderJob {
    /// The compute cache as it stood at snapshot time, if any.
    #[must_use]
    pub fn cached_field(&self) -> Option<&Arc<FractalField>> {
        self.cache.as_ref()
    }

    /// Recomputes the escape field at the snapshot's raster size.
    pub fn compute(&self, cancel: &dyn CancelToken) -> Result<Arc<FractalField>, ComputeError> {
        let field = self.kernel.compute(
            &self.view,
            &self.kernel_params,
            self.width_px,
            self.height_px,
            cancel,
        )?;

        Ok(Arc::new(field))
    }

    /// Colours both targets and merges them into `out`.
    pub fn colour_composite(
        &self,
        field: &FractalField,
        out: &mut RgbaBuffer,
    ) -> Result<(), CompositeError> {
        let mut div = RgbaBuffer::new(0, 0);
        let mut non = RgbaBuffer::new(0, 0);
        self.divergent.colour(field, &mut div);
        self.non_divergent.colour(field, &mut non);

        composite(field, &div, &non, out)
    }
}

impl FractalEngine {
    /// Captures the current render state for a worker thread.
    #[must_use]
    pub fn snapshot(&self) -> RenderJob {
        let colouring_job = |target: RegionTarget| {
            let state = self.colouring_state(target);
            ColouringJob {
                algorithm: Arc::clone(&state.algorithm),
                params: state.params.clone(),
                table: self.resolve_table(target).cloned(),
            }
        };

        RenderJob {
            view: self.view,
            width_px: self.image_width,
            height_px: self.image_height,
            kernel: Arc::clone(&self.kernel),
            kernel_params: self.kernel_params.clone(),
            divergent: colouring_job(RegionTarget::Divergent),
            non_divergent: colouring_job(RegionTarget::NonDivergent),
            cache: self.cache.clone(),
        }
    }
}
