use crate::core::data::fractal_field::FractalField;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::kernels::ComputeError;
use crate::engine::snapshot::RenderJob;
use crate::engine::CompositeError;
use crate::render::cancellation::CancelToken;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderTaskError {
    AlreadyRun,
    NoCachedField,
    Compute(ComputeError),
    Composite(CompositeError),
}

impl fmt::Display for RenderTaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRun => write!(f, "render task has already run"),
            Self::NoCachedField => {
                write!(f, "recolour requested but no cached fractal data exists")
            }
            Self::Compute(err) => write!(f, "{}", err),
            Self::Composite(err) => write!(f, "{}", err),
        }
    }
}

impl Error for RenderTaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Compute(err) => Some(err),
            Self::Composite(err) => Some(err),
            _ => None,
        }
    }
}

/// Finished frame plus the field it was coloured from, so the caller can
/// adopt the field back into the engine cache.
#[derive(Debug, Clone)]
pub struct FrameData {
    pub raster: RgbaBuffer,
    pub field: Arc<FractalField>,
    pub compute_duration: Duration,
    pub colouring_duration: Duration,
}

/// Single-shot render of one [`RenderJob`].
///
/// A full task recomputes the escape field; a recolour task reuses the
/// job's cached field and only reruns the colouring stages. Either way the
/// task runs at most once.
pub struct RenderTask {
    full_recompute: bool,
    state: TaskState,
}

impl RenderTask {
    #[must_use]
    pub fn new(full_recompute: bool) -> Self {
        Self {
            full_recompute,
            state: TaskState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn run(
        &mut self,
        job: &RenderJob,
        cancel: &dyn CancelToken,
    ) -> Result<FrameData, RenderTaskError> {
        if self.state != TaskState::Idle {
            return Err(RenderTaskError::AlreadyRun);
        }
        self.state = TaskState::Running;

        let result = self.render(job, cancel);
        self.state = match result {
            Ok(_) => TaskState::Completed,
            Err(_) => TaskState::Failed,
        };

        result
    }

    fn render(
        &self,
        job: &RenderJob,
        cancel: &dyn CancelToken,
    ) -> Result<FrameData, RenderTaskError> {
        let compute_start = Instant::now();
        let field = if self.full_recompute {
            job.compute(cancel).map_err(RenderTaskError::Compute)?
        } else {
            job.cached_field()
                .cloned()
                .ok_or(RenderTaskError::NoCachedField)?
        };
        let compute_duration = compute_start.elapsed();

        let colouring_start = Instant::now();
        let mut raster = RgbaBuffer::new(0, 0);
        job.colour_composite(&field, &mut raster)
            .map_err(RenderTaskError::Composite)?;
        let colouring_duration = colouring_start.elapsed();

        log::debug!(
            "rendered {}x{} frame, compute {:?}, colouring {:?}",
            field.width(),
            field.height(),
            compute_duration,
            colouring_duration
        );

        Ok(FrameData {
            raster,
            field,
            compute_duration,
            colouring_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::palette::manager::PaletteManager;
    use crate::core::registry::PluginRegistry;
    use crate::engine::FractalEngine;
    use crate::render::cancellation::NeverCancel;

    fn engine() -> FractalEngine {
        let mut engine = FractalEngine::new(
            Arc::new(PluginRegistry::builtin()),
            Arc::new(PaletteManager::empty()),
        )
        .unwrap();
        engine.set_image_size(8, 6);
        engine
    }

    #[test]
    fn test_full_render_produces_frame_and_field() {
        let job = engine().snapshot();
        let mut task = RenderTask::new(true);

        let frame = task.run(&job, &NeverCancel).unwrap();

        assert_eq!(task.state(), TaskState::Completed);
        assert_eq!(frame.raster.width(), 8);
        assert_eq!(frame.raster.height(), 6);
        assert_eq!(frame.field.width(), 8);
    }

    #[test]
    fn test_task_runs_at_most_once() {
        let job = engine().snapshot();
        let mut task = RenderTask::new(true);
        task.run(&job, &NeverCancel).unwrap();

        let second = task.run(&job, &NeverCancel);

        assert_eq!(second.unwrap_err(), RenderTaskError::AlreadyRun);
    }

    #[test]
    fn test_recolour_requires_cached_field() {
        let job = engine().snapshot();
        let mut task = RenderTask::new(false);

        let result = task.run(&job, &NeverCancel);

        assert_eq!(result.unwrap_err(), RenderTaskError::NoCachedField);
        assert_eq!(task.state(), TaskState::Failed);
    }

    #[test]
    fn test_recolour_reuses_cached_field() {
        let mut engine = engine();
        let field = engine.compute().unwrap();
        let job = engine.snapshot();

        let mut task = RenderTask::new(false);
        let frame = task.run(&job, &NeverCancel).unwrap();

        assert!(Arc::ptr_eq(&frame.field, &field));
    }

    #[test]
    fn test_cancelled_compute_fails_the_task() {
        let job = engine().snapshot();
        let mut task = RenderTask::new(true);
        let always = || true;

        let result = task.run(&job, &always);

        assert!(matches!(
            result,
            Err(RenderTaskError::Compute(ComputeError::Cancelled(_)))
        ));
        assert_eq!(task.state(), TaskState::Failed);
    }
}
