use crate::engine::output::OutputJob;
use crate::engine::snapshot::RenderJob;
use crate::render::export::{ExportError, run_export};
use crate::render::task::{FrameData, RenderTask, RenderTaskError};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    RenderInFlight,
    ExportInFlight,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenderInFlight => write!(f, "a full render is already in flight"),
            Self::ExportInFlight => write!(f, "an export is already in flight"),
        }
    }
}

impl Error for SubmitError {}

/// Handle to a render running on a worker thread. The generation lets the
/// caller drop frames that were submitted before a newer one.
#[derive(Debug)]
pub struct PendingFrame {
    pub generation: u64,
    pub receiver: Receiver<Result<FrameData, RenderTaskError>>,
}

/// Handle to an export running on a worker thread, with its cancel switch.
#[derive(Debug)]
pub struct PendingExport {
    pub generation: u64,
    pub receiver: Receiver<Result<(), ExportError>>,
    cancel: Arc<AtomicBool>,
}

impl PendingExport {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Hands render jobs to worker threads and enforces the concurrency rules:
/// at most one full render and one export at a time. Previews always run,
/// and exports never contend with the interactive pipeline.
#[derive(Default)]
pub struct RenderScheduler {
    full_in_flight: Arc<AtomicBool>,
    export_in_flight: Arc<AtomicBool>,
    generation: AtomicU64,
}

impl RenderScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_render_in_flight(&self) -> bool {
        self.full_in_flight.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_export_in_flight(&self) -> bool {
        self.export_in_flight.load(Ordering::Acquire)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Starts a full-quality render on a worker thread. Rejected while
    /// another full render is running; the prior task keeps going.
    pub fn submit_full(&self, job: RenderJob) -> Result<PendingFrame, SubmitError> {
        if self
            .full_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::RenderInFlight);
        }

        let generation = self.next_generation();
        let flag = Arc::clone(&self.full_in_flight);
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let mut task = RenderTask::new(true);
            let result = task.run(&job, &crate::render::cancellation::NeverCancel);
            flag.store(false, Ordering::Release);
            let _ = sender.send(result);
        });

        Ok(PendingFrame {
            generation,
            receiver,
        })
    }

    /// Starts a preview render. Previews are never gated; they may overlap
    /// a full render, an export and each other.
    pub fn submit_preview(&self, job: RenderJob, full_recompute: bool) -> PendingFrame {
        let generation = self.next_generation();
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let mut task = RenderTask::new(full_recompute);
            let result = task.run(&job, &crate::render::cancellation::NeverCancel);
            let _ = sender.send(result);
        });

        PendingFrame {
            generation,
            receiver,
        }
    }

    /// Starts an export on a worker thread. Exports do not contend with
    /// interactive renders; only a second export is rejected.
    pub fn submit_export(
        &self,
        job: OutputJob,
        path: PathBuf,
    ) -> Result<PendingExport, SubmitError> {
        if self
            .export_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::ExportInFlight);
        }

        let generation = self.next_generation();
        let flag = Arc::clone(&self.export_in_flight);
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let token = move || cancel_flag.load(Ordering::Relaxed);
            let result = run_export(&job, &path, &token);
            flag.store(false, Ordering::Release);
            let _ = sender.send(result);
        });

        Ok(PendingExport {
            generation,
            receiver,
            cancel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::complex::Complex;
    use crate::core::data::fractal_field::FractalField;
    use crate::core::data::view_params::ViewParams;
    use crate::core::kernels::{ComputeError, DefaultView, FractalKernel};
    use crate::core::palette::manager::PaletteManager;
    use crate::core::params::definition::ParameterDefinition;
    use crate::core::params::set::ParameterSet;
    use crate::core::registry::PluginRegistry;
    use crate::engine::output::OutputRequest;
    use crate::engine::FractalEngine;
    use crate::render::cancellation::{CancelToken, Cancelled};
    use std::time::Duration;

    /// Spins until released, so tests can hold a worker busy deterministically.
    struct BlockingKernel {
        release: Arc<AtomicBool>,
    }

    impl FractalKernel for BlockingKernel {
        fn name(&self) -> &'static str {
            "Blocking"
        }

        fn parameter_definitions(&self) -> &'static [ParameterDefinition] {
            &[]
        }

        fn default_view(&self) -> DefaultView {
            DefaultView {
                center_real: 0.0,
                center_imag: 0.0,
                width: 3.0,
                max_iterations: 10,
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
            loop {
                if cancel.is_cancelled() {
                    return Err(ComputeError::Cancelled(Cancelled));
                }
                if self.release.load(Ordering::Relaxed) {
                    break;
                }
                thread::sleep(Duration::from_millis(1));
            }

            let count = width_px as usize * height_px as usize;
            FractalField::new(
                width_px,
                height_px,
                view.max_iterations,
                view.escape_radius,
                vec![0; count],
                vec![Complex::ZERO; count],
                vec![9.0; count],
            )
            .map_err(ComputeError::Field)
        }
    }

    fn blocking_engine(release: &Arc<AtomicBool>) -> FractalEngine {
        let mut registry = PluginRegistry::new();
        registry.register_kernel(Arc::new(BlockingKernel {
            release: Arc::clone(release),
        }));
        registry.register_colouring(Arc::new(
            crate::core::colouring::grayscale::GrayscaleColouring,
        ));
        registry.register_colouring(Arc::new(
            crate::core::colouring::potential::ComplexPotentialColouring,
        ));

        let mut engine =
            FractalEngine::new(Arc::new(registry), Arc::new(PaletteManager::empty())).unwrap();
        engine.set_image_size(4, 3);
        engine
    }

    fn quick_engine() -> FractalEngine {
        let mut engine = FractalEngine::new(
            Arc::new(PluginRegistry::builtin()),
            Arc::new(PaletteManager::empty()),
        )
        .unwrap();
        engine.set_image_size(8, 6);
        engine
    }

    #[test]
    fn test_second_full_render_is_rejected_while_busy() {
        let release = Arc::new(AtomicBool::new(false));
        let engine = blocking_engine(&release);
        let scheduler = RenderScheduler::new();

        let pending = scheduler.submit_full(engine.snapshot()).unwrap();
        let second = scheduler.submit_full(engine.snapshot());
        assert_eq!(second.unwrap_err(), SubmitError::RenderInFlight);

        release.store(true, Ordering::Relaxed);
        pending.receiver.recv().unwrap().unwrap();

        assert!(scheduler.submit_full(engine.snapshot()).is_ok());
    }

    #[test]
    fn test_preview_runs_while_full_render_in_flight() {
        let release = Arc::new(AtomicBool::new(false));
        let blocking = blocking_engine(&release);
        let scheduler = RenderScheduler::new();
        let full = scheduler.submit_full(blocking.snapshot()).unwrap();

        let preview = scheduler.submit_preview(quick_engine().snapshot(), true);
        let frame = preview.receiver.recv().unwrap().unwrap();
        assert_eq!(frame.raster.width(), 8);

        release.store(true, Ordering::Relaxed);
        full.receiver.recv().unwrap().unwrap();
    }

    #[test]
    fn test_full_render_runs_while_export_in_flight() {
        let release = Arc::new(AtomicBool::new(false));
        let blocking = blocking_engine(&release);
        let scheduler = RenderScheduler::new();
        let dir = tempfile::tempdir().unwrap();

        let job = blocking.prepare_output(&OutputRequest::new(4, 3)).unwrap();
        let export = scheduler
            .submit_export(job, dir.path().join("out.png"))
            .unwrap();

        let full = scheduler.submit_full(quick_engine().snapshot()).unwrap();
        let frame = full.receiver.recv().unwrap().unwrap();
        assert_eq!(frame.raster.width(), 8);

        release.store(true, Ordering::Relaxed);
        export.receiver.recv().unwrap().unwrap();
    }

    #[test]
    fn test_second_export_is_rejected_while_busy() {
        let release = Arc::new(AtomicBool::new(false));
        let engine = blocking_engine(&release);
        let scheduler = RenderScheduler::new();
        let dir = tempfile::tempdir().unwrap();

        let job = engine.prepare_output(&OutputRequest::new(4, 3)).unwrap();
        let first = scheduler
            .submit_export(job, dir.path().join("a.png"))
            .unwrap();

        let job = engine.prepare_output(&OutputRequest::new(4, 3)).unwrap();
        let second = scheduler.submit_export(job, dir.path().join("b.png"));
        assert_eq!(second.unwrap_err(), SubmitError::ExportInFlight);

        release.store(true, Ordering::Relaxed);
        first.receiver.recv().unwrap().unwrap();
    }

    #[test]
    fn test_export_cancellation_reaches_the_worker() {
        let release = Arc::new(AtomicBool::new(false));
        let engine = blocking_engine(&release);
        let scheduler = RenderScheduler::new();
        let dir = tempfile::tempdir().unwrap();

        let job = engine.prepare_output(&OutputRequest::new(4, 3)).unwrap();
        let export = scheduler
            .submit_export(job, dir.path().join("out.png"))
            .unwrap();
        export.cancel();

        let result = export.receiver.recv().unwrap();
        assert!(matches!(result, Err(ExportError::Cancelled(_))));
    }

    #[test]
    fn test_generations_are_strictly_increasing() {
        let engine = quick_engine();
        let scheduler = RenderScheduler::new();

        let first = scheduler.submit_preview(engine.snapshot(), true);
        let second = scheduler.submit_preview(engine.snapshot(), true);

        assert!(second.generation > first.generation);
        first.receiver.recv().unwrap().unwrap();
        second.receiver.recv().unwrap().unwrap();
    }
}
