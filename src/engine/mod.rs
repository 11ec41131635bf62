pub mod config;
pub mod downsample;
pub mod output;
pub mod snapshot;

use crate::core::colouring::{ColouringAlgorithm, RegionTarget};
use crate::core::data::colour::Colour;
use crate::core::data::fractal_field::FractalField;
use crate::core::data::rgba_buffer::RgbaBuffer;
use crate::core::data::view_params::{ViewParams, ViewParamsError};
use crate::core::kernels::{ComputeError, FractalKernel};
use crate::core::palette::manager::PaletteManager;
use crate::core::palette::table::ColourTable;
use crate::core::params::definition::ParameterValue;
use crate::core::params::set::{ParameterError, ParameterSet};
use crate::core::registry::PluginRegistry;
use crate::render::cancellation::{Cancelled, NeverCancel};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

pub use snapshot::{ColouringJob, RenderJob};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositeError {
    ShapeMismatch {
        field_width: u32,
        field_height: u32,
        raster_width: u32,
        raster_height: u32,
    },
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                field_width,
                field_height,
                raster_width,
                raster_height,
            } => {
                write!(
                    f,
                    "target raster {}x{} does not match field {}x{}",
                    raster_width, raster_height, field_width, field_height
                )
            }
        }
    }
}

impl Error for CompositeError {}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    EmptyRegistry,
    KernelNotFound(String),
    ColouringNotFound { target: RegionTarget, name: String },
    InvalidSupersample(u32),
    EmptyOutput { width: u32, height: u32 },
    NoFractalData,
    View(ViewParamsError),
    Compute(ComputeError),
    Composite(CompositeError),
    Cancelled(Cancelled),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegistry => write!(f, "registry holds no usable plugins"),
            Self::KernelNotFound(name) => write!(f, "no kernel named `{}`", name),
            Self::ColouringNotFound { target, name } => {
                write!(f, "no {} colouring named `{}`", target, name)
            }
            Self::InvalidSupersample(factor) => {
                write!(f, "supersampling factor {} outside 1..=4", factor)
            }
            Self::EmptyOutput { width, height } => {
                write!(f, "cannot render a {}x{} output", width, height)
            }
            Self::NoFractalData => write!(f, "no computed fractal data available"),
            Self::View(err) => write!(f, "{}", err),
            Self::Compute(err) => write!(f, "{}", err),
            Self::Composite(err) => write!(f, "{}", err),
            Self::Cancelled(c) => write!(f, "{}", c),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::View(err) => Some(err),
            Self::Compute(err) => Some(err),
            Self::Composite(err) => Some(err),
            Self::Cancelled(c) => Some(c),
            _ => None,
        }
    }
}

impl From<ComputeError> for EngineError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::Cancelled(c) => Self::Cancelled(c),
            other => Self::Compute(other),
        }
    }
}

/// Palette choice of one region target, by pack and map name. Selections
/// that no longer resolve degrade to the algorithm's palette fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSelection {
    pub pack: String,
    pub map: String,
}

#[derive(Clone)]
pub(crate) struct ColouringState {
    pub algorithm: Arc<dyn ColouringAlgorithm>,
    pub params: ParameterSet,
    pub palette: Option<PaletteSelection>,
}

/// Runs one colouring stage into the caller's buffer. A failing algorithm is
/// contained here: the buffer comes back solid red and the error is logged,
/// matching the engine's error-raster contract.
pub fn apply_colouring(
    algorithm: &dyn ColouringAlgorithm,
    params: &ParameterSet,
    table: Option<&ColourTable>,
    field: &FractalField,
    out: &mut RgbaBuffer,
) {
    if out.width() != field.width() || out.height() != field.height() {
        out.resize(field.width(), field.height());
    }

    if let Err(err) = algorithm.apply(field, params, table, out) {
        log::error!("colouring `{}` failed: {}", algorithm.name(), err);
        out.fill(Colour::RED);
    }
}

/// Merges the two target rasters by the diverged mask.
pub fn composite(
    field: &FractalField,
    divergent: &RgbaBuffer,
    non_divergent: &RgbaBuffer,
    out: &mut RgbaBuffer,
) -> Result<(), CompositeError> {
    for raster in [divergent, non_divergent] {
        if raster.width() != field.width() || raster.height() != field.height() {
            return Err(CompositeError::ShapeMismatch {
                field_width: field.width(),
                field_height: field.height(),
                raster_width: raster.width(),
                raster_height: raster.height(),
            });
        }
    }

    if out.width() != field.width() || out.height() != field.height() {
        out.resize(field.width(), field.height());
    }

    for index in 0..field.pixel_count() {
        let source = if field.diverged(index) {
            divergent
        } else {
            non_divergent
        };
        let offset = index * 4;
        out.as_bytes_mut()[offset..offset + 4]
            .copy_from_slice(&source.as_bytes()[offset..offset + 4]);
    }

    Ok(())
}

/// Holds the whole render state: the plane window, the active kernel and one
/// colouring per region target, plus the cached compute result. All
/// collaborators are injected; the engine owns no global state.
pub struct FractalEngine {
    registry: Arc<PluginRegistry>,
    palettes: Arc<PaletteManager>,
    view: ViewParams,
    image_width: u32,
    image_height: u32,
    kernel: Arc<dyn FractalKernel>,
    kernel_params: ParameterSet,
    divergent: ColouringState,
    non_divergent: ColouringState,
    cache: Option<Arc<FractalField>>,
    scratch_divergent: RgbaBuffer,
    scratch_non_divergent: RgbaBuffer,
}

impl FractalEngine {
    /// Starts from the first registered kernel and the first registered
    /// colouring of each target.
    pub fn new(
        registry: Arc<PluginRegistry>,
        palettes: Arc<PaletteManager>,
    ) -> Result<Self, EngineError> {
        let kernel = registry
            .kernels()
            .next()
            .cloned()
            .ok_or(EngineError::EmptyRegistry)?;
        let divergent = registry
            .colourings(RegionTarget::Divergent)
            .next()
            .cloned()
            .ok_or(EngineError::EmptyRegistry)?;
        let non_divergent = registry
            .colourings(RegionTarget::NonDivergent)
            .next()
            .cloned()
            .ok_or(EngineError::EmptyRegistry)?;

        let default_view = kernel.default_view();
        let mut view = ViewParams {
            center_real: default_view.center_real,
            center_imag: default_view.center_imag,
            width: default_view.width,
            max_iterations: default_view.max_iterations,
            ..ViewParams::default()
        };
        let image_width = 800;
        let image_height = 600;
        view.update_aspect(image_width, image_height);

        let kernel_params = ParameterSet::from_definitions(kernel.parameter_definitions());
        let divergent = ColouringState {
            params: ParameterSet::from_definitions(divergent.parameter_definitions()),
            algorithm: divergent,
            palette: None,
        };
        let non_divergent = ColouringState {
            params: ParameterSet::from_definitions(non_divergent.parameter_definitions()),
            algorithm: non_divergent,
            palette: None,
        };

        Ok(Self {
            registry,
            palettes,
            view,
            image_width,
            image_height,
            kernel,
            kernel_params,
            divergent,
            non_divergent,
            cache: None,
            scratch_divergent: RgbaBuffer::new(0, 0),
            scratch_non_divergent: RgbaBuffer::new(0, 0),
        })
    }

    #[must_use]
    pub fn view(&self) -> &ViewParams {
        &self.view
    }

    #[must_use]
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    #[must_use]
    pub fn kernel_name(&self) -> &'static str {
        self.kernel.name()
    }

    #[must_use]
    pub fn colouring_name(&self, target: RegionTarget) -> &'static str {
        self.colouring_state(target).algorithm.name()
    }

    #[must_use]
    pub fn kernel_params(&self) -> &ParameterSet {
        &self.kernel_params
    }

    #[must_use]
    pub fn colouring_params(&self, target: RegionTarget) -> &ParameterSet {
        &self.colouring_state(target).params
    }

    #[must_use]
    pub fn palette_selection(&self, target: RegionTarget) -> Option<&PaletteSelection> {
        self.colouring_state(target).palette.as_ref()
    }

    pub(crate) fn colouring_state(&self, target: RegionTarget) -> &ColouringState {
        match target {
            RegionTarget::Divergent => &self.divergent,
            RegionTarget::NonDivergent => &self.non_divergent,
        }
    }

    fn colouring_state_mut(&mut self, target: RegionTarget) -> &mut ColouringState {
        match target {
            RegionTarget::Divergent => &mut self.divergent,
            RegionTarget::NonDivergent => &mut self.non_divergent,
        }
    }

    /// Invalid values are rejected as a unit: the view is unchanged unless
    /// every field validates.
    pub fn set_common_parameters(
        &mut self,
        center_real: f64,
        center_imag: f64,
        width: f64,
        max_iterations: u32,
        escape_radius: f64,
    ) -> Result<(), ViewParamsError> {
        if let Err(err) =
            ViewParams::validate(center_real, center_imag, width, max_iterations, escape_radius)
        {
            log::warn!("rejected common parameters: {}", err);
            return Err(err);
        }

        self.view.center_real = center_real;
        self.view.center_imag = center_imag;
        self.view.width = width;
        self.view.max_iterations = max_iterations;
        self.view.escape_radius = escape_radius;
        self.view.update_aspect(self.image_width, self.image_height);
        self.invalidate();

        Ok(())
    }

    pub fn set_image_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("ignored empty image size {}x{}", width, height);
            return;
        }

        self.image_width = width;
        self.image_height = height;
        self.view.update_aspect(width, height);
        self.invalidate();
    }

    /// Switching kernels adopts the kernel's default view and parameters.
    pub fn select_kernel(&mut self, name: &str) -> bool {
        let Some(kernel) = self.registry.kernel(name) else {
            log::warn!("no kernel named `{}`", name);
            return false;
        };

        let default_view = kernel.default_view();
        self.view.center_real = default_view.center_real;
        self.view.center_imag = default_view.center_imag;
        self.view.width = default_view.width;
        self.view.max_iterations = default_view.max_iterations;
        self.view.update_aspect(self.image_width, self.image_height);

        self.kernel_params = ParameterSet::from_definitions(kernel.parameter_definitions());
        self.kernel = kernel;
        self.invalidate();

        true
    }

    pub fn set_kernel_parameter(
        &mut self,
        name: &str,
        value: ParameterValue,
    ) -> Result<(), ParameterError> {
        self.kernel_params.set(name, value)?;
        self.invalidate();
        Ok(())
    }

    /// Applies a named kernel preset; unknown presets are a no-op.
    pub fn apply_kernel_preset(&mut self, preset_name: &str) -> bool {
        let Some(preset) = self
            .kernel
            .presets()
            .iter()
            .find(|p| p.name == preset_name)
        else {
            log::warn!(
                "kernel `{}` has no preset named `{}`",
                self.kernel.name(),
                preset_name
            );
            return false;
        };

        for (name, value) in preset.values {
            if let Err(err) = self.kernel_params.set(name, *value) {
                log::warn!("preset `{}`: {}", preset_name, err);
            }
        }
        self.invalidate();

        true
    }

    /// Colouring changes never invalidate the compute cache.
    pub fn select_colouring(&mut self, target: RegionTarget, name: &str) -> bool {
        let Some(algorithm) = self.registry.colouring(target, name) else {
            log::warn!("no {} colouring named `{}`", target, name);
            return false;
        };

        let state = self.colouring_state_mut(target);
        state.params = ParameterSet::from_definitions(algorithm.parameter_definitions());
        state.algorithm = algorithm;

        true
    }

    pub fn set_colouring_parameter(
        &mut self,
        target: RegionTarget,
        name: &str,
        value: ParameterValue,
    ) -> Result<(), ParameterError> {
        self.colouring_state_mut(target).params.set(name, value)
    }

    pub fn select_palette(&mut self, target: RegionTarget, pack: &str, map: &str) -> bool {
        if self.palettes.table(pack, map).is_none() {
            log::warn!("no colour map `{}` in pack `{}`", map, pack);
            return false;
        }

        self.colouring_state_mut(target).palette = Some(PaletteSelection {
            pack: pack.to_string(),
            map: map.to_string(),
        });

        true
    }

    pub fn clear_palette(&mut self, target: RegionTarget) {
        self.colouring_state_mut(target).palette = None;
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    #[must_use]
    pub fn cached_field(&self) -> Option<&Arc<FractalField>> {
        self.cache.as_ref()
    }

    /// Installs a field computed elsewhere (the async completion path).
    pub fn adopt_field(&mut self, field: Arc<FractalField>) {
        self.cache = Some(field);
    }

    /// Returns the cached field, computing it first when stale.
    pub fn compute(&mut self) -> Result<Arc<FractalField>, ComputeError> {
        if let Some(field) = &self.cache {
            return Ok(Arc::clone(field));
        }

        let field = Arc::new(self.kernel.compute(
            &self.view,
            &self.kernel_params,
            self.image_width,
            self.image_height,
            &NeverCancel,
        )?);
        self.cache = Some(Arc::clone(&field));

        Ok(field)
    }

    pub(crate) fn resolve_table(&self, target: RegionTarget) -> Option<&ColourTable> {
        self.colouring_state(target)
            .palette
            .as_ref()
            .and_then(|selection| self.palettes.table(&selection.pack, &selection.map))
    }

    /// Colours one region target into the caller's buffer. Algorithm
    /// failures come back as a solid red raster, never as an error.
    pub fn colour_target(&self, field: &FractalField, target: RegionTarget, out: &mut RgbaBuffer) {
        let state = self.colouring_state(target);
        apply_colouring(
            state.algorithm.as_ref(),
            &state.params,
            self.resolve_table(target),
            field,
            out,
        );
    }

    /// Compute + colour both targets + composite, using the engine's reused
    /// scratch rasters.
    pub fn render_frame(&mut self, out: &mut RgbaBuffer) -> Result<(), EngineError> {
        let field = self.compute()?;

        let mut div = std::mem::replace(&mut self.scratch_divergent, RgbaBuffer::new(0, 0));
        let mut non = std::mem::replace(&mut self.scratch_non_divergent, RgbaBuffer::new(0, 0));

        self.colour_target(&field, RegionTarget::Divergent, &mut div);
        self.colour_target(&field, RegionTarget::NonDivergent, &mut non);
        let result = composite(&field, &div, &non, out).map_err(EngineError::Composite);

        self.scratch_divergent = div;
        self.scratch_non_divergent = non;

        result
    }
}
