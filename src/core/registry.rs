use crate::core::colouring::convergence::ConvergenceSpeedColouring;
use crate::core::colouring::grayscale::GrayscaleColouring;
use crate::core::colouring::iteration_bands::IterationBandsColouring;
use crate::core::colouring::magnitude::FinalMagnitudeColouring;
use crate::core::colouring::potential::ComplexPotentialColouring;
use crate::core::colouring::smooth::SmoothColouring;
use crate::core::colouring::{ColouringAlgorithm, RegionTarget};
use crate::core::kernels::FractalKernel;
use crate::core::kernels::julia::JuliaKernel;
use crate::core::kernels::mandelbrot::MandelbrotKernel;
use std::sync::Arc;

/// Compile-time plugin table. Kernels and colouring algorithms register
/// through `builtin`; there is no runtime discovery. Colouring lookups are
/// scoped by region target, so the same name can exist once per target.
#[derive(Default)]
pub struct PluginRegistry {
    kernels: Vec<Arc<dyn FractalKernel>>,
    colourings: Vec<Arc<dyn ColouringAlgorithm>>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in registration routine; `reload` re-runs it.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register_kernel(Arc::new(MandelbrotKernel));
        registry.register_kernel(Arc::new(JuliaKernel));

        registry.register_colouring(Arc::new(GrayscaleColouring));
        registry.register_colouring(Arc::new(IterationBandsColouring));
        registry.register_colouring(Arc::new(SmoothColouring));
        registry.register_colouring(Arc::new(ComplexPotentialColouring));
        registry.register_colouring(Arc::new(FinalMagnitudeColouring));
        registry.register_colouring(Arc::new(ConvergenceSpeedColouring));

        registry
    }

    /// First registration of a name wins; later duplicates are discarded.
    pub fn register_kernel(&mut self, kernel: Arc<dyn FractalKernel>) {
        if self.kernels.iter().any(|k| k.name() == kernel.name()) {
            log::warn!("kernel `{}` already registered, ignoring duplicate", kernel.name());
            return;
        }

        self.kernels.push(kernel);
    }

    /// First registration of a (name, target) pair wins.
    pub fn register_colouring(&mut self, colouring: Arc<dyn ColouringAlgorithm>) {
        let duplicate = self
            .colourings
            .iter()
            .any(|c| c.name() == colouring.name() && c.target() == colouring.target());

        if duplicate {
            log::warn!(
                "{} colouring `{}` already registered, ignoring duplicate",
                colouring.target(),
                colouring.name()
            );
            return;
        }

        self.colourings.push(colouring);
    }

    #[must_use]
    pub fn kernel(&self, name: &str) -> Option<Arc<dyn FractalKernel>> {
        self.kernels.iter().find(|k| k.name() == name).cloned()
    }

    /// Lookup scoped by target: a name registered under the other target is
    /// not found.
    #[must_use]
    pub fn colouring(
        &self,
        target: RegionTarget,
        name: &str,
    ) -> Option<Arc<dyn ColouringAlgorithm>> {
        self.colourings
            .iter()
            .find(|c| c.name() == name && c.target() == target)
            .cloned()
    }

    pub fn kernels(&self) -> impl Iterator<Item = &Arc<dyn FractalKernel>> {
        self.kernels.iter()
    }

    pub fn kernel_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kernels.iter().map(|k| k.name())
    }

    pub fn colourings(
        &self,
        target: RegionTarget,
    ) -> impl Iterator<Item = &Arc<dyn ColouringAlgorithm>> {
        self.colourings
            .iter()
            .filter(move |c| c.target() == target)
    }

    pub fn colouring_names(&self, target: RegionTarget) -> impl Iterator<Item = &'static str> + '_ {
        self.colourings(target).map(|c| c.name())
    }

    /// Rebuilds the table by re-running the registration routine.
    pub fn reload(&mut self) {
        *self = Self::builtin();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::colouring::ColouringError;
    use crate::core::data::fractal_field::FractalField;
    use crate::core::data::rgba_buffer::RgbaBuffer;
    use crate::core::palette::table::ColourTable;
    use crate::core::params::definition::ParameterDefinition;
    use crate::core::params::set::ParameterSet;

    #[derive(Debug)]
    struct StubColouring {
        name: &'static str,
        target: RegionTarget,
    }

    impl ColouringAlgorithm for StubColouring {
        fn name(&self) -> &'static str {
            self.name
        }

        fn target(&self) -> RegionTarget {
            self.target
        }

        fn parameter_definitions(&self) -> &'static [ParameterDefinition] {
            &[]
        }

        fn apply(
            &self,
            _field: &FractalField,
            _params: &ParameterSet,
            _palette: Option<&ColourTable>,
            _out: &mut RgbaBuffer,
        ) -> Result<(), ColouringError> {
            Ok(())
        }
    }

    #[test]
    fn test_builtin_registers_both_kernels() {
        let registry = PluginRegistry::builtin();

        assert_eq!(
            registry.kernel_names().collect::<Vec<_>>(),
            vec!["Mandelbrot", "Julia"]
        );
    }

    #[test]
    fn test_builtin_splits_colourings_by_target() {
        let registry = PluginRegistry::builtin();

        assert_eq!(
            registry
                .colouring_names(RegionTarget::Divergent)
                .collect::<Vec<_>>(),
            vec!["Grayscale", "Iteration Bands", "Smooth Iterations"]
        );
        assert_eq!(
            registry
                .colouring_names(RegionTarget::NonDivergent)
                .collect::<Vec<_>>(),
            vec!["Complex Potential", "Final Magnitude", "Convergence Speed"]
        );
    }

    #[test]
    fn test_colouring_lookup_is_target_scoped() {
        let registry = PluginRegistry::builtin();

        assert!(
            registry
                .colouring(RegionTarget::Divergent, "Grayscale")
                .is_some()
        );
        assert!(
            registry
                .colouring(RegionTarget::NonDivergent, "Grayscale")
                .is_none()
        );
    }

    #[test]
    fn test_unknown_names_are_not_found() {
        let registry = PluginRegistry::builtin();

        assert!(registry.kernel("Burning Ship").is_none());
        assert!(
            registry
                .colouring(RegionTarget::Divergent, "Histogram")
                .is_none()
        );
    }

    #[test]
    fn test_duplicate_colouring_first_wins() {
        let mut registry = PluginRegistry::new();
        registry.register_colouring(Arc::new(StubColouring {
            name: "Twin",
            target: RegionTarget::Divergent,
        }));
        registry.register_colouring(Arc::new(StubColouring {
            name: "Twin",
            target: RegionTarget::Divergent,
        }));

        assert_eq!(
            registry
                .colouring_names(RegionTarget::Divergent)
                .collect::<Vec<_>>(),
            vec!["Twin"]
        );
    }

    #[test]
    fn test_same_name_may_exist_once_per_target() {
        let mut registry = PluginRegistry::new();
        registry.register_colouring(Arc::new(StubColouring {
            name: "Twin",
            target: RegionTarget::Divergent,
        }));
        registry.register_colouring(Arc::new(StubColouring {
            name: "Twin",
            target: RegionTarget::NonDivergent,
        }));

        assert!(registry.colouring(RegionTarget::Divergent, "Twin").is_some());
        assert!(
            registry
                .colouring(RegionTarget::NonDivergent, "Twin")
                .is_some()
        );
    }

    #[test]
    fn test_reload_restores_builtins() {
        let mut registry = PluginRegistry::builtin();
        registry.register_colouring(Arc::new(StubColouring {
            name: "Extra",
            target: RegionTarget::Divergent,
        }));
        assert!(registry.colouring(RegionTarget::Divergent, "Extra").is_some());

        registry.reload();

        assert!(registry.colouring(RegionTarget::Divergent, "Extra").is_none());
        assert!(registry.kernel("Mandelbrot").is_some());
    }
}
