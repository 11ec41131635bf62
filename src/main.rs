use fractal_forge::{
    FractalEngine, OutputRequest, PaletteManager, PluginRegistry, RegionTarget,
};
use fractal_forge::render::cancellation::NeverCancel;
use fractal_forge::render::export::run_export;
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let registry = Arc::new(PluginRegistry::builtin());
    let palettes = Arc::new(PaletteManager::load_dir("palettes"));

    let mut engine = FractalEngine::new(registry, palettes)?;
    engine.set_image_size(800, 600);
    engine.select_colouring(RegionTarget::Divergent, "Smooth Iterations");

    let mut request = OutputRequest::new(800, 600);
    request.supersample = 2;
    let job = engine.prepare_output(&request)?;

    std::fs::create_dir_all("output")?;
    run_export(&job, Path::new("output/mandelbrot.png"), &NeverCancel)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_pipeline_writes_png() {
        let registry = Arc::new(PluginRegistry::builtin());
        let palettes = Arc::new(PaletteManager::load_dir("palettes"));

        let mut engine = FractalEngine::new(registry, palettes).unwrap();
        engine.set_image_size(32, 24);
        engine.select_colouring(RegionTarget::Divergent, "Smooth Iterations");

        let mut request = OutputRequest::new(32, 24);
        request.max_iterations = Some(20);
        let job = engine.prepare_output(&request).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mandelbrot.png");
        run_export(&job, &path, &NeverCancel).unwrap();

        assert!(path.is_file());
    }
}
