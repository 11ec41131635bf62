pub mod core;
pub mod engine;
pub mod render;

pub use crate::core::colouring::{ColouringAlgorithm, RegionTarget};
pub use crate::core::data::rgba_buffer::RgbaBuffer;
pub use crate::core::data::view_params::ViewParams;
pub use crate::core::kernels::FractalKernel;
pub use crate::core::palette::manager::PaletteManager;
pub use crate::core::registry::PluginRegistry;
pub use crate::engine::config::EngineConfig;
pub use crate::engine::output::OutputRequest;
pub use crate::engine::{FractalEngine, RenderJob};
pub use crate::render::scheduler::RenderScheduler;
