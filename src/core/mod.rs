pub mod colouring;
pub mod data;
pub mod kernels;
pub mod palette;
pub mod params;
pub mod registry;
