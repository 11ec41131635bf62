pub mod colour;
pub mod complex;
pub mod fractal_field;
pub mod rgba_buffer;
pub mod view_params;
