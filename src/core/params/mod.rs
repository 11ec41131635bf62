pub mod definition;
pub mod set;
