pub mod manager;
pub(crate) mod pack;
pub mod table;
