pub mod cancellation;
pub mod export;
pub mod scheduler;
pub mod task;
