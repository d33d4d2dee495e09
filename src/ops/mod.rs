pub mod task_ops;
pub mod views;
