pub mod check;
pub mod ids;
pub mod nav_ops;
pub mod task_ops;
