pub mod config;
pub mod defaults;
pub mod document;
pub mod nav;
pub mod task;

pub use config::*;
pub use document::*;
pub use nav::*;
pub use task::*;
