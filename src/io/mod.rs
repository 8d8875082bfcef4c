pub mod fs_store;
pub mod lock;
pub mod recovery;
pub mod store;
pub mod workspace_io;
