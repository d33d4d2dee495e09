pub mod config_io;
pub mod paths;
pub mod recovery;
pub mod state;
pub mod store_io;
