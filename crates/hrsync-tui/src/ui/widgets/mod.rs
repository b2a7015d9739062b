pub mod badge;
pub mod config;
pub mod directory;
pub mod sync_center;
