//! Shared utilities

pub mod config;
pub mod context;
pub mod fs;
pub mod process;

pub use config::Config;
pub use context::GoEnv;
pub use fs::{FileSystem, RealFs};
