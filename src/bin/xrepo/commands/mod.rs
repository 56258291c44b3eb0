//! Command implementations

pub mod env;
pub mod repo_root;
pub mod scan;
pub mod version;
