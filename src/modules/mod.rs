//! Workspace module management.
//!
//! Go tooling only understands sources that belong to a module. Before a
//! workspace folder is handed to the type checker, [`ModuleManager`] finds
//! the module roots already present, creates module files for directories
//! that still use a pre-module dependency manifest, covers the remaining
//! loose sources with one synthetic module, and optionally downloads
//! dependencies.

pub mod manager;
pub mod manifest;
pub mod module_path;
pub mod scan;
pub mod toolchain;
pub mod vendor;

pub use manager::{cleanup_folders, workspace_folder, ModuleManager, ModuleOrigin, ModuleRoot};
pub use scan::ScanError;
pub use toolchain::{GoCommand, GoToolchain};
pub use vendor::VendorRegistry;
