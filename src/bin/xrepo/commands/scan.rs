//! `xrepo scan` command

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::cli::ScanArgs;
use xrepo::modules::workspace_folder;
use xrepo::server::Session;
use xrepo::util::config::{global_config_path, load_config, project_config_path};

pub fn execute(args: ScanArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let mut config = load_config(global_config_path().as_deref(), &project_config_path(&cwd));
    if args.install_deps {
        config.install_go_dependency = true;
    }

    let mut folders = Vec::new();
    for path in &args.folders {
        let dir = path
            .canonicalize()
            .with_context(|| format!("failed to access {}", path.display()))?;
        if !dir.is_dir() {
            return Err(anyhow!("not a directory: {}", dir.display()));
        }
        let folder = workspace_folder(&dir)
            .ok_or_else(|| anyhow!("cannot express {} as a workspace folder", dir.display()))?;
        folders.push(folder);
    }

    let session = Session::new(config);
    for folder in &folders {
        eprintln!("    Scanning {}", folder.uri.path());
    }
    let managed = session.manage_deps(folders, None);

    for folder in &managed {
        let Ok(dir) = folder.uri.to_file_path() else {
            continue;
        };
        if session.vendor_registry().contains(&dir) {
            println!("{} (vendor)", dir.display());
        } else {
            println!("{}", dir.display());
        }
    }

    let written: Vec<PathBuf> = session.cleanup_folders();
    if args.keep {
        for dir in &written {
            eprintln!("        Kept {}", dir.join("go.mod").display());
        }
    } else {
        session.cleanup();
        if !written.is_empty() {
            eprintln!("     Removed {} synthesized module files", written.len());
        }
    }

    Ok(())
}
