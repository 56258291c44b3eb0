//! `xrepo env` command

use anyhow::Result;

use xrepo::util::process::find_go;
use xrepo::util::GoEnv;

pub fn execute() -> Result<()> {
    println!("Go environment:");
    println!();

    let env = match find_go() {
        Some(go) => {
            println!("  go:         {}", go.display());
            GoEnv::detect(&go).unwrap_or_else(|e| {
                tracing::warn!("{:#}", e);
                GoEnv::from_env()
            })
        }
        None => {
            println!("  go:         not found");
            GoEnv::from_env()
        }
    };

    println!("  GOPATH:     {}", env.gopath().display());
    match env.goroot() {
        Some(goroot) => println!("  GOROOT:     {}", goroot.display()),
        None => println!("  GOROOT:     not set"),
    }
    println!("  GOMODCACHE: {}", env.mod_cache().display());

    Ok(())
}
