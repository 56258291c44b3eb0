//! `xrepo repo-root` command

use anyhow::Result;

use crate::cli::RepoRootArgs;
use xrepo::resolver::{RepoRootResolver, VcsRepoRoots};

pub fn execute(args: RepoRootArgs) -> Result<()> {
    let resolver = VcsRepoRoots::new(!args.offline);
    let root = resolver.repo_root(&args.import_path)?;
    println!("{}", root);
    Ok(())
}
