//! `xrepo version` command

use anyhow::{bail, Result};

use crate::cli::VersionArgs;
use xrepo::resolver::version::resolve_version;
use xrepo::util::GoEnv;

pub fn execute(args: VersionArgs) -> Result<()> {
    let env = match args.mod_cache {
        Some(cache) => GoEnv::from_env().with_mod_cache(cache),
        None => GoEnv::from_env(),
    };

    match resolve_version(env.mod_cache(), &args.file) {
        Some(version) => {
            println!("{}", version);
            Ok(())
        }
        None => bail!(
            "no version found for {} under {}",
            args.file.display(),
            env.mod_cache().display()
        ),
    }
}
