//! Command implementations

mod init;
mod publish;
mod refresh;
mod status;
mod stop;
mod units;
mod unlock;

use std::path::{Path, PathBuf};

use anyhow::Context;

pub use init::init;
pub use publish::publish;
pub use refresh::{RefreshOptions, refresh};
pub use status::status;
pub use stop::stop;
pub use units::units;
pub use unlock::unlock;

/// Resolve `--repo` to an absolute working copy root
pub fn resolve_root(repo: &Path) -> anyhow::Result<PathBuf> {
    repo.canonicalize()
        .with_context(|| format!("working copy {} does not exist", repo.display()))
}
