//! List declared units

use std::path::Path;

use statsync::RefreshError;
use statsync::config::ProjectConfig;
use statsync::output::{OutputMode, UnitListResult};

/// Print the declared units in run order
pub fn units(root: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let config = ProjectConfig::load(root).map_err(RefreshError::from)?;
    UnitListResult::from(&config).render(mode);
    Ok(())
}
