//! The redistributable set: everything a consumer needs at runtime.
//!
//! The same set lands in `Redist/`, `Samples/Bin/` and `Tools/` so that
//! samples and tools run in place.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::Harvest;
use crate::filesystem::copy_if_exists;

impl Harvest {
    /// Populate `target_dir` with the runtime library, its binding, the
    /// configuration and every driver plugin with its configuration.
    pub(crate) fn copy_redist_files(&self, target_dir: &Path) -> Result<()> {
        fs::create_dir_all(target_dir)
            .with_context(|| format!("creating redist dir '{}'", target_dir.display()))?;

        let bin_dir = self.profile.bin_dir();
        let manifest = &self.manifest;
        let config_dir = self.root.join("Config");

        self.copy_shared_object(bin_dir, &manifest.core_library, target_dir)?;
        self.copy_shared_object(bin_dir, &manifest.binding_library, target_dir)?;
        copy_if_exists(&bin_dir.join(&manifest.binding_archive), target_dir)?;
        copy_if_exists(&config_dir.join(&manifest.config_file), target_dir)?;

        let bin_drivers_dir = manifest.drivers_path(bin_dir);
        let config_drivers_dir = manifest.drivers_path(&config_dir);
        let target_drivers_dir = manifest.drivers_path(target_dir);
        fs::create_dir_all(&target_drivers_dir).with_context(|| {
            format!("creating drivers dir '{}'", target_drivers_dir.display())
        })?;

        for driver in &manifest.drivers {
            self.copy_shared_object(&bin_drivers_dir, driver, &target_drivers_dir)?;
            copy_if_exists(
                &config_drivers_dir.join(format!("{driver}.ini")),
                &target_drivers_dir,
            )?;
        }

        if self.profile.os().is_windows() {
            for driver in &manifest.windows_drivers {
                self.copy_shared_object(&bin_drivers_dir, driver, &target_drivers_dir)?;
            }
        }

        Ok(())
    }
}
