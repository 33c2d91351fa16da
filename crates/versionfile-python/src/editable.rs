//! Scoped editable install
//!
//! `EditableInstall` installs a project on creation and, when asked to,
//! uninstalls it again when dropped, whichever way the caller's scope exits.

use std::path::Path;
use versionfile_logger as logger;

use crate::errors::InstallerError;
use crate::installer::DistributionManager;

pub struct EditableInstall<'a, M: DistributionManager + ?Sized> {
    manager: &'a M,
    name: String,
    uninstall: bool,
}

impl<'a, M: DistributionManager + ?Sized> EditableInstall<'a, M> {
    /// Install `directory`; the guard uninstalls on drop only if `uninstall`.
    pub fn acquire(
        manager: &'a M,
        directory: &Path,
        uninstall: bool,
    ) -> Result<Self, InstallerError> {
        let name = manager.install_editable(directory)?;
        logger::info(&format!("Installed '{}' in editable mode", name));
        Ok(Self {
            manager,
            name,
            uninstall,
        })
    }

    /// Name of the installed distribution
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<M: DistributionManager + ?Sized> Drop for EditableInstall<'_, M> {
    fn drop(&mut self) {
        if !self.uninstall {
            logger::debug(&format!("Leaving '{}' installed", self.name));
            return;
        }

        match self.manager.uninstall(&self.name) {
            Ok(_) => logger::info(&format!("Uninstalled '{}'", self.name)),
            Err(e) => logger::warn(&format!("Failed to uninstall '{}': {}", self.name, e)),
        }
    }
}
