// Removal of the application's per-user configuration folder
use super::types::ConfigCleanup;
use std::io;
use std::path::{Path, PathBuf};

pub struct UserConfigCleanup {
    target: Option<PathBuf>,
}

impl UserConfigCleanup {
    /// `<home>/.config/anyi` for the current user
    pub fn for_current_user() -> Self {
        let target = homedir::my_home()
            .ok()
            .flatten()
            .map(|home| home.join(".config").join("anyi"));
        Self { target }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Some(path.into()),
        }
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }
}

impl ConfigCleanup for UserConfigCleanup {
    fn delete_config_folder(&mut self) -> bool {
        let Some(path) = &self.target else {
            log::error!("❌ Cannot determine home directory; config folder not removed");
            return false;
        };
        if !path.exists() {
            log::info!("🧹 No config folder at {}", path.display());
            return true;
        }
        match remove_tree(path) {
            Ok(()) => {
                log::info!("🧹 Removed config folder {}", path.display());
                true
            }
            Err(e) => {
                log::error!("❌ Failed to remove {}: {}", path.display(), e);
                false
            }
        }
    }
}

// Retry once with read-only flags cleared
fn remove_tree(path: &Path) -> io::Result<()> {
    if let Err(first) = std::fs::remove_dir_all(path) {
        log::debug!("Retrying removal of {} after clearing read-only flags", path.display());
        clear_readonly(path)?;
        std::fs::remove_dir_all(path).map_err(|_| first)?;
    }
    Ok(())
}

#[allow(clippy::permissions_set_readonly_false)]
fn clear_readonly(path: &Path) -> io::Result<()> {
    let metadata = std::fs::symlink_metadata(path)?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }
    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        permissions.set_readonly(false);
        std::fs::set_permissions(path, permissions)?;
    }
    if metadata.is_dir() {
        for entry in std::fs::read_dir(path)? {
            clear_readonly(&entry?.path())?;
        }
    }
    Ok(())
}
