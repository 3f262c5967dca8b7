//! Scoped write access to a generated file.
//!
//! Generated bindings are kept read-only so nobody edits them by hand.
//! [`WritableFile`] opens the write window for the duration of a patch run
//! and closes it again when dropped, whether the run succeeded or not.

use schemadoc::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub struct WritableFile {
    path: PathBuf,
}

impl WritableFile {
    /// Make `path` writable until the returned guard is dropped
    pub fn open(path: &Path) -> Result<Self> {
        let mut permissions = fs::metadata(path)?.permissions();
        set_writable(&mut permissions, true);
        fs::set_permissions(path, permissions)?;
        log::debug!("Opened write window on {}", path.display());
        Ok(WritableFile {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WritableFile {
    fn drop(&mut self) {
        let result = fs::metadata(&self.path).and_then(|meta| {
            let mut permissions = meta.permissions();
            set_writable(&mut permissions, false);
            fs::set_permissions(&self.path, permissions)
        });
        match result {
            Ok(()) => log::debug!("Restored read-only on {}", self.path.display()),
            Err(e) => log::warn!(
                "Failed to restore read-only on {}: {e}",
                self.path.display()
            ),
        }
    }
}

#[cfg(unix)]
fn set_writable(permissions: &mut fs::Permissions, writable: bool) {
    use std::os::unix::fs::PermissionsExt;
    let mode = permissions.mode();
    let mode = if writable { mode | 0o200 } else { mode & !0o222 };
    permissions.set_mode(mode);
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn set_writable(permissions: &mut fs::Permissions, writable: bool) {
    permissions.set_readonly(!writable);
}
