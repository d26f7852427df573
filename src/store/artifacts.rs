use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{RbackupError, Result};

/// Owner rwx, group and others read.
pub const SCRIPT_MODE: u32 = 0o744;

/// Truncates and rewrites `path`, optionally applying `mode`.
pub fn write_artifact(path: &Path, contents: &str, mode: Option<u32>) -> Result<()> {
    fs::write(path, contents).map_err(|e| RbackupError::io(format!("write {}", path.display()), e))?;
    if let Some(mode) = mode {
        let mut perms = fs::metadata(path)
            .map_err(|e| RbackupError::io(format!("stat {}", path.display()), e))?
            .permissions();
        perms.set_mode(mode);
        fs::set_permissions(path, perms)
            .map_err(|e| RbackupError::io(format!("chmod {}", path.display()), e))?;
    }
    debug!(path = %path.display(), "wrote artifact");
    Ok(())
}

/// Removes `path`, logging instead of failing. A missing file is not a failure.
pub fn remove_best_effort(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed artifact"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "could not remove artifact"),
    }
}

/// Removes `path`; a missing file is fine, anything else is an error.
pub fn remove_required(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed artifact");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(RbackupError::io(format!("remove {}", path.display()), err)),
    }
}
