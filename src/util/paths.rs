use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use nix::unistd::{getuid, User};

use crate::error::{RbackupError, Result};

pub const APP_DIR_NAME: &str = "rbackup";
pub const DOT_DIR_NAME: &str = ".rbackup";

pub fn is_safe_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Per-user config directory: `$XDG_CONFIG_HOME/rbackup`, then `$HOME/.rbackup`,
/// then the home directory from the user database.
pub fn default_config_dir() -> Result<PathBuf> {
    resolve_config_dir(
        env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        env::var_os("HOME").map(PathBuf::from),
        user_database_home,
    )
}

fn user_database_home() -> Option<PathBuf> {
    User::from_uid(getuid()).ok().flatten().map(|user| user.dir)
}

pub fn resolve_config_dir(
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
    passwd_home: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(dir) = xdg_config_home.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir.join(APP_DIR_NAME));
    }
    if let Some(dir) = home.filter(|d| !d.as_os_str().is_empty()) {
        return Ok(dir.join(DOT_DIR_NAME));
    }
    passwd_home()
        .map(|dir| dir.join(DOT_DIR_NAME))
        .ok_or_else(|| RbackupError::io("resolve config dir", "no home directory for current user"))
}

/// Creates `path` as a directory if needed; an existing non-directory is an error.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.exists() {
        let meta = fs::metadata(path).map_err(|e| RbackupError::io(format!("stat {}", path.display()), e))?;
        if !meta.is_dir() {
            return Err(RbackupError::Io(format!("{} is not a directory", path.display())));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| RbackupError::io(format!("create {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_names() {
        assert!(is_safe_name("daily-docs_2.0"));
        assert!(!is_safe_name(""));
        assert!(!is_safe_name(".."));
        assert!(!is_safe_name("a/b"));
        assert!(!is_safe_name("with space"));
    }

    #[test]
    fn config_dir_prefers_xdg_then_home_then_passwd() {
        let dir = resolve_config_dir(
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
            || Some(PathBuf::from("/passwd")),
        )
        .expect("xdg");
        assert_eq!(dir, PathBuf::from("/xdg/rbackup"));

        let dir = resolve_config_dir(Some(PathBuf::new()), Some(PathBuf::from("/home/u")), || None)
            .expect("home");
        assert_eq!(dir, PathBuf::from("/home/u/.rbackup"));

        let dir = resolve_config_dir(None, None, || Some(PathBuf::from("/var/lib/u"))).expect("passwd");
        assert_eq!(dir, PathBuf::from("/var/lib/u/.rbackup"));

        assert!(resolve_config_dir(None, None, || None).is_err());
    }

    #[test]
    fn ensure_dir_creates_and_rejects_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let nested = tmp.path().join("a").join("b");
        ensure_dir(&nested).expect("create");
        assert!(nested.is_dir());
        ensure_dir(&nested).expect("existing dir");

        let file = tmp.path().join("file");
        fs::write(&file, "x").expect("write");
        assert!(ensure_dir(&file).is_err());
    }
}
