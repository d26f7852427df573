use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::model::Settings;
use crate::error::{ConfigError, RbackupError, Result};
use crate::store::{DEFAULT_SERVICE_PATH, DEFAULT_SERVICE_USER};
use crate::systemd::bus::DEFAULT_TIMEOUT;

pub const SETTINGS_FILE: &str = "rbackup.yaml";

/// Settings resolved against defaults, ready to build a store from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub service_path: PathBuf,
    pub config_path: PathBuf,
    pub service_user: String,
    pub bus_timeout: Duration,
}

/// Reads settings from `explicit`, or from `rbackup.yaml` in `default_dir`.
///
/// The default file is optional; an explicitly named file must exist.
pub fn load_settings(explicit: Option<&Path>, default_dir: &Path) -> Result<Settings> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (default_dir.join(SETTINGS_FILE), false),
    };
    let mut contents = String::new();
    match File::open(&path) {
        Ok(mut file) => {
            file.read_to_string(&mut contents)
                .map_err(|e| RbackupError::io(format!("read {}", path.display()), e))?;
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(Settings::default());
        }
        Err(err) => {
            return Err(ConfigError::Invalid(format!("open {}: {}", path.display(), err)).into());
        }
    }
    parse_settings(&contents)
}

pub fn parse_settings(contents: &str) -> Result<Settings> {
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings =
        serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
    if let Some(user) = &settings.service_user {
        if user.trim().is_empty() {
            return Err(ConfigError::Invalid("serviceUser is empty".to_string()).into());
        }
    }
    if settings.bus_timeout_secs == Some(0) {
        return Err(ConfigError::Invalid("busTimeoutSecs must be positive".to_string()).into());
    }
    Ok(settings)
}

impl Settings {
    pub fn resolve(self, default_dir: &Path) -> Paths {
        Paths {
            service_path: self
                .service_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_PATH)),
            config_path: self.config_path.unwrap_or_else(|| default_dir.to_path_buf()),
            service_user: self
                .service_user
                .unwrap_or_else(|| DEFAULT_SERVICE_USER.to_string()),
            bus_timeout: self
                .bus_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}
