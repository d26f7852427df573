use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Contents of `rbackup.yaml`. Every key is optional.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default, rename = "servicePath", skip_serializing_if = "Option::is_none")]
    pub service_path: Option<PathBuf>,
    #[serde(default, rename = "configPath", skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
    #[serde(default, rename = "serviceUser", skip_serializing_if = "Option::is_none")]
    pub service_user: Option<String>,
    #[serde(default, rename = "busTimeoutSecs", skip_serializing_if = "Option::is_none")]
    pub bus_timeout_secs: Option<u64>,
}
