//! The job manager: owns every [`JobRecord`], persists them to
//! `backups.json`, writes their unit files and drives systemd.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::Paths;
use crate::error::{RbackupError, Result};
use crate::job::{JobRecord, RenderContext};
use crate::systemd::ServiceControl;
use crate::util::paths::ensure_dir;

pub mod artifacts;
pub mod persist;

pub const DEFAULT_SERVICE_PATH: &str = "/usr/lib/systemd/system";
pub const DEFAULT_SERVICE_USER: &str = "nobody";
pub const DATABASE_FILE: &str = "backups.json";
/// Owner read/write, everyone else read.
pub const DATABASE_MODE: u32 = 0o644;

pub struct JobStore<S> {
    jobs: BTreeMap<String, JobRecord>,
    service_path: PathBuf,
    config_path: PathBuf,
    backup_path: PathBuf,
    service_user: String,
    control: S,
}

impl<S: ServiceControl> JobStore<S> {
    /// Creates an empty store rooted at `config_path`, creating the directory.
    pub fn new(config_path: impl Into<PathBuf>, control: S) -> Result<Self> {
        let config_path = config_path.into();
        ensure_dir(&config_path)?;
        let backup_path = config_path.join(DATABASE_FILE);
        Ok(JobStore {
            jobs: BTreeMap::new(),
            service_path: PathBuf::from(DEFAULT_SERVICE_PATH),
            config_path,
            backup_path,
            service_user: DEFAULT_SERVICE_USER.to_string(),
            control,
        })
    }

    pub fn from_paths(paths: &Paths, control: S) -> Result<Self> {
        let mut store = JobStore::new(&paths.config_path, control)?;
        store.service_path = paths.service_path.clone();
        store.service_user = paths.service_user.clone();
        Ok(store)
    }

    pub fn with_service_user(mut self, user: impl Into<String>) -> Self {
        self.service_user = user.into();
        self
    }

    pub fn service_path(&self) -> &Path {
        &self.service_path
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn control(&self) -> &S {
        &self.control
    }

    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            script_dir: &self.config_path,
            user: &self.service_user,
        }
    }

    /// Points unit materialization at `path`. Existing artifacts stay where they are.
    pub fn set_service_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if !path.exists() {
            return Err(RbackupError::InvalidPath(path.display().to_string()));
        }
        self.service_path = path;
        Ok(())
    }

    pub fn add(&mut self, job: JobRecord) -> Result<()> {
        if self.jobs.contains_key(job.name()) {
            return Err(RbackupError::DuplicateName(job.name().to_string()));
        }
        job.validate()?;
        self.jobs.insert(job.name().to_string(), job);
        Ok(())
    }

    /// Replaces the stored record with the same name; fields are not merged.
    pub fn update(&mut self, job: JobRecord) -> Result<()> {
        if !self.jobs.contains_key(job.name()) {
            return Err(RbackupError::NotFound(job.name().to_string()));
        }
        job.validate()?;
        self.jobs.insert(job.name().to_string(), job);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&JobRecord> {
        self.jobs
            .get(name)
            .ok_or_else(|| RbackupError::NotFound(name.to_string()))
    }

    pub fn list_names(&self) -> Vec<String> {
        self.jobs.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Deletes the job's artifacts and the record, then saves.
    ///
    /// Unit files are removed best-effort; if the script cannot be removed the
    /// record is kept and nothing is saved.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let job = self.get(name)?;
        let timer = self.service_path.join(job.timer_unit_name());
        let service = self.service_path.join(job.service_unit_name());
        let script = self.config_path.join(job.script_name());

        artifacts::remove_best_effort(&timer);
        artifacts::remove_best_effort(&service);
        artifacts::remove_required(&script)?;

        self.jobs.remove(name);
        info!(job = name, "removed job");
        self.save()
    }

    /// Writes every job to `backups.json` through a temp file and rename.
    pub fn save(&self) -> Result<()> {
        let data = persist::encode(&self.jobs, &self.service_path)
            .map_err(|e| RbackupError::io("encode jobs", e))?;
        let mut tmp = NamedTempFile::new_in(&self.config_path)
            .map_err(|e| RbackupError::io(format!("create temp file in {}", self.config_path.display()), e))?;
        tmp.write_all(data.as_bytes())
            .map_err(|e| RbackupError::io(format!("write {}", tmp.path().display()), e))?;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(DATABASE_MODE))
            .map_err(|e| RbackupError::io(format!("chmod {}", tmp.path().display()), e))?;
        tmp.persist(&self.backup_path)
            .map_err(|e| RbackupError::io(format!("write {}", self.backup_path.display()), e))?;
        info!(path = %self.backup_path.display(), jobs = self.jobs.len(), "saved jobs");
        Ok(())
    }

    /// Replaces the in-memory jobs with the contents of `backups.json`.
    ///
    /// A missing or unreadable database leaves the store empty; malformed
    /// JSON is an error and leaves the store untouched.
    pub fn load(&mut self) -> Result<()> {
        let contents = match fs::read_to_string(&self.backup_path) {
            Ok(contents) => contents,
            Err(err) => {
                if err.kind() == io::ErrorKind::NotFound {
                    debug!(path = %self.backup_path.display(), "no job database yet");
                } else {
                    warn!(path = %self.backup_path.display(), error = %err, "job database unreadable; starting empty");
                }
                self.jobs.clear();
                return Ok(());
            }
        };
        let jobs = persist::decode(&contents)
            .map_err(|e| RbackupError::io(format!("parse {}", self.backup_path.display()), e))?;
        info!(path = %self.backup_path.display(), jobs = jobs.len(), "loaded jobs");
        self.jobs = jobs;
        Ok(())
    }

    /// Rewrites the job's service unit, script and (for recurring jobs) timer.
    ///
    /// Not transactional: a failure can leave some files already rewritten.
    pub fn materialize_artifacts(&self, name: &str) -> Result<()> {
        let job = self.get(name)?;
        if !job.is_renderable() {
            return Err(RbackupError::InvalidJob(format!(
                "job {} needs a command, source and destination",
                name
            )));
        }
        let ctx = self.render_context();
        artifacts::write_artifact(
            &self.service_path.join(job.service_unit_name()),
            &job.render_service_unit(&ctx),
            None,
        )?;
        artifacts::write_artifact(
            &self.config_path.join(job.script_name()),
            &job.render_shell_script(),
            Some(artifacts::SCRIPT_MODE),
        )?;
        if job.flags().recurring {
            artifacts::write_artifact(
                &self.service_path.join(job.timer_unit_name()),
                &job.render_timer_unit(),
                None,
            )?;
        }
        Ok(())
    }

    pub fn enable(&mut self, name: &str) -> Result<()> {
        self.set_scheduled(name, true)
    }

    pub fn disable(&mut self, name: &str) -> Result<()> {
        self.set_scheduled(name, false)
    }

    /// Starts the job's service now, outside its schedule.
    pub fn run(&self, name: &str) -> Result<()> {
        let unit = self.get(name)?.service_unit_name();
        let path = self.control.start_unit(&unit)?;
        info!(job = name, unit = %unit, job_path = %path, "started job");
        Ok(())
    }

    /// Flips `enabled`, rewrites artifacts and (un)registers the schedule unit.
    ///
    /// On failure the previous `enabled` value and its artifacts are restored
    /// and nothing is saved.
    fn set_scheduled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let job = self
            .jobs
            .get_mut(name)
            .ok_or_else(|| RbackupError::NotFound(name.to_string()))?;
        let previous = job.enabled();
        let unit = job.schedule_unit_name();
        job.set_enabled(enabled);

        let result = self
            .materialize_artifacts(name)
            .and_then(|()| self.register_unit(&unit, enabled));
        if let Err(err) = result {
            self.roll_back(name, previous);
            return Err(err);
        }
        info!(job = name, unit = %unit, enabled, "updated job schedule");
        self.save()
    }

    /// (Un)registers `unit` and reloads systemd. If the reload fails the
    /// registration change is reverted before the error is returned.
    fn register_unit(&self, unit: &str, enabled: bool) -> Result<()> {
        let units = [unit.to_string()];
        self.change_registration(&units, enabled)?;
        if let Err(err) = self.control.reload() {
            if let Err(revert_err) = self.change_registration(&units, !enabled) {
                warn!(unit, error = %revert_err, "could not revert unit registration after failed reload");
            }
            return Err(err);
        }
        Ok(())
    }

    fn change_registration(&self, units: &[String], enabled: bool) -> Result<()> {
        if enabled {
            self.control.enable_unit_files(units, false, true)
        } else {
            self.control.disable_unit_files(units, false)
        }
    }

    fn roll_back(&mut self, name: &str, enabled: bool) {
        if let Some(job) = self.jobs.get_mut(name) {
            job.set_enabled(enabled);
        }
        if let Err(err) = self.materialize_artifacts(name) {
            warn!(job = name, error = %err, "could not restore artifacts after failed schedule change");
        }
    }
}
