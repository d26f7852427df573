//! On-disk schema of `backups.json`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::job::{JobFlags, JobRecord, Schedule};
use crate::types::{BackupType, CompressionType, DeleteType};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Database {
    #[serde(default)]
    pub jobs: Vec<JobEntry>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JobEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Src")]
    pub src: String,
    #[serde(rename = "Dst")]
    pub dst: String,
    #[serde(rename = "Command")]
    pub command: String,
    #[serde(rename = "Enabled", default)]
    pub enabled: bool,
    #[serde(rename = "Time", default = "default_time")]
    pub time: String,
    #[serde(rename = "Service", default, skip_deserializing)]
    pub service: String,
    #[serde(rename = "Days", default)]
    pub days: DaysEntry,
    #[serde(rename = "JobFlags", default)]
    pub flags: FlagsEntry,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct DaysEntry {
    #[serde(rename = "Mon", default)]
    pub mon: bool,
    #[serde(rename = "Tues", default)]
    pub tues: bool,
    #[serde(rename = "Wed", default)]
    pub wed: bool,
    #[serde(rename = "Thurs", default)]
    pub thurs: bool,
    #[serde(rename = "Fri", default)]
    pub fri: bool,
    #[serde(rename = "Sat", default)]
    pub sat: bool,
    #[serde(rename = "Sun", default)]
    pub sun: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct FlagsEntry {
    #[serde(rename = "TransferCompression", default)]
    pub transfer_compression: bool,
    #[serde(rename = "Delta", default)]
    pub delta: bool,
    #[serde(rename = "BackupCompression", default)]
    pub backup_compression: bool,
    #[serde(rename = "Recurring", default)]
    pub recurring: bool,
    #[serde(rename = "DeleteType", default)]
    pub delete_type: DeleteType,
    #[serde(rename = "CompressionType", default)]
    pub compression_type: CompressionType,
    #[serde(rename = "BackupType", default)]
    pub backup_type: BackupType,
}

fn default_time() -> String {
    "00:00".to_string()
}

impl From<Schedule> for DaysEntry {
    fn from(schedule: Schedule) -> Self {
        let [mon, tues, wed, thurs, fri, sat, sun] = schedule.flags();
        DaysEntry {
            mon,
            tues,
            wed,
            thurs,
            fri,
            sat,
            sun,
        }
    }
}

impl From<DaysEntry> for Schedule {
    fn from(days: DaysEntry) -> Self {
        Schedule::from_flags([
            days.mon, days.tues, days.wed, days.thurs, days.fri, days.sat, days.sun,
        ])
    }
}

impl From<JobFlags> for FlagsEntry {
    fn from(flags: JobFlags) -> Self {
        FlagsEntry {
            transfer_compression: flags.transfer_compression,
            delta: flags.delta,
            backup_compression: flags.backup_compression,
            recurring: flags.recurring,
            delete_type: flags.delete_type,
            compression_type: flags.compression_type,
            backup_type: flags.backup_type,
        }
    }
}

impl From<FlagsEntry> for JobFlags {
    fn from(flags: FlagsEntry) -> Self {
        JobFlags {
            transfer_compression: flags.transfer_compression,
            delta: flags.delta,
            backup_compression: flags.backup_compression,
            recurring: flags.recurring,
            delete_type: flags.delete_type,
            compression_type: flags.compression_type,
            backup_type: flags.backup_type,
        }
    }
}

impl JobEntry {
    pub fn from_record(job: &JobRecord, service_path: &Path) -> Self {
        JobEntry {
            name: job.name().to_string(),
            src: job.source().to_string(),
            dst: job.destination().to_string(),
            command: job.command().to_string(),
            enabled: job.enabled(),
            time: job.time_of_day().to_string(),
            service: service_path
                .join(job.service_unit_name())
                .to_string_lossy()
                .to_string(),
            days: job.schedule().into(),
            flags: job.flags().into(),
        }
    }

    pub fn into_record(self) -> JobRecord {
        JobRecord::new(
            self.name,
            self.src,
            self.dst,
            self.command,
            self.days.into(),
            self.time,
            self.flags.into(),
        )
        .with_enabled(self.enabled)
    }
}

pub fn encode(jobs: &BTreeMap<String, JobRecord>, service_path: &Path) -> serde_json::Result<String> {
    let db = Database {
        jobs: jobs
            .values()
            .map(|job| JobEntry::from_record(job, service_path))
            .collect(),
    };
    serde_json::to_string_pretty(&db)
}

/// Parses a database document; whitespace-only input is an empty database.
pub fn decode(contents: &str) -> Result<BTreeMap<String, JobRecord>, String> {
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let db: Database = serde_json::from_str(contents).map_err(|e| e.to_string())?;
    let mut names = HashSet::new();
    let mut jobs = BTreeMap::new();
    for entry in db.jobs {
        if !names.insert(entry.name.clone()) {
            return Err(format!("duplicate job name {}", entry.name));
        }
        let job = entry.into_record();
        job.validate().map_err(|e| e.to_string())?;
        jobs.insert(job.name().to_string(), job);
    }
    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uses_database_keys() {
        let flags = JobFlags {
            recurring: true,
            delete_type: DeleteType::Before,
            compression_type: CompressionType::Bz2,
            backup_type: BackupType::Full,
            ..JobFlags::default()
        };
        let job = JobRecord::new(
            "docs",
            "/src",
            "/dst",
            "rsync -aq /src /dst",
            Schedule::from_flags([false, true, false, true, false, false, false]),
            "03:15",
            flags,
        );
        let mut jobs = BTreeMap::new();
        jobs.insert("docs".to_string(), job);
        let text = encode(&jobs, Path::new("/etc/systemd/system")).expect("encode");
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        let entry = &value["jobs"][0];
        assert_eq!(entry["Name"], "docs");
        assert_eq!(entry["Src"], "/src");
        assert_eq!(entry["Dst"], "/dst");
        assert_eq!(entry["Enabled"], false);
        assert_eq!(entry["Time"], "03:15");
        assert_eq!(entry["Service"], "/etc/systemd/system/docs.service");
        assert_eq!(entry["Days"]["Tues"], true);
        assert_eq!(entry["Days"]["Thurs"], true);
        assert_eq!(entry["Days"]["Mon"], false);
        assert_eq!(entry["JobFlags"]["Recurring"], true);
        assert_eq!(entry["JobFlags"]["DeleteType"], 2);
        assert_eq!(entry["JobFlags"]["CompressionType"], 3);
        assert_eq!(entry["JobFlags"]["BackupType"], 2);
    }

    #[test]
    fn decode_ignores_service_and_fills_defaults() {
        let text = r#"{ "jobs": [ {
            "Name": "a", "Src": "/s", "Dst": "/d", "Command": "cmd",
            "Service": "/somewhere/a.service"
        } ] }"#;
        let jobs = decode(text).expect("decode");
        let job = &jobs["a"];
        assert_eq!(job.time_of_day(), "00:00");
        assert!(job.schedule().is_empty());
        assert_eq!(job.flags(), JobFlags::default());
        assert!(!job.enabled());
    }

    #[test]
    fn decode_rejects_unknown_enum_and_duplicates() {
        let bad_enum = r#"{ "jobs": [ { "Name": "a", "Src": "/s", "Dst": "/d", "Command": "c",
            "JobFlags": { "BackupType": 9 } } ] }"#;
        assert!(decode(bad_enum).is_err());
        let dup = r#"{ "jobs": [
            { "Name": "a", "Src": "/s", "Dst": "/d", "Command": "c" },
            { "Name": "a", "Src": "/s", "Dst": "/d", "Command": "c" } ] }"#;
        assert!(decode(dup).expect_err("duplicate").contains("duplicate"));
    }

    #[test]
    fn decode_rejects_unsafe_names_and_bad_times() {
        let escaping = r#"{ "jobs": [ { "Name": "../escaped", "Src": "/s", "Dst": "/d",
            "Command": "c", "Time": "02:00" } ] }"#;
        assert!(decode(escaping).expect_err("unsafe name").contains("../escaped"));
        let bad_time = r#"{ "jobs": [ { "Name": "a", "Src": "/s", "Dst": "/d",
            "Command": "c", "Time": "99:99" } ] }"#;
        assert!(decode(bad_time).expect_err("bad time").contains("99:99"));
    }

    #[test]
    fn empty_documents_have_no_jobs() {
        assert!(decode("").expect("empty").is_empty());
        assert!(decode("  \n").expect("blank").is_empty());
        assert!(decode("{}").expect("object").is_empty());
        assert!(decode(r#"{"jobs": []}"#).expect("array").is_empty());
    }
}
