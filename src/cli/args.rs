use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::job::command::build_command;
use crate::job::{JobFlags, JobRecord, Schedule};
use crate::types::{BackupType, CompressionType, DeleteType};

#[derive(Parser, Debug)]
#[command(name = "rbackup", version, about = "Manage rsync backup jobs as systemd services and timers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: rbackup.yaml in the config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory for the job database and scripts
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,
    /// Directory unit files are written to; must exist
    #[arg(long, global = true)]
    pub service_path: Option<PathBuf>,
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List job names
    List,
    /// Describe a job
    Show(ShowArgs),
    /// Add a new job
    Add(JobArgs),
    /// Replace an existing job
    Update(JobArgs),
    /// Remove a job and its generated files
    #[command(alias = "rm")]
    Remove(NameArgs),
    /// Write unit files and register the job's schedule
    Enable(NameArgs),
    /// Unregister the job's schedule
    Disable(NameArgs),
    /// Start the job now
    Run(NameArgs),
    /// Print the command a job with these options would run
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    pub name: String,
    /// Also print the generated unit files and script
    #[arg(long)]
    pub units: bool,
}

#[derive(Args, Debug, Clone)]
pub struct JobArgs {
    pub name: String,
    #[arg(long)]
    pub source: String,
    #[arg(long, alias = "destination")]
    pub dest: String,
    /// Command to run; generated from the flags when omitted
    #[arg(long)]
    pub command: Option<String>,
    /// Comma separated weekdays, e.g. mon,wed,fri
    #[arg(long, value_parser = Schedule::parse)]
    pub days: Option<Schedule>,
    /// Time of day as HH:MM
    #[arg(long, default_value = "00:00")]
    pub time: String,
    #[command(flatten)]
    pub flags: FlagArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long)]
    pub source: String,
    #[arg(long, alias = "destination")]
    pub dest: String,
    #[command(flatten)]
    pub flags: FlagArgs,
}

#[derive(Args, Debug, Clone)]
pub struct FlagArgs {
    #[arg(long)]
    pub recurring: bool,
    #[arg(long, short = 'z')]
    pub transfer_compression: bool,
    #[arg(long)]
    pub delta: bool,
    #[arg(long)]
    pub backup_compression: bool,
    #[arg(long, default_value = "during", value_parser = DeleteType::parse)]
    pub delete: DeleteType,
    #[arg(long, default_value = "none", value_parser = CompressionType::parse)]
    pub compression: CompressionType,
    #[arg(long, default_value = "incremental", value_parser = BackupType::parse)]
    pub backup_type: BackupType,
}

impl From<&FlagArgs> for JobFlags {
    fn from(args: &FlagArgs) -> Self {
        JobFlags {
            transfer_compression: args.transfer_compression,
            delta: args.delta,
            backup_compression: args.backup_compression,
            recurring: args.recurring,
            delete_type: args.delete,
            compression_type: args.compression,
            backup_type: args.backup_type,
        }
    }
}

impl JobArgs {
    pub fn into_record(self) -> JobRecord {
        let flags = JobFlags::from(&self.flags);
        let command = self
            .command
            .unwrap_or_else(|| build_command(&self.source, &self.dest, &flags));
        JobRecord::new(
            self.name,
            self.source,
            self.dest,
            command,
            self.days.unwrap_or_default(),
            self.time,
            flags,
        )
    }
}
