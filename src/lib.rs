//! Manage periodic rsync backup jobs as systemd services and timers.
//!
//! [`store::JobStore`] owns the job definitions, persists them to JSON,
//! renders their unit files and scripts, and drives systemd through a
//! [`systemd::ServiceControl`] implementation.

pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod store;
pub mod systemd;
pub mod types;
pub mod util;

pub use error::{RbackupError, Result};
pub use job::{JobFlags, JobRecord, Schedule};
pub use store::JobStore;
