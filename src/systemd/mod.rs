//! Unit lifecycle control.
//!
//! The store only talks to systemd through [`ServiceControl`], so it can be
//! driven by [`SystemdBus`] in production and by a recording fake in tests.

use crate::error::Result;

pub mod bus;
#[cfg(test)]
pub mod fake;

pub use bus::SystemdBus;

pub trait ServiceControl {
    /// Starts `unit` now and returns the job object path.
    fn start_unit(&self, unit: &str) -> Result<String>;
    fn stop_unit(&self, unit: &str) -> Result<String>;
    fn enable_unit_files(&self, units: &[String], runtime: bool, force: bool) -> Result<()>;
    fn disable_unit_files(&self, units: &[String], runtime: bool) -> Result<()>;
    /// Makes systemd re-read unit files.
    fn reload(&self) -> Result<()>;
}
