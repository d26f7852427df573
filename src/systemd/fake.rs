use std::cell::{Cell, RefCell};

use crate::error::{RbackupError, Result};
use crate::systemd::ServiceControl;

/// Records every successful call. Fails all calls while `unreachable` is set,
/// and only `reload` while `failing_reload` is set.
#[derive(Debug, Default)]
pub struct FakeServiceControl {
    pub recorded: RefCell<Vec<String>>,
    pub unreachable: Cell<bool>,
    pub failing_reload: Cell<bool>,
}

impl FakeServiceControl {
    pub fn offline() -> Self {
        let fake = FakeServiceControl::default();
        fake.unreachable.set(true);
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.recorded.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        if self.unreachable.get() {
            return Err(RbackupError::external(format!("{}: bus unreachable", call)));
        }
        self.recorded.borrow_mut().push(call);
        Ok(())
    }
}

impl ServiceControl for FakeServiceControl {
    fn start_unit(&self, unit: &str) -> Result<String> {
        self.record(format!("start {}", unit))?;
        Ok(format!("/org/freedesktop/systemd1/job/{}", unit.len()))
    }

    fn stop_unit(&self, unit: &str) -> Result<String> {
        self.record(format!("stop {}", unit))?;
        Ok(format!("/org/freedesktop/systemd1/job/{}", unit.len()))
    }

    fn enable_unit_files(&self, units: &[String], runtime: bool, force: bool) -> Result<()> {
        self.record(format!("enable {} runtime={} force={}", units.join(","), runtime, force))
    }

    fn disable_unit_files(&self, units: &[String], runtime: bool) -> Result<()> {
        self.record(format!("disable {} runtime={}", units.join(","), runtime))
    }

    fn reload(&self) -> Result<()> {
        if self.failing_reload.get() {
            return Err(RbackupError::external("reload failed"));
        }
        self.record("reload".to_string())
    }
}
