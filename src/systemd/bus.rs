use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::debug;
use zbus::blocking::Connection;
use zbus::dbus_proxy;
use zbus::zvariant::OwnedObjectPath;

use crate::error::{RbackupError, Result};
use crate::systemd::ServiceControl;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

const START_MODE: &str = "replace";

/// The subset of the systemd manager D-Bus API used for job units.
///
/// See <https://www.freedesktop.org/wiki/Software/systemd/dbus/>
#[dbus_proxy(
    interface = "org.freedesktop.systemd1.Manager",
    default_service = "org.freedesktop.systemd1",
    default_path = "/org/freedesktop/systemd1"
)]
trait Systemd1Manager {
    fn start_unit(&self, name: &str, mode: &str) -> zbus::Result<OwnedObjectPath>;

    fn stop_unit(&self, name: &str, mode: &str) -> zbus::Result<OwnedObjectPath>;

    fn enable_unit_files(
        &self,
        files: &[&str],
        runtime: bool,
        force: bool,
    ) -> zbus::Result<(bool, Vec<(String, String, String)>)>;

    fn disable_unit_files(
        &self,
        files: &[&str],
        runtime: bool,
    ) -> zbus::Result<Vec<(String, String, String)>>;

    fn reload(&self) -> zbus::Result<()>;
}

/// [`ServiceControl`] over the system bus.
///
/// Every call runs on its own worker thread, connection included, so an
/// unresponsive bus surfaces as an error after `timeout` instead of hanging.
#[derive(Debug, Clone)]
pub struct SystemdBus {
    timeout: Duration,
}

impl Default for SystemdBus {
    fn default() -> Self {
        SystemdBus::new(DEFAULT_TIMEOUT)
    }
}

impl SystemdBus {
    pub fn new(timeout: Duration) -> Self {
        SystemdBus { timeout }
    }

    fn call<T, F>(&self, method: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Systemd1ManagerProxyBlocking<'_>) -> zbus::Result<T> + Send + 'static,
    {
        debug!(method, "systemd call");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = Connection::system().and_then(|conn| {
                let proxy = Systemd1ManagerProxyBlocking::new(&conn)?;
                f(&proxy)
            });
            let _ = tx.send(result);
        });
        match rx.recv_timeout(self.timeout) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(RbackupError::external(format!("{}: {}", method, err))),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(RbackupError::external(format!(
                "{}: timed out after {}s",
                method,
                self.timeout.as_secs()
            ))),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(RbackupError::external(format!(
                "{}: worker exited without a reply",
                method
            ))),
        }
    }
}

impl ServiceControl for SystemdBus {
    fn start_unit(&self, unit: &str) -> Result<String> {
        let unit = unit.to_string();
        let path = self.call("StartUnit", move |proxy| proxy.start_unit(&unit, START_MODE))?;
        Ok(path.as_str().to_string())
    }

    fn stop_unit(&self, unit: &str) -> Result<String> {
        let unit = unit.to_string();
        let path = self.call("StopUnit", move |proxy| proxy.stop_unit(&unit, START_MODE))?;
        Ok(path.as_str().to_string())
    }

    fn enable_unit_files(&self, units: &[String], runtime: bool, force: bool) -> Result<()> {
        let units = units.to_vec();
        let (_, changes) = self.call("EnableUnitFiles", move |proxy| {
            let files: Vec<&str> = units.iter().map(String::as_str).collect();
            proxy.enable_unit_files(&files, runtime, force)
        })?;
        for (kind, file, dest) in changes {
            debug!(%kind, %file, %dest, "unit file change");
        }
        Ok(())
    }

    fn disable_unit_files(&self, units: &[String], runtime: bool) -> Result<()> {
        let units = units.to_vec();
        let changes = self.call("DisableUnitFiles", move |proxy| {
            let files: Vec<&str> = units.iter().map(String::as_str).collect();
            proxy.disable_unit_files(&files, runtime)
        })?;
        for (kind, file, dest) in changes {
            debug!(%kind, %file, %dest, "unit file change");
        }
        Ok(())
    }

    fn reload(&self) -> Result<()> {
        self.call("Reload", |proxy| proxy.reload())
    }
}
