use crate::error::Result;
use crate::store::JobStore;
use crate::systemd::ServiceControl;

pub fn run_enable<S: ServiceControl>(store: &mut JobStore<S>, name: &str) -> Result<()> {
    store.enable(name)?;
    println!("enabled {}", store.get(name)?.schedule_unit_name());
    Ok(())
}

pub fn run_disable<S: ServiceControl>(store: &mut JobStore<S>, name: &str) -> Result<()> {
    store.disable(name)?;
    println!("disabled {}", store.get(name)?.schedule_unit_name());
    Ok(())
}

pub fn run_now<S: ServiceControl>(store: &JobStore<S>, name: &str) -> Result<()> {
    store.run(name)?;
    println!("started {}", store.get(name)?.service_unit_name());
    Ok(())
}
