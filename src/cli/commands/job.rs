use crate::cli::args::{GenerateArgs, JobArgs, ShowArgs};
use crate::error::Result;
use crate::job::command::build_command;
use crate::job::JobFlags;
use crate::store::JobStore;
use crate::systemd::ServiceControl;

pub fn run_list<S: ServiceControl>(store: &JobStore<S>) -> Result<()> {
    for name in store.list_names() {
        let job = store.get(&name)?;
        let state = if job.enabled() { "enabled" } else { "disabled" };
        println!("{}\t{}", name, state);
    }
    Ok(())
}

pub fn run_show<S: ServiceControl>(store: &JobStore<S>, args: &ShowArgs) -> Result<()> {
    let job = store.get(&args.name)?;
    print!("{}", job.describe());
    if args.units {
        let ctx = store.render_context();
        println!();
        println!("# {}", store.service_path().join(job.service_unit_name()).display());
        print!("{}", job.render_service_unit(&ctx));
        if job.flags().recurring {
            println!();
            println!("# {}", store.service_path().join(job.timer_unit_name()).display());
            print!("{}", job.render_timer_unit());
        }
        println!();
        println!("# {}", store.config_path().join(job.script_name()).display());
        println!("{}", job.render_shell_script());
    }
    Ok(())
}

pub fn run_add<S: ServiceControl>(store: &mut JobStore<S>, args: JobArgs) -> Result<()> {
    let job = args.into_record();
    let name = job.name().to_string();
    store.add(job)?;
    store.save()?;
    println!("added job {}", name);
    Ok(())
}

/// Replaces a job's definition. The stored enabled state carries over.
pub fn run_update<S: ServiceControl>(store: &mut JobStore<S>, args: JobArgs) -> Result<()> {
    let enabled = store.get(&args.name)?.enabled();
    let job = args.into_record().with_enabled(enabled);
    let name = job.name().to_string();
    store.update(job)?;
    store.save()?;
    println!("updated job {}", name);
    if enabled {
        println!("job {} is enabled; run `rbackup enable {}` to rewrite its units", name, name);
    }
    Ok(())
}

pub fn run_remove<S: ServiceControl>(store: &mut JobStore<S>, name: &str) -> Result<()> {
    store.remove(name)?;
    println!("removed job {}", name);
    Ok(())
}

pub fn run_generate(args: &GenerateArgs) {
    let flags = JobFlags::from(&args.flags);
    println!("{}", build_command(&args.source, &args.dest, &flags));
}
