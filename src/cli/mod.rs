use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, Command};
use crate::cli::commands::{exit_for_error, job, unit};
use crate::config::load_settings;
use crate::store::JobStore;
use crate::systemd::SystemdBus;
use crate::util::paths::default_config_dir;

pub mod args;
pub mod commands;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Generate(args) = &cli.command {
        job::run_generate(args);
        return Ok(());
    }

    let default_dir = default_config_dir().context("resolve default config directory")?;
    let settings = match load_settings(cli.config.as_deref(), &default_dir) {
        Ok(settings) => settings,
        Err(err) => exit_for_error(&err),
    };
    let mut paths = settings.resolve(&default_dir);
    if let Some(config_path) = &cli.config_path {
        paths.config_path = config_path.clone();
    }

    let mut store = match JobStore::from_paths(&paths, SystemdBus::new(paths.bus_timeout)) {
        Ok(store) => store,
        Err(err) => exit_for_error(&err),
    };
    if let Some(service_path) = &cli.service_path {
        if let Err(err) = store.set_service_path(service_path) {
            exit_for_error(&err);
        }
    }
    if let Err(err) = store.load() {
        exit_for_error(&err);
    }

    let result = match cli.command {
        Command::List => job::run_list(&store),
        Command::Show(args) => job::run_show(&store, &args),
        Command::Add(args) => job::run_add(&mut store, args),
        Command::Update(args) => job::run_update(&mut store, args),
        Command::Remove(args) => job::run_remove(&mut store, &args.name),
        Command::Enable(args) => unit::run_enable(&mut store, &args.name),
        Command::Disable(args) => unit::run_disable(&mut store, &args.name),
        Command::Run(args) => unit::run_now(&store, &args.name),
        Command::Generate(_) => Ok(()),
    };
    if let Err(err) = result {
        exit_for_error(&err);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
