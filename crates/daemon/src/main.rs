// SPDX-License-Identifier: MIT

//! opsd: the observatory operations daemon.
//!
//! Loads a config file, wires up the environment watcher and the dome and
//! telescope controllers, then drives the tick loop on this thread while
//! the RPC listener runs in its own. A `Shutdown` RPC stops both cleanly.

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use obs_backends::actions::stand_ins::{PointAndTrack, Skyflats};
use obs_backends::dome::fake::FakeDomeBackend;
use obs_backends::environment::fake::FakeEnvironmentSource;
use obs_backends::{StaticActionRegistry, StaticDomeRegistry};
use obs_core::{DomeStatus, SystemClock};
use obs_daemon::{listener, DomeController, EnvironmentWatcher, OperationsDaemon};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:7624";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let first = args.next();

    if matches!(first.as_deref(), Some("-h") | Some("--help")) {
        print_usage();
        return Ok(());
    }
    if matches!(first.as_deref(), Some("-V") | Some("--version")) {
        println!("opsd {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let Some(config_path) = first else {
        print_usage();
        std::process::exit(1);
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    run(PathBuf::from(config_path))
}

fn run(config_path: PathBuf) -> Result<()> {
    let config_json = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading config file {}", config_path.display()))?;

    let action_registry = build_action_registry();
    let dome_registry = build_dome_registry();

    let config = obs_config::Config::load(&config_json, &action_registry, &dome_registry).map_err(|errors| {
        let joined = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        anyhow::anyhow!("invalid configuration: {joined}")
    })?;

    tracing::info!(daemon = %config.daemon, "configuration loaded");

    let clock = SystemClock;
    let loop_delay = config.loop_delay;

    let environment_source = Arc::new(FakeEnvironmentSource::new());
    let environment = EnvironmentWatcher::new(
        config.environment_conditions.clone(),
        environment_source,
        config.environment_poll_grace_ticks,
        clock.clone(),
    );

    let dome = match &config.dome {
        Some(dome_config) => {
            let backend = dome_registry
                .construct(&dome_config.module, &dome_config.settings)
                .context("constructing dome backend")?;
            Some(DomeController::new(dome_config.clone(), Arc::from(backend), clock.clone()))
        }
        None => {
            tracing::info!("no dome configured; running telescope-only");
            None
        }
    };

    let daemon = Arc::new(OperationsDaemon::new(config, environment, dome, Arc::new(action_registry), clock));

    let tick_daemon = daemon.clone();
    let tick_thread = thread::spawn(move || {
        while !tick_daemon.is_shutdown_requested() {
            tick_daemon.tick();
            thread::sleep(loop_delay);
        }
        tick_daemon.shutdown();
        tracing::info!("shutdown requested, exiting");
        std::process::exit(0);
    });

    let socket = TcpListener::bind(DEFAULT_BIND_ADDR).with_context(|| format!("binding {DEFAULT_BIND_ADDR}"))?;
    tracing::info!(addr = DEFAULT_BIND_ADDR, "opsd listening");

    listener::serve(socket, daemon);
    tick_thread.join().ok();
    Ok(())
}

/// Build the action registry the daemon runs with. Concrete hardware
/// actions (real pointing, guiding, autofocus) are out of scope; these are
/// the stand-ins also exercised by the test suite.
fn build_action_registry() -> StaticActionRegistry {
    let mut registry = StaticActionRegistry::new();
    registry.register("point_and_track", PointAndTrack::schema(), |params| {
        let ra = params.get("ra").and_then(|v| v.as_f64()).ok_or("missing 'ra'")?;
        let dec = params.get("dec").and_then(|v| v.as_f64()).ok_or("missing 'dec'")?;
        Ok(Box::new(PointAndTrack::new(ra, dec)) as Box<dyn obs_core::Action>)
    });
    registry.register("skyflats", Skyflats::schema(), |params| {
        let exposures = params.get("exposures").and_then(|v| v.as_u64()).unwrap_or(5) as u32;
        Ok(Box::new(Skyflats::new(exposures)) as Box<dyn obs_core::Action>)
    });
    registry
}

/// Build the dome module registry. No real hardware integration ships with
/// this daemon; `fake` stands in for a site's actual dome controller.
fn build_dome_registry() -> StaticDomeRegistry {
    let mut registry = StaticDomeRegistry::new();
    registry.register("fake", |_settings| Ok(Box::new(FakeDomeBackend::new(DomeStatus::Closed)) as Box<dyn obs_backends::DomeBackend>));
    registry
}

fn print_usage() {
    println!("opsd {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Robotic observatory operations daemon.");
    println!();
    println!("USAGE:");
    println!("    opsd <config-file>");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -V, --version    Print version information");
}
