//! Entry point for the **linkgrid** daemon.
//!
//! Opens the configured store, loads and reconciles the launcher state,
//! spawns the Unix-socket [`CommandSource`](linkgrid::traits::CommandSource)
//! on a background thread, and processes incoming commands on the main
//! thread.  State events are logged; a front end subscribes to the same
//! stream.

use linkgrid::command::Command;
use linkgrid::config::{config_dir, Config};
use linkgrid::ipc::listener::UnixSocketListener;
use linkgrid::launcher::{Launcher, StateEvent};
use linkgrid::storage::Persistence;
use linkgrid::traits::CommandSource;
use log::{debug, error, info};
use std::path::PathBuf;
use std::sync::mpsc;

/// Try to load the config from `$XDG_CONFIG_HOME/linkgrid/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

//  Main

fn main() {
    env_logger::init();

    let config = load_config();

    let store = match Persistence::open(&config.storage) {
        Ok(store) => store,
        Err(e) => {
            error!("failed to open storage: {}", e);
            std::process::exit(1);
        }
    };
    info!("persistence backend: {}", store.backend_name());

    let mut launcher = Launcher::load(store, config.persistence.reorder_debounce());
    launcher.set_export_dir(config.export.directory.clone());

    let (event_tx, event_rx) = mpsc::channel::<StateEvent>();
    launcher.set_events(event_tx);
    std::thread::spawn(move || {
        for event in event_rx {
            match event {
                StateEvent::Notice(message) => info!("notice: {}", message),
                other => debug!("state event: {:?}", other),
            }
        }
    });

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    spawn_command_sources(cmd_tx, config.socket_path());

    info!("linkgrid running");
    for cmd in cmd_rx {
        if let Err(e) = launcher.handle(cmd) {
            error!("command error: {}", e);
        }
    }
    if let Err(e) = launcher.flush() {
        error!("final flush failed: {}", e);
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Command>, socket_path: PathBuf) {
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&socket_path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
