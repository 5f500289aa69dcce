//! Entry point for the **launcher-statslogd** daemon.
//!
//! Listens for log requests on a Unix socket, normalizes each one and
//! writes the resulting rows, in arrival order, as JSON lines to stdout or
//! to the configured output file.

use log::{error, info};
use statslog::config::Config;
use statslog::ipc::listener::UnixSocketListener;
use statslog::ipc::Request;
use statslog::logger::StatsLogManager;
use statslog::sink::JsonLinesSink;
use statslog::traits::RequestSource;
use statslog::writer::StatsWriter;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;

/// Default socket path for the request listener.
fn default_socket_path() -> PathBuf {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(runtime).join("launcher-statslog.sock")
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/launcher-statslog`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("launcher-statslog")
}

/// Resolve `--config <path>` if given, else
/// `$XDG_CONFIG_HOME/launcher-statslog/config.json`.
fn config_path() -> PathBuf {
    let mut args = std::env::args().skip_while(|a| *a != "--config").skip(1);
    args.next()
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("config.json"))
}

fn open_output(config: &Config) -> std::io::Result<Box<dyn Write + Send>> {
    match &config.output {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            info!("writing rows to {}", path.display());
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

fn main() {
    // Config comes first: it picks the default log filter.
    let path = config_path();
    let loaded = Config::load(&path);
    let config = loaded.as_ref().cloned().unwrap_or_default();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.default_log_filter()),
    )
    .init();
    match &loaded {
        Ok(_) => info!("loaded config from {}", path.display()),
        Err(e) => info!("no config file ({}), using defaults", e),
    }

    let out = match open_output(&config) {
        Ok(out) => out,
        Err(e) => {
            error!("failed to open output: {}", e);
            std::process::exit(1);
        }
    };
    let writer = match StatsWriter::spawn(JsonLinesSink::new(out)) {
        Ok(w) => w,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let manager = StatsLogManager::new(writer.handle(), config.verbose);

    let (req_tx, req_rx) = mpsc::channel::<Request>();
    spawn_request_sources(&config, req_tx);

    info!("launcher-statslogd running");
    for req in req_rx {
        if let Err(e) = req.apply(&manager) {
            error!("request error: {}", e);
        }
    }
    info!("all request sources closed, exiting");
    writer.shutdown();
}

fn spawn_request_sources(config: &Config, tx: mpsc::Sender<Request>) {
    let path = config
        .socket_path
        .clone()
        .unwrap_or_else(default_socket_path);
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
