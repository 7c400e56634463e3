use crate::draw::settings::DrawSettings;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter directive for the given mode. `RUST_LOG` (passed as `env`) only
/// applies when `debug` is on.
pub fn filter_directive(debug: bool, env: Option<&str>) -> String {
    if !debug {
        return "info".to_string();
    }
    match env.map(str::trim).filter(|directive| !directive.is_empty()) {
        Some(directive) => directive.to_string(),
        None => "debug".to_string(),
    }
}

fn env_filter(debug: bool) -> EnvFilter {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let level = if debug { "debug" } else { "info" };
    EnvFilter::try_new(filter_directive(debug, env.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialise logging. When `debug` is false the level is pinned to `info`;
/// when true it defaults to `debug` and can be overridden via `RUST_LOG`.
/// With `log_file` set, output is appended to that file instead of stderr.
pub fn init(debug: bool, log_file: Option<PathBuf>) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(debug));

    let file = log_file.and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| eprintln!("failed to open log file {}: {err}", path.display()))
            .ok()
    });

    let _ = match file {
        Some(file) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init(),
        None => builder.try_init(),
    };
}

/// Initialise logging with the level selected by `debug_logging`.
pub fn init_from_settings(settings: &DrawSettings, log_file: Option<PathBuf>) {
    init(settings.debug_logging, log_file);
}
