//! File logging. The terminal belongs to the UI, so records never go to stdout.

use std::path::{Path, PathBuf};
use std::sync::Once;

use chrono::Local;

pub const APP_NAME: &str = "recipient-form";

static INIT: Once = Once::new();

/// Resolves the level: explicit value, then `RECIPIENT_FORM_LOG_LEVEL`, then `RUST_LOG`, then info.
pub fn resolve_level(explicit: Option<&str>) -> log::LevelFilter {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("RECIPIENT_FORM_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .and_then(|level| level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info)
}

/// `off`, `none` and the empty string disable file logging.
pub fn resolve_log_dir(raw: &str) -> Option<PathBuf> {
    match raw {
        "off" | "none" | "" => None,
        path => Some(PathBuf::from(path)),
    }
}

pub fn log_file_path(dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y_%m_%d");
    dir.join(format!("{APP_NAME}-{date}.log"))
}

pub fn init_logging(log_dir: Option<&Path>, level: log::LevelFilter) -> Result<(), String> {
    let mut init_result: Result<(), String> = Ok(());
    INIT.call_once(|| {
        if let Some(dir) = log_dir {
            if let Err(err) = init_logging_inner(dir, level) {
                init_result = Err(err);
            }
        }
    });
    init_result
}

fn init_logging_inner(dir: &Path, level: log::LevelFilter) -> Result<(), String> {
    std::fs::create_dir_all(dir).map_err(|err| err.to_string())?;
    let file = fern::log_file(log_file_path(dir)).map_err(|err| err.to_string())?;

    fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(file)
        .apply()
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_log_dir() {
        assert_eq!(resolve_log_dir("off"), None);
        assert_eq!(resolve_log_dir("none"), None);
        assert_eq!(resolve_log_dir(""), None);
        assert_eq!(resolve_log_dir("logs"), Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(resolve_level(Some("debug")), log::LevelFilter::Debug);
        assert_eq!(resolve_level(Some("warn")), log::LevelFilter::Warn);
    }

    #[test]
    fn test_log_file_name() {
        let path = log_file_path(Path::new("logs"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("recipient-form-"));
        assert!(name.ends_with(".log"));
    }
}
