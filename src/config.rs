use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const DATA_DIR_ENV: &str = "TRACKUI_DATA_DIR";
const LOG_ENV: &str = "TRACKUI_LOG";

pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory (platform default unless `TRACKUI_DATA_DIR`
    /// is set) and make sure it exists.
    pub(crate) fn load() -> Result<Self> {
        let data_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let proj_dirs = directories::ProjectDirs::from("com", "trackui", "TrackUI")
                    .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
                proj_dirs.data_dir().to_path_buf()
            }
        };
        std::fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create data directory: {}", data_dir.display())
        })?;
        Ok(Self { data_dir })
    }

    pub(crate) fn db_path(&self) -> PathBuf {
        self.data_dir.join("trackui.db")
    }

    pub(crate) fn log_path(&self) -> PathBuf {
        self.data_dir.join("trackui.log")
    }
}

/// Route `log` output through env_logger, filtered by `TRACKUI_LOG`
/// (default `warn`). With a path, output is appended to that file instead of
/// stderr so it doesn't draw over the terminal UI.
pub(crate) fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"));

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder
        .try_init()
        .context("Logger already initialized")?;
    Ok(())
}
