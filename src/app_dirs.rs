use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "totatype")
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where the log file goes: `~/.local/state/totatype` when `HOME` is set,
    /// the platform local data dir otherwise.
    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("totatype"),
            )
        } else {
            Self::project().map(|dirs| dirs.data_local_dir().to_path_buf())
        }
    }
}
