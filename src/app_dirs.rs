use directories::ProjectDirs;
use std::path::PathBuf;

pub const APP_NAME: &str = "typer-zone";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.data_local_dir().join(format!("{APP_NAME}.log")))
    }
}
