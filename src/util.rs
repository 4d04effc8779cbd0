use std::path::PathBuf;

const CONFIG_PATH: &str = "WEB_MONITOR_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.json";

pub fn get_config_path() -> PathBuf {
    let path_from_env = std::env::var(CONFIG_PATH);
    path_from_env.map_or(PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

const LOG_FILE: &str = "WEB_MONITOR_LOG";

pub fn get_log_file() -> Option<PathBuf> {
    std::env::var(LOG_FILE).ok().map(PathBuf::from)
}
