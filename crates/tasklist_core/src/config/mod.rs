use crate::error::AppError;
use crate::storage::DEFAULT_STORE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKLIST_CONFIG_PATH";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

impl StoreBackend {
    pub fn parse(raw: &str) -> Option<Self> {
        match canonical_name(raw)?.as_str() {
            "file" | "disk" | "json" => Some(Self::File),
            "memory" | "mem" | "in_memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Where the client keeps its tasks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientMode {
    #[default]
    Remote,
    Local,
}

impl ClientMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match canonical_name(raw)?.as_str() {
            "remote" | "http" | "server" => Some(Self::Remote),
            "local" | "offline" => Some(Self::Local),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub store: StoreBackend,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_store_key")]
    pub store_key: String,
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store: StoreBackend::default(),
            data_dir: None,
            store_key: default_store_key(),
            static_dir: None,
            log_filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub mode: ClientMode,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: ClientMode::default(),
            api_url: default_api_url(),
            data_dir: None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_store_key() -> String {
    DEFAULT_STORE_KEY.to_string()
}

fn default_api_url() -> String {
    format!("http://{DEFAULT_HOST}:{DEFAULT_PORT}")
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(CONFIG_FILE_NAME))
    }
}

/// Missing file means defaults without an error; an unreadable or invalid
/// file means defaults plus the error so the caller can report it.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverride {
    ServerHost(String),
    ServerPort(u16),
    ServerStore(StoreBackend),
    ServerDataDir(PathBuf),
    ServerStoreKey(String),
    ServerStaticDir(PathBuf),
    ServerLogFilter(String),
    ClientMode(ClientMode),
    ClientApiUrl(String),
    ClientDataDir(PathBuf),
}

/// Parse a raw `SECTION.KEY=VALUE` override string into a typed override.
pub fn parse_config_override(raw: &str) -> Result<ConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim();
    let (section_raw, field_raw) = key_raw
        .split_once('.')
        .ok_or_else(|| "override key must be SECTION.FIELD".to_string())?;

    let section =
        canonical_name(section_raw).ok_or_else(|| "override section cannot be empty".to_string())?;
    let field =
        canonical_name(field_raw).ok_or_else(|| "override field cannot be empty".to_string())?;

    if value.is_empty() {
        return Err(format!("override {section}.{field} requires a value"));
    }

    match (section.as_str(), field.as_str()) {
        ("server", "host") => Ok(ConfigOverride::ServerHost(value.to_string())),
        ("server", "port") => value
            .parse::<u16>()
            .map(ConfigOverride::ServerPort)
            .map_err(|_| format!("invalid port '{value}'")),
        ("server", "store") => StoreBackend::parse(value)
            .map(ConfigOverride::ServerStore)
            .ok_or_else(|| format!("unknown store backend '{value}'")),
        ("server", "data_dir") => Ok(ConfigOverride::ServerDataDir(PathBuf::from(value))),
        ("server", "store_key") => Ok(ConfigOverride::ServerStoreKey(value.to_string())),
        ("server", "static_dir") => Ok(ConfigOverride::ServerStaticDir(PathBuf::from(value))),
        ("server", "log_filter") => Ok(ConfigOverride::ServerLogFilter(value.to_string())),
        ("client", "mode") => ClientMode::parse(value)
            .map(ConfigOverride::ClientMode)
            .ok_or_else(|| format!("unknown client mode '{value}'")),
        ("client", "api_url") => Ok(ConfigOverride::ClientApiUrl(
            value.trim_end_matches('/').to_string(),
        )),
        ("client", "data_dir") => Ok(ConfigOverride::ClientDataDir(PathBuf::from(value))),
        (section, field) => Err(format!("unknown config field '{section}.{field}'")),
    }
}

pub fn parse_config_overrides(raw: &[String]) -> Result<Vec<ConfigOverride>, AppError> {
    raw.iter()
        .map(|entry| parse_config_override(entry).map_err(AppError::invalid_input))
        .collect()
}

pub fn merge_overrides(base: &Config, overrides: &[ConfigOverride]) -> Config {
    let mut merged = base.clone();

    for item in overrides {
        match item {
            ConfigOverride::ServerHost(host) => merged.server.host = host.clone(),
            ConfigOverride::ServerPort(port) => merged.server.port = *port,
            ConfigOverride::ServerStore(store) => merged.server.store = *store,
            ConfigOverride::ServerDataDir(dir) => merged.server.data_dir = Some(dir.clone()),
            ConfigOverride::ServerStoreKey(key) => merged.server.store_key = key.clone(),
            ConfigOverride::ServerStaticDir(dir) => merged.server.static_dir = Some(dir.clone()),
            ConfigOverride::ServerLogFilter(filter) => {
                merged.server.log_filter = Some(filter.clone())
            }
            ConfigOverride::ClientMode(mode) => merged.client.mode = *mode,
            ConfigOverride::ClientApiUrl(url) => merged.client.api_url = url.clone(),
            ConfigOverride::ClientDataDir(dir) => merged.client.data_dir = Some(dir.clone()),
        }
    }

    merged
}

fn canonical_name(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
