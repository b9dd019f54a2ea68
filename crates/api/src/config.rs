use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local single-user install.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`, loopback only).
    pub host: String,
    /// Bind port (default: `0`, an ephemeral port chosen by the OS).
    pub port: u16,
    /// Path of the catalogue configuration document.
    pub catalog_path: PathBuf,
    /// Directory holding the UI shell's static assets.
    pub static_dir: PathBuf,
    /// Whether the catalogue document is exposed as an editable entry.
    pub expose_self_config: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default               |
    /// |-----------------------|-----------------------|
    /// | `HOST`                | `127.0.0.1`           |
    /// | `PORT`                | `0`                   |
    /// | `BATDECK_CATALOG`     | `configs/config.toml` |
    /// | `BATDECK_STATIC_DIR`  | `static`              |
    /// | `BATDECK_SELF_CONFIG` | `true`                |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("PORT must be a valid u16");

        let catalog_path = std::env::var("BATDECK_CATALOG")
            .unwrap_or_else(|_| "configs/config.toml".into())
            .into();

        let static_dir = std::env::var("BATDECK_STATIC_DIR")
            .unwrap_or_else(|_| "static".into())
            .into();

        let expose_self_config = std::env::var("BATDECK_SELF_CONFIG")
            .map(|v| parse_flag(&v).expect("BATDECK_SELF_CONFIG must be true or false"))
            .unwrap_or(true);

        Self {
            host,
            port,
            catalog_path,
            static_dir,
            expose_self_config,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
