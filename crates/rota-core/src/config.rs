use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Namespaced key the record collection is stored under.
pub const STORAGE_KEY: &str = "rota.records.v1";
/// Base of the compose-message link used for sharing.
pub const DEFAULT_COMPOSER: &str = "https://wa.me/?text=";
pub const DEFAULT_ORGANIZATION: &str = "ICM SANTO ANTÔNIO II";

const DEFAULT_WORKERS: &[&str] = &[
    "BENEDITO",
    "CLÁUDIO",
    "DAVID",
    "ETIEL",
    "LUIZ BORGES",
    "LUIZ CORREA",
    "TRANSMISSÃO",
    "MANOEL",
    "REGINALDO",
    "ROBERTO",
    "VALDEMIRO",
    "VINICIUS",
    "VISITANTE",
];
const DEFAULT_RESERVED: &[&str] = &["TRANSMISSÃO", "VISITANTE"];

/// Top-level config (rota.toml + ROTA_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RotaConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file holding the record collection.
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            key: default_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Everyone that can be picked, in display order.
    #[serde(default = "default_workers")]
    pub workers: Vec<String>,
    /// Identifiers that never rotate (broadcast operator, visiting guest).
    #[serde(default = "default_reserved")]
    pub reserved: Vec<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            reserved: default_reserved(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Printed in the heading of monthly and full-history reports.
    #[serde(default = "default_organization")]
    pub organization: String,
    /// Compose-message link; the URL-encoded report text is appended.
    #[serde(default = "default_composer")]
    pub composer: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            composer: default_composer(),
        }
    }
}

fn default_workers() -> Vec<String> {
    DEFAULT_WORKERS.iter().map(|w| w.to_string()).collect()
}
fn default_reserved() -> Vec<String> {
    DEFAULT_RESERVED.iter().map(|w| w.to_string()).collect()
}
fn default_key() -> String {
    STORAGE_KEY.to_string()
}
fn default_organization() -> String {
    DEFAULT_ORGANIZATION.to_string()
}
fn default_composer() -> String {
    DEFAULT_COMPOSER.to_string()
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.rota/rota.db", home)
}

impl RotaConfig {
    /// Load config from a TOML file with ROTA_* env var overrides.
    ///
    /// Uses the explicit path when given, `~/.rota/rota.toml` otherwise.
    /// A missing file is not an error; every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: RotaConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("ROTA_").split("_"))
            .extract()
            .map_err(|e| crate::error::RotaError::Config(e.to_string()))?;

        tracing::debug!(%path, "configuration loaded");
        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.rota/rota.toml", home)
}
