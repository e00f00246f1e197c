use crate::session::MAX_SESSION_TTL;
use serde::Deserialize;

/// Minimum session secret length in bytes.
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Docker socket path; unix defaults when unset.
    #[serde(default)]
    pub socket: Option<String>,
    /// Label whose value names a container's group.
    #[serde(default = "default_project_label")]
    pub project_label: String,
    /// Group for containers without the label.
    #[serde(default = "default_fallback_group")]
    pub fallback_group: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            socket: None,
            project_label: default_project_label(),
            fallback_group: default_fallback_group(),
        }
    }
}

fn default_project_label() -> String {
    "com.docker.compose.project".into()
}

fn default_fallback_group() -> String {
    "ungrouped".into()
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
    pub session_secret: String,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    #[serde(default = "default_prune_interval_secs")]
    pub prune_interval_secs: u64,
}

// Keep credentials out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("session_secret", &"<redacted>")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("prune_interval_secs", &self.prune_interval_secs)
            .finish()
    }
}

fn default_session_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_prune_interval_secs() -> u64 {
    300
}

impl AppConfig {
    /// Load from `CONFIG_FILE` (default `config.toml`), then apply `DASHBOARD_*` env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        let mut config: AppConfig = toml::from_str(&s)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests). No env overrides.
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace credentials with `DASHBOARD_USERNAME`, `DASHBOARD_PASSWORD` and
    /// `DASHBOARD_SESSION_SECRET` when `lookup` returns them.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("DASHBOARD_USERNAME") {
            self.auth.username = v;
        }
        if let Some(v) = lookup("DASHBOARD_PASSWORD") {
            self.auth.password = v;
        }
        if let Some(v) = lookup("DASHBOARD_SESSION_SECRET") {
            self.auth.session_secret = v;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            !self.engine.project_label.is_empty(),
            "engine.project_label must be non-empty"
        );
        anyhow::ensure!(
            !self.engine.fallback_group.is_empty(),
            "engine.fallback_group must be non-empty"
        );
        anyhow::ensure!(
            !self.auth.username.is_empty(),
            "auth.username must be non-empty"
        );
        anyhow::ensure!(
            !self.auth.password.is_empty(),
            "auth.password must be non-empty"
        );
        anyhow::ensure!(
            self.auth.session_secret.len() >= MIN_SECRET_LEN,
            "auth.session_secret must be at least {} bytes, got {}",
            MIN_SECRET_LEN,
            self.auth.session_secret.len()
        );
        anyhow::ensure!(
            self.auth.session_ttl_secs > 0,
            "auth.session_ttl_secs must be > 0, got {}",
            self.auth.session_ttl_secs
        );
        anyhow::ensure!(
            self.auth.session_ttl_secs <= MAX_SESSION_TTL.as_secs(),
            "auth.session_ttl_secs must be at most {} (one year), got {}",
            MAX_SESSION_TTL.as_secs(),
            self.auth.session_ttl_secs
        );
        anyhow::ensure!(
            self.auth.prune_interval_secs > 0,
            "auth.prune_interval_secs must be > 0, got {}",
            self.auth.prune_interval_secs
        );
        Ok(())
    }
}
