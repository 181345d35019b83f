use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_ACCOUNT: &str = "7-lynxx";
pub const DEFAULT_PER_PAGE: u32 = 3;
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub account: String,
    pub per_page: u32,
    pub api_base: String,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: DEFAULT_ACCOUNT.to_string(),
            per_page: DEFAULT_PER_PAGE,
            api_base: DEFAULT_API_BASE.to_string(),
            token_env: Some("GITHUB_TOKEN".to_string()),
            token_command: Some("gh auth token".to_string()),
        }
    }
}

/// Everything the API client needs, resolved once at startup.
#[derive(Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub account: String,
    pub per_page: u32,
    pub token: Option<String>,
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("account", &self.account)
            .field("per_page", &self.per_page)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

pub fn config_dir() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("folio"))
}

fn config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.toml"))
}

impl Config {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn normalized(mut self) -> Self {
        self.per_page = self.per_page.clamp(1, 100);
        if self.account.trim().is_empty() {
            self.account = DEFAULT_ACCOUNT.to_string();
        }
        self.api_base = self.api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_overrides(mut self, account: Option<String>, per_page: Option<u32>) -> Self {
        if let Some(account) = account {
            self.account = account;
        }
        if let Some(per_page) = per_page {
            self.per_page = per_page;
        }
        self.normalized()
    }

    pub fn client_config(&self, token: Option<String>) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            account: self.account.clone(),
            per_page: self.per_page,
            token,
            user_agent: format!("folio/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_valid_config() {
        let toml_str = r#"
account = "octo-org"
per_page = 10
api_base = "https://ghe.example.com/api/v3/"
token_env = "GHE_TOKEN"
"#;
        let config = toml::from_str::<Config>(toml_str).unwrap().normalized();
        assert_eq!(config.account, "octo-org");
        assert_eq!(config.per_page, 10);
        assert_eq!(config.api_base, "https://ghe.example.com/api/v3");
        assert_eq!(config.token_env.as_deref(), Some("GHE_TOKEN"));
        // unspecified keys keep their defaults
        assert_eq!(config.token_command.as_deref(), Some("gh auth token"));
    }

    #[test]
    fn missing_file_uses_default() {
        let config = Config::load_from(Path::new("/nonexistent/folio/config.toml"));
        assert_eq!(config, Config::default());
        assert_eq!(config.per_page, 3);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "account = \"someone\"\nper_page = 0").unwrap();
        let config = Config::load_from(file.path());
        assert_eq!(config.account, "someone");
        assert_eq!(config.per_page, 1);
    }

    #[test]
    fn malformed_file_uses_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "account = [").unwrap();
        assert_eq!(Config::load_from(file.path()), Config::default());
    }

    #[test]
    fn overrides_win() {
        let config = Config::default().with_overrides(Some("other".into()), Some(500));
        assert_eq!(config.account, "other");
        assert_eq!(config.per_page, 100);
    }

    #[test]
    fn client_config_redacts_token() {
        let client = Config::default().client_config(Some("secret".into()));
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
