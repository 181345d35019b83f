use crate::config::{config_dir, Config};

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        non_empty(String::from_utf8_lossy(&output.stdout).as_ref())
    } else {
        None
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Stored token path: ~/.config/folio/token
fn token_path() -> Option<std::path::PathBuf> {
    Some(config_dir()?.join("token"))
}

fn load_stored_token() -> Option<String> {
    let path = token_path()?;
    let token = std::fs::read_to_string(path).ok()?;
    non_empty(&token)
}

/// Resolve the API token, trying in order:
/// 1. env var named by the config
/// 2. stored token from ~/.config/folio/token
/// 3. CLI command from the config
///
/// Returns None when nothing is found; the client then runs unauthenticated.
pub fn load_token(config: &Config) -> Option<String> {
    if let Some(env_var) = &config.token_env {
        if let Some(token) = std::env::var(env_var).ok().and_then(|t| non_empty(&t)) {
            return Some(token);
        }
    }

    if let Some(token) = load_stored_token() {
        return Some(token);
    }

    if let Some(cmd) = &config.token_command {
        if let Some(token) = try_cli_token(cmd) {
            return Some(token);
        }
    }

    tracing::warn!("no API token found, requests will be unauthenticated");
    None
}
