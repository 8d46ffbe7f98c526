//! Configuration management for the playlist exporter.
//!
//! Values come from environment variables and `.env` files. The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the current working directory
//! 3. `.env` in the local data directory (`sporlexport/.env`)
//! 4. Application defaults (everything except the client id)

use std::{env, path::PathBuf};

use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str =
    "playlist-read-private playlist-read-collaborative user-library-read";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Loads environment variables from `.env` files.
///
/// The working directory is consulted first, then the platform-specific local
/// data directory:
/// - Linux: `~/.local/share/sporlexport/.env`
/// - macOS: `~/Library/Application Support/sporlexport/.env`
/// - Windows: `%LOCALAPPDATA%/sporlexport/.env`
///
/// `dotenv` never overrides variables that are already set, so earlier sources
/// win. Missing files are skipped; a file that exists but cannot be parsed is
/// reported as an error.
pub async fn load_env() -> Result<(), String> {
    match dotenv::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.to_string()),
    }

    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlexport/.env");
    path
}

/// Source of configuration values; the process environment outside of tests.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Blank values count as unset.
fn non_blank(lookup: Lookup, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn var_or_from(lookup: Lookup, name: &str, default: &str) -> String {
    non_blank(lookup, name).unwrap_or_else(|| default.to_string())
}

fn var_or(name: &str, default: &str) -> String {
    var_or_from(&process_env, name, default)
}

fn client_id_from(lookup: Lookup) -> Result<String, ConfigError> {
    ["SPOTIFY_API_AUTH_CLIENT_ID", "SPOTIFY_CLIENT_ID"]
        .iter()
        .find_map(|name| non_blank(lookup, name))
        .ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))
}

/// Returns the Spotify application client id.
///
/// Reads `SPOTIFY_API_AUTH_CLIENT_ID`, falling back to `SPOTIFY_CLIENT_ID`.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    client_id_from(&process_env)
}

/// Returns the OAuth redirect URI. It must match the one registered with Spotify,
/// and its host and port decide where the callback listener binds.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the requested scopes, space separated.
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Returns the Web API base URL without a trailing slash.
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Everything the authorization handshake needs to know about the application.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub client_id: String,
    pub redirect_uri: Url,
    pub scopes: Vec<String>,
    pub authorize_url: Url,
    pub token_url: String,
}

impl AuthSettings {
    pub fn new(client_id: impl Into<String>, redirect_uri: &str) -> Result<Self, ConfigError> {
        let redirect_uri = parse_redirect_uri(redirect_uri)?;
        Ok(Self {
            client_id: client_id.into(),
            redirect_uri,
            scopes: split_scopes(DEFAULT_SCOPE),
            authorize_url: parse_url("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)?,
            token_url: DEFAULT_TOKEN_URL.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&process_env)
    }

    fn from_lookup(lookup: Lookup) -> Result<Self, ConfigError> {
        let redirect_uri = var_or_from(lookup, "SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI);
        let mut settings = Self::new(client_id_from(lookup)?, &redirect_uri)?;
        settings.scopes = split_scopes(&var_or_from(lookup, "SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE));
        settings.authorize_url = parse_url(
            "SPOTIFY_API_AUTH_URL",
            &var_or_from(lookup, "SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
        )?;
        settings.token_url = var_or_from(lookup, "SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL);
        Ok(settings)
    }

    /// The redirect URI exactly as it is sent to the authorization and token endpoints.
    pub fn redirect_uri_str(&self) -> &str {
        self.redirect_uri.as_str()
    }
}

fn parse_redirect_uri(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let invalid = |reason: String| ConfigError::Invalid {
        var: "SPOTIFY_API_REDIRECT_URI",
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(format!("{raw}: {e}")))?;
    if url.scheme() != "http" {
        return Err(invalid(format!(
            "{raw}: the local callback listener only speaks plain http"
        )));
    }
    if url.host_str().is_none() {
        return Err(invalid(format!("{raw}: missing host")));
    }
    // The URI goes out as `redirect_uri` in its parsed form, which has to
    // match the registered one character for character.
    if url.as_str() != raw {
        return Err(invalid(format!(
            "{raw}: would be sent as {url}; configure that exact form"
        )));
    }
    Ok(url)
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid {
        var,
        reason: format!("{raw}: {e}"),
    })
}

fn split_scopes(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn parses_default_redirect_uri() {
        let settings = AuthSettings::new("client", DEFAULT_REDIRECT_URI).unwrap();
        assert_eq!(settings.redirect_uri.host_str(), Some("127.0.0.1"));
        assert_eq!(settings.redirect_uri.port(), Some(8888));
        assert_eq!(settings.redirect_uri.path(), "/callback");
        assert_eq!(settings.scopes.len(), 3);
    }

    #[test]
    fn rejects_https_and_garbage_redirects() {
        assert!(AuthSettings::new("client", "https://127.0.0.1:8888/callback").is_err());
        assert!(AuthSettings::new("client", "not a url").is_err());
    }

    #[test]
    fn rejects_redirects_the_parser_would_rewrite() {
        let err = AuthSettings::new("client", "http://127.0.0.1:8888").unwrap_err();
        assert!(err.to_string().contains("http://127.0.0.1:8888/"));
        assert!(AuthSettings::new("client", "HTTP://LOCALHOST:8888/callback").is_err());

        let root = AuthSettings::new("client", "http://127.0.0.1:8888/").unwrap();
        assert_eq!(root.redirect_uri_str(), "http://127.0.0.1:8888/");
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn client_id_falls_back_to_spotify_client_id() {
        let lookup = lookup_from(&[("SPOTIFY_CLIENT_ID", "fallback")]);
        assert_eq!(client_id_from(&lookup).unwrap(), "fallback");

        let lookup = lookup_from(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "  "),
            ("SPOTIFY_CLIENT_ID", "fallback"),
        ]);
        assert_eq!(client_id_from(&lookup).unwrap(), "fallback");

        let lookup = lookup_from(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "primary"),
            ("SPOTIFY_CLIENT_ID", "fallback"),
        ]);
        assert_eq!(client_id_from(&lookup).unwrap(), "primary");
    }

    #[test]
    fn settings_without_client_id_are_missing() {
        for vars in [
            &[][..],
            &[("SPOTIFY_API_AUTH_CLIENT_ID", ""), ("SPOTIFY_CLIENT_ID", " \t")][..],
        ] {
            let err = AuthSettings::from_lookup(&lookup_from(vars)).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID")
            ));
        }
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let lookup = lookup_from(&[
            ("SPOTIFY_CLIENT_ID", "client"),
            ("SPOTIFY_API_REDIRECT_URI", ""),
            ("SPOTIFY_API_AUTH_SCOPE", "   "),
            ("SPOTIFY_API_AUTH_URL", ""),
            ("SPOTIFY_API_TOKEN_URL", " "),
        ]);
        let settings = AuthSettings::from_lookup(&lookup).unwrap();

        assert_eq!(settings.client_id, "client");
        assert_eq!(settings.redirect_uri_str(), DEFAULT_REDIRECT_URI);
        assert_eq!(settings.scopes, split_scopes(DEFAULT_SCOPE));
        assert_eq!(settings.authorize_url.as_str(), DEFAULT_AUTH_URL);
        assert_eq!(settings.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(
            var_or_from(&lookup, "SPOTIFY_API_URL", DEFAULT_API_URL),
            DEFAULT_API_URL
        );
    }

    #[test]
    fn configured_values_override_defaults() {
        let lookup = lookup_from(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "client"),
            ("SPOTIFY_API_REDIRECT_URI", "http://localhost:9000/cb"),
            ("SPOTIFY_API_AUTH_SCOPE", "playlist-read-private"),
            ("SPOTIFY_API_TOKEN_URL", "http://localhost:9001/token"),
        ]);
        let settings = AuthSettings::from_lookup(&lookup).unwrap();

        assert_eq!(settings.redirect_uri.port(), Some(9000));
        assert_eq!(settings.redirect_uri.path(), "/cb");
        assert_eq!(settings.scopes, vec!["playlist-read-private".to_string()]);
        assert_eq!(settings.token_url, "http://localhost:9001/token");
    }

    #[test]
    fn scopes_are_split_on_whitespace() {
        assert_eq!(
            split_scopes("  a  b\tc "),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
