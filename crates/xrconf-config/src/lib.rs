//! Environment and credential configuration for xrconf.
//!
//! Devices are described as named environments in TOML, each carrying up to
//! one profile per transport. The system file (`/etc/xrconf.toml`) is
//! merged under the user file (`~/.xrconf.toml`), and `XRCONF_`-prefixed
//! environment variables override both. Passwords may live in the TOML
//! (discouraged), in `XRCONF_USERNAME` / `XRCONF_PASSWORD`, or be supplied
//! by the caller.

use std::collections::HashMap;
use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use xrconf_api::Login;

/// Default NETCONF-over-SSH subsystem port.
pub const DEFAULT_NETCONF_PORT: u16 = 830;
/// Default EMS gRPC port.
pub const DEFAULT_GRPC_PORT: u16 = 57_400;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no environment named '{name}' is configured")]
    UnknownEnvironment { name: String },

    #[error("environment '{name}' has no {transport} profile")]
    MissingProfile { name: String, transport: &'static str },

    #[error("no credentials configured for environment '{name}'")]
    NoCredentials { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration: named device environments.
#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Environment used when none is named on the command line.
    pub default_environment: Option<String>,

    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_environment: Some("default".into()),
            environments: HashMap::new(),
        }
    }
}

/// One device, with a profile per transport it speaks.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Environment {
    pub netconf: Option<Profile>,
    pub grpc: Option<Profile>,
}

/// Connection details for one transport.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    /// Plaintext password — prefer `XRCONF_PASSWORD`.
    pub password: Option<String>,
}

impl Settings {
    pub fn environment(&self, name: &str) -> Result<&Environment, ConfigError> {
        self.environments
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment { name: name.into() })
    }

    /// The environment to use when the caller named none.
    pub fn default_environment_name(&self) -> &str {
        self.default_environment.as_deref().unwrap_or("default")
    }
}

// ── Loading ─────────────────────────────────────────────────────────

fn user_config_path() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".xrconf.toml");
    p
}

/// Load settings from the system file, the user file, and the environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let user_path = user_config_path();
    debug!(user_path = %user_path.display(), "loading settings");
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file("/etc/xrconf.toml"))
        .merge(Toml::file(&user_path))
        .merge(Env::prefixed("XRCONF_").split("__"));
    Ok(figment.extract()?)
}

/// Parse settings from a TOML string. Used by tests and by callers that
/// manage their own file handling.
pub fn settings_from_toml(toml: &str) -> Result<Settings, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::string(toml));
    Ok(figment.extract()?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Build a [`Login`] from a profile, filling credentials from the process
/// environment where the TOML leaves them out.
pub fn resolve_login(
    profile: &Profile,
    environment_name: &str,
    default_port: u16,
) -> Result<Login, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("XRCONF_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            name: environment_name.into(),
        })?;

    let password = std::env::var("XRCONF_PASSWORD")
        .ok()
        .or_else(|| profile.password.clone())
        .ok_or_else(|| ConfigError::NoCredentials {
            name: environment_name.into(),
        })?;

    Ok(Login {
        host: profile.host.clone(),
        port: profile.port.unwrap_or(default_port),
        username,
        password: SecretString::from(password),
    })
}

/// Resolve the NETCONF login for a named environment.
pub fn netconf_login(settings: &Settings, name: &str) -> Result<Login, ConfigError> {
    let env = settings.environment(name)?;
    let profile = env.netconf.as_ref().ok_or(ConfigError::MissingProfile {
        name: name.into(),
        transport: "netconf",
    })?;
    resolve_login(profile, name, DEFAULT_NETCONF_PORT)
}

/// Resolve the gRPC login for a named environment.
pub fn grpc_login(settings: &Settings, name: &str) -> Result<Login, ConfigError> {
    let env = settings.environment(name)?;
    let profile = env.grpc.as_ref().ok_or(ConfigError::MissingProfile {
        name: name.into(),
        transport: "grpc",
    })?;
    resolve_login(profile, name, DEFAULT_GRPC_PORT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
default_environment = "lab"

[environments.lab.grpc]
host = "192.0.2.1"
username = "admin"
password = "hunter2"

[environments.lab.netconf]
host = "192.0.2.1"
port = 8300
username = "admin"
password = "hunter2"

[environments.prod.netconf]
host = "203.0.113.9"
username = "ops"
password = "s3cret"
"#;

    #[test]
    fn environments_parse_with_per_transport_profiles() {
        let settings = settings_from_toml(SAMPLE).unwrap();
        assert_eq!(settings.default_environment_name(), "lab");
        assert!(settings.environment("lab").unwrap().grpc.is_some());
        assert!(settings.environment("prod").unwrap().grpc.is_none());
    }

    #[test]
    fn default_ports_apply_when_unset() {
        let settings = settings_from_toml(SAMPLE).unwrap();
        let grpc = grpc_login(&settings, "lab").unwrap();
        assert_eq!(grpc.port, DEFAULT_GRPC_PORT);
        let netconf = netconf_login(&settings, "lab").unwrap();
        assert_eq!(netconf.port, 8300);
        let prod = netconf_login(&settings, "prod").unwrap();
        assert_eq!(prod.port, DEFAULT_NETCONF_PORT);
    }

    #[test]
    fn login_resolution_carries_credentials() {
        let settings = settings_from_toml(SAMPLE).unwrap();
        let login = grpc_login(&settings, "lab").unwrap();
        assert_eq!(login.username, "admin");
        assert_eq!(login.password.expose_secret(), "hunter2");
    }

    #[test]
    fn unknown_environment_is_an_error() {
        let settings = settings_from_toml(SAMPLE).unwrap();
        assert!(matches!(
            netconf_login(&settings, "nope"),
            Err(ConfigError::UnknownEnvironment { .. })
        ));
    }

    #[test]
    fn missing_transport_profile_is_an_error() {
        let settings = settings_from_toml(SAMPLE).unwrap();
        assert!(matches!(
            grpc_login(&settings, "prod"),
            Err(ConfigError::MissingProfile { transport: "grpc", .. })
        ));
    }

    #[test]
    fn missing_credentials_are_reported() {
        let settings = settings_from_toml(
            "[environments.bare.netconf]\nhost = \"192.0.2.5\"\n",
        )
        .unwrap();
        // Only meaningful when the override vars are not set in the
        // test process environment.
        if std::env::var("XRCONF_USERNAME").is_err() {
            assert!(matches!(
                netconf_login(&settings, "bare"),
                Err(ConfigError::NoCredentials { .. })
            ));
        }
    }
}
