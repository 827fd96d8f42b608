//! Server configuration.

use std::collections::HashSet;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use derivative::Derivative;
use serde::{de, Deserialize};
use xdg::BaseDirectories;

use crate::storage::S3StorageConfig;
use portal_token::{
    decode_token_hs256_secret_base64, decode_token_rs256_pubkey_base64,
    decode_token_rs256_secret_base64, SignatureType,
};

/// Application prefix in XDG base directories.
///
/// This will be concatenated into `$XDG_CONFIG_HOME/portal`.
const XDG_PREFIX: &str = "portal";

/// Environment variable storing the base64-encoded TOML configuration.
///
/// This is useful for deploying to platforms where mounting files is
/// inconvenient.
const ENV_CONFIG_BASE64: &str = "PORTAL_SERVER_CONFIG_BASE64";

/// Configuration for the data portal server.
#[derive(Clone, Derivative, Deserialize)]
#[derivative(Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Socket address to listen on.
    #[serde(default = "default_listen_address")]
    pub listen: SocketAddr,

    /// Allowed `Host` headers.
    ///
    /// This _must_ be configured for production use. If unconfigured or the
    /// list is empty, all `Host` headers are allowed.
    #[serde(rename = "allowed-hosts")]
    #[serde(default = "Vec::new")]
    pub allowed_hosts: Vec<String>,

    /// How long download links for dataset assets stay valid.
    ///
    /// S3 does not accept links valid for longer than 7 days.
    #[serde(rename = "presigned-url-ttl")]
    #[serde(with = "humantime_serde", default = "default_presigned_url_ttl")]
    pub presigned_url_ttl: Duration,

    /// Database connection.
    pub database: DatabaseConfig,

    /// Storage.
    pub storage: S3StorageConfig,

    /// JSON Web Token.
    pub jwt: JwtConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,

    /// Whether to enable sending of periodic heartbeat queries.
    ///
    /// If enabled, a heartbeat query will be sent every minute.
    #[serde(default = "default_db_heartbeat")]
    pub heartbeat: bool,
}

/// JSON Web Token configuration.
#[derive(Clone, Derivative, Deserialize)]
#[derivative(Debug)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    /// The `iss` claim tokens must carry.
    ///
    /// Tokens minted by `portaladm` carry it as well.
    #[serde(rename = "token-bound-issuer")]
    #[serde(default = "Default::default")]
    pub token_bound_issuer: Option<String>,

    /// The `aud` claims tokens must carry one of.
    #[serde(rename = "token-bound-audiences")]
    #[serde(default = "Default::default")]
    pub token_bound_audiences: Option<HashSet<String>>,

    /// The key tokens are signed with.
    #[serde(rename = "signing")]
    #[serde(deserialize_with = "deserialize_jwt_signing")]
    #[derivative(Debug = "ignore")]
    pub signing: Arc<SignatureType>,
}

/// The signing key of JSON Web Tokens.
///
/// Exactly one of the keys must be set.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct JwtSigningConfig {
    /// Base64 encoding of a randomly generated HMAC secret.
    #[serde(rename = "token-hs256-secret-base64")]
    hs256_secret: Option<String>,

    /// Base64 encoding of an RSA private key in PEM format.
    #[serde(rename = "token-rs256-secret-base64")]
    rs256_secret: Option<String>,

    /// Base64 encoding of an RSA public key in PEM format.
    ///
    /// Such a server can verify tokens but not mint them.
    #[serde(rename = "token-rs256-pubkey-base64")]
    rs256_pubkey: Option<String>,
}

fn deserialize_jwt_signing<'de, D>(deserializer: D) -> Result<Arc<SignatureType>, D::Error>
where
    D: de::Deserializer<'de>,
{
    use de::Error;

    let config = JwtSigningConfig::deserialize(deserializer)?;

    let signature_type = match (config.hs256_secret, config.rs256_secret, config.rs256_pubkey) {
        (Some(s), None, None) => {
            SignatureType::HS256(decode_token_hs256_secret_base64(&s).map_err(Error::custom)?)
        }
        (None, Some(s), None) => {
            SignatureType::RS256(decode_token_rs256_secret_base64(&s).map_err(Error::custom)?)
        }
        (None, None, Some(s)) => SignatureType::RS256PubkeyOnly(
            decode_token_rs256_pubkey_base64(&s).map_err(Error::custom)?,
        ),
        _ => {
            return Err(Error::custom(
                "Exactly one JWT signing key must be configured",
            ))
        }
    };

    Ok(Arc::new(signature_type))
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0, 0, 0, 0, 0], 8080))
}

fn default_db_heartbeat() -> bool {
    false
}

fn default_presigned_url_ttl() -> Duration {
    Duration::from_secs(7 * 24 * 60 * 60)
}

pub fn load_config_from_path(path: &Path) -> Result<Config> {
    tracing::info!("Using configurations: {:?}", path);

    let config = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&config)?)
}

pub fn load_config_from_str(s: &str) -> Result<Config> {
    tracing::info!("Using configurations from environment variable");
    Ok(toml::from_str(s)?)
}

/// Loads the configuration.
///
/// The configuration is read from `config_path` if given, then from the
/// `PORTAL_SERVER_CONFIG_BASE64` environment variable, then from
/// `$XDG_CONFIG_HOME/portal/server.toml`.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    if let Some(config_path) = config_path {
        return load_config_from_path(config_path);
    }

    if let Ok(config_env) = env::var(ENV_CONFIG_BASE64) {
        let decoded = String::from_utf8(BASE64_STANDARD.decode(config_env.as_bytes())?)?;
        return load_config_from_str(&decoded);
    }

    let config_path = get_xdg_config_path()?;
    if config_path.exists() {
        return load_config_from_path(&config_path);
    }

    Err(anyhow!(
        "No configuration found. Pass one with -f, set {} or create {:?}",
        ENV_CONFIG_BASE64,
        config_path
    ))
}

pub fn get_xdg_config_path() -> anyhow::Result<PathBuf> {
    let xdg_dirs = BaseDirectories::with_prefix(XDG_PREFIX)?;
    let config_path = xdg_dirs.get_config_file("server.toml");

    Ok(config_path)
}
