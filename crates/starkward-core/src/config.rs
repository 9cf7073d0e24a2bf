//! Process configuration for the Starkward guardian service.
//!
//! Configuration is read once at startup from environment variables and
//! never hot-reloaded:
//!
//! - `STARKWARD_NETWORK` - chain network selector (`mainnet`, `sepolia`)
//! - `STARKWARD_RPC_URL` - RPC endpoint for the trace/event providers
//! - `STARKWARD_GUARDIAN_KEY` - guardian private key, hex felt string
//! - `STARKWARD_PORT` - HTTP listen port (optional, default 6060)

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};

/// Environment variable naming the chain network.
pub const ENV_NETWORK: &str = "STARKWARD_NETWORK";
/// Environment variable naming the RPC endpoint URL.
pub const ENV_RPC_URL: &str = "STARKWARD_RPC_URL";
/// Environment variable holding the guardian private key.
pub const ENV_GUARDIAN_KEY: &str = "STARKWARD_GUARDIAN_KEY";
/// Environment variable naming the HTTP listen port.
pub const ENV_PORT: &str = "STARKWARD_PORT";

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 6060;

/// The chain network the service verifies transactions for.
///
/// Selects the chain identifier mixed into the transaction hash, so a
/// guardian signature produced for one network never verifies on
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Starknet mainnet (`SN_MAIN`).
    Mainnet,
    /// Starknet Sepolia testnet (`SN_SEPOLIA`).
    Sepolia,
}

impl Network {
    /// The chain identifier short string for this network.
    ///
    /// Felt-encoded and mixed into every transaction hash.
    #[must_use]
    pub const fn chain_tag(self) -> &'static str {
        match self {
            Self::Mainnet => "SN_MAIN",
            Self::Sepolia => "SN_SEPOLIA",
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "mainnet" | "sn_main" => Ok(Self::Mainnet),
            "sepolia" | "sn_sepolia" => Ok(Self::Sepolia),
            _ => Err(ConfigError::UnknownNetwork {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Sepolia => write!(f, "sepolia"),
        }
    }
}

/// Process-wide configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    /// The chain network to verify against.
    pub network: Network,
    /// RPC endpoint URL for the trace and event providers.
    pub rpc_url: String,
    /// Guardian private key as a hex felt string.
    ///
    /// Read once here and handed to the signer, which holds it in
    /// zeroizing memory for the process lifetime. No rotation.
    pub guardian_key: String,
    /// HTTP listen port.
    pub port: u16,
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is missing, the
    /// network selector is unknown, or the port is not a valid u16.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Exists so tests can supply variables without mutating the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let network = lookup(ENV_NETWORK)
            .ok_or_else(|| ConfigError::missing_var(ENV_NETWORK))?
            .parse::<Network>()?;
        let rpc_url =
            lookup(ENV_RPC_URL).ok_or_else(|| ConfigError::missing_var(ENV_RPC_URL))?;
        let guardian_key =
            lookup(ENV_GUARDIAN_KEY).ok_or_else(|| ConfigError::missing_var(ENV_GUARDIAN_KEY))?;
        let port = match lookup(ENV_PORT) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::invalid_value(ENV_PORT, raw))?,
            None => DEFAULT_PORT,
        };

        if guardian_key.is_empty() {
            return Err(ConfigError::invalid_value(ENV_GUARDIAN_KEY, "<empty>"));
        }

        Ok(Self {
            network,
            rpc_url,
            guardian_key,
            port,
        })
    }
}

impl fmt::Debug for Config {
    // Key material never reaches logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("network", &self.network)
            .field("rpc_url", &self.rpc_url)
            .field("guardian_key", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_for<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn loads_full_configuration() {
        let vars = [
            (ENV_NETWORK, "mainnet"),
            (ENV_RPC_URL, "https://rpc.example/v0_7"),
            (ENV_GUARDIAN_KEY, "0x19800ea"),
            (ENV_PORT, "8080"),
        ];
        let config = Config::from_lookup(lookup_for(&vars)).unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.rpc_url, "https://rpc.example/v0_7");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn port_defaults_when_absent() {
        let vars = [
            (ENV_NETWORK, "sepolia"),
            (ENV_RPC_URL, "https://rpc.example"),
            (ENV_GUARDIAN_KEY, "0x1"),
        ];
        let config = Config::from_lookup(lookup_for(&vars)).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn missing_rpc_url_fails() {
        let vars = [(ENV_NETWORK, "mainnet"), (ENV_GUARDIAN_KEY, "0x1")];
        let err = Config::from_lookup(lookup_for(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { name } if name == ENV_RPC_URL));
    }

    #[test]
    fn unknown_network_fails() {
        let vars = [
            (ENV_NETWORK, "dogechain"),
            (ENV_RPC_URL, "https://rpc.example"),
            (ENV_GUARDIAN_KEY, "0x1"),
        ];
        let err = Config::from_lookup(lookup_for(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNetwork { .. }));
    }

    #[test]
    fn bad_port_fails() {
        let vars = [
            (ENV_NETWORK, "mainnet"),
            (ENV_RPC_URL, "https://rpc.example"),
            (ENV_GUARDIAN_KEY, "0x1"),
            (ENV_PORT, "not-a-port"),
        ];
        let err = Config::from_lookup(lookup_for(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn network_chain_tags() {
        assert_eq!(Network::Mainnet.chain_tag(), "SN_MAIN");
        assert_eq!(Network::Sepolia.chain_tag(), "SN_SEPOLIA");
        assert_eq!("SN_SEPOLIA".parse::<Network>().unwrap(), Network::Sepolia);
    }

    #[test]
    fn debug_redacts_guardian_key() {
        let vars = [
            (ENV_NETWORK, "mainnet"),
            (ENV_RPC_URL, "https://rpc.example"),
            (ENV_GUARDIAN_KEY, "0xsupersecret"),
        ];
        let config = Config::from_lookup(lookup_for(&vars)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("supersecret"));
        assert!(rendered.contains("<redacted>"));
    }
}
