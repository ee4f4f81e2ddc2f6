//! Registry configuration.
//!
//! The defaults follow the proposal literally. Deployments that want stricter
//! behavior opt in through [`Config`], which can be deserialized from any
//! serde format:
//!
//! ```
//! use openzeppelin_versioned_proxy::config::{Config, RemovalPolicy};
//!
//! let config: Config = serde_json::from_str(r#"{ "removal": "strict" }"#)?;
//! assert_eq!(config.removal, RemovalPolicy::Strict);
//! # Ok::<(), serde_json::Error>(())
//! ```
use serde::{Deserialize, Serialize};

/// What removing a version that is not registered does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Removing an unknown version succeeds without effect or event.
    #[default]
    Lenient,
    /// Removing an unknown version fails with a not found error.
    Strict,
}

/// Whether the all-zero version identifier may be registered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVersionPolicy {
    /// The zero identifier is an ordinary key.
    #[default]
    Allow,
    /// Registering the zero identifier fails with an invalid version error.
    Reject,
}

/// Behavior switches of a version registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// See [`RemovalPolicy`].
    pub removal: RemovalPolicy,
    /// See [`ZeroVersionPolicy`].
    pub zero_version: ZeroVersionPolicy,
}

impl Config {
    /// Sets the [`RemovalPolicy`].
    #[must_use]
    pub const fn with_removal(mut self, removal: RemovalPolicy) -> Self {
        self.removal = removal;
        self
    }

    /// Sets the [`ZeroVersionPolicy`].
    #[must_use]
    pub const fn with_zero_version(
        mut self,
        zero_version: ZeroVersionPolicy,
    ) -> Self {
        self.zero_version = zero_version;
        self
    }
}
