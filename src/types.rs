use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Account credentials for the cloud login handshake.
///
/// Immutable once constructed. The region selects the provider's server
/// cluster and defaults to `"cn"`.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    region: String,
}

impl Credentials {
    pub const DEFAULT_REGION: &'static str = "cn";

    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            region: Self::DEFAULT_REGION.into(),
        }
    }

    /// Create credentials from environment variables.
    ///
    /// # Required env vars
    /// - `MICLOUD_USERNAME`: account username (email or phone)
    /// - `MICLOUD_PASSWORD`: account password
    ///
    /// # Optional env vars
    /// - `MICLOUD_REGION`: server region (default `"cn"`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required env var is missing.
    pub fn from_env() -> Result<Self, Error> {
        let username = std::env::var("MICLOUD_USERNAME")
            .map_err(|_| Error::Config("MICLOUD_USERNAME is required".into()))?;
        let password = std::env::var("MICLOUD_PASSWORD")
            .map_err(|_| Error::Config("MICLOUD_PASSWORD is required".into()))?;

        let mut credentials = Self::new(username, password);
        if let Ok(region) = std::env::var("MICLOUD_REGION") {
            credentials = credentials.with_region(region);
        }
        Ok(credentials)
    }

    /// Override the server region (default: `"cn"`).
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

// Manual Debug: the password must never reach logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("region", &self.region)
            .finish()
    }
}

/// Provider-assigned device identifier (opaque string).
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct DeviceId(pub String);

/// Opaque device record from the provider's device catalog.
///
/// Statically known fields are exposed as typed members; everything else the
/// provider returns is preserved untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct DeviceRecord {
    pub did: DeviceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "isOnline")]
    pub is_online: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
