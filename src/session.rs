use std::collections::HashMap;
use std::future::Future;

use crate::error::Error;
use crate::types::{Credentials, DeviceRecord};

/// Read-only snapshot of a provider session after a successful login.
///
/// Created by [`AuthProvider::login`]. Callers must treat it as immutable for
/// the lifetime of the client that holds it. A provider without a cookie jar
/// exposes an empty map, never a missing field.
#[derive(Debug, Clone, Default)]
pub struct ProviderSession {
    user_id: Option<String>,
    service_token: Option<String>,
    ssecurity: Option<String>,
    cookies: HashMap<String, String>,
}

impl ProviderSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider's user id. The provider reports a numeric id; any
    /// displayable value is accepted and stored in string form.
    #[must_use]
    pub fn with_user_id(mut self, id: impl std::fmt::Display) -> Self {
        self.user_id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn with_service_token(mut self, token: impl Into<String>) -> Self {
        self.service_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_ssecurity(mut self, ssecurity: impl Into<String>) -> Self {
        self.ssecurity = Some(ssecurity.into());
        self
    }

    /// Insert a session cookie.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn service_token(&self) -> Option<&str> {
        self.service_token.as_deref()
    }

    #[must_use]
    pub fn ssecurity(&self) -> Option<&str> {
        self.ssecurity.as_deref()
    }

    /// Look up a session cookie by name.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }
}

/// Capability interface to the external account service.
///
/// The crate does not own the provider's wire protocol; implementations own
/// the handshake and any timeout/cancellation policy.
/// [`HttpProvider`](crate::http::HttpProvider) is the default implementation
/// (feature `http`).
///
/// # Example
///
/// ```rust,ignore
/// impl AuthProvider for MyProvider {
///     async fn login(&self, credentials: &Credentials) -> Result<ProviderSession, Error> {
///         let raw = self.handshake(credentials).await?;
///         Ok(ProviderSession::new()
///             .with_user_id(raw.user_id)
///             .with_service_token(raw.service_token))
///     }
///
///     async fn fetch_devices(
///         &self,
///         session: &ProviderSession,
///         country: &str,
///     ) -> Result<Vec<DeviceRecord>, Error> {
///         self.device_catalog(session, country).await
///     }
/// }
/// ```
pub trait AuthProvider: Send + Sync {
    /// Perform the login handshake and return the session snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoginFailed`] when the provider reports no usable
    /// session, or [`Error::Provider`] for network/provider faults.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<ProviderSession, Error>> + Send;

    /// Fetch the device catalog for `country`.
    ///
    /// Implementations report faults honestly; the caller-facing downgrade to
    /// an empty list is applied once, in
    /// [`AccountClient::devices`](crate::client::AccountClient::devices).
    fn fetch_devices(
        &self,
        session: &ProviderSession,
        country: &str,
    ) -> impl Future<Output = Result<Vec<DeviceRecord>, Error>> + Send;
}
