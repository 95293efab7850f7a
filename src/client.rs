use tracing::{error, info, warn};

use crate::error::Error;
use crate::session::{AuthProvider, ProviderSession};
use crate::token::{normalize, SessionToken};
use crate::types::{Credentials, DeviceRecord};

/// Account client orchestrating login and device listing over an
/// [`AuthProvider`].
///
/// Holds the session snapshot from the last successful login. Logging at this
/// boundary reports token presence, never token values.
pub struct AccountClient<P> {
    provider: P,
    credentials: Credentials,
    session: Option<ProviderSession>,
}

impl<P: AuthProvider> AccountClient<P> {
    #[must_use]
    pub fn new(provider: P, credentials: Credentials) -> Self {
        Self {
            provider,
            credentials,
            session: None,
        }
    }

    /// Perform the login handshake and return the canonical token record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoginFailed`] when the provider reports no usable
    /// session. Provider/network faults propagate unchanged after being
    /// logged here; retry policy belongs to the caller.
    pub async fn login(&mut self) -> Result<SessionToken, Error> {
        info!(
            username = %self.credentials.username(),
            region = %self.credentials.region(),
            "attempting login"
        );

        let session = match self.provider.login(&self.credentials).await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "login failed");
                return Err(e);
            }
        };

        let token = normalize(&session);
        info!(
            user_id = %token.user_id,
            has_service_token = token.has_service_token(),
            "login successful"
        );
        self.session = Some(session);
        Ok(token)
    }

    /// List the devices bound to the account.
    ///
    /// `country` defaults to the region used at login. Provider faults are
    /// downgraded to an empty list — availability over completeness; callers
    /// cannot distinguish "no devices" from a transient retrieval error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] if called before a successful
    /// [`login`](Self::login).
    pub async fn devices(&self, country: Option<&str>) -> Result<Vec<DeviceRecord>, Error> {
        let session = self.session.as_ref().ok_or(Error::NotAuthenticated)?;
        let country = country.unwrap_or_else(|| self.credentials.region());

        match self.provider.fetch_devices(session, country).await {
            Ok(devices) => {
                info!(count = devices.len(), country, "retrieved devices");
                Ok(devices)
            }
            Err(e) => {
                warn!(error = %e, country, "device listing failed, returning empty list");
                Ok(Vec::new())
            }
        }
    }

    /// Canonical token record for the current session, if logged in.
    #[must_use]
    pub fn session_token(&self) -> Option<SessionToken> {
        self.session.as_ref().map(normalize)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}
