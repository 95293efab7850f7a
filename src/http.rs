use serde::Deserialize;
use url::Url;

use crate::error::Error;
use crate::session::{AuthProvider, ProviderSession};
use crate::types::{Credentials, DeviceRecord};

/// Endpoint configuration for the default HTTP provider.
///
/// Defaults are derived from the account region. Override individual
/// endpoints via chaining:
///
/// ```rust,ignore
/// use micloud_accounts::HttpConfig;
///
/// let config = HttpConfig::for_region("de")
///     .with_device_url("https://staging.example.com/app/home/device_list".parse()?);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct HttpConfig {
    pub(crate) login_url: Url,
    pub(crate) device_url: Url,
}

impl HttpConfig {
    /// Endpoint defaults for `region`.
    ///
    /// The login host is region-independent; the device host carries the
    /// region as a subdomain except for `"cn"`, which uses the bare host.
    #[must_use]
    pub fn for_region(region: &str) -> Self {
        let prefix = if region == Credentials::DEFAULT_REGION {
            String::new()
        } else {
            format!("{region}.")
        };
        Self {
            login_url: "https://account.xiaomi.com/pass/serviceLoginAuth2"
                .parse()
                .expect("valid default URL"),
            device_url: format!("https://{prefix}api.io.mi.com/app/home/device_list")
                .parse()
                .expect("valid default URL"),
        }
    }

    /// Override the login endpoint.
    #[must_use]
    pub fn with_login_url(mut self, url: Url) -> Self {
        self.login_url = url;
        self
    }

    /// Override the device-list endpoint.
    #[must_use]
    pub fn with_device_url(mut self, url: Url) -> Self {
        self.device_url = url;
        self
    }

    /// Login endpoint URL.
    #[must_use]
    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    /// Device-list endpoint URL.
    #[must_use]
    pub fn device_url(&self) -> &Url {
        &self.device_url
    }
}

/// Login response body. The provider reports `code == 0` on success; the
/// user id arrives as a JSON number or string depending on the endpoint.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    code: i64,
    #[serde(default, rename = "userId")]
    user_id: Option<serde_json::Value>,
    #[serde(default)]
    ssecurity: Option<String>,
    #[serde(default, rename = "serviceToken")]
    service_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceListResponse {
    #[serde(default)]
    result: Option<DeviceListResult>,
}

#[derive(Debug, Deserialize)]
struct DeviceListResult {
    #[serde(default)]
    list: Vec<DeviceRecord>,
}

fn user_id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Default [`AuthProvider`] over plain HTTPS.
///
/// Speaks the provider's JSON endpoints directly and harvests session cookies
/// from the login response. It does not implement the provider's signed
/// device-control protocol, and it imposes no timeout of its own — configure
/// one on the [`reqwest::Client`] if needed.
pub struct HttpProvider {
    config: HttpConfig,
    http: reqwest::Client,
}

impl HttpProvider {
    /// Create a provider with a cookie-enabled HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the TLS backend cannot be initialized.
    pub fn new(config: HttpConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self { config, http })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Checks HTTP response status; returns the response on success or an
    /// error with details.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Provider {
            operation,
            status: Some(status),
            detail: body,
        })
    }
}

impl AuthProvider for HttpProvider {
    async fn login(&self, credentials: &Credentials) -> Result<ProviderSession, Error> {
        let params = [
            ("user", credentials.username()),
            ("password", credentials.password()),
            ("sid", "xiaomiio"),
            ("_json", "true"),
        ];

        let response = self
            .http
            .post(self.config.login_url.clone())
            .form(&params)
            .send()
            .await?;

        let response = Self::ensure_success(response, "login").await?;

        // Cookies must be read before the body consumes the response.
        let cookies: Vec<(String, String)> = response
            .cookies()
            .map(|c| (c.name().to_owned(), c.value().to_owned()))
            .collect();

        let body: LoginResponse = response.json().await?;
        if body.code != 0 {
            return Err(Error::LoginFailed);
        }

        let mut session = ProviderSession::new();
        if let Some(id) = body.user_id.as_ref().and_then(user_id_string) {
            session = session.with_user_id(id);
        }
        if let Some(ssecurity) = body.ssecurity {
            session = session.with_ssecurity(ssecurity);
        }
        if let Some(token) = body.service_token {
            session = session.with_service_token(token);
        }
        for (name, value) in cookies {
            session = session.with_cookie(name, value);
        }

        // A well-formed success response still needs a usable token.
        if session.service_token().is_none() && session.cookie("serviceToken").is_none() {
            return Err(Error::LoginFailed);
        }

        Ok(session)
    }

    async fn fetch_devices(
        &self,
        session: &ProviderSession,
        country: &str,
    ) -> Result<Vec<DeviceRecord>, Error> {
        let payload = serde_json::json!({
            "country": country,
            "getVirtualModel": false,
            "getHuamiDevices": 0,
        });

        // The device host differs from the login host; replay the session
        // cookies explicitly.
        let mut cookie_pairs = Vec::new();
        if let Some(id) = session.user_id() {
            cookie_pairs.push(format!("userId={id}"));
        }
        if let Some(token) = session.service_token() {
            cookie_pairs.push(format!("serviceToken={token}"));
        }

        let mut request = self.http.post(self.config.device_url.clone()).json(&payload);
        if !cookie_pairs.is_empty() {
            request = request.header(reqwest::header::COOKIE, cookie_pairs.join("; "));
        }

        let response = request.send().await?;
        let response = Self::ensure_success(response, "device list").await?;
        let body: DeviceListResponse = response.json().await?;

        Ok(body.result.map(|r| r.list).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_for_cn() {
        let config = HttpConfig::for_region("cn");
        assert_eq!(
            config.login_url().as_str(),
            "https://account.xiaomi.com/pass/serviceLoginAuth2"
        );
        assert_eq!(
            config.device_url().as_str(),
            "https://api.io.mi.com/app/home/device_list"
        );
    }

    #[test]
    fn config_defaults_carry_region_subdomain() {
        let config = HttpConfig::for_region("de");
        assert_eq!(
            config.device_url().as_str(),
            "https://de.api.io.mi.com/app/home/device_list"
        );
        // Login host is region-independent.
        assert_eq!(
            config.login_url().as_str(),
            "https://account.xiaomi.com/pass/serviceLoginAuth2"
        );
    }

    #[test]
    fn config_with_overrides() {
        let config = HttpConfig::for_region("cn")
            .with_login_url("https://staging.example.com/login".parse().unwrap())
            .with_device_url("https://staging.example.com/devices".parse().unwrap());

        assert_eq!(config.login_url().as_str(), "https://staging.example.com/login");
        assert_eq!(config.device_url().as_str(), "https://staging.example.com/devices");
    }

    #[test]
    fn login_response_numeric_user_id() {
        let body: LoginResponse = serde_json::from_str(
            r#"{"code": 0, "userId": 12345, "ssecurity": "sec", "serviceToken": "svc"}"#,
        )
        .unwrap();
        assert_eq!(body.code, 0);
        assert_eq!(
            body.user_id.as_ref().and_then(user_id_string).as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn login_response_string_user_id() {
        let body: LoginResponse =
            serde_json::from_str(r#"{"code": 0, "userId": "12345"}"#).unwrap();
        assert_eq!(
            body.user_id.as_ref().and_then(user_id_string).as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn login_response_defaults() {
        let body: LoginResponse = serde_json::from_str(r#"{"code": 70016}"#).unwrap();
        assert_eq!(body.code, 70016);
        assert!(body.user_id.is_none());
        assert!(body.service_token.is_none());
    }

    #[test]
    fn user_id_string_rejects_empty_and_non_scalar() {
        assert_eq!(user_id_string(&serde_json::json!("")), None);
        assert_eq!(user_id_string(&serde_json::json!(null)), None);
        assert_eq!(user_id_string(&serde_json::json!({"id": 1})), None);
    }

    #[test]
    fn device_list_envelope_missing_result_is_empty() {
        let body: DeviceListResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.result.map(|r| r.list).unwrap_or_default().is_empty());
    }

    #[test]
    fn device_list_envelope_parses_records() {
        let body: DeviceListResponse = serde_json::from_str(
            r#"{"result": {"list": [{"did": "a", "name": "Lamp"}, {"did": "b"}]}}"#,
        )
        .unwrap();
        let list = body.result.unwrap().list;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name.as_deref(), Some("Lamp"));
    }
}
