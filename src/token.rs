use serde::{Deserialize, Serialize};

use crate::session::ProviderSession;

/// Canonical token record consumers use to re-authenticate subsequent
/// requests without repeating the full login handshake.
///
/// All four fields are always present as strings; unknown values normalize to
/// the empty string, never to an absent field. The wire keys (`userId`,
/// `passToken`, `ssecurity`, `serviceToken`) are the stable contract
/// downstream integrations rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "passToken")]
    pub pass_token: String,
    pub ssecurity: String,
    #[serde(rename = "serviceToken")]
    pub service_token: String,
}

impl SessionToken {
    /// True when the record carries a usable service token.
    #[must_use]
    pub fn has_service_token(&self) -> bool {
        !self.service_token.is_empty()
    }
}

/// Derives the canonical [`SessionToken`] from a completed login session.
///
/// Pure and infallible: every field falls back to the empty string, so the
/// result is always fully populated. `passToken` is resolved with an ordered
/// fallback chain — the `passToken` session cookie, then the `serviceToken`
/// session cookie, then the session's service token field. Empty cookie
/// values are skipped, not used.
///
/// The cookie-`serviceToken` step mirrors observed provider behavior and is
/// preserved as-is rather than generalized.
#[must_use]
pub fn normalize(session: &ProviderSession) -> SessionToken {
    let service_token = session.service_token().unwrap_or_default().to_owned();

    let pass_token = [session.cookie("passToken"), session.cookie("serviceToken")]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| service_token.clone());

    SessionToken {
        user_id: session.user_id().unwrap_or_default().to_owned(),
        pass_token,
        ssecurity: session.ssecurity().unwrap_or_default().to_owned(),
        service_token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_session() -> ProviderSession {
        ProviderSession::new()
            .with_user_id(12345u64)
            .with_service_token("svc-abc")
            .with_ssecurity("sec-xyz")
    }

    #[test]
    fn pass_token_from_cookie() {
        let session = full_session().with_cookie("passToken", "cookie-pt");
        let token = normalize(&session);

        assert_eq!(token.user_id, "12345");
        assert_eq!(token.pass_token, "cookie-pt");
        assert_eq!(token.ssecurity, "sec-xyz");
        assert_eq!(token.service_token, "svc-abc");
    }

    #[test]
    fn pass_token_falls_back_to_service_token_cookie() {
        let session = full_session().with_cookie("serviceToken", "cookie-svc");
        assert_eq!(normalize(&session).pass_token, "cookie-svc");
    }

    #[test]
    fn empty_pass_token_cookie_is_skipped() {
        let session = full_session()
            .with_cookie("passToken", "")
            .with_cookie("serviceToken", "cookie-svc");
        assert_eq!(normalize(&session).pass_token, "cookie-svc");
    }

    #[test]
    fn pass_token_falls_back_to_service_token_field() {
        let token = normalize(&full_session());
        assert_eq!(token.pass_token, "svc-abc");
        assert_eq!(token.service_token, "svc-abc");
    }

    #[test]
    fn all_fields_empty_when_session_is_bare() {
        let token = normalize(&ProviderSession::new());
        assert_eq!(token.user_id, "");
        assert_eq!(token.pass_token, "");
        assert_eq!(token.ssecurity, "");
        assert_eq!(token.service_token, "");
        assert!(!token.has_service_token());
    }

    #[test]
    fn pass_token_never_empty_when_service_token_present() {
        // Fallback invariant over a few snapshot shapes.
        let sessions = [
            full_session(),
            full_session().with_cookie("passToken", ""),
            full_session().with_cookie("unrelated", "x"),
        ];
        for session in sessions {
            let token = normalize(&session);
            assert!(token.has_service_token());
            assert!(!token.pass_token.is_empty());
        }
    }

    #[test]
    fn cookie_order_beats_field() {
        // Cookie passToken wins even when the serviceToken cookie and field
        // are both present.
        let session = full_session()
            .with_cookie("passToken", "cookie-pt")
            .with_cookie("serviceToken", "cookie-svc");
        assert_eq!(normalize(&session).pass_token, "cookie-pt");
    }

    #[test]
    fn serde_wire_keys_are_stable() {
        let token = normalize(&full_session().with_cookie("passToken", "cookie-pt"));
        let json: serde_json::Value = serde_json::to_value(&token).unwrap();

        assert_eq!(json["userId"], "12345");
        assert_eq!(json["passToken"], "cookie-pt");
        assert_eq!(json["ssecurity"], "sec-xyz");
        assert_eq!(json["serviceToken"], "svc-abc");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn serde_roundtrip() {
        let token = normalize(&full_session());
        let json = serde_json::to_string(&token).unwrap();
        let parsed: SessionToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }
}
