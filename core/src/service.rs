//! The authenticated connection value handed to every activity.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Connection descriptor for one Maximo instance.
///
/// Produced once per session and passed by reference to every call. The
/// fields are read-only after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Base URL without trailing slash, e.g. `https://host/maximo`.
    #[serde(default)]
    pub url: String,
    /// `base64("user:pass")`, sent as the `maxauth` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Sent as the `apikey` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API route segment (`oslc`, `api`, ...) that prefixes activity paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Service {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.auth_token = Some(auth_token(username, password));
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        let context = context.trim_matches('/');
        self.context = (!context.is_empty()).then(|| context.to_string());
        self
    }

    /// Resolve an activity path against the configured context.
    ///
    /// `default_context` applies when the service has none, or only slashes
    /// and whitespace; an empty default leaves `path` relative to `url`.
    pub fn route(&self, default_context: &str, path: &str) -> String {
        let context = self
            .context
            .as_deref()
            .map(|c| c.trim().trim_matches('/'))
            .filter(|c| !c.is_empty())
            .unwrap_or(default_context);
        if context.is_empty() {
            path.to_string()
        } else {
            format!("{context}/{path}")
        }
    }
}

/// Encode `user:pass` the way the `maxauth` header expects.
pub fn auth_token(username: &str, password: &str) -> String {
    STANDARD.encode(format!("{username}:{password}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let service = Service::new("https://host/maximo///");
        assert_eq!(service.url, "https://host/maximo");
    }

    #[test]
    fn credentials_are_base64_encoded() {
        let service = Service::new("https://host").with_credentials("maxadmin", "maxadmin");
        assert_eq!(service.auth_token.as_deref(), Some("bWF4YWRtaW46bWF4YWRtaW4="));
    }

    #[test]
    fn route_uses_default_context_when_unset() {
        let service = Service::new("https://host");
        assert_eq!(service.route("oslc", "whoami"), "oslc/whoami");
        assert_eq!(service.route("", "os/mxwo"), "os/mxwo");
    }

    #[test]
    fn route_prefers_service_context() {
        let service = Service::new("https://host").with_context("/api/");
        assert_eq!(service.route("oslc", "whoami"), "api/whoami");
        assert_eq!(service.route("", "os/mxwo"), "api/os/mxwo");
    }

    #[test]
    fn host_supplied_context_is_trimmed() {
        let service: Service =
            serde_json::from_str(r#"{"url":"https://host","context":"/api/"}"#).unwrap();
        assert_eq!(service.route("oslc", "whoami"), "api/whoami");
    }

    #[test]
    fn blank_host_context_falls_back_to_default() {
        for context in ["", "/", "  "] {
            let service = Service {
                url: "https://host".to_string(),
                context: Some(context.to_string()),
                ..Service::default()
            };
            assert_eq!(service.route("oslc", "whoami"), "oslc/whoami");
            assert_eq!(service.route("", "os/mxwo"), "os/mxwo");
        }
    }

    #[test]
    fn deserializes_host_record() {
        let service: Service =
            serde_json::from_str(r#"{"url":"https://host","apiKey":"k"}"#).unwrap();
        assert_eq!(service.api_key.as_deref(), Some("k"));
        assert!(service.auth_token.is_none());
    }

    #[test]
    fn missing_url_deserializes_empty() {
        let service: Service = serde_json::from_str(r#"{"authToken":"t"}"#).unwrap();
        assert!(service.url.is_empty());
    }
}
