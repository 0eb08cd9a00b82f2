use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::activity::{require_service, require_str, Activity};
use crate::error::MaximoError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::Params;
use crate::request::{self, Verb};
use crate::service::Service;

use super::resources::RawOutputs;
use super::OSLC_CONTEXT;

/// Escape hatch: any verb, any path under the `oslc` context.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendMaximoRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMaximoRequestInputs {
    #[serde(default)]
    pub service: Option<Service>,
    /// `GET`, `POST`, `PATCH` or `DELETE`.
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub query: Option<Params>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub headers: Option<Params>,
}

impl Activity for SendMaximoRequest {
    type Inputs = SendMaximoRequestInputs;
    type Outputs = RawOutputs;

    const NAME: &'static str = "SendMaximoRequest";

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError> {
        let service = require_service(&inputs.service)?;
        let method = require_str(&inputs.method, "method")?;
        let path = require_str(&inputs.path, "path")?;
        let verb: Verb = method.parse()?;
        request::build_request(
            service,
            verb,
            &service.route(OSLC_CONTEXT, path),
            inputs.query.as_ref(),
            inputs.body.as_ref(),
            inputs.headers.as_ref(),
        )
    }

    fn parse(&self, _: &Self::Inputs, response: HttpResponse) -> Result<Self::Outputs, MaximoError> {
        Ok(RawOutputs {
            result: request::parse_response(response)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use serde_json::json;

    fn inputs(value: Value) -> SendMaximoRequestInputs {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn validates_method_then_path() {
        let service = json!({"url": "https://host/maximo", "apiKey": "k"});
        let err = SendMaximoRequest
            .build(&inputs(json!({"service": service.clone()})))
            .unwrap_err();
        assert_eq!(err.to_string(), "method is required");
        let err = SendMaximoRequest
            .build(&inputs(json!({"service": service, "method": "GET"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "path is required");
    }

    #[test]
    fn path_is_checked_before_method_support() {
        let err = SendMaximoRequest
            .build(&inputs(json!({
                "service": {"url": "https://host/maximo"},
                "method": "PUT"
            })))
            .unwrap_err();
        assert_eq!(err.to_string(), "path is required");
    }

    #[test]
    fn method_is_case_sensitive() {
        let err = SendMaximoRequest
            .build(&inputs(json!({
                "service": {"url": "https://host/maximo"},
                "method": "get",
                "path": "os/mxwo"
            })))
            .unwrap_err();
        assert!(matches!(err, MaximoError::InvalidInput(_)));
        assert_eq!(err.to_string(), "HTTP method 'get' not supported.");
    }

    #[test]
    fn rejects_unknown_method() {
        let err = SendMaximoRequest
            .build(&inputs(json!({
                "service": {"url": "https://host/maximo"},
                "method": "PUT",
                "path": "os/mxwo"
            })))
            .unwrap_err();
        assert!(matches!(err, MaximoError::InvalidInput(_)));
        assert_eq!(err.to_string(), "HTTP method 'PUT' not supported.");
    }

    #[test]
    fn forwards_query_body_and_headers() {
        let req = SendMaximoRequest
            .build(&inputs(json!({
                "service": {"url": "https://host/maximo", "apiKey": "k"},
                "method": "PATCH",
                "path": "os/mxwo/_V08vMTAwMA--",
                "query": {"oslc.select": "wonum", "lean": 0},
                "body": {"description": "x"},
                "headers": {"patchtype": "MERGE"}
            })))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.url,
            "https://host/maximo/oslc/os/mxwo/_V08vMTAwMA--?lean=0&oslc.select=wonum"
        );
        assert_eq!(req.header("patchtype"), Some("MERGE"));
        assert_eq!(req.header("x-method-override"), Some("PATCH"));
        assert_eq!(req.header("apikey"), Some("k"));
        assert_eq!(req.body.as_deref(), Some(r#"{"description":"x"}"#));
    }

    #[test]
    fn get_drops_body() {
        let req = SendMaximoRequest
            .build(&inputs(json!({
                "service": {"url": "https://host/maximo", "apiKey": "k"},
                "method": "GET",
                "path": "os/mxwo",
                "body": {"ignored": true}
            })))
            .unwrap();
        assert!(req.body.is_none());
    }
}
