//! The host contract: a unit that takes a named-input record and produces a
//! named-output record or an error.
//!
//! # Design
//! `Activity` is the typed, sans-IO form: `build` validates inputs and
//! produces the single request the activity needs, `parse` shapes the
//! response. `ActivityHandler` erases the input/output types to JSON so a
//! host can drive any activity by name; every `Activity` gets it for free.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::MaximoError;
use crate::http::{HttpRequest, HttpResponse};
use crate::service::Service;
use crate::transport::Transport;

pub trait Activity: Send + Sync {
    type Inputs: DeserializeOwned + Send + Sync;
    type Outputs: Serialize;

    /// Name the host uses to address this activity.
    const NAME: &'static str;

    fn build(&self, inputs: &Self::Inputs) -> Result<HttpRequest, MaximoError>;

    fn parse(
        &self,
        inputs: &Self::Inputs,
        response: HttpResponse,
    ) -> Result<Self::Outputs, MaximoError>;
}

/// Run one typed activity: build, send, parse.
pub async fn run<A: Activity>(
    activity: &A,
    transport: &dyn Transport,
    inputs: A::Inputs,
) -> Result<A::Outputs, MaximoError> {
    let request = activity.build(&inputs)?;
    debug!(activity = A::NAME, method = %request.method, url = %request.url, "executing activity");
    let response = transport.send(request).await?;
    activity.parse(&inputs, response)
}

/// JSON-erased view of an activity, suitable for a registry or a foreign
/// host.
#[async_trait]
pub trait ActivityHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn build_request(&self, inputs: &Value) -> Result<HttpRequest, MaximoError>;

    fn parse_response(&self, inputs: &Value, response: HttpResponse)
        -> Result<Value, MaximoError>;

    async fn execute(&self, transport: &dyn Transport, inputs: Value) -> Result<Value, MaximoError> {
        let request = self.build_request(&inputs)?;
        debug!(activity = self.name(), method = %request.method, url = %request.url, "executing activity");
        let response = transport.send(request).await?;
        self.parse_response(&inputs, response)
    }
}

impl<A: Activity> ActivityHandler for A {
    fn name(&self) -> &'static str {
        A::NAME
    }

    fn build_request(&self, inputs: &Value) -> Result<HttpRequest, MaximoError> {
        let inputs = decode_inputs::<A::Inputs>(inputs)?;
        self.build(&inputs)
    }

    fn parse_response(
        &self,
        inputs: &Value,
        response: HttpResponse,
    ) -> Result<Value, MaximoError> {
        let inputs = decode_inputs::<A::Inputs>(inputs)?;
        let outputs = self.parse(&inputs, response)?;
        serde_json::to_value(outputs).map_err(|e| MaximoError::Serialization(e.to_string()))
    }
}

fn decode_inputs<T: DeserializeOwned>(inputs: &Value) -> Result<T, MaximoError> {
    // A host may pass nothing at all; treat it as an empty record so the
    // activity reports the first missing field by name.
    let inputs = if inputs.is_null() {
        Value::Object(Default::default())
    } else {
        inputs.clone()
    };
    serde_json::from_value(inputs).map_err(|e| MaximoError::InvalidInput(format!("invalid inputs: {e}")))
}

/// Deserialize a successful response into a declared output shape.
pub(crate) fn narrow<T: DeserializeOwned>(value: Value) -> Result<T, MaximoError> {
    serde_json::from_value(value).map_err(|e| MaximoError::Deserialization(e.to_string()))
}

pub(crate) fn require_service(service: &Option<Service>) -> Result<&Service, MaximoError> {
    service.as_ref().ok_or(MaximoError::MissingInput("service"))
}

/// Empty strings count as missing, matching how hosts leave optional text
/// inputs blank.
pub(crate) fn require_str<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, MaximoError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(MaximoError::MissingInput(field))
}

pub(crate) fn require_value<'a>(
    value: &'a Option<Value>,
    field: &'static str,
) -> Result<&'a Value, MaximoError> {
    value
        .as_ref()
        .filter(|v| !v.is_null())
        .ok_or(MaximoError::MissingInput(field))
}

/// Optional text input, with blank treated as absent.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activities::{GetMaximoAsset, GetMaximoAssetInputs};
    use serde_json::json;

    struct CannedTransport(HttpResponse);

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, MaximoError> {
            assert!(request.url.contains("/os/mxasset/21"));
            Ok(self.0.clone())
        }
    }

    fn asset_response() -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: r#"{"assetnum":"11430","assetid":21,"priority":2}"#.to_string(),
        }
    }

    #[tokio::test]
    async fn run_builds_sends_and_parses() {
        let inputs = GetMaximoAssetInputs {
            service: Some(Service::new("https://host/maximo").with_api_key("k")),
            asset_id: Some("21".to_string()),
            select: None,
        };
        let outputs = run(&GetMaximoAsset, &CannedTransport(asset_response()), inputs)
            .await
            .unwrap();
        assert_eq!(outputs.result.assetnum.as_deref(), Some("11430"));
        assert_eq!(outputs.result.fields["priority"], 2);
    }

    #[tokio::test]
    async fn handler_execute_returns_json_outputs() {
        let inputs = json!({"service": {"url": "https://host/maximo", "apiKey": "k"}, "assetId": "21"});
        let outputs = GetMaximoAsset
            .execute(&CannedTransport(asset_response()), inputs)
            .await
            .unwrap();
        assert_eq!(outputs, json!({"result": {"assetnum": "11430", "assetid": 21, "priority": 2}}));
    }

    #[test]
    fn validation_happens_before_any_request() {
        let err = GetMaximoAsset.build_request(&json!({"assetId": "21"})).unwrap_err();
        assert!(matches!(err, MaximoError::MissingInput("service")));
    }

    #[test]
    fn blank_strings_count_as_missing() {
        assert!(matches!(
            require_str(&Some(String::new()), "where"),
            Err(MaximoError::MissingInput("where"))
        ));
        assert_eq!(non_empty(&Some("x".to_string())), Some("x"));
        assert!(require_value(&Some(Value::Null), "content").is_err());
    }
}
