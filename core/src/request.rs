//! Request construction and response checking shared by every activity.
//!
//! # Design
//! Each verb has a sans-IO `build_*` function producing an `HttpRequest`
//! and an async counterpart that hands the request to a `Transport` and
//! runs the result through `parse_response`. Both paths go through
//! `build_request`, so the wire format is identical whichever one a caller
//! uses.

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{MaximoError, RequestError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{value_to_string, Params};
use crate::service::Service;
use crate::transport::Transport;

pub const METHOD_OVERRIDE_HEADER: &str = "x-method-override";

/// Caller-facing verbs. `Patch` travels as POST with a method override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
        }
    }

    fn wire_method(self) -> HttpMethod {
        match self {
            Verb::Get => HttpMethod::Get,
            Verb::Post | Verb::Patch => HttpMethod::Post,
            Verb::Delete => HttpMethod::Delete,
        }
    }
}

impl FromStr for Verb {
    type Err = MaximoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PATCH" => Ok(Verb::Patch),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(MaximoError::InvalidInput(format!(
                "HTTP method '{s}' not supported."
            ))),
        }
    }
}

/// Query parameters applied to every request before caller input.
pub fn default_query() -> Params {
    Params::new().with("lean", 1)
}

/// Build the wire request for `verb` against `service`.
///
/// Fails with `MaximoError::Config` when the service has no URL. `body` is
/// ignored for GET.
pub fn build_request(
    service: &Service,
    verb: Verb,
    path: &str,
    query: Option<&Params>,
    body: Option<&Value>,
    headers: Option<&Params>,
) -> Result<HttpRequest, MaximoError> {
    if service.url.is_empty() {
        return Err(MaximoError::Config("url is required".to_string()));
    }

    let mut merged = default_query();
    if let Some(query) = query {
        merged.merge(query);
    }
    let url = format!("{}/{}?{}", service.url, path, merged.to_query_string());

    let method = verb.wire_method();
    let mut wire_headers = vec![("accept".to_string(), "application/json".to_string())];
    if method != HttpMethod::Get {
        set_header(&mut wire_headers, "content-type", "application/json");
    }
    if let Some(headers) = headers {
        for (name, value) in headers.iter() {
            if !value.is_null() {
                set_header(&mut wire_headers, name, &value_to_string(value));
            }
        }
    }
    if verb == Verb::Patch {
        set_header(&mut wire_headers, METHOD_OVERRIDE_HEADER, "PATCH");
    }
    if let Some(api_key) = service.api_key.as_deref().filter(|k| !k.is_empty()) {
        set_header(&mut wire_headers, "apikey", api_key);
    }
    if let Some(token) = service.auth_token.as_deref().filter(|t| !t.is_empty()) {
        set_header(&mut wire_headers, "maxauth", token);
    }

    let body = match (method, body) {
        (HttpMethod::Get, _) | (_, None) => None,
        (_, Some(body)) => Some(
            serde_json::to_string(body).map_err(|e| MaximoError::Serialization(e.to_string()))?,
        ),
    };

    Ok(HttpRequest {
        method,
        url,
        headers: wire_headers,
        body,
    })
}

pub fn build_get(
    service: &Service,
    path: &str,
    query: Option<&Params>,
    headers: Option<&Params>,
) -> Result<HttpRequest, MaximoError> {
    build_request(service, Verb::Get, path, query, None, headers)
}

pub fn build_post(
    service: &Service,
    path: &str,
    query: Option<&Params>,
    body: Option<&Value>,
    headers: Option<&Params>,
) -> Result<HttpRequest, MaximoError> {
    build_request(service, Verb::Post, path, query, body, headers)
}

pub fn build_patch(
    service: &Service,
    path: &str,
    query: Option<&Params>,
    body: Option<&Value>,
    headers: Option<&Params>,
) -> Result<HttpRequest, MaximoError> {
    build_request(service, Verb::Patch, path, query, body, headers)
}

pub fn build_delete(
    service: &Service,
    path: &str,
    query: Option<&Params>,
    body: Option<&Value>,
    headers: Option<&Params>,
) -> Result<HttpRequest, MaximoError> {
    build_request(service, Verb::Delete, path, query, body, headers)
}

/// Interpret a Maximo response.
///
/// 2xx yields the JSON body, or an empty object for 204 and zero-length
/// bodies. Anything else becomes a `RequestError`.
pub fn parse_response(response: HttpResponse) -> Result<Value, MaximoError> {
    if !response.is_success() {
        return Err(request_error(&response).into());
    }
    let empty = response.status == 204
        || response.header("content-length").map(str::trim) == Some("0");
    if empty {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(&response.body).map_err(|e| MaximoError::Deserialization(e.to_string()))
}

/// Build the error value for a non-2xx response.
///
/// A body that fails to parse is dropped so the status code stays the
/// visible cause.
pub fn request_error(response: &HttpResponse) -> RequestError {
    let is_json = response
        .header("content-type")
        .is_some_and(|ct| ct.contains("application/json"));

    let error = if is_json {
        match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => Some(unwrap_error_envelope(body)),
            Err(e) => {
                warn!(status = response.status, error = %e, "unreadable Maximo error body");
                None
            }
        }
    } else {
        None
    };

    let message = error
        .as_ref()
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    RequestError {
        status_code: response.status,
        error,
        message,
    }
}

fn unwrap_error_envelope(body: Value) -> Value {
    match body.get("Error") {
        Some(inner) if !inner.is_null() => inner.clone(),
        _ => body,
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(slot) => slot.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

/// Build, send and parse one request.
pub async fn send(
    transport: &dyn Transport,
    service: &Service,
    verb: Verb,
    path: &str,
    query: Option<&Params>,
    body: Option<&Value>,
    headers: Option<&Params>,
) -> Result<Value, MaximoError> {
    let request = build_request(service, verb, path, query, body, headers)?;
    debug!(verb = verb.as_str(), url = %request.url, "sending Maximo request");
    let response = transport.send(request).await?;
    debug!(status = response.status, "Maximo responded");
    parse_response(response)
}

pub async fn get(
    transport: &dyn Transport,
    service: &Service,
    path: &str,
    query: Option<&Params>,
    headers: Option<&Params>,
) -> Result<Value, MaximoError> {
    send(transport, service, Verb::Get, path, query, None, headers).await
}

pub async fn post(
    transport: &dyn Transport,
    service: &Service,
    path: &str,
    query: Option<&Params>,
    body: Option<&Value>,
    headers: Option<&Params>,
) -> Result<Value, MaximoError> {
    send(transport, service, Verb::Post, path, query, body, headers).await
}

pub async fn patch(
    transport: &dyn Transport,
    service: &Service,
    path: &str,
    query: Option<&Params>,
    body: Option<&Value>,
    headers: Option<&Params>,
) -> Result<Value, MaximoError> {
    send(transport, service, Verb::Patch, path, query, body, headers).await
}

pub async fn delete(
    transport: &dyn Transport,
    service: &Service,
    path: &str,
    query: Option<&Params>,
    body: Option<&Value>,
    headers: Option<&Params>,
) -> Result<Value, MaximoError> {
    send(transport, service, Verb::Delete, path, query, body, headers).await
}
