//! Maximo Asset Management REST/OSLC activity client.
//!
//! # Overview
//! Each Maximo operation is an activity: it validates a named-input
//! record, builds exactly one `HttpRequest`, and shapes the `HttpResponse`
//! into a named-output record. Building and parsing never touch the
//! network, so the same activities run behind the async `Transport` seam,
//! behind a C host through `maximo-ffi`, or against canned responses.
//!
//! # Design
//! - `Service` is the immutable connection descriptor passed to every call.
//! - `request` holds the shared wire rules: `lean=1`, auth headers,
//!   PATCH-over-POST, and Maximo error-envelope unwrapping.
//! - `Activity` is the typed contract; `ActivityHandler` its JSON-erased
//!   form, collected in a `Registry` by name.
//! - No retries, pagination loops or caching: one call, one request.

pub mod activities;
pub mod activity;
pub mod config;
pub mod error;
pub mod http;
pub mod id;
pub mod params;
pub mod registry;
pub mod request;
pub mod service;
pub mod transport;

pub use activity::{run, Activity, ActivityHandler};
pub use config::ServiceConfig;
pub use error::{MaximoError, RequestError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use id::id_from_id_or_url;
pub use params::Params;
pub use registry::Registry;
pub use request::Verb;
pub use service::Service;
pub use transport::{ReqwestTransport, Transport};
